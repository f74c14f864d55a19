//! Which objectives count for a child in a given week.
//!
//! Each gate is a standalone predicate; `active_objectives` ANDs them.

use crate::models::{Objective, WeeklyExclusion};
use crate::week;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use uuid::Uuid;

/// Global objectives belong to every child.
pub fn is_owned_by(objective: &Objective, child_id: Uuid) -> bool {
    objective.child_id.is_none_or(|owner| owner == child_id)
}

/// Retired on or before the instant the week began.
pub fn is_retired(objective: &Objective, week_start: NaiveDate) -> bool {
    objective
        .deleted_at
        .is_some_and(|deleted_at| deleted_at <= week::start_instant(week_start))
}

pub fn is_excluded(
    objective: &Objective,
    child_id: Uuid,
    week_start: NaiveDate,
    exclusions: &[WeeklyExclusion],
) -> bool {
    exclusions.iter().any(|ex| {
        ex.objective_id == objective.id && ex.child_id == child_id && ex.week_start == week_start
    })
}

/// First Monday an objective is scored: its creation week when created on a
/// Monday, otherwise the following week.
pub fn effective_start(objective: &Objective) -> Option<NaiveDate> {
    let created = objective.created_at?.date_naive();
    let creation_monday = week::week_start(created);
    if created.weekday() == Weekday::Mon {
        Some(creation_monday)
    } else {
        Some(creation_monday + Duration::days(week::DAYS_PER_WEEK))
    }
}

pub fn has_started(objective: &Objective, week_start: NaiveDate) -> bool {
    effective_start(objective).is_none_or(|start| week_start >= start)
}

/// Objectives active for `child_id` during the week containing `week_start`,
/// in input order. `show_all` skips the smart-start gate and is meant for
/// display only.
pub fn active_objectives<'a>(
    week_start: NaiveDate,
    child_id: Uuid,
    objectives: &'a [Objective],
    exclusions: &[WeeklyExclusion],
    show_all: bool,
) -> Vec<&'a Objective> {
    let week_start = week::week_start(week_start);
    objectives
        .iter()
        .filter(|obj| is_owned_by(obj, child_id))
        .filter(|obj| !is_retired(obj, week_start))
        .filter(|obj| !is_excluded(obj, child_id, week_start, exclusions))
        .filter(|obj| show_all || has_started(obj, week_start))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn objective(created_at: Option<DateTime<Utc>>) -> Objective {
        Objective {
            id: Uuid::new_v4(),
            title: "Brush teeth".to_string(),
            child_id: None,
            created_at,
            deleted_at: None,
        }
    }

    fn ids(active: &[&Objective]) -> Vec<Uuid> {
        active.iter().map(|obj| obj.id).collect()
    }

    #[test]
    fn monday_creation_is_active_same_week() {
        let child = Uuid::new_v4();
        let objectives = vec![objective(Some(at(2024, 1, 1, 18)))];
        let active = active_objectives(day(2024, 1, 1), child, &objectives, &[], false);
        assert_eq!(active.len(), 1);
    }

    #[test]
    fn midweek_creation_starts_next_monday() {
        let child = Uuid::new_v4();
        let objectives = vec![objective(Some(at(2024, 1, 2, 9)))];
        assert!(active_objectives(day(2024, 1, 1), child, &objectives, &[], false).is_empty());
        assert_eq!(
            active_objectives(day(2024, 1, 8), child, &objectives, &[], false).len(),
            1
        );
        assert_eq!(effective_start(&objectives[0]), Some(day(2024, 1, 8)));
    }

    #[test]
    fn sunday_creation_starts_next_monday() {
        let objectives = vec![objective(Some(at(2024, 1, 7, 12)))];
        assert_eq!(effective_start(&objectives[0]), Some(day(2024, 1, 8)));
    }

    #[test]
    fn missing_creation_date_passes_smart_start() {
        let objectives = vec![objective(None)];
        assert!(has_started(&objectives[0], day(2000, 1, 3)));
    }

    #[test]
    fn show_all_bypasses_smart_start_only() {
        let child = Uuid::new_v4();
        let mut retired = objective(Some(at(2023, 1, 2, 0)));
        retired.deleted_at = Some(at(2023, 6, 1, 0));
        let objectives = vec![objective(Some(at(2024, 1, 3, 9))), retired];

        let hidden = active_objectives(day(2024, 1, 1), child, &objectives, &[], false);
        let shown = active_objectives(day(2024, 1, 1), child, &objectives, &[], true);
        assert!(hidden.is_empty());
        assert_eq!(ids(&shown), vec![objectives[0].id]);
        for id in ids(&hidden) {
            assert!(ids(&shown).contains(&id));
        }
    }

    #[test]
    fn soft_delete_keeps_week_in_progress() {
        let child = Uuid::new_v4();
        let mut obj = objective(Some(at(2023, 12, 25, 8)));
        obj.deleted_at = Some(at(2024, 1, 10, 15));
        let objectives = vec![obj];

        assert_eq!(
            active_objectives(day(2024, 1, 8), child, &objectives, &[], false).len(),
            1
        );
        assert!(active_objectives(day(2024, 1, 15), child, &objectives, &[], false).is_empty());
    }

    #[test]
    fn deletion_at_week_start_instant_retires_that_week() {
        let mut obj = objective(None);
        obj.deleted_at = Some(at(2024, 1, 8, 0));
        assert!(is_retired(&obj, day(2024, 1, 8)));
        assert!(!is_retired(&obj, day(2024, 1, 1)));
    }

    #[test]
    fn ownership_gate_filters_other_children() {
        let child = Uuid::new_v4();
        let sibling = Uuid::new_v4();
        let mut mine = objective(None);
        mine.child_id = Some(child);
        let mut theirs = objective(None);
        theirs.child_id = Some(sibling);
        let global = objective(None);
        let objectives = vec![mine, theirs, global];

        let active = active_objectives(day(2024, 1, 8), child, &objectives, &[], false);
        assert_eq!(ids(&active), vec![objectives[0].id, objectives[2].id]);
    }

    #[test]
    fn exclusion_applies_to_single_week_and_child() {
        let child = Uuid::new_v4();
        let sibling = Uuid::new_v4();
        let objectives = vec![objective(None)];
        let exclusions = vec![WeeklyExclusion {
            objective_id: objectives[0].id,
            child_id: child,
            week_start: day(2024, 1, 8),
        }];

        assert!(active_objectives(day(2024, 1, 8), child, &objectives, &exclusions, false).is_empty());
        assert_eq!(
            active_objectives(day(2024, 1, 1), child, &objectives, &exclusions, false).len(),
            1
        );
        assert_eq!(
            active_objectives(day(2024, 1, 15), child, &objectives, &exclusions, false).len(),
            1
        );
        assert_eq!(
            active_objectives(day(2024, 1, 8), sibling, &objectives, &exclusions, false).len(),
            1
        );
    }

    #[test]
    fn preserves_input_order() {
        let child = Uuid::new_v4();
        let objectives: Vec<_> = (0..5).map(|_| objective(None)).collect();
        let active = active_objectives(day(2024, 1, 10), child, &objectives, &[], false);
        assert_eq!(ids(&active), objectives.iter().map(|o| o.id).collect::<Vec<_>>());
    }
}
