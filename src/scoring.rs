use crate::activation::active_objectives;
use crate::models::{CompletionLog, Objective, PointTransaction, WeeklyExclusion};
use crate::week;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;
use uuid::Uuid;

pub const PERFECT_WEEK_MULTIPLIER: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WeeklyScore {
    pub score: u32,
    pub is_perfect_week: bool,
    pub perfect_count: u32,
}

/// Distinct days in the week starting at `week_start` on which the objective
/// was logged complete.
pub fn completed_days(objective_id: Uuid, week_start: NaiveDate, logs: &[CompletionLog]) -> u32 {
    logs.iter()
        .filter(|log| log.objective_id == objective_id && log.is_completed)
        .filter(|log| week::contains(week_start, log.date))
        .map(|log| log.date)
        .collect::<BTreeSet<_>>()
        .len() as u32
}

/// One point per objective completed all seven days; doubled when every
/// active objective is perfect.
pub fn score_week(week_start: NaiveDate, active: &[&Objective], logs: &[CompletionLog]) -> WeeklyScore {
    if active.is_empty() {
        return WeeklyScore::default();
    }

    let perfect_count = active
        .iter()
        .filter(|obj| completed_days(obj.id, week_start, logs) == week::DAYS_PER_WEEK as u32)
        .count() as u32;

    let is_perfect_week = perfect_count as usize == active.len();
    let score = if is_perfect_week {
        perfect_count * PERFECT_WEEK_MULTIPLIER
    } else {
        perfect_count
    };

    WeeklyScore {
        score,
        is_perfect_week,
        perfect_count,
    }
}

/// Points earned across every week that has at least one log for the child.
pub fn earned_points(
    child_id: Uuid,
    objectives: &[Objective],
    logs: &[CompletionLog],
    exclusions: &[WeeklyExclusion],
) -> i64 {
    let mut weeks: BTreeMap<NaiveDate, Vec<CompletionLog>> = BTreeMap::new();
    for log in logs.iter().filter(|log| log.child_id == child_id) {
        weeks
            .entry(week::week_start(log.date))
            .or_default()
            .push(log.clone());
    }

    let mut total = 0i64;
    for (start, week_logs) in &weeks {
        let active = active_objectives(*start, child_id, objectives, exclusions, false);
        if active.is_empty() {
            continue;
        }
        let result = score_week(*start, &active, week_logs);
        debug!(
            week = %week::week_label(*start),
            score = result.score,
            perfect = result.is_perfect_week,
            "scored week"
        );
        total += i64::from(result.score);
    }
    total
}

pub fn adjustments(child_id: Uuid, transactions: &[PointTransaction]) -> i64 {
    transactions
        .iter()
        .filter(|tx| tx.child_id == child_id)
        .map(|tx| tx.amount)
        .sum()
}

/// Lifetime balance: earned weekly points plus signed transactions. May go negative.
pub fn running_balance(
    child_id: Uuid,
    objectives: &[Objective],
    logs: &[CompletionLog],
    exclusions: &[WeeklyExclusion],
    transactions: &[PointTransaction],
) -> i64 {
    earned_points(child_id, objectives, logs, exclusions) + adjustments(child_id, transactions)
}
