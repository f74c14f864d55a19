use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};

pub const DAYS_PER_WEEK: i64 = 7;

/// Monday of the ISO week containing `date`. Sunday belongs to the week that
/// started six days earlier.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date.checked_sub_signed(Duration::days(date.weekday().num_days_from_monday() as i64))
        .unwrap_or(NaiveDate::MIN)
}

/// Monday of `date`'s week, or `None` when that week or the one after it
/// runs past the calendar range chrono can represent.
pub fn checked_window(date: NaiveDate) -> Option<NaiveDate> {
    let start = date.checked_sub_signed(Duration::days(
        date.weekday().num_days_from_monday() as i64,
    ))?;
    start.checked_add_signed(Duration::days(2 * DAYS_PER_WEEK))?;
    start.checked_sub_signed(Duration::days(DAYS_PER_WEEK))?;
    Some(start)
}

/// Sunday of the week, clamped to the last representable date.
pub fn week_end(start: NaiveDate) -> NaiveDate {
    start
        .checked_add_signed(Duration::days(DAYS_PER_WEEK - 1))
        .unwrap_or(NaiveDate::MAX)
}

/// True when `date` falls in `[start, start + 7)`.
pub fn contains(start: NaiveDate, date: NaiveDate) -> bool {
    date >= start
        && start
            .checked_add_signed(Duration::days(DAYS_PER_WEEK))
            .is_none_or(|next| date < next)
}

pub fn week_days(start: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    (0..DAYS_PER_WEEK).filter_map(move |offset| start.checked_add_signed(Duration::days(offset)))
}

/// The instant a week begins: Monday 00:00 UTC.
pub fn start_instant(start: NaiveDate) -> DateTime<Utc> {
    start.and_time(NaiveTime::MIN).and_utc()
}

pub fn week_label(date: NaiveDate) -> String {
    let iso = date.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn sunday_maps_to_previous_monday() {
        assert_eq!(week_start(day(2024, 1, 7)), day(2024, 1, 1));
        assert_eq!(week_start(day(2024, 1, 8)), day(2024, 1, 8));
        assert_eq!(week_start(day(2024, 1, 10)), day(2024, 1, 8));
    }

    #[test]
    fn week_start_is_idempotent_and_bounds_the_date() {
        let mut date = day(2023, 12, 20);
        for _ in 0..40 {
            let start = week_start(date);
            assert_eq!(week_start(start), start);
            assert!(start <= date);
            assert!(date < start + Duration::days(DAYS_PER_WEEK));
            assert!(contains(start, date));
            date = date.succ_opt().unwrap();
        }
    }

    #[test]
    fn week_crossing_year_boundary() {
        let start = week_start(day(2025, 1, 1));
        assert_eq!(start, day(2024, 12, 30));
        assert_eq!(week_end(start), day(2025, 1, 5));
        assert_eq!(week_label(start), "2025-W01");
    }

    #[test]
    fn last_representable_week_is_rejected_without_panicking() {
        assert_eq!(checked_window(NaiveDate::MAX), None);
        assert_eq!(checked_window(NaiveDate::MIN), None);
        assert_eq!(checked_window(day(2024, 1, 10)), Some(day(2024, 1, 8)));

        let start = week_start(NaiveDate::MAX);
        assert!(contains(start, NaiveDate::MAX));
        assert_eq!(week_end(start), NaiveDate::MAX);
        assert!(week_days(start).count() <= 7);
    }

    #[test]
    fn week_days_yields_seven_consecutive_days() {
        let days: Vec<_> = week_days(day(2024, 1, 8)).collect();
        assert_eq!(days.len(), 7);
        assert_eq!(days[0], day(2024, 1, 8));
        assert_eq!(days[6], day(2024, 1, 14));
        assert!(!contains(day(2024, 1, 8), day(2024, 1, 15)));
    }
}
