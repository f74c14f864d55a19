use crate::activation::active_objectives;
use crate::models::{AppData, BalanceResponse, ObjectiveRow, WeekView};
use crate::scoring::{adjustments, completed_days, earned_points, score_week};
use crate::week::{week_days, week_end, week_label, week_start};
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

pub fn build_week_view(data: &AppData, child_id: Uuid, date: NaiveDate, show_all: bool) -> WeekView {
    build_week_view_at(Utc::now().date_naive(), data, child_id, date, show_all)
}

/// `show_all` is only honoured for weeks that ended before `today`'s week.
pub fn build_week_view_at(
    today: NaiveDate,
    data: &AppData,
    child_id: Uuid,
    date: NaiveDate,
    show_all: bool,
) -> WeekView {
    let start = week_start(date);
    let show_all = show_all && start < week_start(today);
    let logs = data.logs_for(child_id);
    let active = active_objectives(start, child_id, &data.objectives, &data.exclusions, show_all);
    let result = score_week(start, &active, &logs);

    let objectives = active
        .iter()
        .map(|obj| {
            let mut days = [false; 7];
            for (slot, day) in days.iter_mut().zip(week_days(start)) {
                *slot = logs
                    .iter()
                    .any(|log| log.objective_id == obj.id && log.date == day && log.is_completed);
            }
            let completed = completed_days(obj.id, start, &logs);
            ObjectiveRow {
                id: obj.id,
                title: obj.title.clone(),
                days,
                completed_days: completed,
                perfect: completed == 7,
            }
        })
        .collect();

    WeekView {
        child_id,
        week: week_label(start),
        start_date: start,
        end_date: week_end(start),
        show_all,
        objectives,
        score: result.score,
        is_perfect_week: result.is_perfect_week,
        perfect_count: result.perfect_count,
    }
}

pub fn build_balance(data: &AppData, child_id: Uuid) -> BalanceResponse {
    let earned = earned_points(child_id, &data.objectives, &data.daily_logs, &data.exclusions);
    let adjustments = adjustments(child_id, &data.transactions);
    BalanceResponse {
        child_id,
        earned,
        adjustments,
        balance: earned + adjustments,
    }
}
