use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Child {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A daily habit tracked for one child, or for every child when `child_id` is `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Objective {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub child_id: Option<Uuid>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Soft-delete marker. Weeks that began before this instant still see the objective.
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionLog {
    pub id: Uuid,
    pub objective_id: Uuid,
    pub child_id: Uuid,
    pub date: NaiveDate,
    #[serde(default = "completed")]
    pub is_completed: bool,
}

fn completed() -> bool {
    true
}

/// Hides one objective from one child for the week starting on `week_start` (a Monday).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyExclusion {
    pub objective_id: Uuid,
    pub child_id: Uuid,
    pub week_start: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointTransaction {
    pub id: Uuid,
    pub child_id: Uuid,
    pub amount: i64,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Everything the service persists, one vector per table.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    #[serde(default)]
    pub children: Vec<Child>,
    #[serde(default)]
    pub objectives: Vec<Objective>,
    #[serde(default)]
    pub daily_logs: Vec<CompletionLog>,
    #[serde(default, rename = "objective_exclusions")]
    pub exclusions: Vec<WeeklyExclusion>,
    #[serde(default, rename = "point_transactions")]
    pub transactions: Vec<PointTransaction>,
}

impl AppData {
    pub fn child(&self, id: Uuid) -> Option<&Child> {
        self.children.iter().find(|child| child.id == id)
    }

    pub fn objective(&self, id: Uuid) -> Option<&Objective> {
        self.objectives.iter().find(|objective| objective.id == id)
    }

    pub fn logs_for(&self, child_id: Uuid) -> Vec<CompletionLog> {
        self.daily_logs
            .iter()
            .filter(|log| log.child_id == child_id)
            .cloned()
            .collect()
    }

    pub fn transactions_for(&self, child_id: Uuid) -> Vec<PointTransaction> {
        self.transactions
            .iter()
            .filter(|tx| tx.child_id == child_id)
            .cloned()
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct NewChildRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct NewObjectiveRequest {
    pub title: String,
    #[serde(default)]
    pub child_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub objective_id: Uuid,
    pub date: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub objective_id: Uuid,
    pub date: NaiveDate,
    pub is_completed: bool,
}

#[derive(Debug, Deserialize)]
pub struct ExclusionRequest {
    pub objective_id: Uuid,
    pub week_start: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct TransactionRequest {
    pub amount: i64,
    pub description: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct WeekQuery {
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub show_all: bool,
}

#[derive(Debug, Serialize)]
pub struct ObjectiveRow {
    pub id: Uuid,
    pub title: String,
    pub days: [bool; 7],
    pub completed_days: u32,
    pub perfect: bool,
}

#[derive(Debug, Serialize)]
pub struct WeekView {
    pub child_id: Uuid,
    pub week: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub show_all: bool,
    pub objectives: Vec<ObjectiveRow>,
    pub score: u32,
    pub is_perfect_week: bool,
    pub perfect_count: u32,
}

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub child_id: Uuid,
    pub earned: i64,
    pub adjustments: i64,
    pub balance: i64,
}
