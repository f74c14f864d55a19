use crate::activation::is_owned_by;
use crate::errors::AppError;
use crate::models::{
    AppData, BalanceResponse, Child, CompletionLog, ExclusionRequest, NewChildRequest,
    NewObjectiveRequest, Objective, PointTransaction, ToggleRequest, ToggleResponse,
    TransactionRequest, WeekQuery, WeekView, WeeklyExclusion,
};
use crate::state::AppState;
use crate::stats::{build_balance, build_week_view};
use crate::storage::persist_data;
use crate::ui::render_index;
use crate::week::checked_window;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, Redirect},
    Form, Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct IndexQuery {
    pub child: Option<Uuid>,
    pub week: Option<NaiveDate>,
    #[serde(default)]
    pub show_all: bool,
}

#[derive(Debug, Deserialize)]
pub struct UiToggleForm {
    pub child: Uuid,
    pub objective: Uuid,
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct UiExcludeForm {
    pub child: Uuid,
    pub objective: Uuid,
    pub week: NaiveDate,
}

pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<IndexQuery>,
) -> Result<Html<String>, AppError> {
    let today = today();
    if let Some(week) = query.week {
        require_window(week)?;
    }
    let data = state.data.lock().await;
    let selected = query
        .child
        .and_then(|id| data.child(id))
        .or_else(|| data.children.first())
        .map(|child| {
            let view = build_week_view(&data, child.id, query.week.unwrap_or(today), query.show_all);
            let balance = build_balance(&data, child.id);
            (child, view, balance)
        });
    let summary = selected
        .as_ref()
        .map(|(child, view, balance)| (*child, view, balance));
    Ok(Html(render_index(today, &data.children, summary)))
}

pub async fn ui_toggle(
    State(state): State<AppState>,
    Form(form): Form<UiToggleForm>,
) -> Result<Redirect, AppError> {
    let monday = require_window(form.date)?;
    let mut data = state.data.lock().await;
    apply_toggle(&mut data, form.child, form.objective, form.date)?;
    persist_data(&state.data_path, &data).await?;
    Ok(Redirect::to(&format!("/?child={}&week={monday}", form.child)))
}

pub async fn ui_exclude(
    State(state): State<AppState>,
    Form(form): Form<UiExcludeForm>,
) -> Result<Redirect, AppError> {
    let monday = require_window(form.week)?;
    let mut data = state.data.lock().await;
    if apply_exclusion(&mut data, form.child, form.objective, monday)? {
        persist_data(&state.data_path, &data).await?;
    }
    Ok(Redirect::to(&format!("/?child={}&week={monday}", form.child)))
}

pub async fn list_children(State(state): State<AppState>) -> Json<Vec<Child>> {
    let data = state.data.lock().await;
    Json(data.children.clone())
}

pub async fn create_child(
    State(state): State<AppState>,
    Json(payload): Json<NewChildRequest>,
) -> Result<(StatusCode, Json<Child>), AppError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("name must not be empty"));
    }

    let child = Child {
        id: Uuid::new_v4(),
        name: name.to_string(),
        created_at: Utc::now(),
    };
    let mut data = state.data.lock().await;
    data.children.push(child.clone());
    persist_data(&state.data_path, &data).await?;

    info!(child_id = %child.id, "child created");
    Ok((StatusCode::CREATED, Json(child)))
}

pub async fn delete_child(
    State(state): State<AppState>,
    Path(child_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let mut data = state.data.lock().await;
    require_child(&data, child_id)?;

    data.children.retain(|child| child.id != child_id);
    data.objectives.retain(|obj| obj.child_id != Some(child_id));
    data.daily_logs.retain(|log| log.child_id != child_id);
    data.exclusions.retain(|ex| ex.child_id != child_id);
    data.transactions.retain(|tx| tx.child_id != child_id);
    persist_data(&state.data_path, &data).await?;

    info!(%child_id, "child deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_objectives(State(state): State<AppState>) -> Json<Vec<Objective>> {
    let data = state.data.lock().await;
    Json(data.objectives.clone())
}

pub async fn create_objective(
    State(state): State<AppState>,
    Json(payload): Json<NewObjectiveRequest>,
) -> Result<(StatusCode, Json<Objective>), AppError> {
    let title = payload.title.trim();
    if title.is_empty() {
        return Err(AppError::bad_request("title must not be empty"));
    }

    let mut data = state.data.lock().await;
    if let Some(child_id) = payload.child_id {
        require_child(&data, child_id)?;
    }

    let objective = Objective {
        id: Uuid::new_v4(),
        title: title.to_string(),
        child_id: payload.child_id,
        created_at: Some(Utc::now()),
        deleted_at: None,
    };
    data.objectives.push(objective.clone());
    persist_data(&state.data_path, &data).await?;

    info!(objective_id = %objective.id, "objective created");
    Ok((StatusCode::CREATED, Json(objective)))
}

/// Retires the objective; weeks that started before now keep it.
pub async fn delete_objective(
    State(state): State<AppState>,
    Path(objective_id): Path<Uuid>,
) -> Result<Json<Objective>, AppError> {
    let mut data = state.data.lock().await;
    let objective = data
        .objectives
        .iter_mut()
        .find(|obj| obj.id == objective_id)
        .ok_or_else(|| AppError::not_found("objective not found"))?;
    if objective.deleted_at.is_none() {
        objective.deleted_at = Some(Utc::now());
        info!(%objective_id, "objective retired");
    }
    let objective = objective.clone();
    persist_data(&state.data_path, &data).await?;

    Ok(Json(objective))
}

pub async fn toggle_log(
    State(state): State<AppState>,
    Path(child_id): Path<Uuid>,
    Json(payload): Json<ToggleRequest>,
) -> Result<Json<ToggleResponse>, AppError> {
    require_window(payload.date)?;
    let mut data = state.data.lock().await;
    let is_completed = apply_toggle(&mut data, child_id, payload.objective_id, payload.date)?;
    persist_data(&state.data_path, &data).await?;

    Ok(Json(ToggleResponse {
        objective_id: payload.objective_id,
        date: payload.date,
        is_completed,
    }))
}

pub async fn exclude_objective(
    State(state): State<AppState>,
    Path(child_id): Path<Uuid>,
    Json(payload): Json<ExclusionRequest>,
) -> Result<StatusCode, AppError> {
    let monday = require_window(payload.week_start)?;
    let mut data = state.data.lock().await;
    if apply_exclusion(&mut data, child_id, payload.objective_id, monday)? {
        persist_data(&state.data_path, &data).await?;
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_transactions(
    State(state): State<AppState>,
    Path(child_id): Path<Uuid>,
) -> Result<Json<Vec<PointTransaction>>, AppError> {
    let data = state.data.lock().await;
    require_child(&data, child_id)?;
    Ok(Json(data.transactions_for(child_id)))
}

pub async fn create_transaction(
    State(state): State<AppState>,
    Path(child_id): Path<Uuid>,
    Json(payload): Json<TransactionRequest>,
) -> Result<(StatusCode, Json<PointTransaction>), AppError> {
    if payload.amount == 0 {
        return Err(AppError::bad_request("amount must not be zero"));
    }
    let description = payload.description.trim();
    if description.is_empty() {
        return Err(AppError::bad_request("description must not be empty"));
    }

    let mut data = state.data.lock().await;
    require_child(&data, child_id)?;
    let transaction = PointTransaction {
        id: Uuid::new_v4(),
        child_id,
        amount: payload.amount,
        description: description.to_string(),
        created_at: Utc::now(),
    };
    data.transactions.push(transaction.clone());
    persist_data(&state.data_path, &data).await?;

    info!(%child_id, amount = transaction.amount, "point transaction recorded");
    Ok((StatusCode::CREATED, Json(transaction)))
}

pub async fn get_week(
    State(state): State<AppState>,
    Path(child_id): Path<Uuid>,
    Query(query): Query<WeekQuery>,
) -> Result<Json<WeekView>, AppError> {
    let date = query.date.unwrap_or_else(today);
    require_window(date)?;
    let data = state.data.lock().await;
    require_child(&data, child_id)?;
    Ok(Json(build_week_view(&data, child_id, date, query.show_all)))
}

pub async fn get_balance(
    State(state): State<AppState>,
    Path(child_id): Path<Uuid>,
) -> Result<Json<BalanceResponse>, AppError> {
    let data = state.data.lock().await;
    require_child(&data, child_id)?;
    Ok(Json(build_balance(&data, child_id)))
}

/// Removes the day's log if one exists, otherwise records the day as done.
/// Returns the resulting completion state.
fn apply_toggle(
    data: &mut AppData,
    child_id: Uuid,
    objective_id: Uuid,
    date: NaiveDate,
) -> Result<bool, AppError> {
    require_child(data, child_id)?;
    require_objective_for(data, child_id, objective_id)?;

    let existing = data.daily_logs.iter().position(|log| {
        log.child_id == child_id && log.objective_id == objective_id && log.date == date
    });
    match existing {
        Some(index) => {
            data.daily_logs.remove(index);
            Ok(false)
        }
        None => {
            data.daily_logs.push(CompletionLog {
                id: Uuid::new_v4(),
                objective_id,
                child_id,
                date,
                is_completed: true,
            });
            Ok(true)
        }
    }
}

/// Records the exclusion unless it already exists. Returns whether anything changed.
fn apply_exclusion(
    data: &mut AppData,
    child_id: Uuid,
    objective_id: Uuid,
    monday: NaiveDate,
) -> Result<bool, AppError> {
    require_child(data, child_id)?;
    require_objective_for(data, child_id, objective_id)?;

    let exclusion = WeeklyExclusion {
        objective_id,
        child_id,
        week_start: monday,
    };
    if data.exclusions.contains(&exclusion) {
        return Ok(false);
    }
    info!(%child_id, %objective_id, week_start = %monday, "objective excluded for week");
    data.exclusions.push(exclusion);
    Ok(true)
}

/// Dates whose week cannot be laid out on the calendar are rejected before
/// they reach storage or scoring.
fn require_window(date: NaiveDate) -> Result<NaiveDate, AppError> {
    checked_window(date).ok_or_else(|| AppError::bad_request(format!("date {date} is out of range")))
}

fn require_child(data: &AppData, child_id: Uuid) -> Result<(), AppError> {
    data.child(child_id)
        .map(|_| ())
        .ok_or_else(|| AppError::not_found("child not found"))
}

fn require_objective_for(data: &AppData, child_id: Uuid, objective_id: Uuid) -> Result<(), AppError> {
    data.objective(objective_id)
        .filter(|obj| is_owned_by(obj, child_id))
        .map(|_| ())
        .ok_or_else(|| AppError::not_found("objective not found"))
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}
