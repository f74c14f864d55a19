use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/ui/toggle", post(handlers::ui_toggle))
        .route("/ui/exclude", post(handlers::ui_exclude))
        .route(
            "/api/children",
            get(handlers::list_children).post(handlers::create_child),
        )
        .route("/api/children/:id", delete(handlers::delete_child))
        .route("/api/children/:id/toggle", post(handlers::toggle_log))
        .route("/api/children/:id/exclusions", post(handlers::exclude_objective))
        .route(
            "/api/children/:id/transactions",
            get(handlers::list_transactions).post(handlers::create_transaction),
        )
        .route("/api/children/:id/week", get(handlers::get_week))
        .route("/api/children/:id/balance", get(handlers::get_balance))
        .route(
            "/api/objectives",
            get(handlers::list_objectives).post(handlers::create_objective),
        )
        .route("/api/objectives/:id", delete(handlers::delete_objective))
        .with_state(state)
}
