//! Plan catalog handler.

use axum::extract::State;
use axum::Json;

use vidai_models::Plan;

use crate::state::AppState;

/// List all subscription plans. Public: the pricing page reads this.
pub async fn list_plans(State(state): State<AppState>) -> Json<Vec<Plan>> {
    Json(state.limits.catalog().plans().cloned().collect())
}
