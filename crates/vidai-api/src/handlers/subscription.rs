//! Subscription usage handlers.

use axum::extract::State;
use axum::Json;
use chrono::Utc;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::SubscriptionInfo;
use crate::state::AppState;

/// Get the caller's subscription plan and usage stats.
pub async fn get_subscription_info(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<SubscriptionInfo>> {
    let record = state
        .limits
        .get_or_create_user(&user.user_id, &user.email)
        .await?;
    let info = state.limits.subscription_info(&record, Utc::now()).await?;
    Ok(Json(info))
}
