//! Video project handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use vidai_models::{Scene, VideoLimit, VideoProject, VideoStatus};
use vidai_store::ProjectStore;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Request body for video generation.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVideoRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 5000))]
    pub input_text: String,
    /// Requested video length. Defaults to the plan's duration ceiling.
    pub duration_seconds: Option<u32>,
}

/// Project as returned to the frontend (source text omitted from lists).
#[derive(Debug, Serialize)]
pub struct VideoProjectResponse {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub status: VideoStatus,
    pub scenes: Vec<Scene>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub duration_seconds: u32,
    pub subscription_plan: String,
    pub videos_remaining: VideoLimit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<VideoProject> for VideoProjectResponse {
    fn from(p: VideoProject) -> Self {
        Self {
            id: p.id,
            user_id: p.user_id,
            title: p.title,
            status: p.status,
            scenes: p.scenes,
            video_url: p.video_url,
            thumbnail_url: p.thumbnail_url,
            duration_seconds: p.duration_seconds,
            subscription_plan: p.subscription_plan,
            videos_remaining: p.videos_remaining,
            error_message: p.error_message,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Create a video project and start generation.
///
/// Admission flow: resolve plan, check duration, check usage. Both checks are
/// always evaluated; a passing usage check never skips the duration check.
pub async fn create_video_project(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreateVideoRequest>,
) -> ApiResult<(StatusCode, Json<VideoProjectResponse>)> {
    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let record = state
        .limits
        .get_or_create_user(&user.user_id, &user.email)
        .await?;
    let as_of = Utc::now();

    let (plan_id, admission) = state.limits.check_admission(&record, as_of).await?;
    let duration = state
        .limits
        .check_duration(&plan_id, request.duration_seconds.unwrap_or(0));

    if !duration.is_valid {
        return Err(ApiError::forbidden(format!(
            "Requested duration exceeds your plan limit. Your plan allows videos up to {} seconds.",
            duration.max_duration_seconds
        )));
    }
    if !admission.can_create {
        let plan = state.limits.effective_plan(&plan_id)?;
        return Err(ApiError::forbidden(format!(
            "Video limit reached. Your {} plan allows {} videos per month. Upgrade to create more videos.",
            plan.display_name, plan.video_limit
        )));
    }

    let project = VideoProject::new(
        record.id.clone(),
        request.title,
        request.input_text.clone(),
        plan_id,
        admission.remaining.remaining_after(1),
    );
    state.projects.insert_project(&project).await?;

    let target_duration = request
        .duration_seconds
        .unwrap_or(duration.max_duration_seconds);
    state
        .pipeline
        .spawn(project.id.clone(), request.input_text, target_duration);

    info!(
        user_id = %record.id,
        project_id = %project.id,
        plan = %project.subscription_plan,
        "Admitted video project"
    );

    Ok((StatusCode::CREATED, Json(project.into())))
}

/// List the caller's projects, newest first.
pub async fn list_projects(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<Vec<VideoProjectResponse>>> {
    let projects = state.projects.list_projects(&user.user_id).await?;
    Ok(Json(projects.into_iter().map(Into::into).collect()))
}

/// Get a single project.
pub async fn get_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<String>,
) -> ApiResult<Json<VideoProjectResponse>> {
    let project = state
        .projects
        .get_project(&user.user_id, &project_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Project not found"))?;
    Ok(Json(project.into()))
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// Delete a project.
pub async fn delete_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let deleted = state
        .projects
        .delete_project(&user.user_id, &project_id)
        .await?;
    if !deleted {
        return Err(ApiError::not_found("Project not found"));
    }
    Ok(Json(DeleteResponse {
        message: "Project deleted successfully".to_string(),
    }))
}
