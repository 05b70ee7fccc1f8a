//! Storage traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use vidai_models::{Scene, UserRecord, VideoProject, VideoStatus};

use crate::error::StoreResult;

/// User account store.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user(&self, user_id: &str) -> StoreResult<Option<UserRecord>>;

    async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>>;

    /// Insert or replace the full user record.
    async fn upsert_user(&self, user: &UserRecord) -> StoreResult<()>;

    /// Set the stored plan id (driven by payment events). Returns `false`
    /// when the user does not exist.
    async fn set_subscription_plan(&self, user_id: &str, plan_id: &str) -> StoreResult<bool>;
}

/// Video project store.
///
/// `count_projects_since` is the single read the admission check depends on.
/// The check and the subsequent `insert_project` are not one atomic
/// transaction: two concurrent requests from the same user can both pass
/// admission before either insert is visible, over-admitting by the number of
/// in-flight requests. Accepted as bounded over-admission; a backend needing
/// exactness can implement insert as a conditional "insert if count < limit".
#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn insert_project(&self, project: &VideoProject) -> StoreResult<()>;

    async fn get_project(
        &self,
        user_id: &str,
        project_id: &str,
    ) -> StoreResult<Option<VideoProject>>;

    /// All projects for a user, newest first.
    async fn list_projects(&self, user_id: &str) -> StoreResult<Vec<VideoProject>>;

    /// Returns `false` when no project was deleted.
    async fn delete_project(&self, user_id: &str, project_id: &str) -> StoreResult<bool>;

    /// Count of projects for `user_id` with `created_at >= since`.
    async fn count_projects_since(&self, user_id: &str, since: DateTime<Utc>) -> StoreResult<u64>;

    /// Update pipeline status, clearing or setting the error message.
    async fn update_status(
        &self,
        project_id: &str,
        status: VideoStatus,
        error_message: Option<String>,
    ) -> StoreResult<()>;

    /// Persist generated scenes mid-pipeline.
    async fn set_scenes(&self, project_id: &str, scenes: &[Scene]) -> StoreResult<()>;

    /// Terminal success write: scenes with image URLs, total duration,
    /// thumbnail, status `completed`.
    async fn complete_project(
        &self,
        project_id: &str,
        scenes: &[Scene],
        duration_seconds: u32,
        thumbnail_url: Option<String>,
    ) -> StoreResult<()>;
}
