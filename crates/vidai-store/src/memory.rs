//! In-memory store for tests and local development.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use vidai_models::{Scene, UserRecord, VideoProject, VideoStatus};

use crate::error::{StoreError, StoreResult};
use crate::traits::{ProjectStore, UserStore};

/// HashMap-backed implementation of the storage traits.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, UserRecord>>,
    projects: RwLock<HashMap<String, VideoProject>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get_user(&self, user_id: &str) -> StoreResult<Option<UserRecord>> {
        Ok(self.users.read().await.get(user_id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn upsert_user(&self, user: &UserRecord) -> StoreResult<()> {
        self.users
            .write()
            .await
            .insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn set_subscription_plan(&self, user_id: &str, plan_id: &str) -> StoreResult<bool> {
        let mut users = self.users.write().await;
        match users.get_mut(user_id) {
            Some(user) => {
                user.subscription_plan = Some(plan_id.to_string());
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn insert_project(&self, project: &VideoProject) -> StoreResult<()> {
        let mut projects = self.projects.write().await;
        if projects.contains_key(&project.id) {
            return Err(StoreError::AlreadyExists(project.id.clone()));
        }
        projects.insert(project.id.clone(), project.clone());
        Ok(())
    }

    async fn get_project(
        &self,
        user_id: &str,
        project_id: &str,
    ) -> StoreResult<Option<VideoProject>> {
        Ok(self
            .projects
            .read()
            .await
            .get(project_id)
            .filter(|p| p.user_id == user_id)
            .cloned())
    }

    async fn list_projects(&self, user_id: &str) -> StoreResult<Vec<VideoProject>> {
        let mut projects: Vec<VideoProject> = self
            .projects
            .read()
            .await
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(projects)
    }

    async fn delete_project(&self, user_id: &str, project_id: &str) -> StoreResult<bool> {
        let mut projects = self.projects.write().await;
        match projects.get(project_id) {
            Some(p) if p.user_id == user_id => {
                projects.remove(project_id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn count_projects_since(&self, user_id: &str, since: DateTime<Utc>) -> StoreResult<u64> {
        Ok(self
            .projects
            .read()
            .await
            .values()
            .filter(|p| p.user_id == user_id && p.created_at >= since)
            .count() as u64)
    }

    async fn update_status(
        &self,
        project_id: &str,
        status: VideoStatus,
        error_message: Option<String>,
    ) -> StoreResult<()> {
        let mut projects = self.projects.write().await;
        let project = projects
            .get_mut(project_id)
            .ok_or_else(|| StoreError::NotFound(project_id.to_string()))?;
        project.status = status;
        project.error_message = error_message;
        project.updated_at = Utc::now();
        Ok(())
    }

    async fn set_scenes(&self, project_id: &str, scenes: &[Scene]) -> StoreResult<()> {
        let mut projects = self.projects.write().await;
        let project = projects
            .get_mut(project_id)
            .ok_or_else(|| StoreError::NotFound(project_id.to_string()))?;
        project.scenes = scenes.to_vec();
        project.updated_at = Utc::now();
        Ok(())
    }

    async fn complete_project(
        &self,
        project_id: &str,
        scenes: &[Scene],
        duration_seconds: u32,
        thumbnail_url: Option<String>,
    ) -> StoreResult<()> {
        let mut projects = self.projects.write().await;
        let project = projects
            .get_mut(project_id)
            .ok_or_else(|| StoreError::NotFound(project_id.to_string()))?;
        project.status = VideoStatus::Completed;
        project.scenes = scenes.to_vec();
        project.duration_seconds = duration_seconds;
        project.thumbnail_url = thumbnail_url;
        project.error_message = None;
        project.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use vidai_models::{cycle_start, VideoLimit};

    fn project_for(user_id: &str) -> VideoProject {
        VideoProject::new(user_id, "Title", "Text", "free", VideoLimit::Limited(1))
    }

    #[tokio::test]
    async fn test_user_crud() {
        let store = MemoryStore::new();
        assert!(store.get_user("u1").await.unwrap().is_none());

        let user = UserRecord::new("u1", "u1@example.com");
        store.upsert_user(&user).await.unwrap();

        let fetched = store.get_user("u1").await.unwrap().unwrap();
        assert_eq!(fetched.email, "u1@example.com");
        assert!(fetched.subscription_plan.is_none());

        let by_email = store
            .get_user_by_email("u1@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, "u1");

        assert!(store.set_subscription_plan("u1", "starter").await.unwrap());
        let updated = store.get_user("u1").await.unwrap().unwrap();
        assert_eq!(updated.subscription_plan.as_deref(), Some("starter"));

        assert!(!store.set_subscription_plan("ghost", "starter").await.unwrap());
    }

    #[tokio::test]
    async fn test_project_insert_and_ownership() {
        let store = MemoryStore::new();
        let project = project_for("u1");
        store.insert_project(&project).await.unwrap();

        // Duplicate id is rejected.
        assert!(matches!(
            store.insert_project(&project).await,
            Err(StoreError::AlreadyExists(_))
        ));

        // Another user cannot see or delete it.
        assert!(store.get_project("u2", &project.id).await.unwrap().is_none());
        assert!(!store.delete_project("u2", &project.id).await.unwrap());

        assert!(store.get_project("u1", &project.id).await.unwrap().is_some());
        assert!(store.delete_project("u1", &project.id).await.unwrap());
        assert!(store.get_project("u1", &project.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_projects_newest_first() {
        let store = MemoryStore::new();
        let mut first = project_for("u1");
        first.created_at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let mut second = project_for("u1");
        second.created_at = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
        store.insert_project(&first).await.unwrap();
        store.insert_project(&second).await.unwrap();
        store.insert_project(&project_for("u2")).await.unwrap();

        let projects = store.list_projects("u1").await.unwrap();
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].id, second.id);
        assert_eq!(projects[1].id, first.id);
    }

    #[tokio::test]
    async fn test_count_respects_cycle_boundary() {
        let store = MemoryStore::new();
        let as_of = Utc.with_ymd_and_hms(2025, 4, 15, 12, 0, 0).unwrap();

        let mut last_month = project_for("u1");
        last_month.created_at = Utc.with_ymd_and_hms(2025, 3, 31, 23, 59, 59).unwrap();
        let mut this_month = project_for("u1");
        this_month.created_at = Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap();
        store.insert_project(&last_month).await.unwrap();
        store.insert_project(&this_month).await.unwrap();

        let count = store
            .count_projects_since("u1", cycle_start(as_of))
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_status_and_completion_writes() {
        let store = MemoryStore::new();
        let project = project_for("u1");
        store.insert_project(&project).await.unwrap();

        store
            .update_status(&project.id, VideoStatus::GeneratingScript, None)
            .await
            .unwrap();
        let p = store.get_project("u1", &project.id).await.unwrap().unwrap();
        assert_eq!(p.status, VideoStatus::GeneratingScript);

        let scenes = vec![Scene {
            scene_number: 1,
            description: "d".to_string(),
            narration: "n".to_string(),
            image_prompt: "p".to_string(),
            image_url: Some("https://img.example/1.png".to_string()),
            duration_seconds: 5,
        }];
        store
            .complete_project(&project.id, &scenes, 5, scenes[0].image_url.clone())
            .await
            .unwrap();

        let p = store.get_project("u1", &project.id).await.unwrap().unwrap();
        assert_eq!(p.status, VideoStatus::Completed);
        assert_eq!(p.duration_seconds, 5);
        assert_eq!(p.thumbnail_url.as_deref(), Some("https://img.example/1.png"));

        store
            .update_status(&project.id, VideoStatus::Failed, Some("boom".to_string()))
            .await
            .unwrap();
        let p = store.get_project("u1", &project.id).await.unwrap().unwrap();
        assert_eq!(p.status, VideoStatus::Failed);
        assert_eq!(p.error_message.as_deref(), Some("boom"));

        assert!(matches!(
            store.update_status("ghost", VideoStatus::Failed, None).await,
            Err(StoreError::NotFound(_))
        ));
    }
}
