//! Plan and usage service.
//!
//! Wires the plan catalog, resolver, and enforcer to the project store:
//! request handlers go through this service for every admission decision so
//! the "missing plan ⇒ baseline" fallback and the fresh usage count are
//! applied uniformly.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use vidai_models::{
    cycle_start, AdmissionDecision, DurationDecision, FeatureValue, LimitEnforcer, PlanCatalog,
    UserRecord, VideoLimit, BASELINE_PLAN_ID,
};
use vidai_store::{ProjectStore, UserStore};

use crate::error::{ApiError, ApiResult};

/// Subscription usage summary returned to the frontend.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionInfo {
    pub subscription_plan: String,
    pub plan_name: String,
    pub video_limit: VideoLimit,
    pub videos_created_this_month: u64,
    pub videos_remaining: VideoLimit,
    pub max_duration_seconds: u32,
    pub features: BTreeMap<String, FeatureValue>,
    /// 0 for unlimited plans.
    pub usage_percentage: f64,
}

/// Service for plan resolution, usage counting, and limit decisions.
#[derive(Clone)]
pub struct LimitService {
    enforcer: LimitEnforcer,
    users: Arc<dyn UserStore>,
    projects: Arc<dyn ProjectStore>,
}

impl LimitService {
    pub fn new(
        catalog: Arc<PlanCatalog>,
        users: Arc<dyn UserStore>,
        projects: Arc<dyn ProjectStore>,
    ) -> Self {
        Self {
            enforcer: LimitEnforcer::new(catalog),
            users,
            projects,
        }
    }

    pub fn catalog(&self) -> &PlanCatalog {
        self.enforcer.catalog()
    }

    /// Fetch the caller's record, creating a baseline-plan record on first
    /// contact (registration default).
    pub async fn get_or_create_user(&self, user_id: &str, email: &str) -> ApiResult<UserRecord> {
        if let Some(user) = self.users.get_user(user_id).await? {
            return Ok(user);
        }
        let user = UserRecord::new(user_id, email);
        self.users.upsert_user(&user).await?;
        info!(user_id = %user_id, "Created new user");
        Ok(user)
    }

    /// Videos created by `user_id` in the cycle containing `as_of`.
    ///
    /// Recomputed from the store on every call so the check always reflects
    /// the latest persisted state.
    pub async fn usage_this_cycle(&self, user_id: &str, as_of: DateTime<Utc>) -> ApiResult<u64> {
        Ok(self
            .projects
            .count_projects_since(user_id, cycle_start(as_of))
            .await?)
    }

    /// Admission check for one new video.
    ///
    /// This check and the caller's subsequent project insert are not atomic:
    /// concurrent requests from one user can over-admit by the number of
    /// in-flight requests. Accepted given low per-user concurrency.
    pub async fn check_admission(
        &self,
        user: &UserRecord,
        as_of: DateTime<Utc>,
    ) -> ApiResult<(String, AdmissionDecision)> {
        let plan_id = user.effective_plan_id().to_string();
        let count = self.usage_this_cycle(&user.id, as_of).await?;
        let count = u32::try_from(count).unwrap_or(u32::MAX);
        Ok((plan_id.clone(), self.enforcer.check_usage(&plan_id, count)))
    }

    /// Duration check for a requested video length.
    pub fn check_duration(&self, plan_id: &str, requested_seconds: u32) -> DurationDecision {
        self.enforcer.check_duration(plan_id, requested_seconds)
    }

    /// Read-path plan lookup: unknown ids degrade to the baseline plan.
    pub fn effective_plan<'a>(&'a self, plan_id: &str) -> ApiResult<&'a vidai_models::Plan> {
        self.catalog()
            .resolve(plan_id)
            .or_else(|| self.catalog().resolve(BASELINE_PLAN_ID))
            .ok_or_else(|| ApiError::internal("baseline plan missing from catalog"))
    }

    /// Usage summary for the subscription-info endpoint.
    pub async fn subscription_info(
        &self,
        user: &UserRecord,
        as_of: DateTime<Utc>,
    ) -> ApiResult<SubscriptionInfo> {
        let stored_plan_id = user.effective_plan_id().to_string();
        let plan = self.effective_plan(&stored_plan_id)?;
        let count = self.usage_this_cycle(&user.id, as_of).await?;

        let remaining = plan
            .video_limit
            .remaining_after(u32::try_from(count).unwrap_or(u32::MAX));
        let usage_percentage = match plan.video_limit {
            VideoLimit::Limited(limit) if limit > 0 => (count as f64 / limit as f64) * 100.0,
            _ => 0.0,
        };

        Ok(SubscriptionInfo {
            subscription_plan: plan.id.clone(),
            plan_name: plan.display_name.clone(),
            video_limit: plan.video_limit,
            videos_created_this_month: count,
            videos_remaining: remaining,
            max_duration_seconds: plan.max_duration_seconds,
            features: plan.features.clone(),
            usage_percentage,
        })
    }
}
