//! Plan limit enforcement.
//!
//! Pure decision logic over a [`PlanCatalog`]: no I/O, no hidden state.
//! "Limit exceeded" is a decision, not an error, so callers surface it as an
//! actionable message rather than logging a failure.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::plan::{PlanCatalog, VideoLimit};

/// Outcome of a usage admission check. Produced fresh per check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionDecision {
    pub can_create: bool,
    pub remaining: VideoLimit,
}

/// Outcome of a duration check.
///
/// The ceiling is returned even when invalid so callers can tell the user
/// what their plan allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationDecision {
    pub is_valid: bool,
    pub max_duration_seconds: u32,
}

/// Decides whether a new resource-creating action may proceed under a plan.
#[derive(Debug, Clone)]
pub struct LimitEnforcer {
    catalog: Arc<PlanCatalog>,
}

impl LimitEnforcer {
    pub fn new(catalog: Arc<PlanCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &PlanCatalog {
        &self.catalog
    }

    /// Check whether one more video may be created under `plan_id` given
    /// `current_count` already created this cycle.
    ///
    /// Unknown plan ids are denied here: unlike the read path, which defaults
    /// unknown plans to baseline, spending against a plan the catalog cannot
    /// resolve is never admitted.
    pub fn check_usage(&self, plan_id: &str, current_count: u32) -> AdmissionDecision {
        let Some(plan) = self.catalog.resolve(plan_id) else {
            return AdmissionDecision {
                can_create: false,
                remaining: VideoLimit::Limited(0),
            };
        };

        AdmissionDecision {
            can_create: plan.video_limit.allows(current_count),
            remaining: plan.video_limit.remaining_after(current_count),
        }
    }

    /// Check a requested video duration against the plan ceiling (inclusive).
    pub fn check_duration(&self, plan_id: &str, requested_seconds: u32) -> DurationDecision {
        let Some(plan) = self.catalog.resolve(plan_id) else {
            return DurationDecision {
                is_valid: false,
                max_duration_seconds: 0,
            };
        };

        DurationDecision {
            is_valid: requested_seconds <= plan.max_duration_seconds,
            max_duration_seconds: plan.max_duration_seconds,
        }
    }
}
