//! Shared data models for the VideoAI backend.
//!
//! This crate provides:
//! - Subscription plan catalog and limit enforcement
//! - Billing-cycle arithmetic
//! - User and video project records
//! - Serde-serializable wire types shared across crates

pub mod cycle;
pub mod limits;
pub mod plan;
pub mod project;
pub mod user;

// Re-export common types
pub use cycle::cycle_start;
pub use limits::{AdmissionDecision, DurationDecision, LimitEnforcer};
pub use plan::{CatalogError, FeatureValue, Plan, PlanCatalog, VideoLimit, BASELINE_PLAN_ID};
pub use project::{Scene, VideoProject, VideoStatus};
pub use user::{effective_plan_id, UserRecord};
