//! User account records and plan resolution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::plan::BASELINE_PLAN_ID;

/// User record as persisted by the account store.
///
/// The plan id is mutated by payment events owned by the billing integration;
/// this crate only ever reads it, and only through [`effective_plan_id`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Stored plan id. May be absent on legacy or manually edited records.
    #[serde(default)]
    pub subscription_plan: Option<String>,
    /// Billing status as reported by the payment integration.
    #[serde(default)]
    pub subscription_status: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            email: email.into(),
            name: None,
            subscription_plan: None,
            subscription_status: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Plan id to use for every limit check on this user.
    pub fn effective_plan_id(&self) -> &str {
        effective_plan_id(self.subscription_plan.as_deref())
    }
}

/// Map a stored subscription field to a usable plan id.
///
/// Missing and empty values fall back to the baseline plan. Callers must go
/// through this instead of reading the stored field directly so the fallback
/// is applied uniformly (registration defaults, legacy records, manually
/// edited documents).
pub fn effective_plan_id(stored: Option<&str>) -> &str {
    match stored {
        Some(id) if !id.trim().is_empty() => id,
        _ => BASELINE_PLAN_ID,
    }
}
