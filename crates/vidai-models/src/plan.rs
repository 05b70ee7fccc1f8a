//! Subscription plan catalog.
//!
//! Plan definitions are configuration data: loaded once at process start,
//! immutable thereafter. Changing a limit means a redeploy, not a runtime API.

use std::collections::{BTreeMap, HashMap};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Plan applied when a user record carries no usable plan id.
pub const BASELINE_PLAN_ID: &str = "free";

/// Wire sentinel for unlimited quotas.
const UNLIMITED: &str = "unlimited";

/// Per-cycle quota on resource-creating actions.
///
/// Serialized as a plain number, or the string `"unlimited"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoLimit {
    Limited(u32),
    Unlimited,
}

impl VideoLimit {
    pub fn is_unlimited(&self) -> bool {
        matches!(self, VideoLimit::Unlimited)
    }

    /// Whether one more action is allowed given `current_count` already used.
    ///
    /// Strictly less-than: a user at exactly the limit cannot create one more.
    pub fn allows(&self, current_count: u32) -> bool {
        match self {
            VideoLimit::Limited(limit) => current_count < *limit,
            VideoLimit::Unlimited => true,
        }
    }

    /// Quota left after `current_count` actions. Never goes negative.
    pub fn remaining_after(&self, current_count: u32) -> VideoLimit {
        match self {
            VideoLimit::Limited(limit) => VideoLimit::Limited(limit.saturating_sub(current_count)),
            VideoLimit::Unlimited => VideoLimit::Unlimited,
        }
    }
}

impl std::fmt::Display for VideoLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VideoLimit::Limited(n) => write!(f, "{n}"),
            VideoLimit::Unlimited => write!(f, "{UNLIMITED}"),
        }
    }
}

impl Serialize for VideoLimit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            VideoLimit::Limited(n) => serializer.serialize_u32(*n),
            VideoLimit::Unlimited => serializer.serialize_str(UNLIMITED),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum VideoLimitRepr {
    Count(u32),
    Text(String),
}

impl<'de> Deserialize<'de> for VideoLimit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match VideoLimitRepr::deserialize(deserializer)? {
            VideoLimitRepr::Count(n) => Ok(VideoLimit::Limited(n)),
            VideoLimitRepr::Text(s) if s.eq_ignore_ascii_case(UNLIMITED) => {
                Ok(VideoLimit::Unlimited)
            }
            VideoLimitRepr::Text(s) => Err(D::Error::custom(format!("invalid video limit: {s:?}"))),
        }
    }
}

/// Value of a single plan feature.
///
/// Feature maps are intentionally heterogeneous across plans (flags, counts,
/// quality strings, unlimited quotas), so consumers pattern-match instead of
/// duck-typing. Wire format is the natural JSON scalar, with `"unlimited"`
/// reserved for [`FeatureValue::Unlimited`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureValue {
    Bool(bool),
    Count(u32),
    Text(String),
    Unlimited,
}

impl Serialize for FeatureValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FeatureValue::Bool(b) => serializer.serialize_bool(*b),
            FeatureValue::Count(n) => serializer.serialize_u32(*n),
            FeatureValue::Text(s) => serializer.serialize_str(s),
            FeatureValue::Unlimited => serializer.serialize_str(UNLIMITED),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FeatureValueRepr {
    Bool(bool),
    Count(u32),
    Text(String),
}

impl<'de> Deserialize<'de> for FeatureValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match FeatureValueRepr::deserialize(deserializer)? {
            FeatureValueRepr::Bool(b) => FeatureValue::Bool(b),
            FeatureValueRepr::Count(n) => FeatureValue::Count(n),
            FeatureValueRepr::Text(s) if s.eq_ignore_ascii_case(UNLIMITED) => {
                FeatureValue::Unlimited
            }
            FeatureValueRepr::Text(s) => FeatureValue::Text(s),
        })
    }
}

/// A subscription tier definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// Lowercase plan identifier.
    pub id: String,
    /// Human-readable name for user-facing messages.
    pub display_name: String,
    /// Videos per billing cycle.
    pub video_limit: VideoLimit,
    /// Per-video duration ceiling in seconds.
    pub max_duration_seconds: u32,
    /// Heterogeneous feature map.
    #[serde(default)]
    pub features: BTreeMap<String, FeatureValue>,
}

/// Catalog misconfiguration. Fails at construction, never per request.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("plan id must not be empty")]
    EmptyPlanId,

    #[error("duplicate plan id '{0}'")]
    DuplicatePlanId(String),

    #[error("plan '{0}' has a zero duration ceiling")]
    ZeroDurationCeiling(String),

    #[error("plan '{0}' has a zero video limit")]
    ZeroVideoLimit(String),
}

/// Immutable lookup from plan identifier to plan definition.
///
/// Constructed once at startup and injected wherever limits are checked, so
/// test fixtures can supply their own tables.
#[derive(Debug, Clone)]
pub struct PlanCatalog {
    plans: HashMap<String, Plan>,
    // Insertion order, for stable listing in API responses.
    order: Vec<String>,
}

impl PlanCatalog {
    /// Build a catalog, validating every entry.
    pub fn new(plans: Vec<Plan>) -> Result<Self, CatalogError> {
        let mut map = HashMap::with_capacity(plans.len());
        let mut order = Vec::with_capacity(plans.len());
        for mut plan in plans {
            plan.id = plan.id.trim().to_lowercase();
            if plan.id.is_empty() {
                return Err(CatalogError::EmptyPlanId);
            }
            if plan.max_duration_seconds == 0 {
                return Err(CatalogError::ZeroDurationCeiling(plan.id));
            }
            if plan.video_limit == VideoLimit::Limited(0) {
                return Err(CatalogError::ZeroVideoLimit(plan.id));
            }
            if map.contains_key(&plan.id) {
                return Err(CatalogError::DuplicatePlanId(plan.id));
            }
            order.push(plan.id.clone());
            map.insert(plan.id.clone(), plan);
        }
        Ok(Self { plans: map, order })
    }

    /// The shipped plan table.
    pub fn builtin() -> Self {
        Self::new(builtin_plans()).expect("built-in plan catalog is valid")
    }

    /// Case-insensitive lookup. `None` means "apply baseline behavior",
    /// never a fatal condition.
    pub fn resolve(&self, plan_id: &str) -> Option<&Plan> {
        self.plans.get(plan_id.trim().to_lowercase().as_str())
    }

    /// Features of a plan, or the empty map when the id is unknown.
    pub fn features_of(&self, plan_id: &str) -> BTreeMap<String, FeatureValue> {
        self.resolve(plan_id)
            .map(|p| p.features.clone())
            .unwrap_or_default()
    }

    /// All plans in declaration order.
    pub fn plans(&self) -> impl Iterator<Item = &Plan> {
        self.order.iter().filter_map(|id| self.plans.get(id))
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}

fn features(entries: &[(&str, FeatureValue)]) -> BTreeMap<String, FeatureValue> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn builtin_plans() -> Vec<Plan> {
    use FeatureValue::{Bool, Count, Text, Unlimited};

    vec![
        Plan {
            id: "free".to_string(),
            display_name: "Free".to_string(),
            video_limit: VideoLimit::Limited(2),
            max_duration_seconds: 30,
            features: features(&[
                ("text_to_video", Bool(true)),
                ("ai_voiceover", Bool(false)),
                ("voiceover_languages", Count(0)),
                ("export_quality", Text("720p".to_string())),
                ("stock_library", Bool(false)),
                ("watermark", Bool(true)),
                ("team_members", Count(1)),
                ("api_access", Bool(false)),
            ]),
        },
        Plan {
            id: "starter".to_string(),
            display_name: "Starter".to_string(),
            video_limit: VideoLimit::Limited(5),
            max_duration_seconds: 60,
            features: features(&[
                ("text_to_video", Bool(true)),
                ("ai_voiceover", Bool(true)),
                ("voiceover_languages", Count(5)),
                ("export_quality", Text("1080p".to_string())),
                ("stock_library", Bool(true)),
                ("branding", Text("basic".to_string())),
                ("watermark", Bool(true)),
                ("team_members", Count(1)),
                ("api_access", Bool(false)),
            ]),
        },
        Plan {
            id: "professional".to_string(),
            display_name: "Professional".to_string(),
            video_limit: VideoLimit::Limited(15),
            max_duration_seconds: 300,
            features: features(&[
                ("text_to_video", Bool(true)),
                ("ai_voiceover", Bool(true)),
                ("voiceover_languages", Count(29)),
                ("export_quality", Text("4k".to_string())),
                ("stock_library", Bool(true)),
                ("branding", Text("advanced".to_string())),
                ("watermark", Bool(false)),
                ("team_members", Count(3)),
                ("api_access", Bool(false)),
                ("priority_support", Bool(true)),
            ]),
        },
        Plan {
            id: "enterprise".to_string(),
            display_name: "Enterprise".to_string(),
            video_limit: VideoLimit::Limited(20),
            max_duration_seconds: 1800,
            features: features(&[
                ("text_to_video", Bool(true)),
                ("ai_voiceover", Bool(true)),
                ("voiceover_languages", Unlimited),
                ("export_quality", Text("4k".to_string())),
                ("stock_library", Bool(true)),
                ("branding", Text("custom".to_string())),
                ("watermark", Bool(false)),
                ("team_members", Unlimited),
                ("api_access", Bool(true)),
                ("priority_support", Bool(true)),
                ("dedicated_manager", Bool(true)),
                ("custom_integrations", Bool(true)),
                ("sso", Bool(true)),
            ]),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_tiers() {
        let catalog = PlanCatalog::builtin();
        assert_eq!(catalog.len(), 4);
        for id in ["free", "starter", "professional", "enterprise"] {
            assert!(catalog.resolve(id).is_some(), "missing plan {id}");
        }
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let catalog = PlanCatalog::builtin();
        let a = catalog.resolve("FREE").expect("FREE");
        let b = catalog.resolve("Free").expect("Free");
        let c = catalog.resolve("free").expect("free");
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_resolve_unknown_is_none_not_error() {
        let catalog = PlanCatalog::builtin();
        assert!(catalog.resolve("platinum").is_none());
        assert!(catalog.resolve("").is_none());
    }

    #[test]
    fn test_features_of_unknown_is_empty() {
        let catalog = PlanCatalog::builtin();
        assert!(catalog.features_of("platinum").is_empty());
        assert!(!catalog.features_of("free").is_empty());
    }

    #[test]
    fn test_enterprise_has_unlimited_team_members() {
        let catalog = PlanCatalog::builtin();
        let plan = catalog.resolve("enterprise").expect("enterprise");
        assert_eq!(
            plan.features.get("team_members"),
            Some(&FeatureValue::Unlimited)
        );
    }

    #[test]
    fn test_catalog_rejects_duplicate_id() {
        let plan = Plan {
            id: "free".to_string(),
            display_name: "Free".to_string(),
            video_limit: VideoLimit::Limited(2),
            max_duration_seconds: 30,
            features: BTreeMap::new(),
        };
        let err = PlanCatalog::new(vec![plan.clone(), plan]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicatePlanId(id) if id == "free"));
    }

    #[test]
    fn test_catalog_rejects_zero_ceilings() {
        let mut plan = Plan {
            id: "broken".to_string(),
            display_name: "Broken".to_string(),
            video_limit: VideoLimit::Limited(1),
            max_duration_seconds: 0,
            features: BTreeMap::new(),
        };
        assert!(matches!(
            PlanCatalog::new(vec![plan.clone()]).unwrap_err(),
            CatalogError::ZeroDurationCeiling(_)
        ));

        plan.max_duration_seconds = 30;
        plan.video_limit = VideoLimit::Limited(0);
        assert!(matches!(
            PlanCatalog::new(vec![plan]).unwrap_err(),
            CatalogError::ZeroVideoLimit(_)
        ));
    }

    #[test]
    fn test_catalog_rejects_empty_id() {
        let plan = Plan {
            id: "  ".to_string(),
            display_name: "Blank".to_string(),
            video_limit: VideoLimit::Limited(1),
            max_duration_seconds: 30,
            features: BTreeMap::new(),
        };
        assert!(matches!(
            PlanCatalog::new(vec![plan]).unwrap_err(),
            CatalogError::EmptyPlanId
        ));
    }

    #[test]
    fn test_catalog_normalizes_ids() {
        let plan = Plan {
            id: " Starter ".to_string(),
            display_name: "Starter".to_string(),
            video_limit: VideoLimit::Limited(5),
            max_duration_seconds: 60,
            features: BTreeMap::new(),
        };
        let catalog = PlanCatalog::new(vec![plan]).expect("catalog");
        assert!(catalog.resolve("starter").is_some());
        assert!(catalog.resolve("STARTER").is_some());
    }

    #[test]
    fn test_video_limit_allows_strictly_below() {
        let limit = VideoLimit::Limited(2);
        assert!(limit.allows(0));
        assert!(limit.allows(1));
        assert!(!limit.allows(2));
        assert!(!limit.allows(7));
        assert!(VideoLimit::Unlimited.allows(u32::MAX));
    }

    #[test]
    fn test_video_limit_remaining_saturates() {
        let limit = VideoLimit::Limited(5);
        assert_eq!(limit.remaining_after(3), VideoLimit::Limited(2));
        assert_eq!(limit.remaining_after(5), VideoLimit::Limited(0));
        assert_eq!(limit.remaining_after(10), VideoLimit::Limited(0));
        assert_eq!(
            VideoLimit::Unlimited.remaining_after(999),
            VideoLimit::Unlimited
        );
    }

    #[test]
    fn test_video_limit_wire_format() {
        assert_eq!(
            serde_json::to_value(VideoLimit::Limited(15)).unwrap(),
            serde_json::json!(15)
        );
        assert_eq!(
            serde_json::to_value(VideoLimit::Unlimited).unwrap(),
            serde_json::json!("unlimited")
        );

        let limited: VideoLimit = serde_json::from_value(serde_json::json!(5)).unwrap();
        assert_eq!(limited, VideoLimit::Limited(5));
        let unlimited: VideoLimit = serde_json::from_value(serde_json::json!("unlimited")).unwrap();
        assert_eq!(unlimited, VideoLimit::Unlimited);
        assert!(serde_json::from_value::<VideoLimit>(serde_json::json!("lots")).is_err());
    }

    #[test]
    fn test_feature_value_wire_format() {
        assert_eq!(
            serde_json::to_value(FeatureValue::Bool(true)).unwrap(),
            serde_json::json!(true)
        );
        assert_eq!(
            serde_json::to_value(FeatureValue::Count(29)).unwrap(),
            serde_json::json!(29)
        );
        assert_eq!(
            serde_json::to_value(FeatureValue::Text("4k".to_string())).unwrap(),
            serde_json::json!("4k")
        );
        assert_eq!(
            serde_json::to_value(FeatureValue::Unlimited).unwrap(),
            serde_json::json!("unlimited")
        );

        let v: FeatureValue = serde_json::from_value(serde_json::json!("unlimited")).unwrap();
        assert_eq!(v, FeatureValue::Unlimited);
        let v: FeatureValue = serde_json::from_value(serde_json::json!("1080p")).unwrap();
        assert_eq!(v, FeatureValue::Text("1080p".to_string()));
        let v: FeatureValue = serde_json::from_value(serde_json::json!(false)).unwrap();
        assert_eq!(v, FeatureValue::Bool(false));
    }

    #[test]
    fn test_plan_serde_round_trip() {
        let catalog = PlanCatalog::builtin();
        let plan = catalog.resolve("enterprise").expect("enterprise");
        let json = serde_json::to_string(plan).expect("serialize");
        let back: Plan = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(&back, plan);
    }

    #[test]
    fn test_plans_iterates_in_declaration_order() {
        let catalog = PlanCatalog::builtin();
        let ids: Vec<&str> = catalog.plans().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["free", "starter", "professional", "enterprise"]);
    }
}
