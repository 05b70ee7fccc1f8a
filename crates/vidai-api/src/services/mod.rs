//! Business logic services.

pub mod limits;
pub mod pipeline;

pub use limits::{LimitService, SubscriptionInfo};
pub use pipeline::{
    GenerationPipeline, ImageGenerator, OutlineScriptGenerator, PlaceholderImageGenerator,
    ScriptGenerator,
};
