//! Application state.

use std::sync::Arc;

use vidai_models::PlanCatalog;
use vidai_store::{MemoryStore, ProjectStore, UserStore};

use crate::config::ApiConfig;
use crate::services::{
    GenerationPipeline, ImageGenerator, LimitService, OutlineScriptGenerator,
    PlaceholderImageGenerator, ScriptGenerator,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub users: Arc<dyn UserStore>,
    pub projects: Arc<dyn ProjectStore>,
    pub limits: LimitService,
    pub pipeline: GenerationPipeline,
}

impl AppState {
    /// Create application state with explicit collaborators.
    pub fn new(
        config: ApiConfig,
        catalog: Arc<PlanCatalog>,
        users: Arc<dyn UserStore>,
        projects: Arc<dyn ProjectStore>,
        script: Arc<dyn ScriptGenerator>,
        image: Arc<dyn ImageGenerator>,
    ) -> Self {
        let limits = LimitService::new(catalog, Arc::clone(&users), Arc::clone(&projects));
        let pipeline = GenerationPipeline::new(Arc::clone(&projects), script, image);
        Self {
            config,
            users,
            projects,
            limits,
            pipeline,
        }
    }

    /// State backed by the in-memory store and built-in generators.
    /// Used by local development and the integration tests.
    pub fn in_memory(config: ApiConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(
            config,
            Arc::new(PlanCatalog::builtin()),
            Arc::clone(&store) as Arc<dyn UserStore>,
            store as Arc<dyn ProjectStore>,
            Arc::new(OutlineScriptGenerator),
            Arc::new(PlaceholderImageGenerator::default()),
        )
    }
}
