//! Axum HTTP API server.
//!
//! This crate provides:
//! - Plan-gated video project creation (admission + duration checks)
//! - Subscription usage reporting
//! - JWT bearer-token verification of externally issued tokens
//! - The background scene-generation pipeline

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use services::{GenerationPipeline, LimitService};
pub use state::AppState;
