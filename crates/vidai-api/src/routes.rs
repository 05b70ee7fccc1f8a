//! API routes.

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::health::health;
use crate::handlers::plans::list_plans;
use crate::handlers::subscription::get_subscription_info;
use crate::handlers::videos::{
    create_video_project, delete_project, get_project, list_projects,
};
use crate::middleware::{cors_layer, request_id, request_logging, security_headers};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    let video_routes = Router::new()
        .route("/video/generate", post(create_video_project))
        .route("/video/projects", get(list_projects))
        .route(
            "/video/projects/:project_id",
            get(get_project).delete(delete_project),
        )
        .route("/video/subscription-info", get(get_subscription_info));

    // Public routes (no bearer token required)
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/plans", get(list_plans));

    Router::new()
        .nest("/api", video_routes.merge(public_routes))
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
