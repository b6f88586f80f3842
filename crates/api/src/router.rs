//! Popup API router — mounts management and public endpoints.

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use popup_store::PopupStore;

use crate::auth;
use crate::handlers::{self, ApiState};

/// Build the popup router. Mutating campaign endpoints sit behind bearer
/// auth; tracking and eligibility are public.
pub fn popup_router(store: Arc<PopupStore>) -> Router {
    let state = ApiState { store };

    Router::new()
        // Auth
        .route("/api/v1/popups/auth/login", post(handlers::handle_login))
        // Campaign management
        .route(
            "/api/v1/popups",
            get(handlers::list_campaigns).post(handlers::create_campaign),
        )
        .route(
            "/api/v1/popups/:id",
            get(handlers::get_campaign)
                .put(handlers::update_campaign)
                .delete(handlers::delete_campaign),
        )
        .route(
            "/api/v1/popups/:id/duplicate",
            post(handlers::duplicate_campaign),
        )
        // Public: storefront host
        .route("/api/v1/popups/eligible", get(handlers::eligible_campaigns))
        .route(
            "/api/v1/popups/:id/track/:kind",
            post(handlers::track_metric),
        )
        // Health
        .route("/health", get(handlers::health))
        .layer(middleware::from_fn(auth::auth_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
