//! Axum Router Configuration
//!
//! This module defines the complete HTTP routing for the application,
//! including the REST API, WebSocket endpoint, CORS policy and OpenAPI documentation.

use crate::{
    handlers,
    models::{ConversationRequest, ConversationResponse, ErrorResponse, HealthResponse},
    state::AppState,
    ws::ws_handler,
};

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::handle_conversation,
        handlers::health_check,
    ),
    components(
        schemas(ConversationRequest, ConversationResponse, HealthResponse, ErrorResponse)
    ),
    tags(
        (name = "Web Agent API", description = "Conversation gateway for the customer-facing web agent")
    )
)]
pub struct ApiDoc;

/// Cross-origin policy: any origin, method and header, with credentials.
///
/// A wildcard cannot be combined with credentials, so each allowance mirrors
/// what the request asked for.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Creates the main Axum router for the application.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .route("/conversation", post(handlers::handle_conversation))
        .route("/health", get(handlers::health_check))
        .route("/ws/conversation/{customer_id}", get(ws_handler))
        .with_state(app_state);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_router)
        .layer(cors_layer())
}
