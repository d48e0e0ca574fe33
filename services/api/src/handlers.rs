//! Axum Handlers for the REST API
//!
//! This module contains the logic for handling HTTP conversation turns and the
//! health probe. It uses `utoipa` doc comments to generate OpenAPI documentation.

use axum::{
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::{error, warn};

use crate::{
    models::{ConversationRequest, ConversationResponse, ErrorResponse, HealthResponse},
    state::AppState,
};

#[derive(Debug)]
pub enum ApiError {
    /// The request body could not be turned into a valid request.
    InvalidRequest(StatusCode, String),
    /// The conversation agent failed; carries the text the client may see.
    AgentFailure(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InvalidRequest(status, detail) => {
                (status, Json(ErrorResponse { detail })).into_response()
            }
            ApiError::AgentFailure(detail) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse { detail }),
            )
                .into_response(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequest(rejection.status(), rejection.body_text())
    }
}

/// Submit one conversation turn and receive the agent's reply.
#[utoipa::path(
    post,
    path = "/conversation",
    request_body = ConversationRequest,
    responses(
        (status = 200, description = "Agent replied", body = ConversationResponse),
        (status = 400, description = "Malformed JSON body", body = ErrorResponse),
        (status = 422, description = "Request failed validation", body = ErrorResponse),
        (status = 500, description = "The agent failed to respond", body = ErrorResponse)
    )
)]
pub async fn handle_conversation(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ConversationRequest>, JsonRejection>,
) -> Result<Json<ConversationResponse>, ApiError> {
    let Json(request) = payload.inspect_err(|rejection| {
        warn!(error = %rejection.body_text(), "Rejected conversation request");
    })?;

    if request.customer_id.trim().is_empty() {
        return Err(ApiError::InvalidRequest(
            StatusCode::UNPROCESSABLE_ENTITY,
            "customer_id must not be empty".to_string(),
        ));
    }

    let reply = state
        .generate_response(&request.customer_id, &request.message, request.context)
        .await
        .map_err(|e| {
            error!(customer_id = %request.customer_id, error = %e, "Agent failed to respond");
            ApiError::AgentFailure(state.client_error_detail(&e))
        })?;

    Ok(Json(ConversationResponse::from(reply)))
}

/// Report liveness and the number of active conversations.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let active = state.agent.active_conversations().await;
    Json(HealthResponse::healthy(active))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_agent_failure_maps_to_500_with_detail() {
        let response = ApiError::AgentFailure("model offline".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"detail": "model offline"})
        );
    }

    #[tokio::test]
    async fn test_invalid_request_keeps_status() {
        let response = ApiError::InvalidRequest(
            StatusCode::UNPROCESSABLE_ENTITY,
            "missing field `message`".to_string(),
        )
        .into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body_json(response).await["detail"],
            "missing field `message`"
        );
    }
}
