//! API Models
//!
//! This module defines the request and response bodies of the REST API. The
//! same types drive OpenAPI generation through `utoipa`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use webagent_core::AgentReply;

/// One conversation turn submitted over REST.
#[derive(Deserialize, ToSchema, Debug, Clone)]
pub struct ConversationRequest {
    #[schema(example = "web_k3x9q2a")]
    pub customer_id: String,
    #[schema(example = "Do you ship to Canada?")]
    pub message: String,
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub context: Option<Map<String, Value>>,
}

/// The agent's answer to a conversation turn.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct ConversationResponse {
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub metadata: Option<Map<String, Value>>,
}

impl From<AgentReply> for ConversationResponse {
    fn from(reply: AgentReply) -> Self {
        Self {
            response: reply.message,
            action: reply.action,
            metadata: reply.metadata,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
    pub active_conversations: usize,
}

impl HealthResponse {
    pub fn healthy(active_conversations: usize) -> Self {
        Self {
            status: "healthy".to_string(),
            active_conversations,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct ErrorResponse {
    pub detail: String,
}
