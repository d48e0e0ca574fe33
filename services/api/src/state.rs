//! Shared Application State
//!
//! This module defines the `AppState` struct, which holds the conversation agent
//! every handler delegates to, plus the few policies applied around agent calls.

use std::sync::Arc;
use std::time::Duration;
use webagent_core::{AgentError, AgentReply, Context, ConversationAgent};

/// Client-facing text used in place of raw error detail when redaction is enabled.
pub const REDACTED_ERROR_DETAIL: &str = "An internal server error occurred.";

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub agent: Arc<dyn ConversationAgent>,
    /// Upper bound on a single agent call; `None` waits indefinitely.
    pub agent_timeout: Option<Duration>,
    pub redact_error_detail: bool,
}

impl AppState {
    pub fn new(agent: Arc<dyn ConversationAgent>) -> Self {
        Self {
            agent,
            agent_timeout: None,
            redact_error_detail: false,
        }
    }

    pub fn with_agent_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.agent_timeout = timeout;
        self
    }

    pub fn with_error_redaction(mut self, redact: bool) -> Self {
        self.redact_error_detail = redact;
        self
    }

    /// Runs one conversation turn against the agent, honouring the configured timeout.
    pub async fn generate_response(
        &self,
        customer_id: &str,
        message: &str,
        context: Option<Context>,
    ) -> Result<AgentReply, AgentError> {
        let call = self.agent.generate_response(customer_id, message, context);
        match self.agent_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| AgentError::Timeout(limit))?,
            None => call.await,
        }
    }

    /// The error text a client is allowed to see for an agent failure.
    pub fn client_error_detail(&self, err: &AgentError) -> String {
        if self.redact_error_detail {
            REDACTED_ERROR_DETAIL.to_string()
        } else {
            err.to_string()
        }
    }
}
