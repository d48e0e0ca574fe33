//! Defines the WebSocket message protocol between the browser client and the API server.
//!
//! Server frames are the agent's raw [`webagent_core::AgentReply`] serialized as
//! JSON, so only the inbound side needs its own type.

use serde::Deserialize;
use webagent_core::Context;

/// A text frame sent from the client (browser) to the server.
#[derive(Deserialize, Debug)]
pub struct ClientFrame {
    /// The customer's utterance.
    pub message: String,
    /// Optional per-turn context; a missing or `null` value means an empty map.
    #[serde(default)]
    pub context: Option<Context>,
}

impl ClientFrame {
    /// The context to hand to the agent, defaulting to an empty map.
    pub fn context_or_empty(&mut self) -> Context {
        self.context.take().unwrap_or_default()
    }
}
