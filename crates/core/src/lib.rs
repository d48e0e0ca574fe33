//! Conversation agent contract shared by the web agent gateway.
//!
//! The gateway never looks inside an agent: it hands over a customer id, a
//! message and an optional context map, and relays whatever comes back. This
//! crate defines that boundary ([`agent::ConversationAgent`]) together with two
//! reference agents and the LLM client they build on.

pub mod agent;
pub mod error;
pub mod llm_client;

pub use agent::{
    AgentConfig, AgentReply, Context, ConversationAgent, EchoAgent, LlmAgent, LlmConfig,
};
pub use error::AgentError;
