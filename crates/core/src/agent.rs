//! Conversation Agent Contract
//!
//! The gateway delegates every conversation turn to a [`ConversationAgent`]. This
//! module defines that contract, the reply shape agents produce, the
//! configuration they are constructed with, and two reference implementations:
//! [`LlmAgent`], backed by an [`LLMClient`], and [`EchoAgent`], a deterministic
//! agent for local development.

use crate::{
    error::AgentError,
    llm_client::{ChatMessage, LLMClient},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Open-ended key/value map attached to a conversation turn.
pub type Context = Map<String, Value>;

/// The result of one conversation turn.
///
/// Agents may attach extra top-level fields; they are kept in `extra` and
/// serialized back out flattened, so the raw reply survives a round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentReply {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Context>,
    #[serde(flatten)]
    pub extra: Context,
}

impl AgentReply {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            action: None,
            metadata: None,
            extra: Context::new(),
        }
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn with_metadata(mut self, metadata: Context) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Language model parameters an agent is constructed with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4".to_string(),
            temperature: 0.7,
        }
    }
}

/// Configuration map handed to an agent at construction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Channel the agent serves (e.g. "web").
    pub mode: String,
    pub llm_config: LlmConfig,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            mode: "web".to_string(),
            llm_config: LlmConfig::default(),
        }
    }
}

/// Defines the contract for any backend that can hold a conversation with a customer.
///
/// Implementations are shared across every request and connection, so they must
/// tolerate concurrent calls for different customers without serializing them.
#[async_trait]
pub trait ConversationAgent: Send + Sync {
    /// Produces the agent's reply to one customer message.
    ///
    /// # Arguments
    ///
    /// * `customer_id` - Identifier of the customer the turn belongs to.
    /// * `message` - The customer's utterance.
    /// * `context` - Optional caller-supplied key/value data, passed through unvalidated.
    async fn generate_response(
        &self,
        customer_id: &str,
        message: &str,
        context: Option<Context>,
    ) -> Result<AgentReply, AgentError>;

    /// Number of customers with an active conversation.
    async fn active_conversations(&self) -> usize;
}

const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful customer service agent. \
Answer the customer's questions clearly and concisely.";

/// Upper bound on remembered messages per customer (user and assistant turns).
const MAX_HISTORY_MESSAGES: usize = 20;

#[derive(Debug, Default)]
struct CallSession {
    history: Vec<ChatMessage>,
    turns: u64,
}

/// An agent that answers through a language model and remembers recent turns per customer.
pub struct LlmAgent {
    agent_id: String,
    config: AgentConfig,
    llm_client: Arc<dyn LLMClient>,
    system_prompt: String,
    active_calls: RwLock<HashMap<String, CallSession>>,
}

impl LlmAgent {
    /// Creates a new LLM-backed agent.
    ///
    /// # Arguments
    ///
    /// * `agent_id` - Identifier reported in reply metadata.
    /// * `config` - Mode tag and model parameters.
    /// * `llm_client` - Client used to generate completions.
    pub fn new(
        agent_id: impl Into<String>,
        config: AgentConfig,
        llm_client: Arc<dyn LLMClient>,
    ) -> Self {
        Self {
            agent_id: agent_id.into(),
            config,
            llm_client,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            active_calls: RwLock::new(HashMap::new()),
        }
    }

    /// Replaces the default system prompt.
    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    fn system_message(&self, context: Option<&Context>) -> ChatMessage {
        match context.filter(|ctx| !ctx.is_empty()) {
            Some(ctx) => ChatMessage::system(format!(
                "{}\n\nCustomer context:\n{}",
                self.system_prompt,
                Value::Object(ctx.clone())
            )),
            None => ChatMessage::system(self.system_prompt.clone()),
        }
    }
}

#[async_trait]
impl ConversationAgent for LlmAgent {
    async fn generate_response(
        &self,
        customer_id: &str,
        message: &str,
        context: Option<Context>,
    ) -> Result<AgentReply, AgentError> {
        // Snapshot the history so the lock is not held across the model call.
        let history = self
            .active_calls
            .read()
            .await
            .get(customer_id)
            .map(|session| session.history.clone())
            .unwrap_or_default();

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(self.system_message(context.as_ref()));
        messages.extend(history);
        messages.push(ChatMessage::user(message));

        debug!(customer_id, messages = messages.len(), "Requesting completion");
        let answer = self.llm_client.complete(messages).await?;

        let turn = {
            let mut calls = self.active_calls.write().await;
            let is_new = !calls.contains_key(customer_id);
            let session = calls.entry(customer_id.to_string()).or_default();
            session.history.push(ChatMessage::user(message));
            session.history.push(ChatMessage::assistant(answer.clone()));
            if session.history.len() > MAX_HISTORY_MESSAGES {
                let excess = session.history.len() - MAX_HISTORY_MESSAGES;
                session.history.drain(..excess);
            }
            session.turns += 1;
            if is_new {
                info!(customer_id, agent_id = %self.agent_id, "Conversation started");
            }
            session.turns
        };

        let mut metadata = Context::new();
        metadata.insert("agent_id".to_string(), json!(self.agent_id));
        metadata.insert("mode".to_string(), json!(self.config.mode));
        metadata.insert("model".to_string(), json!(self.config.llm_config.model));
        metadata.insert("turn".to_string(), json!(turn));

        Ok(AgentReply::new(answer).with_metadata(metadata))
    }

    async fn active_conversations(&self) -> usize {
        self.active_calls.read().await.len()
    }
}

/// A deterministic `ConversationAgent` for development and smoke testing.
///
/// It echoes the customer's message back, never calls out to a model, and
/// counts every customer it has seen as an active conversation.
pub struct EchoAgent {
    agent_id: String,
    active_calls: Mutex<HashSet<String>>,
}

impl EchoAgent {
    pub fn new(agent_id: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            active_calls: Mutex::new(HashSet::new()),
        }
    }
}

#[async_trait]
impl ConversationAgent for EchoAgent {
    async fn generate_response(
        &self,
        customer_id: &str,
        message: &str,
        context: Option<Context>,
    ) -> Result<AgentReply, AgentError> {
        if message.trim().is_empty() {
            return Err(AgentError::backend("message must not be empty"));
        }

        self.active_calls
            .lock()
            .map_err(|_| AgentError::backend("echo agent session lock poisoned"))?
            .insert(customer_id.to_string());

        let mut metadata = Context::new();
        metadata.insert("agent_id".to_string(), Value::from(self.agent_id.clone()));
        if let Some(ctx) = context {
            metadata.insert("context".to_string(), Value::Object(ctx));
        }

        Ok(AgentReply::new(format!("You said: {message}")).with_metadata(metadata))
    }

    async fn active_conversations(&self) -> usize {
        self.active_calls.lock().map(|calls| calls.len()).unwrap_or(0)
    }
}
