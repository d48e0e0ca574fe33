#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Barrier;
use webagent_api::{router::create_router, state::AppState};
use webagent_core::{AgentError, AgentReply, Context, ConversationAgent};

/// One invocation observed by [`StubAgent`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub customer_id: String,
    pub message: String,
    pub context: Option<Context>,
}

enum Behaviour {
    /// Reply with `echo: <message>` and the received context as metadata.
    Echo,
    Fixed(AgentReply),
    Fail(String),
}

/// Scriptable agent that records every call it receives.
pub struct StubAgent {
    behaviour: Behaviour,
    active: usize,
    delay: Option<Duration>,
    barrier: Option<Arc<Barrier>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl StubAgent {
    fn with_behaviour(behaviour: Behaviour) -> Self {
        Self {
            behaviour,
            active: 0,
            delay: None,
            barrier: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn echoing() -> Self {
        Self::with_behaviour(Behaviour::Echo)
    }

    pub fn replying(reply: AgentReply) -> Self {
        Self::with_behaviour(Behaviour::Fixed(reply))
    }

    pub fn failing(message: &str) -> Self {
        Self::with_behaviour(Behaviour::Fail(message.to_string()))
    }

    pub fn with_active(mut self, active: usize) -> Self {
        self.active = active;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Every call waits on the barrier before answering.
    pub fn with_barrier(mut self, barrier: Arc<Barrier>) -> Self {
        self.barrier = Some(barrier);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConversationAgent for StubAgent {
    async fn generate_response(
        &self,
        customer_id: &str,
        message: &str,
        context: Option<Context>,
    ) -> Result<AgentReply, AgentError> {
        self.calls.lock().unwrap().push(RecordedCall {
            customer_id: customer_id.to_string(),
            message: message.to_string(),
            context: context.clone(),
        });

        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.behaviour {
            Behaviour::Echo => {
                let mut metadata = Context::new();
                metadata.insert("context".to_string(), json!(context));
                Ok(AgentReply::new(format!("echo: {message}")).with_metadata(metadata))
            }
            Behaviour::Fixed(reply) => Ok(reply.clone()),
            Behaviour::Fail(text) => Err(AgentError::backend(text.clone())),
        }
    }

    async fn active_conversations(&self) -> usize {
        self.active
    }
}

pub fn app(agent: Arc<StubAgent>) -> Router {
    app_with_state(AppState::new(agent))
}

pub fn app_with_state(state: AppState) -> Router {
    create_router(Arc::new(state))
}

/// Serves the router on an ephemeral local port.
pub async fn spawn_server(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}
