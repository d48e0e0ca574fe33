//! Main Entrypoint for the Web Agent API Service
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment.
//! 2. Initializing logging.
//! 3. Constructing the conversation agent the gateway delegates to.
//! 4. Building the Axum router with its CORS policy.
//! 5. Starting the web server and handling graceful shutdown.

use anyhow::Context;
use std::{net::SocketAddr, sync::Arc};
use tracing::info;
use webagent_api::{
    config::{AgentProvider, Config},
    router::create_router,
    state::AppState,
};
use webagent_core::{
    AgentConfig, ConversationAgent, EchoAgent, LlmAgent, LlmConfig,
    llm_client::OpenAICompatibleClient,
};

/// Listens for the `Ctrl+C` signal to gracefully shut down the server.
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    info!("Received shutdown signal. Shutting down gracefully...");
}

/// Builds the single agent instance shared by every request and connection.
fn build_agent(config: &Config) -> anyhow::Result<Arc<dyn ConversationAgent>> {
    let agent: Arc<dyn ConversationAgent> = match &config.provider {
        AgentProvider::OpenAI => {
            info!("Using OpenAI-compatible agent.");
            let api_key = config
                .openai_api_key
                .as_deref()
                .context("OPENAI_API_KEY is required for the openai provider")?;
            let llm_client = OpenAICompatibleClient::new(
                api_key,
                &config.openai_api_base,
                config.chat_model.clone(),
                config.chat_temperature,
            );
            let agent_config = AgentConfig {
                mode: config.agent_mode.clone(),
                llm_config: LlmConfig {
                    model: config.chat_model.clone(),
                    temperature: config.chat_temperature,
                },
            };
            Arc::new(LlmAgent::new(
                config.agent_id.clone(),
                agent_config,
                Arc::new(llm_client),
            ))
        }
        AgentProvider::Echo => {
            info!("Using echo agent.");
            Arc::new(EchoAgent::new(config.agent_id.clone()))
        }
    };
    Ok(agent)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .init();
    info!("Configuration loaded. Initializing application state...");

    // --- 3. Initialize the Conversation Agent ---
    let agent = build_agent(&config)?;
    let app_state = Arc::new(
        AppState::new(agent)
            .with_agent_timeout(config.agent_timeout)
            .with_error_redaction(config.redact_error_detail),
    );

    // --- 4. Create Router ---
    let app = create_router(app_state);

    // --- 5. Start Server ---
    info!(
        provider = ?config.provider,
        agent_id = %config.agent_id,
        model = %config.chat_model,
        timeout = ?config.agent_timeout,
        bind_address = %config.bind_address,
        "Service configured. Starting server..."
    );
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server has shut down.");
    Ok(())
}
