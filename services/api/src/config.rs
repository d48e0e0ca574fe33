use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Defines the supported backends for the conversation agent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AgentProvider {
    OpenAI,
    Echo,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub agent_id: String,
    pub agent_mode: String,
    pub provider: AgentProvider,
    pub openai_api_key: Option<String>,
    pub openai_api_base: String,
    pub chat_model: String,
    pub chat_temperature: f32,
    pub agent_timeout: Option<Duration>,
    pub redact_error_detail: bool,
    pub log_level: Level,
}

fn invalid(var: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue(var.to_string(), reason.into())
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| invalid("BIND_ADDRESS", e.to_string()))?;

        let agent_id = std::env::var("AGENT_ID").unwrap_or_else(|_| "web_agent_1".to_string());
        let agent_mode = std::env::var("AGENT_MODE").unwrap_or_else(|_| "web".to_string());

        let provider_str = std::env::var("AGENT_PROVIDER").unwrap_or_else(|_| "openai".to_string());
        let provider = match provider_str.to_lowercase().as_str() {
            "openai" => AgentProvider::OpenAI,
            "echo" => AgentProvider::Echo,
            other => {
                return Err(invalid(
                    "AGENT_PROVIDER",
                    format!("'{}' is not one of 'openai', 'echo'", other),
                ));
            }
        };

        let openai_api_key = std::env::var("OPENAI_API_KEY").ok();
        let openai_api_base = std::env::var("OPENAI_API_BASE")
            .unwrap_or_else(|_| "https://api.openai.com/v1/".to_string());

        let chat_model = std::env::var("CHAT_MODEL").unwrap_or_else(|_| "gpt-4".to_string());

        let chat_temperature = match std::env::var("CHAT_TEMPERATURE") {
            Ok(raw) => {
                let value = raw
                    .parse::<f32>()
                    .map_err(|e| invalid("CHAT_TEMPERATURE", e.to_string()))?;
                if !(0.0..=2.0).contains(&value) {
                    return Err(invalid(
                        "CHAT_TEMPERATURE",
                        format!("{} is outside 0.0..=2.0", value),
                    ));
                }
                value
            }
            Err(_) => 0.7,
        };

        let agent_timeout = match std::env::var("AGENT_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs = raw
                    .parse::<u64>()
                    .map_err(|e| invalid("AGENT_TIMEOUT_SECS", e.to_string()))?;
                if secs == 0 {
                    return Err(invalid("AGENT_TIMEOUT_SECS", "must be greater than zero"));
                }
                Some(Duration::from_secs(secs))
            }
            Err(_) => None,
        };

        let redact_error_detail = match std::env::var("REDACT_ERROR_DETAIL") {
            Ok(raw) => match raw.to_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(invalid(
                        "REDACT_ERROR_DETAIL",
                        format!("'{}' is not a boolean", raw),
                    ));
                }
            },
            Err(_) => false,
        };

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            invalid(
                "RUST_LOG",
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        if provider == AgentProvider::OpenAI && openai_api_key.is_none() {
            return Err(ConfigError::MissingVar(
                "OPENAI_API_KEY must be set for 'openai' provider".to_string(),
            ));
        }

        Ok(Self {
            bind_address,
            agent_id,
            agent_mode,
            provider,
            openai_api_key,
            openai_api_base,
            chat_model,
            chat_temperature,
            agent_timeout,
            redact_error_detail,
            log_level,
        })
    }
}
