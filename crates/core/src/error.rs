use std::time::Duration;

/// Failure raised by a conversation agent.
///
/// The gateway collapses every variant into a single client-facing error, so the
/// `Display` text is what callers end up seeing.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// Anything that went wrong inside the agent or its language model backend.
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
    /// The agent did not answer within the configured deadline.
    #[error("agent did not respond within {0:?}")]
    Timeout(Duration),
}

impl AgentError {
    /// Convenience constructor for agents that fail with a plain message.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(anyhow::anyhow!(message.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_displays_inner_message() {
        let err = AgentError::backend("model overloaded");
        assert_eq!(err.to_string(), "model overloaded");
    }

    #[test]
    fn timeout_error_mentions_deadline() {
        let err = AgentError::Timeout(Duration::from_secs(5));
        assert_eq!(err.to_string(), "agent did not respond within 5s");
    }
}
