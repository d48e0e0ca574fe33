//! Manages the WebSocket connection lifecycle for a customer conversation.

use super::protocol::ClientFrame;
use crate::state::AppState;
use axum::{
    extract::{
        Path, State,
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade, close_code},
    },
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;
use webagent_core::AgentError;

/// Close reasons share a 125-byte control frame with the 2-byte status code.
const MAX_CLOSE_REASON_BYTES: usize = 123;

/// Why a conversation channel ended abnormally.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Transport(#[from] axum::Error),
    #[error("expected a text frame, received {0}")]
    UnexpectedFrame(&'static str),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Agent(#[from] AgentError),
}

impl SessionError {
    /// The close reason shown to the client.
    fn close_reason(&self, state: &AppState) -> String {
        match self {
            SessionError::Agent(err) => state.client_error_detail(err),
            other => other.to_string(),
        }
    }
}

/// Axum handler to upgrade an HTTP connection to a WebSocket bound to one customer.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(customer_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, customer_id, state))
}

/// Main handler for an individual WebSocket connection.
///
/// Runs the conversation loop and, if it fails, closes the connection with
/// code 1001 and the error text as reason.
#[instrument(
    name = "ws_conversation",
    skip_all,
    fields(customer_id = %customer_id, connection_id = %Uuid::new_v4())
)]
async fn handle_socket(mut socket: WebSocket, customer_id: String, state: Arc<AppState>) {
    info!("WebSocket connection accepted.");

    match run_conversation(&mut socket, &customer_id, &state).await {
        Ok(()) => info!("Client ended the conversation."),
        Err(e) => {
            warn!(error = %e, "Closing conversation abnormally.");
            let reason = e.close_reason(&state);
            let frame = CloseFrame {
                code: close_code::AWAY,
                reason: truncate_close_reason(&reason).to_string().into(),
            };
            if let Err(send_err) = socket.send(Message::Close(Some(frame))).await {
                debug!(error = %send_err, "Could not deliver close frame.");
            }
        }
    }
}

/// Receives frames one at a time and answers each before reading the next.
async fn run_conversation(
    socket: &mut WebSocket,
    customer_id: &str,
    state: &AppState,
) -> Result<(), SessionError> {
    while let Some(msg) = socket.recv().await {
        let text = match msg? {
            Message::Text(text) => text,
            Message::Binary(_) => return Err(SessionError::UnexpectedFrame("binary data")),
            Message::Ping(_) | Message::Pong(_) => continue,
            Message::Close(_) => return Ok(()),
        };

        let mut frame: ClientFrame = serde_json::from_str(text.as_str())?;
        let context = frame.context_or_empty();

        let reply = state
            .generate_response(customer_id, &frame.message, Some(context))
            .await
            .inspect_err(|e| error!(error = %e, "Agent failed to respond"))?;

        let payload = serde_json::to_string(&reply)?;
        socket.send(Message::Text(payload.into())).await?;
    }
    Ok(())
}

/// Cuts a close reason down to the protocol limit without splitting a character.
fn truncate_close_reason(reason: &str) -> &str {
    if reason.len() <= MAX_CLOSE_REASON_BYTES {
        return reason;
    }
    let mut end = MAX_CLOSE_REASON_BYTES;
    while !reason.is_char_boundary(end) {
        end -= 1;
    }
    &reason[..end]
}
