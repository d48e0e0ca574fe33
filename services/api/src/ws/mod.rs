//! WebSocket Conversation Channel
//!
//! This module handles real-time conversations over WebSockets. It is split into:
//!
//! - `protocol`: Defines the JSON frames a client sends on the channel.
//! - `session`: Manages the connection lifecycle, from upgrade to close.

pub mod protocol;
pub mod session;

pub use session::ws_handler;
