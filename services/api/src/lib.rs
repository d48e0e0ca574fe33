//! Web Agent API Library Crate
//!
//! This library contains the gateway between web clients and the conversation
//! agent: application state, REST handlers, the WebSocket channel, and routing.
//! The `api` binary is a thin wrapper around this library.

pub mod config;
pub mod handlers;
pub mod models;
pub mod router;
pub mod state;
pub mod ws;
