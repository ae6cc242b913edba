//! backend_client - HTTP access to the chat backend-for-frontend
//!
//! [`BackendClient`] exposes the BFF endpoints and implements the
//! `chat_state` service traits, so it can be handed straight to the
//! dispatch coordinator.

pub mod api;
pub mod client;
pub mod error;
pub mod services;

pub use client::BackendClient;
pub use error::{ClientError, Result};
