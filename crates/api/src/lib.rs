//! The Imagia HTTP API: axum surface in front of the quota engine, the
//! Ollama relay, and the user store.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod ops_log;
pub mod response;
pub mod router;
pub mod routes;
pub mod sms;
pub mod state;
