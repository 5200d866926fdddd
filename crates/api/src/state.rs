use std::sync::Arc;

use imagia_core::verification::VerificationStore;
use imagia_ollama::OllamaClient;

use crate::config::ServerConfig;
use crate::sms::SmsClient;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: imagia_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Client for the Ollama generation server.
    pub ollama: Arc<OllamaClient>,
    /// Client for the SMS gateway.
    pub sms: Arc<SmsClient>,
    /// Pending phone-verification codes.
    pub verifications: Arc<VerificationStore>,
}
