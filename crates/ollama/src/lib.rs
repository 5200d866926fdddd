//! HTTP client for a locally hosted Ollama-style generation server.
//!
//! Covers the two endpoints the gateway relays to: `/api/generate` for text
//! generation (single-shot or NDJSON streaming) and `/api/tags` for the
//! model listing.

mod client;

pub use client::{GenerateRequest, ModelInfo, OllamaClient, OllamaError};
