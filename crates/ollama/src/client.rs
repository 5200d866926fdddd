//! The Ollama HTTP client.

use std::time::Duration;

use futures::StreamExt;
use serde::{Deserialize, Serialize};

/// Fixed timeout for every call to the generation server. A slow model is
/// cut off rather than holding the gateway request open indefinitely.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from the generation server or the transport to it.
///
/// These are always propagated to the caller as typed values, never
/// swallowed into placeholder answer text.
#[derive(Debug, thiserror::Error)]
pub enum OllamaError {
    /// Transport-level failure (connect, timeout, body read).
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success HTTP status.
    #[error("Upstream returned HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The response body could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),
}

/// Body for `POST /api/generate`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    /// Base64-encoded images for multimodal models.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    pub stream: bool,
}

/// One model entry from `GET /api/tags`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub modified_at: String,
    pub size: i64,
    pub digest: String,
}

/// One chunk of a generate response. Both the single-shot body and every
/// NDJSON stream line deserialize to this shape.
#[derive(Debug, Deserialize)]
struct GenerateChunk {
    #[serde(default)]
    response: String,
    #[serde(default)]
    done: bool,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    models: Vec<ModelInfo>,
}

/// Client for one Ollama instance.
pub struct OllamaClient {
    base_url: String,
    http: reqwest::Client,
}

impl OllamaClient {
    /// Create a client targeting `base_url` (e.g. `http://127.0.0.1:11434`).
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        }
    }

    /// HTTP base URL of the generation server.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Generate text for a prompt, returning the trimmed answer.
    ///
    /// With `stream: false` the server answers with a single JSON body whose
    /// `response` field is the whole answer. With `stream: true` it sends
    /// newline-delimited JSON chunks; the chunks' `response` fields are
    /// concatenated until the server marks the stream done.
    pub async fn generate(&self, request: &GenerateRequest) -> Result<String, OllamaError> {
        let url = format!("{}/api/generate", self.base_url);

        tracing::debug!(
            model = %request.model,
            prompt_len = request.prompt.len(),
            stream = request.stream,
            "Relaying prompt to generation server"
        );

        let response = self.http.post(&url).json(request).send().await?;
        let response = check_status(response).await?;

        let answer = if request.stream {
            read_stream(response).await?
        } else {
            let chunk: GenerateChunk = response
                .json()
                .await
                .map_err(|e| OllamaError::Decode(e.to_string()))?;
            chunk.response
        };

        Ok(answer.trim().to_string())
    }

    /// List the models available on the generation server.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>, OllamaError> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self.http.get(&url).send().await?;
        let response = check_status(response).await?;

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| OllamaError::Decode(e.to_string()))?;

        tracing::debug!(count = tags.models.len(), "Fetched model list");
        Ok(tags.models)
    }
}

/// Map a non-success status to [`OllamaError::Status`] with the body text.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, OllamaError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(OllamaError::Status { status, body })
}

/// Consume an NDJSON stream, concatenating the `response` field of each
/// chunk until `done` or end of stream.
async fn read_stream(response: reqwest::Response) -> Result<String, OllamaError> {
    let mut answer = String::new();
    let mut buffer = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        buffer.extend_from_slice(&chunk?);

        // Chunks are not guaranteed to align with line boundaries; consume
        // every complete line and keep the remainder buffered.
        while let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = buffer.drain(..=pos).collect();
            if append_line(&line, &mut answer)? {
                return Ok(answer);
            }
        }
    }

    // Trailing data without a final newline.
    if !buffer.is_empty() {
        append_line(&buffer, &mut answer)?;
    }

    Ok(answer)
}

/// Parse one NDJSON line into `answer`. Returns `true` when the server
/// marked the stream done.
fn append_line(line: &[u8], answer: &mut String) -> Result<bool, OllamaError> {
    let text = std::str::from_utf8(line)
        .map_err(|e| OllamaError::Decode(e.to_string()))?
        .trim();
    if text.is_empty() {
        return Ok(false);
    }

    let chunk: GenerateChunk =
        serde_json::from_str(text).map_err(|e| OllamaError::Decode(e.to_string()))?;
    answer.push_str(&chunk.response);
    Ok(chunk.done)
}
