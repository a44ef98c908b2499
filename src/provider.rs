//! The external analysis service behind a narrow seam.
//!
//! [`AnalysisProvider`] is the only surface the rest of the crate sees:
//! `submit(request) -> response text | error`. Everything provider-specific
//! (endpoint shape, auth, response unwrapping) stays inside the
//! implementation, which keeps the analysis layer testable with a stub and
//! makes swapping vendors a one-module change — as long as the replacement
//! honours the same response schema.
//!
//! Provider errors are deliberately untyped strings: the analysis layer
//! classifies them by message content into the user-facing error kinds,
//! because that is the only signal the hosted SDKs expose consistently.

use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, warn};

/// Default analysis model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-pro";

/// Base URL of the Gemini generateContent API.
const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Environment variable holding the access credential.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Opaque failure from the underlying service or transport.
///
/// The message is the classification signal; see
/// [`crate::analyze::classify_provider_error`].
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ProviderError {
    pub message: String,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// One fully-assembled outbound analysis request.
///
/// Carries everything the external call needs: the image payload, the
/// instruction texts, the response schema, and the sampling temperature.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    /// Base64-encoded image content.
    pub image_base64: String,
    /// Concrete raster media type of the image.
    pub media_type: String,
    /// User-visible text part (general analysis + optional question).
    pub prompt: String,
    /// System-level directive.
    pub system_instruction: String,
    /// Structured-output schema the response must conform to.
    pub response_schema: Value,
    /// Sampling temperature.
    pub temperature: f32,
}

/// A document-understanding service invoked via one request/response call.
///
/// Implementations return the raw response text; parsing and validation
/// against the analysis schema happen in the caller.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    async fn submit(&self, request: &ProviderRequest) -> Result<String, ProviderError>;
}

/// Google Gemini `generateContent` implementation of [`AnalysisProvider`].
///
/// The credential is read once at construction and surfaces as an error at
/// call time when missing — a deliberate parity choice, noted as a
/// possible fail-fast improvement in DESIGN.md.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    api_base: String,
}

impl GeminiProvider {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: Some(api_key.into()),
            model: model.into(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Construct from `GEMINI_API_KEY`. Infallible: a missing key becomes
    /// an `InvalidCredentials`-classified error on the first `submit`.
    pub fn from_env(model: impl Into<String>) -> Self {
        let api_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty());
        Self {
            client: reqwest::Client::new(),
            api_key,
            model: model.into(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Override the API base URL (self-hosted proxies, tests).
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// Assemble the generateContent request body.
    fn build_body(&self, request: &ProviderRequest) -> Value {
        json!({
            "systemInstruction": {
                "parts": [ { "text": request.system_instruction } ]
            },
            "contents": [{
                "parts": [
                    {
                        "inline_data": {
                            "mime_type": request.media_type,
                            "data": request.image_base64,
                        }
                    },
                    { "text": request.prompt },
                ]
            }],
            "generationConfig": {
                "temperature": request.temperature,
                "responseMimeType": "application/json",
                "responseSchema": request.response_schema,
            },
        })
    }
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[async_trait]
impl AnalysisProvider for GeminiProvider {
    async fn submit(&self, request: &ProviderRequest) -> Result<String, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            ProviderError::new(format!("API key not valid: {API_KEY_ENV} is not set"))
        })?;

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.api_base, self.model, api_key
        );
        let body = self.build_body(request);

        debug!(model = %self.model, media_type = %request.media_type, "Submitting analysis request");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::new(format!("network error: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            warn!(%status, "Analysis request rejected");
            return Err(ProviderError::new(format!(
                "API error {status}: {error_body}"
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::new(format!("network error while reading response: {e}")))?;

        let text = payload["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| {
                // Content filtering and safety blocks come back as a 200
                // with no candidate text; report the finish reason if any.
                let reason = payload["candidates"][0]["finishReason"]
                    .as_str()
                    .unwrap_or("no candidate text in response");
                ProviderError::new(format!("empty response from model: {reason}"))
            })?;

        Ok(text.to_string())
    }
}
