//! Configuration for document analysis.
//!
//! Everything tunable lives in [`AnalysisConfig`], built via its builder.
//! Deliberately small: the rendering scale, JPEG quality, and sampling
//! temperature are fixed constants of the pipeline (accuracy-over-diversity
//! choices), not knobs — exposing them would invite configurations the
//! response contract was never validated against.

use crate::error::MediScanError;
use crate::provider::{AnalysisProvider, DEFAULT_MODEL};
use std::fmt;
use std::sync::Arc;

/// Configuration for one analysis session.
///
/// # Example
/// ```rust
/// use mediscan::AnalysisConfig;
///
/// let config = AnalysisConfig::builder()
///     .model("gemini-2.5-pro")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct AnalysisConfig {
    /// Model identifier. Default: `gemini-2.5-pro`.
    pub model: String,

    /// Access credential override. If `None`, read from `GEMINI_API_KEY`
    /// when the default provider is constructed.
    pub api_key: Option<String>,

    /// API base URL override (proxies, mock servers).
    pub api_base: Option<String>,

    /// Pre-constructed provider. Takes precedence over `model`/`api_key`.
    /// Useful in tests or when the caller needs custom middleware.
    pub provider: Option<Arc<dyn AnalysisProvider>>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            api_base: None,
            provider: None,
        }
    }
}

impl fmt::Debug for AnalysisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisConfig")
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_base", &self.api_base)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn AnalysisProvider>"))
            .finish()
    }
}

impl AnalysisConfig {
    /// Create a new builder for `AnalysisConfig`.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`AnalysisConfig`].
pub struct AnalysisConfigBuilder {
    config: AnalysisConfig,
}

impl AnalysisConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn api_base(mut self, base: impl Into<String>) -> Self {
        self.config.api_base = Some(base.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn AnalysisProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<AnalysisConfig, MediScanError> {
        if self.config.model.trim().is_empty() {
            return Err(MediScanError::InvalidConfig(
                "Model identifier must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_model() {
        let config = AnalysisConfig::default();
        assert_eq!(config.model, "gemini-2.5-pro");
        assert!(config.provider.is_none());
    }

    #[test]
    fn empty_model_rejected() {
        let err = AnalysisConfig::builder().model("  ").build().unwrap_err();
        assert!(matches!(err, MediScanError::InvalidConfig(_)));
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = AnalysisConfig::builder()
            .api_key("super-secret")
            .build()
            .unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
    }
}
