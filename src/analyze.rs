//! Analysis entry points: normalized image → structured [`AnalysisResult`].
//!
//! This layer owns the request/response contract: it assembles the
//! provider request (instruction texts, schema, fixed temperature),
//! validates the response against the schema types, and classifies every
//! provider failure into one of the user-facing error kinds. Each call is
//! a single attempt — errors are reported upward for a human-triggered
//! retry, never retried here.

use crate::config::AnalysisConfig;
use crate::error::MediScanError;
use crate::pipeline;
use crate::prompts::{analysis_prompt, SYSTEM_INSTRUCTION};
use crate::provider::{AnalysisProvider, GeminiProvider, ProviderError, ProviderRequest};
use crate::schema::analysis_response_schema;
use crate::types::{AnalysisRequest, AnalysisResult, NormalizedImage, SourceFile};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Sampling temperature for every analysis request.
///
/// Fixed low to favour consistent, literal extraction over creative
/// variation. Not exposed to end users.
pub const ANALYSIS_TEMPERATURE: f32 = 0.2;

/// Analyze a normalized document image, optionally answering a specific
/// question.
///
/// # Errors
/// * [`MediScanError::MissingInput`] — `image` is `None`; returned
///   immediately, no network call is made.
/// * [`MediScanError::InvalidCredentials`] / [`MediScanError::NetworkFailure`] /
///   [`MediScanError::AnalysisFailed`] — classified provider failures.
/// * [`MediScanError::MalformedResponse`] — the provider answered, but not
///   with schema-conformant JSON.
pub async fn analyze(
    image: Option<&NormalizedImage>,
    question: &str,
    config: &AnalysisConfig,
) -> Result<AnalysisResult, MediScanError> {
    let image = image.ok_or(MediScanError::MissingInput)?;
    let provider = resolve_provider(config);

    let request = ProviderRequest {
        image_base64: image.data.clone(),
        media_type: image.media_type.clone(),
        prompt: analysis_prompt(question),
        system_instruction: SYSTEM_INSTRUCTION.to_string(),
        response_schema: analysis_response_schema(),
        temperature: ANALYSIS_TEMPERATURE,
    };

    info!(media_type = %image.media_type, "Starting document analysis");
    let text = provider
        .submit(&request)
        .await
        .map_err(classify_provider_error)?;

    let result = parse_analysis(&text)?;
    debug!(document_type = %result.document_type, "Analysis complete");
    Ok(result)
}

/// Analyze a pre-assembled [`AnalysisRequest`].
///
/// Convenience for callers that carry the image/question pair as one value
/// (a [`crate::session::Session`] naturally produces one per attempt).
pub async fn analyze_request(
    request: &AnalysisRequest,
    config: &AnalysisConfig,
) -> Result<AnalysisResult, MediScanError> {
    analyze(Some(&request.image), &request.question, config).await
}

/// Ingest a file from disk and analyze it in one call.
///
/// This is the primary entry point for the CLI.
pub async fn analyze_file(
    path: impl AsRef<Path>,
    question: &str,
    config: &AnalysisConfig,
) -> Result<AnalysisResult, MediScanError> {
    let image = ingest_file(path).await?;
    analyze(Some(&image), question, config).await
}

/// Read a file from disk and normalize it for analysis.
pub async fn ingest_file(path: impl AsRef<Path>) -> Result<NormalizedImage, MediScanError> {
    let file = SourceFile::from_path(path)?;
    pipeline::ingest(&file).await
}

/// Parse and validate the provider's response text.
///
/// Malformed JSON, a missing required field, an unknown `documentType`, or
/// an out-of-range confidence all surface as
/// [`MediScanError::MalformedResponse`] — never silently patched.
pub fn parse_analysis(text: &str) -> Result<AnalysisResult, MediScanError> {
    let cleaned = strip_code_fences(text);

    let result: AnalysisResult =
        serde_json::from_str(cleaned).map_err(|e| MediScanError::MalformedResponse {
            detail: e.to_string(),
        })?;
    result.validate()?;
    Ok(result)
}

/// Classify an opaque provider failure into a user-facing error kind.
///
/// Priority order matters: a credential problem must not be reported as a
/// generic failure just because its message also mentions the network.
pub fn classify_provider_error(err: ProviderError) -> MediScanError {
    let message = err.message;
    if message.contains("API key not valid") || message.contains("API_KEY_INVALID") {
        MediScanError::InvalidCredentials { detail: message }
    } else if message.to_lowercase().contains("network") {
        MediScanError::NetworkFailure { detail: message }
    } else {
        MediScanError::AnalysisFailed { detail: message }
    }
}

/// Resolve the analysis provider, from most-specific to least-specific.
///
/// 1. Pre-built provider (`config.provider`) — used as-is; the test seam.
/// 2. Explicit API key (`config.api_key`) — Gemini with that credential.
/// 3. Environment — Gemini reading `GEMINI_API_KEY`; a missing key
///    surfaces as `InvalidCredentials` on the first call.
fn resolve_provider(config: &AnalysisConfig) -> Arc<dyn AnalysisProvider> {
    if let Some(ref provider) = config.provider {
        return Arc::clone(provider);
    }

    let provider = match config.api_key {
        Some(ref key) => GeminiProvider::new(key.clone(), config.model.clone()),
        None => GeminiProvider::from_env(config.model.clone()),
    };
    let provider = match config.api_base {
        Some(ref base) => provider.with_api_base(base.clone()),
        None => provider,
    };
    Arc::new(provider)
}

/// Strip a markdown code fence wrapping the JSON payload, if present.
///
/// Schema-constrained calls normally return bare JSON, but fenced output
/// still occurs occasionally and is trivially recoverable.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let without_prefix = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_prefix
        .strip_suffix("```")
        .unwrap_or(without_prefix)
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_priority_order() {
        let e = classify_provider_error(ProviderError::new(
            "API key not valid. Please pass a valid API key.",
        ));
        assert!(matches!(e, MediScanError::InvalidCredentials { .. }));

        // Credential beats network when both appear.
        let e = classify_provider_error(ProviderError::new(
            "network error: API key not valid for this project",
        ));
        assert!(matches!(e, MediScanError::InvalidCredentials { .. }));

        let e = classify_provider_error(ProviderError::new("Network unreachable"));
        assert!(matches!(e, MediScanError::NetworkFailure { .. }));

        let e = classify_provider_error(ProviderError::new("candidate blocked: SAFETY"));
        assert!(matches!(e, MediScanError::AnalysisFailed { .. }));
    }

    #[test]
    fn fence_stripping() {
        assert_eq!(strip_code_fences("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("  {\"a\":1}  "), "{\"a\":1}");
    }

    #[test]
    fn parse_rejects_missing_diagnosis() {
        let text = r#"{
            "documentType": "Prescription",
            "documentSummary": "A prescription.",
            "recommendations": []
        }"#;
        let err = parse_analysis(text).unwrap_err();
        assert!(matches!(err, MediScanError::MalformedResponse { .. }));
    }

    #[test]
    fn parse_rejects_out_of_range_confidence() {
        let text = r#"{
            "documentType": "Lab Report",
            "documentSummary": "s",
            "potentialDiagnosis": {"condition": "c", "reasoning": "r", "confidenceScore": 1.5},
            "recommendations": []
        }"#;
        let err = parse_analysis(text).unwrap_err();
        assert!(matches!(err, MediScanError::MalformedResponse { .. }));
    }

    #[test]
    fn parse_accepts_fenced_response() {
        let text = "```json\n{\"documentType\": \"Lab Report\", \"documentSummary\": \"s\", \
                    \"potentialDiagnosis\": {\"condition\": \"c\", \"reasoning\": \"r\", \
                    \"confidenceScore\": 0.73}, \"recommendations\": [\"rest\"]}\n```";
        let result = parse_analysis(text).unwrap();
        assert_eq!(result.potential_diagnosis.confidence_score, 0.73);
        assert_eq!(result.potential_diagnosis.confidence_percent(), 73);
    }
}
