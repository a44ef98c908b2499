//! Instruction texts sent with every analysis request.
//!
//! Centralising the prompts here serves two purposes:
//!
//! 1. **Single source of truth** — the system instruction is part of the
//!    de-facto contract with the analysis service; changing its behaviour
//!    means editing exactly one place.
//!
//! 2. **Testability** — unit tests can inspect the exact text a request
//!    will carry without constructing a provider.

/// System-level directive sent with every analysis request.
///
/// The directive pins the model to objective, document-grounded extraction
/// and to the response schema; it is never overridden per request.
pub const SYSTEM_INSTRUCTION: &str = "You are an expert AI medical document analyst. \
Your task is to interpret the provided image of a medical document (lab report, \
prescription, etc.) and return a structured JSON analysis. First, classify the \
document type. Then, be objective, precise, and extract all relevant information. \
Provide a potential diagnosis based ONLY on the evidence in the document. Conclude \
with general recommendations. Crucially, your entire response must strictly adhere \
to the provided JSON schema.";

/// Build the user-visible text part of the request.
///
/// A non-empty question is appended verbatim, quoted, as additional
/// context; an empty one means "general analysis" and adds nothing.
pub fn analysis_prompt(question: &str) -> String {
    let question = question.trim();
    if question.is_empty() {
        "Analyze the following medical document.".to_string()
    } else {
        format!("Analyze the following medical document. User's specific question: \"{question}\"")
    }
}
