//! Data model: input files, the normalized image payload, and the
//! structured analysis contract.
//!
//! [`AnalysisResult`] and its sub-structs are the authoritative contract
//! with the external analysis service. Wire names are camelCase and the
//! required/optional split matters: `documentType`, `documentSummary`,
//! `potentialDiagnosis`, and `recommendations` are always present, while
//! `labResults` and `medications` appear only when the document actually
//! contains that data. Anyone swapping providers must reproduce these
//! field names and constraints exactly.

use crate::error::MediScanError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Media type of the PDF input branch.
pub const PDF_MIME: &str = "application/pdf";

/// Media type every rasterized PDF page is normalized to.
pub const JPEG_MIME: &str = "image/jpeg";

// ── Input side ────────────────────────────────────────────────────────────

/// What kind of input a declared media type maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaKind {
    /// Any `image/*` subtype; passed through unchanged.
    Image,
    /// Exactly `application/pdf`; rasterized to JPEG.
    Pdf,
    /// Everything else; rejected with `UnsupportedFileKind`.
    Unsupported,
}

impl MediaKind {
    /// Classify a declared media type string.
    pub fn from_media_type(media_type: &str) -> Self {
        if media_type.starts_with("image/") {
            MediaKind::Image
        } else if media_type == PDF_MIME {
            MediaKind::Pdf
        } else {
            MediaKind::Unsupported
        }
    }
}

/// A user-supplied file: raw bytes plus the declared media type.
///
/// Lives only for the duration of the session; superseded wholesale on a
/// new selection and never persisted.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Raw file contents.
    pub bytes: Vec<u8>,
    /// Declared media type, e.g. `image/png` or `application/pdf`.
    pub media_type: String,
    /// Original file name, for display only.
    pub file_name: String,
}

impl SourceFile {
    pub fn new(bytes: Vec<u8>, media_type: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            bytes,
            media_type: media_type.into(),
            file_name: file_name.into(),
        }
    }

    /// Read a file from disk, inferring the media type from its extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, MediScanError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::PermissionDenied => MediScanError::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => MediScanError::FileNotFound {
                path: path.to_path_buf(),
            },
        })?;

        let media_type = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or("application/octet-stream")
            .to_string();

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            bytes,
            media_type,
            file_name,
        })
    }

    /// Classify this file's declared media type.
    pub fn kind(&self) -> MediaKind {
        MediaKind::from_media_type(&self.media_type)
    }
}

/// The canonical single-page image payload sent for analysis.
///
/// Always represents exactly one page or image — PDFs are reduced to their
/// first page during ingestion. Replaced wholesale on every new upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedImage {
    /// Base64-encoded image content (standard alphabet, padded).
    pub data: String,
    /// Concrete raster media subtype: the input's own subtype for images,
    /// always `image/jpeg` for rasterized PDFs.
    pub media_type: String,
    /// Transient preview reference for display; not part of the analysis
    /// contract.
    pub preview: Option<String>,
}

impl NormalizedImage {
    /// Render the payload as a `data:` URI (the preview representation).
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}

/// A normalized image plus the user's optional free-text question.
///
/// An empty question means "general analysis".
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub image: NormalizedImage,
    pub question: String,
}

impl AnalysisRequest {
    pub fn new(image: NormalizedImage, question: impl Into<String>) -> Self {
        Self {
            image,
            question: question.into(),
        }
    }
}

// ── Analysis contract ─────────────────────────────────────────────────────

/// Document classification produced by the analysis service.
///
/// The response schema constrains the provider to exactly these four
/// strings; anything else fails parsing as a malformed response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentType {
    #[serde(rename = "Lab Report")]
    LabReport,
    #[serde(rename = "Prescription")]
    Prescription,
    #[serde(rename = "Medicine Label")]
    MedicineLabel,
    #[serde(rename = "Other Medical Document")]
    OtherMedicalDocument,
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DocumentType::LabReport => "Lab Report",
            DocumentType::Prescription => "Prescription",
            DocumentType::MedicineLabel => "Medicine Label",
            DocumentType::OtherMedicalDocument => "Other Medical Document",
        };
        f.write_str(s)
    }
}

/// One extracted lab test result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabResult {
    pub test_name: String,
    pub value: String,
    pub reference_range: String,
    /// Plain-language reading of the value, e.g. "Normal", "High", "Low".
    pub interpretation: String,
}

/// One extracted medication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medication {
    pub name: String,
    /// e.g. "500mg, twice daily".
    pub dosage: String,
    pub purpose: String,
}

/// The most likely diagnosis, grounded strictly in document evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PotentialDiagnosis {
    pub condition: String,
    pub reasoning: String,
    /// Confidence in the closed interval [0.0, 1.0].
    pub confidence_score: f64,
}

impl PotentialDiagnosis {
    /// Confidence rendered as a whole percentage (0.73 → 73).
    pub fn confidence_percent(&self) -> u8 {
        (self.confidence_score * 100.0).round() as u8
    }
}

/// Structured analysis of one medical document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub document_type: DocumentType,
    pub document_summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lab_results: Option<Vec<LabResult>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medications: Option<Vec<Medication>>,
    pub potential_diagnosis: PotentialDiagnosis,
    pub recommendations: Vec<String>,
}

impl AnalysisResult {
    /// Lab results, treating empty-present and absent as the same
    /// "no data" state.
    pub fn lab_results(&self) -> Option<&[LabResult]> {
        self.lab_results.as_deref().filter(|r| !r.is_empty())
    }

    /// Medications, treating empty-present and absent as the same
    /// "no data" state.
    pub fn medications(&self) -> Option<&[Medication]> {
        self.medications.as_deref().filter(|m| !m.is_empty())
    }

    /// Check invariants the schema promises but serde cannot enforce.
    pub fn validate(&self) -> Result<(), MediScanError> {
        let score = self.potential_diagnosis.confidence_score;
        if !(0.0..=1.0).contains(&score) || score.is_nan() {
            return Err(MediScanError::MalformedResponse {
                detail: format!("confidenceScore {score} is outside [0.0, 1.0]"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_kind_classification() {
        assert_eq!(MediaKind::from_media_type("image/png"), MediaKind::Image);
        assert_eq!(MediaKind::from_media_type("image/jpeg"), MediaKind::Image);
        assert_eq!(MediaKind::from_media_type("image/webp"), MediaKind::Image);
        assert_eq!(MediaKind::from_media_type("application/pdf"), MediaKind::Pdf);
        assert_eq!(
            MediaKind::from_media_type("text/plain"),
            MediaKind::Unsupported
        );
        assert_eq!(
            MediaKind::from_media_type("application/zip"),
            MediaKind::Unsupported
        );
        // Prefix must match exactly: "imagery/..." is not an image.
        assert_eq!(
            MediaKind::from_media_type("imagery/png"),
            MediaKind::Unsupported
        );
    }

    #[test]
    fn document_type_wire_names() {
        let t: DocumentType = serde_json::from_str("\"Lab Report\"").unwrap();
        assert_eq!(t, DocumentType::LabReport);
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"Lab Report\"");

        let t: DocumentType = serde_json::from_str("\"Other Medical Document\"").unwrap();
        assert_eq!(t, DocumentType::OtherMedicalDocument);

        assert!(serde_json::from_str::<DocumentType>("\"Invoice\"").is_err());
    }

    #[test]
    fn analysis_result_camel_case_round_trip() {
        let json = r#"{
            "documentType": "Lab Report",
            "documentSummary": "A routine blood panel.",
            "labResults": [
                {"testName": "WBC", "value": "11.2", "referenceRange": "4.0-10.0", "interpretation": "High"}
            ],
            "potentialDiagnosis": {
                "condition": "Possible infection",
                "reasoning": "Elevated white blood cell count.",
                "confidenceScore": 0.73
            },
            "recommendations": ["Consult your physician."]
        }"#;

        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.document_type, DocumentType::LabReport);
        assert_eq!(result.lab_results().unwrap()[0].test_name, "WBC");
        assert_eq!(result.lab_results().unwrap()[0].reference_range, "4.0-10.0");
        assert!(result.medications().is_none());
        assert_eq!(result.potential_diagnosis.confidence_score, 0.73);

        let back = serde_json::to_value(&result).unwrap();
        assert_eq!(back["documentSummary"], "A routine blood panel.");
        assert_eq!(back["labResults"][0]["testName"], "WBC");
        assert!(
            back.get("medications").is_none(),
            "absent optional array must stay absent on the wire"
        );
    }

    #[test]
    fn empty_present_equals_absent() {
        let with_empty = AnalysisResult {
            document_type: DocumentType::Prescription,
            document_summary: "A prescription.".into(),
            lab_results: Some(vec![]),
            medications: None,
            potential_diagnosis: PotentialDiagnosis {
                condition: "n/a".into(),
                reasoning: "n/a".into(),
                confidence_score: 0.5,
            },
            recommendations: vec![],
        };
        assert!(with_empty.lab_results().is_none());
        assert!(with_empty.medications().is_none());
    }

    #[test]
    fn confidence_percent_is_exact() {
        let d = PotentialDiagnosis {
            condition: "x".into(),
            reasoning: "y".into(),
            confidence_score: 0.73,
        };
        assert_eq!(d.confidence_percent(), 73);
    }

    #[test]
    fn validate_rejects_out_of_range_confidence() {
        let mut result = AnalysisResult {
            document_type: DocumentType::OtherMedicalDocument,
            document_summary: "doc".into(),
            lab_results: None,
            medications: None,
            potential_diagnosis: PotentialDiagnosis {
                condition: "x".into(),
                reasoning: "y".into(),
                confidence_score: 1.2,
            },
            recommendations: vec![],
        };
        assert!(result.validate().is_err());

        result.potential_diagnosis.confidence_score = 1.0;
        assert!(result.validate().is_ok());

        result.potential_diagnosis.confidence_score = 0.0;
        assert!(result.validate().is_ok());

        result.potential_diagnosis.confidence_score = -0.01;
        assert!(result.validate().is_err());
    }

    #[test]
    fn missing_required_field_fails() {
        // potentialDiagnosis omitted entirely.
        let json = r#"{
            "documentType": "Prescription",
            "documentSummary": "A prescription.",
            "recommendations": []
        }"#;
        assert!(serde_json::from_str::<AnalysisResult>(json).is_err());
    }

    #[test]
    fn data_uri_format() {
        let img = NormalizedImage {
            data: "aGVsbG8=".into(),
            media_type: "image/png".into(),
            preview: None,
        };
        assert_eq!(img.to_data_uri(), "data:image/png;base64,aGVsbG8=");
    }
}
