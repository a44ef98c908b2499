//! The response schema attached to every analysis request.
//!
//! The analysis service is asked for `application/json` output constrained
//! to this schema. Field names, the required/optional split, and the
//! numeric-range wording are load-bearing: [`crate::types::AnalysisResult`]
//! deserialises exactly what this schema makes the model produce, and any
//! replacement provider must be given an equivalent constraint.
//!
//! The descriptions are part of the contract too — they steer what the
//! model puts in each field, not just how it is shaped.

use serde_json::{json, Value};

/// Build the structured-output schema for one analysis request.
pub fn analysis_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "documentType": {
                "type": "STRING",
                "description": "Classify the document into one of the following categories: 'Lab Report', 'Prescription', 'Medicine Label', or 'Other Medical Document'.",
            },
            "documentSummary": {
                "type": "STRING",
                "description": "A brief, one-paragraph summary of the provided document's content and purpose.",
            },
            "labResults": {
                "type": "ARRAY",
                "description": "An array of all identified lab results. Omit if not a lab report.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "testName": { "type": "STRING", "description": "The name of the lab test." },
                        "value": { "type": "STRING", "description": "The patient's result for the test." },
                        "referenceRange": { "type": "STRING", "description": "The normal or reference range for the test." },
                        "interpretation": { "type": "STRING", "description": "A simple explanation of what the result means (e.g., 'Normal', 'High', 'Low')." },
                    },
                    "required": ["testName", "value", "referenceRange", "interpretation"],
                },
            },
            "medications": {
                "type": "ARRAY",
                "description": "An array of all identified medications. Omit if no medications are listed.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING", "description": "The name of the medication." },
                        "dosage": { "type": "STRING", "description": "The prescribed dosage (e.g., '500mg, twice daily')." },
                        "purpose": { "type": "STRING", "description": "The reason or condition this medication is prescribed for." },
                    },
                    "required": ["name", "dosage", "purpose"],
                },
            },
            "potentialDiagnosis": {
                "type": "OBJECT",
                "description": "The most likely diagnosis based on the provided document.",
                "properties": {
                    "condition": { "type": "STRING", "description": "The name of the potential condition or diagnosis." },
                    "reasoning": { "type": "STRING", "description": "A detailed explanation of how the document's information supports this diagnosis." },
                    "confidenceScore": { "type": "NUMBER", "description": "A score from 0.0 to 1.0 indicating confidence in this diagnosis." },
                },
                "required": ["condition", "reasoning", "confidenceScore"],
            },
            "recommendations": {
                "type": "ARRAY",
                "description": "A list of general, non-prescriptive next steps or recommendations.",
                "items": { "type": "STRING" },
            },
        },
        "required": ["documentType", "documentSummary", "potentialDiagnosis", "recommendations"],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_split_matches_contract() {
        let schema = analysis_response_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(
            required,
            vec!["documentType", "documentSummary", "potentialDiagnosis", "recommendations"]
        );
        // The conditional arrays are declared but never required.
        assert!(schema["properties"]["labResults"].is_object());
        assert!(schema["properties"]["medications"].is_object());
        assert!(!required.contains(&"labResults"));
        assert!(!required.contains(&"medications"));
    }

    #[test]
    fn diagnosis_fields_all_required() {
        let schema = analysis_response_schema();
        let diag = &schema["properties"]["potentialDiagnosis"];
        let required: Vec<&str> = diag["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(required, vec!["condition", "reasoning", "confidenceScore"]);
        assert_eq!(
            diag["properties"]["confidenceScore"]["type"],
            "NUMBER"
        );
    }

    #[test]
    fn confidence_range_is_stated() {
        let schema = analysis_response_schema();
        let desc = schema["properties"]["potentialDiagnosis"]["properties"]["confidenceScore"]
            ["description"]
            .as_str()
            .unwrap();
        assert!(desc.contains("0.0 to 1.0"));
    }

    #[test]
    fn document_type_categories_enumerated() {
        let schema = analysis_response_schema();
        let desc = schema["properties"]["documentType"]["description"]
            .as_str()
            .unwrap();
        for category in [
            "Lab Report",
            "Prescription",
            "Medicine Label",
            "Other Medical Document",
        ] {
            assert!(desc.contains(category), "missing category: {category}");
        }
    }
}
