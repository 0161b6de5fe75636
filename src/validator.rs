//! Structural validation of relationship documents.

use serde_json::{json, Value};

use crate::error::{DocumentIssue, LoadError};

/// JSON Schema every relationship document must satisfy.
pub fn relationship_document_schema() -> Value {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "additionalProperties": {
            "type": "object",
            "properties": {
                "primaryIdentifier": {
                    "type": "array",
                    "items": { "type": "string" }
                },
                "relationships": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "additionalProperties": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "required": ["typeName"],
                                "properties": {
                                    "typeName": { "type": "string" },
                                    "attribute": { "type": "string" }
                                }
                            }
                        }
                    }
                }
            }
        }
    })
}

/// Validate a relationship document's structure.
///
/// # Errors
///
/// Returns `LoadError::InvalidDocument` with one issue per violation, each
/// carrying a JSON Pointer to the offending value.
pub fn validate_relationships(document: &Value) -> Result<(), LoadError> {
    validate_against_schema(&relationship_document_schema(), document)
}

/// Validate a document against an arbitrary JSON Schema.
///
/// # Errors
///
/// Returns `LoadError::InvalidDocument` if the document doesn't match, or if
/// `schema` itself can't be compiled.
pub fn validate_against_schema(schema: &Value, document: &Value) -> Result<(), LoadError> {
    let validator = jsonschema::validator_for(schema).map_err(|e| LoadError::InvalidDocument {
        issues: vec![DocumentIssue {
            path: String::new(),
            message: format!("invalid schema: {}", e),
        }],
    })?;

    let issues: Vec<DocumentIssue> = validator
        .iter_errors(document)
        .map(|e| DocumentIssue {
            path: e.instance_path.to_string(),
            message: e.to_string(),
        })
        .collect();

    if issues.is_empty() {
        Ok(())
    } else {
        Err(LoadError::InvalidDocument { issues })
    }
}
