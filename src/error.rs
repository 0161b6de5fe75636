//! Error types for schema resolution, translation and loading.

use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

use crate::types::TypeSignature;

/// Errors while resolving paths through a resource schema.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("malformed reference \"{reference}\": expected #/definitions/<Name>")]
    MalformedReference { reference: String },

    #[error("unknown definition \"{name}\"")]
    UnknownDefinition { name: String },

    #[error("cannot resolve fragment {fragment}: expected type, $ref, oneOf or anyOf")]
    UnresolvableFragment { fragment: Value },

    #[error("unknown JSON type {value}")]
    UnknownJsonType { value: String },

    #[error("cyclic reference through \"{name}\"")]
    CyclicReference { name: String },

    #[error("no type found for path \"{path}\"")]
    PathNotFound { path: String },

    #[error(
        "path \"{path}\" has branches ending in both array and non-array types ({})",
        signatures.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
    )]
    AmbiguousArrayness {
        path: String,
        signatures: Vec<TypeSignature>,
    },

    #[error("error in path \"{path}\": {source}")]
    InPath {
        path: String,
        #[source]
        source: Box<SchemaError>,
    },
}

impl SchemaError {
    pub(crate) fn unresolvable(fragment: &Value) -> Self {
        SchemaError::UnresolvableFragment {
            fragment: fragment.clone(),
        }
    }

    /// Attach the path being resolved, unless one is already attached.
    pub(crate) fn in_path(self, path: &str) -> Self {
        match self {
            SchemaError::InPath { .. } => self,
            other => SchemaError::InPath {
                path: path.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// The underlying error with path context stripped.
    pub fn root_cause(&self) -> &SchemaError {
        match self {
            SchemaError::InPath { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Errors while translating relationships into the output model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TranslateError {
    #[error("invalid resource name \"{name}\": expected <Partition>::<Service>::<Resource>")]
    InvalidResourceName { name: String },

    #[error("resource {resource} not found in relationships")]
    UnknownResource { resource: String },

    #[error("no schema loaded for resource {resource}")]
    MissingSchema { resource: String },

    #[error("{resource} relationship \"{path}\": {source}")]
    Relationship {
        resource: String,
        path: String,
        #[source]
        source: SchemaError,
    },
}

/// Errors while loading documents and configuration.
#[derive(Debug, Error)]
pub enum LoadError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // Document errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("schema {path} has no typeName")]
    MissingTypeName { path: PathBuf },

    #[error("invalid relationship document: {} issue(s)", issues.len())]
    InvalidDocument { issues: Vec<DocumentIssue> },

    #[error("invalid config {path}: {source}")]
    InvalidConfig {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            #[cfg(feature = "remote")]
            LoadError::NetworkError { .. } => 3,
            _ => 2,
        }
    }
}

/// Single document validation issue with path context.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DocumentIssue {
    /// JSON Pointer (RFC 6901) to the offending value.
    pub path: String,
    /// Human-readable error message.
    pub message: String,
}

impl std::fmt::Display for DocumentIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn load_error_exit_codes() {
        let err = LoadError::FileNotFound {
            path: PathBuf::from("relationships.json"),
        };
        assert_eq!(err.exit_code(), 3);

        let err = LoadError::MissingTypeName {
            path: PathBuf::from("aws-ec2-instance.json"),
        };
        assert_eq!(err.exit_code(), 2);

        let err = LoadError::InvalidDocument { issues: vec![] };
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn in_path_wraps_once() {
        let err = SchemaError::UnknownDefinition {
            name: "Missing".into(),
        }
        .in_path("A/B")
        .in_path("ignored");

        assert!(matches!(&err, SchemaError::InPath { path, .. } if path == "A/B"));
        assert_eq!(
            err.root_cause(),
            &SchemaError::UnknownDefinition {
                name: "Missing".into()
            }
        );
    }

    #[test]
    fn unresolvable_display_includes_fragment() {
        let err = SchemaError::unresolvable(&json!({ "Unexpected": { "Stuff": "x" } }));
        assert_eq!(
            err.to_string(),
            r#"cannot resolve fragment {"Unexpected":{"Stuff":"x"}}: expected type, $ref, oneOf or anyOf"#
        );
    }

    #[test]
    fn ambiguous_display_lists_signatures() {
        let err = SchemaError::AmbiguousArrayness {
            path: "NotDefined".into(),
            signatures: vec![
                TypeSignature::OBJECT | TypeSignature::STRING,
                TypeSignature::OBJECT | TypeSignature::ARRAY,
            ],
        };
        assert_eq!(
            err.to_string(),
            "path \"NotDefined\" has branches ending in both array and non-array types (string|object, array|object)"
        );
    }

    #[test]
    fn document_issue_display() {
        let issue = DocumentIssue {
            path: "/AWS::EC2::Instance/relationships/0".into(),
            message: "\"x\" is not of type \"object\"".into(),
        };
        assert_eq!(
            issue.to_string(),
            "/AWS::EC2::Instance/relationships/0: \"x\" is not of type \"object\""
        );
    }
}
