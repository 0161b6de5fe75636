//! Resource Graph
//!
//! Derives a typed object-graph model from per-resource JSON schemas and a
//! document describing which properties of a resource refer to other resources.
//!
//! The core question for every relationship is whether a property path yields
//! one value or many. Paths are walked through the schema's `properties`,
//! `items`, `$ref`s and `oneOf`/`anyOf` unions, collecting a [`TypeSignature`]
//! per branch; a path is an array when every branch passed through an array.
//!
//! # Example
//!
//! ```
//! use resource_graph::{is_array, follow_path, TypeSignature};
//! use serde_json::json;
//!
//! let schema = json!({
//!     "typeName": "AWS::EC2::Instance",
//!     "properties": {
//!         "SubnetId": { "type": "string" },
//!         "SecurityGroupIds": { "type": "array", "items": { "type": "string" } }
//!     }
//! });
//!
//! assert!(!is_array("SubnetId", &schema).unwrap());
//! assert!(is_array("SecurityGroupIds", &schema).unwrap());
//!
//! let signatures = follow_path("SubnetId", &schema).unwrap();
//! assert!(signatures.contains(&(TypeSignature::OBJECT | TypeSignature::STRING)));
//! ```
//!
//! # Output
//!
//! | Relationship | `returnType` | `genericType` |
//! |--------------|--------------|---------------|
//! | single value | `Option<T>` | `T` |
//! | array | `Vec<T>` | `Vec<T>` |
//!
//! `T` is the target's generated type name, the placeholder `Node` for targets
//! without relationships of their own, or a union named
//! `<Source>Connections_<Path>` when several targets remain.

mod classifier;
mod config;
mod error;
mod fragment;
mod linter;
mod loader;
mod model;
mod names;
mod relationships;
mod resolver;
mod translator;
mod types;
mod validator;

pub use classifier::{classify_path, is_array, PathClass};
pub use config::TranslatorConfig;
pub use error::{DocumentIssue, LoadError, SchemaError, TranslateError};
pub use fragment::{declared_kinds, Fragment, Resolution};
pub use linter::{
    check, check_resource, CheckResult, Diagnostic, ResourceReport, ResourceStatus, Severity,
};
pub use loader::{
    is_url, load_document, load_document_auto, load_document_str, load_relationships,
    load_schema_dir,
};
pub use model::{EdgeTarget, ResourceProperty, ResourceRelationship, ResourceType, ResourceUnion};
pub use names::{pascal_to_snake, path_to_pascal, to_pascal_case, ResourceName};
pub use relationships::{
    apply_overrides, has_relationships, AllRelationships, Filter, Overrides, Reference,
    Relationship, Resource,
};
pub use resolver::{
    definition_pointer, extract_definition_name, follow_path, resolve_ref, resolve_union, step,
};
pub use translator::{
    translate_all, translate_all_with, translate_resource, ResourceOutcome, ResourceTranslation,
    Translation,
};
pub use types::{JsonType, Keyword, SchemaSet, TypeSignature, PLACEHOLDER_TYPE_NAME};
pub use validator::{relationship_document_schema, validate_against_schema, validate_relationships};

#[cfg(feature = "remote")]
pub use loader::load_document_url;
