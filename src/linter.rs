//! Schema checking - static analysis of resource schemas against relationship data.
//!
//! Checks every resource for:
//! - Invalid resource type names
//! - Relationships on resources with no schema
//! - Definitions that don't resolve (broken or cyclic `$ref`s)
//! - Relationship paths that don't resolve or are ambiguous

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::classifier::classify_path;
use crate::error::SchemaError;
use crate::names::ResourceName;
use crate::relationships::{AllRelationships, Filter, Resource};
use crate::resolver::{definition_pointer, resolve_ref};
use crate::types::{Keyword, SchemaSet};

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single diagnostic from checking.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: String,
    pub resource: String,
    /// Relationship path or definition pointer the issue is about.
    pub path: String,
    pub message: String,
}

/// Result of checking a single resource.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceReport {
    pub resource: String,
    pub status: ResourceStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

/// Status of a checked resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceStatus {
    Ok,
    Error,
    Warning,
}

/// Aggregated result of checking every resource.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub resources_checked: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub warnings: usize,
    pub results: Vec<ResourceReport>,
}

impl CheckResult {
    /// Returns true if no resource has errors.
    pub fn is_ok(&self) -> bool {
        self.errors == 0
    }
}

/// Check every in-filter resource that has a schema or relationship data.
///
/// Relationships are checked as given, so apply overrides first. If `strict`
/// is true, resources with warnings count as failed.
pub fn check(
    relationships: &AllRelationships,
    schemas: &SchemaSet,
    filter: &Filter,
    strict: bool,
) -> CheckResult {
    let names: BTreeSet<&String> = relationships
        .keys()
        .chain(schemas.keys())
        .filter(|name| filter.allows(name))
        .collect();

    let results: Vec<ResourceReport> = names
        .into_iter()
        .map(|name| check_resource(name, relationships.get(name), schemas.get(name), relationships))
        .collect();

    let count = |severity: Severity| {
        results
            .iter()
            .flat_map(|r| &r.diagnostics)
            .filter(|d| d.severity == severity)
            .count()
    };
    let errors = count(Severity::Error);
    let warnings = count(Severity::Warning);

    let failed = results
        .iter()
        .filter(|r| {
            if strict {
                r.status != ResourceStatus::Ok
            } else {
                r.status == ResourceStatus::Error
            }
        })
        .count();

    CheckResult {
        resources_checked: results.len(),
        passed: results.len() - failed,
        failed,
        errors,
        warnings,
        results,
    }
}

/// Check a single resource.
///
/// `relationships` is the full document, used to tell whether targets are known.
pub fn check_resource(
    name: &str,
    resource: Option<&Resource>,
    schema: Option<&Value>,
    relationships: &AllRelationships,
) -> ResourceReport {
    let mut diagnostics = Vec::new();
    let mut report = |severity: Severity, code: &str, path: &str, message: String| {
        diagnostics.push(Diagnostic {
            severity,
            code: code.to_string(),
            resource: name.to_string(),
            path: path.to_string(),
            message,
        });
    };

    if let Err(e) = ResourceName::parse(name) {
        report(Severity::Error, "E001", "", e.to_string());
    }

    if let Some(schema) = schema {
        let definitions = schema
            .get(Keyword::Definitions.as_str())
            .and_then(Value::as_object)
            .map(Map::keys)
            .into_iter()
            .flatten();
        for definition in definitions {
            let pointer = definition_pointer(definition);
            match resolve_ref(&pointer, schema) {
                Ok(_) => {}
                Err(e @ SchemaError::UnresolvableFragment { .. }) => {
                    report(Severity::Warning, "W003", &pointer, e.to_string());
                }
                Err(e) => report(Severity::Error, "E003", &pointer, e.to_string()),
            }
        }
    }

    let relationship_paths = resource
        .into_iter()
        .flat_map(|resource| &resource.relationships)
        .flatten();
    for (path, references) in relationship_paths {
        if references.is_empty() {
            report(
                Severity::Warning,
                "W002",
                path,
                "relationship has no references".to_string(),
            );
            continue;
        }
        for reference in references {
            if !relationships.contains_key(&reference.type_name) {
                report(
                    Severity::Warning,
                    "W004",
                    path,
                    format!("target {} is not in the relationship document", reference.type_name),
                );
            }
        }

        let Some(schema) = schema else {
            report(
                Severity::Error,
                "E002",
                path,
                "resource has relationships but no schema".to_string(),
            );
            break;
        };
        match classify_path(path, schema) {
            Ok(_) => {}
            Err(e @ SchemaError::PathNotFound { .. }) => {
                report(Severity::Warning, "W001", path, e.to_string());
            }
            Err(e) => report(Severity::Error, "E004", path, e.to_string()),
        }
    }

    let has_errors = diagnostics.iter().any(|d| d.severity == Severity::Error);
    let has_warnings = diagnostics.iter().any(|d| d.severity == Severity::Warning);

    let status = if has_errors {
        ResourceStatus::Error
    } else if has_warnings {
        ResourceStatus::Warning
    } else {
        ResourceStatus::Ok
    };

    ResourceReport {
        resource: name.to_string(),
        status,
        diagnostics,
    }
}
