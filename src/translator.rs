//! Translation of relationship documents into the output model.
//!
//! Each resource is translated independently. Per-edge failures are collected
//! rather than aborting, so one bad schema doesn't hide the rest of the graph.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::classifier::is_array;
use crate::error::{SchemaError, TranslateError};
use crate::model::{EdgeTarget, ResourceRelationship, ResourceType, ResourceUnion};
use crate::names::{pascal_to_snake, path_to_pascal, ResourceName};
use crate::relationships::{has_relationships, AllRelationships, Filter, Reference};
use crate::types::{SchemaSet, PLACEHOLDER_TYPE_NAME};

/// What became of a single resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceOutcome {
    Translated(ResourceType),
    /// The resource has no in-filter relationships and is represented by the
    /// placeholder type.
    Placeholder,
}

/// A translated resource plus the edge errors met along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceTranslation {
    pub outcome: ResourceOutcome,
    pub errors: Vec<TranslateError>,
}

impl ResourceTranslation {
    fn placeholder() -> Self {
        ResourceTranslation {
            outcome: ResourceOutcome::Placeholder,
            errors: Vec::new(),
        }
    }
}

/// Result of translating a whole relationship document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Translation {
    /// Generated types in resource name order.
    pub resources: Vec<ResourceType>,
    #[serde(skip)]
    pub errors: Vec<TranslateError>,
}

impl Translation {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Translate one resource's relationships.
///
/// # Errors
///
/// Errors that prevent translating the resource at all are returned
/// directly: an invalid source name, a resource missing from `relationships`,
/// or a missing schema. Errors on individual edges are collected in
/// [`ResourceTranslation::errors`] and the edge is skipped.
pub fn translate_resource(
    name: &str,
    relationships: &AllRelationships,
    schemas: &SchemaSet,
    filter: &Filter,
) -> Result<ResourceTranslation, TranslateError> {
    let source = ResourceName::parse(name)?;
    let resource = relationships
        .get(name)
        .ok_or_else(|| TranslateError::UnknownResource {
            resource: name.to_string(),
        })?;

    if !has_relationships(name, relationships, filter) {
        debug!(resource = name, "no in-filter relationships, using placeholder");
        return Ok(ResourceTranslation::placeholder());
    }

    let schema = schemas
        .get(name)
        .ok_or_else(|| TranslateError::MissingSchema {
            resource: name.to_string(),
        })?;

    let mut edges = Vec::new();
    let mut errors = Vec::new();
    for relationship in &resource.relationships {
        for (path, references) in relationship {
            let edge = translate_edge(&source, path, references, relationships, filter, |path| {
                is_array(path, schema)
            });
            match edge {
                Ok(Some(edge)) => edges.push(edge),
                Ok(None) => {}
                Err(e) => {
                    warn!(resource = name, path = %path, error = %e, "skipping relationship");
                    errors.push(e);
                }
            }
        }
    }

    Ok(ResourceTranslation {
        outcome: ResourceOutcome::Translated(ResourceType::new(&source, edges)),
        errors,
    })
}

/// Build the edge for one relationship path, or `None` if nothing in the
/// filter is reachable through it.
fn translate_edge<F>(
    source: &ResourceName,
    path: &str,
    references: &[Reference],
    relationships: &AllRelationships,
    filter: &Filter,
    classify: F,
) -> Result<Option<ResourceRelationship>, TranslateError>
where
    F: FnOnce(&str) -> Result<bool, SchemaError>,
{
    if references.is_empty() {
        warn!(resource = %source, path, "relationship has no references");
        return Ok(None);
    }

    let targets: BTreeSet<&str> = references
        .iter()
        .map(|reference| reference.type_name.as_str())
        .filter(|target| filter.allows(target))
        .collect();
    if targets.is_empty() {
        debug!(resource = %source, path, "all targets filtered out");
        return Ok(None);
    }

    let is_array = classify(path).map_err(|source_error| TranslateError::Relationship {
        resource: source.to_string(),
        path: path.to_string(),
        source: source_error,
    })?;

    let mut type_names: BTreeSet<String> = BTreeSet::new();
    for target in targets {
        let type_name = if has_relationships(target, relationships, filter) {
            ResourceName::parse(target)?.as_rust()
        } else {
            PLACEHOLDER_TYPE_NAME.to_string()
        };
        type_names.insert(type_name);
    }

    let target = if type_names.len() > 1 {
        EdgeTarget::Union(ResourceUnion {
            union_name: format!("{}Connections_{}", source.as_rust(), path_to_pascal(path)),
            member_type_names: type_names,
        })
    } else if let Some(type_name) = type_names.pop_first() {
        EdgeTarget::Single(type_name)
    } else {
        return Ok(None);
    };

    let property_name = pascal_to_snake(&path.replace('/', ""));
    Ok(Some(ResourceRelationship::new(property_name, target, is_array)))
}

/// Translate every resource in `relationships`.
///
/// Failures never abort the run; they are collected in [`Translation::errors`].
pub fn translate_all(
    relationships: &AllRelationships,
    schemas: &SchemaSet,
    filter: &Filter,
) -> Translation {
    translate_all_with(relationships, schemas, filter, translate_resource)
}

/// Translate every resource with a caller-supplied per-resource translator.
///
/// Resources are visited in name order. Resources outside the filter and
/// placeholders are left out of the result.
pub fn translate_all_with<F>(
    relationships: &AllRelationships,
    schemas: &SchemaSet,
    filter: &Filter,
    translate: F,
) -> Translation
where
    F: Fn(&str, &AllRelationships, &SchemaSet, &Filter) -> Result<ResourceTranslation, TranslateError>,
{
    let mut resources = Vec::new();
    let mut errors = Vec::new();

    for name in relationships.keys() {
        if !filter.allows(name) {
            continue;
        }
        match translate(name, relationships, schemas, filter) {
            Ok(translation) => {
                if let ResourceOutcome::Translated(resource) = translation.outcome {
                    resources.push(resource);
                }
                errors.extend(translation.errors);
            }
            Err(e) => {
                warn!(resource = %name, error = %e, "skipping resource");
                errors.push(e);
            }
        }
    }

    info!(
        resources = resources.len(),
        errors = errors.len(),
        "translation finished"
    );
    Translation { resources, errors }
}
