//! Path resolution - walks slash-separated property paths through a resource schema.
//!
//! Resolution fans out: a `$ref` may lead to several typed fragments through
//! unions, and a union branch may itself be a union. Every branch is carried
//! forward independently and collapses into the set of type signatures seen at
//! the end of the path.

use std::collections::BTreeSet;

use serde_json::Value;
use tracing::{debug, trace};

use crate::error::SchemaError;
use crate::fragment::{declared_kinds, Fragment, Resolution};
use crate::types::{Keyword, TypeSignature};

/// Extract the definition name from a `#/definitions/<Name>` reference.
///
/// # Errors
///
/// Returns `SchemaError::MalformedReference` unless the reference has exactly
/// three `/`-separated segments, `#` and `definitions` followed by a non-empty
/// name.
pub fn extract_definition_name(reference: &str) -> Result<&str, SchemaError> {
    let mut segments = reference.split('/');
    match (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) {
        (Some("#"), Some(section), Some(name), None)
            if section == Keyword::Definitions.as_str() && !name.is_empty() =>
        {
            Ok(name)
        }
        _ => Err(SchemaError::MalformedReference {
            reference: reference.to_string(),
        }),
    }
}

/// Build the reference string pointing at a named definition.
pub fn definition_pointer(name: &str) -> String {
    format!("#/{}/{}", Keyword::Definitions.as_str(), name)
}

/// Resolve a `$ref` to the typed fragments it stands for.
///
/// A definition that declares a `type` resolves to itself. A definition that
/// is a `$ref` or a union is expanded further.
///
/// # Errors
///
/// - `MalformedReference` if `reference` is not `#/definitions/<Name>`.
/// - `UnknownDefinition` if the schema has no such definition.
/// - `UnresolvableFragment` if the definition is neither typed, a reference
///   nor a union (this includes objects with `properties` but no `type`).
///
/// Typed fragments are returned without checking their kinds.
/// - `CyclicReference` if expansion comes back to a definition it is
///   already expanding.
pub fn resolve_ref<'a>(reference: &str, schema: &'a Value) -> Result<Vec<&'a Value>, SchemaError> {
    resolve_ref_in(reference, schema, &mut Vec::new())
}

/// Expand a list of union alternatives into typed fragments.
///
/// Order follows the branches, depth-first; duplicates are kept.
///
/// # Errors
///
/// Same as [`resolve_ref`], for any branch.
pub fn resolve_union<'a>(
    branches: &'a [Value],
    schema: &'a Value,
) -> Result<Vec<&'a Value>, SchemaError> {
    resolve_union_in(branches, schema, &mut Vec::new())
}

/// Move one property name deeper from `fragment`.
///
/// Returns every typed fragment reachable under `property`, or an empty list
/// when the property doesn't exist on this branch.
///
/// # Errors
///
/// Propagates classification and reference errors. Returns
/// `CyclicReference` if stepping re-enters an array it is already
/// stepping through.
pub fn step<'a>(
    property: &str,
    fragment: &'a Value,
    schema: &'a Value,
) -> Result<Vec<&'a Value>, SchemaError> {
    step_in(property, fragment, schema, &mut Vec::new())
}

/// Resolve a full slash-separated path to the set of type signatures it can end in.
///
/// The root contributes `object` to every signature. A branch that runs into a
/// missing property is dropped; if every branch is dropped the result is empty.
///
/// # Errors
///
/// Any error from [`step`], or `UnknownJsonType` for a fragment a step lands
/// on, wrapped in `SchemaError::InPath` naming `path`. Union branches a later
/// step drops are never checked.
pub fn follow_path(path: &str, schema: &Value) -> Result<BTreeSet<TypeSignature>, SchemaError> {
    let segments: Vec<&str> = path.split('/').collect();
    let mut signatures = BTreeSet::new();
    let mut pending = vec![(0usize, schema, TypeSignature::OBJECT)];

    while let Some((depth, fragment, signature)) = pending.pop() {
        let Some(segment) = segments.get(depth) else {
            signatures.insert(signature);
            continue;
        };

        let next = step(segment, fragment, schema).map_err(|e| e.in_path(path))?;
        if next.is_empty() {
            debug!(path, segment, "property not found on branch, dropping it");
            continue;
        }

        for fragment in next {
            let kinds = declared_kinds(fragment).map_err(|e| e.in_path(path))?;
            pending.push((depth + 1, fragment, signature | kinds));
        }
    }

    trace!(path, count = signatures.len(), "resolved path");
    Ok(signatures)
}

fn resolve_ref_in<'a>(
    reference: &str,
    schema: &'a Value,
    expanding: &mut Vec<String>,
) -> Result<Vec<&'a Value>, SchemaError> {
    let name = extract_definition_name(reference)?;
    if expanding.iter().any(|seen| seen == name) {
        return Err(SchemaError::CyclicReference {
            name: name.to_string(),
        });
    }
    let target = lookup_definition(name, schema)?;

    expanding.push(name.to_string());
    let resolved = expand(target, schema, expanding);
    expanding.pop();
    resolved
}

fn resolve_union_in<'a>(
    branches: &'a [Value],
    schema: &'a Value,
    expanding: &mut Vec<String>,
) -> Result<Vec<&'a Value>, SchemaError> {
    let mut resolved = Vec::new();
    for branch in branches {
        resolved.extend(expand(branch, schema, expanding)?);
    }
    Ok(resolved)
}

/// Reduce a fragment to the typed fragments it stands for.
fn expand<'a>(
    fragment: &'a Value,
    schema: &'a Value,
    expanding: &mut Vec<String>,
) -> Result<Vec<&'a Value>, SchemaError> {
    match Resolution::classify(fragment)? {
        Resolution::Typed => Ok(vec![fragment]),
        Resolution::Reference { pointer } => resolve_ref_in(pointer, schema, expanding),
        Resolution::Union { branches } => resolve_union_in(branches, schema, expanding),
    }
}

// Only arrays can loop here: objects and terminals end the step, and
// reference or union expansion catches its own cycles.
fn step_in<'a>(
    property: &str,
    fragment: &'a Value,
    schema: &'a Value,
    arrays: &mut Vec<&'a Value>,
) -> Result<Vec<&'a Value>, SchemaError> {
    match Fragment::classify(fragment)? {
        Fragment::Object { properties } => match properties.get(property) {
            Some(next) => expand(next, schema, &mut Vec::new()),
            None => Ok(Vec::new()),
        },
        Fragment::Terminal => Ok(Vec::new()),
        Fragment::Array { items } => {
            if arrays.iter().any(|seen| std::ptr::eq(*seen, fragment)) {
                return Err(SchemaError::CyclicReference {
                    name: definition_name_of(fragment, schema),
                });
            }
            arrays.push(fragment);
            let stepped = step_in(property, items, schema, arrays);
            arrays.pop();
            stepped
        }
        Fragment::Reference { pointer } => {
            let resolved = resolve_ref(pointer, schema)?;
            step_each(property, resolved, schema, arrays)
        }
        Fragment::Union { branches } => {
            let resolved = resolve_union(branches, schema)?;
            step_each(property, resolved, schema, arrays)
        }
    }
}

fn step_each<'a>(
    property: &str,
    fragments: Vec<&'a Value>,
    schema: &'a Value,
    arrays: &mut Vec<&'a Value>,
) -> Result<Vec<&'a Value>, SchemaError> {
    let mut stepped = Vec::new();
    for fragment in fragments {
        stepped.extend(step_in(property, fragment, schema, arrays)?);
    }
    Ok(stepped)
}

fn lookup_definition<'a>(name: &str, schema: &'a Value) -> Result<&'a Value, SchemaError> {
    schema
        .get(Keyword::Definitions.as_str())
        .and_then(Value::as_object)
        .and_then(|definitions| definitions.get(name))
        .ok_or_else(|| SchemaError::UnknownDefinition {
            name: name.to_string(),
        })
}

/// Name of the definition whose value is `fragment`, or the fragment itself
/// when it is anonymous.
fn definition_name_of(fragment: &Value, schema: &Value) -> String {
    schema
        .get(Keyword::Definitions.as_str())
        .and_then(Value::as_object)
        .and_then(|definitions| {
            definitions
                .iter()
                .find(|(_, definition)| std::ptr::eq(*definition, fragment))
                .map(|(name, _)| name.clone())
        })
        .unwrap_or_else(|| fragment.to_string())
}
