//! Classification of schema fragments.
//!
//! A fragment is read one of two ways. Where a path step stands on it, it is
//! sorted by [`Fragment::classify`] in priority order: `properties`, then
//! `type`, then `$ref`, then `anyOf`/`oneOf`. Where it is the value of a
//! property or a definition, it is sorted by [`Resolution::classify`]: `type`,
//! then `$ref`, then `anyOf`/`oneOf`.
//!
//! The kinds named by `type` are not parsed by either. Only a fragment that
//! ends a step has its kinds read, through [`declared_kinds`].

use serde_json::{Map, Value};

use crate::error::SchemaError;
use crate::types::{JsonType, Keyword, TypeSignature};

/// Shape of a fragment a path step stands on, borrowing from the schema.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fragment<'a> {
    /// A typed fragment nothing can be stepped into.
    Terminal,

    /// A fragment with `properties`, typed or not.
    Object { properties: &'a Map<String, Value> },

    /// A fragment whose `type` includes `"array"` and which has `items`.
    Array { items: &'a Value },

    /// A `$ref` to a definition.
    Reference { pointer: &'a str },

    /// An `anyOf` or `oneOf` list of alternatives.
    Union { branches: &'a [Value] },
}

impl<'a> Fragment<'a> {
    /// Classify a fragment a step stands on.
    ///
    /// `anyOf` is checked before `oneOf`; a fragment carrying both is
    /// classified by its `anyOf`. A typed array without `items` is terminal.
    ///
    /// # Errors
    ///
    /// - `UnresolvableFragment` if the fragment is not an object, has none of
    ///   the recognized keys, or a recognized key holds the wrong JSON kind.
    /// - `MalformedReference` if `$ref` is not a string.
    pub fn classify(fragment: &'a Value) -> Result<Self, SchemaError> {
        let map = as_map(fragment)?;

        if let Some(properties) = map.get(Keyword::Properties.as_str()) {
            let properties = properties
                .as_object()
                .ok_or_else(|| SchemaError::unresolvable(fragment))?;
            return Ok(Fragment::Object { properties });
        }

        if let Some(declared) = map.get(Keyword::Type.as_str()) {
            if declares_array(declared) {
                if let Some(items) = map.get(Keyword::Items.as_str()) {
                    return Ok(Fragment::Array { items });
                }
            }
            return Ok(Fragment::Terminal);
        }

        if let Some(pointer) = reference(map)? {
            return Ok(Fragment::Reference { pointer });
        }
        if let Some(branches) = union_branches(map, fragment)? {
            return Ok(Fragment::Union { branches });
        }

        Err(SchemaError::unresolvable(fragment))
    }
}

/// How a property value or definition stands for typed fragments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution<'a> {
    /// Declares a `type` and is kept as it is.
    Typed,

    /// Resolves through a `$ref`; sibling `properties` are ignored.
    Reference { pointer: &'a str },

    /// Resolves through each `anyOf` or `oneOf` alternative.
    Union { branches: &'a [Value] },
}

impl<'a> Resolution<'a> {
    /// Classify a property value, definition or union branch.
    ///
    /// # Errors
    ///
    /// - `UnresolvableFragment` if the fragment has no `type`, `$ref`, `anyOf`
    ///   or `oneOf`. This includes objects with `properties` but no `type`.
    /// - `MalformedReference` if `$ref` is not a string.
    pub fn classify(fragment: &'a Value) -> Result<Self, SchemaError> {
        let map = as_map(fragment)?;

        if map.contains_key(Keyword::Type.as_str()) {
            return Ok(Resolution::Typed);
        }
        if let Some(pointer) = reference(map)? {
            return Ok(Resolution::Reference { pointer });
        }
        if let Some(branches) = union_branches(map, fragment)? {
            return Ok(Resolution::Union { branches });
        }

        Err(SchemaError::unresolvable(fragment))
    }
}

/// Kinds a fragment declares through its own `type`.
///
/// # Errors
///
/// - `UnresolvableFragment` if the fragment has no `type`.
/// - `UnknownJsonType` if `type` names an unsupported kind.
pub fn declared_kinds(fragment: &Value) -> Result<TypeSignature, SchemaError> {
    let declared = fragment
        .get(Keyword::Type.as_str())
        .ok_or_else(|| SchemaError::unresolvable(fragment))?;
    TypeSignature::from_type_value(declared)
}

fn as_map(fragment: &Value) -> Result<&Map<String, Value>, SchemaError> {
    fragment
        .as_object()
        .ok_or_else(|| SchemaError::unresolvable(fragment))
}

// Other kinds in the list are not validated here.
fn declares_array(declared: &Value) -> bool {
    let array = JsonType::Array.as_str();
    match declared {
        Value::String(kind) => kind == array,
        Value::Array(kinds) => kinds.iter().any(|kind| kind.as_str() == Some(array)),
        _ => false,
    }
}

fn reference(map: &Map<String, Value>) -> Result<Option<&str>, SchemaError> {
    map.get(Keyword::Ref.as_str())
        .map(|reference| {
            reference
                .as_str()
                .ok_or_else(|| SchemaError::MalformedReference {
                    reference: reference.to_string(),
                })
        })
        .transpose()
}

fn union_branches<'a>(
    map: &'a Map<String, Value>,
    fragment: &Value,
) -> Result<Option<&'a [Value]>, SchemaError> {
    for keyword in [Keyword::AnyOf, Keyword::OneOf] {
        if let Some(branches) = map.get(keyword.as_str()) {
            return branches
                .as_array()
                .map(|branches| Some(branches.as_slice()))
                .ok_or_else(|| SchemaError::unresolvable(fragment));
        }
    }
    Ok(None)
}
