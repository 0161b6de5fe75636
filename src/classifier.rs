//! Array classification for relationship paths.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::error::SchemaError;
use crate::resolver::follow_path;
use crate::types::TypeSignature;

/// Outcome of classifying a property path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathClass {
    /// Every type signature the path can end in.
    pub signatures: BTreeSet<TypeSignature>,
    /// Whether the path yields a collection.
    pub is_array: bool,
}

/// Classify a path by the signatures it resolves to.
///
/// # Errors
///
/// - `PathNotFound` if no branch reaches the end of the path.
/// - `AmbiguousArrayness` if some branches pass through an array and some don't.
/// - Anything [`follow_path`] returns.
pub fn classify_path(path: &str, schema: &Value) -> Result<PathClass, SchemaError> {
    let signatures = follow_path(path, schema)?;

    let mut verdicts = signatures.iter().map(|signature| signature.is_array());
    let Some(is_array) = verdicts.next() else {
        return Err(SchemaError::PathNotFound {
            path: path.to_string(),
        });
    };
    if verdicts.any(|verdict| verdict != is_array) {
        return Err(SchemaError::AmbiguousArrayness {
            path: path.to_string(),
            signatures: signatures.into_iter().collect(),
        });
    }

    Ok(PathClass {
        signatures,
        is_array,
    })
}

/// Decide whether a relationship path yields a single value or a collection.
///
/// # Errors
///
/// See [`classify_path`].
pub fn is_array(path: &str, schema: &Value) -> Result<bool, SchemaError> {
    classify_path(path, schema).map(|class| class.is_array)
}
