//! Document loading from files, directories, strings and HTTP URLs.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::LoadError;
use crate::relationships::{AllRelationships, Filter};
use crate::types::{Keyword, SchemaSet};
use crate::validator::validate_relationships;

#[cfg(feature = "remote")]
use std::time::Duration;

/// Default timeout for HTTP requests (10 seconds).
#[cfg(feature = "remote")]
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Load a JSON document from a file path.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the file doesn't exist,
/// or `LoadError::InvalidJson` if the file isn't valid JSON.
pub fn load_document(path: &Path) -> Result<Value, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| LoadError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    load_document_str(&content)
}

/// Load a JSON document from a string.
///
/// # Errors
///
/// Returns `LoadError::InvalidJson` if the string isn't valid JSON.
pub fn load_document_str(content: &str) -> Result<Value, LoadError> {
    serde_json::from_str(content).map_err(|source| LoadError::InvalidJson { source })
}

/// Load a JSON document from an HTTP/HTTPS URL.
///
/// Requires the `remote` feature (enabled by default).
///
/// # Errors
///
/// Returns `LoadError::NetworkError` if the request fails, the server answers
/// with an error status, or the body isn't valid JSON.
#[cfg(feature = "remote")]
pub fn load_document_url(url: &str) -> Result<Value, LoadError> {
    let network_error = |source| LoadError::NetworkError {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(network_error)?;

    debug!(url, "fetching document");
    client
        .get(url)
        .send()
        .and_then(reqwest::blocking::Response::error_for_status)
        .and_then(|response| response.json())
        .map_err(network_error)
}

/// Check if a string looks like a URL (starts with http:// or https://).
pub fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Load a document from a file path or URL.
///
/// Automatically detects whether the source is a URL or file path.
/// URL loading requires the `remote` feature.
///
/// # Errors
///
/// Returns appropriate errors based on the source type.
pub fn load_document_auto(source: &str) -> Result<Value, LoadError> {
    if is_url(source) {
        #[cfg(feature = "remote")]
        {
            load_document_url(source)
        }
        #[cfg(not(feature = "remote"))]
        {
            Err(LoadError::FileNotFound {
                path: PathBuf::from(source),
            })
        }
    } else {
        load_document(Path::new(source))
    }
}

/// Load and validate a relationship document from a file path or URL.
///
/// # Errors
///
/// Loading errors from [`load_document_auto`], or
/// `LoadError::InvalidDocument` listing every structural problem.
pub fn load_relationships(source: &str) -> Result<AllRelationships, LoadError> {
    let document = load_document_auto(source)?;
    validate_relationships(&document)?;
    serde_json::from_value(document).map_err(|source| LoadError::InvalidJson { source })
}

/// Load every `*.json` resource schema in a directory, keyed by `typeName`.
///
/// Schemas whose type name the filter rejects are skipped.
///
/// # Errors
///
/// - `LoadError::FileNotFound` if `dir` doesn't exist.
/// - `LoadError::ReadError` if the directory can't be listed.
/// - `LoadError::MissingTypeName` for a schema without a string `typeName`.
/// - Any error from [`load_document`].
pub fn load_schema_dir(dir: &Path, filter: &Filter) -> Result<SchemaSet, LoadError> {
    if !dir.exists() {
        return Err(LoadError::FileNotFound {
            path: dir.to_path_buf(),
        });
    }

    let read_error = |source| LoadError::ReadError {
        path: dir.to_path_buf(),
        source,
    };
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(read_error)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<_, _>>()
        .map_err(read_error)?;
    paths.retain(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"));
    paths.sort();

    let mut schemas = SchemaSet::new();
    for path in paths {
        let schema = load_document(&path)?;
        let type_name = schema
            .get(Keyword::TypeName.as_str())
            .and_then(Value::as_str)
            .ok_or_else(|| LoadError::MissingTypeName { path: path.clone() })?
            .to_string();

        if !filter.allows(&type_name) {
            continue;
        }
        debug!(resource = %type_name, path = %path.display(), "loaded schema");
        if schemas.insert(type_name.clone(), schema).is_some() {
            warn!(resource = %type_name, path = %path.display(), "duplicate schema replaces earlier one");
        }
    }

    Ok(schemas)
}
