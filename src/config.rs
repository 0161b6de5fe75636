//! Translator configuration.
//!
//! Loaded from a TOML file; every section is optional.
//!
//! ## Example config file:
//! ```toml
//! filter = ["AWS::EC2::Instance", "AWS::EC2::Subnet"]
//!
//! [overrides."AWS::EC2::Instance"]
//! VolumeAttachments = "Volumes"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::LoadError;
use crate::relationships::{Filter, Overrides};

/// Settings that shape a translation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TranslatorConfig {
    /// Resource type names to translate. Empty means all.
    pub filter: Vec<String>,

    /// Relationship path renames per resource.
    pub overrides: Overrides,
}

impl TranslatorConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::FileNotFound`, `LoadError::ReadError`, or
    /// `LoadError::InvalidConfig` if the file isn't valid configuration.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        if !path.exists() {
            return Err(LoadError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|source| LoadError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| LoadError::InvalidConfig {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Add resource names to the filter.
    pub fn with_filter<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter.extend(names.into_iter().map(Into::into));
        self
    }

    /// The filter these settings describe.
    pub fn filter(&self) -> Filter {
        self.filter.iter().map(String::as_str).collect()
    }
}
