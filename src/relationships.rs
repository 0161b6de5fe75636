//! Relationship documents, overrides and filtering.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// One possible target of a relationship property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    /// Target resource type name, e.g. `AWS::EC2::Subnet`.
    pub type_name: String,
    /// Attribute of the target the property carries.
    #[serde(default)]
    pub attribute: String,
}

/// Map from a slash-separated property path to the references found there.
pub type Relationship = BTreeMap<String, Vec<Reference>>;

/// Relationship data recorded for one resource type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    #[serde(default)]
    pub primary_identifier: Vec<String>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

/// Relationship data for every resource type, keyed by type name.
pub type AllRelationships = BTreeMap<String, Resource>;

/// Property renames per resource type: old path to new path.
pub type Overrides = BTreeMap<String, BTreeMap<String, String>>;

/// Apply property path renames to a relationship document.
///
/// For each overridden resource, every relationship map holding the old path
/// has it renamed to the new one. Paths that aren't present, and resources
/// that aren't in the document, are left alone. The input isn't modified.
pub fn apply_overrides(relationships: &AllRelationships, overrides: &Overrides) -> AllRelationships {
    let mut result = relationships.clone();
    for (resource_name, renames) in overrides {
        let Some(resource) = result.get_mut(resource_name) else {
            debug!(resource = %resource_name, "override for unknown resource ignored");
            continue;
        };
        for relationship in &mut resource.relationships {
            for (old_path, new_path) in renames {
                if let Some(references) = relationship.remove(old_path) {
                    relationship.insert(new_path.clone(), references);
                }
            }
        }
    }
    result
}

/// Set of resource type names to include. Empty means everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter(BTreeSet<String>);

impl Filter {
    /// A filter that admits every resource.
    pub fn allow_all() -> Self {
        Filter::default()
    }

    pub fn allows(&self, name: &str) -> bool {
        self.0.is_empty() || self.0.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Filter {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Filter(iter.into_iter().map(Into::into).collect())
    }
}

/// True if `name` has any reference whose target passes the filter.
///
/// Unknown resources have no relationships.
pub fn has_relationships(name: &str, relationships: &AllRelationships, filter: &Filter) -> bool {
    relationships.get(name).is_some_and(|resource| {
        resource
            .relationships
            .iter()
            .flat_map(|relationship| relationship.values())
            .flatten()
            .any(|reference| filter.allows(&reference.type_name))
    })
}
