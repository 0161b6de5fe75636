//! Output model consumed by code and schema generators.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::names::ResourceName;

/// A generated type for one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceType {
    /// Original type name, e.g. `AWS::EC2::Instance`.
    pub name: String,
    pub rust_name: String,
    pub graph_name: String,
    pub properties: Vec<ResourceProperty>,
    pub relationships: Vec<ResourceRelationship>,
}

impl ResourceType {
    /// Build a resource type with the standard scalar properties.
    pub fn new(name: &ResourceName, relationships: Vec<ResourceRelationship>) -> Self {
        ResourceType {
            name: name.to_string(),
            rust_name: name.as_rust(),
            graph_name: name.as_graphql(),
            properties: vec![
                ResourceProperty::string("identifier"),
                ResourceProperty::string("all_properties"),
            ],
            relationships,
        }
    }
}

/// A scalar field on a generated type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceProperty {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

impl ResourceProperty {
    fn string(name: &str) -> Self {
        ResourceProperty {
            name: name.to_string(),
            type_name: "String".to_string(),
        }
    }
}

/// Where a relationship edge points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeTarget {
    /// A single generated type (or the placeholder).
    Single(String),
    /// Several possible types, joined into a union.
    Union(ResourceUnion),
}

impl EdgeTarget {
    pub fn type_name(&self) -> &str {
        match self {
            EdgeTarget::Single(name) => name,
            EdgeTarget::Union(union) => &union.union_name,
        }
    }
}

/// An edge from a resource property to one or more target types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRelationship {
    pub source_property_name: String,
    pub target_type_name: String,
    pub return_type_is_array: bool,
    /// `Vec<T>` or `Option<T>`.
    pub return_type: String,
    /// `Vec<T>` or `T`.
    pub generic_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_union: Option<ResourceUnion>,
}

impl ResourceRelationship {
    pub fn new(source_property_name: String, target: EdgeTarget, is_array: bool) -> Self {
        let target_type_name = target.type_name().to_string();
        let (return_type, generic_type) = if is_array {
            let list = format!("Vec<{}>", target_type_name);
            (list.clone(), list)
        } else {
            (format!("Option<{}>", target_type_name), target_type_name.clone())
        };
        let target_union = match target {
            EdgeTarget::Union(union) => Some(union),
            EdgeTarget::Single(_) => None,
        };

        ResourceRelationship {
            source_property_name,
            target_type_name,
            return_type_is_array: is_array,
            return_type,
            generic_type,
            target_union,
        }
    }
}

/// A named union of target types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceUnion {
    pub union_name: String,
    pub member_type_names: BTreeSet<String>,
}
