//! Core types for schema path resolution.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde_json::Value;

use crate::error::SchemaError;

/// Resource schemas keyed by resource type name (e.g. `AWS::EC2::Instance`).
pub type SchemaSet = BTreeMap<String, Value>;

/// Type name used for resources that don't need a distinct generated type.
pub const PLACEHOLDER_TYPE_NAME: &str = "Node";

/// Schema keywords the resolver understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    TypeName,
    Type,
    Properties,
    Items,
    Ref,
    OneOf,
    AnyOf,
    Definitions,
}

impl Keyword {
    /// Returns the key as it appears in a schema document.
    pub const fn as_str(self) -> &'static str {
        match self {
            Keyword::TypeName => "typeName",
            Keyword::Type => "type",
            Keyword::Properties => "properties",
            Keyword::Items => "items",
            Keyword::Ref => "$ref",
            Keyword::OneOf => "oneOf",
            Keyword::AnyOf => "anyOf",
            Keyword::Definitions => "definitions",
        }
    }
}

/// Primitive kinds a `type` keyword may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonType {
    Boolean,
    Integer,
    Number,
    String,
    Array,
    Object,
}

impl JsonType {
    pub const ALL: [JsonType; 6] = [
        JsonType::Boolean,
        JsonType::Integer,
        JsonType::Number,
        JsonType::String,
        JsonType::Array,
        JsonType::Object,
    ];

    /// Parse a `type` value.
    ///
    /// Returns `None` for anything outside the six supported kinds
    /// (including `"null"`).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "boolean" => Some(JsonType::Boolean),
            "integer" => Some(JsonType::Integer),
            "number" => Some(JsonType::Number),
            "string" => Some(JsonType::String),
            "array" => Some(JsonType::Array),
            "object" => Some(JsonType::Object),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JsonType::Boolean => "boolean",
            JsonType::Integer => "integer",
            JsonType::Number => "number",
            JsonType::String => "string",
            JsonType::Array => "array",
            JsonType::Object => "object",
        }
    }

    /// The single-bit signature for this kind.
    pub fn signature(self) -> TypeSignature {
        match self {
            JsonType::Boolean => TypeSignature::BOOLEAN,
            JsonType::Integer => TypeSignature::INTEGER,
            JsonType::Number => TypeSignature::NUMBER,
            JsonType::String => TypeSignature::STRING,
            JsonType::Array => TypeSignature::ARRAY,
            JsonType::Object => TypeSignature::OBJECT,
        }
    }
}

/// Set of primitive kinds seen along a resolved path.
///
/// Signatures only ever grow: each hop ORs its own kinds into the parent's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TypeSignature(u8);

impl TypeSignature {
    pub const EMPTY: TypeSignature = TypeSignature(0);
    pub const BOOLEAN: TypeSignature = TypeSignature(1);
    pub const INTEGER: TypeSignature = TypeSignature(1 << 1);
    pub const NUMBER: TypeSignature = TypeSignature(1 << 2);
    pub const STRING: TypeSignature = TypeSignature(1 << 3);
    pub const ARRAY: TypeSignature = TypeSignature(1 << 4);
    pub const OBJECT: TypeSignature = TypeSignature(1 << 5);

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if every kind in `other` is also in `self`.
    pub const fn contains(self, other: TypeSignature) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_array(self) -> bool {
        self.contains(TypeSignature::ARRAY)
    }

    /// Build a signature from a `type` value: a string or a list of strings.
    ///
    /// Lists such as `["array", "string"]` OR every listed kind together.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnknownJsonType` for kinds outside the supported
    /// six, or for a `type` value that is neither a string nor a list.
    pub fn from_type_value(value: &Value) -> Result<Self, SchemaError> {
        match value {
            Value::String(s) => parse_kind(s),
            Value::Array(kinds) => kinds.iter().try_fold(TypeSignature::EMPTY, |acc, kind| {
                match kind {
                    Value::String(s) => Ok(acc | parse_kind(s)?),
                    other => Err(SchemaError::UnknownJsonType {
                        value: other.to_string(),
                    }),
                }
            }),
            other => Err(SchemaError::UnknownJsonType {
                value: other.to_string(),
            }),
        }
    }

    /// Kinds in this signature, in declaration order.
    pub fn kinds(self) -> impl Iterator<Item = JsonType> {
        JsonType::ALL
            .into_iter()
            .filter(move |kind| self.contains(kind.signature()))
    }
}

fn parse_kind(s: &str) -> Result<TypeSignature, SchemaError> {
    JsonType::parse(s)
        .map(JsonType::signature)
        .ok_or_else(|| SchemaError::UnknownJsonType {
            value: s.to_string(),
        })
}

impl BitOr for TypeSignature {
    type Output = TypeSignature;

    fn bitor(self, rhs: TypeSignature) -> TypeSignature {
        TypeSignature(self.0 | rhs.0)
    }
}

impl BitOrAssign for TypeSignature {
    fn bitor_assign(&mut self, rhs: TypeSignature) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for TypeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let names: Vec<&str> = self.kinds().map(JsonType::as_str).collect();
        f.write_str(&names.join("|"))
    }
}
