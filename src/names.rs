//! Resource type names and identifier casing.

use std::fmt;

use crate::error::TranslateError;

/// A resource type name of the form `<Partition>::<Service>::<Resource>`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceName {
    partition: String,
    service: String,
    resource: String,
}

impl ResourceName {
    /// Parse a `AWS::EC2::Instance` style name.
    ///
    /// # Errors
    ///
    /// Returns `TranslateError::InvalidResourceName` unless the name has
    /// exactly three non-empty `::`-separated segments.
    pub fn parse(name: &str) -> Result<Self, TranslateError> {
        let segments: Vec<&str> = name.split("::").collect();
        match segments.as_slice() {
            [partition, service, resource]
                if !partition.is_empty() && !service.is_empty() && !resource.is_empty() =>
            {
                Ok(ResourceName {
                    partition: partition.to_string(),
                    service: service.to_string(),
                    resource: resource.to_string(),
                })
            }
            _ => Err(TranslateError::InvalidResourceName {
                name: name.to_string(),
            }),
        }
    }

    fn cased_segments(&self) -> [String; 3] {
        [
            to_pascal_case(&self.partition),
            to_pascal_case(&self.service),
            to_pascal_case(&self.resource),
        ]
    }

    /// The name as written in schemas, e.g. `AWS::EC2::Instance`.
    pub fn as_cfn(&self) -> String {
        self.to_string()
    }

    /// Type name for generated Rust code, e.g. `AwsEc2Instance`.
    pub fn as_rust(&self) -> String {
        self.cased_segments().concat()
    }

    /// Type name for the GraphQL schema, e.g. `Aws_Ec2_Instance`.
    pub fn as_graphql(&self) -> String {
        self.cased_segments().join("_")
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}::{}", self.partition, self.service, self.resource)
    }
}

/// Normalize one name segment to PascalCase.
///
/// - All capitals (optionally with trailing digits) become capitalized:
///   `EC2` to `Ec2`, `AWS` to `Aws`.
/// - A leading acronym glued to PascalCase words is folded:
///   `IAMRole` to `IamRole`.
/// - PascalCase and anything else is kept as-is.
pub fn to_pascal_case(segment: &str) -> String {
    let body = segment.trim_end_matches(|c: char| c.is_ascii_digit());
    let digits = &segment[body.len()..];

    if !body.is_empty() && body.chars().all(|c| c.is_ascii_uppercase()) {
        return capitalize(&segment.to_ascii_lowercase());
    }
    if is_pascal_words(body) {
        return segment.to_string();
    }

    let leading_caps = body.chars().take_while(|c| c.is_ascii_uppercase()).count();
    if leading_caps >= 2 {
        let (acronym, rest) = body.split_at(leading_caps - 1);
        if is_pascal_words(rest) {
            return format!("{}{}{}", capitalize(&acronym.to_ascii_lowercase()), rest, digits);
        }
    }

    segment.to_string()
}

/// Convert PascalCase to snake_case.
///
/// An underscore goes before a capital that follows a lowercase letter or a
/// digit, and before the last capital of a run when a lowercase letter follows
/// it: `VPCId` becomes `vpc_id`, `Route53Resolver` becomes `route53_resolver`.
pub fn pascal_to_snake(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            let after_word = prev.is_ascii_lowercase() || prev.is_ascii_digit();
            if prev != '_' && (after_word || next_is_lower) {
                result.push('_');
            }
        }
        result.push(c.to_ascii_lowercase());
    }
    result
}

/// Join a slash-separated property path into one PascalCase identifier.
///
/// `SecurityGroupIngress/SourceSecurityGroupId` becomes
/// `SecurityGroupIngressSourceSecurityGroupId`.
pub fn path_to_pascal(path: &str) -> String {
    path.split('/').map(capitalize).collect()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// True for one or more words of a capital followed by lowercase letters.
fn is_pascal_words(s: &str) -> bool {
    let mut chars = s.chars().peekable();
    if chars.peek().is_none() {
        return false;
    }
    while let Some(c) = chars.next() {
        if !c.is_ascii_uppercase() {
            return false;
        }
        let mut lowers = 0;
        while chars.next_if(|n| n.is_ascii_lowercase()).is_some() {
            lowers += 1;
        }
        if lowers == 0 {
            return false;
        }
    }
    true
}
