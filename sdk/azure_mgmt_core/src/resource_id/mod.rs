//! Segment-based parsing and formatting of Azure Resource Manager resource IDs.
//!
//! A resource ID type declares its path as an ordered list of [`Segment`]s,
//! for example:
//!
//! ```text
//! /subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Network/virtualNetworks/{virtualNetworkName}
//! ```
//!
//! is `subscriptions` (static), `{subscriptionId}`, `resourceGroups` (static),
//! `{resourceGroupName}`, `providers` (static), `Microsoft.Network`
//! (resource provider), `virtualNetworks` (static), `{virtualNetworkName}`.
//!
//! [`Parser`] matches an input string against that template either exactly or
//! case-insensitively. Case-insensitive parsing exists because ARM frequently
//! returns IDs whose static segments differ in casing from the declared
//! template (`resourcegroups`, `microsoft.network`); the parsed result always
//! carries the canonical casing of static segments.
//!
//! ```rust
//! use azure_mgmt_core::resource_id::{ResourceGroupId, ResourceId};
//!
//! let id = ResourceGroupId::parse_insensitively("/SUBSCRIPTIONS/1234/resourcegroups/example")
//!     .expect("valid ID");
//! assert_eq!(id.id(), "/subscriptions/1234/resourceGroups/example");
//! ```

mod common;

pub use common::{ResourceGroupId, ScopeId, SubscriptionId};

use std::collections::BTreeMap;
use thiserror::Error;

/// An example subscription ID used when rendering example resource IDs.
pub const EXAMPLE_SUBSCRIPTION_ID: &str = "12345678-1234-9876-4563-123456789012";

/// An example resource group name used when rendering example resource IDs.
pub const EXAMPLE_RESOURCE_GROUP: &str = "example-resource-group";

/// Errors raised while parsing a resource ID.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceIdError {
    /// The input was empty.
    #[error("parsing {id_type} ID: the input was empty")]
    Empty { id_type: &'static str },

    /// The input had more (or, for scoped IDs, fewer) components than the template.
    #[error(
        "parsing {id_type} ID {input:?}: expected {expected} segments but got {actual}, expected format {example:?}"
    )]
    NumberOfSegmentsDidntMatch {
        id_type: &'static str,
        input: String,
        expected: usize,
        actual: usize,
        example: String,
    },

    /// A required segment was missing or empty.
    #[error("parsing {id_type} ID {input:?}: the segment {segment:?} was not found")]
    SegmentNotSpecified {
        id_type: &'static str,
        segment: &'static str,
        input: String,
    },

    /// A static or resource provider segment did not have the declared value.
    #[error(
        "parsing {id_type} ID {input:?}: expected the segment {segment:?} to be {expected:?} but got {actual:?}"
    )]
    UnexpectedSegment {
        id_type: &'static str,
        segment: &'static str,
        expected: &'static str,
        actual: String,
        input: String,
    },

    /// A constant segment had a value outside its allowed set.
    #[error(
        "parsing {id_type} ID {input:?}: the segment {segment:?} must be one of {possible_values:?} but got {actual:?}"
    )]
    InvalidConstant {
        id_type: &'static str,
        segment: &'static str,
        possible_values: &'static [&'static str],
        actual: String,
        input: String,
    },

    /// Two segments of one resource ID type share a name.
    #[error("{id_type} ID declares the segment name {segment:?} more than once")]
    DuplicateSegmentName {
        id_type: &'static str,
        segment: &'static str,
    },
}

/// The role a [`Segment`] plays in a resource ID template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// A literal such as `subscriptions` or `virtualNetworks`.
    Static,
    /// A resource provider namespace such as `Microsoft.Network`.
    ResourceProvider,
    /// The subscription ID value.
    SubscriptionId,
    /// The resource group name value.
    ResourceGroup,
    /// A caller-chosen resource name.
    UserSpecified,
    /// A value restricted to a fixed set.
    Constant,
    /// An arbitrary scope prefix made of one or more components.
    Scope,
}

/// One component of a resource ID template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Unique name of the segment within its resource ID type.
    pub name: &'static str,
    /// What the segment matches.
    pub kind: SegmentKind,
    /// The declared literal for static and resource provider segments.
    pub fixed_value: Option<&'static str>,
    /// Allowed values for constant segments.
    pub possible_values: &'static [&'static str],
    /// A value used to render example IDs.
    pub example_value: &'static str,
}

impl Segment {
    /// A literal segment, e.g. `Segment::static_segment("staticVirtualNetworks", "virtualNetworks")`.
    pub fn static_segment(name: &'static str, value: &'static str) -> Self {
        Self {
            name,
            kind: SegmentKind::Static,
            fixed_value: Some(value),
            possible_values: &[],
            example_value: value,
        }
    }

    /// A resource provider namespace segment.
    pub fn resource_provider(name: &'static str, value: &'static str) -> Self {
        Self {
            name,
            kind: SegmentKind::ResourceProvider,
            fixed_value: Some(value),
            possible_values: &[],
            example_value: value,
        }
    }

    /// The subscription ID value segment.
    pub fn subscription_id(name: &'static str) -> Self {
        Self {
            name,
            kind: SegmentKind::SubscriptionId,
            fixed_value: None,
            possible_values: &[],
            example_value: EXAMPLE_SUBSCRIPTION_ID,
        }
    }

    /// The resource group name value segment.
    pub fn resource_group(name: &'static str) -> Self {
        Self {
            name,
            kind: SegmentKind::ResourceGroup,
            fixed_value: None,
            possible_values: &[],
            example_value: EXAMPLE_RESOURCE_GROUP,
        }
    }

    /// A caller-chosen name segment.
    pub fn user_specified(name: &'static str, example_value: &'static str) -> Self {
        Self {
            name,
            kind: SegmentKind::UserSpecified,
            fixed_value: None,
            possible_values: &[],
            example_value,
        }
    }

    /// A segment restricted to `possible_values`.
    pub fn constant(
        name: &'static str,
        possible_values: &'static [&'static str],
        example_value: &'static str,
    ) -> Self {
        Self {
            name,
            kind: SegmentKind::Constant,
            fixed_value: None,
            possible_values,
            example_value,
        }
    }

    /// A scope prefix. Only valid as the first segment of a template.
    pub fn scope(name: &'static str, example_value: &'static str) -> Self {
        Self {
            name,
            kind: SegmentKind::Scope,
            fixed_value: None,
            possible_values: &[],
            example_value,
        }
    }
}

/// Check that every segment name in `segments` is unique.
pub fn validate_segments(id_type: &'static str, segments: &[Segment]) -> Result<(), ResourceIdError> {
    for (i, segment) in segments.iter().enumerate() {
        if segments[..i].iter().any(|s| s.name == segment.name) {
            return Err(ResourceIdError::DuplicateSegmentName {
                id_type,
                segment: segment.name,
            });
        }
    }
    Ok(())
}

/// The named values extracted from a resource ID by [`Parser::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult {
    id_type: &'static str,
    raw_input: String,
    parsed: BTreeMap<&'static str, String>,
}

impl ParseResult {
    /// The value of the segment named `name`.
    pub fn get(&self, name: &'static str) -> Result<&str, ResourceIdError> {
        self.parsed
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ResourceIdError::SegmentNotSpecified {
                id_type: self.id_type,
                segment: name,
                input: self.raw_input.clone(),
            })
    }

    /// The value of the segment named `name`, as an owned string.
    pub fn get_owned(&self, name: &'static str) -> Result<String, ResourceIdError> {
        self.get(name).map(str::to_string)
    }

    /// The input that was parsed.
    pub fn raw_input(&self) -> &str {
        &self.raw_input
    }
}

/// Matches input strings against a resource ID template.
#[derive(Debug, Clone)]
pub struct Parser {
    id_type: &'static str,
    segments: Vec<Segment>,
}

impl Parser {
    /// Create a parser for `segments`. `id_type` names the resource in errors.
    pub fn new(id_type: &'static str, segments: Vec<Segment>) -> Self {
        Self { id_type, segments }
    }

    /// Render an example ID from the segments' example values.
    pub fn example(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            let value = segment.example_value.trim_matches('/');
            out.push('/');
            out.push_str(value);
        }
        out
    }

    /// Parse `input`, matching static segments exactly or, if `insensitively`
    /// is set, ignoring ASCII case.
    pub fn parse(&self, input: &str, insensitively: bool) -> Result<ParseResult, ResourceIdError> {
        let id_type = self.id_type;
        if input.trim().is_empty() {
            return Err(ResourceIdError::Empty { id_type });
        }

        let trimmed = input.strip_prefix('/').unwrap_or(input);
        let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
        let components: Vec<&str> = trimmed.split('/').collect();

        let mut parsed = BTreeMap::new();

        let (components, segments) = match self.segments.first() {
            Some(first) if first.kind == SegmentKind::Scope => {
                let fixed = self.segments.len() - 1;
                if components.len() <= fixed {
                    return Err(self.count_mismatch(input, components.len()));
                }
                let split = components.len() - fixed;
                let scope = &components[..split];
                if scope.iter().any(|c| c.is_empty()) {
                    return Err(ResourceIdError::SegmentNotSpecified {
                        id_type,
                        segment: first.name,
                        input: input.to_string(),
                    });
                }
                parsed.insert(first.name, format!("/{}", scope.join("/")));
                (&components[split..], &self.segments[1..])
            }
            _ => (&components[..], &self.segments[..]),
        };

        if components.len() > segments.len() {
            return Err(self.count_mismatch(input, components.len()));
        }

        for (segment, value) in segments.iter().zip(components.iter()) {
            let canonical = self.match_segment(segment, value, input, insensitively)?;
            parsed.insert(segment.name, canonical);
        }

        if let Some(missing) = segments.get(components.len()) {
            return Err(ResourceIdError::SegmentNotSpecified {
                id_type,
                segment: missing.name,
                input: input.to_string(),
            });
        }

        Ok(ParseResult {
            id_type,
            raw_input: input.to_string(),
            parsed,
        })
    }

    fn match_segment(
        &self,
        segment: &Segment,
        value: &str,
        input: &str,
        insensitively: bool,
    ) -> Result<String, ResourceIdError> {
        let id_type = self.id_type;
        match segment.kind {
            SegmentKind::Static | SegmentKind::ResourceProvider => {
                let expected = segment.fixed_value.unwrap_or_default();
                let matches = if insensitively {
                    value.eq_ignore_ascii_case(expected)
                } else {
                    value == expected
                };
                if !matches {
                    return Err(ResourceIdError::UnexpectedSegment {
                        id_type,
                        segment: segment.name,
                        expected,
                        actual: value.to_string(),
                        input: input.to_string(),
                    });
                }
                Ok(expected.to_string())
            }
            SegmentKind::Constant => segment
                .possible_values
                .iter()
                .find(|candidate| {
                    if insensitively {
                        candidate.eq_ignore_ascii_case(value)
                    } else {
                        **candidate == value
                    }
                })
                .map(|candidate| candidate.to_string())
                .ok_or_else(|| ResourceIdError::InvalidConstant {
                    id_type,
                    segment: segment.name,
                    possible_values: segment.possible_values,
                    actual: value.to_string(),
                    input: input.to_string(),
                }),
            SegmentKind::SubscriptionId
            | SegmentKind::ResourceGroup
            | SegmentKind::UserSpecified
            | SegmentKind::Scope => {
                if value.is_empty() {
                    return Err(ResourceIdError::SegmentNotSpecified {
                        id_type,
                        segment: segment.name,
                        input: input.to_string(),
                    });
                }
                Ok(value.to_string())
            }
        }
    }

    fn count_mismatch(&self, input: &str, actual: usize) -> ResourceIdError {
        ResourceIdError::NumberOfSegmentsDidntMatch {
            id_type: self.id_type,
            input: input.to_string(),
            expected: self.segments.len(),
            actual,
            example: self.example(),
        }
    }
}

/// A typed Azure resource ID.
///
/// Implementors declare their template via [`ResourceId::segments`] and
/// get case-sensitive and case-insensitive parsing for free.
pub trait ResourceId: Sized {
    /// Human-readable resource type, e.g. `"Virtual Network Peering"`.
    const ID_TYPE: &'static str;

    /// The ordered segment template.
    fn segments() -> Vec<Segment>;

    /// Build the ID from parsed segment values.
    fn from_parse_result(parsed: &ParseResult) -> Result<Self, ResourceIdError>;

    /// The canonical ID string.
    fn id(&self) -> String;

    /// Parse `input`, requiring the declared casing of static segments.
    fn parse(input: &str) -> Result<Self, ResourceIdError> {
        let parsed = Parser::new(Self::ID_TYPE, Self::segments()).parse(input, false)?;
        Self::from_parse_result(&parsed)
    }

    /// Parse `input`, ignoring the casing of static segments.
    ///
    /// Use this for IDs returned by the API, whose casing may differ from
    /// the declared template.
    fn parse_insensitively(input: &str) -> Result<Self, ResourceIdError> {
        let parsed = Parser::new(Self::ID_TYPE, Self::segments()).parse(input, true)?;
        Self::from_parse_result(&parsed)
    }

    /// An example ID built from the template's example values.
    fn example() -> String {
        Parser::new(Self::ID_TYPE, Self::segments()).example()
    }
}
