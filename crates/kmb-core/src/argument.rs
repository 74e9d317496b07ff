//! Typed arguments attached to document nodes.
//!
//! An argument is a `(name, raw value, class)` triple. The raw value is kept
//! exactly as authored; the compiler decides how to render it from its
//! [`ArgClass`]. A raw value may carry several items separated by
//! [`ITEM_SEPARATOR`], which are rendered as a list.

use std::{fmt, str::FromStr};

use serde::Deserialize;

use crate::{document::DocumentError, identifier::NodeId};

/// Raw value marking an argument that is required but was never set.
pub const REQUIRED: &str = "!REQ";

/// Separator between the items of a multi-valued field.
pub const ITEM_SEPARATOR: char = ';';

/// Raw value used for an empty id list.
pub const NULL: &str = "null";

/// How an argument value is rendered into source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum ArgClass {
    /// Rendered as a quoted string literal.
    #[serde(rename = "str", alias = "string")]
    Str,
    /// Passed through unchanged.
    #[serde(rename = "num", alias = "number")]
    Num,
    /// Passed through unchanged.
    #[serde(rename = "seq", alias = "sequence")]
    Seq,
    /// Passed through unchanged.
    #[serde(rename = "bool", alias = "boolean")]
    Bool,
    /// A reference to another entity by id.
    #[serde(rename = "id")]
    Id,
}

impl ArgClass {
    /// Returns the wire spelling of this class.
    pub fn as_str(&self) -> &'static str {
        match self {
            ArgClass::Str => "str",
            ArgClass::Num => "num",
            ArgClass::Seq => "seq",
            ArgClass::Bool => "bool",
            ArgClass::Id => "id",
        }
    }
}

impl fmt::Display for ArgClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArgClass {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "str" | "string" => Ok(ArgClass::Str),
            "num" | "number" => Ok(ArgClass::Num),
            "seq" | "sequence" => Ok(ArgClass::Seq),
            "bool" | "boolean" => Ok(ArgClass::Bool),
            "id" => Ok(ArgClass::Id),
            other => Err(DocumentError::UnknownArgClass(other.to_string())),
        }
    }
}

/// A single named argument of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    name: String,
    raw: String,
    class: ArgClass,
}

impl Argument {
    /// Creates an argument from its name, raw value and class.
    pub fn new(name: impl Into<String>, raw: impl Into<String>, class: ArgClass) -> Self {
        Self {
            name: name.into(),
            raw: raw.into(),
            class,
        }
    }

    /// Creates an `id`-class argument referring to the given entities in order.
    pub fn ids(name: impl Into<String>, ids: &[NodeId]) -> Self {
        let raw = ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(&ITEM_SEPARATOR.to_string());
        Self::new(name, raw, ArgClass::Id)
    }

    /// Creates an argument that is required but has no value yet.
    pub fn required(name: impl Into<String>, class: ArgClass) -> Self {
        Self::new(name, REQUIRED, class)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn class(&self) -> ArgClass {
        self.class
    }

    /// Returns `true` if the value is still the [`REQUIRED`] sentinel.
    pub fn is_unset(&self) -> bool {
        self.raw.trim() == REQUIRED || self.items().any(|item| item == REQUIRED)
    }

    /// Iterates over the separator-delimited items of the raw value.
    pub fn items(&self) -> impl Iterator<Item = &str> {
        self.raw.split(ITEM_SEPARATOR)
    }

    /// Interprets the raw value as an ordered id list.
    pub fn id_list(&self) -> Vec<NodeId> {
        parse_id_list(&self.raw)
    }
}

/// Parses a separator-joined id list.
///
/// Blank items are skipped and the [`NULL`] sentinel means "no ids".
///
/// # Examples
///
/// ```
/// use kmb_core::argument::parse_id_list;
/// use kmb_core::identifier::NodeId;
///
/// assert_eq!(parse_id_list("1;2"), Vec::<NodeId>::from(["1".into(), "2".into()]));
/// assert!(parse_id_list("null").is_empty());
/// ```
pub fn parse_id_list(raw: &str) -> Vec<NodeId> {
    raw.split(ITEM_SEPARATOR)
        .map(str::trim)
        .filter(|item| !item.is_empty() && *item != NULL)
        .map(NodeId::new)
        .collect()
}
