//! Field names and rendering options for the tree builder.

use serde::{Deserialize, Serialize};

use crate::domain::record::RecordId;

/// Default indent/continuation token.
pub const DEFAULT_INDENT: &str = "&nbsp;";

/// Names of the record fields the builder reads and writes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FieldNames {
    /// Field holding the parent record id
    pub parent: String,
    /// Output field holding nested children
    pub child: String,
    /// Field holding the display label
    pub name: String,
    /// Output field holding the decorated label
    pub spacer: String,
    /// Field used as the record id when the source is an array
    pub id: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            parent: "parentid".into(),
            child: "child".into(),
            name: "name".into(),
            spacer: "spacer_name".into(),
            id: "id".into(),
        }
    }
}

/// Tree-drawing glyphs: `[vertical, branch, last_branch]`.
///
/// Serialized as a three-element array.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "[String; 3]", into = "[String; 3]")]
pub struct Markers {
    /// Continuation line carried down through ancestor levels
    pub vertical: String,
    /// Drawn before a sibling that has later siblings
    pub branch: String,
    /// Drawn before the last sibling
    pub last_branch: String,
}

impl Markers {
    pub fn new(
        vertical: impl Into<String>,
        branch: impl Into<String>,
        last_branch: impl Into<String>,
    ) -> Self {
        Self {
            vertical: vertical.into(),
            branch: branch.into(),
            last_branch: last_branch.into(),
        }
    }

    /// Glyphs preceded by an HTML em space, for `<select>` options.
    pub fn html() -> Self {
        Self::new("&emsp;│", "&emsp;├", "&emsp;└")
    }

    /// Plain ASCII glyphs.
    pub fn ascii() -> Self {
        Self::new("|", "|-", "`-")
    }
}

impl Default for Markers {
    fn default() -> Self {
        Self::new("│", "├", "└")
    }
}

impl From<[String; 3]> for Markers {
    fn from([vertical, branch, last_branch]: [String; 3]) -> Self {
        Self {
            vertical,
            branch,
            last_branch,
        }
    }
}

impl From<[&str; 3]> for Markers {
    fn from([vertical, branch, last_branch]: [&str; 3]) -> Self {
        Self::new(vertical, branch, last_branch)
    }
}

impl From<Markers> for [String; 3] {
    fn from(markers: Markers) -> Self {
        [markers.vertical, markers.branch, markers.last_branch]
    }
}

/// Complete builder configuration, applied in one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeOptions {
    pub fields: FieldNames,
    pub markers: Markers,
    pub indent: String,
    pub root: RecordId,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            fields: FieldNames::default(),
            markers: Markers::default(),
            indent: DEFAULT_INDENT.to_string(),
            root: RecordId::root(),
        }
    }
}
