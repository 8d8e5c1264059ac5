//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::record::RecordId;

/// Domain errors are only produced by the opt-in strict validation.
/// The traversals themselves never fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("field name not configured: {0}")]
    EmptyFieldName(&'static str),

    #[error("record key {0} occurs more than once")]
    DuplicateId(String),

    #[error("record keys {other} and {id} name the same parent id")]
    AmbiguousId { id: String, other: String },

    #[error("record {id} has no usable '{field}' value")]
    MissingParent { id: String, field: String },

    #[error("record {id} references unknown parent {parent}")]
    UnknownParent { id: String, parent: RecordId },

    #[error("record {id} has no '{field}' value")]
    MissingName { id: String, field: String },

    #[error("cycle detected in hierarchy at record: {0}")]
    CycleDetected(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
