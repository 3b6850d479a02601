//! Error types for symbol-table construction and policy configuration

use crate::symbols::TypeId;
use thiserror::Error;

/// Failures while the host materializes the symbol graph
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SymbolError {
    #[error("unknown type id {}", .0.index())]
    UnknownType(TypeId),

    #[error("type `{name}` expects {expected} type argument(s), got {actual}")]
    ArityMismatch { name: String, expected: usize, actual: usize },

    #[error("type `{0}` is not a generic definition")]
    NotGenericDefinition(String),

    #[error("members can only be declared on definitions, `{0}` is constructed")]
    ConstructedMember(String),

    #[error("type parameter ordinal {ordinal} is out of range for `{name}`")]
    OrdinalOutOfRange { name: String, ordinal: usize },
}

/// Invalid immutability policy configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("type name must not be empty")]
    EmptyTypeName,

    #[error("type name `{0}` contains whitespace")]
    MalformedTypeName(String),

    #[error("`{0}` requires immutable type arguments but is not a generic metadata name (expected a `N arity suffix)")]
    RuleRequiresGeneric(String),

    #[error("`{0}` is listed more than once")]
    DuplicateEntry(String),

    #[error("`{0}` is listed as both known-immutable and a mutable collection")]
    ConflictingEntry(String),
}
