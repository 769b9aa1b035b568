//! Error types for attribute assignment, binding and configuration.

use ordinal_bitset::{CodecError, CoercionError};
use ordinal_enum::DefinitionError;

/// Rejected assignment. The record is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssignError {
    #[error("could not resolve {input} for {attribute}")]
    Unresolved { attribute: String, input: String },

    #[error("{field} is not a member of {attribute}")]
    UnknownMember { attribute: String, field: String },

    #[error(transparent)]
    Coercion(#[from] CoercionError),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    #[error("no enum type {class_name} to bind {attribute} to")]
    UnknownEnumType {
        attribute: String,
        class_name: String,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid toml at {path}: {source}")]
    ParseToml {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error(transparent)]
    Binding(#[from] BindingError),
}
