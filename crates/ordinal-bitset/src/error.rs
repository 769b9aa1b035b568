//! Error types for set coercion and bit packing.

use crate::codec::StorageWidth;

/// A set assignment named members the type does not have. Nothing is applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoercionError {
    #[error("could not resolve {} for {type_name}", .tokens.join(", "))]
    Unresolved {
        type_name: String,
        /// Every unresolved token, in input order.
        tokens: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("set needs {bit_width} bits but native storage holds {max}")]
    WidthExceeded { bit_width: usize, max: usize },

    #[error("bit {position} does not fit in native storage")]
    BitOutOfRange { position: usize },

    #[error("{value} is not a member of {type_name}")]
    ForeignValue { type_name: String, value: String },

    #[error("malformed {width} scalar {scalar:?}")]
    Malformed { width: StorageWidth, scalar: String },

    #[error(transparent)]
    Coercion(#[from] CoercionError),
}
