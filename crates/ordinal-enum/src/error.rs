//! Error types for enum type definition, behavior dispatch and serialization.

/// Errors raised while declaring an enum type.
///
/// These are programming errors: they abort construction of the type and are
/// never retried.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DefinitionError {
    #[error("enum type name must not be empty")]
    EmptyTypeName,

    #[error("enum value name must not be empty (in {type_name})")]
    EmptyValueName { type_name: String },

    #[error("duplicate enum value {name} in {type_name}")]
    DuplicateValue { type_name: String, name: String },

    #[error("bit position {position} of {name} is already taken by {taken_by} in {type_name}")]
    DuplicateBitPosition {
        type_name: String,
        name: String,
        position: usize,
        taken_by: String,
    },

    #[error("bit position {position} of {name} exceeds {max} in {type_name}")]
    BitPositionTooLarge {
        type_name: String,
        name: String,
        position: usize,
        max: usize,
    },

    #[error("enum type {type_name} declares no values")]
    NoValues { type_name: String },

    /// A value was declared while no defining context was capturing
    /// declarations (for example from the block of an explicit-list type).
    #[error("cannot declare value {name}: {type_name} is not being defined in a block")]
    NoDefiningContext { type_name: String, name: String },

    #[error("undefined method `{method}` while defining {type_name}")]
    UndefinedMethod { type_name: String, method: String },

    #[error("field `{field}` is not declared on {type_name}")]
    UndeclaredField { type_name: String, field: String },

    #[error("enum type {0} is already defined")]
    TypeAlreadyDefined(String),

    #[error(transparent)]
    Behavior(#[from] BehaviorError),

    #[error("initializer failed for {name}: {message}")]
    Initializer { name: String, message: String },
}

/// Errors raised when invoking a method on an enum value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BehaviorError {
    #[error("undefined method `{method}` for {receiver}")]
    NoMethod { receiver: String, method: String },

    #[error("`{method}` is not implemented for {receiver}")]
    NotImplemented { receiver: String, method: String },

    #[error("`{method}` needs an enum value receiver, got {receiver}")]
    NoReceiver { receiver: String, method: String },

    #[error("`{method}` failed for {receiver}: {message}")]
    Failed {
        receiver: String,
        method: String,
        message: String,
    },
}

/// Errors raised by the compact and structured serialization forms.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SerializationError {
    #[error("field `{field}` is not declared on {type_name}")]
    UnknownField { type_name: String, field: String },

    #[error("unexpected fields option {0}")]
    UnsupportedSelection(String),

    #[error("expected a document of type {expected}, got {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("structured document is missing `{0}`")]
    MissingKey(&'static str),

    #[error("{type_name} has no value named {name}")]
    UnknownValue { type_name: String, name: String },
}
