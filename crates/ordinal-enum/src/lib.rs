//! # ordinal-enum
//!
//! Enumerated value types that are richer than integer codes: every value has
//! a name, a declaration ordinal, a bit position for packed storage, optional
//! named fields, and optionally its own behavior.
//!
//! ## Architecture
//!
//! ```text
//! DefiningContext       ← Records fields, methods, extensions, value declarations
//!     │  replay
//! EnumTypeFactory       ← Builds and freezes the type
//!     │
//! EnumType              ← Ordered values + name/ordinal lookup tables
//!     │
//! EnumValue             ← Immutable member: name, ordinal, fields, overrides
//! ```
//!
//! Named types live in an explicitly owned [`Namespace`].
//!
//! ```
//! use ordinal_enum::define_enum_type;
//!
//! let color = define_enum_type(Some("Color"), ["RED", "GREEN", "BLUE"]).unwrap();
//! assert_eq!(color.get(0).unwrap().name(), "RED");
//! assert_eq!(color.get("green").unwrap().name(), "GREEN");
//! ```

pub mod behavior;
pub mod enum_type;
pub mod error;
pub mod factory;
pub mod field;
pub mod inflect;
pub mod key;
pub mod namespace;
pub mod serialize;
pub mod value;

pub use behavior::{BehaviorSet, Invocation, Receiver};
pub use enum_type::{EnumType, EnumTypeId, NameIndex};
pub use error::{BehaviorError, DefinitionError, SerializationError};
pub use factory::{
    DefiningContext, EnumTypeFactory, MAX_BIT_POSITION, ValueDeclaration, ValueInit, ValueSpec,
};
pub use field::Field;
pub use key::Key;
pub use namespace::Namespace;
pub use serialize::FieldSelection;
pub use value::EnumValue;

use std::sync::Arc;

/// Declare an explicit-list enum type outside of any namespace.
///
/// The type is not registered anywhere; the caller owns the returned handle.
pub fn define_enum_type<I, S>(
    type_name: Option<&str>,
    values: I,
) -> Result<Arc<EnumType>, DefinitionError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    EnumTypeFactory::build(type_name, ValueSpec::explicit(values), |_| Ok(())).map(Arc::new)
}

/// Declare an enum type whose values are declared inside `block`.
pub fn define_enum_type_with<F>(
    type_name: Option<&str>,
    block: F,
) -> Result<Arc<EnumType>, DefinitionError>
where
    F: FnOnce(&mut DefiningContext) -> Result<(), DefinitionError>,
{
    EnumTypeFactory::build(type_name, ValueSpec::DefinedInBlock, block).map(Arc::new)
}
