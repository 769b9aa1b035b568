//! # ordinal-attr
//!
//! Attribute bindings between record columns and enum types.
//!
//! - [`EnumAttribute`]: one enum value per column, stored as a name or an
//!   ordinal.
//! - [`SetAttribute`]: a packed set of enum values per column.
//!
//! Records are reached only through the [`StorageCell`],
//! [`ValidationReporter`] and [`ChangeTracking`] traits. [`MemoryRecord`]
//! implements all three.
//!
//! ```
//! use ordinal_attr::{EnumAttribute, MemoryRecord};
//! use ordinal_enum::define_enum_type;
//!
//! let product = define_enum_type(Some("Product"), ["Silver", "Gold"]).unwrap();
//! let attribute = EnumAttribute::new("product", product);
//! let mut record = MemoryRecord::new();
//! attribute.assign(&mut record, "gold").unwrap();
//! assert_eq!(attribute.read(&record).map(|v| v.name()), Some("Gold"));
//! assert!(attribute.has_changed(&record));
//! ```

pub mod config;
pub mod error;
pub mod has_enum;
pub mod has_set;
pub mod record;
pub mod storage;

pub use config::{BindingOptions, ModelBindings, ModelConfig};
pub use error::{AssignError, BindingError, ConfigError};
pub use has_enum::{EnumAttribute, EnumInput};
pub use has_set::SetAttribute;
pub use record::MemoryRecord;
pub use storage::{ChangeTracking, FieldError, StorageCell, ValidationReporter};
