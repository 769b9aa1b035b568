//! Field declarations shared by every value of a type.

use crate::value::EnumValue;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Computes a field default from the value under construction.
pub type DefaultFn = dyn Fn(&EnumValue) -> Value + Send + Sync;

#[derive(Clone)]
enum FieldDefault {
    None,
    Static(Value),
    Computed(Arc<DefaultFn>),
}

/// A named, read-only attribute carried by every value of a type.
#[derive(Clone)]
pub struct Field {
    name: String,
    default: FieldDefault,
}

impl Field {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: FieldDefault::None,
        }
    }

    /// Use `value` when no initialization argument supplies the field.
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = FieldDefault::Static(value);
        self
    }

    /// Compute the default from the value being built.
    ///
    /// Fields declared earlier are already resolved when `f` runs.
    pub fn computed<F>(mut self, f: F) -> Self
    where
        F: Fn(&EnumValue) -> Value + Send + Sync + 'static,
    {
        self.default = FieldDefault::Computed(Arc::new(f));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_default(&self) -> bool {
        matches!(self.default, FieldDefault::Static(_))
    }

    pub fn default(&self) -> Option<&Value> {
        match &self.default {
            FieldDefault::Static(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_computed(&self) -> bool {
        matches!(self.default, FieldDefault::Computed(_))
    }

    /// Resolve this field for `value` from the initialization arguments.
    ///
    /// An explicit non-null argument wins, then the static default, then the
    /// computed default. `None` leaves the field unset.
    pub fn default_value(&self, value: &EnumValue, args: &Map<String, Value>) -> Option<Value> {
        match args.get(&self.name) {
            Some(explicit) if !explicit.is_null() => Some(explicit.clone()),
            _ => match &self.default {
                FieldDefault::None => None,
                FieldDefault::Static(default) => Some(default.clone()),
                FieldDefault::Computed(f) => Some(f(value)),
            },
        }
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let default = match &self.default {
            FieldDefault::None => "none".to_string(),
            FieldDefault::Static(value) => value.to_string(),
            FieldDefault::Computed(_) => "<computed>".to_string(),
        };
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("default", &default)
            .finish()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
