//! A single enum value stored in one column.
//!
//! Integer columns hold the value's ordinal; every other column holds its
//! name. Reading resolves the stored scalar with the enum type's lookup
//! rules, so `"gold"` and `1` both read back as `Product::Gold`.

use crate::config::BindingOptions;
use crate::error::{AssignError, BindingError};
use crate::storage::{ChangeTracking, StorageCell, ValidationReporter};
use ordinal_bitset::{ColumnKind, Scalar};
use ordinal_enum::inflect::camelize;
use ordinal_enum::{EnumType, EnumValue, Namespace};
use std::sync::Arc;
use tracing::{debug, warn};

/// Anything an enum attribute can be assigned.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumInput<'a> {
    /// Nothing, or whitespace-only text. Clears the column.
    Blank,
    Value(&'a EnumValue),
    Ordinal(i64),
    Name(String),
}

impl EnumInput<'_> {
    fn token(&self) -> String {
        match self {
            EnumInput::Blank => String::new(),
            EnumInput::Value(value) => value.to_string(),
            EnumInput::Ordinal(ordinal) => ordinal.to_string(),
            EnumInput::Name(name) => name.clone(),
        }
    }
}

impl<'a> From<&'a EnumValue> for EnumInput<'a> {
    fn from(value: &'a EnumValue) -> Self {
        EnumInput::Value(value)
    }
}

impl From<i64> for EnumInput<'_> {
    fn from(ordinal: i64) -> Self {
        EnumInput::Ordinal(ordinal)
    }
}

impl From<i32> for EnumInput<'_> {
    fn from(ordinal: i32) -> Self {
        EnumInput::Ordinal(i64::from(ordinal))
    }
}

impl From<&str> for EnumInput<'_> {
    fn from(name: &str) -> Self {
        EnumInput::from(name.to_string())
    }
}

impl From<String> for EnumInput<'_> {
    fn from(name: String) -> Self {
        if name.trim().is_empty() {
            EnumInput::Blank
        } else {
            EnumInput::Name(name)
        }
    }
}

impl<'a, T: Into<EnumInput<'a>>> From<Option<T>> for EnumInput<'a> {
    fn from(input: Option<T>) -> Self {
        input.map_or(EnumInput::Blank, Into::into)
    }
}

/// Binds one enum type to one column of a record.
#[derive(Debug, Clone)]
pub struct EnumAttribute {
    name: String,
    column: String,
    ty: Arc<EnumType>,
}

impl EnumAttribute {
    /// Bind `name` to `ty`, stored in `<name>_type`.
    pub fn new(name: impl Into<String>, ty: Arc<EnumType>) -> Self {
        let name = name.into();
        let column = format!("{name}_type");
        Self { name, column, ty }
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }

    /// Bind `name` to the type named by `options.class_name`, or to the
    /// camelized attribute name, looked up in `scope`.
    pub fn from_options(
        name: &str,
        options: &BindingOptions,
        scope: &Namespace,
    ) -> Result<Self, BindingError> {
        let class_name = options
            .class_name
            .clone()
            .unwrap_or_else(|| camelize(name));
        let ty = scope
            .get(&class_name)
            .ok_or_else(|| BindingError::UnknownEnumType {
                attribute: name.to_string(),
                class_name,
            })?;
        let attribute = Self::new(name, Arc::clone(ty));
        Ok(match &options.column_name {
            Some(column) => attribute.with_column(column.as_str()),
            None => attribute,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn enum_type(&self) -> &Arc<EnumType> {
        &self.ty
    }

    /// The stored value. Blank cells and cells that no longer resolve read
    /// as `None`.
    pub fn read<R: StorageCell>(&self, record: &R) -> Option<&EnumValue> {
        let stored = record.read(&self.column)?;
        if stored.is_blank() {
            return None;
        }
        let value = self.resolve_scalar(&stored);
        if value.is_none() {
            debug!(column = %self.column, stored = %stored, "stored enum value does not resolve");
        }
        value
    }

    fn resolve_scalar(&self, scalar: &Scalar) -> Option<&EnumValue> {
        match scalar {
            Scalar::Integer(ordinal) => self.ty.get(*ordinal),
            Scalar::Text(text) => self.ty.get(text.as_str()),
        }
    }

    fn resolve_input(&self, input: &EnumInput<'_>) -> Option<&EnumValue> {
        match input {
            EnumInput::Blank => None,
            EnumInput::Value(value) => self.ty.get(*value),
            EnumInput::Ordinal(ordinal) => self.ty.get(*ordinal),
            EnumInput::Name(name) => self.ty.get(name.as_str()),
        }
    }

    /// Store a value: its ordinal in integer columns, its name elsewhere.
    /// Blank input clears the column. The attribute is marked changed when
    /// the stored scalar changes.
    pub fn assign<'i, R>(&self, record: &mut R, input: impl Into<EnumInput<'i>>) -> Result<(), AssignError>
    where
        R: StorageCell + ChangeTracking,
    {
        let input = input.into();
        let scalar = match input {
            EnumInput::Blank => None,
            ref input => {
                let value = self
                    .resolve_input(input)
                    .ok_or_else(|| AssignError::Unresolved {
                        attribute: self.name.clone(),
                        input: input.token(),
                    })?;
                Some(match record.column_kind(&self.column) {
                    ColumnKind::Integer => Scalar::Integer(value.ordinal() as i64),
                    ColumnKind::Text | ColumnKind::Unknown => Scalar::Text(value.name().to_string()),
                })
            }
        };
        self.store(record, scalar);
        Ok(())
    }

    /// Write the column directly. Marks the attribute changed only when the
    /// scalar differs from what is stored.
    pub fn assign_raw<R>(&self, record: &mut R, scalar: Option<Scalar>)
    where
        R: StorageCell + ChangeTracking,
    {
        self.store(record, scalar);
    }

    fn store<R>(&self, record: &mut R, scalar: Option<Scalar>)
    where
        R: StorageCell + ChangeTracking,
    {
        if record.read(&self.column) == scalar {
            return;
        }
        record.write(&self.column, scalar);
        record.mark_changed(&self.name);
    }

    pub fn has_changed<R: ChangeTracking>(&self, record: &R) -> bool {
        record.has_changed(&self.name)
    }

    pub fn reset_changed<R: ChangeTracking>(&self, record: &mut R) {
        record.reset_changed(&self.name);
    }

    /// Whether the record currently holds `value`.
    pub fn is<R: StorageCell>(&self, record: &R, value: &EnumValue) -> bool {
        self.read(record) == Some(value)
    }

    /// `<attribute>_<underscored value name>` for every value, e.g.
    /// `product_silver`.
    pub fn predicate_names(&self) -> Vec<String> {
        self.ty
            .iter()
            .map(|value| self.predicate_name(value))
            .collect()
    }

    fn predicate_name(&self, value: &EnumValue) -> String {
        format!("{}_{}", self.name, value.underscored_name())
    }

    /// Answer a named predicate such as `product_gold`; `None` if no value
    /// has that predicate.
    pub fn predicate<R: StorageCell>(&self, record: &R, predicate: &str) -> Option<bool> {
        let value = self
            .ty
            .iter()
            .find(|value| self.predicate_name(value) == predicate)?;
        Some(self.is(record, value))
    }

    /// Flag a stored scalar that does not resolve. Empty cells are valid.
    pub fn validate<R>(&self, record: &mut R) -> bool
    where
        R: StorageCell + ValidationReporter,
    {
        let Some(stored) = record.read(&self.column) else {
            return true;
        };
        if stored.is_blank() || self.resolve_scalar(&stored).is_some() {
            return true;
        }
        warn!(column = %self.column, stored = %stored, "invalid enum value");
        record.report_field_error(
            &self.column,
            format!("Wrong type '{stored}' for enum '{}'", self.name),
        );
        false
    }
}
