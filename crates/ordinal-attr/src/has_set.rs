//! A set of enum values packed into one column.

use crate::config::BindingOptions;
use crate::error::{AssignError, BindingError};
use crate::storage::{ChangeTracking, StorageCell, ValidationReporter};
use ordinal_bitset::{Bits, CodecError, EnumSet, SetCodec, SetInput};
use ordinal_enum::inflect::{camelize, singularize};
use ordinal_enum::{EnumType, EnumValue, Namespace};
use std::sync::Arc;
use tracing::{debug, warn};

/// Binds one enum type to a packed-set column of a record.
///
/// The storage width follows the column kind: integer columns hold a native
/// word, text columns a decimal string, and columns of unknown kind whichever
/// the type needs.
#[derive(Debug, Clone)]
pub struct SetAttribute {
    name: String,
    column: String,
    ty: Arc<EnumType>,
}

impl SetAttribute {
    /// Bind `name` to `ty`, stored in `<name>_bitfield`.
    pub fn new(name: impl Into<String>, ty: Arc<EnumType>) -> Self {
        let name = name.into();
        let column = format!("{name}_bitfield");
        Self { name, column, ty }
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }

    /// Bind `name` to the type named by `options.class_name` (`enum_class`
    /// in configuration), or to the camelized attribute name.
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

    pub fn codec<R: StorageCell>(&self, record: &R) -> Result<SetCodec<'_>, CodecError> {
        SetCodec::for_column(&self.ty, record.column_kind(&self.column))
    }

    /// Members whose bits are set, in declaration order. `None` when the
    /// column was never assigned, holds something unreadable, or has bits no
    /// member owns.
    pub fn read<R: StorageCell>(&self, record: &R) -> Option<EnumSet<'_>> {
        let stored = record.read(&self.column)?;
        let parsed = self
            .codec(record)
            .and_then(|codec| codec.parse(&stored).map(|bits| (codec, bits)));
        match parsed {
            Ok((codec, bits)) => {
                let unknown = codec.unknown_positions(&bits);
                if unknown.is_empty() {
                    Some(codec.decode_bits(&bits))
                } else {
                    debug!(column = %self.column, stored = %stored, ?unknown, "stored set has unknown members");
                    None
                }
            }
            Err(err) => {
                debug!(column = %self.column, error = %err, "stored set does not decode");
                None
            }
        }
    }

    fn stored_bits<R: StorageCell>(&self, record: &R, codec: &SetCodec<'_>) -> Option<Bits> {
        record
            .read(&self.column)
            .and_then(|scalar| codec.parse(&scalar).ok())
    }

    /// Replace the whole set. Absent input clears the column; anything else
    /// must resolve completely or nothing is written. The attribute is marked
    /// changed only when the resolved bits differ from the stored ones.
    pub fn assign<'i, R>(&self, record: &mut R, input: impl Into<SetInput<'i>>) -> Result<(), AssignError>
    where
        R: StorageCell + ChangeTracking,
    {
        let codec = self.codec(record)?;
        let bits = match input.into() {
            SetInput::Absent => None,
            input => Some(codec.encode_bits(codec.coerce(input)?)?),
        };
        self.store(record, &codec, bits);
        Ok(())
    }

    fn store<R>(&self, record: &mut R, codec: &SetCodec<'_>, bits: Option<Bits>)
    where
        R: StorageCell + ChangeTracking,
    {
        if self.stored_bits(record, codec) == bits {
            return;
        }
        record.write(&self.column, bits.as_ref().map(Bits::to_scalar));
        record.mark_changed(&self.name);
    }

    pub fn has_changed<R: ChangeTracking>(&self, record: &R) -> bool {
        record.has_changed(&self.name)
    }

    pub fn reset_changed<R: ChangeTracking>(&self, record: &mut R) {
        record.reset_changed(&self.name);
    }

    /// Whether `value`'s bit is set. Foreign values and unreadable cells
    /// answer `false`.
    pub fn is_member<R: StorageCell>(&self, record: &R, value: &EnumValue) -> bool {
        let stored = record.read(&self.column);
        self.codec(record)
            .and_then(|codec| codec.contains(stored.as_ref(), value))
            .unwrap_or(false)
    }

    /// Set or clear one member, leaving the others alone. A cell that does
    /// not parse is left as it is and reported as [`CodecError::Malformed`].
    pub fn set_member<R>(&self, record: &mut R, value: &EnumValue, present: bool) -> Result<(), AssignError>
    where
        R: StorageCell + ChangeTracking,
    {
        let codec = self.codec(record)?;
        if !self.ty.contains(value) {
            return Err(CodecError::ForeignValue {
                type_name: self.ty.display_name().to_string(),
                value: value.to_string(),
            }
            .into());
        }
        let mut bits = match record.read(&self.column) {
            Some(scalar) => codec.parse(&scalar)?,
            None => codec.empty(),
        };
        if present {
            bits.set(value.bit_position())?;
        } else {
            bits.clear(value.bit_position());
        }
        self.store(record, &codec, Some(bits));
        Ok(())
    }

    /// `<singular attribute name>_<underscored value name>`, e.g.
    /// `drink_cuba_libre` for `Drinks::CubaLibre` in `drinks`.
    pub fn field_name(&self, value: &EnumValue) -> String {
        format!("{}_{}", singularize(&self.name), value.underscored_name())
    }

    /// Every member predicate name, sorted.
    pub fn available(&self) -> Vec<String> {
        let mut names: Vec<String> = self.ty.iter().map(|value| self.field_name(value)).collect();
        names.sort();
        names
    }

    /// The member a predicate name such as `drink_beer` refers to.
    pub fn member(&self, field: &str) -> Option<&EnumValue> {
        self.ty.iter().find(|value| self.field_name(value) == field)
    }

    /// Answer a member predicate; `None` if the name is not one.
    pub fn predicate<R: StorageCell>(&self, record: &R, field: &str) -> Option<bool> {
        self.member(field).map(|value| self.is_member(record, value))
    }

    /// Set or clear the member a predicate name refers to.
    pub fn set_predicate<R>(&self, record: &mut R, field: &str, present: bool) -> Result<(), AssignError>
    where
        R: StorageCell + ChangeTracking,
    {
        let value = self.member(field).ok_or_else(|| AssignError::UnknownMember {
            attribute: self.name.clone(),
            field: field.to_string(),
        })?;
        self.set_member(record, value, present)
    }

    /// Flag a stored scalar that does not parse or has bits no member owns.
    pub fn validate<R>(&self, record: &mut R) -> bool
    where
        R: StorageCell + ValidationReporter,
    {
        let Some(stored) = record.read(&self.column) else {
            return true;
        };
        let clean = self
            .codec(record)
            .and_then(|codec| codec.unknown_bits(&stored))
            .is_ok_and(|unknown| unknown.is_empty());
        if clean {
            return true;
        }
        warn!(column = %self.column, stored = %stored, "invalid set value");
        record.report_field_error(
            &self.column,
            format!("Unknown members in '{stored}' for set '{}'", self.name),
        );
        false
    }
}
