//! A single member of an enum type.

use crate::behavior::{BehaviorSet, Invocation, Receiver};
use crate::enum_type::{EnumTypeId, TypeShared};
use crate::error::BehaviorError;
use crate::field::Field;
use crate::inflect::{demodulize, singularize, underscore};
use indexmap::IndexMap;
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// An immutable member of an [`EnumType`](crate::EnumType).
///
/// Values are created once, while their type is finalized, and are only ever
/// handed out by shared reference afterwards. Two values are equal exactly
/// when they belong to the same type and have the same ordinal; values sort
/// by ordinal, i.e. in declaration order.
pub struct EnumValue {
    ty: Arc<TypeShared>,
    name: String,
    ordinal: usize,
    bit_position: usize,
    fields: IndexMap<String, Value>,
    overrides: BehaviorSet,
}

impl EnumValue {
    pub(crate) fn new(ty: Arc<TypeShared>, name: String, ordinal: usize) -> Self {
        Self {
            ty,
            name,
            ordinal,
            bit_position: ordinal,
            fields: IndexMap::new(),
            overrides: BehaviorSet::new(),
        }
    }

    pub(crate) fn shared(&self) -> &Arc<TypeShared> {
        &self.ty
    }

    pub(crate) fn set_field(&mut self, name: String, value: Value) {
        self.fields.insert(name, value);
    }

    pub(crate) fn set_bit_position(&mut self, position: usize) {
        self.bit_position = position;
    }

    pub(crate) fn set_overrides(&mut self, overrides: BehaviorSet) {
        self.overrides = overrides;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Zero-based declaration position.
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// Alias of [`ordinal`](Self::ordinal).
    pub fn id(&self) -> usize {
        self.ordinal
    }

    /// Bit this value occupies in a packed set. Defaults to the ordinal.
    pub fn bit_position(&self) -> usize {
        self.bit_position
    }

    pub fn type_id(&self) -> EnumTypeId {
        self.ty.id
    }

    /// Qualified name of the owning type; `None` for anonymous types.
    pub fn type_name(&self) -> Option<&str> {
        self.ty.name.as_deref()
    }

    pub fn is_same_type(&self, other: &EnumValue) -> bool {
        self.ty.id == other.ty.id
    }

    /// `CubaLibre` → `cuba_libre`.
    pub fn underscored_name(&self) -> String {
        underscore(&self.name)
    }

    /// `<singular type name>_<underscored value name>`, e.g. `drink_cuba_libre`
    /// for `Drinks::CubaLibre`.
    pub fn field_name(&self) -> String {
        match self.type_name() {
            Some(type_name) => format!(
                "{}_{}",
                singularize(&underscore(demodulize(type_name))),
                self.underscored_name()
            ),
            None => self.underscored_name(),
        }
    }

    /// Resolved value of a declared field; `None` when unset or undeclared.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(Value::as_str)
    }

    /// Resolved fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Field declarations of the owning type.
    pub fn declared_fields(&self) -> &[Field] {
        &self.ty.fields
    }

    /// Methods defined only on this value.
    pub fn overrides(&self) -> &BehaviorSet {
        &self.overrides
    }

    pub fn responds_to(&self, method: &str) -> bool {
        self.overrides.contains(method) || self.ty.behavior.contains(method)
    }

    /// Invoke `method`, preferring this value's override over the shared
    /// behavior of its type.
    pub fn call(&self, method: &str, args: &[Value]) -> Result<Value, BehaviorError> {
        let f = self
            .overrides
            .get(method)
            .or_else(|| self.ty.behavior.get(method))
            .ok_or_else(|| BehaviorError::NoMethod {
                receiver: self.to_string(),
                method: method.to_string(),
            })?;
        f(&Invocation::new(Receiver::Value(self), method, args))
    }
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.type_name() {
            Some(type_name) => write!(f, "{type_name}::{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

impl fmt::Debug for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EnumValue({self}#{})", self.ordinal)
    }
}

impl PartialEq for EnumValue {
    fn eq(&self, other: &Self) -> bool {
        self.ty.id == other.ty.id && self.ordinal == other.ordinal
    }
}

impl Eq for EnumValue {}

impl Hash for EnumValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ty.id.hash(state);
        self.ordinal.hash(state);
    }
}

impl PartialOrd for EnumValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EnumValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ordinal
            .cmp(&other.ordinal)
            .then_with(|| self.ty.id.cmp(&other.ty.id))
    }
}
