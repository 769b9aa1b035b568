//! The finalized, immutable enum type.

use crate::behavior::BehaviorSet;
use crate::field::Field;
use crate::inflect::{camelize, demodulize, singularize, underscore};
use crate::key::Key;
use crate::value::EnumValue;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-unique identity of an enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EnumTypeId(u64);

impl EnumTypeId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for EnumTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "enum#{}", self.0)
    }
}

/// State every value of a type points back to.
pub(crate) struct TypeShared {
    pub(crate) id: EnumTypeId,
    pub(crate) name: Option<String>,
    pub(crate) fields: Vec<Field>,
    pub(crate) behavior: BehaviorSet,
}

/// A closed, ordered, immutable collection of [`EnumValue`]s.
///
/// Built by [`EnumTypeFactory`](crate::EnumTypeFactory). After finalization
/// nothing hands out mutable access to the values or the lookup tables:
///
/// ```compile_fail
/// let color = ordinal_enum::define_enum_type(Some("Color"), ["RED"]).unwrap();
/// color.values().push(color.values()[0]);
/// ```
pub struct EnumType {
    shared: Arc<TypeShared>,
    values: Vec<EnumValue>,
    by_name: IndexMap<String, usize>,
    by_underscored: IndexMap<String, usize>,
}

impl EnumType {
    /// Freeze `values` into a type. Callers have already checked that the
    /// values are non-empty and uniquely named.
    pub(crate) fn finalize(shared: Arc<TypeShared>, values: Vec<EnumValue>) -> Self {
        let mut by_name = IndexMap::with_capacity(values.len());
        let mut by_underscored = IndexMap::with_capacity(values.len());
        for value in &values {
            by_name.insert(value.name().to_string(), value.ordinal());
            by_underscored
                .entry(value.underscored_name())
                .or_insert(value.ordinal());
        }
        Self {
            shared,
            values,
            by_name,
            by_underscored,
        }
    }

    pub fn id(&self) -> EnumTypeId {
        self.shared.id
    }

    /// Qualified type name; `None` for anonymous types.
    pub fn name(&self) -> Option<&str> {
        self.shared.name.as_deref()
    }

    /// Name used in messages: the qualified name, or `<anonymous>`.
    pub fn display_name(&self) -> &str {
        self.name().unwrap_or("<anonymous>")
    }

    /// Values in declaration order.
    pub fn values(&self) -> &[EnumValue] {
        &self.values
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EnumValue> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false` for a finalized type.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn first(&self) -> &EnumValue {
        &self.values[0]
    }

    pub fn last(&self) -> &EnumValue {
        &self.values[self.values.len() - 1]
    }

    pub fn fields(&self) -> &[Field] {
        &self.shared.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.shared.fields.iter().find(|field| field.name() == name)
    }

    /// Behavior shared by every value.
    pub fn behavior(&self) -> &BehaviorSet {
        &self.shared.behavior
    }

    /// Exact, case-sensitive name lookup.
    pub fn with_name(&self, name: &str) -> Option<&EnumValue> {
        self.by_name.get(name).map(|&ordinal| &self.values[ordinal])
    }

    /// Read-only name → value view.
    pub fn values_by_name(&self) -> NameIndex<'_> {
        NameIndex { ty: self }
    }

    /// Look a value up by ordinal, by itself, or by name.
    ///
    /// Text keys are interpreted as follows: all digits is an ordinal; a
    /// leading lower-case letter is camelized (`foo_bar` → `FooBar`) and, if
    /// that misses, matched against the underscored value names (`green` →
    /// `GREEN`); anything else is an exact name. Nothing matching is `None`.
    pub fn get<'k>(&self, key: impl Into<Key<'k>>) -> Option<&EnumValue> {
        match key.into() {
            Key::Ordinal(ordinal) => self.values.get(ordinal),
            Key::Integer(ordinal) => usize::try_from(ordinal)
                .ok()
                .and_then(|ordinal| self.values.get(ordinal)),
            Key::Value(value) if self.contains(value) => self.values.get(value.ordinal()),
            Key::Value(_) => None,
            Key::Name(text) => self.get_by_text(text),
        }
    }

    fn get_by_text(&self, text: &str) -> Option<&EnumValue> {
        if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
            return text
                .parse::<usize>()
                .ok()
                .and_then(|ordinal| self.values.get(ordinal));
        }
        if text.starts_with(|c: char| c.is_ascii_lowercase()) {
            return self.with_name(&camelize(text)).or_else(|| {
                self.by_underscored
                    .get(text)
                    .map(|&ordinal| &self.values[ordinal])
            });
        }
        self.with_name(text)
    }

    /// Whether `value` is a member of this type.
    pub fn contains(&self, value: &EnumValue) -> bool {
        value.type_id() == self.id()
    }

    pub fn names(&self) -> Vec<&str> {
        self.values.iter().map(EnumValue::name).collect()
    }

    pub fn underscored_names(&self) -> Vec<String> {
        self.values.iter().map(EnumValue::underscored_name).collect()
    }

    pub fn field_names(&self) -> Vec<String> {
        self.values.iter().map(EnumValue::field_name).collect()
    }

    /// Number of bits needed to pack every value: highest bit position + 1.
    pub fn bit_width(&self) -> usize {
        self.values
            .iter()
            .map(|value| value.bit_position() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Underscored, singular form of the type name (`Drinks` → `drink`).
    pub fn singular_name(&self) -> Option<String> {
        self.name()
            .map(|name| singularize(&underscore(demodulize(name))))
    }
}

impl<'a> IntoIterator for &'a EnumType {
    type Item = &'a EnumValue;
    type IntoIter = std::slice::Iter<'a, EnumValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl fmt::Debug for EnumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumType")
            .field("id", &self.shared.id)
            .field("name", &self.shared.name)
            .field("values", &self.names())
            .field("fields", &self.shared.fields)
            .field("behavior", &self.shared.behavior)
            .finish()
    }
}

/// Read-only view of an enum type's values keyed by exact name.
#[derive(Debug, Clone, Copy)]
pub struct NameIndex<'a> {
    ty: &'a EnumType,
}

impl<'a> NameIndex<'a> {
    pub fn get(&self, name: &str) -> Option<&'a EnumValue> {
        self.ty.with_name(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.ty.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.ty.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ty.by_name.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'a str> + use<'a> {
        let ty = self.ty;
        ty.by_name.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a EnumValue)> + use<'a> {
        let ty = self.ty;
        ty.by_name
            .iter()
            .map(move |(name, &ordinal)| (name.as_str(), &ty.values[ordinal]))
    }
}
