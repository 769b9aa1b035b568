//! Lookup keys accepted by [`EnumType::get`](crate::EnumType::get).

use crate::value::EnumValue;

/// Anything an enum value can be looked up by.
#[derive(Debug, Clone, Copy)]
pub enum Key<'a> {
    /// Declaration ordinal.
    Ordinal(usize),
    /// Signed ordinal; negative values never match.
    Integer(i64),
    /// A value used as its own key.
    Value(&'a EnumValue),
    /// Digits, an exact name, or a lower-case underscored name.
    Name(&'a str),
}

impl From<usize> for Key<'_> {
    fn from(ordinal: usize) -> Self {
        Key::Ordinal(ordinal)
    }
}

impl From<u32> for Key<'_> {
    fn from(ordinal: u32) -> Self {
        Key::Integer(i64::from(ordinal))
    }
}

impl From<i32> for Key<'_> {
    fn from(ordinal: i32) -> Self {
        Key::Integer(i64::from(ordinal))
    }
}

impl From<i64> for Key<'_> {
    fn from(ordinal: i64) -> Self {
        Key::Integer(ordinal)
    }
}

impl<'a> From<&'a str> for Key<'a> {
    fn from(name: &'a str) -> Self {
        Key::Name(name)
    }
}

impl<'a> From<&'a String> for Key<'a> {
    fn from(name: &'a String) -> Self {
        Key::Name(name.as_str())
    }
}

impl<'a> From<&'a EnumValue> for Key<'a> {
    fn from(value: &'a EnumValue) -> Self {
        Key::Value(value)
    }
}
