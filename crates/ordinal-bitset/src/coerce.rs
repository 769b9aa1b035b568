//! Turning loosely typed set input into members of an enum type.

use crate::codec::EnumSet;
use crate::error::CoercionError;
use ordinal_enum::{EnumType, EnumValue};
use tracing::debug;

/// One element of a set assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum SetItem<'a> {
    Value(&'a EnumValue),
    Ordinal(i64),
    /// A name, a lower-case underscored name, or digits.
    Name(String),
}

impl SetItem<'_> {
    fn resolve<'t>(&self, ty: &'t EnumType) -> Option<&'t EnumValue> {
        match self {
            SetItem::Value(value) => ty.get(*value),
            SetItem::Ordinal(ordinal) => ty.get(*ordinal),
            SetItem::Name(name) => ty.get(name.as_str()),
        }
    }

    fn token(&self) -> String {
        match self {
            SetItem::Value(value) => value.to_string(),
            SetItem::Ordinal(ordinal) => ordinal.to_string(),
            SetItem::Name(name) => name.clone(),
        }
    }
}

impl<'a> From<&'a EnumValue> for SetItem<'a> {
    fn from(value: &'a EnumValue) -> Self {
        SetItem::Value(value)
    }
}

impl From<i64> for SetItem<'_> {
    fn from(ordinal: i64) -> Self {
        SetItem::Ordinal(ordinal)
    }
}

/// Ordinals past `i64::MAX` keep their digits, so an unresolved one is
/// reported as given.
impl From<usize> for SetItem<'_> {
    fn from(ordinal: usize) -> Self {
        i64::try_from(ordinal)
            .map(SetItem::Ordinal)
            .unwrap_or_else(|_| SetItem::Name(ordinal.to_string()))
    }
}

impl From<&str> for SetItem<'_> {
    fn from(name: &str) -> Self {
        SetItem::Name(name.to_string())
    }
}

impl From<String> for SetItem<'_> {
    fn from(name: String) -> Self {
        SetItem::Name(name)
    }
}

/// Everything a set attribute can be assigned.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SetInput<'a> {
    /// Nothing; resolves to the empty set.
    #[default]
    Absent,
    Items(Vec<SetItem<'a>>),
    /// Comma-separated names. Tokens are trimmed and empty tokens skipped.
    List(String),
}

impl<'a> SetInput<'a> {
    pub fn items<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<SetItem<'a>>,
    {
        SetInput::Items(items.into_iter().map(Into::into).collect())
    }

    fn into_items(self) -> Vec<SetItem<'a>> {
        match self {
            SetInput::Absent => Vec::new(),
            SetInput::Items(items) => items,
            SetInput::List(list) => list
                .split(',')
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(SetItem::from)
                .collect(),
        }
    }
}

impl<'a> From<&'a EnumValue> for SetInput<'a> {
    fn from(value: &'a EnumValue) -> Self {
        SetInput::Items(vec![SetItem::Value(value)])
    }
}

impl<'a> From<Vec<&'a EnumValue>> for SetInput<'a> {
    fn from(values: Vec<&'a EnumValue>) -> Self {
        SetInput::items(values)
    }
}

impl<'a> From<&EnumSet<'a>> for SetInput<'a> {
    fn from(set: &EnumSet<'a>) -> Self {
        SetInput::items(set.iter().copied())
    }
}

impl<'a> From<Vec<&str>> for SetInput<'a> {
    fn from(names: Vec<&str>) -> Self {
        SetInput::items(names)
    }
}

impl<'a> From<Vec<SetItem<'a>>> for SetInput<'a> {
    fn from(items: Vec<SetItem<'a>>) -> Self {
        SetInput::Items(items)
    }
}

impl From<i64> for SetInput<'_> {
    fn from(ordinal: i64) -> Self {
        SetInput::Items(vec![SetItem::Ordinal(ordinal)])
    }
}

impl From<&str> for SetInput<'_> {
    fn from(list: &str) -> Self {
        SetInput::List(list.to_string())
    }
}

impl From<String> for SetInput<'_> {
    fn from(list: String) -> Self {
        SetInput::List(list)
    }
}

impl<'a, T: Into<SetInput<'a>>> From<Option<T>> for SetInput<'a> {
    fn from(input: Option<T>) -> Self {
        input.map_or(SetInput::Absent, Into::into)
    }
}

/// Resolve every element against `ty`. Any miss rejects the whole input and
/// reports all misses.
pub(crate) fn resolve<'t>(ty: &'t EnumType, input: SetInput<'_>) -> Result<EnumSet<'t>, CoercionError> {
    let mut members = Vec::new();
    let mut unresolved = Vec::new();
    for item in input.into_items() {
        match item.resolve(ty) {
            Some(value) => members.push(value),
            None => unresolved.push(item.token()),
        }
    }

    if !unresolved.is_empty() {
        debug!(type_name = %ty.display_name(), tokens = ?unresolved, "rejected set input");
        return Err(CoercionError::Unresolved {
            type_name: ty.display_name().to_string(),
            tokens: unresolved,
        });
    }
    Ok(members.into_iter().collect())
}
