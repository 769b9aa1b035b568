//! Compact and structured serialization of enum values.
//!
//! The compact form is the qualified value name (`Status::COMPLETE`) and is
//! also what `serde` serialization of an [`EnumValue`] produces. Reading it
//! back needs the type, so `&EnumType` implements [`DeserializeSeed`].
//!
//! The structured form is a JSON object carrying a type discriminator, the
//! value name and, on request, some or all of the value's fields.

use crate::enum_type::EnumType;
use crate::error::SerializationError;
use crate::value::EnumValue;
use serde::de::{DeserializeSeed, Deserializer, Error as _};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

pub const TYPE_KEY: &str = "type";
pub const NAME_KEY: &str = "name";

/// Which fields the structured form carries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldSelection {
    #[default]
    None,
    All,
    Only(Vec<String>),
}

impl FieldSelection {
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldSelection::Only(names.into_iter().map(Into::into).collect())
    }

    /// Read a selection from a JSON option: `null`/`false` (no fields),
    /// `true` (all fields) or an array of field names.
    pub fn from_json(option: &Value) -> Result<Self, SerializationError> {
        match option {
            Value::Null | Value::Bool(false) => Ok(FieldSelection::None),
            Value::Bool(true) => Ok(FieldSelection::All),
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| SerializationError::UnsupportedSelection(option.to_string()))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(FieldSelection::Only),
            other => Err(SerializationError::UnsupportedSelection(other.to_string())),
        }
    }
}

impl EnumValue {
    /// `Type::NAME`, reversible with [`EnumType::from_compact`].
    pub fn to_compact(&self) -> String {
        self.to_string()
    }

    /// Type discriminator, name and the selected fields. Unset fields are
    /// skipped.
    pub fn to_structured(&self, selection: &FieldSelection) -> Result<Value, SerializationError> {
        let mut doc = Map::new();
        doc.insert(
            TYPE_KEY.to_string(),
            self.type_name()
                .map_or(Value::Null, |name| Value::String(name.to_string())),
        );
        doc.insert(NAME_KEY.to_string(), Value::String(self.name().to_string()));

        let declared = self.declared_fields();
        let selected: Vec<&str> = match selection {
            FieldSelection::None => Vec::new(),
            FieldSelection::All => declared.iter().map(|field| field.name()).collect(),
            FieldSelection::Only(names) => {
                if let Some(unknown) = names
                    .iter()
                    .find(|name| !declared.iter().any(|field| field.name() == name.as_str()))
                {
                    return Err(SerializationError::UnknownField {
                        type_name: self.type_name().unwrap_or("<anonymous>").to_string(),
                        field: unknown.clone(),
                    });
                }
                declared
                    .iter()
                    .map(|field| field.name())
                    .filter(|name| names.iter().any(|selected| selected == name))
                    .collect()
            }
        };

        for name in selected {
            if let Some(value) = self.field(name).filter(|value| !value.is_null()) {
                doc.insert(name.to_string(), value.clone());
            }
        }
        Ok(Value::Object(doc))
    }
}

impl EnumType {
    /// Reverse [`EnumValue::to_compact`]. A bare value name is accepted too.
    pub fn from_compact(&self, text: &str) -> Option<&EnumValue> {
        let name = self
            .name()
            .and_then(|type_name| text.strip_prefix(type_name))
            .and_then(|rest| rest.strip_prefix("::"))
            .unwrap_or(text);
        self.with_name(name)
    }

    /// Reverse [`EnumValue::to_structured`], checking the discriminator.
    pub fn from_structured(&self, doc: &Value) -> Result<&EnumValue, SerializationError> {
        let found = doc
            .get(TYPE_KEY)
            .ok_or(SerializationError::MissingKey(TYPE_KEY))?;
        let expected = self.name().map_or(Value::Null, |name| Value::String(name.to_string()));
        if *found != expected {
            return Err(SerializationError::TypeMismatch {
                expected: self.display_name().to_string(),
                found: found
                    .as_str()
                    .map_or_else(|| found.to_string(), str::to_string),
            });
        }
        let name = doc
            .get(NAME_KEY)
            .and_then(Value::as_str)
            .ok_or(SerializationError::MissingKey(NAME_KEY))?;
        self.with_name(name)
            .ok_or_else(|| SerializationError::UnknownValue {
                type_name: self.display_name().to_string(),
                name: name.to_string(),
            })
    }
}

impl Serialize for EnumValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, 'a> DeserializeSeed<'de> for &'a EnumType {
    type Value = &'a EnumValue;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        let text = String::deserialize(deserializer)?;
        self.from_compact(&text).ok_or_else(|| {
            D::Error::custom(format!("{} has no value {text}", self.display_name()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{define_enum_type, define_enum_type_with, Field};
    use serde_json::json;

    #[test]
    fn selection_from_json() {
        assert_eq!(FieldSelection::from_json(&json!(null)), Ok(FieldSelection::None));
        assert_eq!(FieldSelection::from_json(&json!(false)), Ok(FieldSelection::None));
        assert_eq!(FieldSelection::from_json(&json!(true)), Ok(FieldSelection::All));
        assert_eq!(
            FieldSelection::from_json(&json!(["bar", "baz"])),
            Ok(FieldSelection::only(["bar", "baz"]))
        );
        assert_eq!(
            FieldSelection::from_json(&json!("bar")),
            Err(SerializationError::UnsupportedSelection("\"bar\"".to_string()))
        );
        assert!(FieldSelection::from_json(&json!([1])).is_err());
    }

    #[test]
    fn compact_form_accepts_bare_names() {
        let status = define_enum_type(Some("Status"), ["NOT_STARTED", "COMPLETE"]).expect("status");
        assert_eq!(status.first().to_compact(), "Status::NOT_STARTED");
        assert!(std::ptr::eq(
            status.from_compact("COMPLETE").expect("bare name"),
            status.last()
        ));
        assert_eq!(status.from_compact("Other::COMPLETE"), None);
    }

    #[test]
    fn unknown_selected_field_is_an_error() {
        let foo = define_enum_type_with(Some("Foo1"), |ctx| {
            ctx.field(Field::new("foo"));
            ctx.value("Baz", [json!({ "foo": "my foo" })])?;
            Ok(())
        })
        .expect("foo1");
        assert_eq!(
            foo.first().to_structured(&FieldSelection::only(["nope"])),
            Err(SerializationError::UnknownField {
                type_name: "Foo1".to_string(),
                field: "nope".to_string(),
            })
        );
    }

    #[test]
    fn structured_discriminator_is_checked() {
        let status = define_enum_type(Some("Status"), ["A"]).expect("status");
        let err = status
            .from_structured(&json!({ "type": "Color", "name": "A" }))
            .expect_err("wrong type must fail");
        assert_eq!(
            err,
            SerializationError::TypeMismatch {
                expected: "Status".to_string(),
                found: "Color".to_string(),
            }
        );
        assert_eq!(
            status.from_structured(&json!({ "name": "A" })),
            Err(SerializationError::MissingKey(TYPE_KEY))
        );
        assert_eq!(
            status.from_structured(&json!({ "type": "Status", "name": "B" })),
            Err(SerializationError::UnknownValue {
                type_name: "Status".to_string(),
                name: "B".to_string(),
            })
        );
    }

    #[test]
    fn serde_uses_compact_form() {
        let status = define_enum_type(Some("Status"), ["NOT_STARTED", "COMPLETE"]).expect("status");
        let encoded = serde_json::to_string(status.last()).expect("serialize");
        assert_eq!(encoded, "\"Status::COMPLETE\"");

        let mut de = serde_json::Deserializer::from_str(&encoded);
        let decoded = (&*status).deserialize(&mut de).expect("deserialize");
        assert!(std::ptr::eq(decoded, status.last()));

        let mut bad = serde_json::Deserializer::from_str("\"Status::NOPE\"");
        assert!((&*status).deserialize(&mut bad).is_err());
    }
}
