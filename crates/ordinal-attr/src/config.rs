//! TOML description of a record model's enum types and attribute bindings.
//!
//! ```toml
//! [types]
//! Product = ["Silver", "Gold", "Titanium"]
//!
//! [enums.product]
//! column_name = "product_type"
//!
//! [sets.drinks]
//! column_name = "drinks_set"
//! enum_class = "Drinks"
//! ```

use crate::error::ConfigError;
use crate::has_enum::EnumAttribute;
use crate::has_set::SetAttribute;
use crate::storage::{ChangeTracking, StorageCell, ValidationReporter};
use ordinal_enum::Namespace;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Options shared by enum and set bindings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BindingOptions {
    /// Overrides the default column name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_name: Option<String>,
    /// Name of the enum type; defaults to the camelized attribute name.
    #[serde(default, alias = "enum_class", skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    /// Explicit-list enum types to define before binding.
    #[serde(default)]
    pub types: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub enums: BTreeMap<String, BindingOptions>,
    #[serde(default)]
    pub sets: BTreeMap<String, BindingOptions>,
}

impl ModelConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Self::parse(text, "<inline>")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        Self::parse(&text, &display)
    }

    fn parse(text: &str, path: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::ParseToml {
            path: path.to_string(),
            source,
        })
    }

    /// Define `[types]` in `scope`, then resolve every binding against it.
    pub fn bind(&self, scope: &mut Namespace) -> Result<ModelBindings, ConfigError> {
        for (name, values) in &self.types {
            scope.define(name, values)?;
        }

        let enums = self
            .enums
            .iter()
            .map(|(name, options)| EnumAttribute::from_options(name, options, scope))
            .collect::<Result<Vec<_>, _>>()?;
        let sets = self
            .sets
            .iter()
            .map(|(name, options)| SetAttribute::from_options(name, options, scope))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            types = self.types.len(),
            enums = enums.len(),
            sets = sets.len(),
            "model bindings resolved"
        );
        Ok(ModelBindings { enums, sets })
    }
}

/// Resolved attribute bindings of one model.
#[derive(Debug, Clone, Default)]
pub struct ModelBindings {
    enums: Vec<EnumAttribute>,
    sets: Vec<SetAttribute>,
}

impl ModelBindings {
    pub fn enums(&self) -> &[EnumAttribute] {
        &self.enums
    }

    pub fn sets(&self) -> &[SetAttribute] {
        &self.sets
    }

    pub fn enum_attribute(&self, name: &str) -> Option<&EnumAttribute> {
        self.enums.iter().find(|attribute| attribute.name() == name)
    }

    pub fn set_attribute(&self, name: &str) -> Option<&SetAttribute> {
        self.sets.iter().find(|attribute| attribute.name() == name)
    }

    /// Validate every bound column, reporting all failures.
    pub fn validate<R>(&self, record: &mut R) -> bool
    where
        R: StorageCell + ValidationReporter,
    {
        let mut valid = true;
        for attribute in &self.enums {
            valid &= attribute.validate(record);
        }
        for attribute in &self.sets {
            valid &= attribute.validate(record);
        }
        valid
    }

    /// Reset every change flag once the record has been saved.
    pub fn after_save<R: ChangeTracking>(&self, record: &mut R) {
        for attribute in &self.enums {
            attribute.reset_changed(record);
        }
        for attribute in &self.sets {
            attribute.reset_changed(record);
        }
    }
}
