//! Explicitly owned registries of named enum types.

use crate::enum_type::EnumType;
use crate::error::DefinitionError;
use crate::factory::{DefiningContext, EnumTypeFactory, ValueSpec};
use crate::inflect::camelize;
use indexmap::IndexMap;
use std::sync::Arc;

/// A registry of enum types, optionally nested under a path such as
/// `MyNamespace`. Types registered here are reachable by their short or
/// qualified name.
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    path: Option<String>,
    types: IndexMap<String, Arc<EnumType>>,
}

impl Namespace {
    /// The top-level namespace.
    pub fn root() -> Self {
        Self::default()
    }

    /// A namespace whose types are qualified as `path::Type`.
    pub fn nested(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            types: IndexMap::new(),
        }
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Qualify a short type name with this namespace's path.
    pub fn qualify(&self, name: &str) -> String {
        match &self.path {
            Some(path) => format!("{path}::{name}"),
            None => name.to_string(),
        }
    }

    /// Declare an explicit-list type in this namespace.
    pub fn define<I, S>(&mut self, type_name: &str, values: I) -> Result<Arc<EnumType>, DefinitionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        EnumTypeFactory::create(self, Some(type_name), ValueSpec::explicit(values), |_| Ok(()))
    }

    /// Declare a type whose values are declared in `block`.
    pub fn define_with<F>(&mut self, type_name: &str, block: F) -> Result<Arc<EnumType>, DefinitionError>
    where
        F: FnOnce(&mut DefiningContext) -> Result<(), DefinitionError>,
    {
        EnumTypeFactory::create(self, Some(type_name), ValueSpec::DefinedInBlock, block)
    }

    /// Register a finished, named type.
    pub fn insert(&mut self, ty: EnumType) -> Result<Arc<EnumType>, DefinitionError> {
        let name = ty.name().ok_or(DefinitionError::EmptyTypeName)?.to_string();
        if self.types.contains_key(&name) {
            return Err(DefinitionError::TypeAlreadyDefined(name));
        }
        let ty = Arc::new(ty);
        self.types.insert(name, Arc::clone(&ty));
        Ok(ty)
    }

    /// Look a type up by qualified name, short name, or underscored name
    /// (`music_styles` finds `MusicStyles`).
    pub fn get(&self, name: &str) -> Option<&Arc<EnumType>> {
        self.types
            .get(name)
            .or_else(|| self.types.get(&self.qualify(name)))
            .or_else(|| self.types.get(&self.qualify(&camelize(name))))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Registered types in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<EnumType>> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
