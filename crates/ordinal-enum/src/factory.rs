//! Enum type construction.
//!
//! Three declaration protocols are supported:
//!
//! 1. an explicit list of names ([`ValueSpec::Explicit`]);
//! 2. values declared one by one on a [`DefiningContext`]
//!    ([`ValueSpec::DefinedInBlock`]), each with positional initialization
//!    arguments and optional per-value behavior;
//! 3. field declarations, shared methods and extension behavior on the same
//!    context, available while the values are declared and afterwards.
//!
//! Declarations are captured first and replayed once the block returns. The
//! capture state is owned by the context and dropped on every exit path, so a
//! failed definition leaves nothing behind.

use crate::behavior::{BehaviorSet, Invocation, Receiver};
use crate::enum_type::{EnumType, EnumTypeId, TypeShared};
use crate::error::{BehaviorError, DefinitionError};
use crate::field::Field;
use crate::inflect::camelize;
use crate::namespace::Namespace;
use crate::value::EnumValue;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Custom per-value initializer: receives the value under construction and
/// its positional arguments.
pub type InitFn = dyn Fn(&mut ValueInit<'_>, &[Value]) -> Result<(), DefinitionError> + Send + Sync;

/// Highest bit position a value may occupy.
pub const MAX_BIT_POSITION: usize = u16::MAX as usize;

/// How the values of a type are supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSpec {
    /// Plain construction from an ordered list of names.
    Explicit(Vec<String>),
    /// Values are declared on the [`DefiningContext`].
    DefinedInBlock,
}

impl ValueSpec {
    pub fn explicit<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ValueSpec::Explicit(names.into_iter().map(Into::into).collect())
    }
}

/// One captured value declaration, replayed at finalization.
#[derive(Debug)]
pub struct ValueDeclaration {
    name: String,
    args: Vec<Value>,
    overrides: Option<BehaviorSet>,
    bit_position: Option<usize>,
}

impl ValueDeclaration {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Attach behavior that only this value has. Methods here take precedence
    /// over the type's shared behavior.
    pub fn behavior(&mut self, overrides: BehaviorSet) -> &mut Self {
        match &mut self.overrides {
            Some(existing) => existing.merge(&overrides),
            None => self.overrides = Some(overrides),
        }
        self
    }

    pub fn method<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&Invocation<'_>) -> Result<Value, BehaviorError> + Send + Sync + 'static,
    {
        self.overrides
            .get_or_insert_with(BehaviorSet::new)
            .define(name, f);
        self
    }

    /// Pin the value to a bit position instead of its ordinal.
    pub fn bit_position(&mut self, position: usize) -> &mut Self {
        self.bit_position = Some(position);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Explicit,
    Capturing,
}

/// Builder handed to the definition block of an enum type.
pub struct DefiningContext {
    type_name: String,
    mode: Mode,
    fields: Vec<Field>,
    behavior: BehaviorSet,
    extensions: Vec<String>,
    init: Option<Arc<InitFn>>,
    declarations: Vec<ValueDeclaration>,
}

impl DefiningContext {
    fn new(type_name: String, mode: Mode) -> Self {
        Self {
            type_name,
            mode,
            fields: Vec::new(),
            behavior: BehaviorSet::new(),
            extensions: Vec::new(),
            init: None,
            declarations: Vec::new(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Whether value declarations are being captured.
    pub fn is_capturing(&self) -> bool {
        self.mode == Mode::Capturing
    }

    /// Declare the next value with its positional initialization arguments.
    ///
    /// Fails with [`DefinitionError::NoDefiningContext`] for explicit-list
    /// types, and on empty or duplicate names.
    pub fn value<I>(
        &mut self,
        name: impl Into<String>,
        args: I,
    ) -> Result<&mut ValueDeclaration, DefinitionError>
    where
        I: IntoIterator<Item = Value>,
    {
        let name = name.into();
        if self.mode != Mode::Capturing {
            return Err(DefinitionError::NoDefiningContext {
                type_name: self.type_name.clone(),
                name,
            });
        }
        if name.is_empty() {
            return Err(DefinitionError::EmptyValueName {
                type_name: self.type_name.clone(),
            });
        }
        if self.declarations.iter().any(|decl| decl.name == name) {
            return Err(DefinitionError::DuplicateValue {
                type_name: self.type_name.clone(),
                name,
            });
        }

        trace!(type_name = %self.type_name, value = %name, "captured value declaration");
        self.declarations.push(ValueDeclaration {
            name,
            args: args.into_iter().collect(),
            overrides: None,
            bit_position: None,
        });
        let index = self.declarations.len() - 1;
        Ok(&mut self.declarations[index])
    }

    /// Declare a field. Redeclaring a name replaces the earlier declaration.
    pub fn field(&mut self, field: Field) -> &mut Self {
        self.fields.retain(|existing| existing.name() != field.name());
        self.fields.push(field);
        self
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Define a method shared by every value of the type.
    pub fn method<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&Invocation<'_>) -> Result<Value, BehaviorError> + Send + Sync + 'static,
    {
        self.behavior.define(name, f);
        self
    }

    /// Pull reusable behavior sets (and an optional inline set, which wins on
    /// clashes) into the type's shared behavior.
    pub fn definition_extension<I>(&mut self, extensions: I, inline: Option<BehaviorSet>) -> &mut Self
    where
        I: IntoIterator<Item = BehaviorSet>,
    {
        for extension in extensions.into_iter().chain(inline) {
            if let Some(name) = extension.name() {
                self.extensions.push(name.to_string());
            }
            self.behavior.merge(&extension);
        }
        self
    }

    /// Names of the extensions pulled in so far.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Replace the default field initializer.
    pub fn init<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&mut ValueInit<'_>, &[Value]) -> Result<(), DefinitionError> + Send + Sync + 'static,
    {
        self.init = Some(Arc::new(f));
        self
    }

    /// Call a shared or extension method from within the definition, for
    /// example to compute a declaration's arguments.
    pub fn invoke(&self, method: &str, args: &[Value]) -> Result<Value, DefinitionError> {
        let f = self
            .behavior
            .get(method)
            .ok_or_else(|| DefinitionError::UndefinedMethod {
                type_name: self.type_name.clone(),
                method: method.to_string(),
            })?;
        Ok(f(&Invocation::new(
            Receiver::Type(&self.type_name),
            method,
            args,
        ))?)
    }

    /// Names of the values captured so far, in declaration order.
    pub fn declared(&self) -> impl Iterator<Item = &str> {
        self.declarations.iter().map(ValueDeclaration::name)
    }
}

impl fmt::Debug for DefiningContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefiningContext")
            .field("type_name", &self.type_name)
            .field("mode", &self.mode)
            .field("fields", &self.fields)
            .field("behavior", &self.behavior)
            .field("extensions", &self.extensions)
            .field("declarations", &self.declarations)
            .finish()
    }
}

/// Handle on a value while its initializer runs.
pub struct ValueInit<'a> {
    value: &'a mut EnumValue,
}

impl ValueInit<'_> {
    pub fn name(&self) -> &str {
        self.value.name()
    }

    pub fn ordinal(&self) -> usize {
        self.value.ordinal()
    }

    /// The value as built so far.
    pub fn value(&self) -> &EnumValue {
        self.value
    }

    /// Set a declared field.
    pub fn set(&mut self, field: &str, value: Value) -> Result<(), DefinitionError> {
        if !self
            .value
            .declared_fields()
            .iter()
            .any(|declared| declared.name() == field)
        {
            return Err(DefinitionError::UndeclaredField {
                type_name: self
                    .value
                    .type_name()
                    .unwrap_or("<anonymous>")
                    .to_string(),
                field: field.to_string(),
            });
        }
        self.value.set_field(field.to_string(), value);
        Ok(())
    }

    pub fn set_bit_position(&mut self, position: usize) {
        self.value.set_bit_position(position);
    }

    /// The default initializer: resolve every declared field from `args`,
    /// static defaults and computed defaults, in declaration order.
    pub fn resolve_fields(&mut self, args: &Map<String, Value>) {
        let shared = Arc::clone(self.value.shared());
        for field in &shared.fields {
            if let Some(resolved) = field.default_value(self.value, args) {
                self.value.set_field(field.name().to_string(), resolved);
            }
        }
    }
}

/// Builds enum types from one of the declaration protocols.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumTypeFactory;

impl EnumTypeFactory {
    /// Build a type and register it in `scope`.
    ///
    /// Named types are camelized (`hair_color` → `HairColor`), qualified by
    /// the namespace path and registered; anonymous types are only returned.
    pub fn create<F>(
        scope: &mut Namespace,
        type_name: Option<&str>,
        spec: ValueSpec,
        block: F,
    ) -> Result<Arc<EnumType>, DefinitionError>
    where
        F: FnOnce(&mut DefiningContext) -> Result<(), DefinitionError>,
    {
        let Some(type_name) = type_name else {
            return Self::assemble(None, spec, block).map(Arc::new);
        };
        let qualified = scope.qualify(&canonical_type_name(type_name)?);
        if scope.contains(&qualified) {
            return Err(DefinitionError::TypeAlreadyDefined(qualified));
        }
        let ty = Self::assemble(Some(qualified), spec, block)?;
        scope.insert(ty)
    }

    /// Build a type without registering it anywhere.
    pub fn build<F>(
        type_name: Option<&str>,
        spec: ValueSpec,
        block: F,
    ) -> Result<EnumType, DefinitionError>
    where
        F: FnOnce(&mut DefiningContext) -> Result<(), DefinitionError>,
    {
        let qualified = type_name.map(canonical_type_name).transpose()?;
        Self::assemble(qualified, spec, block)
    }

    fn assemble<F>(
        qualified: Option<String>,
        spec: ValueSpec,
        block: F,
    ) -> Result<EnumType, DefinitionError>
    where
        F: FnOnce(&mut DefiningContext) -> Result<(), DefinitionError>,
    {
        let label = qualified
            .clone()
            .unwrap_or_else(|| "<anonymous>".to_string());
        let mode = match spec {
            ValueSpec::Explicit(_) => Mode::Explicit,
            ValueSpec::DefinedInBlock => Mode::Capturing,
        };

        let mut ctx = DefiningContext::new(label.clone(), mode);
        block(&mut ctx)?;
        let DefiningContext {
            fields,
            behavior,
            init,
            declarations,
            ..
        } = ctx;

        let shared = Arc::new(TypeShared {
            id: EnumTypeId::next(),
            name: qualified,
            fields,
            behavior,
        });

        let values = match spec {
            ValueSpec::Explicit(names) => explicit_values(&shared, &label, names)?,
            ValueSpec::DefinedInBlock => replay(&shared, &label, declarations, init.as_deref())?,
        };
        if values.is_empty() {
            return Err(DefinitionError::NoValues { type_name: label });
        }

        debug!(
            type_name = %label,
            values = values.len(),
            fields = shared.fields.len(),
            "enum type finalized"
        );
        Ok(EnumType::finalize(shared, values))
    }
}

/// Trim and camelize a type name.
pub fn canonical_type_name(name: &str) -> Result<String, DefinitionError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DefinitionError::EmptyTypeName);
    }
    Ok(camelize(name))
}

fn explicit_values(
    shared: &Arc<TypeShared>,
    label: &str,
    names: Vec<String>,
) -> Result<Vec<EnumValue>, DefinitionError> {
    let mut values: Vec<EnumValue> = Vec::with_capacity(names.len());
    for name in names {
        if name.is_empty() {
            return Err(DefinitionError::EmptyValueName {
                type_name: label.to_string(),
            });
        }
        if values.iter().any(|value| value.name() == name) {
            return Err(DefinitionError::DuplicateValue {
                type_name: label.to_string(),
                name,
            });
        }
        let ordinal = values.len();
        values.push(EnumValue::new(Arc::clone(shared), name, ordinal));
    }
    Ok(values)
}

fn replay(
    shared: &Arc<TypeShared>,
    label: &str,
    declarations: Vec<ValueDeclaration>,
    init: Option<&InitFn>,
) -> Result<Vec<EnumValue>, DefinitionError> {
    let mut values: Vec<EnumValue> = Vec::with_capacity(declarations.len());
    let mut taken: HashMap<usize, usize> = HashMap::new();

    for decl in declarations {
        let ordinal = values.len();
        let mut value = EnumValue::new(Arc::clone(shared), decl.name, ordinal);
        if let Some(overrides) = decl.overrides {
            value.set_overrides(overrides);
        }

        let mut handle = ValueInit { value: &mut value };
        match init {
            Some(init) => init(&mut handle, &decl.args)?,
            None => {
                let args = decl
                    .args
                    .last()
                    .and_then(Value::as_object)
                    .cloned()
                    .unwrap_or_default();
                handle.resolve_fields(&args);
            }
        }
        if let Some(position) = decl.bit_position {
            value.set_bit_position(position);
        }

        if value.bit_position() > MAX_BIT_POSITION {
            return Err(DefinitionError::BitPositionTooLarge {
                type_name: label.to_string(),
                name: value.name().to_string(),
                position: value.bit_position(),
                max: MAX_BIT_POSITION,
            });
        }
        if let Some(&owner) = taken.get(&value.bit_position()) {
            return Err(DefinitionError::DuplicateBitPosition {
                type_name: label.to_string(),
                name: value.name().to_string(),
                position: value.bit_position(),
                taken_by: values[owner].name().to_string(),
            });
        }
        taken.insert(value.bit_position(), ordinal);

        trace!(
            type_name = %label,
            value = %value.name(),
            ordinal,
            bit_position = value.bit_position(),
            "replayed value declaration"
        );
        values.push(value);
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::define_enum_type_with;
    use serde_json::json;

    #[test]
    fn explicit_list_rejects_block_declarations() {
        let err = EnumTypeFactory::build(
            Some("Color"),
            ValueSpec::explicit(["RED", "GREEN"]),
            |ctx| {
                assert!(!ctx.is_capturing());
                ctx.value("BLUE", [])?;
                Ok(())
            },
        )
        .expect_err("explicit list must not capture values");
        assert_eq!(
            err,
            DefinitionError::NoDefiningContext {
                type_name: "Color".to_string(),
                name: "BLUE".to_string(),
            }
        );
    }

    #[test]
    fn explicit_list_rejects_duplicates() {
        let err = EnumTypeFactory::build(Some("Dup"), ValueSpec::explicit(["A", "A"]), |_| Ok(()))
            .expect_err("duplicate names must fail");
        assert!(matches!(err, DefinitionError::DuplicateValue { name, .. } if name == "A"));
    }

    #[test]
    fn block_rejects_duplicates_immediately() {
        let err = define_enum_type_with(Some("HairColor"), |ctx| {
            ctx.value("RED", [])?;
            ctx.value("RED", [])?;
            Ok(())
        })
        .expect_err("duplicate names must fail");
        assert!(matches!(err, DefinitionError::DuplicateValue { .. }));
    }

    #[test]
    fn empty_types_are_rejected() {
        let err = define_enum_type_with(Some("Nothing"), |_| Ok(()))
            .expect_err("a type needs values");
        assert_eq!(
            err,
            DefinitionError::NoValues {
                type_name: "Nothing".to_string()
            }
        );
        assert_eq!(
            EnumTypeFactory::build(Some("  "), ValueSpec::explicit(["A"]), |_| Ok(()))
                .expect_err("blank type name must fail"),
            DefinitionError::EmptyTypeName
        );
    }

    #[test]
    fn type_names_are_camelized() {
        let ty = define_enum_type_with(Some("hair_color"), |ctx| {
            ctx.value("BLONDE", [])?;
            Ok(())
        })
        .expect("hair color should define");
        assert_eq!(ty.name(), Some("HairColor"));
    }

    #[test]
    fn duplicate_bit_positions_are_rejected() {
        let err = define_enum_type_with(Some("Flags"), |ctx| {
            ctx.value("A", [])?.bit_position(3);
            ctx.value("B", [])?.bit_position(3);
            Ok(())
        })
        .expect_err("shared bit must fail");
        assert_eq!(
            err,
            DefinitionError::DuplicateBitPosition {
                type_name: "Flags".to_string(),
                name: "B".to_string(),
                position: 3,
                taken_by: "A".to_string(),
            }
        );
    }

    #[test]
    fn oversized_bit_positions_are_rejected() {
        let err = define_enum_type_with(Some("Flags"), |ctx| {
            ctx.value("A", [])?.bit_position(usize::MAX);
            Ok(())
        })
        .expect_err("bit position past the cap must fail");
        assert_eq!(
            err,
            DefinitionError::BitPositionTooLarge {
                type_name: "Flags".to_string(),
                name: "A".to_string(),
                position: usize::MAX,
                max: MAX_BIT_POSITION,
            }
        );

        let widest = define_enum_type_with(Some("Widest"), |ctx| {
            ctx.value("Top", [])?.bit_position(MAX_BIT_POSITION);
            Ok(())
        })
        .expect("the cap itself is allowed");
        assert_eq!(widest.bit_width(), MAX_BIT_POSITION + 1);
    }

    #[test]
    fn initializer_may_pick_bit_positions() {
        let drinks = define_enum_type_with(Some("Drinks"), |ctx| {
            ctx.init(|init, args| {
                let position = args
                    .first()
                    .and_then(Value::as_u64)
                    .ok_or_else(|| DefinitionError::Initializer {
                        name: init.name().to_string(),
                        message: "expected a bit index".to_string(),
                    })?;
                init.set_bit_position(position as usize);
                Ok(())
            });
            ctx.value("Beer", [json!(4)])?;
            ctx.value("Wine", [json!(0)])?;
            Ok(())
        })
        .expect("drinks should define");
        assert_eq!(drinks.first().bit_position(), 4);
        assert_eq!(drinks.last().bit_position(), 0);
        assert_eq!(drinks.last().ordinal(), 1);
    }

    #[test]
    fn initializer_errors_abort_definition() {
        let err = define_enum_type_with(Some("Broken"), |ctx| {
            ctx.init(|init, _| init.set("missing", json!(1)));
            ctx.value("A", [])?;
            Ok(())
        })
        .expect_err("undeclared field must fail");
        assert_eq!(
            err,
            DefinitionError::UndeclaredField {
                type_name: "Broken".to_string(),
                field: "missing".to_string(),
            }
        );
    }

    #[test]
    fn invoke_unknown_method_is_a_definition_error() {
        let err = define_enum_type_with(Some("Foo3"), |ctx| {
            ctx.invoke("a", &[])?;
            Ok(())
        })
        .expect_err("unknown method must fail");
        assert_eq!(
            err,
            DefinitionError::UndefinedMethod {
                type_name: "Foo3".to_string(),
                method: "a".to_string(),
            }
        );
    }

    #[test]
    fn redeclared_field_moves_to_the_end() {
        let ty = define_enum_type_with(Some("Redeclared"), |ctx| {
            ctx.field(Field::new("a"))
                .field(Field::new("b"))
                .field(Field::new("a").with_default(json!(1)));
            assert_eq!(
                ctx.fields().iter().map(Field::name).collect::<Vec<_>>(),
                vec!["b", "a"]
            );
            ctx.value("X", [])?;
            Ok(())
        })
        .expect("type should define");
        assert_eq!(ty.first().field("a"), Some(&json!(1)));
    }

    #[test]
    fn declaration_overrides_merge() {
        let ty = define_enum_type_with(Some("Merged"), |ctx| {
            ctx.value("X", [])?
                .method("one", |_| Ok(json!(1)))
                .behavior(BehaviorSet::new().method("two", |_| Ok(json!(2))));
            assert_eq!(ctx.declared().collect::<Vec<_>>(), vec!["X"]);
            Ok(())
        })
        .expect("type should define");
        assert_eq!(ty.first().overrides().len(), 2);
    }
}
