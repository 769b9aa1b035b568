//! Named behavior tables shared by a type or owned by a single value.
//!
//! A type carries one shared [`BehaviorSet`]; each value may carry an
//! override table. Dispatch consults the value's overrides first and falls
//! back to the shared set.

use crate::error::BehaviorError;
use crate::value::EnumValue;
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Signature of a behavior method.
pub type MethodFn = dyn Fn(&Invocation<'_>) -> Result<Value, BehaviorError> + Send + Sync;

/// Who a method was invoked on.
#[derive(Debug, Clone, Copy)]
pub enum Receiver<'a> {
    /// Invoked from a defining context, before any value exists.
    Type(&'a str),
    /// Invoked on a finished value.
    Value(&'a EnumValue),
}

impl fmt::Display for Receiver<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Receiver::Type(name) => write!(f, "{name}"),
            Receiver::Value(value) => write!(f, "{value}"),
        }
    }
}

/// One method call: receiver, method name and positional arguments.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    receiver: Receiver<'a>,
    method: &'a str,
    args: &'a [Value],
}

impl<'a> Invocation<'a> {
    pub(crate) fn new(receiver: Receiver<'a>, method: &'a str, args: &'a [Value]) -> Self {
        Self {
            receiver,
            method,
            args,
        }
    }

    pub fn receiver(&self) -> Receiver<'a> {
        self.receiver
    }

    /// The receiving value, if the method was invoked on one.
    pub fn value(&self) -> Option<&'a EnumValue> {
        match self.receiver {
            Receiver::Value(value) => Some(value),
            Receiver::Type(_) => None,
        }
    }

    /// The receiving value, or [`BehaviorError::NoReceiver`].
    pub fn require_value(&self) -> Result<&'a EnumValue, BehaviorError> {
        self.value().ok_or_else(|| BehaviorError::NoReceiver {
            receiver: self.receiver.to_string(),
            method: self.method.to_string(),
        })
    }

    pub fn method(&self) -> &'a str {
        self.method
    }

    pub fn args(&self) -> &'a [Value] {
        self.args
    }

    pub fn arg(&self, index: usize) -> Option<&'a Value> {
        self.args.get(index)
    }

    /// Error for a method that subclasses of the behavior are expected to
    /// override.
    pub fn not_implemented(&self) -> BehaviorError {
        BehaviorError::NotImplemented {
            receiver: self.receiver.to_string(),
            method: self.method.to_string(),
        }
    }

    pub fn fail(&self, message: impl Into<String>) -> BehaviorError {
        BehaviorError::Failed {
            receiver: self.receiver.to_string(),
            method: self.method.to_string(),
            message: message.into(),
        }
    }
}

/// An ordered table of named methods.
#[derive(Clone, Default)]
pub struct BehaviorSet {
    name: Option<String>,
    methods: IndexMap<String, Arc<MethodFn>>,
}

impl BehaviorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A named set, typically a reusable extension.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            methods: IndexMap::new(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Add (or replace) a method, builder style.
    pub fn method<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Invocation<'_>) -> Result<Value, BehaviorError> + Send + Sync + 'static,
    {
        self.define(name, f);
        self
    }

    /// Add (or replace) a method in place.
    pub fn define<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(&Invocation<'_>) -> Result<Value, BehaviorError> + Send + Sync + 'static,
    {
        self.methods.insert(name.into(), Arc::new(f));
    }

    pub fn get(&self, name: &str) -> Option<&Arc<MethodFn>> {
        self.methods.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Merge `other` into `self`; methods of `other` win on name clashes.
    pub fn merge(&mut self, other: &BehaviorSet) {
        for (name, method) in &other.methods {
            self.methods.insert(name.clone(), Arc::clone(method));
        }
    }
}

impl fmt::Debug for BehaviorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviorSet")
            .field("name", &self.name)
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn constant(value: &'static str) -> impl Fn(&Invocation<'_>) -> Result<Value, BehaviorError> {
        move |_| Ok(json!(value))
    }

    #[test]
    fn merge_prefers_incoming_methods() {
        let mut shared = BehaviorSet::new()
            .method("a", constant("shared a"))
            .method("b", constant("shared b"));
        let ext = BehaviorSet::named("Ext").method("b", constant("ext b"));

        shared.merge(&ext);

        let inv = Invocation::new(Receiver::Type("T"), "b", &[]);
        let b = shared.get("b").expect("b should exist");
        assert_eq!(b(&inv).expect("b should succeed"), json!("ext b"));
        assert_eq!(shared.method_names().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn type_receiver_has_no_value() {
        let inv = Invocation::new(Receiver::Type("Rating"), "description", &[]);
        assert!(inv.value().is_none());
        assert_eq!(
            inv.require_value().expect_err("type receiver must not yield a value"),
            BehaviorError::NoReceiver {
                receiver: "Rating".to_string(),
                method: "description".to_string(),
            }
        );
        assert_eq!(
            inv.not_implemented().to_string(),
            "`description` is not implemented for Rating"
        );
    }

    #[test]
    fn debug_lists_method_names() {
        let set = BehaviorSet::named("ExtensionA").method("a", constant("a"));
        assert_eq!(
            format!("{set:?}"),
            r#"BehaviorSet { name: Some("ExtensionA"), methods: ["a"] }"#
        );
    }
}
