//! Per-instance attribute storage

use crate::lazy::LazyValue;
use crate::value::Value;

/// Storage for one named attribute on one instance
///
/// Once a slot holds an explicit assignment it never consults the
/// fallback chain again; there is no transition back to `Unset`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AttributeSlot {
    #[default]
    Unset,
    Set(Value),
    SetLazy(LazyValue),
}

impl AttributeSlot {
    /// Slot state for a plain assignment; lazy values stay deferred
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Lazy(lazy) => AttributeSlot::SetLazy(lazy),
            other => AttributeSlot::Set(other),
        }
    }

    pub fn is_set(&self) -> bool {
        !matches!(self, AttributeSlot::Unset)
    }

    /// The stored content without evaluating it
    pub fn raw(&self) -> Option<Value> {
        match self {
            AttributeSlot::Unset => None,
            AttributeSlot::Set(value) => Some(value.clone()),
            AttributeSlot::SetLazy(lazy) => Some(Value::Lazy(lazy.clone())),
        }
    }
}
