//! Effective-value resolution
//!
//! ## Resolution Order
//!
//! 1. **SET**: an explicit value is returned as stored
//! 2. **LAZY**: a deferred value is evaluated now, against the instance when
//!    its mode asks for context
//! 3. **INHERIT**: an unset slot defers to the nearest supertype defining
//!    the attribute, which resolves with its own state
//! 4. **DEFAULT**: otherwise the attribute's default provider is consulted
//!
//! Lazy callables may read other attributes of the same instance. Two lazy
//! attributes that read each other recurse without bound; callers must
//! avoid such cycles.

use crate::error::AttributeResult;
use crate::instance::Instance;
use crate::schema::DefaultProvider;
use crate::slot::AttributeSlot;
use crate::value::Value;

/// Compute the effective value of a plain or boolean attribute
///
/// `supertype` returns `None` when no supertype defines the attribute.
pub fn resolve<S>(
    slot: &AttributeSlot,
    instance: &Instance,
    default: &DefaultProvider,
    supertype: S,
) -> AttributeResult<Value>
where
    S: FnOnce() -> Option<AttributeResult<Value>>,
{
    match slot {
        AttributeSlot::Set(value) => Ok(value.clone()),
        AttributeSlot::SetLazy(lazy) => lazy.get(Some(instance)),
        AttributeSlot::Unset => supertype().unwrap_or_else(|| Ok(default.provide())),
    }
}

/// Compute the raw content of a block attribute without evaluating it
pub fn resolve_raw<S>(slot: &AttributeSlot, supertype: S) -> AttributeResult<Value>
where
    S: FnOnce() -> Option<AttributeResult<Value>>,
{
    match slot.raw() {
        Some(value) => Ok(value),
        None => supertype().unwrap_or(Ok(Value::Nil)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lazy::{lazy, LazyValue};
    use crate::schema::Schema;

    fn instance() -> Instance {
        Instance::new(Schema::builder("Thing").build())
    }

    fn no_supertype() -> Option<AttributeResult<Value>> {
        None
    }

    #[test]
    fn test_set_value_wins() {
        let slot = AttributeSlot::Set(Value::Int(7));
        let value = resolve(&slot, &instance(), &DefaultProvider::value(1), || {
            Some(Ok(Value::Int(2)))
        });
        assert_eq!(value.unwrap(), Value::Int(7));
    }

    #[test]
    fn test_lazy_evaluated_against_instance() {
        let slot = AttributeSlot::SetLazy(LazyValue::in_context(|this| {
            Ok(Value::from(this.type_name()))
        }));
        let value = resolve(&slot, &instance(), &DefaultProvider::nil(), no_supertype);
        assert_eq!(value.unwrap(), Value::from("Thing"));
    }

    #[test]
    fn test_unset_prefers_supertype() {
        let value = resolve(
            &AttributeSlot::Unset,
            &instance(),
            &DefaultProvider::value(1),
            || Some(Ok(Value::Int(2))),
        );
        assert_eq!(value.unwrap(), Value::Int(2));
    }

    #[test]
    fn test_unset_falls_back_to_default() {
        let value = resolve(
            &AttributeSlot::Unset,
            &instance(),
            &DefaultProvider::value(1),
            no_supertype,
        );
        assert_eq!(value.unwrap(), Value::Int(1));
    }

    #[test]
    fn test_supertype_not_consulted_when_set() {
        let slot = AttributeSlot::Set(Value::Nil);
        let value = resolve(&slot, &instance(), &DefaultProvider::nil(), || {
            panic!("supertype consulted")
        });
        assert_eq!(value.unwrap(), Value::Nil);
    }

    #[test]
    fn test_raw_keeps_lazy_unevaluated() {
        let slot = AttributeSlot::SetLazy(lazy(|_| panic!("evaluated")));
        assert!(matches!(resolve_raw(&slot, no_supertype), Ok(Value::Lazy(_))));
        assert_eq!(resolve_raw(&AttributeSlot::Unset, no_supertype), Ok(Value::Nil));
    }
}
