//! Typed accessor handles for declared attributes
//!
//! Each handle is the getter / setter / equality-setter set for one
//! attribute name, usable against any [`Instance`] whose schema declares
//! that name with a matching flavor. [`Bound`] pairs a handle with an
//! instance for method-call syntax.

use std::rc::Rc;

use tracing::debug;

use crate::error::{AttributeError, AttributeResult};
use crate::instance::Instance;
use crate::lazy::{EvalMode, LazyValue};
use crate::resolver;
use crate::schema::{AttributeDefinition, AttributeFlavor};
use crate::slot::AttributeSlot;
use crate::value::Value;

const PLAIN: &[AttributeFlavor] = &[AttributeFlavor::Plain, AttributeFlavor::Boolean];
const BOOLEAN: &[AttributeFlavor] = &[AttributeFlavor::Boolean];
const BLOCK: &[AttributeFlavor] = &[AttributeFlavor::Block];

/// Accessors for a plain attribute
///
/// Also accepts boolean definitions, since a boolean attribute is a plain
/// attribute with an added predicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Attribute {
    name: Rc<str>,
}

impl Attribute {
    pub fn named(name: &str) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolved value: explicit, then lazy, then supertype, then default
    ///
    /// A coerced attribute converts whatever the resolver produced.
    pub fn get(&self, instance: &Instance) -> AttributeResult<Value> {
        let definition = instance.checked(&self.name, PLAIN)?;
        let slot = instance.slot(&self.name);
        let value = resolver::resolve(&slot, instance, definition.default(), || {
            instance.inherited(&self.name)
        })?;
        coerce(definition, instance, value)
    }

    /// Store a value, coercing it first if the attribute declares a type
    ///
    /// Lazy values are stored as-is and coerced on each read. A failed
    /// coercion leaves the slot untouched.
    pub fn set(&self, instance: &Instance, value: impl Into<Value>) -> AttributeResult<()> {
        let definition = instance.checked(&self.name, PLAIN)?;
        let value = match value.into() {
            deferred @ Value::Lazy(_) => deferred,
            other => coerce(definition, instance, other)?,
        };
        instance.store(&self.name, AttributeSlot::from_value(value));
        Ok(())
    }

    pub fn assign(&self, instance: &Instance, value: impl Into<Value>) -> AttributeResult<()> {
        self.set(instance, value)
    }

    pub fn bind<'a>(&self, instance: &'a Instance) -> Bound<'a, Self> {
        Bound::new(instance, self.clone())
    }
}

// Nil means "no value" and is never coerced.
fn coerce(definition: &AttributeDefinition, instance: &Instance, value: Value) -> AttributeResult<Value> {
    let Some(coercion) = definition.coercion() else {
        return Ok(value);
    };
    if value.is_nil() {
        return Ok(value);
    }
    coercion.apply(Some(instance), value).map_err(|err| {
        debug!(
            attribute = definition.name(),
            type_name = coercion.type_name(),
            error = %err,
            "Coercion failed"
        );
        AttributeError::from(err)
    })
}

/// Accessors for a boolean attribute
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BooleanAttribute {
    inner: Attribute,
}

impl BooleanAttribute {
    pub fn named(name: &str) -> Self {
        Self {
            inner: Attribute::named(name),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub fn get(&self, instance: &Instance) -> AttributeResult<Value> {
        instance.checked(self.name(), BOOLEAN)?;
        self.inner.get(instance)
    }

    pub fn set(&self, instance: &Instance, value: impl Into<Value>) -> AttributeResult<()> {
        instance.checked(self.name(), BOOLEAN)?;
        self.inner.set(instance, value)
    }

    pub fn assign(&self, instance: &Instance, value: impl Into<Value>) -> AttributeResult<()> {
        self.set(instance, value)
    }

    /// Truthiness of the resolved value
    pub fn predicate(&self, instance: &Instance) -> AttributeResult<bool> {
        Ok(self.get(instance)?.is_truthy())
    }

    pub fn bind<'a>(&self, instance: &'a Instance) -> Bound<'a, Self> {
        Bound::new(instance, self.clone())
    }
}

/// Accessors for a block attribute
///
/// The getter returns the stored callable or lazy value unevaluated; run it
/// with [`BlockAttribute::invoke`] or [`invoke_block_attribute`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlockAttribute {
    name: Rc<str>,
}

impl BlockAttribute {
    pub fn named(name: &str) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, instance: &Instance) -> AttributeResult<Value> {
        instance.checked(&self.name, BLOCK)?;
        let slot = instance.slot(&self.name);
        resolver::resolve_raw(&slot, || instance.inherited(&self.name))
    }

    /// Value-form setter
    ///
    /// A lazy value whose mode was not chosen explicitly is switched to
    /// context evaluation. A bare callable is stored as-is. Anything else
    /// is rejected.
    pub fn set(&self, instance: &Instance, value: impl Into<Value>) -> AttributeResult<()> {
        instance.checked(&self.name, BLOCK)?;
        let slot = match value.into() {
            Value::Lazy(lazy) => AttributeSlot::SetLazy(lazy.defaulting_to(EvalMode::ContextEval)),
            Value::Proc(callable) => AttributeSlot::Set(Value::Proc(callable)),
            other => {
                debug!(
                    attribute = %self.name,
                    type_name = %instance.type_name(),
                    value = %other,
                    "Rejected non-callable block assignment"
                );
                return Err(AttributeError::InvalidAssignment {
                    attribute: self.name.to_string(),
                    value: other.to_string(),
                });
            }
        };
        instance.store(&self.name, slot);
        Ok(())
    }

    /// Block-form setter; always evaluated in the instance's context
    pub fn set_block<F>(&self, instance: &Instance, block: F) -> AttributeResult<()>
    where
        F: Fn(&Instance) -> AttributeResult<Value> + 'static,
    {
        instance.checked(&self.name, BLOCK)?;
        instance.store(&self.name, AttributeSlot::SetLazy(LazyValue::in_context(block)));
        Ok(())
    }

    pub fn assign(&self, instance: &Instance, value: impl Into<Value>) -> AttributeResult<()> {
        self.set(instance, value)
    }

    /// Read the stored content and run it against `instance`
    pub fn invoke(&self, instance: &Instance) -> AttributeResult<Value> {
        let value = self.get(instance)?;
        invoke_block_attribute(&value, instance)
    }

    pub fn bind<'a>(&self, instance: &'a Instance) -> Bound<'a, Self> {
        Bound::new(instance, self.clone())
    }
}

/// Evaluate a value read from a block attribute
///
/// Lazy values follow their own mode. Bare callables are always evaluated
/// with `instance` as context here, even though they were stored without
/// context evaluation.
///
/// An unset block (`Nil`) evaluates to `Nil` rather than failing, so an
/// optional hook can be invoked without checking it first. Every other
/// non-callable value is an error.
pub fn invoke_block_attribute(value: &Value, instance: &Instance) -> AttributeResult<Value> {
    match value {
        Value::Lazy(lazy) => lazy.get(Some(instance)),
        Value::Proc(callable) => callable.call(Some(instance)),
        Value::Nil => Ok(Value::Nil),
        other => Err(AttributeError::NotInvocable(other.to_string())),
    }
}

/// An accessor handle bound to one instance
#[derive(Debug, Clone)]
pub struct Bound<'a, A> {
    instance: &'a Instance,
    attribute: A,
}

impl<'a, A> Bound<'a, A> {
    pub fn new(instance: &'a Instance, attribute: A) -> Self {
        Self {
            instance,
            attribute,
        }
    }
}

impl Bound<'_, Attribute> {
    pub fn get(&self) -> AttributeResult<Value> {
        self.attribute.get(self.instance)
    }

    pub fn set(&self, value: impl Into<Value>) -> AttributeResult<()> {
        self.attribute.set(self.instance, value)
    }

    pub fn assign(&self, value: impl Into<Value>) -> AttributeResult<()> {
        self.attribute.assign(self.instance, value)
    }
}

impl Bound<'_, BooleanAttribute> {
    pub fn get(&self) -> AttributeResult<Value> {
        self.attribute.get(self.instance)
    }

    pub fn set(&self, value: impl Into<Value>) -> AttributeResult<()> {
        self.attribute.set(self.instance, value)
    }

    pub fn assign(&self, value: impl Into<Value>) -> AttributeResult<()> {
        self.attribute.assign(self.instance, value)
    }

    pub fn predicate(&self) -> AttributeResult<bool> {
        self.attribute.predicate(self.instance)
    }
}

impl Bound<'_, BlockAttribute> {
    pub fn get(&self) -> AttributeResult<Value> {
        self.attribute.get(self.instance)
    }

    pub fn set(&self, value: impl Into<Value>) -> AttributeResult<()> {
        self.attribute.set(self.instance, value)
    }

    pub fn set_block<F>(&self, block: F) -> AttributeResult<()>
    where
        F: Fn(&Instance) -> AttributeResult<Value> + 'static,
    {
        self.attribute.set_block(self.instance, block)
    }

    pub fn assign(&self, value: impl Into<Value>) -> AttributeResult<()> {
        self.attribute.assign(self.instance, value)
    }

    pub fn invoke(&self) -> AttributeResult<Value> {
        self.attribute.invoke(self.instance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoercionError;
    use crate::lazy::lazy;
    use crate::schema::{Coercion, Schema};
    use crate::value::{Callable, KindTag};

    // Integers only; text is read as a decimal integer.
    fn integer_coercion() -> Coercion {
        Coercion::new("Integer", |_, value| match value {
            Value::Text(text) => text.trim().parse().map(Value::Int).map_err(|_| {
                CoercionError::Invalid {
                    type_name: "Integer".to_string(),
                    reason: format!("{:?} is not an integer", text),
                }
            }),
            Value::Int(i) => Ok(Value::Int(i)),
            other => Err(CoercionError::KindMismatch {
                expected: KindTag::Int,
                actual: other.kind(),
            }),
        })
    }

    #[test]
    fn test_handles_from_define() {
        let mut schema = Schema::new("Resource");
        let size = schema.define_attribute("size", 1);
        let on_load = schema.define_block_attribute("on_load");
        let instance = Instance::new(Rc::new(schema));

        assert_eq!(size.get(&instance).unwrap(), Value::Int(1));
        size.assign(&instance, 5).unwrap();
        assert_eq!(size.bind(&instance).get().unwrap(), Value::Int(5));
        assert_eq!(on_load.get(&instance).unwrap(), Value::Nil);
    }

    #[test]
    fn test_flavor_mismatch() {
        let instance = Instance::new(
            Schema::builder("Resource")
                .attribute("size", 1)
                .block_attribute("on_load")
                .build(),
        );
        assert!(matches!(
            BlockAttribute::named("size").get(&instance),
            Err(AttributeError::WrongFlavor {
                expected: AttributeFlavor::Block,
                ..
            })
        ));
        assert!(matches!(
            Attribute::named("on_load").set(&instance, 1),
            Err(AttributeError::WrongFlavor {
                expected: AttributeFlavor::Plain,
                ..
            })
        ));
    }

    #[test]
    fn test_block_rejects_non_callable() {
        let instance = Instance::new(Schema::builder("Resource").block_attribute("on_load").build());
        let on_load = BlockAttribute::named("on_load");
        let err = on_load.set(&instance, 42).unwrap_err();
        assert_eq!(
            err,
            AttributeError::InvalidAssignment {
                attribute: "on_load".to_string(),
                value: "42".to_string(),
            }
        );
        assert!(!instance.is_set("on_load"));
    }

    #[test]
    fn test_invoke_bare_callable_gets_context() {
        let instance = Instance::new(Schema::builder("Resource").block_attribute("on_load").build());
        let on_load = BlockAttribute::named("on_load");
        on_load
            .set(
                &instance,
                Callable::new(|context| Ok(Value::Bool(context.is_some()))),
            )
            .unwrap();
        assert_eq!(on_load.invoke(&instance).unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_invoke_respects_explicit_plain_mode() {
        let instance = Instance::new(Schema::builder("Resource").block_attribute("on_load").build());
        let on_load = BlockAttribute::named("on_load");
        on_load
            .set(
                &instance,
                LazyValue::with_mode(EvalMode::Plain, |context| Ok(Value::Bool(context.is_some()))),
            )
            .unwrap();
        assert_eq!(on_load.invoke(&instance).unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_invoke_respects_explicit_context_mode() {
        let instance = Instance::new(Schema::builder("Resource").block_attribute("on_load").build());
        let on_load = BlockAttribute::named("on_load");
        on_load
            .set(
                &instance,
                LazyValue::with_mode(EvalMode::ContextEval, |context| {
                    Ok(Value::Bool(context.is_some()))
                }),
            )
            .unwrap();

        match on_load.get(&instance).unwrap() {
            Value::Lazy(stored) => {
                assert_eq!(stored.eval_mode(), EvalMode::ContextEval);
                assert!(stored.eval_mode_explicitly_set());
            }
            other => panic!("expected lazy value, got {other}"),
        }
        assert_eq!(on_load.invoke(&instance).unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_coerced_attribute_converts_on_set() {
        let mut schema = Schema::new("Resource");
        let count = schema.define_coerced_attribute("count", "0", integer_coercion());
        let instance = Instance::new(Rc::new(schema));

        assert_eq!(count.get(&instance).unwrap(), Value::Int(0));
        count.set(&instance, " 12 ").unwrap();
        assert_eq!(instance.slot("count").raw(), Some(Value::Int(12)));
        assert_eq!(count.bind(&instance).get().unwrap(), Value::Int(12));
    }

    #[test]
    fn test_coerced_attribute_rejects_every_entry_point() {
        let instance = Instance::new(
            Schema::builder("Resource")
                .coerced_attribute("count", 3, integer_coercion())
                .build(),
        );

        let err = instance.set("count", true).unwrap_err();
        assert_eq!(
            err,
            AttributeError::Coercion(CoercionError::KindMismatch {
                expected: KindTag::Int,
                actual: KindTag::Bool,
            })
        );
        assert!(Attribute::named("count").assign(&instance, "many").is_err());
        assert!(!instance.is_set("count"));
        assert_eq!(instance.get("count").unwrap(), Value::Int(3));
    }

    #[test]
    fn test_coerced_attribute_checks_lazy_result_on_read() {
        let instance = Instance::new(
            Schema::builder("Resource")
                .coerced_attribute("count", 0, integer_coercion())
                .build(),
        );
        instance.set("count", lazy(|_| Ok(Value::from("7")))).unwrap();
        assert_eq!(instance.get("count").unwrap(), Value::Int(7));

        instance.set("count", lazy(|_| Ok(Value::Float(1.5)))).unwrap();
        assert!(matches!(
            instance.get("count"),
            Err(AttributeError::Coercion(CoercionError::KindMismatch { .. }))
        ));

        instance.set("count", Value::Nil).unwrap();
        assert_eq!(instance.get("count").unwrap(), Value::Nil);
    }

    #[test]
    fn test_invoke_non_callable() {
        let instance = Instance::new(Schema::builder("Resource").build());
        assert_eq!(invoke_block_attribute(&Value::Nil, &instance), Ok(Value::Nil));
        assert!(matches!(
            invoke_block_attribute(&Value::Int(1), &instance),
            Err(AttributeError::NotInvocable(_))
        ));
    }

    #[test]
    fn test_plain_attribute_keeps_bare_callable() {
        let instance = Instance::new(Schema::builder("Resource").attribute("hook", 0).build());
        let callable = Callable::from_fn(|| Ok(Value::Int(1)));
        Attribute::named("hook")
            .set(&instance, callable.clone())
            .unwrap();
        assert_eq!(
            Attribute::named("hook").get(&instance).unwrap(),
            Value::Proc(callable)
        );

        Attribute::named("hook")
            .set(&instance, lazy(|_| Ok(Value::Int(9))))
            .unwrap();
        assert_eq!(Attribute::named("hook").get(&instance).unwrap(), Value::Int(9));
    }
}
