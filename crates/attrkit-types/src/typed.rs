//! Attributes whose values pass through a [`TypeCoercer`]
//!
//! [`define_typed_attribute`] records the coercer on the schema definition,
//! so every accessor (the returned handle, [`Instance::set`], a bound
//! `simple_struct!` accessor) coerces concrete values when they are
//! assigned. Every resolved value is coerced again when read, so lazy
//! results and values inherited from a supertype come back normalized.
//! `Nil` means "no value" and is never coerced.

use attrkit_core::{
    Attribute, AttributeResult, Coercion, DefaultProvider, Instance, Schema, Value,
};

use crate::coercer::TypeCoercer;

/// Wrap `coercer` as the schema-level conversion for one attribute
pub fn coercion_for<C>(coercer: C) -> Coercion
where
    C: TypeCoercer + 'static,
{
    let type_name = coercer.type_name().to_string();
    Coercion::new(&type_name, move |context, value| coercer.coerce(context, value))
}

/// Install a plain attribute on `schema` whose values must satisfy `coercer`
pub fn define_typed_attribute<C>(
    schema: &mut Schema,
    name: impl Into<String>,
    default: impl Into<DefaultProvider>,
    coercer: C,
) -> TypedAttribute<C>
where
    C: TypeCoercer + Clone + 'static,
{
    let attribute = schema.define_coerced_attribute(name, default, coercion_for(coercer.clone()));
    TypedAttribute { attribute, coercer }
}

/// Handle for an attribute declared with [`define_typed_attribute`]
#[derive(Debug, Clone)]
pub struct TypedAttribute<C> {
    attribute: Attribute,
    coercer: C,
}

impl<C: TypeCoercer> TypedAttribute<C> {
    pub fn name(&self) -> &str {
        self.attribute.name()
    }

    pub fn coercer(&self) -> &C {
        &self.coercer
    }

    /// The untyped handle; it coerces through the schema as well
    pub fn attribute(&self) -> &Attribute {
        &self.attribute
    }

    /// Resolved value, coerced with `instance` as context
    pub fn get(&self, instance: &Instance) -> AttributeResult<Value> {
        self.attribute.get(instance)
    }

    /// Coerce and store; a failed coercion leaves the slot untouched
    ///
    /// Lazy values are stored as-is and coerced on each read.
    pub fn set(&self, instance: &Instance, value: impl Into<Value>) -> AttributeResult<()> {
        self.attribute.set(instance, value)
    }

    pub fn assign(&self, instance: &Instance, value: impl Into<Value>) -> AttributeResult<()> {
        self.set(instance, value)
    }
}
