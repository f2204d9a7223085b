//! Attribute declarations
//!
//! A [`Schema`] is the set of attributes a struct-like type declares. The
//! `define_*` operations install a definition and hand back the typed
//! accessor for it ([`Attribute`], [`BooleanAttribute`], [`BlockAttribute`]).
//! A plain attribute may also carry a [`Coercion`], which every read and
//! write of that attribute passes through.

use std::fmt;
use std::rc::Rc;

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::attribute::{Attribute, BlockAttribute, BooleanAttribute};
use crate::error::CoercionError;
use crate::instance::Instance;
use crate::value::Value;

/// Which accessor contract an attribute follows
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeFlavor {
    #[display("plain")]
    Plain,
    #[display("boolean")]
    Boolean,
    #[display("block")]
    Block,
}

/// Produces an attribute's default on every read
#[derive(Clone)]
pub struct DefaultProvider(Rc<dyn Fn() -> Value>);

impl DefaultProvider {
    pub fn nil() -> Self {
        Self::value(Value::Nil)
    }

    /// A fixed default, cloned on each read
    pub fn value(value: impl Into<Value>) -> Self {
        let value = value.into();
        Self(Rc::new(move || value.clone()))
    }

    /// A default computed fresh on each read
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn() -> Value + 'static,
    {
        Self(Rc::new(f))
    }

    pub fn provide(&self) -> Value {
        (self.0)()
    }
}

impl Default for DefaultProvider {
    fn default() -> Self {
        Self::nil()
    }
}

impl fmt::Debug for DefaultProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DefaultProvider")
    }
}

impl From<Value> for DefaultProvider {
    fn from(value: Value) -> Self {
        Self::value(value)
    }
}

impl From<bool> for DefaultProvider {
    fn from(b: bool) -> Self {
        Self::value(b)
    }
}

impl From<i32> for DefaultProvider {
    fn from(i: i32) -> Self {
        Self::value(i)
    }
}

impl From<i64> for DefaultProvider {
    fn from(i: i64) -> Self {
        Self::value(i)
    }
}

impl From<f64> for DefaultProvider {
    fn from(f: f64) -> Self {
        Self::value(f)
    }
}

impl From<&str> for DefaultProvider {
    fn from(s: &str) -> Self {
        Self::value(s)
    }
}

type CoerceFn = dyn Fn(Option<&Instance>, Value) -> Result<Value, CoercionError>;

/// The declared type of an attribute, as a conversion applied to its values
#[derive(Clone)]
pub struct Coercion {
    type_name: Rc<str>,
    apply: Rc<CoerceFn>,
}

impl Coercion {
    pub fn new<F>(type_name: &str, apply: F) -> Self
    where
        F: Fn(Option<&Instance>, Value) -> Result<Value, CoercionError> + 'static,
    {
        Self {
            type_name: type_name.into(),
            apply: Rc::new(apply),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn apply(&self, context: Option<&Instance>, value: Value) -> Result<Value, CoercionError> {
        (self.apply)(context, value)
    }
}

impl fmt::Debug for Coercion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Coercion").field(&self.type_name).finish()
    }
}

/// A single declared attribute
#[derive(Debug, Clone)]
pub struct AttributeDefinition {
    name: String,
    flavor: AttributeFlavor,
    default: DefaultProvider,
    coercion: Option<Coercion>,
}

impl AttributeDefinition {
    pub fn new(name: impl Into<String>, flavor: AttributeFlavor, default: DefaultProvider) -> Self {
        Self {
            name: name.into(),
            flavor,
            default,
            coercion: None,
        }
    }

    pub fn with_coercion(mut self, coercion: Coercion) -> Self {
        self.coercion = Some(coercion);
        self
    }

    pub fn coercion(&self) -> Option<&Coercion> {
        self.coercion.as_ref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn flavor(&self) -> AttributeFlavor {
        self.flavor
    }

    pub fn default(&self) -> &DefaultProvider {
        &self.default
    }
}

/// The attributes declared by one struct-like type
#[derive(Debug, Clone)]
pub struct Schema {
    type_name: String,
    definitions: Vec<AttributeDefinition>,
}

impl Schema {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            definitions: Vec::new(),
        }
    }

    pub fn builder(type_name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            schema: Self::new(type_name),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn definition(&self, name: &str) -> Option<&AttributeDefinition> {
        self.definitions.iter().find(|d| d.name == name)
    }

    pub fn defines(&self, name: &str) -> bool {
        self.definition(name).is_some()
    }

    /// Definitions in declaration order
    pub fn definitions(&self) -> impl Iterator<Item = &AttributeDefinition> {
        self.definitions.iter()
    }

    /// Copy the parent's definitions that are not already declared here
    pub fn inherit(&mut self, parent: &Schema) {
        for definition in &parent.definitions {
            if !self.defines(&definition.name) {
                self.definitions.push(definition.clone());
            }
        }
    }

    /// Install a plain attribute with getter, setter and equality setter
    pub fn define_attribute(
        &mut self,
        name: impl Into<String>,
        default: impl Into<DefaultProvider>,
    ) -> Attribute {
        let name = name.into();
        let handle = Attribute::named(name.as_str());
        self.insert(AttributeDefinition::new(name, AttributeFlavor::Plain, default.into()));
        handle
    }

    /// Install a plain attribute whose values must pass `coercion`
    pub fn define_coerced_attribute(
        &mut self,
        name: impl Into<String>,
        default: impl Into<DefaultProvider>,
        coercion: Coercion,
    ) -> Attribute {
        let name = name.into();
        let handle = Attribute::named(name.as_str());
        self.insert(
            AttributeDefinition::new(name, AttributeFlavor::Plain, default.into())
                .with_coercion(coercion),
        );
        handle
    }

    /// Install a boolean attribute, adding a truthiness predicate
    pub fn define_boolean_attribute(
        &mut self,
        name: impl Into<String>,
        default: impl Into<DefaultProvider>,
    ) -> BooleanAttribute {
        let name = name.into();
        let handle = BooleanAttribute::named(name.as_str());
        self.insert(AttributeDefinition::new(
            name,
            AttributeFlavor::Boolean,
            default.into(),
        ));
        handle
    }

    /// Install a block attribute holding a callable or lazy value
    pub fn define_block_attribute(&mut self, name: impl Into<String>) -> BlockAttribute {
        let name = name.into();
        let handle = BlockAttribute::named(name.as_str());
        self.insert(AttributeDefinition::new(
            name,
            AttributeFlavor::Block,
            DefaultProvider::nil(),
        ));
        handle
    }

    // Redefinition replaces the earlier declaration in place.
    fn insert(&mut self, definition: AttributeDefinition) {
        match self.definitions.iter_mut().find(|d| d.name == definition.name) {
            Some(existing) => *existing = definition,
            None => self.definitions.push(definition),
        }
    }
}

/// Fluent construction of a shared [`Schema`]
#[derive(Debug)]
pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    pub fn attribute(mut self, name: impl Into<String>, default: impl Into<DefaultProvider>) -> Self {
        self.schema.define_attribute(name, default);
        self
    }

    pub fn coerced_attribute(
        mut self,
        name: impl Into<String>,
        default: impl Into<DefaultProvider>,
        coercion: Coercion,
    ) -> Self {
        self.schema.define_coerced_attribute(name, default, coercion);
        self
    }

    pub fn boolean_attribute(
        mut self,
        name: impl Into<String>,
        default: impl Into<DefaultProvider>,
    ) -> Self {
        self.schema.define_boolean_attribute(name, default);
        self
    }

    pub fn block_attribute(mut self, name: impl Into<String>) -> Self {
        self.schema.define_block_attribute(name);
        self
    }

    pub fn inherit(mut self, parent: &Schema) -> Self {
        self.schema.inherit(parent);
        self
    }

    pub fn build(self) -> Rc<Schema> {
        Rc::new(self.schema)
    }
}
