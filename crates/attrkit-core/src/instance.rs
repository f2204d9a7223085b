//! Struct-like instances and the supertype chain
//!
//! An [`Instance`] owns one [`AttributeSlot`] per assigned attribute and may
//! point at a supertype instance. The supertype is only a lookup relation:
//! unset attributes defer to the nearest ancestor whose schema declares
//! them, and that ancestor resolves with its own state.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::trace;

use crate::attribute::{Attribute, BlockAttribute, BooleanAttribute};
use crate::error::{AttributeError, AttributeResult};
use crate::schema::{AttributeDefinition, AttributeFlavor, Schema};
use crate::slot::AttributeSlot;
use crate::value::Value;

/// A node in a type hierarchy carrying attribute state
#[derive(Debug)]
pub struct Instance {
    schema: Rc<Schema>,
    supertype: Option<Rc<Instance>>,
    slots: RefCell<HashMap<String, AttributeSlot>>,
}

impl Instance {
    pub fn new(schema: Rc<Schema>) -> Self {
        Self {
            schema,
            supertype: None,
            slots: RefCell::new(HashMap::new()),
        }
    }

    pub fn with_supertype(schema: Rc<Schema>, supertype: Rc<Instance>) -> Self {
        Self {
            schema,
            supertype: Some(supertype),
            slots: RefCell::new(HashMap::new()),
        }
    }

    pub fn schema(&self) -> &Rc<Schema> {
        &self.schema
    }

    pub fn type_name(&self) -> &str {
        self.schema.type_name()
    }

    pub fn supertype(&self) -> Option<&Rc<Instance>> {
        self.supertype.as_ref()
    }

    /// Nearest ancestor whose schema declares `name`
    pub fn ancestor_defining(&self, name: &str) -> Option<&Rc<Instance>> {
        let mut current = self.supertype.as_ref();
        while let Some(ancestor) = current {
            if ancestor.schema.defines(name) {
                return Some(ancestor);
            }
            current = ancestor.supertype.as_ref();
        }
        None
    }

    /// Whether `name` holds an explicit assignment on this instance
    pub fn is_set(&self, name: &str) -> bool {
        self.slots
            .borrow()
            .get(name)
            .is_some_and(AttributeSlot::is_set)
    }

    /// Read an attribute by name
    ///
    /// Plain and boolean attributes return their resolved value; block
    /// attributes return their raw, unevaluated content.
    pub fn get(&self, name: &str) -> AttributeResult<Value> {
        match self.definition(name)?.flavor() {
            AttributeFlavor::Plain => Attribute::named(name).get(self),
            AttributeFlavor::Boolean => BooleanAttribute::named(name).get(self),
            AttributeFlavor::Block => BlockAttribute::named(name).get(self),
        }
    }

    /// Write an attribute by name, following its flavor's setter contract
    pub fn set(&self, name: &str, value: impl Into<Value>) -> AttributeResult<()> {
        match self.definition(name)?.flavor() {
            AttributeFlavor::Plain => Attribute::named(name).set(self, value),
            AttributeFlavor::Boolean => BooleanAttribute::named(name).set(self, value),
            AttributeFlavor::Block => BlockAttribute::named(name).set(self, value),
        }
    }

    /// Equality-setter form; identical to [`Instance::set`]
    pub fn assign(&self, name: &str, value: impl Into<Value>) -> AttributeResult<()> {
        self.set(name, value)
    }

    /// Truthiness of a boolean attribute
    pub fn predicate(&self, name: &str) -> AttributeResult<bool> {
        BooleanAttribute::named(name).predicate(self)
    }

    /// Block-form assignment of a block attribute
    pub fn set_block<F>(&self, name: &str, block: F) -> AttributeResult<()>
    where
        F: Fn(&Instance) -> AttributeResult<Value> + 'static,
    {
        BlockAttribute::named(name).set_block(self, block)
    }

    /// Run the content of a block attribute against this instance
    pub fn invoke(&self, name: &str) -> AttributeResult<Value> {
        BlockAttribute::named(name).invoke(self)
    }

    pub(crate) fn definition(&self, name: &str) -> AttributeResult<&AttributeDefinition> {
        self.schema
            .definition(name)
            .ok_or_else(|| AttributeError::UnknownAttribute {
                type_name: self.type_name().to_string(),
                attribute: name.to_string(),
            })
    }

    /// Look up a definition, requiring one of the given flavors
    pub(crate) fn checked(
        &self,
        name: &str,
        accepted: &[AttributeFlavor],
    ) -> AttributeResult<&AttributeDefinition> {
        let definition = self.definition(name)?;
        if accepted.contains(&definition.flavor()) {
            Ok(definition)
        } else {
            Err(AttributeError::WrongFlavor {
                attribute: name.to_string(),
                expected: accepted[0],
            })
        }
    }

    // Cloned out so lazy callables can re-enter this instance.
    pub(crate) fn slot(&self, name: &str) -> AttributeSlot {
        self.slots.borrow().get(name).cloned().unwrap_or_default()
    }

    pub(crate) fn store(&self, name: &str, slot: AttributeSlot) {
        self.slots.borrow_mut().insert(name.to_string(), slot);
    }

    pub(crate) fn inherited(&self, name: &str) -> Option<AttributeResult<Value>> {
        self.ancestor_defining(name).map(|ancestor| {
            trace!(
                attribute = name,
                type_name = %self.type_name(),
                supertype = %ancestor.type_name(),
                "Falling back to supertype"
            );
            ancestor.get(name)
        })
    }
}
