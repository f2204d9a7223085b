//! The coercion contract every concrete type implements

use attrkit_core::{CoercionError, Instance, KindTag, Value};
use tracing::debug;

/// Normalizes an arbitrary input into a type's canonical representation
///
/// Implementors supply [`TypeCoercer::normalize`] for their value-specific
/// conversions; [`TypeCoercer::coerce`] then applies the shared kind check.
pub trait TypeCoercer {
    /// Name used in diagnostics
    fn type_name(&self) -> &str;

    /// Kind every coerced value must have
    fn required_kind(&self) -> KindTag;

    /// Value-specific normalization, run before the kind check
    fn normalize(&self, _context: Option<&Instance>, value: Value) -> Result<Value, CoercionError> {
        Ok(value)
    }

    /// Normalize, then require the result to be of [`TypeCoercer::required_kind`]
    fn coerce(&self, context: Option<&Instance>, value: Value) -> Result<Value, CoercionError> {
        let normalized = self.normalize(context, value)?;
        check_kind(self.required_kind(), normalized)
    }
}

/// The base check shared by all coercers
pub fn check_kind(required: KindTag, value: Value) -> Result<Value, CoercionError> {
    let actual = value.kind();
    if actual == required {
        Ok(value)
    } else {
        debug!(expected = %required, actual = %actual, "Coerced value has the wrong kind");
        Err(CoercionError::KindMismatch {
            expected: required,
            actual,
        })
    }
}

/// A coercer that only enforces a kind, with no normalization step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindCoercer {
    type_name: String,
    kind: KindTag,
}

impl KindCoercer {
    pub fn new(type_name: impl Into<String>, kind: KindTag) -> Self {
        Self {
            type_name: type_name.into(),
            kind,
        }
    }
}

impl TypeCoercer for KindCoercer {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn required_kind(&self) -> KindTag {
        self.kind
    }
}
