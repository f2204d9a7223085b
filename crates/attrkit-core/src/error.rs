//! Error types for attrkit

use thiserror::Error;

use crate::schema::AttributeFlavor;
use crate::value::KindTag;

/// Errors raised while reading, writing or invoking attributes
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AttributeError {
    #[error(
        "{attribute} must be set to a callable or lazy value: caller tried to set {attribute} to {value}"
    )]
    InvalidAssignment { attribute: String, value: String },

    #[error("Attribute {attribute} is not defined on {type_name}")]
    UnknownAttribute { type_name: String, attribute: String },

    #[error("Attribute {attribute} is not a {expected} attribute")]
    WrongFlavor {
        attribute: String,
        expected: AttributeFlavor,
    },

    #[error("Cannot invoke {0}: not a callable or lazy value")]
    NotInvocable(String),

    #[error("Context-evaluated callable invoked without an instance")]
    MissingContext,

    #[error("Evaluation failed: {0}")]
    Evaluation(String),

    #[error("Coercion error: {0}")]
    Coercion(#[from] CoercionError),
}

impl AttributeError {
    /// Failure raised from inside a lazy or block callable
    pub fn evaluation(message: impl Into<String>) -> Self {
        Self::Evaluation(message.into())
    }
}

/// Errors produced by a type's coercion step
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoercionError {
    #[error("Kind mismatch: expected {expected}, got {actual}")]
    KindMismatch { expected: KindTag, actual: KindTag },

    #[error("Invalid {type_name} value: {reason}")]
    Invalid { type_name: String, reason: String },
}

/// Result type alias for attribute operations
pub type AttributeResult<T> = Result<T, AttributeError>;
