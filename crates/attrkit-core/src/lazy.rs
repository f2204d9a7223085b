//! Deferred attribute values
//!
//! A [`LazyValue`] is stored in place of a concrete value and evaluated on
//! every read. Results are never memoized, so each read may observe
//! different state.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{AttributeError, AttributeResult};
use crate::instance::Instance;
use crate::value::{Callable, Value};

/// How a deferred computation receives its context
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EvalMode {
    /// Invoked with no implicit context
    #[default]
    #[display("plain")]
    Plain,
    /// Invoked with the owning instance as context
    #[display("context")]
    ContextEval,
}

/// The callable together with its evaluation mode
#[derive(Debug, Clone)]
pub enum Evaluation {
    Plain(Callable),
    ContextEval(Callable),
}

impl Evaluation {
    fn callable(&self) -> &Callable {
        match self {
            Evaluation::Plain(callable) | Evaluation::ContextEval(callable) => callable,
        }
    }
}

/// A deferred computation stored in an attribute slot
#[derive(Debug, Clone)]
pub struct LazyValue {
    evaluation: Evaluation,
    mode_explicit: bool,
}

/// Shorthand for [`LazyValue::new`]
pub fn lazy<F>(f: F) -> LazyValue
where
    F: Fn(Option<&Instance>) -> AttributeResult<Value> + 'static,
{
    LazyValue::new(f)
}

impl LazyValue {
    /// Create a lazy value in the default (plain) mode
    ///
    /// The mode is not marked as explicitly chosen, so block attributes
    /// will switch it to context evaluation on assignment.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Option<&Instance>) -> AttributeResult<Value> + 'static,
    {
        Self::from_callable(Callable::new(f), None)
    }

    /// Create a lazy value with an explicitly chosen mode
    pub fn with_mode<F>(mode: EvalMode, f: F) -> Self
    where
        F: Fn(Option<&Instance>) -> AttributeResult<Value> + 'static,
    {
        Self::from_callable(Callable::new(f), Some(mode))
    }

    /// Create a lazy value that is always evaluated against an instance
    pub fn in_context<F>(f: F) -> Self
    where
        F: Fn(&Instance) -> AttributeResult<Value> + 'static,
    {
        let callable = Callable::new(move |context| match context {
            Some(instance) => f(instance),
            None => Err(AttributeError::MissingContext),
        });
        Self::from_callable(callable, Some(EvalMode::ContextEval))
    }

    /// Wrap an existing callable; `None` leaves the mode at its default
    pub fn from_callable(callable: Callable, mode: Option<EvalMode>) -> Self {
        let evaluation = match mode.unwrap_or_default() {
            EvalMode::Plain => Evaluation::Plain(callable),
            EvalMode::ContextEval => Evaluation::ContextEval(callable),
        };
        Self {
            evaluation,
            mode_explicit: mode.is_some(),
        }
    }

    pub fn eval_mode(&self) -> EvalMode {
        match self.evaluation {
            Evaluation::Plain(_) => EvalMode::Plain,
            Evaluation::ContextEval(_) => EvalMode::ContextEval,
        }
    }

    pub fn eval_mode_explicitly_set(&self) -> bool {
        self.mode_explicit
    }

    pub fn evaluation(&self) -> &Evaluation {
        &self.evaluation
    }

    pub fn callable(&self) -> &Callable {
        self.evaluation.callable()
    }

    /// Apply `mode` unless a mode was explicitly chosen at construction
    pub fn defaulting_to(self, mode: EvalMode) -> Self {
        if self.mode_explicit {
            return self;
        }
        Self::from_callable(self.evaluation.callable().clone(), Some(mode))
    }

    /// Evaluate now
    ///
    /// Context-evaluated values receive `instance`; plain values are
    /// invoked with no context. Errors from the callable propagate
    /// unchanged.
    pub fn get(&self, instance: Option<&Instance>) -> AttributeResult<Value> {
        trace!(mode = %self.eval_mode(), "Evaluating lazy value");
        match &self.evaluation {
            Evaluation::Plain(callable) => callable.call(None),
            Evaluation::ContextEval(callable) => callable.call(instance),
        }
    }
}

impl PartialEq for LazyValue {
    fn eq(&self, other: &Self) -> bool {
        self.eval_mode() == other.eval_mode()
            && self.mode_explicit == other.mode_explicit
            && self.callable().ptr_eq(other.callable())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::schema::Schema;

    #[test]
    fn test_default_mode_is_plain_and_implicit() {
        let value = lazy(|_| Ok(Value::Int(1)));
        assert_eq!(value.eval_mode(), EvalMode::Plain);
        assert!(!value.eval_mode_explicitly_set());
    }

    #[test]
    fn test_with_mode_is_explicit() {
        let value = LazyValue::with_mode(EvalMode::Plain, |_| Ok(Value::Nil));
        assert!(value.eval_mode_explicitly_set());
        assert_eq!(value.eval_mode(), EvalMode::Plain);
    }

    #[test]
    fn test_defaulting_to_respects_explicit_mode() {
        let implicit = lazy(|_| Ok(Value::Nil)).defaulting_to(EvalMode::ContextEval);
        assert_eq!(implicit.eval_mode(), EvalMode::ContextEval);
        assert!(implicit.eval_mode_explicitly_set());

        let explicit = LazyValue::with_mode(EvalMode::Plain, |_| Ok(Value::Nil))
            .defaulting_to(EvalMode::ContextEval);
        assert_eq!(explicit.eval_mode(), EvalMode::Plain);
    }

    #[test]
    fn test_plain_mode_never_sees_context() {
        let instance = Instance::new(Schema::builder("Thing").build());
        let value = lazy(|context| Ok(Value::Bool(context.is_some())));
        assert_eq!(value.get(Some(&instance)).unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_context_mode_receives_instance() {
        let instance = Instance::new(Schema::builder("Thing").build());
        let value = LazyValue::in_context(|this| Ok(Value::from(this.type_name())));
        assert_eq!(value.get(Some(&instance)).unwrap(), Value::from("Thing"));
        assert_eq!(value.get(None), Err(AttributeError::MissingContext));
    }

    #[test]
    fn test_not_memoized() {
        let counter = Rc::new(Cell::new(0));
        let tick = counter.clone();
        let value = lazy(move |_| {
            tick.set(tick.get() + 1);
            Ok(Value::Int(tick.get()))
        });
        assert_eq!(value.get(None).unwrap(), Value::Int(1));
        assert_eq!(value.get(None).unwrap(), Value::Int(2));
        assert_eq!(counter.get(), 2);
    }

    #[test]
    fn test_errors_propagate() {
        let value = lazy(|_| Err(AttributeError::evaluation("broken")));
        assert_eq!(
            value.get(None),
            Err(AttributeError::Evaluation("broken".to_string()))
        );
    }
}
