//! Dynamic attribute values
//!
//! Attributes hold a [`Value`]: plain data, a bare [`Callable`], or a
//! deferred [`LazyValue`]. The [`KindTag`] of a value is what type
//! coercers check against after normalization.

use std::fmt;
use std::rc::Rc;

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::error::AttributeResult;
use crate::instance::Instance;
use crate::lazy::LazyValue;

/// Runtime type tag of a [`Value`]
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KindTag {
    Nil,
    Bool,
    Int,
    Float,
    Text,
    List,
    Proc,
    Lazy,
}

type CallableFn = dyn Fn(Option<&Instance>) -> AttributeResult<Value>;

/// A shared, re-invokable computation
///
/// The argument is the evaluation context: `None` when invoked plainly,
/// `Some(instance)` when evaluated in the context of the owning instance.
/// All implicit references to the instance must go through that handle.
#[derive(Clone)]
pub struct Callable(Rc<CallableFn>);

impl Callable {
    /// Wrap a context-receiving closure
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Option<&Instance>) -> AttributeResult<Value> + 'static,
    {
        Self(Rc::new(f))
    }

    /// Wrap a zero-argument closure that ignores any context
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn() -> AttributeResult<Value> + 'static,
    {
        Self::new(move |_| f())
    }

    /// Invoke the computation
    pub fn call(&self, context: Option<&Instance>) -> AttributeResult<Value> {
        (self.0)(context)
    }

    /// Whether both handles share the same closure
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callable({:p})", Rc::as_ptr(&self.0))
    }
}

/// A dynamically typed attribute value
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<Value>),
    /// A bare callable, stored as-is
    Proc(Callable),
    /// A deferred computation, evaluated on every read
    Lazy(LazyValue),
}

impl Value {
    /// Get the runtime kind of this value
    pub fn kind(&self) -> KindTag {
        match self {
            Value::Nil => KindTag::Nil,
            Value::Bool(_) => KindTag::Bool,
            Value::Int(_) => KindTag::Int,
            Value::Float(_) => KindTag::Float,
            Value::Text(_) => KindTag::Text,
            Value::List(_) => KindTag::List,
            Value::Proc(_) => KindTag::Proc,
            Value::Lazy(_) => KindTag::Lazy,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// `Nil` and `false` are falsy; everything else is truthy
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Proc(_) | Value::Lazy(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Proc(a), Value::Proc(b)) => a.ptr_eq(b),
            (Value::Lazy(a), Value::Lazy(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Text(s) => write!(f, "{:?}", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Proc(_) => write!(f, "#<proc>"),
            Value::Lazy(lazy) => write!(f, "#<lazy {}>", lazy.eval_mode()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Callable> for Value {
    fn from(callable: Callable) -> Self {
        Value::Proc(callable)
    }
}

impl From<LazyValue> for Value {
    fn from(lazy: LazyValue) -> Self {
        Value::Lazy(lazy)
    }
}
