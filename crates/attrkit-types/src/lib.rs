//! # attrkit Types
//!
//! The coercion contract concrete attribute types implement, and the
//! built-in coercers.
//!
//! Every type normalizes its input first ([`TypeCoercer::normalize`]) and
//! then requires the result to match its [`TypeCoercer::required_kind`].
//! [`FloatCoercer`] is the representative implementation; [`KindCoercer`]
//! is the bare kind check. [`define_typed_attribute`] records a coercer on
//! a schema definition, so every accessor of that attribute coerces.
//!
//! ```
//! use attrkit_core::Value;
//! use attrkit_types::{FloatCoercer, TypeCoercer};
//!
//! let float = FloatCoercer::new();
//! assert_eq!(float.coerce(None, Value::from("3.14")).unwrap(), Value::Float(3.14));
//! assert_eq!(float.coerce(None, Value::Int(3)).unwrap(), Value::Float(3.0));
//! ```

pub mod coercer;
pub mod config;
pub mod float;
pub mod typed;

pub use coercer::{check_kind, KindCoercer, TypeCoercer};
pub use config::{CoercionConfig, FloatCoercerConfig, TextParsing};
pub use float::{parse_float_prefix, FloatCoercer};
pub use typed::{coercion_for, define_typed_attribute, TypedAttribute};
