//! # attrkit Core
//!
//! Typed, inheritable attributes on struct-like types, with deferred value
//! computation.
//!
//! A type declares its attributes in a [`Schema`]. Each [`Instance`] stores
//! one [`AttributeSlot`] per assigned attribute and may point at a
//! supertype instance. Reads go through the [resolver](resolver): explicit
//! value, then lazy evaluation, then the supertype chain, then the
//! attribute's default.
//!
//! ## Key Types
//!
//! - [`Value`]: dynamically typed attribute value, tagged by [`KindTag`]
//! - [`LazyValue`]: deferred computation, re-evaluated on every read
//! - [`Schema`]: attribute declarations for one type
//! - [`Attribute`], [`BooleanAttribute`], [`BlockAttribute`]: accessor handles
//! - [`Instance`]: attribute state plus an optional supertype
//!
//! Everything here is single-threaded (`Rc` / `RefCell`); callers that share
//! instances across threads must provide their own synchronization.

pub mod attribute;
pub mod error;
pub mod instance;
pub mod lazy;
pub mod macros;
pub mod resolver;
pub mod schema;
pub mod slot;
pub mod value;

// Re-export main types
pub use attribute::*;
pub use error::*;
pub use instance::*;
pub use lazy::*;
pub use schema::*;
pub use slot::*;
pub use value::*;
