//! Argument declarations, arity patterns and value conversion.
//!
//! - [`spec`] - [`ArgSpec`], the immutable description of one argument
//! - [`arity`] - [`Arity`] patterns and the greedy token matcher
//! - [`value`] - [`ValueConverter`] and the built-in [`ValueKind`]s

pub mod arity;
pub mod spec;
pub mod value;

pub use arity::{Arity, ArityMatch};
pub use spec::{ArgId, ArgSpec};
pub use value::{shape_tokens, Conversion, TokenFn, Value, ValueConverter, ValueKind};
