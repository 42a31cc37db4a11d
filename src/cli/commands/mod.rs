//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait and writes its output to a
//! caller-supplied writer, so tests can capture it.
//!
//! Commands are dispatched via [`CommandDispatcher`], which loads the
//! declaration file once and routes each subcommand to its implementation.

pub mod completions;
pub mod dispatcher;
pub mod env;
pub mod help;
pub mod parse;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
