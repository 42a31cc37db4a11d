//! Command-line interface for envargs.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, CompletionsArgs, EnvArgs, HelpArgs, OutputFormat, ParseArgs};
pub use commands::{Command, CommandDispatcher, CommandResult};
