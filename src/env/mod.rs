//! Environment variable participation.
//!
//! - [`source`] - where variables are looked up ([`ProcessEnv`], [`MapEnv`])
//! - [`tokenizer`] - shell-word splitting of raw values
//! - [`parse`] - [`EnvValueParser`] and the built-in [`ShellWords`] pipeline
//! - [`record`] - per-argument snapshots kept in the [`EnvRegistry`]

pub mod parse;
pub mod record;
pub mod source;
pub mod tokenizer;

pub use parse::{EnvInput, EnvValueParser, ShellWords};
pub use record::{EnvRecord, EnvRegistry};
pub use source::{EnvSource, MapEnv, ProcessEnv};
pub use tokenizer::split_words;
