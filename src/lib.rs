//! envargs - Command-line arguments with environment variable fallbacks.
//!
//! Any declared argument may name an environment variable. A resolution
//! pass takes each value from the first source that has one: the command
//! line, then the environment, then a namespace supplied by the caller,
//! then the argument's static default. Environment values are split into
//! shell words and matched against the argument's arity exactly like
//! command-line tokens.
//!
//! # Modules
//!
//! - [`args`] - Argument declarations, arity patterns and value conversion
//! - [`env`] - Environment lookup, tokenizing and per-argument bindings
//! - [`resolve`] - The parser and its resolution passes
//! - [`help`] - Help annotations for environment bindings
//! - [`config`] - Declarations loaded from YAML
//! - [`cli`] - The `envargs` binary's commands
//! - [`error`] - Error types and result aliases
//!
//! # Example
//!
//! ```
//! use envargs::args::{ArgSpec, Arity, ValueKind};
//! use envargs::env::MapEnv;
//! use envargs::{EnvArgParser, ParserSettings, ValueOrigin};
//!
//! let env = MapEnv::from([("WORKERS", "4")]);
//! let mut parser = EnvArgParser::with_env(ParserSettings::new("server"), env);
//! parser
//!     .add_argument(ArgSpec::option("workers").kind(ValueKind::Integer).default(1).env("WORKERS"))
//!     .unwrap();
//!
//! let resolution = parser.parse_known_args(Vec::<String>::new(), None).unwrap();
//! assert_eq!(resolution.get("workers"), Some(&serde_json::json!(4)));
//! assert_eq!(
//!     resolution.origin("workers"),
//!     Some(&ValueOrigin::Environment { key: "WORKERS".into() })
//! );
//! ```

pub mod args;
pub mod cli;
pub mod config;
pub mod env;
pub mod error;
pub mod help;
pub mod resolve;

pub use error::{
    ArityError, ConversionError, DeclarationError, EnvArgsError, Result, ValueError,
};
pub use resolve::{EnvArgParser, Namespace, ParserSettings, Resolution, ValueOrigin};
