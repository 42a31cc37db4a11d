//! Argument declarations loaded from YAML.
//!
//! - Schema definitions in [`schema`]
//! - File loading in [`loader`]
//!
//! # Example
//!
//! ```
//! use envargs::config::load_spec_file;
//! use envargs::env::MapEnv;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let path = temp.path().join("spec.yml");
//! fs::write(&path, "arguments:\n  - name: bar\n    nargs: '+'\n    env: BAR\n").unwrap();
//!
//! let config = load_spec_file(&path).unwrap();
//! let parser = config.build_with_env(MapEnv::from([("BAR", "a b")])).unwrap();
//! let ns = parser.parse_args(Vec::<String>::new(), None).unwrap();
//! assert_eq!(ns.get("bar"), Some(&serde_json::json!(["a", "b"])));
//! ```

pub mod loader;
pub mod schema;

pub use loader::{load_spec_file, parse_spec};
pub use schema::{ArgumentConfig, NargsConfig, ParserConfig};
