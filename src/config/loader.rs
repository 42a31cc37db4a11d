//! Declaration file loading.

use std::fs;
use std::path::Path;

use crate::config::schema::ParserConfig;
use crate::error::{EnvArgsError, Result};

/// Load a declaration file from disk.
pub fn load_spec_file(path: &Path) -> Result<ParserConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            EnvArgsError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            EnvArgsError::Io(e)
        }
    })?;

    tracing::debug!(path = %path.display(), "loaded spec file");
    parse_spec(&content, path)
}

/// Parse YAML content into a [`ParserConfig`].
///
/// `source_path` is only used for error reporting.
pub fn parse_spec(content: &str, source_path: &Path) -> Result<ParserConfig> {
    serde_yaml::from_str(content).map_err(|e| EnvArgsError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}
