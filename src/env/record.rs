//! Environment bindings captured at declaration time.
//!
//! Every argument declared with an environment key gets one [`EnvRecord`]
//! in the parser's [`EnvRegistry`]. The variable is read once, when the
//! argument is declared; later passes use that snapshot.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::args::ArgId;

use super::parse::{EnvValueParser, ShellWords};

/// Snapshot of one argument's environment binding.
#[derive(Clone)]
pub struct EnvRecord {
    arg: ArgId,
    key: String,
    raw: String,
    present: bool,
    parser: Arc<dyn EnvValueParser + Send + Sync>,
}

impl EnvRecord {
    /// Capture a binding. `value` is the lookup result for `key`.
    pub(crate) fn capture(
        arg: ArgId,
        key: impl Into<String>,
        value: Option<String>,
        parser: Option<Arc<dyn EnvValueParser + Send + Sync>>,
    ) -> Self {
        let present = value.is_some();
        Self {
            arg,
            key: key.into(),
            raw: value.unwrap_or_default(),
            present,
            parser: parser.unwrap_or_else(|| Arc::new(ShellWords)),
        }
    }

    /// The argument this binding belongs to.
    pub fn arg(&self) -> ArgId {
        self.arg
    }

    /// Environment variable name.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Raw value, empty when the variable was not set.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Whether the variable was set when the argument was declared.
    pub fn is_present(&self) -> bool {
        self.present
    }

    pub(crate) fn parser(&self) -> &dyn EnvValueParser {
        self.parser.as_ref()
    }
}

impl fmt::Debug for EnvRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvRecord")
            .field("arg", &self.arg)
            .field("key", &self.key)
            .field("raw", &self.raw)
            .field("present", &self.present)
            .finish_non_exhaustive()
    }
}

/// Side table from argument identity to its environment binding.
#[derive(Debug, Clone, Default)]
pub struct EnvRegistry {
    records: BTreeMap<ArgId, EnvRecord>,
}

impl EnvRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, record: EnvRecord) {
        self.records.insert(record.arg, record);
    }

    /// The binding for `arg`, if it participates in environment resolution.
    pub fn get(&self, arg: ArgId) -> Option<&EnvRecord> {
        self.records.get(&arg)
    }

    /// Whether `arg` was supplied by its environment variable, which lifts
    /// its command-line requirement.
    pub fn relaxes_required(&self, arg: ArgId) -> bool {
        self.get(arg).is_some_and(EnvRecord::is_present)
    }

    /// All bindings in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &EnvRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
