//! Resolved values and where they came from.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::args::Value;

/// Mapping from destination name to resolved value.
///
/// # Example
///
/// ```
/// use envargs::Namespace;
///
/// let mut ns = Namespace::new();
/// ns.set("bar", serde_json::json!([1, 2, 3]));
/// let bar: Vec<i64> = ns.get_as("bar").unwrap().unwrap();
/// assert_eq!(bar, [1, 2, 3]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Namespace {
    values: BTreeMap<String, Value>,
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Deserialize a value into `T`. `None` when the name is absent.
    pub fn get_as<T: DeserializeOwned>(&self, name: &str) -> serde_json::Result<Option<T>> {
        self.values
            .get(name)
            .cloned()
            .map(serde_json::from_value)
            .transpose()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Namespace {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for Namespace {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

/// Which source a resolved value came from, highest precedence first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ValueOrigin {
    /// Explicit command-line tokens.
    CommandLine,
    /// An environment variable.
    Environment { key: String },
    /// The namespace handed in by the caller.
    Existing,
    /// The argument's static default.
    Default,
}

impl fmt::Display for ValueOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CommandLine => write!(f, "command line"),
            Self::Environment { key } => write!(f, "environment ({})", key),
            Self::Existing => write!(f, "existing namespace"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// Result of a resolution pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Resolution {
    /// Final values.
    pub namespace: Namespace,
    /// Tokens nothing consumed, from the command line and from environment
    /// values, in the order they were found.
    pub extras: Vec<String>,
    /// Source of every entry in `namespace`.
    pub origins: BTreeMap<String, ValueOrigin>,
}

impl Resolution {
    /// Store `value` for `name`, replacing any lower-precedence value.
    pub(crate) fn assign(&mut self, name: &str, value: Value, origin: ValueOrigin) {
        self.namespace.set(name, value);
        self.origins.insert(name.to_string(), origin);
    }

    /// Where the value of `name` came from.
    pub fn origin(&self, name: &str) -> Option<&ValueOrigin> {
        self.origins.get(name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.namespace.get(name)
    }
}
