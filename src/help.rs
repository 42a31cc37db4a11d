//! Help text annotations.
//!
//! Adds `(default: X)` and `(env_var: KEY)` to an argument's help so usage
//! output tells the user which environment variable can supply it.

use crate::args::{ArgSpec, Value};
use crate::env::EnvRecord;

/// Label used for environment annotations.
pub const ENV_LABEL: &str = "env_var";

/// Render a value the way it appears in help.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Help for `spec`, annotated with its default (when `show_defaults`) and its
/// environment key. `None` when there is nothing to show.
///
/// An annotation already present in the declared help is not repeated.
///
/// # Example
///
/// ```
/// use envargs::args::ArgSpec;
/// use envargs::help::annotate;
///
/// let spec = ArgSpec::option("bar").default(22).help("Help message for bar.");
/// assert_eq!(
///     annotate(&spec, None, true).as_deref(),
///     Some("Help message for bar. (default: 22)")
/// );
/// ```
pub fn annotate(spec: &ArgSpec, record: Option<&EnvRecord>, show_defaults: bool) -> Option<String> {
    let mut help = spec.get_help().unwrap_or_default().to_string();

    if show_defaults {
        if let Some(default) = spec.default_value() {
            append(&mut help, format!("(default: {})", render_value(default)));
        }
    }

    if let Some(record) = record {
        append(&mut help, format!("({}: {})", ENV_LABEL, record.key()));
    }

    if help.is_empty() {
        None
    } else {
        Some(help)
    }
}

fn append(help: &mut String, annotation: String) {
    if help.contains(&annotation) {
        return;
    }
    if !help.is_empty() {
        help.push(' ');
    }
    help.push_str(&annotation);
}
