//! Shell-word splitting of environment values.

use crate::error::ValueError;

/// Split `raw` into words using POSIX shell quoting rules.
///
/// Quotes group words, backslashes escape, unquoted whitespace separates.
/// Empty or blank input yields no words.
///
/// # Errors
///
/// Returns [`ValueError::MalformedInput`] for unbalanced quotes or a
/// trailing backslash.
///
/// # Example
///
/// ```
/// use envargs::env::split_words;
///
/// let words = split_words("1 2 3 '45  ' 6 7").unwrap();
/// assert_eq!(words, ["1", "2", "3", "45  ", "6", "7"]);
/// ```
pub fn split_words(raw: &str) -> Result<Vec<String>, ValueError> {
    shlex::split(raw).ok_or_else(|| ValueError::MalformedInput {
        raw: raw.to_string(),
    })
}
