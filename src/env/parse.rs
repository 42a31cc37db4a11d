//! Turning a raw environment string into an argument value.

use crate::args::{ArgSpec, Conversion, ValueConverter};
use crate::error::ValueError;

use super::tokenizer::split_words;

/// What an [`EnvValueParser`] is asked to resolve.
#[derive(Debug, Clone, Copy)]
pub struct EnvInput<'a> {
    /// The argument being resolved.
    pub spec: &'a ArgSpec,
    /// Environment variable the value came from.
    pub key: &'a str,
    /// Raw value as captured at declaration time.
    pub raw: &'a str,
}

/// Resolves an environment value for one argument.
///
/// `values` is the shared value-extraction path: converting through it
/// records the argument as supplied for the current pass. Tokens the
/// argument cannot absorb belong in `extras`.
///
/// Closures with the same signature implement this trait:
///
/// ```
/// use envargs::args::{ArgSpec, Conversion, ValueConverter};
/// use envargs::env::{EnvInput, EnvValueParser};
/// use envargs::ValueError;
///
/// let comma_list = |input: &EnvInput<'_>,
///                   values: &dyn ValueConverter,
///                   _extras: &mut Vec<String>|
///  -> Result<Conversion, ValueError> {
///     let tokens: Vec<String> = input.raw.split(',').map(str::to_string).collect();
///     Ok(values.convert(input.spec, &tokens)?)
/// };
/// let spec = ArgSpec::option("tags").env("TAGS").env_parser(comma_list);
/// assert_eq!(spec.env_key(), Some("TAGS"));
/// ```
pub trait EnvValueParser {
    fn parse(
        &self,
        input: &EnvInput<'_>,
        values: &dyn ValueConverter,
        extras: &mut Vec<String>,
    ) -> Result<Conversion, ValueError>;
}

impl<F> EnvValueParser for F
where
    F: Fn(&EnvInput<'_>, &dyn ValueConverter, &mut Vec<String>) -> Result<Conversion, ValueError>,
{
    fn parse(
        &self,
        input: &EnvInput<'_>,
        values: &dyn ValueConverter,
        extras: &mut Vec<String>,
    ) -> Result<Conversion, ValueError> {
        self(input, values, extras)
    }
}

/// The built-in pipeline: shell-word split, arity match, convert.
///
/// Words beyond what the argument's arity can absorb are appended to
/// `extras`, the same way unconsumed command-line tokens are.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellWords;

impl EnvValueParser for ShellWords {
    fn parse(
        &self,
        input: &EnvInput<'_>,
        values: &dyn ValueConverter,
        extras: &mut Vec<String>,
    ) -> Result<Conversion, ValueError> {
        let words = split_words(input.raw)?;
        let matched = input.spec.get_arity().match_tokens(&words)?;
        extras.extend(matched.leftover.iter().cloned());
        Ok(values.convert(input.spec, matched.consumed)?)
    }
}
