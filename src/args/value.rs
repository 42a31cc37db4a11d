//! Value conversion.
//!
//! A [`ValueConverter`] turns the tokens an argument consumed into a typed
//! [`Value`]. The built-in converters work token by token and leave the
//! shaping (switch, scalar or list, `const` for empty optional matches,
//! `choices` checks) to [`shape_tokens`], so custom token functions behave
//! exactly like the built-in kinds.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::spec::ArgSpec;
use crate::error::ConversionError;

/// A resolved argument value.
pub type Value = serde_json::Value;

/// Outcome of converting an argument's tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum Conversion {
    /// A value to store under the argument's destination.
    Value(Value),
    /// This source contributes nothing; lower-precedence values stay.
    Suppressed,
}

impl Conversion {
    /// The converted value, if any.
    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Value(v) => Some(v),
            Self::Suppressed => None,
        }
    }
}

/// Converts consumed tokens into a value for one argument.
///
/// Used for both command-line and environment tokens.
pub trait ValueConverter {
    /// Convert `tokens` for `spec`.
    fn convert(&self, spec: &ArgSpec, tokens: &[String]) -> Result<Conversion, ConversionError>;
}

/// Built-in token kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// Token stored verbatim.
    #[default]
    String,
    /// Signed integer; surrounding whitespace is ignored.
    Integer,
    /// Floating point number; surrounding whitespace is ignored.
    Float,
    /// `true/false`, `yes/no`, `on/off`, `1/0` (case-insensitive).
    Boolean,
}

impl ValueKind {
    /// Convert a single token.
    pub fn convert_token(&self, token: &str) -> Result<Value, ConversionError> {
        let fail = || ConversionError::new(self.to_string(), token);
        match self {
            Self::String => Ok(Value::String(token.to_string())),
            Self::Integer => token
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| fail()),
            Self::Float => token
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .ok_or_else(fail),
            Self::Boolean => match token.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Ok(Value::Bool(true)),
                "false" | "no" | "off" | "0" => Ok(Value::Bool(false)),
                _ => Err(fail()),
            },
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Integer => write!(f, "integer"),
            Self::Float => write!(f, "float"),
            Self::Boolean => write!(f, "boolean"),
        }
    }
}

impl ValueConverter for ValueKind {
    fn convert(&self, spec: &ArgSpec, tokens: &[String]) -> Result<Conversion, ConversionError> {
        shape_tokens(spec, tokens, |token| self.convert_token(token))
    }
}

/// Converter built from a per-token function.
///
/// # Example
///
/// ```
/// use envargs::args::{ArgSpec, Conversion, TokenFn, ValueConverter};
/// use envargs::ConversionError;
///
/// let upper = TokenFn::new(|token: &str| -> Result<serde_json::Value, ConversionError> {
///     Ok(token.to_uppercase().into())
/// });
/// let spec = ArgSpec::option("name");
/// let out = upper.convert(&spec, &["abc".to_string()]).unwrap();
/// assert_eq!(out, Conversion::Value("ABC".into()));
/// ```
pub struct TokenFn<F> {
    f: F,
}

impl<F> TokenFn<F>
where
    F: Fn(&str) -> Result<Value, ConversionError>,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> ValueConverter for TokenFn<F>
where
    F: Fn(&str) -> Result<Value, ConversionError>,
{
    fn convert(&self, spec: &ArgSpec, tokens: &[String]) -> Result<Conversion, ConversionError> {
        shape_tokens(spec, tokens, &self.f)
    }
}

/// Shape converted tokens according to the argument's arity.
///
/// - switches produce their `const` (default `true`) and ignore tokens
/// - an optional single value with no token produces `const`, or
///   [`Conversion::Suppressed`] when no `const` was declared
/// - `Exact(1)` and `ZeroOrOne` produce a scalar, everything else a list
pub fn shape_tokens<F>(
    spec: &ArgSpec,
    tokens: &[String],
    convert: F,
) -> Result<Conversion, ConversionError>
where
    F: Fn(&str) -> Result<Value, ConversionError>,
{
    let arity = spec.get_arity();

    if arity.is_switch() {
        let value = spec.get_const().cloned().unwrap_or(Value::Bool(true));
        return Ok(Conversion::Value(value));
    }

    if tokens.is_empty() && arity.is_scalar() {
        return Ok(match spec.get_const() {
            Some(value) => Conversion::Value(value.clone()),
            None => Conversion::Suppressed,
        });
    }

    let mut values = Vec::with_capacity(tokens.len());
    for token in tokens {
        let value = convert(token)?;
        check_choice(spec, token, &value)?;
        values.push(value);
    }

    if arity.is_scalar() {
        Ok(values
            .into_iter()
            .next()
            .map_or(Conversion::Suppressed, Conversion::Value))
    } else {
        Ok(Conversion::Value(Value::Array(values)))
    }
}

fn check_choice(spec: &ArgSpec, token: &str, value: &Value) -> Result<(), ConversionError> {
    let choices = spec.get_choices();
    if choices.is_empty() {
        return Ok(());
    }

    let rendered = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    if choices.iter().any(|c| *c == rendered) {
        Ok(())
    } else {
        Err(ConversionError::new(
            format!("choice (one of {})", choices.join(", ")),
            token,
        ))
    }
}
