//! Argument declarations.

use std::fmt;
use std::sync::Arc;

use super::arity::Arity;
use super::value::{TokenFn, Value, ValueConverter, ValueKind};
use crate::env::EnvValueParser;
use crate::error::ConversionError;

/// Identity of a declared argument within its parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArgId(pub(crate) usize);

impl ArgId {
    /// Declaration index of the argument.
    pub fn index(&self) -> usize {
        self.0
    }
}

type SharedConverter = Arc<dyn ValueConverter + Send + Sync>;
type SharedEnvParser = Arc<dyn EnvValueParser + Send + Sync>;

/// One declared argument.
///
/// Built with the constructor for its shape ([`ArgSpec::option`],
/// [`ArgSpec::flag`], [`ArgSpec::positional`]) and refined with builder
/// methods. Once handed to
/// [`EnvArgParser::add_argument`](crate::EnvArgParser::add_argument) it is
/// immutable.
///
/// # Example
///
/// ```
/// use envargs::args::{ArgSpec, Arity, ValueKind};
///
/// let bar = ArgSpec::option("bar")
///     .arity(Arity::OneOrMore)
///     .kind(ValueKind::Integer)
///     .required(true)
///     .default(22)
///     .env("BAR")
///     .help("Help message for bar.");
///
/// assert_eq!(bar.get_long(), Some("bar"));
/// assert_eq!(bar.env_key(), Some("BAR"));
/// ```
#[derive(Clone)]
pub struct ArgSpec {
    id: Option<ArgId>,
    dest: String,
    long: Option<String>,
    short: Option<char>,
    positional: bool,
    arity: Arity,
    required: bool,
    default: Option<Value>,
    const_value: Option<Value>,
    choices: Vec<String>,
    help: Option<String>,
    value_name: Option<String>,
    kind: ValueKind,
    converter: Option<SharedConverter>,
    env_key: Option<String>,
    env_parser: Option<SharedEnvParser>,
}

impl ArgSpec {
    fn new(dest: impl Into<String>, positional: bool) -> Self {
        Self {
            id: None,
            dest: dest.into(),
            long: None,
            short: None,
            positional,
            arity: Arity::default(),
            required: positional,
            default: None,
            const_value: None,
            choices: Vec::new(),
            help: None,
            value_name: None,
            kind: ValueKind::default(),
            converter: None,
            env_key: None,
            env_parser: None,
        }
    }

    /// An option taking one value, with long flag `--<dest>` (underscores
    /// become dashes).
    pub fn option(dest: impl Into<String>) -> Self {
        let mut spec = Self::new(dest, false);
        spec.long = Some(spec.dest.replace('_', "-"));
        spec
    }

    /// A boolean switch: no values, `true` when given, `false` by default.
    pub fn flag(dest: impl Into<String>) -> Self {
        Self::option(dest)
            .arity(Arity::Exact(0))
            .default(false)
            .kind(ValueKind::Boolean)
    }

    /// A positional argument, required unless its arity accepts zero tokens.
    pub fn positional(dest: impl Into<String>) -> Self {
        Self::new(dest, true)
    }

    /// Replace the long flag (without leading dashes).
    pub fn long(mut self, long: impl Into<String>) -> Self {
        self.long = Some(long.into());
        self
    }

    /// Add a short flag.
    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    pub fn arity(mut self, arity: Arity) -> Self {
        self.arity = arity;
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Static default, the lowest-precedence value source.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Value produced by a switch or by an optional value given no token.
    pub fn const_value(mut self, value: impl Into<Value>) -> Self {
        self.const_value = Some(value.into());
        self
    }

    /// Restrict converted values to these renderings.
    pub fn choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Placeholder shown in usage (defaults to the uppercased dest).
    pub fn value_name(mut self, name: impl Into<String>) -> Self {
        self.value_name = Some(name.into());
        self
    }

    /// Use a built-in token kind for conversion.
    pub fn kind(mut self, kind: ValueKind) -> Self {
        self.kind = kind;
        self.converter = None;
        self
    }

    /// Use a custom converter for command-line and environment tokens.
    pub fn converter(mut self, converter: impl ValueConverter + Send + Sync + 'static) -> Self {
        self.converter = Some(Arc::new(converter));
        self
    }

    /// Use a per-token function for conversion.
    pub fn map_token<F>(self, f: F) -> Self
    where
        F: Fn(&str) -> Result<Value, ConversionError> + Send + Sync + 'static,
    {
        self.converter(TokenFn::new(f))
    }

    /// Let this argument be satisfied from environment variable `key`.
    pub fn env(mut self, key: impl Into<String>) -> Self {
        self.env_key = Some(key.into());
        self
    }

    /// Replace the built-in tokenize/match/convert pipeline for environment
    /// values. Requires [`ArgSpec::env`].
    pub fn env_parser(mut self, parser: impl EnvValueParser + Send + Sync + 'static) -> Self {
        self.env_parser = Some(Arc::new(parser));
        self
    }

    pub(crate) fn assign_id(&mut self, id: ArgId) {
        self.id = Some(id);
    }

    /// Identity assigned at declaration, `None` before.
    pub fn id(&self) -> Option<ArgId> {
        self.id
    }

    /// Namespace key of the argument.
    pub fn dest(&self) -> &str {
        &self.dest
    }

    pub fn get_long(&self) -> Option<&str> {
        self.long.as_deref()
    }

    pub fn get_short(&self) -> Option<char> {
        self.short
    }

    pub fn is_positional(&self) -> bool {
        self.positional
    }

    pub fn get_arity(&self) -> Arity {
        self.arity
    }

    /// Declared requirement. Positionals whose arity accepts zero tokens are
    /// never required.
    pub fn is_required(&self) -> bool {
        self.required && !(self.positional && self.arity.accepts_empty())
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn get_const(&self) -> Option<&Value> {
        self.const_value.as_ref()
    }

    pub fn get_choices(&self) -> &[String] {
        &self.choices
    }

    pub fn get_help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn get_value_name(&self) -> String {
        self.value_name
            .clone()
            .unwrap_or_else(|| self.dest.to_uppercase())
    }

    pub fn value_kind(&self) -> ValueKind {
        self.kind
    }

    /// The converter applied to this argument's tokens.
    pub fn value_converter(&self) -> &dyn ValueConverter {
        match &self.converter {
            Some(converter) => converter.as_ref(),
            None => &self.kind,
        }
    }

    pub fn env_key(&self) -> Option<&str> {
        self.env_key.as_deref()
    }

    pub(crate) fn custom_env_parser(&self) -> Option<&SharedEnvParser> {
        self.env_parser.as_ref()
    }

    /// Label used in messages: `--bar` for options, `bar` for positionals.
    pub fn display_name(&self) -> String {
        match (&self.long, self.short) {
            (Some(long), _) if !self.positional => format!("--{}", long),
            (None, Some(short)) if !self.positional => format!("-{}", short),
            _ => self.dest.clone(),
        }
    }
}

impl fmt::Debug for ArgSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgSpec")
            .field("id", &self.id)
            .field("dest", &self.dest)
            .field("long", &self.long)
            .field("short", &self.short)
            .field("positional", &self.positional)
            .field("arity", &self.arity)
            .field("required", &self.required)
            .field("default", &self.default)
            .field("env_key", &self.env_key)
            .field("custom_converter", &self.converter.is_some())
            .field("custom_env_parser", &self.env_parser.is_some())
            .finish()
    }
}
