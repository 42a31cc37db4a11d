//! Declaration file schema.
//!
//! Maps the YAML format accepted by `--spec` onto [`ArgSpec`]s and
//! [`ParserSettings`].

use serde::{Deserialize, Serialize};

use crate::args::{ArgSpec, Arity, Value, ValueKind};
use crate::env::EnvSource;
use crate::error::{DeclarationError, Result};
use crate::resolve::{EnvArgParser, ParserSettings};

/// Root of a declaration file.
///
/// ```yaml
/// prog: server
/// about: Runs the server
/// arguments:
///   - name: port
///     type: integer
///     default: 8080
///     env: SERVER_PORT
///   - name: files
///     positional: true
///     nargs: "*"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserConfig {
    /// Program name shown in usage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prog: Option<String>,

    /// Description shown in help
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,

    /// Add `-h/--help`
    pub add_help: bool,

    /// Show `(default: X)` in help
    pub show_defaults: bool,

    /// Argument declarations, in order
    pub arguments: Vec<ArgumentConfig>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            prog: None,
            about: None,
            add_help: true,
            show_defaults: true,
            arguments: Vec::new(),
        }
    }
}

impl ParserConfig {
    pub fn settings(&self) -> ParserSettings {
        let mut settings = match &self.prog {
            Some(prog) => ParserSettings::new(prog.clone()),
            None => ParserSettings::default(),
        };
        settings.about = self.about.clone();
        settings.add_help = self.add_help;
        settings.show_defaults = self.show_defaults;
        settings
    }

    /// Build a parser reading the process environment.
    pub fn build(&self) -> Result<EnvArgParser> {
        self.build_with(EnvArgParser::new(self.settings()))
    }

    /// Build a parser reading variables from `env`.
    pub fn build_with_env(&self, env: impl EnvSource + 'static) -> Result<EnvArgParser> {
        self.build_with(EnvArgParser::with_env(self.settings(), env))
    }

    fn build_with(&self, mut parser: EnvArgParser) -> Result<EnvArgParser> {
        for argument in &self.arguments {
            parser.add_argument(argument.to_spec()?)?;
        }
        tracing::debug!(arguments = self.arguments.len(), "built parser from spec");
        Ok(parser)
    }
}

/// `nargs` as written: a count or a pattern string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NargsConfig {
    Count(usize),
    Pattern(String),
}

impl NargsConfig {
    pub fn to_arity(&self) -> std::result::Result<Arity, String> {
        match self {
            Self::Count(n) => Ok(Arity::Exact(*n)),
            Self::Pattern(pattern) => pattern.parse(),
        }
    }
}

/// One argument declaration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArgumentConfig {
    /// Namespace key; also the long flag with `_` turned into `-`
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub long: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub short: Option<char>,

    pub positional: bool,

    /// `?`, `*`, `+`, a count, `{min,}` or `{min,max}`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nargs: Option<NargsConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    #[serde(rename = "const", skip_serializing_if = "Option::is_none")]
    pub const_value: Option<Value>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ValueKind>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,

    /// Environment variable that can supply this argument
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub metavar: Option<String>,
}

impl ArgumentConfig {
    /// Translate into an [`ArgSpec`]. An `nargs` of `0` declares a switch.
    pub fn to_spec(&self) -> std::result::Result<ArgSpec, DeclarationError> {
        let arity = self
            .nargs
            .as_ref()
            .map(NargsConfig::to_arity)
            .transpose()
            .map_err(|reason| DeclarationError::new(&self.name, reason))?;

        let mut spec = if self.positional {
            ArgSpec::positional(&self.name)
        } else if arity.is_some_and(|arity| arity.is_switch()) {
            ArgSpec::flag(&self.name)
        } else {
            ArgSpec::option(&self.name)
        };

        if let Some(arity) = arity {
            spec = spec.arity(arity);
        }
        if let Some(long) = &self.long {
            spec = spec.long(long);
        }
        if let Some(short) = self.short {
            spec = spec.short(short);
        }
        if let Some(required) = self.required {
            spec = spec.required(required);
        }
        if let Some(kind) = self.kind {
            spec = spec.kind(kind);
        }
        if let Some(default) = &self.default {
            spec = spec.default(default.clone());
        }
        if let Some(value) = &self.const_value {
            spec = spec.const_value(value.clone());
        }
        if !self.choices.is_empty() {
            spec = spec.choices(self.choices.iter().cloned());
        }
        if let Some(key) = &self.env {
            spec = spec.env(key);
        }
        if let Some(help) = &self.help {
            spec = spec.help(help);
        }
        if let Some(metavar) = &self.metavar {
            spec = spec.value_name(metavar);
        }

        Ok(spec)
    }
}
