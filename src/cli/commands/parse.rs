//! Parse command implementation.
//!
//! The `envargs parse -- ARGS...` command resolves ARGS against the declared
//! parser and prints the result.

use std::io::Write;

use crate::args::Value;
use crate::cli::args::{OutputFormat, ParseArgs};
use crate::error::{EnvArgsError, Result};
use crate::resolve::{EnvArgParser, Namespace, Resolution};

use super::dispatcher::{Command, CommandResult};

/// The parse command implementation.
pub struct ParseCommand {
    parser: EnvArgParser,
    args: ParseArgs,
}

impl ParseCommand {
    pub fn new(parser: EnvArgParser, args: ParseArgs) -> Self {
        Self { parser, args }
    }

    pub fn args(&self) -> &ParseArgs {
        &self.args
    }

    fn resolve(&self) -> Result<Resolution> {
        let argv = self.args.args.iter().cloned();
        let resolution = if self.args.intermixed {
            self.parser.parse_intermixed_known_args(argv, None)?
        } else {
            self.parser.parse_known_args(argv, None)?
        };

        if !self.args.allow_extra && !resolution.extras.is_empty() {
            return Err(EnvArgsError::UnrecognizedArguments {
                tokens: resolution.extras,
            });
        }
        Ok(resolution)
    }
}

impl Command for ParseCommand {
    fn execute(&self, out: &mut dyn Write) -> Result<CommandResult> {
        let resolution = self.resolve()?;

        match self.args.format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&resolution)
                    .map_err(|e| EnvArgsError::Other(e.into()))?;
                writeln!(out, "{}", json)?;
            }
            OutputFormat::Shell => {
                for line in shell_assignments(&resolution.namespace)? {
                    writeln!(out, "{}", line)?;
                }
            }
        }
        out.flush()?;

        Ok(CommandResult::success())
    }
}

/// `NAME='value'` lines for every namespace entry.
///
/// Names are uppercased with `-` turned into `_`. A list renders as its
/// shell-quoted words, so `eval "set -- $NAME"` restores the items.
pub fn shell_assignments(namespace: &Namespace) -> Result<Vec<String>> {
    namespace
        .iter()
        .map(|(name, value)| {
            let rendered = shell_value(value)?;
            Ok(format!("{}={}", shell_name(name), single_quote(&rendered)))
        })
        .collect()
}

fn shell_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
        .collect()
}

fn shell_value(value: &Value) -> Result<String> {
    match value {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s.clone()),
        Value::Array(items) => {
            let words: Vec<String> = items.iter().map(scalar_text).collect();
            shlex::try_join(words.iter().map(String::as_str))
                .map_err(|e| EnvArgsError::Other(anyhow::anyhow!("cannot quote list: {}", e)))
        }
        other => Ok(other.to_string()),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn single_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}
