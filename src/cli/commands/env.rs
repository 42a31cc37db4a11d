//! Env command implementation.
//!
//! The `envargs env` command lists each environment binding of the declared
//! parser and whether its variable was set.

use std::io::Write;

use crate::cli::args::EnvArgs;
use crate::error::Result;
use crate::resolve::EnvArgParser;

use super::dispatcher::{Command, CommandResult};

/// The env command implementation.
pub struct EnvCommand {
    parser: EnvArgParser,
    args: EnvArgs,
}

impl EnvCommand {
    pub fn new(parser: EnvArgParser, args: EnvArgs) -> Self {
        Self { parser, args }
    }

    /// One `KEY  ARGUMENT  STATUS` row per binding.
    pub fn rows(&self) -> Vec<[String; 3]> {
        self.parser
            .env_records()
            .filter(|(_, record)| !self.args.set_only || record.is_present())
            .map(|(spec, record)| {
                let status = if record.is_present() {
                    format!("set ({:?})", record.raw())
                } else {
                    "unset".to_string()
                };
                [record.key().to_string(), spec.display_name(), status]
            })
            .collect()
    }
}

impl Command for EnvCommand {
    fn execute(&self, out: &mut dyn Write) -> Result<CommandResult> {
        let rows = self.rows();
        if rows.is_empty() {
            writeln!(out, "No environment bindings.")?;
            return Ok(CommandResult::success());
        }

        let key_width = rows.iter().map(|r| r[0].len()).max().unwrap_or(0);
        let arg_width = rows.iter().map(|r| r[1].len()).max().unwrap_or(0);
        for [key, argument, status] in rows {
            writeln!(
                out,
                "{:key_width$}  {:arg_width$}  {}",
                key, argument, status
            )?;
        }
        out.flush()?;

        Ok(CommandResult::success())
    }
}
