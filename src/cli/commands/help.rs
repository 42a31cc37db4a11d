//! Help command implementation.
//!
//! The `envargs help` command prints the help of the declared parser, with
//! default and environment annotations.

use std::io::Write;

use crate::error::Result;
use crate::resolve::EnvArgParser;

use super::dispatcher::{Command, CommandResult};

/// The help command implementation.
pub struct HelpCommand {
    parser: EnvArgParser,
}

impl HelpCommand {
    pub fn new(parser: EnvArgParser) -> Self {
        Self { parser }
    }
}

impl Command for HelpCommand {
    fn execute(&self, out: &mut dyn Write) -> Result<CommandResult> {
        let mut cmd = self.parser.command();
        let help = cmd.render_help();
        write!(out, "{}", help)?;
        out.flush()?;
        Ok(CommandResult::success())
    }
}
