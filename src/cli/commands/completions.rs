//! Shell completions generation.
//!
//! The `envargs completions` command generates a completion script for the
//! declared parser.

use std::io::Write;

use crate::cli::args::CompletionsArgs;
use crate::error::Result;
use crate::resolve::EnvArgParser;

use super::dispatcher::{Command, CommandResult};

/// The completions command implementation.
pub struct CompletionsCommand {
    parser: EnvArgParser,
    args: CompletionsArgs,
}

impl CompletionsCommand {
    pub fn new(parser: EnvArgParser, args: CompletionsArgs) -> Self {
        Self { parser, args }
    }
}

impl Command for CompletionsCommand {
    fn execute(&self, out: &mut dyn Write) -> Result<CommandResult> {
        let mut cmd = self.parser.command();
        let bin_name = self.parser.settings().prog.clone();
        clap_complete::generate(self.args.shell, &mut cmd, bin_name, out);
        out.flush()?;
        Ok(CommandResult::success())
    }
}
