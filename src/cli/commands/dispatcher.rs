//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::anyhow;

use crate::cli::args::{Cli, Commands};
use crate::config::load_spec_file;
use crate::error::Result;
use crate::resolve::EnvArgParser;

/// Trait for command implementations.
pub trait Command {
    /// Execute the command, writing its output to `out`.
    fn execute(&self, out: &mut dyn Write) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }

    /// Process exit status. Codes outside `0..=255` become 1.
    pub fn process_exit_code(&self) -> u8 {
        u8::try_from(self.exit_code).unwrap_or(1)
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    spec_path: Option<PathBuf>,
}

impl CommandDispatcher {
    /// Create a dispatcher for the declaration file at `spec_path`.
    pub fn new(spec_path: Option<PathBuf>) -> Self {
        Self { spec_path }
    }

    pub fn spec_path(&self) -> Option<&Path> {
        self.spec_path.as_deref()
    }

    /// Load the declared parser, reading the process environment.
    pub fn load_parser(&self) -> Result<EnvArgParser> {
        let path = self
            .spec_path
            .as_deref()
            .ok_or_else(|| anyhow!("no spec file given; pass --spec or set ENVARGS_SPEC"))?;
        load_spec_file(path)?.build()
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, out: &mut dyn Write) -> Result<CommandResult> {
        let parser = self.load_parser()?;
        tracing::debug!(arguments = parser.specs().len(), "dispatching {:?}", cli.command);

        match &cli.command {
            Commands::Parse(args) => {
                super::parse::ParseCommand::new(parser, args.clone()).execute(out)
            }
            Commands::Env(args) => super::env::EnvCommand::new(parser, args.clone()).execute(out),
            Commands::Help(_) => super::help::HelpCommand::new(parser).execute(out),
            Commands::Completions(args) => {
                super::completions::CompletionsCommand::new(parser, args.clone()).execute(out)
            }
        }
    }
}
