//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

/// envargs - Resolve command-line arguments with environment fallbacks.
#[derive(Debug, Parser)]
#[command(name = "envargs")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true, disable_help_subcommand = true)]
pub struct Cli {
    /// Path to the argument declaration file (YAML)
    #[arg(short, long, global = true, env = "ENVARGS_SPEC")]
    pub spec: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resolve arguments against the declared spec
    Parse(ParseArgs),

    /// List environment variable bindings
    Env(EnvArgs),

    /// Show help for the declared parser
    Help(HelpArgs),

    /// Generate shell completions for the declared parser
    Completions(CompletionsArgs),
}

/// Output format of `parse`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Namespace, origins and extras as JSON
    #[default]
    Json,
    /// `NAME='value'` assignments
    Shell,
}

/// Arguments for the `parse` command.
#[derive(Debug, Clone, Default, Args)]
pub struct ParseArgs {
    /// Allow options and positionals to interleave
    #[arg(long)]
    pub intermixed: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Report unrecognized tokens instead of failing
    #[arg(long)]
    pub allow_extra: bool,

    /// Arguments to resolve (after `--`)
    #[arg(last = true)]
    pub args: Vec<String>,
}

/// Arguments for the `env` command.
#[derive(Debug, Clone, Default, Args)]
pub struct EnvArgs {
    /// Only list bindings whose variable is set
    #[arg(long)]
    pub set_only: bool,
}

/// Arguments for the `help` command.
#[derive(Debug, Clone, Default, Args)]
pub struct HelpArgs {}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_collects_trailing_args() {
        let cli = Cli::try_parse_from([
            "envargs", "--spec", "s.yml", "parse", "--intermixed", "--", "--bar", "1",
        ])
        .unwrap();
        assert_eq!(cli.spec, Some(PathBuf::from("s.yml")));
        match cli.command {
            Commands::Parse(args) => {
                assert!(args.intermixed);
                assert_eq!(args.format, OutputFormat::Json);
                assert_eq!(args.args, ["--bar", "1"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn shell_format_parses() {
        let cli = Cli::try_parse_from(["envargs", "parse", "--format", "shell"]).unwrap();
        match cli.command {
            Commands::Parse(args) => assert_eq!(args.format, OutputFormat::Shell),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn help_is_a_subcommand() {
        let cli = Cli::try_parse_from(["envargs", "help", "--debug"]).unwrap();
        assert!(cli.debug);
        assert!(matches!(cli.command, Commands::Help(_)));
    }

    #[test]
    fn completions_require_shell() {
        assert!(Cli::try_parse_from(["envargs", "completions"]).is_err());
        let cli = Cli::try_parse_from(["envargs", "completions", "bash"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Completions(CompletionsArgs { shell: Shell::Bash })
        ));
    }
}
