//! envargs CLI entry point.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use envargs::cli::{Cli, CommandDispatcher};
use envargs::EnvArgsError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is WARN
///
/// Logs go to stderr; stdout carries command output.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("envargs=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("envargs=warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("envargs starting with args: {:?}", cli);

    let dispatcher = CommandDispatcher::new(cli.spec.clone());
    let mut stdout = io::stdout().lock();

    match dispatcher.dispatch(&cli, &mut stdout) {
        Ok(result) => ExitCode::from(result.process_exit_code()),
        Err(EnvArgsError::CommandLine(err)) => {
            let _ = stdout.flush();
            err.exit()
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}
