//! Error reporting hooks.
//!
//! The engine never terminates the process. Every failure of a pass is
//! shown to the parser's [`ErrorReporter`] and then returned to the caller,
//! who decides between printing and exiting or handling the error.

use clap::error::ErrorKind;

use crate::error::EnvArgsError;

/// Receives failures before they are returned.
pub trait ErrorReporter {
    fn report(&self, error: &EnvArgsError);
}

/// Logs failures through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, error: &EnvArgsError) {
        if let EnvArgsError::CommandLine(err) = error {
            if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                tracing::debug!("help or version requested");
                return;
            }
        }
        tracing::warn!(argument = error.argument(), "{}", error);
    }
}

/// Ignores failures.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentReporter;

impl ErrorReporter for SilentReporter {
    fn report(&self, _error: &EnvArgsError) {}
}
