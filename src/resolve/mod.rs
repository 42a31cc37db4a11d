//! Resolution of declared arguments from the command line and the
//! environment.
//!
//! - [`parser`] - [`EnvArgParser`], declaration and resolution passes
//! - [`command_line`] - binding to clap
//! - [`seen`] - per-pass tracking of supplied arguments
//! - [`namespace`] - resolved values and their origins
//! - [`report`] - error reporting hooks

pub mod command_line;
pub mod namespace;
pub mod parser;
pub mod report;
pub mod seen;

pub use namespace::{Namespace, Resolution, ValueOrigin};
pub use parser::{EnvArgParser, ParserSettings};
pub use report::{ErrorReporter, SilentReporter, TracingReporter};
pub use seen::{MarkSeen, PassGuard, SeenTracker};
