//! Binding to the underlying command-line parser (clap).
//!
//! Declared arguments are turned into a `clap::Command` for every
//! (sub-)parse. clap owns flag syntax, grouping and usage errors; this
//! module only reports back which arguments it consumed and with which raw
//! tokens.

use clap::builder::ValueRange;
use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::args::{ArgSpec, Arity, ValueKind};

/// Which declared arguments a parse considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Options and positionals.
    All,
    /// Options only; positional tokens end up as extras.
    Options,
    /// Positionals only.
    Positionals,
}

impl Scope {
    pub fn includes(&self, spec: &ArgSpec) -> bool {
        match self {
            Self::All => true,
            Self::Options => !spec.is_positional(),
            Self::Positionals => spec.is_positional(),
        }
    }
}

/// clap's `num_args` for an arity pattern.
pub fn value_range(arity: Arity) -> ValueRange {
    match arity.max() {
        Some(max) => ValueRange::new(arity.min()..=max),
        None => ValueRange::new(arity.min()..),
    }
}

/// A positional is only present when it has a token, so its range starts
/// at one; optional positionals are declared not required instead.
fn positional_range(arity: Arity) -> ValueRange {
    let min = arity.min().max(1);
    match arity.max() {
        Some(max) => ValueRange::new(min..=max.max(min)),
        None => ValueRange::new(min..),
    }
}

/// Build the clap argument for `spec`.
pub fn to_clap_arg(spec: &ArgSpec, required: bool, help: Option<String>) -> Arg {
    let mut arg = Arg::new(spec.dest().to_string()).required(required);

    if !spec.is_positional() {
        if let Some(long) = spec.get_long() {
            arg = arg.long(long.to_string());
        }
        if let Some(short) = spec.get_short() {
            arg = arg.short(short);
        }
    }

    arg = if spec.get_arity().is_switch() {
        arg.action(ArgAction::SetTrue)
    } else {
        let range = if spec.is_positional() {
            positional_range(spec.get_arity())
        } else {
            value_range(spec.get_arity())
        };
        let numeric = matches!(spec.value_kind(), ValueKind::Integer | ValueKind::Float);
        arg.action(ArgAction::Set)
            .num_args(range)
            .value_name(spec.get_value_name())
            .allow_negative_numbers(numeric)
    };

    if let Some(help) = help {
        arg = arg.help(help);
    }

    arg
}

/// Raw tokens clap consumed for `spec`, or `None` if the command line did
/// not mention it. Switches consume no tokens.
pub fn consumed_tokens(matches: &ArgMatches, spec: &ArgSpec) -> Option<Vec<String>> {
    if matches.value_source(spec.dest()) != Some(ValueSource::CommandLine) {
        return None;
    }
    if spec.get_arity().is_switch() {
        return Some(Vec::new());
    }

    let tokens = matches
        .get_raw(spec.dest())
        .map(|raw| {
            raw.map(|token| token.to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    Some(tokens)
}

/// Parse `argv`, setting aside tokens clap does not recognize.
///
/// Each time clap rejects a token as an unknown argument, that token moves
/// to the returned extras and the parse is retried with the rest. Any other
/// clap error is returned as is.
pub fn parse_known<F>(build: F, argv: &[String]) -> Result<(ArgMatches, Vec<String>), clap::Error>
where
    F: Fn() -> Command,
{
    let mut remaining = argv.to_vec();
    let mut extras = Vec::new();

    loop {
        match build().try_get_matches_from(&remaining) {
            Ok(matches) => return Ok((matches, extras)),
            Err(err) if err.kind() == ErrorKind::UnknownArgument => {
                let Some(index) = offending_index(&err, &remaining) else {
                    return Err(err);
                };
                let token = remaining.remove(index);
                tracing::debug!(token = %token, "setting aside unrecognized argument");
                extras.push(token);
            }
            Err(err) => return Err(err),
        }
    }
}

/// Position in `argv` of the token an unknown-argument error refers to.
fn offending_index(err: &clap::Error, argv: &[String]) -> Option<usize> {
    let ContextValue::String(invalid) = err.get(ContextKind::InvalidArg)? else {
        return None;
    };

    if let Some(index) = argv.iter().position(|token| token == invalid) {
        return Some(index);
    }

    // `--name=value` is reported as `--name`
    let with_value = format!("{}=", invalid);
    if let Some(index) = argv.iter().position(|token| token.starts_with(&with_value)) {
        return Some(index);
    }

    // `-x` inside a cluster such as `-vx`
    let short = invalid.strip_prefix('-').filter(|s| s.chars().count() == 1)?;
    argv.iter()
        .position(|token| token.starts_with('-') && !token.starts_with("--") && token.contains(short))
}
