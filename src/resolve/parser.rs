//! The precedence resolver.
//!
//! [`EnvArgParser`] owns the declared arguments and their environment
//! bindings. A resolution pass runs clap over the command line, then applies
//! environment values to every bound argument the command line did not
//! supply. Precedence, highest first: command line, environment, the
//! caller's existing namespace, static defaults.

use std::fmt;

use clap::Command;

use crate::args::{ArgId, ArgSpec, Conversion, ValueConverter};
use crate::env::{EnvInput, EnvRecord, EnvRegistry, EnvSource, ProcessEnv};
use crate::error::{DeclarationError, EnvArgsError, Result};
use crate::help;

use super::command_line::{self, Scope};
use super::namespace::{Namespace, Resolution, ValueOrigin};
use super::report::{ErrorReporter, TracingReporter};
use super::seen::{MarkSeen, PassGuard, SeenTracker};

/// Parser-wide settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserSettings {
    /// Program name shown in usage.
    pub prog: String,
    /// Description shown in help.
    pub about: Option<String>,
    /// Whether clap adds `-h/--help`.
    pub add_help: bool,
    /// Whether help shows `(default: X)`.
    pub show_defaults: bool,
}

impl ParserSettings {
    pub fn new(prog: impl Into<String>) -> Self {
        Self {
            prog: prog.into(),
            ..Self::default()
        }
    }
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            prog: env!("CARGO_PKG_NAME").to_string(),
            about: None,
            add_help: true,
            show_defaults: true,
        }
    }
}

/// Argument parser whose arguments can also be satisfied from environment
/// variables.
///
/// # Example
///
/// ```
/// use envargs::args::{ArgSpec, Arity, ValueKind};
/// use envargs::env::MapEnv;
/// use envargs::{EnvArgParser, ParserSettings};
/// use serde_json::json;
///
/// let env = MapEnv::from([("BAR", "1 2 3 '45  ' 6 7")]);
/// let mut parser = EnvArgParser::with_env(ParserSettings::new("test"), env);
/// parser
///     .add_argument(
///         ArgSpec::option("bar")
///             .arity(Arity::OneOrMore)
///             .kind(ValueKind::Integer)
///             .required(true)
///             .default(22)
///             .env("BAR"),
///     )
///     .unwrap();
/// parser
///     .add_argument(ArgSpec::positional("baz").kind(ValueKind::Integer))
///     .unwrap();
///
/// let ns = parser.parse_args(["123"], None).unwrap();
/// assert_eq!(ns.get("bar"), Some(&json!([1, 2, 3, 45, 6, 7])));
/// assert_eq!(ns.get("baz"), Some(&json!(123)));
/// ```
pub struct EnvArgParser {
    settings: ParserSettings,
    specs: Vec<ArgSpec>,
    registry: EnvRegistry,
    env: Box<dyn EnvSource>,
    reporter: Box<dyn ErrorReporter>,
    seen: SeenTracker,
}

impl EnvArgParser {
    /// Create a parser reading the process environment.
    pub fn new(settings: ParserSettings) -> Self {
        Self::with_env(settings, ProcessEnv)
    }

    /// Create a parser reading variables from `env`.
    pub fn with_env(settings: ParserSettings, env: impl EnvSource + 'static) -> Self {
        Self {
            settings,
            specs: Vec::new(),
            registry: EnvRegistry::new(),
            env: Box::new(env),
            reporter: Box::new(TracingReporter),
            seen: SeenTracker::new(),
        }
    }

    /// Replace the error reporter.
    pub fn with_reporter(mut self, reporter: impl ErrorReporter + 'static) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    pub fn settings(&self) -> &ParserSettings {
        &self.settings
    }

    /// Declare an argument.
    ///
    /// If the argument names an environment key, the variable is looked up
    /// now and the snapshot is kept for every later pass.
    ///
    /// # Errors
    ///
    /// Returns [`DeclarationError`] when the name is empty or taken, the
    /// arity is inconsistent, an option has no flag or reuses one, a
    /// positional takes no values, names an environment key or cannot be
    /// matched after the positionals already declared, the environment key
    /// is blank, or a custom environment parser is given without a key.
    pub fn add_argument(&mut self, mut spec: ArgSpec) -> std::result::Result<ArgId, DeclarationError> {
        self.validate(&spec)?;

        let id = ArgId(self.specs.len());
        spec.assign_id(id);

        if let Some(key) = spec.env_key() {
            let value = self.env.lookup(key);
            tracing::debug!(
                argument = spec.dest(),
                key,
                present = value.is_some(),
                "captured environment binding"
            );
            if value.is_some() && spec.is_required() {
                tracing::debug!(
                    argument = spec.dest(),
                    key,
                    "not required on the command line"
                );
            }
            let parser = spec.custom_env_parser().cloned();
            self.registry
                .insert(EnvRecord::capture(id, key, value, parser));
        }

        self.specs.push(spec);
        Ok(id)
    }

    fn validate(&self, spec: &ArgSpec) -> std::result::Result<(), DeclarationError> {
        let reject = |reason: &str| Err(DeclarationError::new(spec.dest(), reason));

        if spec.dest().trim().is_empty() {
            return reject("argument name must not be empty");
        }
        if self.find(spec.dest()).is_some() {
            return reject("an argument with this name is already declared");
        }
        if let Err(reason) = spec.get_arity().validate() {
            return reject(&reason);
        }

        if spec.is_positional() {
            if spec.get_arity().is_switch() {
                return reject("positional arguments must take at least one value");
            }
            if let Err(reason) = self.check_positional_layout(spec) {
                return reject(&reason);
            }
        } else if spec.get_long().is_none() && spec.get_short().is_none() {
            return reject("options need a long or short flag");
        } else if let Err(reason) = self.check_flags(spec) {
            return reject(&reason);
        }

        match spec.env_key() {
            Some(key) if key.trim().is_empty() => reject("environment key must not be empty"),
            Some(_) if spec.is_positional() => {
                reject("positional arguments may not specify an environment key")
            }
            None if spec.custom_env_parser().is_some() => {
                reject("a custom environment parser requires an environment key")
            }
            _ => Ok(()),
        }
    }

    /// Long and short flags must be unique, `-h`/`--help` included when
    /// clap adds them.
    fn check_flags(&self, spec: &ArgSpec) -> std::result::Result<(), String> {
        let help = self.settings.add_help;

        if let Some(long) = spec.get_long() {
            let taken = (help && long == "help")
                || self.specs.iter().any(|other| {
                    !other.is_positional() && other.get_long() == Some(long)
                });
            if taken {
                return Err(format!("conflicting option string: --{}", long));
            }
        }
        if let Some(short) = spec.get_short() {
            let taken = (help && short == 'h')
                || self.specs.iter().any(|other| {
                    !other.is_positional() && other.get_short() == Some(short)
                });
            if taken {
                return Err(format!("conflicting option string: -{}", short));
            }
        }
        Ok(())
    }

    /// Positionals are matched in declaration order, with `spec` appended
    /// last:
    /// - a required positional may not follow an optional one
    /// - a positional taking several values must be last, or second to last
    ///   and followed by a required one
    /// - at most one positional takes an open-ended number of values
    fn check_positional_layout(&self, spec: &ArgSpec) -> std::result::Result<(), String> {
        let earlier: Vec<&ArgSpec> = self.specs.iter().filter(|s| s.is_positional()).collect();

        if spec.is_required() {
            if let Some(optional) = earlier.iter().find(|s| !s.is_required()) {
                return Err(format!(
                    "a required positional may not follow optional positional '{}'",
                    optional.dest()
                ));
            }
        }

        let takes_several = |s: &ArgSpec| s.get_arity().max() != Some(1);
        if let Some((last, before)) = earlier.split_last() {
            if let Some(multi) = before.iter().find(|s| takes_several(s)) {
                return Err(format!(
                    "positional '{}' takes several values and must come last",
                    multi.dest()
                ));
            }
            if takes_several(last) && !spec.is_required() {
                return Err(format!(
                    "a positional following '{}' must be required",
                    last.dest()
                ));
            }
        }

        let open_ended = earlier
            .iter()
            .copied()
            .chain(std::iter::once(spec))
            .filter(|s| s.get_arity().max().is_none())
            .count();
        if open_ended > 1 {
            return Err("only one positional may take an open-ended number of values".to_string());
        }
        Ok(())
    }

    /// Identity of the argument stored under `dest`.
    pub fn find(&self, dest: &str) -> Option<ArgId> {
        self.specs
            .iter()
            .position(|spec| spec.dest() == dest)
            .map(ArgId)
    }

    pub fn spec(&self, id: ArgId) -> Option<&ArgSpec> {
        self.specs.get(id.index())
    }

    /// All declared arguments in declaration order.
    pub fn specs(&self) -> &[ArgSpec] {
        &self.specs
    }

    /// Environment binding of `id`, if it has one.
    pub fn env_record(&self, id: ArgId) -> Option<&EnvRecord> {
        self.registry.get(id)
    }

    /// Every environment binding with its argument, in declaration order.
    pub fn env_records(&self) -> impl Iterator<Item = (&ArgSpec, &EnvRecord)> {
        self.registry
            .iter()
            .map(|record| (&self.specs[record.arg().index()], record))
    }

    /// Help for `id` with default and environment annotations.
    pub fn help_text(&self, id: ArgId) -> Option<String> {
        let spec = self.spec(id)?;
        help::annotate(spec, self.registry.get(id), self.settings.show_defaults)
    }

    /// Whether `id` was supplied during the most recent pass.
    pub fn was_seen(&self, id: ArgId) -> bool {
        self.seen.was_seen(id)
    }

    /// The clap command for every declared argument, for help rendering and
    /// completion generation.
    pub fn command(&self) -> Command {
        self.build_command(Scope::All)
    }

    fn build_command(&self, scope: Scope) -> Command {
        let mut cmd = Command::new(self.settings.prog.clone()).args_override_self(true);
        if let Some(about) = &self.settings.about {
            cmd = cmd.about(about.clone());
        }
        if !self.settings.add_help {
            cmd = cmd.disable_help_flag(true);
        }

        for (index, spec) in self.specs.iter().enumerate() {
            if !scope.includes(spec) {
                continue;
            }
            let id = ArgId(index);
            let required = spec.is_required() && !self.registry.relaxes_required(id);
            cmd = cmd.arg(command_line::to_clap_arg(
                spec,
                required,
                self.help_text(id),
            ));
        }

        cmd
    }

    /// Resolve `argv` (without the program name).
    ///
    /// Unrecognized tokens, from the command line or from environment
    /// values too long for their argument, are returned in
    /// [`Resolution::extras`] rather than failing the pass.
    pub fn parse_known_args<I, S>(&self, argv: I, existing: Option<Namespace>) -> Result<Resolution>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv: Vec<String> = argv.into_iter().map(Into::into).collect();
        self.pass(&argv, self.seed(existing), Scope::All)
    }

    /// Like [`parse_known_args`](Self::parse_known_args), failing with
    /// [`EnvArgsError::UnrecognizedArguments`] if any token is left over.
    pub fn parse_args<I, S>(&self, argv: I, existing: Option<Namespace>) -> Result<Namespace>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let resolution = self.parse_known_args(argv, existing)?;
        self.reject_extras(resolution)
    }

    /// Resolve `argv` allowing options and positionals to interleave.
    ///
    /// Runs two nested parses sharing this pass: options first, then
    /// positionals over whatever the first parse left. Environment values
    /// are applied once, after both.
    pub fn parse_intermixed_known_args<I, S>(
        &self,
        argv: I,
        existing: Option<Namespace>,
    ) -> Result<Resolution>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv: Vec<String> = argv.into_iter().map(Into::into).collect();
        let pass = self.seen.enter();
        let result = self.intermixed(&argv, existing, &pass);
        self.finish(&pass, result)
    }

    /// Like [`parse_intermixed_known_args`](Self::parse_intermixed_known_args),
    /// failing if any token is left over.
    pub fn parse_intermixed_args<I, S>(&self, argv: I, existing: Option<Namespace>) -> Result<Namespace>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let resolution = self.parse_intermixed_known_args(argv, existing)?;
        self.reject_extras(resolution)
    }

    fn intermixed(
        &self,
        argv: &[String],
        existing: Option<Namespace>,
        pass: &PassGuard<'_>,
    ) -> Result<Resolution> {
        let Resolution {
            namespace,
            extras,
            origins,
        } = self.pass(argv, self.seed(existing), Scope::Options)?;

        let carried = Resolution {
            namespace,
            extras: Vec::new(),
            origins,
        };
        let mut resolution = self.pass(&extras, carried, Scope::Positionals)?;

        if pass.is_outermost() {
            self.apply_environment(&mut resolution)?;
        }
        Ok(resolution)
    }

    fn pass(&self, argv: &[String], mut resolution: Resolution, scope: Scope) -> Result<Resolution> {
        let pass = self.seen.enter();
        let outcome = self
            .parse_command_line(argv, scope, &mut resolution)
            .and_then(|()| {
                if pass.is_outermost() {
                    self.apply_environment(&mut resolution)
                } else {
                    Ok(())
                }
            });
        self.finish(&pass, outcome.map(|()| resolution))
    }

    /// Report a failure once, from the entry point that owns the pass.
    fn finish<T>(&self, pass: &PassGuard<'_>, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            if pass.is_outermost() {
                self.reporter.report(err);
            }
        }
        result
    }

    fn reject_extras(&self, resolution: Resolution) -> Result<Namespace> {
        if resolution.extras.is_empty() {
            return Ok(resolution.namespace);
        }
        let err = EnvArgsError::UnrecognizedArguments {
            tokens: resolution.extras,
        };
        self.reporter.report(&err);
        Err(err)
    }

    /// Existing namespace entries, then defaults for everything else.
    fn seed(&self, existing: Option<Namespace>) -> Resolution {
        let mut resolution = Resolution::default();
        for (name, value) in existing.unwrap_or_default() {
            resolution.assign(&name, value, ValueOrigin::Existing);
        }
        for spec in &self.specs {
            if resolution.namespace.contains(spec.dest()) {
                continue;
            }
            if let Some(default) = spec.default_value() {
                resolution.assign(spec.dest(), default.clone(), ValueOrigin::Default);
            }
        }
        resolution
    }

    fn parse_command_line(
        &self,
        argv: &[String],
        scope: Scope,
        resolution: &mut Resolution,
    ) -> Result<()> {
        let (matches, extras) = command_line::parse_known(
            || self.build_command(scope).no_binary_name(true),
            argv,
        )?;
        resolution.extras.extend(extras);

        let values = MarkSeen::new(&self.seen);
        for spec in self.specs.iter().filter(|spec| scope.includes(spec)) {
            let Some(tokens) = command_line::consumed_tokens(&matches, spec) else {
                continue;
            };
            let conversion =
                values
                    .convert(spec, &tokens)
                    .map_err(|source| EnvArgsError::InvalidValue {
                        argument: spec.dest().to_string(),
                        source: source.into(),
                    })?;
            if let Conversion::Value(value) = conversion {
                resolution.assign(spec.dest(), value, ValueOrigin::CommandLine);
            }
        }
        Ok(())
    }

    /// Apply environment values to bound arguments not yet seen.
    ///
    /// Fails fast: the first bad value aborts the remaining bindings. No
    /// mutual-exclusion check is made against command-line values.
    fn apply_environment(&self, resolution: &mut Resolution) -> Result<()> {
        let values = MarkSeen::new(&self.seen);

        for record in self.registry.iter() {
            if !record.is_present() || self.seen.was_seen(record.arg()) {
                continue;
            }

            let spec = &self.specs[record.arg().index()];
            let input = EnvInput {
                spec,
                key: record.key(),
                raw: record.raw(),
            };
            let conversion = record
                .parser()
                .parse(&input, &values, &mut resolution.extras)
                .map_err(|source| EnvArgsError::Environment {
                    argument: spec.dest().to_string(),
                    key: record.key().to_string(),
                    source,
                })?;

            // custom parsers are free to bypass `values`
            self.seen.mark_seen(record.arg());

            match conversion {
                Conversion::Value(value) => {
                    tracing::debug!(
                        argument = spec.dest(),
                        key = record.key(),
                        "applied environment value"
                    );
                    resolution.assign(
                        spec.dest(),
                        value,
                        ValueOrigin::Environment {
                            key: record.key().to_string(),
                        },
                    );
                }
                Conversion::Suppressed => {
                    tracing::debug!(
                        argument = spec.dest(),
                        key = record.key(),
                        "environment value suppressed"
                    );
                }
            }
        }
        Ok(())
    }
}

impl fmt::Debug for EnvArgParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvArgParser")
            .field("settings", &self.settings)
            .field("specs", &self.specs)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
