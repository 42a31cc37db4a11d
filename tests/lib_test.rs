//! Library integration tests.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use clap::error::ErrorKind;
use envargs::args::{ArgSpec, Arity, Conversion, ValueConverter, ValueKind};
use envargs::env::{split_words, EnvInput, MapEnv};
use envargs::resolve::{ErrorReporter, SilentReporter};
use envargs::{
    EnvArgParser, EnvArgsError, Namespace, ParserSettings, ValueError, ValueOrigin,
};
use serde_json::json;

fn parser(env: MapEnv) -> EnvArgParser {
    EnvArgParser::with_env(ParserSettings::new("test"), env).with_reporter(SilentReporter)
}

fn none() -> Vec<String> {
    Vec::new()
}

fn bar() -> ArgSpec {
    ArgSpec::option("bar")
        .arity(Arity::OneOrMore)
        .kind(ValueKind::Integer)
        .required(true)
        .default(22)
        .env("BAR")
        .help("Help message for bar.")
}

/// Counts invocations, then defers to the shared value path.
fn counting_parser(
    calls: Arc<AtomicUsize>,
) -> impl Fn(&EnvInput<'_>, &dyn ValueConverter, &mut Vec<String>) -> Result<Conversion, ValueError>
       + Send
       + Sync
       + 'static {
    move |input, values, _extras| {
        calls.fetch_add(1, Ordering::SeqCst);
        let tokens: Vec<String> = input.raw.split(',').map(str::to_string).collect();
        Ok(values.convert(input.spec, &tokens)?)
    }
}

#[derive(Clone, Default)]
struct Collecting(Rc<RefCell<Vec<String>>>);

impl ErrorReporter for Collecting {
    fn report(&self, error: &EnvArgsError) {
        self.0.borrow_mut().push(error.to_string());
    }
}

#[test]
fn precedence_command_line_environment_default() {
    let mut p = parser(MapEnv::from([("BAR", "5 6")]));
    p.add_argument(bar()).unwrap();
    let ns = p.parse_args(["--bar", "1"], None).unwrap();
    assert_eq!(ns.get("bar"), Some(&json!([1])));

    let ns = p.parse_args(none(), None).unwrap();
    assert_eq!(ns.get("bar"), Some(&json!([5, 6])));

    let mut p = parser(MapEnv::new());
    p.add_argument(bar().required(false)).unwrap();
    let ns = p.parse_args(none(), None).unwrap();
    assert_eq!(ns.get("bar"), Some(&json!(22)));
}

#[test]
fn existing_namespace_sits_between_environment_and_default() {
    let existing: Namespace = [("bar", json!([9]))].into_iter().collect();

    let mut p = parser(MapEnv::new());
    p.add_argument(bar().required(false)).unwrap();
    let r = p.parse_known_args(none(), Some(existing.clone())).unwrap();
    assert_eq!(r.get("bar"), Some(&json!([9])));
    assert_eq!(r.origin("bar"), Some(&ValueOrigin::Existing));

    let mut p = parser(MapEnv::from([("BAR", "3")]));
    p.add_argument(bar()).unwrap();
    let r = p.parse_known_args(none(), Some(existing)).unwrap();
    assert_eq!(r.get("bar"), Some(&json!([3])));
}

#[test]
fn tokenization_keeps_quoted_whitespace() {
    assert_eq!(
        split_words("1 2 3 '45  ' 6 7").unwrap(),
        ["1", "2", "3", "45  ", "6", "7"]
    );
    assert!(split_words("   ").unwrap().is_empty());
}

#[test]
fn exact_arity_fails_short_and_leaves_overflow() {
    let tokens: Vec<String> = ["a", "b"].iter().map(|s| s.to_string()).collect();
    assert!(Arity::Exact(3).match_tokens(&tokens).is_err());

    let tokens: Vec<String> = ["a", "b", "c", "d", "e"].iter().map(|s| s.to_string()).collect();
    let matched = Arity::Exact(3).match_tokens(&tokens).unwrap();
    assert_eq!(matched.consumed, ["a", "b", "c"]);
    assert_eq!(matched.leftover, ["d", "e"]);
}

#[test]
fn unbounded_arity_is_greedy() {
    let tokens: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
    let matched = Arity::OneOrMore.match_tokens(&tokens).unwrap();
    assert_eq!(matched.consumed.len(), 3);
    assert!(matched.leftover.is_empty());
    assert!(Arity::OneOrMore.match_tokens(&[]).is_err());
}

#[test]
fn required_is_relaxed_only_when_variable_is_set() {
    let mut p = parser(MapEnv::from([("BAR", "1")]));
    p.add_argument(bar()).unwrap();
    assert!(p.parse_args(none(), None).is_ok());

    let mut p = parser(MapEnv::new());
    p.add_argument(bar()).unwrap();
    match p.parse_args(none(), None) {
        Err(EnvArgsError::CommandLine(err)) => {
            assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument)
        }
        other => panic!("expected missing argument, got {other:?}"),
    }
}

#[test]
fn end_to_end_environment_list_with_positional() {
    let mut p = parser(MapEnv::from([("BAR", "1 2 3 '45  ' 6 7")]));
    p.add_argument(bar()).unwrap();
    p.add_argument(ArgSpec::positional("baz").kind(ValueKind::Integer))
        .unwrap();

    let r = p.parse_known_args(["123"], None).unwrap();
    assert_eq!(r.get("bar"), Some(&json!([1, 2, 3, 45, 6, 7])));
    assert_eq!(r.get("baz"), Some(&json!(123)));
    assert!(r.extras.is_empty());
    assert_eq!(
        r.origin("bar"),
        Some(&ValueOrigin::Environment { key: "BAR".into() })
    );
    assert_eq!(r.origin("baz"), Some(&ValueOrigin::CommandLine));
}

#[test]
fn overflow_from_environment_becomes_extras() {
    let mut p = parser(MapEnv::from([("BAR", "1 2 3")]));
    p.add_argument(
        ArgSpec::option("bar")
            .arity(Arity::Exact(2))
            .kind(ValueKind::Integer)
            .env("BAR"),
    )
    .unwrap();

    let r = p.parse_known_args(none(), None).unwrap();
    assert_eq!(r.get("bar"), Some(&json!([1, 2])));
    assert_eq!(r.extras, ["3"]);

    match p.parse_args(none(), None) {
        Err(EnvArgsError::UnrecognizedArguments { tokens }) => assert_eq!(tokens, ["3"]),
        other => panic!("expected unrecognized arguments, got {other:?}"),
    }
}

#[test]
fn command_line_and_environment_extras_are_combined() {
    let mut p = parser(MapEnv::from([("BAR", "1 2 3")]));
    p.add_argument(
        ArgSpec::option("bar")
            .arity(Arity::Exact(2))
            .env("BAR"),
    )
    .unwrap();

    let r = p.parse_known_args(["--zzz"], None).unwrap();
    assert_eq!(r.extras, ["--zzz", "3"]);
}

#[test]
fn intermixed_pass_runs_environment_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut p = parser(MapEnv::from([("TAGS", "a,b")]));
    let foo = p
        .add_argument(ArgSpec::option("foo").kind(ValueKind::Integer))
        .unwrap();
    let tags = p
        .add_argument(
            ArgSpec::option("tags")
                .arity(Arity::ZeroOrMore)
                .env("TAGS")
                .env_parser(counting_parser(calls.clone())),
        )
        .unwrap();
    let baz = p.add_argument(ArgSpec::positional("baz")).unwrap();

    let ns = p.parse_intermixed_args(["x", "--foo", "1"], None).unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(ns.get("foo"), Some(&json!(1)));
    assert_eq!(ns.get("baz"), Some(&json!("x")));
    assert_eq!(ns.get("tags"), Some(&json!(["a", "b"])));
    assert!(p.was_seen(foo));
    assert!(p.was_seen(baz));
    assert!(p.was_seen(tags));
}

#[test]
fn command_line_value_skips_custom_environment_parser() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut p = parser(MapEnv::from([("TAGS", "a,b")]));
    p.add_argument(
        ArgSpec::option("tags")
            .arity(Arity::ZeroOrMore)
            .env("TAGS")
            .env_parser(counting_parser(calls.clone())),
    )
    .unwrap();

    let ns = p.parse_args(["--tags", "c"], None).unwrap();
    assert_eq!(ns.get("tags"), Some(&json!(["c"])));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn custom_parser_bypassing_value_path_is_still_seen() {
    let mut p = parser(MapEnv::from([("MODE", "ignored")]));
    let mode = p
        .add_argument(ArgSpec::option("mode").env("MODE").env_parser(
            |_: &EnvInput<'_>,
             _: &dyn ValueConverter,
             _: &mut Vec<String>|
             -> Result<Conversion, ValueError> { Ok(Conversion::Value(json!("custom"))) },
        ))
        .unwrap();

    let ns = p.parse_args(none(), None).unwrap();
    assert_eq!(ns.get("mode"), Some(&json!("custom")));
    assert!(p.was_seen(mode));
}

#[test]
fn custom_parser_errors_identify_argument_and_key() {
    let mut p = parser(MapEnv::from([("MODE", "x")]));
    p.add_argument(ArgSpec::option("mode").env("MODE").env_parser(
        |input: &EnvInput<'_>,
         _: &dyn ValueConverter,
         _: &mut Vec<String>|
         -> Result<Conversion, ValueError> {
            Err(anyhow::anyhow!("cannot use {:?}", input.raw).into())
        },
    ))
    .unwrap();

    let err = p.parse_args(none(), None).unwrap_err();
    assert_eq!(
        err.to_string(),
        "argument 'mode' (from environment variable MODE): cannot use \"x\""
    );
}

#[test]
fn environment_errors_fail_fast() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut p = parser(MapEnv::from([("FIRST", "nope"), ("SECOND", "a")]));
    p.add_argument(ArgSpec::option("first").kind(ValueKind::Integer).env("FIRST"))
        .unwrap();
    p.add_argument(
        ArgSpec::option("second")
            .env("SECOND")
            .env_parser(counting_parser(calls.clone())),
    )
    .unwrap();

    let err = p.parse_args(none(), None).unwrap_err();
    match &err {
        EnvArgsError::Environment {
            argument,
            key,
            source: ValueError::Conversion(_),
        } => {
            assert_eq!(argument, "first");
            assert_eq!(key, "FIRST");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn malformed_quoting_is_an_environment_error() {
    let mut p = parser(MapEnv::from([("BAR", "'unterminated")]));
    p.add_argument(bar()).unwrap();
    let err = p.parse_args(none(), None).unwrap_err();
    assert!(matches!(
        err,
        EnvArgsError::Environment {
            source: ValueError::MalformedInput { .. },
            ..
        }
    ));
}

#[test]
fn empty_value_for_one_or_more_is_an_arity_error() {
    let mut p = parser(MapEnv::from([("BAR", "")]));
    p.add_argument(bar()).unwrap();
    let err = p.parse_args(none(), None).unwrap_err();
    assert!(matches!(
        err,
        EnvArgsError::Environment {
            source: ValueError::Arity(_),
            ..
        }
    ));
}

#[test]
fn empty_optional_value_keeps_default_or_uses_const() {
    let mut p = parser(MapEnv::from([("LEVEL", ""), ("COLOR", "")]));
    p.add_argument(
        ArgSpec::option("level")
            .arity(Arity::ZeroOrOne)
            .default("info")
            .env("LEVEL"),
    )
    .unwrap();
    p.add_argument(
        ArgSpec::option("color")
            .arity(Arity::ZeroOrOne)
            .const_value("always")
            .default("auto")
            .env("COLOR"),
    )
    .unwrap();

    let r = p.parse_known_args(none(), None).unwrap();
    assert_eq!(r.get("level"), Some(&json!("info")));
    assert_eq!(r.origin("level"), Some(&ValueOrigin::Default));
    assert_eq!(r.get("color"), Some(&json!("always")));
}

#[test]
fn switch_from_environment() {
    let mut p = parser(MapEnv::from([("VERBOSE", "")]));
    p.add_argument(ArgSpec::flag("verbose").short('v').env("VERBOSE"))
        .unwrap();
    p.add_argument(ArgSpec::flag("quiet")).unwrap();

    let ns = p.parse_args(none(), None).unwrap();
    assert_eq!(ns.get("verbose"), Some(&json!(true)));
    assert_eq!(ns.get("quiet"), Some(&json!(false)));
}

#[test]
fn choices_apply_to_environment_values() {
    let mut p = parser(MapEnv::from([("MODE", "medium")]));
    p.add_argument(ArgSpec::option("mode").choices(["fast", "slow"]).env("MODE"))
        .unwrap();
    let err = p.parse_args(none(), None).unwrap_err();
    assert_eq!(err.argument(), Some("mode"));
}

#[test]
fn command_line_conversion_errors_name_the_argument() {
    let mut p = parser(MapEnv::new());
    p.add_argument(ArgSpec::option("port").kind(ValueKind::Integer))
        .unwrap();
    let err = p.parse_args(["--port", "http"], None).unwrap_err();
    assert!(matches!(err, EnvArgsError::InvalidValue { .. }));
    assert_eq!(err.argument(), Some("port"));
}

#[test]
fn repeated_option_keeps_last_occurrence() {
    let mut p = parser(MapEnv::new());
    p.add_argument(ArgSpec::option("bar").arity(Arity::OneOrMore))
        .unwrap();
    let ns = p.parse_args(["--bar", "1", "--bar", "2"], None).unwrap();
    assert_eq!(ns.get("bar"), Some(&json!(["2"])));
}

#[test]
fn errors_are_reported_once_per_pass() {
    let reporter = Collecting::default();
    let mut p = EnvArgParser::with_env(
        ParserSettings::new("test"),
        MapEnv::from([("PORT", "http")]),
    )
    .with_reporter(reporter.clone());
    p.add_argument(ArgSpec::option("port").kind(ValueKind::Integer).env("PORT"))
        .unwrap();
    p.add_argument(ArgSpec::positional("file").arity(Arity::ZeroOrOne))
        .unwrap();

    assert!(p.parse_intermixed_known_args(["a.txt"], None).is_err());
    assert_eq!(reporter.0.borrow().len(), 1);
    assert!(reporter.0.borrow()[0].contains("PORT"));
}

#[test]
fn declaration_errors() {
    let mut p = parser(MapEnv::new());
    assert!(p
        .add_argument(ArgSpec::positional("files").env("FILES"))
        .is_err());
    assert!(p.add_argument(ArgSpec::option("bar").env("")).is_err());
    assert!(p
        .add_argument(ArgSpec::option("bar").env_parser(counting_parser(Arc::default())))
        .is_err());
    assert!(p.specs().is_empty());
}

#[test]
fn environment_bindings_are_introspectable() {
    let mut p = parser(MapEnv::from([("BAR", "1 2")]));
    let id = p.add_argument(bar()).unwrap();
    p.add_argument(ArgSpec::option("level").env("LEVEL"))
        .unwrap();

    let record = p.env_record(id).unwrap();
    assert_eq!(record.key(), "BAR");
    assert!(record.is_present());

    let bindings: Vec<(String, bool)> = p
        .env_records()
        .map(|(_, record)| (record.key().to_string(), record.is_present()))
        .collect();
    assert_eq!(
        bindings,
        [("BAR".to_string(), true), ("LEVEL".to_string(), false)]
    );
}

#[test]
fn help_mentions_environment_keys() {
    let mut p = parser(MapEnv::new());
    p.add_argument(bar()).unwrap();
    let help = p.command().render_help().to_string();
    assert!(help.contains("Help message for bar. (default: 22) (env_var: BAR)"));
}

#[test]
fn help_flag_surfaces_as_clap_error() {
    let mut p = parser(MapEnv::new());
    p.add_argument(bar().required(false)).unwrap();
    match p.parse_args(["--help"], None) {
        Err(EnvArgsError::CommandLine(err)) => assert_eq!(err.kind(), ErrorKind::DisplayHelp),
        other => panic!("expected help, got {other:?}"),
    }
}
