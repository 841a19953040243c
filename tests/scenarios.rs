//! Black-box end-to-end scenarios against the public [`argdoc::parse`] entry point —
//! one test per scenario in `SPEC_FULL.md` §8, plus the two named error scenarios.

use argdoc::{ErrorKind, Value};
use pretty_assertions::assert_eq;

fn words(xs: &[&str]) -> Vec<String> {
    xs.iter().map(|s| s.to_string()).collect()
}

#[test]
fn scenario_1_two_independent_flags() {
    let doc = "Usage: prog [-a] [-b]";
    let argv = words(&["-a"]);
    let args = argdoc::parse(doc, Some(&argv), false, None, false).args.unwrap();
    assert_eq!(args.get("-a"), Some(&Value::Bool(true)));
    assert_eq!(args.get("-b"), Some(&Value::Bool(false)));
    assert_eq!(args.len(), 2);
}

#[test]
fn scenario_2_repeated_flag_counts_its_occurrences() {
    let doc = "Usage: prog -v...\n\nOptions: -v  verbose";
    let argv = words(&["-vvv"]);
    let args = argdoc::parse(doc, Some(&argv), false, None, false).args.unwrap();
    assert_eq!(args.get("-v"), Some(&Value::Count(3)));
}

#[test]
fn scenario_3_declared_default_surfaces_when_unmatched() {
    let doc = "Usage: prog [--count=N]\n\nOptions: --count=N  [default: 0]";
    let args = argdoc::parse(doc, Some(&[]), false, None, false).args.unwrap();
    assert_eq!(args.get("--count"), Some(&Value::Str(Some("0".into()))));
}

#[test]
fn scenario_4_either_of_commands_with_a_trailing_argument() {
    let doc = "Usage: prog (cmd1 | cmd2) <arg>";
    let argv = words(&["cmd2", "x"]);
    let args = argdoc::parse(doc, Some(&argv), false, None, false).args.unwrap();
    assert_eq!(args.get("cmd1"), Some(&Value::Bool(false)));
    assert_eq!(args.get("cmd2"), Some(&Value::Bool(true)));
    assert_eq!(args.get("<arg>"), Some(&Value::Str(Some("x".into()))));
}

#[test]
fn scenario_5_exact_long_match_beats_an_ambiguous_prefix() {
    let doc = "Usage: prog [--foo=X] [--foobar=Y]";
    let argv = words(&["--foo", "v"]);
    let args = argdoc::parse(doc, Some(&argv), false, None, false).args.unwrap();
    assert_eq!(args.get("--foo"), Some(&Value::Str(Some("v".into()))));
    assert_eq!(args.get("--foobar"), Some(&Value::Str(None)));
}

#[test]
fn scenario_6_options_shortcut_plus_repeated_trailing_argument() {
    let doc = "Usage: prog [options] <f>...\n\nOptions: -q  quiet\n -v  verbose";
    let argv = words(&["-q", "a", "b"]);
    let args = argdoc::parse(doc, Some(&argv), false, None, false).args.unwrap();
    assert_eq!(args.get("-q"), Some(&Value::Bool(true)));
    assert_eq!(args.get("-v"), Some(&Value::Bool(false)));
    assert_eq!(
        args.get("<f>"),
        Some(&Value::List(vec!["a".into(), "b".into()]))
    );
}

#[test]
fn error_scenario_option_rejects_an_attached_value_it_does_not_take() {
    let doc = "Usage: prog --foo";
    let argv = words(&["--foo=x"]);
    let outcome = argdoc::parse(doc, Some(&argv), false, None, false);
    assert_eq!(outcome.error, Some(ErrorKind::User));
    assert!(outcome.output.starts_with("--foo must not have an argument"));
}

#[test]
fn error_scenario_doc_without_a_usage_header() {
    let doc = "This help text never mentions the word it needs to.";
    let outcome = argdoc::parse(doc, Some(&[]), false, None, false);
    assert_eq!(outcome.error, Some(ErrorKind::Language));
    assert_eq!(outcome.output, "");
    assert!(outcome.args.is_none());
}

#[test]
fn invariant_dictionary_has_one_entry_per_declared_leaf() {
    let doc = "Usage: prog go (<a> | <b>) [-x]\n\nOptions: -x  a flag";
    let argv = words(&["go", "1"]);
    let args = argdoc::parse(doc, Some(&argv), false, None, false).args.unwrap();
    // go, <a>, <b>, -x
    assert_eq!(args.len(), 4);
}

#[test]
fn invariant_prefix_matching_is_monotone() {
    let doc = "Usage: prog [--foobar=Y]";
    let a = words(&["--foo", "1"]);
    let b = words(&["--foobar", "1"]);
    let args_a = argdoc::parse(doc, Some(&a), false, None, false).args.unwrap();
    let args_b = argdoc::parse(doc, Some(&b), false, None, false).args.unwrap();
    assert_eq!(args_a.get("--foobar"), Some(&Value::Str(Some("1".into()))));
    assert_eq!(args_b.get("--foobar"), Some(&Value::Str(Some("1".into()))));
}

#[test]
fn invariant_options_first_passes_everything_after_as_positionals() {
    let doc = "Usage: prog <cmd> <rest>...";
    let argv = words(&["build", "--release", "-O2"]);
    let args = argdoc::parse(doc, Some(&argv), false, None, true).args.unwrap();
    assert_eq!(args.get("<cmd>"), Some(&Value::Str(Some("build".into()))));
    assert_eq!(
        args.get("<rest>"),
        Some(&Value::List(vec!["--release".into(), "-O2".into()]))
    );
}

#[test]
fn help_interception_returns_the_trimmed_doc_with_no_dictionary() {
    let doc = "Usage: prog [-a]\n\nOptions:\n  -a  a flag\n  -h, --help  show this help";
    let argv = words(&["-h"]);
    let outcome = argdoc::parse(doc, Some(&argv), true, None, false);
    assert!(outcome.args.is_none());
    assert!(outcome.error.is_none());
    assert_eq!(outcome.output, doc.trim());
}

#[test]
fn version_interception_returns_the_version_string_with_no_dictionary() {
    let doc = "Usage: prog [--version]";
    let argv = words(&["--version"]);
    let outcome = argdoc::parse(doc, Some(&argv), false, Some("9.9.9"), false);
    assert!(outcome.args.is_none());
    assert_eq!(outcome.output, "9.9.9");
}
