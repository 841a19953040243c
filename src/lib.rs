//! A command line argument parser whose grammar is the program's own usage text.
//!
//! You write a conventional help string — a `usage:` section enumerating invocation
//! forms, and an optional `options:` section describing flags and their defaults —
//! and [`parse`] turns an argv into a name→value dictionary by matching it against
//! that usage text, rather than against a grammar declared in code.
//!
//! ```
//! let doc = "\
//! Usage: my_program [-v] <input>
//!
//! Options:
//!   -v, --verbose  be noisy
//! ";
//! let argv = vec!["-v".to_string(), "file.txt".to_string()];
//! let outcome = argdoc::parse(doc, Some(&argv), false, None, false);
//! let args = outcome.args.unwrap();
//! assert_eq!(args.get("<input>"), Some(&argdoc::Value::Str(Some("file.txt".into()))));
//! assert_eq!(args.get("--verbose"), Some(&argdoc::Value::Bool(true)));
//! ```
//!
//! The engine is split into the stages described in `SPEC_FULL.md`: [`section`] lifts
//! the `usage:`/`options:` blocks out of free text, [`option_desc`] and [`usage_parser`]
//! turn them into a [`pattern::Pattern`] tree, [`argv`] turns a raw argv into a flat
//! list of tentative leaves, [`fixer`] fills in the `[options]` placeholder and finds
//! which leaves may repeat, and [`matcher`] does the actual backtracking match and
//! dictionary emission. This module only wires those stages together and handles the
//! `-h`/`--help`/`--version` interception described in §4.9.

mod argv;
mod error;
mod fixer;
mod matcher;
mod option_desc;
mod option_index;
mod pattern;
mod section;
mod token;
mod usage_parser;
mod usage_tokenizer;

use std::collections::HashMap;

use argv::Tentative;
use option_index::OptionIndex;
use pattern::OptionLeaf;

pub use error::{Error, ErrorKind};
pub use pattern::Value;

/// The result of a [`parse`] call, matching the three-part return contract in
/// `SPEC_FULL.md` §6.
#[derive(Debug)]
pub struct Outcome {
    /// The matched dictionary, present only on a successful match.
    pub args: Option<HashMap<String, Value>>,
    /// Text the caller should print: the help/version string on interception, or an
    /// error message followed by the usage section on a user error.
    pub output: String,
    /// Absent on success (including help/version interception).
    pub error: Option<ErrorKind>,
}

/// Parses `doc` into a grammar and matches `argv` against it.
///
/// `argv = None` reads the current process's own arguments (skipping `argv[0]`).
/// `help = true` makes a bare `-h`/`--help` occurrence short-circuit to `doc` as
/// `output`. `version`, if `Some` and non-empty, does the same for `--version`.
/// `options_first = true` stops option parsing at the first positional argument.
#[must_use]
pub fn parse(
    doc: &str,
    argv: Option<&[String]>,
    help: bool,
    version: Option<&str>,
    options_first: bool,
) -> Outcome {
    match run(doc, argv, help, version, options_first) {
        Ok(outcome) => outcome,
        Err(e) if e.kind() == ErrorKind::User => {
            let usage = usage_section(doc).unwrap_or_default();
            Outcome {
                args: None,
                output: format!("{e}\n{usage}"),
                error: Some(ErrorKind::User),
            }
        }
        Err(e) => Outcome {
            args: None,
            output: String::new(),
            error: Some(e.kind()),
        },
    }
}

/// Runs [`parse`], prints `output`, and exits: `0` on help/version interception, `1`
/// on a user error. Returns the dictionary otherwise. A non-core convenience, not part
/// of the pure matching engine.
#[must_use]
pub fn parse_or_exit(
    doc: &str,
    argv: Option<&[String]>,
    help: bool,
    version: Option<&str>,
    options_first: bool,
) -> HashMap<String, Value> {
    exit_on_non_success(parse(doc, argv, help, version, options_first))
}

/// Like [`parse_or_exit`], but panics immediately on a language error instead of
/// routing it through the normal error path — malformed usage text is a bug in the
/// program, not something worth handling gracefully at runtime.
#[must_use]
pub fn parse_or_exit_strict(
    doc: &str,
    argv: Option<&[String]>,
    help: bool,
    version: Option<&str>,
    options_first: bool,
) -> HashMap<String, Value> {
    let outcome = parse(doc, argv, help, version, options_first);
    if outcome.error == Some(ErrorKind::Language) {
        panic!("doc is not a valid usage description");
    }
    exit_on_non_success(outcome)
}

fn exit_on_non_success(outcome: Outcome) -> HashMap<String, Value> {
    match (outcome.args, outcome.error) {
        (Some(args), None) => args,
        (None, None) => {
            println!("{}", outcome.output);
            std::process::exit(0);
        }
        (_, Some(ErrorKind::User)) => {
            eprintln!("{}", outcome.output);
            std::process::exit(1);
        }
        _ => panic!("{}", outcome.output),
    }
}

fn run(
    doc: &str,
    argv: Option<&[String]>,
    help: bool,
    version: Option<&str>,
    options_first: bool,
) -> Result<Outcome, Error> {
    let usage = usage_section(doc)?;

    let mut options = OptionIndex::new();
    for leaf in option_desc::parse_option_descriptions(&options_sections(doc)) {
        options.push(leaf);
    }

    let formal = usage_parser::prepare_formal_usage(&usage)?;
    let tokens = usage_parser::tokenize_formal_usage(&formal)?;
    let mut pattern = usage_parser::parse_pattern(tokens, &mut options)?;

    // [options] is filled from the doc's own declared options before -h/--help and
    // --version are added below, so those auto-added options never leak into the
    // shortcut (and from there into the result dictionary).
    fixer::fill_options_shortcut(&mut pattern, &options);
    let repeated = fixer::compute_repeated_keys(&pattern);

    if help {
        ensure_help_option(&mut options);
    }
    let version = version.filter(|v| !v.is_empty());
    if version.is_some() {
        ensure_version_option(&mut options);
    }

    let owned_argv;
    let argv_slice: &[String] = match argv {
        Some(a) => a,
        None => {
            owned_argv = std::env::args().skip(1).collect::<Vec<_>>();
            &owned_argv
        }
    };
    let flat = argv::parse_argv(argv_slice, &mut options, options_first)?;

    if help && flat.iter().any(|t| is_opt(t, "-h") || is_opt(t, "--help")) {
        return Ok(Outcome {
            args: None,
            output: doc.trim().to_string(),
            error: None,
        });
    }
    if let Some(v) = version {
        if flat.iter().any(|t| is_opt(t, "--version")) {
            return Ok(Outcome {
                args: None,
                output: v.to_string(),
                error: None,
            });
        }
    }

    match matcher::match_pattern(&pattern, flat, &repeated) {
        Some(collected) => {
            let dict = matcher::build_dictionary(&pattern, &collected, &repeated);
            Ok(Outcome {
                args: Some(dict),
                output: String::new(),
                error: None,
            })
        }
        None => Err(Error::user(String::new())),
    }
}

fn is_opt(t: &Tentative, display: &str) -> bool {
    matches!(t, Tentative::Opt { display: d, .. } if d == display)
}

fn usage_section(doc: &str) -> Result<String, Error> {
    let mut sections = section::extract_sections(doc, "usage:");
    match sections.len() {
        1 => Ok(sections.remove(0)),
        0 => Err(Error::language("doc is missing a 'usage:' section")),
        _ => Err(Error::language("doc has more than one 'usage:' section")),
    }
}

fn options_sections(doc: &str) -> String {
    section::extract_sections(doc, "options:")
        .iter()
        .map(|s| strip_options_header(s))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Strips everything up to and including the first `:` of a section (docopt's
/// `s.partition(':')`), so an option declared inline on the `options:` header line
/// itself (e.g. `"Options: --count=N  [default: 0]"`) is not silently dropped.
fn strip_options_header(section: &str) -> String {
    match section.find(':') {
        Some(ix) => section[ix + 1..].to_string(),
        None => section.to_string(),
    }
}

fn ensure_help_option(options: &mut OptionIndex) {
    let has_long = options.find_by_long_exact("help").is_some();
    let has_short = options.find_by_short('h').len() == 1;
    if !has_long && !has_short {
        options.push(OptionLeaf {
            short: Some('h'),
            long: Some("help".to_string()),
            argcount: 0,
            default: None,
        });
    }
}

fn ensure_version_option(options: &mut OptionIndex) {
    if options.find_by_long_exact("version").is_none() {
        options.push(OptionLeaf {
            short: None,
            long: Some("version".to_string()),
            argcount: 0,
            default: None,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn simple_flags_match_and_fill_in_defaults() {
        let doc = "Usage: prog [-a] [-b]";
        let argv = words(&["-a"]);
        let outcome = parse(doc, Some(&argv), false, None, false);
        let args = outcome.args.unwrap();
        assert_eq!(args.get("-a"), Some(&Value::Bool(true)));
        assert_eq!(args.get("-b"), Some(&Value::Bool(false)));
    }

    #[test]
    fn repeated_short_flag_in_usage_ellipsis_counts_occurrences() {
        let doc = "Usage: prog -v...\n\nOptions: -v  verbose";
        let argv = words(&["-vvv"]);
        let outcome = parse(doc, Some(&argv), false, None, false);
        assert_eq!(outcome.args.unwrap().get("-v"), Some(&Value::Count(3)));
    }

    #[test]
    fn valued_option_falls_back_to_its_declared_default() {
        let doc = "Usage: prog [--count=N]\n\nOptions: --count=N  [default: 0]";
        let outcome = parse(doc, Some(&[]), false, None, false);
        assert_eq!(
            outcome.args.unwrap().get("--count"),
            Some(&Value::Str(Some("0".into())))
        );
    }

    #[test]
    fn alternation_between_commands_picks_the_matching_branch() {
        let doc = "Usage: prog (cmd1 | cmd2) <arg>";
        let argv = words(&["cmd2", "x"]);
        let args = parse(doc, Some(&argv), false, None, false).args.unwrap();
        assert_eq!(args.get("cmd1"), Some(&Value::Bool(false)));
        assert_eq!(args.get("cmd2"), Some(&Value::Bool(true)));
        assert_eq!(args.get("<arg>"), Some(&Value::Str(Some("x".into()))));
    }

    #[test]
    fn exact_long_option_match_wins_over_an_ambiguous_prefix() {
        let doc = "Usage: prog [--foo=X] [--foobar=Y]";
        let argv = words(&["--foo", "v"]);
        let args = parse(doc, Some(&argv), false, None, false).args.unwrap();
        assert_eq!(args.get("--foo"), Some(&Value::Str(Some("v".into()))));
        assert_eq!(args.get("--foobar"), Some(&Value::Str(None)));
    }

    #[test]
    fn options_shortcut_fills_in_undeclared_options_and_repeats_an_argument() {
        let doc = "Usage: prog [options] <f>...\n\nOptions: -q  quiet\n -v  verbose";
        let argv = words(&["-q", "a", "b"]);
        let args = parse(doc, Some(&argv), false, None, false).args.unwrap();
        assert_eq!(args.get("-q"), Some(&Value::Bool(true)));
        assert_eq!(args.get("-v"), Some(&Value::Bool(false)));
        assert_eq!(
            args.get("<f>"),
            Some(&Value::List(vec!["a".into(), "b".into()]))
        );
    }

    #[test]
    fn help_flag_short_circuits_to_the_doc_text() {
        let doc = "Usage: prog [-a]\n\nOptions:\n  -a  a flag\n  -h, --help  show this";
        let argv = words(&["--help"]);
        let outcome = parse(doc, Some(&argv), true, None, false);
        assert!(outcome.args.is_none());
        assert!(outcome.error.is_none());
        assert_eq!(outcome.output, doc.trim());
    }

    #[test]
    fn version_flag_short_circuits_to_the_version_string() {
        let doc = "Usage: prog [--version]";
        let argv = words(&["--version"]);
        let outcome = parse(doc, Some(&argv), false, Some("1.2.3"), false);
        assert!(outcome.args.is_none());
        assert_eq!(outcome.output, "1.2.3");
    }

    #[test]
    fn help_and_version_options_never_leak_into_the_options_shortcut() {
        let doc = "Usage: prog [options] <f>\n\nOptions: -q  quiet";
        let argv = words(&["-q", "a"]);
        let args = parse(doc, Some(&argv), true, Some("1.0"), false)
            .args
            .unwrap();
        assert_eq!(args.len(), 2);
        assert!(args.get("--help").is_none());
        assert!(args.get("--version").is_none());
    }

    #[test]
    fn empty_version_string_does_not_activate_version_interception() {
        let doc = "Usage: prog [--version]";
        let argv = words(&["--version"]);
        let outcome = parse(doc, Some(&argv), false, Some(""), false);
        // An empty version string is treated as "no version": `--version` is matched
        // as an ordinary declared flag instead of being intercepted.
        assert!(outcome.error.is_none());
        let args = outcome.args.unwrap();
        assert_eq!(args.get("--version"), Some(&Value::Bool(true)));
    }

    #[test]
    fn option_requiring_a_value_without_one_is_a_user_error() {
        let doc = "Usage: prog --foo=X";
        let argv = words(&["--foo"]);
        let outcome = parse(doc, Some(&argv), false, None, false);
        assert_eq!(outcome.error, Some(ErrorKind::User));
        assert!(outcome.output.starts_with("--foo requires argument"));
        assert!(outcome.output.contains("Usage: prog --foo=X"));
    }

    #[test]
    fn doc_without_a_usage_header_is_a_language_error() {
        let doc = "this help text has no usage section";
        let outcome = parse(doc, Some(&[]), false, None, false);
        assert_eq!(outcome.error, Some(ErrorKind::Language));
        assert_eq!(outcome.output, "");
    }

    #[test]
    fn unmatched_argv_is_a_user_error_with_the_usage_section_as_output() {
        let doc = "Usage: prog go";
        let argv = words(&["stop"]);
        let outcome = parse(doc, Some(&argv), false, None, false);
        assert_eq!(outcome.error, Some(ErrorKind::User));
        assert!(outcome.output.ends_with("Usage: prog go"));
    }

    #[test]
    fn options_first_stops_option_parsing_at_the_first_positional() {
        let doc = "Usage: prog <cmd> <rest>...";
        let argv = words(&["run", "--verbose", "-x"]);
        let args = parse(doc, Some(&argv), false, None, true).args.unwrap();
        assert_eq!(args.get("<cmd>"), Some(&Value::Str(Some("run".into()))));
        assert_eq!(
            args.get("<rest>"),
            Some(&Value::List(vec!["--verbose".into(), "-x".into()]))
        );
    }
}
