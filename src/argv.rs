//! Turns a raw argv into a flat list of tentative leaves (§4.5). Every failure here is
//! a [`crate::ErrorKind::User`] error: the grammar is taken as given, the argv is not.

use crate::error::Error;
use crate::option_index::OptionIndex;
use crate::pattern::OptionLeaf;

/// One matched-or-matchable element of argv, resolved against the option index.
#[derive(Debug, Clone)]
pub(crate) enum Tentative {
    /// A bare word: a candidate value for an `Argument` leaf, or a candidate name for
    /// a `Command` leaf.
    Positional(String),
    /// A recognized (or newly synthesized) option occurrence.
    Opt {
        key: String,
        display: String,
        value: OptValue,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum OptValue {
    Flag,
    Arg(String),
}

pub(crate) fn parse_argv(
    argv: &[String],
    options: &mut OptionIndex,
    options_first: bool,
) -> Result<Vec<Tentative>, Error> {
    let mut out = Vec::new();
    let mut i = 0;
    let mut positional_seen = false;
    let mut double_dash_seen = false;

    while i < argv.len() {
        if options_first && positional_seen {
            out.push(Tentative::Positional(argv[i].clone()));
            i += 1;
            continue;
        }

        let tok = &argv[i];
        if double_dash_seen {
            out.push(Tentative::Positional(tok.clone()));
            i += 1;
        } else if tok == "--" {
            double_dash_seen = true;
            i += 1;
        } else if tok.starts_with("--") {
            i = parse_long(argv, i, options, &mut out)?;
        } else if tok.starts_with('-') && tok.len() > 1 {
            i = parse_shorts(argv, i, options, &mut out)?;
        } else {
            out.push(Tentative::Positional(tok.clone()));
            positional_seen = true;
            i += 1;
        }
    }
    Ok(out)
}

fn parse_long(
    argv: &[String],
    i: usize,
    options: &mut OptionIndex,
    out: &mut Vec<Tentative>,
) -> Result<usize, Error> {
    let tok = &argv[i];
    let (name, inline_value) = match tok.split_once('=') {
        Some((n, v)) => (n, Some(v.to_string())),
        None => (tok.as_str(), None),
    };
    let long = name.trim_start_matches("--").to_string();

    let ix = match options.find_by_long_exact(&long) {
        Some(ix) => ix,
        None => match options.find_by_long_prefix(&long).as_slice() {
            [only] => *only,
            [] => options.push(OptionLeaf {
                short: None,
                long: Some(long.clone()),
                argcount: u8::from(inline_value.is_some()),
                default: None,
            }),
            many => {
                let names: Vec<String> =
                    many.iter().map(|&ix| options.get(ix).display_name()).collect();
                return Err(Error::user(format!(
                    "--{long} is not a unique prefix: {}?",
                    names.join(", ")
                )));
            }
        },
    };

    let leaf = options.get(ix).clone();
    let display = leaf.display_name();
    let key = leaf.key();

    if leaf.argcount == 0 {
        if inline_value.is_some() {
            return Err(Error::user(format!("{display} must not have an argument")));
        }
        out.push(Tentative::Opt {
            key,
            display,
            value: OptValue::Flag,
        });
        Ok(i + 1)
    } else if let Some(v) = inline_value {
        out.push(Tentative::Opt {
            key,
            display,
            value: OptValue::Arg(v),
        });
        Ok(i + 1)
    } else {
        match argv.get(i + 1) {
            Some(next) if next != "--" => {
                out.push(Tentative::Opt {
                    key,
                    display,
                    value: OptValue::Arg(next.clone()),
                });
                Ok(i + 2)
            }
            _ => Err(Error::user(format!("{display} requires argument"))),
        }
    }
}

fn parse_shorts(
    argv: &[String],
    i: usize,
    options: &mut OptionIndex,
    out: &mut Vec<Tentative>,
) -> Result<usize, Error> {
    let chars: Vec<char> = argv[i][1..].chars().collect();
    let mut pos = 0;
    let mut next_index = i + 1;

    while pos < chars.len() {
        let c = chars[pos];
        pos += 1;
        let ix = options.resolve_short(c, false)?;
        let leaf = options.get(ix).clone();
        let display = leaf.display_name();
        let key = leaf.key();

        if leaf.argcount == 1 {
            let mut remainder: String = chars[pos..].iter().collect();
            if let Some(stripped) = remainder.strip_prefix('=') {
                remainder = stripped.to_string();
            }
            if !remainder.is_empty() {
                out.push(Tentative::Opt {
                    key,
                    display,
                    value: OptValue::Arg(remainder),
                });
                pos = chars.len();
            } else {
                match argv.get(next_index) {
                    Some(next) if next != "--" => {
                        out.push(Tentative::Opt {
                            key,
                            display,
                            value: OptValue::Arg(next.clone()),
                        });
                        next_index += 1;
                    }
                    _ => return Err(Error::user(format!("{display} requires argument"))),
                }
            }
        } else {
            out.push(Tentative::Opt {
                key,
                display,
                value: OptValue::Flag,
            });
        }
    }
    Ok(next_index)
}
