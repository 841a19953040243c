//! Recursive-descent parser over the tokenized, formalized usage line, producing a
//! [`Pattern`] tree. Every failure here is a [`crate::ErrorKind::Language`] error: the
//! usage line is part of the programmer's own help text, not user input.

use crate::error::Error;
use crate::option_index::OptionIndex;
use crate::pattern::{ArgumentLeaf, CommandLeaf, OptionLeaf, Pattern};
use crate::token::Tokens;
use crate::usage_tokenizer;

/// Strips the leading `usage:` keyword and turns repeated occurrences of the program
/// name into alternation separators, wrapping the whole thing in parens — see
/// "Formal usage preparation" in `SPEC_FULL.md` §4.4.
pub(crate) fn prepare_formal_usage(usage_section: &str) -> Result<String, Error> {
    let lower = usage_section.to_lowercase();
    let keyword_at = lower
        .find("usage:")
        .ok_or_else(|| Error::language("usage section is missing its 'usage:' keyword"))?;
    let after_keyword = &usage_section[keyword_at + "usage:".len()..];
    let flattened = after_keyword.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut parts = flattened.splitn(2, ' ');
    let name = parts.next().unwrap_or("").to_string();
    if name.is_empty() {
        return Err(Error::language("usage section has no program name"));
    }
    let rest = parts.next().unwrap_or("");

    let mut out = Vec::new();
    for tok in rest.split_whitespace() {
        if tok == name {
            out.push(")".to_string());
            out.push("|".to_string());
            out.push("(".to_string());
        } else {
            out.push(tok.to_string());
        }
    }
    Ok(format!("( {} )", out.join(" ")))
}

/// Parses a fully-formalized, already-tokenized usage line into its [`Pattern`] tree,
/// registering every referenced option in `options`.
pub(crate) fn parse_pattern(
    tokens: Vec<String>,
    options: &mut OptionIndex,
) -> Result<Pattern, Error> {
    let mut toks = Tokens::new(tokens);
    let children = parse_expr(&mut toks, options)?;
    if !toks.at_end() {
        return Err(Error::language(format!(
            "unexpected trailing token '{}' in usage pattern",
            toks.peek().unwrap_or("")
        )));
    }
    Ok(Pattern::Required(children))
}

pub(crate) fn tokenize_formal_usage(formal: &str) -> Result<Vec<String>, Error> {
    usage_tokenizer::tokenize(formal)
}

fn parse_expr(toks: &mut Tokens, options: &mut OptionIndex) -> Result<Vec<Pattern>, Error> {
    let mut seqs = vec![parse_seq(toks, options)?];
    while toks.peek() == Some("|") {
        toks.advance();
        seqs.push(parse_seq(toks, options)?);
    }
    if seqs.len() == 1 {
        Ok(seqs.remove(0))
    } else {
        let children = seqs.into_iter().map(seq_to_pattern).collect();
        Ok(vec![Pattern::Either(children)])
    }
}

fn seq_to_pattern(mut seq: Vec<Pattern>) -> Pattern {
    if seq.len() == 1 {
        seq.remove(0)
    } else {
        Pattern::Required(seq)
    }
}

fn parse_seq(toks: &mut Tokens, options: &mut OptionIndex) -> Result<Vec<Pattern>, Error> {
    let mut out = Vec::new();
    loop {
        match toks.peek() {
            None | Some("]") | Some(")") | Some("|") => break,
            _ => {
                let atom = parse_atom(toks, options)?;
                let atom = if toks.peek() == Some("...") {
                    toks.advance();
                    Pattern::OneOrMore(Box::new(atom))
                } else {
                    atom
                };
                out.push(atom);
            }
        }
    }
    Ok(out)
}

fn parse_atom(toks: &mut Tokens, options: &mut OptionIndex) -> Result<Pattern, Error> {
    let tok = toks
        .peek()
        .ok_or_else(|| Error::language("unexpected end of usage pattern"))?
        .to_string();
    match tok.as_str() {
        "(" => {
            toks.advance();
            let children = parse_expr(toks, options)?;
            toks.expect(")")?;
            Ok(Pattern::Required(children))
        }
        "[" => {
            toks.advance();
            let children = parse_expr(toks, options)?;
            toks.expect("]")?;
            Ok(Pattern::Optional(children))
        }
        "options" => {
            toks.advance();
            Ok(Pattern::OptionsShortcut(Vec::new()))
        }
        t if t.starts_with("--") => {
            toks.advance();
            parse_long_atom(t, options)
        }
        t if t.starts_with('-') && t != "-" => {
            toks.advance();
            parse_shorts_atom(t, options)
        }
        t if t.starts_with('<') || is_all_uppercase(t) => {
            toks.advance();
            Ok(Pattern::Argument(ArgumentLeaf { name: t.to_string() }))
        }
        t => {
            toks.advance();
            Ok(Pattern::Command(CommandLeaf { name: t.to_string() }))
        }
    }
}

fn is_all_uppercase(tok: &str) -> bool {
    tok.chars().any(|c| c.is_ascii_uppercase()) && !tok.chars().any(|c| c.is_ascii_lowercase())
}

/// Usage parsing never abbreviates a long option by prefix — see the open question in
/// `SPEC_FULL.md` §9; that only happens in `argv.rs`.
fn parse_long_atom(tok: &str, options: &mut OptionIndex) -> Result<Pattern, Error> {
    let (name, has_value) = match tok.split_once('=') {
        Some((n, _)) => (n, true),
        None => (tok, false),
    };
    let long = name.trim_start_matches("--").to_string();
    let ix = match options.find_by_long_exact(&long) {
        Some(ix) => {
            if has_value && options.get(ix).argcount == 0 {
                return Err(Error::language(format!("--{long} must not have an argument")));
            }
            ix
        }
        None => options.push(OptionLeaf {
            short: None,
            long: Some(long),
            argcount: u8::from(has_value),
            default: None,
        }),
    };
    Ok(Pattern::Option(options.get(ix).clone()))
}

fn parse_shorts_atom(tok: &str, options: &mut OptionIndex) -> Result<Pattern, Error> {
    let body = &tok[1..];
    let chars: Vec<char> = body.chars().collect();
    let mut pos = 0;
    let mut leaves = Vec::new();
    while pos < chars.len() {
        if chars[pos] == '=' {
            break;
        }
        let c = chars[pos];
        pos += 1;
        let ix = options.resolve_short(c, true)?;
        leaves.push(Pattern::Option(options.get(ix).clone()));
        if options.get(ix).argcount == 1 {
            break;
        }
    }
    Ok(seq_to_pattern(leaves))
}
