//! Turns the body of one or more `options:` sections into [`OptionLeaf`] values.

use crate::pattern::OptionLeaf;

/// Folds a concatenated `options:` body into one description line per option,
/// joining wrapped help-text continuation lines back onto the description they
/// belong to (SPEC_FULL.md §4.2 addendum).
fn fold_continuations(text: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for raw in text.split('\n') {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.starts_with('-') {
            out.push(trimmed.to_string());
        } else if let Some(last) = out.last_mut() {
            last.push(' ');
            last.push_str(trimmed);
        }
    }
    out
}

/// Splits a signature/help-text pair on the first run of two or more spaces.
fn split_signature(line: &str) -> (&str, &str) {
    let bytes = line.as_bytes();
    let mut i = 0;
    while i + 1 < bytes.len() {
        if bytes[i] == b' ' && bytes[i + 1] == b' ' {
            let mut end = i;
            while end < bytes.len() && bytes[end] == b' ' {
                end += 1;
            }
            return (&line[..i], &line[end..]);
        }
        i += 1;
    }
    (line, "")
}

/// Scans help text (case-insensitive) for `[default: VALUE]` and returns `VALUE`
/// verbatim.
fn find_default(help: &str) -> Option<String> {
    let lower = help.to_lowercase();
    let start = lower.find("[default:")?;
    let after = &help[start + "[default:".len()..];
    let end = after.find(']')?;
    Some(after[..end].trim().to_string())
}

/// Parses one option-description signature (`-s, --long=VAL` with `,`/`=` treated as
/// whitespace) plus its help text into an [`OptionLeaf`].
fn parse_one(line: &str) -> OptionLeaf {
    let (signature, help) = split_signature(line);
    let normalized: String = signature
        .chars()
        .map(|c| if c == ',' || c == '=' { ' ' } else { c })
        .collect();

    let mut short = None;
    let mut long = None;
    let mut argcount = 0u8;

    for tok in normalized.split_whitespace() {
        if let Some(l) = tok.strip_prefix("--") {
            long = Some(l.to_string());
        } else if let Some(rest) = tok.strip_prefix('-') {
            let mut chars = rest.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                short = Some(c);
            } else {
                argcount = 1;
            }
        } else {
            argcount = 1;
        }
    }

    let default = if argcount == 1 { find_default(help) } else { None };

    OptionLeaf {
        short,
        long,
        argcount,
        default,
    }
}

/// Parses a concatenated `options:` body into its declared [`OptionLeaf`] values, in
/// declaration order.
pub(crate) fn parse_option_descriptions(options_text: &str) -> Vec<OptionLeaf> {
    fold_continuations(options_text)
        .iter()
        .map(|line| parse_one(line))
        .collect()
}
