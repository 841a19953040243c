//! Turns the formal usage string into the flat token stream the recursive-descent
//! parser in [`crate::usage_parser`] consumes. The only subtlety is that
//! `<angle-bracketed groups>` may contain spaces and must survive as one token.

use crate::error::Error;

pub(crate) fn tokenize(formal: &str) -> Result<Vec<String>, Error> {
    let chars: Vec<char> = formal.chars().collect();
    let mut tokens = Vec::new();
    let mut word = String::new();
    let mut i = 0;

    macro_rules! flush_word {
        () => {
            if !word.is_empty() {
                tokens.push(std::mem::take(&mut word));
            }
        };
    }

    while i < chars.len() {
        let c = chars[i];
        match c {
            '[' | ']' | '(' | ')' | '|' => {
                flush_word!();
                tokens.push(c.to_string());
                i += 1;
            }
            '.' if chars[i..].iter().take(3).collect::<String>() == "..." => {
                flush_word!();
                tokens.push("...".to_string());
                i += 3;
            }
            '<' => {
                flush_word!();
                let start = i;
                while i < chars.len() && chars[i] != '>' {
                    i += 1;
                }
                if i >= chars.len() {
                    return Err(Error::language(format!(
                        "unterminated '<' in usage pattern: {formal}"
                    )));
                }
                i += 1; // include closing '>'
                tokens.push(chars[start..i].iter().collect());
            }
            c if c.is_whitespace() => {
                flush_word!();
                i += 1;
            }
            _ => {
                word.push(c);
                i += 1;
            }
        }
    }
    flush_word!();
    Ok(tokens)
}
