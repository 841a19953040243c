//! A cursor over the tokenized usage line. Unlike the argv cursor in [`crate::argv`],
//! this one only needs to look ahead and step forward — the usage-pattern grammar is
//! LL(1) — so it stays a simple index into an owned `Vec<String>` rather than something
//! that hands back a fresh `Self` on every successful consume.

use crate::error::Error;

/// Ordered sequence of usage-line tokens, paired with the place to report failures
/// against: any failure to make sense of these tokens is a [`crate::ErrorKind::Language`]
/// error, since they come from the programmer's own help text.
pub(crate) struct Tokens {
    items: Vec<String>,
    pos: usize,
}

impl Tokens {
    pub(crate) fn new(items: Vec<String>) -> Self {
        Tokens { items, pos: 0 }
    }

    pub(crate) fn peek(&self) -> Option<&str> {
        self.items.get(self.pos).map(String::as_str)
    }

    pub(crate) fn advance(&mut self) -> Option<&str> {
        let tok = self.items.get(self.pos)?;
        self.pos += 1;
        Some(tok.as_str())
    }

    pub(crate) fn expect(&mut self, tok: &str) -> Result<(), Error> {
        match self.advance() {
            Some(t) if t == tok => Ok(()),
            Some(t) => Err(Error::language(format!(
                "unmatched '{tok}' in usage pattern (found '{t}')"
            ))),
            None => Err(Error::language(format!(
                "unmatched '{tok}' in usage pattern"
            ))),
        }
    }

    pub(crate) fn at_end(&self) -> bool {
        self.pos >= self.items.len()
    }
}
