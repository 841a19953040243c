//! Parsing can fail for two very different reasons: the help text the programmer wrote
//! is malformed ([`ErrorKind::Language`]), or the argv the user typed doesn't match an
//! otherwise well-formed grammar ([`ErrorKind::User`]). A third, [`ErrorKind::Internal`],
//! covers bugs in this crate itself and should never be observed in practice.

use std::fmt;

/// Coarse classification of a parse failure, for callers that want to branch on the
/// kind without matching message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The help text itself is malformed.
    Language,
    /// The supplied argv doesn't match an otherwise well-formed grammar.
    User,
    /// This crate's own invariant was violated.
    Internal,
}

/// Unsuccessful parse outcome.
#[derive(Debug)]
pub struct Error(pub(crate) Message);

impl Error {
    pub(crate) fn language(message: impl Into<String>) -> Self {
        Error(Message::Language(message.into()))
    }

    pub(crate) fn user(message: impl Into<String>) -> Self {
        Error(Message::User(message.into()))
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Error(Message::Internal(message.into()))
    }

    /// Coarse kind of this error, see [`ErrorKind`].
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match &self.0 {
            Message::Language(_) => ErrorKind::Language,
            Message::User(_) => ErrorKind::User,
            Message::Internal(_) => ErrorKind::Internal,
        }
    }
}

#[derive(Debug)]
pub(crate) enum Message {
    /// Something is wrong with the help text: missing/duplicate `usage:` header,
    /// unmatched bracket or paren, unexpected trailing tokens.
    Language(String),
    /// Something is wrong with the argv given an otherwise well-formed grammar.
    User(String),
    /// This crate's own bookkeeping is inconsistent.
    Internal(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Message::Language(m) | Message::User(m) | Message::Internal(m) => f.write_str(m),
        }
    }
}

impl std::error::Error for Error {}
