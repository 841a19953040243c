//! The registry of every known `Option` leaf: those declared in an `options:` section,
//! plus any synthesized the first time an undeclared flag is seen in the usage line or
//! in argv. Shared, mutably, between the usage-pattern parser and the argv parser.

use crate::error::Error;
use crate::pattern::OptionLeaf;

#[derive(Debug, Default)]
pub(crate) struct OptionIndex {
    options: Vec<OptionLeaf>,
}

impl OptionIndex {
    pub(crate) fn new() -> Self {
        OptionIndex::default()
    }

    pub(crate) fn push(&mut self, leaf: OptionLeaf) -> usize {
        self.options.push(leaf);
        self.options.len() - 1
    }

    pub(crate) fn get(&self, ix: usize) -> &OptionLeaf {
        &self.options[ix]
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &OptionLeaf> {
        self.options.iter()
    }

    pub(crate) fn find_by_long_exact(&self, long: &str) -> Option<usize> {
        self.options
            .iter()
            .position(|o| o.long.as_deref() == Some(long))
    }

    /// Every index whose long name starts with `prefix`, used for argv-only
    /// abbreviation resolution (never during usage parsing).
    pub(crate) fn find_by_long_prefix(&self, prefix: &str) -> Vec<usize> {
        self.options
            .iter()
            .enumerate()
            .filter(|(_, o)| matches!(&o.long, Some(l) if l.starts_with(prefix)))
            .map(|(ix, _)| ix)
            .collect()
    }

    /// All declared options carrying this short flag; more than one means the usage
    /// text declared the same short flag twice, which is a language error upstream.
    pub(crate) fn find_by_short(&self, c: char) -> Vec<usize> {
        self.options
            .iter()
            .enumerate()
            .filter(|(_, o)| o.short == Some(c))
            .map(|(ix, _)| ix)
            .collect()
    }

    /// Looks up `-c`, synthesizing a fresh zero-arg option on first sight. Fails only
    /// if the flag was declared more than once, which should not happen for a registry
    /// built by this crate, but guards against malformed option descriptions.
    pub(crate) fn resolve_short(&mut self, c: char, is_language: bool) -> Result<usize, Error> {
        let matches = self.find_by_short(c);
        match matches.len() {
            1 => Ok(matches[0]),
            0 => Ok(self.push(OptionLeaf {
                short: Some(c),
                long: None,
                argcount: 0,
                default: None,
            })),
            _ => {
                let msg = format!("-{c} is specified ambiguously {} times", matches.len());
                Err(if is_language {
                    Error::language(msg)
                } else {
                    Error::user(msg)
                })
            }
        }
    }
}
