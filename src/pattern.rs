//! The pattern tree: the formal grammar a usage line parses into, and the small value
//! model ([`Value`]) used for both matched results and final dictionary entries.

/// A matched value, in one of the four shapes a leaf can settle into. Which shape a
/// given leaf uses is decided once, up front, by [`crate::fixer`] — a zero-arg option
/// never turns into a `List`, an `Argument` never turns into a `Count`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Presence of a zero-arg option or a command, when it can occur at most once.
    Bool(bool),
    /// Occurrence count of a zero-arg option or a command that the grammar allows to
    /// repeat.
    Count(i64),
    /// A single string value, or its absence (`None`).
    Str(Option<String>),
    /// Values collected from a leaf the grammar allows to repeat.
    List(Vec<String>),
}

/// An `<angle-bracketed>` or `UPPERCASE` positional leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentLeaf {
    pub name: String,
}

impl ArgumentLeaf {
    pub(crate) fn key(&self) -> String {
        format!("arg:{}", self.name)
    }
}

/// A literal word leaf, e.g. the `commit` in `prog (commit | log)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLeaf {
    pub name: String,
}

impl CommandLeaf {
    pub(crate) fn key(&self) -> String {
        format!("cmd:{}", self.name)
    }
}

/// A `-s`/`--long` option leaf. `short` and `long` are never both empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionLeaf {
    pub short: Option<char>,
    pub long: Option<String>,
    pub argcount: u8,
    pub default: Option<String>,
}

impl OptionLeaf {
    /// Display name used both for the dictionary key and for matching an argv
    /// occurrence to its declaration: the long form if present, else the short form.
    #[must_use]
    pub fn display_name(&self) -> String {
        match (&self.long, self.short) {
            (Some(l), _) => format!("--{l}"),
            (None, Some(s)) => format!("-{s}"),
            (None, None) => String::new(),
        }
    }

    pub(crate) fn key(&self) -> String {
        format!("opt:{}", self.display_name())
    }
}

/// A node of the formal grammar a usage line parses into.
#[derive(Debug, Clone)]
pub enum Pattern {
    Argument(ArgumentLeaf),
    Command(CommandLeaf),
    Option(OptionLeaf),
    /// All children must match, in order.
    Required(Vec<Pattern>),
    /// Each child matches independently; failure to match a child contributes nothing.
    Optional(Vec<Pattern>),
    /// Placeholder for the literal `options` in a usage line. Empty until
    /// [`crate::fixer`] fills it in with every declared option not already mentioned
    /// elsewhere in the usage line. Matches like [`Pattern::Optional`].
    OptionsShortcut(Vec<Pattern>),
    /// The child must match one or more times.
    OneOrMore(Box<Pattern>),
    /// Exactly one child matches.
    Either(Vec<Pattern>),
}

impl Pattern {
    /// Pre-order walk collecting every leaf, used both to compute the option index's
    /// set of usage-referenced options and to build the final dictionary.
    pub(crate) fn flatten_leaves<'a>(&'a self, out: &mut Vec<&'a Pattern>) {
        match self {
            Pattern::Argument(_) | Pattern::Command(_) | Pattern::Option(_) => out.push(self),
            Pattern::Required(xs) | Pattern::Optional(xs) | Pattern::OptionsShortcut(xs) => {
                for x in xs {
                    x.flatten_leaves(out);
                }
            }
            Pattern::Either(xs) => {
                for x in xs {
                    x.flatten_leaves(out);
                }
            }
            Pattern::OneOrMore(x) => x.flatten_leaves(out),
        }
    }

    /// Canonical key identifying "the same leaf" independent of object identity; see
    /// `SPEC_FULL.md` §3a.
    pub(crate) fn leaf_key(&self) -> Option<String> {
        match self {
            Pattern::Argument(a) => Some(a.key()),
            Pattern::Command(c) => Some(c.key()),
            Pattern::Option(o) => Some(o.key()),
            _ => None,
        }
    }
}
