//! Two structural passes over the finished pattern tree, run once per `parse` call
//! before matching (§4.6):
//!
//! 1. [`fill_options_shortcut`] gives the `[options]` placeholder its children.
//! 2. [`compute_repeated_keys`] finds which leaves can occur more than once in some
//!    invocation form, so the matcher and dictionary builder know to accumulate a
//!    count/list for them instead of a plain scalar.

use std::collections::HashSet;

use crate::option_index::OptionIndex;
use crate::pattern::Pattern;

/// `transform` is only ever used to *discover* repeats, never to replace the tree, so
/// a pathological usage line can only blow up this local pass — cap it generously and
/// move on; a usage line with this much alternation nesting is already unreadable to a
/// human.
const MAX_CONJUNCTIONS: usize = 4096;

/// Fills every `[options]` placeholder with every declared option not already
/// referenced elsewhere in the usage line.
pub(crate) fn fill_options_shortcut(pattern: &mut Pattern, options: &OptionIndex) {
    let mut referenced = HashSet::new();
    collect_referenced_option_keys(pattern, &mut referenced);
    inject(pattern, &referenced, options);
}

fn collect_referenced_option_keys(pattern: &Pattern, out: &mut HashSet<String>) {
    match pattern {
        Pattern::Option(o) => {
            out.insert(o.key());
        }
        Pattern::Argument(_) | Pattern::Command(_) => {}
        Pattern::Required(xs) | Pattern::Optional(xs) | Pattern::OptionsShortcut(xs) => {
            for x in xs {
                collect_referenced_option_keys(x, out);
            }
        }
        Pattern::Either(xs) => {
            for x in xs {
                collect_referenced_option_keys(x, out);
            }
        }
        Pattern::OneOrMore(x) => collect_referenced_option_keys(x, out),
    }
}

fn inject(pattern: &mut Pattern, referenced: &HashSet<String>, options: &OptionIndex) {
    match pattern {
        Pattern::OptionsShortcut(children) if children.is_empty() => {
            *children = options
                .iter()
                .filter(|o| !referenced.contains(&o.key()))
                .map(|o| Pattern::Option(o.clone()))
                .collect();
        }
        Pattern::Required(xs)
        | Pattern::Optional(xs)
        | Pattern::OptionsShortcut(xs)
        | Pattern::Either(xs) => {
            for x in xs {
                inject(x, referenced, options);
            }
        }
        Pattern::OneOrMore(x) => inject(x, referenced, options),
        Pattern::Argument(_) | Pattern::Command(_) | Pattern::Option(_) => {}
    }
}

/// Canonical keys of leaves that appear more than once in some fully-distributed
/// conjunction of the tree — these get list/count value types instead of scalars.
pub(crate) fn compute_repeated_keys(pattern: &Pattern) -> HashSet<String> {
    let mut repeated = HashSet::new();
    for conjunction in expand(pattern) {
        let mut seen = HashSet::new();
        for key in conjunction {
            if !seen.insert(key.clone()) {
                repeated.insert(key);
            }
        }
    }
    repeated
}

/// The `transform` worklist: expands a pattern into the disjunction of conjunctions it
/// stands for, distributing `Either` outward and doubling `OneOrMore`'s child.
fn expand(pattern: &Pattern) -> Vec<Vec<String>> {
    let mut out = match pattern {
        Pattern::Argument(a) => vec![vec![a.key()]],
        Pattern::Command(c) => vec![vec![c.key()]],
        Pattern::Option(o) => vec![vec![o.key()]],
        Pattern::Required(xs) | Pattern::Optional(xs) | Pattern::OptionsShortcut(xs) => {
            cartesian_concat(xs)
        }
        Pattern::Either(xs) => xs.iter().flat_map(expand).collect(),
        Pattern::OneOrMore(x) => {
            let inner = expand(x);
            let mut out = Vec::new();
            'outer: for a in &inner {
                for b in &inner {
                    let mut combined = a.clone();
                    combined.extend(b.iter().cloned());
                    out.push(combined);
                    if out.len() >= MAX_CONJUNCTIONS {
                        break 'outer;
                    }
                }
            }
            out
        }
    };
    out.truncate(MAX_CONJUNCTIONS);
    out
}

fn cartesian_concat(xs: &[Pattern]) -> Vec<Vec<String>> {
    let mut acc = vec![Vec::new()];
    for x in xs {
        let sub = expand(x);
        let mut next = Vec::new();
        'outer: for a in &acc {
            for b in &sub {
                let mut combined = a.clone();
                combined.extend(b.iter().cloned());
                next.push(combined);
                if next.len() >= MAX_CONJUNCTIONS {
                    break 'outer;
                }
            }
        }
        acc = next;
        if acc.len() >= MAX_CONJUNCTIONS {
            break;
        }
    }
    acc
}
