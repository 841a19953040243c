//! Recursive matching of the pattern tree against the flat tentative-leaf sequence
//! (§4.7), and flattening the result into the final name→value dictionary (§4.8).
//!
//! Per `SPEC_FULL.md` §3a, there is no identity-shared mutable state here: every leaf
//! carries a canonical key, and matched values accumulate in a `collected` map keyed
//! by it, threaded alongside the unconsumed `left` exactly as the specification's own
//! design notes describe.

use std::collections::{HashMap, HashSet};

use crate::argv::{OptValue, Tentative};
use crate::pattern::{Pattern, Value};

type State = (Vec<Tentative>, HashMap<String, Value>);

/// Top-level entry point: `matched && left == []` is success, per §4.7.
pub(crate) fn match_pattern(
    pattern: &Pattern,
    flat: Vec<Tentative>,
    repeated: &HashSet<String>,
) -> Option<HashMap<String, Value>> {
    let (left, collected) = match_node(pattern, flat, HashMap::new(), repeated)?;
    if left.is_empty() {
        Some(collected)
    } else {
        None
    }
}

fn match_node(
    node: &Pattern,
    left: Vec<Tentative>,
    collected: HashMap<String, Value>,
    repeated: &HashSet<String>,
) -> Option<State> {
    match node {
        Pattern::Argument(_) | Pattern::Command(_) | Pattern::Option(_) => {
            match_leaf(node, left, collected, repeated)
        }
        Pattern::Required(children) => {
            let mut state = (left, collected);
            for child in children {
                state = match_node(child, state.0, state.1, repeated)?;
            }
            Some(state)
        }
        Pattern::Optional(children) | Pattern::OptionsShortcut(children) => {
            let mut state = (left, collected);
            for child in children {
                if let Some(next) = match_node(child, state.0.clone(), state.1.clone(), repeated) {
                    state = next;
                }
            }
            Some(state)
        }
        Pattern::OneOrMore(child) => match_one_or_more(child, left, collected, repeated),
        Pattern::Either(children) => match_either(children, &left, &collected, repeated),
    }
}

fn match_one_or_more(
    child: &Pattern,
    mut left: Vec<Tentative>,
    mut collected: HashMap<String, Value>,
    repeated: &HashSet<String>,
) -> Option<State> {
    let mut matched_once = false;
    loop {
        let before = left.len();
        match match_node(child, left.clone(), collected.clone(), repeated) {
            Some((new_left, new_collected)) => {
                matched_once = true;
                let progressed = new_left.len() != before;
                left = new_left;
                collected = new_collected;
                if !progressed {
                    break;
                }
            }
            None => break,
        }
    }
    if matched_once {
        Some((left, collected))
    } else {
        None
    }
}

fn match_either(
    children: &[Pattern],
    left: &[Tentative],
    collected: &HashMap<String, Value>,
    repeated: &HashSet<String>,
) -> Option<State> {
    let mut best: Option<State> = None;
    for child in children {
        if let Some(candidate) = match_node(child, left.to_vec(), collected.clone(), repeated) {
            best = Some(match best {
                None => candidate,
                Some(current) if candidate.0.len() < current.0.len() => candidate,
                Some(current) => current,
            });
        }
    }
    best
}

fn match_leaf(
    node: &Pattern,
    mut left: Vec<Tentative>,
    mut collected: HashMap<String, Value>,
    repeated: &HashSet<String>,
) -> Option<State> {
    let key = node.leaf_key()?;
    let value = single_match(node, &mut left)?;

    if repeated.contains(&key) {
        match collected.get_mut(&key) {
            Some(Value::Count(n)) => *n += 1,
            Some(Value::List(list)) => {
                if let Value::Str(Some(s)) = value {
                    list.push(s);
                }
            }
            _ => {
                let seeded = match value {
                    Value::Bool(_) => Value::Count(1),
                    Value::Str(Some(s)) => Value::List(vec![s]),
                    Value::Str(None) => Value::List(Vec::new()),
                    other => other,
                };
                collected.insert(key, seeded);
            }
        }
    } else {
        collected.insert(key, value);
    }
    Some((left, collected))
}

/// Scans `left` for the first element this leaf accepts, removing it on success.
fn single_match(node: &Pattern, left: &mut Vec<Tentative>) -> Option<Value> {
    match node {
        Pattern::Argument(_) => {
            let ix = left
                .iter()
                .position(|t| matches!(t, Tentative::Positional(_)))?;
            match left.remove(ix) {
                Tentative::Positional(s) => Some(Value::Str(Some(s))),
                Tentative::Opt { .. } => unreachable!(),
            }
        }
        Pattern::Command(c) => {
            // Only looks at the first Argument-typed element; a non-matching one
            // aborts rather than being skipped over. See SPEC_FULL.md §9.
            let ix = left
                .iter()
                .position(|t| matches!(t, Tentative::Positional(_)))?;
            match &left[ix] {
                Tentative::Positional(s) if *s == c.name => {
                    left.remove(ix);
                    Some(Value::Bool(true))
                }
                _ => None,
            }
        }
        Pattern::Option(o) => {
            let display = o.display_name();
            let ix = left.iter().position(
                |t| matches!(t, Tentative::Opt { display: d, .. } if *d == display),
            )?;
            match left.remove(ix) {
                Tentative::Opt { value, .. } => Some(match value {
                    OptValue::Flag => Value::Bool(true),
                    OptValue::Arg(s) => Value::Str(Some(s)),
                }),
                Tentative::Positional(_) => unreachable!(),
            }
        }
        _ => None,
    }
}

/// Flattens the fixed tree into the final name→value dictionary: collected values
/// where present, the leaf's own default otherwise (§4.8).
pub(crate) fn build_dictionary(
    pattern: &Pattern,
    collected: &HashMap<String, Value>,
    repeated: &HashSet<String>,
) -> HashMap<String, Value> {
    let mut leaves = Vec::new();
    pattern.flatten_leaves(&mut leaves);

    let mut seen = HashSet::new();
    let mut dict = HashMap::new();
    for leaf in leaves {
        let Some(key) = leaf.leaf_key() else { continue };
        if !seen.insert(key.clone()) {
            continue;
        }
        let display = display_name(leaf);
        let value = collected
            .get(&key)
            .cloned()
            .unwrap_or_else(|| default_value(leaf, repeated.contains(&key)));
        dict.insert(display, value);
    }
    dict
}

fn display_name(leaf: &Pattern) -> String {
    match leaf {
        Pattern::Argument(a) => a.name.clone(),
        Pattern::Command(c) => c.name.clone(),
        Pattern::Option(o) => o.display_name(),
        _ => unreachable!("flatten_leaves only yields leaves with a leaf_key"),
    }
}

fn default_value(leaf: &Pattern, is_repeated: bool) -> Value {
    match leaf {
        Pattern::Argument(_) => {
            if is_repeated {
                Value::List(Vec::new())
            } else {
                Value::Str(None)
            }
        }
        Pattern::Command(_) => {
            if is_repeated {
                Value::Count(0)
            } else {
                Value::Bool(false)
            }
        }
        Pattern::Option(o) if o.argcount == 0 => {
            if is_repeated {
                Value::Count(0)
            } else {
                Value::Bool(false)
            }
        }
        Pattern::Option(o) => {
            if is_repeated {
                let parts = o
                    .default
                    .as_deref()
                    .map(|d| d.split_whitespace().map(str::to_string).collect())
                    .unwrap_or_default();
                Value::List(parts)
            } else {
                Value::Str(o.default.clone())
            }
        }
        _ => unreachable!("flatten_leaves only yields leaves with a leaf_key"),
    }
}
