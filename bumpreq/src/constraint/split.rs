//! Splits requirement strings into atomic constraint tokens.
//!
//! Tokens come out normalized, with no whitespace between operator and version:
//! `">= 1.2.0 < 2"` becomes `[">=1.2.0", "<2"]`.
//!
//! - `||` separates alternative groups.
//! - Commas and whitespace both separate constraints within a group.
//! - Hyphen ranges `a - b` become `>=a` and `<=b`.

use itertools::Itertools;

/// Operators that may be written apart from their version.
const OPERATORS: &[&str] = &[">=", "<=", "!=", "~>", ">", "<", "~", "^", "="];

/// Tokens that match any version.
const WILDCARDS: &[&str] = &["*", "x", "X", "latest"];

/// Split a requirement string into a flat list of tokens, deduplicated in order.
///
/// Returns `None` if the string is malformed; see [`split_groups`].
///
/// ```
/// # use bumpreq::constraint::split::split;
/// assert_eq!(split(">= 1.2.0, < 2.0.0").unwrap(), vec![">=1.2.0", "<2.0.0"]);
/// assert_eq!(split("^1.0 || ^2.0").unwrap(), vec!["^1.0", "^2.0"]);
/// assert_eq!(split(">="), None);
/// ```
pub fn split(expression: &str) -> Option<Vec<String>> {
    let groups = split_groups(expression)?;
    Some(groups.into_iter().flatten().unique().collect())
}

/// Split a requirement string into its `||` groups of tokens.
///
/// Returns `None` if:
/// - An operator is followed by another operator, a token led by one, or nothing.
/// - A wildcard is followed by another token.
/// - A `||` branch or a comma-separated clause is empty.
///
/// An empty (or all-whitespace) string has no groups.
#[tracing::instrument(level = "debug")]
pub fn split_groups(expression: &str) -> Option<Vec<Vec<String>>> {
    let expression = expression.trim();
    if expression.is_empty() {
        return Some(Vec::new());
    }
    expression.split("||").map(split_group).collect()
}

fn split_group(group: &str) -> Option<Vec<String>> {
    let group = group.trim();
    if group.is_empty() {
        tracing::debug!("empty alternative");
        return None;
    }

    let mut tokens = Vec::new();
    for clause in group.split(',') {
        let clause = clause.trim();
        if clause.is_empty() {
            tracing::debug!(group, "empty clause");
            return None;
        }
        for token in split_clause(clause)? {
            if !tokens.contains(&token) {
                tokens.push(token);
            }
        }
    }
    Some(tokens)
}

fn split_clause(clause: &str) -> Option<Vec<String>> {
    let words = expand_hyphen_ranges(clause.split_whitespace().collect());

    let mut tokens = Vec::<String>::new();
    let mut pending = None::<&str>;
    for word in words {
        if OPERATORS.contains(&word.as_str()) {
            if let Some(op) = pending {
                tracing::debug!(op, next = %word, "operator followed by operator");
                return None;
            }
            pending = Some(OPERATORS.iter().find(|op| **op == word).copied()?);
            continue;
        }

        if let Some(op) = pending {
            if OPERATORS.iter().any(|other| word.starts_with(other)) {
                tracing::debug!(op, next = %word, "operator followed by an operator-led token");
                return None;
            }
        }

        if tokens.last().is_some_and(|last| WILDCARDS.contains(&last.as_str())) {
            tracing::debug!(next = %word, "wildcard followed by another token");
            return None;
        }

        let token = match pending.take() {
            Some(op) => format!("{op}{word}"),
            None => word,
        };
        tokens.push(token);
    }

    match pending {
        Some(op) => {
            tracing::debug!(op, "operator without a version");
            None
        }
        None => Some(tokens),
    }
}

/// Rewrite `a - b` into `>=a <=b`.
fn expand_hyphen_ranges(words: Vec<&str>) -> Vec<String> {
    let mut out = Vec::with_capacity(words.len());
    let mut i = 0;
    while i < words.len() {
        match (words.get(i), words.get(i + 1), words.get(i + 2)) {
            (Some(low), Some(&"-"), Some(high)) if !OPERATORS.contains(low) => {
                out.push(format!(">={low}"));
                out.push(format!("<={high}"));
                i += 3;
            }
            (Some(word), _, _) => {
                out.push(word.to_string());
                i += 1;
            }
            (None, _, _) => break,
        }
    }
    out
}
