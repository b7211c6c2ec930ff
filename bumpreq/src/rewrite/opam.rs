//! Rewrites opam version formulas like `{>= "4.08" & < "5.0"}`.
//!
//! Each `&`-joined term is handled on its own, keeping its quoting and the separators around it.
//! Terms that aren't version comparisons are package filters and pass through.
//! Formulas with `|` alternatives are left alone.

use itertools::Itertools;

use super::{Rewrite, Rewriter, Strategy, UpperBoundPolicy, widen_segments};
use crate::{Comparable, Op, Opam, Version, constraint::opam::comparison};

enum Term {
    Keep,
    Replace(String),
    Drop,
    Unfixable,
}

pub(super) fn rewrite(rewriter: &Rewriter, original: &str, target: &str) -> Rewrite {
    let target = match Version::<Opam>::parse(target.trim()) {
        Ok(target) => target,
        Err(err) => {
            tracing::debug!(%err, "target does not parse");
            return Rewrite::Unchanged;
        }
    };

    let formula = original.trim();
    let (open, body, close) = match formula.strip_prefix('{').and_then(|f| f.strip_suffix('}')) {
        Some(body) => ("{", body, "}"),
        None => ("", formula, ""),
    };
    if body.contains('|') {
        tracing::debug!(original, "alternatives are not rewritten");
        return Rewrite::Unchanged;
    }
    if body.trim().is_empty() {
        return Rewrite::Unchanged;
    }

    let pieces = body.split('&').collect::<Vec<_>>();
    let lead = leading_space(body);
    let trail = &body[body.trim_end().len()..];

    let mut rewritten = String::new();
    for (i, piece) in pieces.iter().enumerate() {
        let term = piece.trim();
        if term.is_empty() {
            continue;
        }
        let term = match rewrite_term(rewriter, term, &target) {
            Term::Keep => term.to_string(),
            Term::Replace(replaced) => replaced,
            Term::Drop => {
                tracing::debug!(term, "dropping upper bound");
                continue;
            }
            Term::Unfixable => return Rewrite::Unfixable,
        };
        if !rewritten.is_empty() {
            let before = &pieces[i - 1];
            rewritten.push_str(&before[before.trim_end().len()..]);
            rewritten.push('&');
            rewritten.push_str(leading_space(piece));
        }
        rewritten.push_str(&term);
    }

    if rewritten.is_empty() {
        return Rewrite::Updated(String::new());
    }
    Rewrite::Updated(format!("{open}{lead}{rewritten}{trail}{close}"))
}

fn leading_space(text: &str) -> &str {
    &text[..text.len() - text.trim_start().len()]
}

fn rewrite_term(rewriter: &Rewriter, term: &str, target: &Version<Opam>) -> Term {
    let Some((op, written)) = comparison(term) else {
        return Term::Keep;
    };
    let Ok(bound) = Version::<Opam>::parse(written) else {
        tracing::debug!(term, "term version does not parse");
        return Term::Keep;
    };
    let replace = |version: &str| Term::Replace(term.replacen(written, version, 1));

    match op {
        Op::Equal if bound.equal(target) => Term::Keep,
        Op::Equal => replace(target.as_str()),
        Op::GreaterOrEqual if !bound.greater_or_equal(target) => replace(target.as_str()),
        Op::GreaterOrEqual if rewriter.strategy() == Strategy::BumpVersions => {
            replace(target.as_str())
        }
        Op::Greater if !bound.greater(target) => Term::Unfixable,
        Op::Less if !bound.less(target) => widen(rewriter, op, &bound, target, replace),
        Op::LessOrEqual if !bound.less_or_equal(target) => {
            widen(rewriter, op, &bound, target, replace)
        }
        Op::NotEqual if bound.equal(target) => Term::Unfixable,
        _ => Term::Keep,
    }
}

fn widen(
    rewriter: &Rewriter,
    op: Op,
    bound: &Version<Opam>,
    target: &Version<Opam>,
    replace: impl Fn(&str) -> Term,
) -> Term {
    if rewriter.upper_bound() == UpperBoundPolicy::Drop {
        return Term::Drop;
    }
    if op == Op::LessOrEqual {
        return replace(target.as_str());
    }
    match (bound.release(), target.release()) {
        (Some(bound), Some(target)) => {
            replace(&widen_segments(&bound, &target).iter().join("."))
        }
        _ => Term::Drop,
    }
}
