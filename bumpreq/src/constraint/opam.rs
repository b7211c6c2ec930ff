//! Parses opam version formulas.
//!
//! Formulas look like `>= "4.08" & < "5.0"`, optionally wrapped in braces.
//! `|` separates alternatives and `&` separates conjuncts.
//! Terms that aren't version comparisons (package filters like `with-test`,
//! or comparisons against variables) are skipped.

use lazy_regex::regex_captures;

use super::{Constraint, Constraints, Expression, Op};
use crate::{Opam, Version};

/// Parse an opam version formula.
///
/// Returns `None` if a version comparison names a version that does not parse.
///
/// ```
/// # use bumpreq::{Opam, constraint::opam::parse, version};
/// let formula = parse(r#"{>= "4.08" & < "5.0"}"#).expect("parse");
/// assert!(formula.matches(&version!(Opam => "4.14.1")));
/// assert!(!formula.matches(&version!(Opam => "5.0")));
/// ```
#[tracing::instrument(level = "debug")]
pub fn parse(formula: &str) -> Option<Expression<Version<Opam>>> {
    let formula = formula.trim();
    let formula = formula
        .strip_prefix('{')
        .and_then(|f| f.strip_suffix('}'))
        .unwrap_or(formula);

    formula
        .split('|')
        .map(str::trim)
        .filter(|branch| !branch.is_empty())
        .map(parse_branch)
        .collect::<Option<Vec<_>>>()
        .map(Expression::from)
}

fn parse_branch(branch: &str) -> Option<Constraints<Version<Opam>>> {
    let mut constraints = Vec::new();
    for term in branch.split('&').map(str::trim).filter(|t| !t.is_empty()) {
        let Some((op, version)) = comparison(term) else {
            tracing::debug!(term, "skipping non-version term");
            continue;
        };
        let version = Version::<Opam>::parse(version).ok()?;
        constraints.push(Constraint::from_op(op, version));
    }
    Some(Constraints::from(constraints))
}

/// Split a term like `>= "4.08"` into its operator and version.
pub(crate) fn comparison(term: &str) -> Option<(Op, &str)> {
    let (_, op, version) =
        regex_captures!(r#"^(>=|<=|!=|=|>|<)\s*"?([0-9][^"\s]*)"?$"#, term)?;
    let op = match op {
        ">=" => Op::GreaterOrEqual,
        "<=" => Op::LessOrEqual,
        "!=" => Op::NotEqual,
        "=" => Op::Equal,
        ">" => Op::Greater,
        "<" => Op::Less,
        _ => return None,
    };
    Some((op, version))
}
