//! Resolving constraints against lists of published versions.

use std::cmp::Ordering;

use super::{Comparable, Constraint, Expression};

/// The greatest candidate for which `predicate(candidate, bound)` holds.
///
/// Equivalent to sorting the candidates in descending order and taking the first match,
/// except that candidates incomparable with the current best are skipped rather than
/// handed to a sort that requires a total order.
///
/// ```
/// # use bumpreq::{constraint::{Comparable, highest_matching}, version};
/// let candidates = [version!("1.0.0"), version!("1.4.0"), version!("2.0.0")];
/// let best = highest_matching(&candidates, &version!("1.0.0"), |v, bound| bound.caret(v));
/// assert_eq!(best, Some(&version!("1.4.0")));
/// ```
pub fn highest_matching<'a, V, I, F>(candidates: I, bound: &V, mut predicate: F) -> Option<&'a V>
where
    V: PartialOrd + 'a,
    I: IntoIterator<Item = &'a V>,
    F: FnMut(&V, &V) -> bool,
{
    candidates
        .into_iter()
        .filter(|candidate| predicate(candidate, bound))
        .reduce(|best, candidate| match candidate.partial_cmp(best) {
            Some(Ordering::Greater) => candidate,
            _ => best,
        })
}

impl<V> Constraint<V>
where
    V: Comparable<V> + PartialOrd + Clone,
{
    /// The version this constraint would resolve to among the candidates.
    ///
    /// - `=`, `^`, `~`, `~>`, and `<=` resolve to their own version.
    /// - `>=`, `>`, `<`, and `!=` resolve to the greatest candidate they admit.
    /// - `*` and `latest` resolve to the greatest candidate.
    pub fn resolve(&self, candidates: &[V]) -> Option<V> {
        match self {
            Self::Equal(v)
            | Self::Caret(v)
            | Self::Tilde(v)
            | Self::Pessimistic(v)
            | Self::LessOrEqual(v) => Some(v.clone()),
            Self::GreaterOrEqual(bound)
            | Self::Greater(bound)
            | Self::Less(bound)
            | Self::NotEqual(bound) => {
                highest_matching(candidates, bound, |candidate, _| self.matches(candidate)).cloned()
            }
            Self::Any | Self::Latest => {
                let first = candidates.first()?;
                highest_matching(candidates, first, |_, _| true).cloned()
            }
        }
    }
}

impl<V> Expression<V>
where
    V: Comparable<V> + PartialOrd + Clone,
{
    /// The greatest version that any constraint in the expression resolves to.
    ///
    /// ```
    /// # use bumpreq::{Semver, constraint::parse_expression, version};
    /// let candidates = [version!("1.0.0"), version!("2.1.0"), version!("3.0.0")];
    /// let expr = parse_expression::<Semver>("^1.2.0 || <3.0.0").expect("parse");
    /// assert_eq!(expr.highest_version(&candidates), Some(version!("2.1.0")));
    /// ```
    pub fn highest_version(&self, candidates: &[V]) -> Option<V> {
        let resolved = self
            .constraints()
            .filter_map(|constraint| constraint.resolve(candidates))
            .collect::<Vec<_>>();
        let first = resolved.first()?;
        highest_matching(&resolved, first, |_, _| true).cloned()
    }
}
