#![doc = include_str!("../../README.md")]
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![warn(rust_2018_idioms)]

use std::cmp::Ordering;

pub mod channel;
pub mod constraint;
mod error;
pub mod rewrite;
pub mod version;

pub use channel::{Channel, RustToolchain, Stability, ToolchainVersion};
pub use constraint::{
    Comparable, Constraint, Constraints, Expression, Op, highest_matching, parse_expression,
};
pub use error::Error;
pub use rewrite::{BareVersion, Flavor, Rewrite, Rewriter, Strategy, UpperBoundPolicy};
pub use version::{Opam, Scheme, Semver, TotalOrder, Version, semver::SemverParts};

/// Parse a version in scheme `S`.
///
/// ```
/// # use bumpreq::{Opam, Semver, parse_version};
/// let version = parse_version::<Semver>("v1.2.3").expect("parse");
/// assert_eq!(version.segments(), &[1, 2, 3]);
/// assert!(parse_version::<Semver>("V1.2.3").is_err());
/// assert!(parse_version::<Opam>("1.0~beta").is_ok());
/// ```
pub fn parse_version<S: Scheme>(raw: &str) -> Result<Version<S>, Error> {
    Version::parse(raw)
}

/// Order two versions of a totally ordered scheme.
///
/// ```
/// # use std::cmp::Ordering;
/// # use bumpreq::{compare_versions, version};
/// assert_eq!(compare_versions(&version!("1.6.50"), &version!("1.6.50.bcr.1")), Ordering::Less);
/// assert_eq!(compare_versions(&version!("1.0"), &version!("1.0.0")), Ordering::Equal);
/// ```
pub fn compare_versions<S: TotalOrder>(a: &Version<S>, b: &Version<S>) -> Ordering {
    a.cmp(b)
}

/// Order two toolchain channels, or `None` if they are of different kinds.
///
/// ```
/// # use std::cmp::Ordering;
/// # use bumpreq::{Channel, compare_channels};
/// let version = Channel::parse("1.72").expect("parse");
/// let nightly = Channel::parse("nightly-2023-08-01").expect("parse");
/// assert_eq!(compare_channels(&version, &nightly), None);
/// assert_eq!(compare_channels(&version, &Channel::parse("1.72.0").expect("parse")), Some(Ordering::Equal));
/// ```
pub fn compare_channels(a: &Channel, b: &Channel) -> Option<Ordering> {
    a.partial_cmp(b)
}

/// Parse a requirement string into an [`Expression`].
///
/// Returns `None` for malformed input; see [`parse_expression`].
pub fn parse_constraint_expression<S: Scheme>(expression: &str) -> Option<Expression<Version<S>>> {
    parse_expression::<S>(expression)
}

/// Whether `version` satisfies `constraint`.
///
/// ```
/// # use bumpreq::{constraint, satisfied_by, version};
/// assert!(satisfied_by(&constraint!(Tilde => version!("1.2.3")), &version!("1.2.9")));
/// assert!(!satisfied_by(&constraint!(Tilde => version!("1.2.3")), &version!("1.3.0")));
/// ```
pub fn satisfied_by<V, T>(constraint: &Constraint<V>, version: &T) -> bool
where
    V: Comparable<T>,
{
    constraint.matches(version)
}

/// The greatest candidate satisfying `op` against `bound`.
///
/// ```
/// # use bumpreq::{Op, highest_matching_version, version};
/// let candidates = [version!("1.0.0"), version!("1.4.2"), version!("2.0.0")];
/// let best = highest_matching_version(&candidates, Op::Less, &version!("2.0.0"));
/// assert_eq!(best, Some(version!("1.4.2")));
/// ```
pub fn highest_matching_version<S: Scheme>(
    candidates: &[Version<S>],
    op: Op,
    bound: &Version<S>,
) -> Option<Version<S>> {
    let constraint = Constraint::from_op(op, bound.clone());
    highest_matching(candidates, bound, |candidate, _| constraint.matches(candidate)).cloned()
}

/// Rewrite a requirement so that it admits `target`.
///
/// Never fails: requirements that can't be rewritten are returned unchanged.
///
/// ```
/// # use bumpreq::{Rewriter, rewrite_requirement};
/// assert_eq!(rewrite_requirement(&Rewriter::cargo(), "^1.2.3", "1.5.0"), "^1.5.0");
/// assert_eq!(rewrite_requirement(&Rewriter::cargo(), "<= 0.1.38", "0.1.40"), "<= 0.1.40");
/// assert_eq!(rewrite_requirement(&Rewriter::opam(), "<= 0.1.38", "0.1.40"), "");
/// ```
pub fn rewrite_requirement(rewriter: &Rewriter, original: &str, target: &str) -> String {
    rewriter.rewrite(original, target)
}
