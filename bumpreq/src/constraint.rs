//! # Version Constraints
//!
//! A constraint pairs an operator with the version it is anchored on.
//! Constraints compose into [`Constraints`] (an AND group) and [`Expression`] (an OR of AND groups),
//! which is the shape of requirement strings across npm, Cargo, Shards, and friends:
//!
//! ```text
//! >= 1.2, < 2 || ^3.0.0
//! └─ Constraints ─┘    └ Constraints ┘
//! └────────── Expression ────────────┘
//! ```
//!
//! Evaluation is delegated to [`Comparable`], implemented for each version type,
//! so that the same constraint shapes work over every version [`Scheme`](crate::Scheme).
//!
//! ## Parsing
//!
//! - [`split`]: break a requirement string into normalized atomic tokens.
//! - [`atomic`]: turn one token into a [`Constraint`].
//! - [`parse_expression`]: both of the above, producing an [`Expression`].
//! - [`opam`]: opam's `&`/`|` formula syntax.

use std::{cmp::Ordering, fmt};

use derive_new::new;
use documented::Documented;
use enum_assoc::Assoc;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::{
    Scheme, Version,
    version::{Semver, caret_ceiling, compare_segments, pessimistic_ceiling, tilde_ceiling},
};

pub mod atomic;
pub mod opam;
pub mod search;
pub mod split;

pub use search::highest_matching;

/// Compares constraint versions against target versions.
///
/// `Self` is the constraint's version and `V` is the version being tested,
/// so `less` asks whether `v` is less than `self`: the constraint `< 2.0.0`
/// is satisfied by `1.5.0` because `2.0.0.less(1.5.0)` holds.
///
/// Only [`compare`](Comparable::compare) and the range operators must be implemented.
/// When `compare` reports the two as incomparable, every operator is unsatisfied,
/// including `!=`.
pub trait Comparable<V> {
    /// Order `v` relative to `self`, or `None` if they cannot be ordered.
    fn compare(&self, v: &V) -> Option<Ordering>;

    /// Caret (`^`): `v >= self`, below the next major, or the next minor when the major is zero.
    fn caret(&self, v: &V) -> bool;

    /// Tilde (`~`): `v >= self`, below the next minor (or next major if only a major is written).
    fn tilde(&self, v: &V) -> bool;

    /// Pessimistic (`~>`): `v >= self`, below the next bump of the second-to-last written segment.
    fn pessimistic(&self, v: &V) -> bool;

    /// Equal (`=`).
    fn equal(&self, v: &V) -> bool {
        self.compare(v) == Some(Ordering::Equal)
    }

    /// Not equal (`!=`).
    fn not_equal(&self, v: &V) -> bool {
        matches!(self.compare(v), Some(Ordering::Less | Ordering::Greater))
    }

    /// Less than (`<`).
    fn less(&self, v: &V) -> bool {
        self.compare(v) == Some(Ordering::Less)
    }

    /// Less than or equal (`<=`).
    fn less_or_equal(&self, v: &V) -> bool {
        matches!(self.compare(v), Some(Ordering::Less | Ordering::Equal))
    }

    /// Greater than (`>`).
    fn greater(&self, v: &V) -> bool {
        self.compare(v) == Some(Ordering::Greater)
    }

    /// Greater than or equal (`>=`).
    fn greater_or_equal(&self, v: &V) -> bool {
        matches!(self.compare(v), Some(Ordering::Greater | Ordering::Equal))
    }
}

impl<S: Scheme> Comparable<Version<S>> for Version<S> {
    fn compare(&self, v: &Version<S>) -> Option<Ordering> {
        v.partial_cmp(self)
    }

    fn caret(&self, v: &Version<S>) -> bool {
        bounded(self, v, caret_ceiling)
    }

    fn tilde(&self, v: &Version<S>) -> bool {
        bounded(self, v, tilde_ceiling)
    }

    fn pessimistic(&self, v: &Version<S>) -> bool {
        bounded(self, v, pessimistic_ceiling)
    }
}

impl Comparable<::semver::Version> for Version<Semver> {
    fn compare(&self, v: &::semver::Version) -> Option<Ordering> {
        self.compare(&Version::from(v.clone()))
    }

    fn caret(&self, v: &::semver::Version) -> bool {
        self.caret(&Version::from(v.clone()))
    }

    fn tilde(&self, v: &::semver::Version) -> bool {
        self.tilde(&Version::from(v.clone()))
    }

    fn pessimistic(&self, v: &::semver::Version) -> bool {
        self.pessimistic(&Version::from(v.clone()))
    }
}

/// `v >= bound`, and the release of `v` is below `ceiling(release of bound)`.
fn bounded<S: Scheme>(bound: &Version<S>, v: &Version<S>, ceiling: fn(&[u64]) -> Vec<u64>) -> bool {
    if !bound.greater_or_equal(v) {
        return false;
    }
    let (Some(low), Some(release)) = (bound.release(), v.release()) else {
        return false;
    };
    compare_segments(&release, &ceiling(&low)) == Ordering::Less
}

/// The operator of a [`Constraint`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter, Serialize, Deserialize, Assoc,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[func(const fn written(&self) -> &'static str)]
pub enum Op {
    /// `=`
    #[assoc(written = "=")]
    Equal,

    /// `!=`
    #[assoc(written = "!=")]
    NotEqual,

    /// `<`
    #[assoc(written = "<")]
    Less,

    /// `<=`
    #[assoc(written = "<=")]
    LessOrEqual,

    /// `>`
    #[assoc(written = ">")]
    Greater,

    /// `>=`
    #[assoc(written = ">=")]
    GreaterOrEqual,

    /// `^`
    #[assoc(written = "^")]
    Caret,

    /// `~`
    #[assoc(written = "~")]
    Tilde,

    /// `~>`
    #[assoc(written = "~>")]
    Pessimistic,

    /// `*`
    #[assoc(written = "*")]
    Any,

    /// `latest`
    #[assoc(written = "latest")]
    Latest,
}

/// A single version constraint: an operator and, for most operators, a version.
///
/// The serialized form is for transporting this type, not the native syntax
/// used by package managers; use [`parse_expression`] for that.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize, Documented, Assoc)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
#[func(const fn operator(&self) -> Op)]
#[non_exhaustive]
pub enum Constraint<V> {
    /// Exactly equal (`=`).
    #[assoc(operator = Op::Equal)]
    Equal(V),

    /// Anything except (`!=`).
    #[assoc(operator = Op::NotEqual)]
    NotEqual(V),

    /// Strictly below (`<`).
    #[assoc(operator = Op::Less)]
    Less(V),

    /// At or below (`<=`).
    #[assoc(operator = Op::LessOrEqual)]
    LessOrEqual(V),

    /// Strictly above (`>`).
    #[assoc(operator = Op::Greater)]
    Greater(V),

    /// At or above (`>=`).
    #[assoc(operator = Op::GreaterOrEqual)]
    GreaterOrEqual(V),

    /// Compatible updates that keep the major, or the minor below `1.0` (`^`).
    #[assoc(operator = Op::Caret)]
    Caret(V),

    /// Patch-level updates (`~`).
    #[assoc(operator = Op::Tilde)]
    Tilde(V),

    /// Updates that keep every written segment but the last (`~>`).
    #[assoc(operator = Op::Pessimistic)]
    Pessimistic(V),

    /// Any version (`*`).
    #[assoc(operator = Op::Any)]
    Any,

    /// The newest published version (`latest`).
    #[assoc(operator = Op::Latest)]
    Latest,
}

impl Op {
    /// The operator as written in requirements, such as `>=` or `latest`.
    pub const fn symbol(&self) -> &'static str {
        self.written()
    }
}

impl<V> Constraint<V> {
    /// The operator of the constraint.
    pub const fn op(&self) -> Op {
        self.operator()
    }

    /// Build a constraint from an operator and a version.
    ///
    /// The version is discarded for operators that take none.
    pub fn from_op(op: Op, version: V) -> Self {
        match op {
            Op::Equal => Self::Equal(version),
            Op::NotEqual => Self::NotEqual(version),
            Op::Less => Self::Less(version),
            Op::LessOrEqual => Self::LessOrEqual(version),
            Op::Greater => Self::Greater(version),
            Op::GreaterOrEqual => Self::GreaterOrEqual(version),
            Op::Caret => Self::Caret(version),
            Op::Tilde => Self::Tilde(version),
            Op::Pessimistic => Self::Pessimistic(version),
            Op::Any => Self::Any,
            Op::Latest => Self::Latest,
        }
    }

    /// The version the constraint is anchored on, if its operator takes one.
    pub fn version(&self) -> Option<&V> {
        match self {
            Self::Equal(v)
            | Self::NotEqual(v)
            | Self::Less(v)
            | Self::LessOrEqual(v)
            | Self::Greater(v)
            | Self::GreaterOrEqual(v)
            | Self::Caret(v)
            | Self::Tilde(v)
            | Self::Pessimistic(v) => Some(v),
            Self::Any | Self::Latest => None,
        }
    }

    /// Whether the constraint only bounds versions from above.
    pub fn is_upper_bound(&self) -> bool {
        matches!(self, Self::Less(_) | Self::LessOrEqual(_))
    }

    /// Whether the constraint only bounds versions from below.
    pub fn is_lower_bound(&self) -> bool {
        matches!(self, Self::Greater(_) | Self::GreaterOrEqual(_))
    }

    /// Evaluates whether a version satisfies this constraint.
    ///
    /// ```
    /// # use bumpreq::{constraint, version};
    /// let constraint = constraint!(Caret => version!("1.2.3"));
    /// assert!(constraint.matches(&version!("1.9.0")));
    /// assert!(!constraint.matches(&version!("2.0.0")));
    /// ```
    pub fn matches<T>(&self, version: &T) -> bool
    where
        V: Comparable<T>,
    {
        match self {
            Constraint::Equal(s) => s.equal(version),
            Constraint::NotEqual(s) => s.not_equal(version),
            Constraint::Less(s) => s.less(version),
            Constraint::LessOrEqual(s) => s.less_or_equal(version),
            Constraint::Greater(s) => s.greater(version),
            Constraint::GreaterOrEqual(s) => s.greater_or_equal(version),
            Constraint::Caret(s) => s.caret(version),
            Constraint::Tilde(s) => s.tilde(version),
            Constraint::Pessimistic(s) => s.pessimistic(version),
            Constraint::Any | Constraint::Latest => true,
        }
    }
}

impl<V: fmt::Display> fmt::Display for Constraint<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.version() {
            Some(v) => write!(f, "{}{v}", self.op().symbol()),
            None => write!(f, "{}", self.op().symbol()),
        }
    }
}

/// Constraints that must all hold at once.
///
/// An empty group holds for every version.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Documented)]
#[non_exhaustive]
pub struct Constraints<V>(Vec<Constraint<V>>);

impl<V> Constraints<V> {
    /// Iterate over constraints in the set.
    pub fn iter(&self) -> impl Iterator<Item = &Constraint<V>> {
        self.0.iter()
    }

    /// Unpack into an iterator of constraints.
    #[allow(clippy::should_implement_trait)]
    pub fn into_iter(self) -> impl Iterator<Item = Constraint<V>> {
        self.0.into_iter()
    }

    /// The number of constraints in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set holds no constraints.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Evaluates if a version satisfies all constraints in the collection (AND logic).
    ///
    /// ```
    /// # use bumpreq::{constraints, version, Constraints};
    /// let range = constraints!(
    ///     { GreaterOrEqual => version!("1.0.0") },
    ///     { Less => version!("2.0.0") },
    /// );
    /// assert!(range.all_match(&version!("1.5.0")));
    /// assert!(!range.all_match(&version!("2.5.0")));
    /// ```
    pub fn all_match<T>(&self, version: &T) -> bool
    where
        V: Comparable<T>,
    {
        self.iter().all(|constraint| constraint.matches(version))
    }

}

impl<I, T, V> From<I> for Constraints<V>
where
    I: IntoIterator<Item = T>,
    T: Into<Constraint<V>>,
{
    fn from(constraints: I) -> Self {
        Self(constraints.into_iter().map(Into::into).collect())
    }
}

impl<V> From<Constraint<V>> for Constraints<V> {
    fn from(constraint: Constraint<V>) -> Self {
        Self(vec![constraint])
    }
}

impl<V: fmt::Display> fmt::Display for Constraints<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, constraint) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{constraint}")?;
        }
        Ok(())
    }
}

/// A disjunction of [`Constraints`] groups, written `a || b` by most package managers.
///
/// An expression with no groups holds for every version,
/// matching the meaning of an empty requirement string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Documented, new)]
#[non_exhaustive]
pub struct Expression<V>(Vec<Constraints<V>>);

impl<V> Expression<V> {
    /// Iterate over the alternative groups.
    pub fn groups(&self) -> impl Iterator<Item = &Constraints<V>> {
        self.0.iter()
    }

    /// Iterate over every constraint of every group.
    pub fn constraints(&self) -> impl Iterator<Item = &Constraint<V>> {
        self.0.iter().flat_map(Constraints::iter)
    }

    /// Whether the expression has no groups.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether any group is satisfied in full by the version.
    pub fn matches<T>(&self, version: &T) -> bool
    where
        V: Comparable<T>,
    {
        self.is_empty() || self.groups().any(|group| group.all_match(version))
    }
}

impl<V> From<Vec<Constraints<V>>> for Expression<V> {
    fn from(groups: Vec<Constraints<V>>) -> Self {
        Self(groups)
    }
}

impl<V> From<Constraints<V>> for Expression<V> {
    fn from(group: Constraints<V>) -> Self {
        Self(vec![group])
    }
}

impl<V: fmt::Display> fmt::Display for Expression<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, group) in self.groups().enumerate() {
            if i > 0 {
                f.write_str(" || ")?;
            }
            write!(f, "{group}")?;
        }
        Ok(())
    }
}

/// Parse a requirement string into an [`Expression`] over versions of scheme `S`.
///
/// Returns `None` when the string is malformed: a dangling operator, a wildcard
/// followed by more tokens, an empty `||` branch, or a token no pattern recognizes.
/// The empty string parses to the empty expression, which every version satisfies.
///
/// ```
/// # use bumpreq::{Semver, constraint::parse_expression, version};
/// let expr = parse_expression::<Semver>(">= 1.2, < 2 || ^3.0.0").expect("parse");
/// assert!(expr.matches(&version!("1.4.0")));
/// assert!(expr.matches(&version!("3.1.0")));
/// assert!(!expr.matches(&version!("2.5.0")));
/// ```
#[tracing::instrument(level = "debug")]
pub fn parse_expression<S: Scheme>(input: &str) -> Option<Expression<Version<S>>> {
    let groups = split::split_groups(input)?;
    groups
        .iter()
        .map(|tokens| {
            tokens
                .iter()
                .map(|token| atomic::parse_atomic::<S>(token))
                .collect::<Option<Vec<_>>>()
                .map(Constraints::<Version<S>>::from)
        })
        .collect::<Option<Vec<_>>>()
        .map(Expression::<Version<S>>::from)
}

/// Construct a [`Constraint`] from an operator name and a version expression.
///
/// ```
/// # use bumpreq::{Constraint, version};
/// let constraint = bumpreq::constraint!(Tilde => version!("1.2.3"));
/// assert_eq!(constraint, Constraint::Tilde(version!("1.2.3")));
///
/// let any = bumpreq::constraint!(Any);
/// assert_eq!(any, Constraint::<bumpreq::Version>::Any);
/// ```
#[macro_export]
macro_rules! constraint {
    ($variant:ident => $($tail:tt)*) => {
        $crate::Constraint::$variant($($tail)*)
    };
    ($variant:ident) => {
        $crate::Constraint::$variant
    };
}

/// Construct [`Constraints`] from a list of operator/version pairs.
///
/// ```
/// # use bumpreq::{Constraint, Constraints, version};
/// let constraints = bumpreq::constraints!(
///     { GreaterOrEqual => version!("1.0.0") },
///     { Less => version!("2.0.0") },
/// );
/// let expected = Constraints::from(vec![
///     Constraint::GreaterOrEqual(version!("1.0.0")),
///     Constraint::Less(version!("2.0.0")),
/// ]);
/// assert_eq!(constraints, expected);
/// ```
#[macro_export]
macro_rules! constraints {
    ($({ $variant:ident => $($version:tt)* }),* $(,)?) => {
        $crate::Constraints::from(vec![
            $(
                $crate::Constraint::$variant($($version)*)
            ),*
        ])
    };
}
