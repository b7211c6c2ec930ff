//! Parses single normalized tokens, as produced by [`split`](super::split), into constraints.
//!
//! Patterns are tried in a fixed order and the first match wins.
//! The version part of a token must start with a digit (optionally behind a `v`)
//! and is then handed to the version scheme, so a token is only accepted
//! if its version also parses.

use lazy_regex::{Lazy, Regex, lazy_regex};

use super::{Constraint, Op};
use crate::{Scheme, Version};

static EXACT: Lazy<Regex> = lazy_regex!(r"^(v?\d[0-9A-Za-z.+~_\-]*)$");
static CARET: Lazy<Regex> = lazy_regex!(r"^\^(v?\d[0-9A-Za-z.+~_\-]*)$");
static PESSIMISTIC: Lazy<Regex> = lazy_regex!(r"^~>(v?\d[0-9A-Za-z.+~_\-]*)$");
static TILDE: Lazy<Regex> = lazy_regex!(r"^~(v?\d[0-9A-Za-z.+~_\-]*)$");
static GREATER_OR_EQUAL: Lazy<Regex> = lazy_regex!(r"^>=(v?\d[0-9A-Za-z.+~_\-]*)$");
static LESS_OR_EQUAL: Lazy<Regex> = lazy_regex!(r"^<=(v?\d[0-9A-Za-z.+~_\-]*)$");
static GREATER: Lazy<Regex> = lazy_regex!(r"^>(v?\d[0-9A-Za-z.+~_\-]*)$");
static LESS: Lazy<Regex> = lazy_regex!(r"^<(v?\d[0-9A-Za-z.+~_\-]*)$");
static NOT_EQUAL: Lazy<Regex> = lazy_regex!(r"^!=(v?\d[0-9A-Za-z.+~_\-]*)$");
static EQUAL: Lazy<Regex> = lazy_regex!(r"^==?(v?\d[0-9A-Za-z.+~_\-]*)$");
static WILDCARD: Lazy<Regex> = lazy_regex!(r"^[*xX]$");
static LATEST: Lazy<Regex> = lazy_regex!(r"^latest$");

/// The token patterns, in priority order.
///
/// A bare version is an exact pin.
static PATTERNS: [(&Lazy<Regex>, Op); 12] = [
    (&EXACT, Op::Equal),
    (&CARET, Op::Caret),
    (&PESSIMISTIC, Op::Pessimistic),
    (&TILDE, Op::Tilde),
    (&GREATER_OR_EQUAL, Op::GreaterOrEqual),
    (&LESS_OR_EQUAL, Op::LessOrEqual),
    (&GREATER, Op::Greater),
    (&LESS, Op::Less),
    (&NOT_EQUAL, Op::NotEqual),
    (&EQUAL, Op::Equal),
    (&WILDCARD, Op::Any),
    (&LATEST, Op::Latest),
];

/// Parse one normalized token into a constraint over versions of scheme `S`.
///
/// Returns `None` if no pattern matches, or if the version part does not parse.
///
/// ```
/// # use bumpreq::{Constraint, Semver, constraint::atomic::parse_atomic, version};
/// assert_eq!(parse_atomic::<Semver>("^1.2.3"), Some(Constraint::Caret(version!("1.2.3"))));
/// assert_eq!(parse_atomic::<Semver>("*"), Some(Constraint::Any));
/// assert_eq!(parse_atomic::<Semver>(">=x"), None);
/// ```
pub fn parse_atomic<S: Scheme>(token: &str) -> Option<Constraint<Version<S>>> {
    let (captures, op) = PATTERNS
        .iter()
        .find_map(|(pattern, op)| pattern.captures(token).map(|c| (c, *op)))?;

    match captures.get(1) {
        None => Constraint::from_op_without_version(op),
        Some(version) => match Version::<S>::parse(version.as_str()) {
            Ok(version) => Some(Constraint::from_op(op, version)),
            Err(err) => {
                tracing::debug!(token, %err, "token version does not parse");
                None
            }
        },
    }
}

impl<V> Constraint<V> {
    /// Build a constraint for an operator that takes no version.
    pub fn from_op_without_version(op: Op) -> Option<Self> {
        match op {
            Op::Any => Some(Self::Any),
            Op::Latest => Some(Self::Latest),
            _ => None,
        }
    }
}
