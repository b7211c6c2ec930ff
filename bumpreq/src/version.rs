//! # Versions
//!
//! A [`Version`] is a raw version string paired with the parsed form of some [`Scheme`].
//! The scheme decides the grammar and the ordering; the raw string is what gets displayed,
//! which matters to callers doing textual replacement in manifests (leading `v`, `.bcr.N`
//! suffixes and so on must survive untouched).
//!
//! Schemes provided by this crate:
//! - [`Semver`]: dotted numeric releases with optional prerelease, build metadata,
//!   and Bazel Central Registry `.bcr.N` suffixes.
//! - [`Opam`]: Debian-style ordering, where `~` sorts before everything, even the end of the string.
//! - [`RustToolchain`](crate::channel::RustToolchain): toolchain channels, which are only partially ordered.

use std::{cmp::Ordering, fmt::Debug, str::FromStr};

use compact_str::{CompactString, ToCompactString};
use derivative::Derivative;
use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::Error;

pub mod opam;
pub mod semver;

pub use opam::Opam;
pub use semver::Semver;

/// The comparison policy of a package ecosystem.
///
/// Implementations are zero-sized markers; all state lives in [`Scheme::Parsed`].
/// `compare` must return `Some(Ordering::Equal)` when a value is compared with itself.
pub trait Scheme: Copy + Debug + Default + Send + Sync + 'static {
    /// Human readable name, used in diagnostics.
    const NAME: &'static str;

    /// The parsed form of a version in this scheme.
    type Parsed: Clone + Debug + Send + Sync;

    /// Parse the raw input.
    fn parse(input: &str) -> Result<Self::Parsed, Error>;

    /// Order `a` relative to `b`, or `None` if they cannot be ordered.
    fn compare(a: &Self::Parsed, b: &Self::Parsed) -> Option<Ordering>;

    /// The leading numeric release segments, as written.
    ///
    /// Used to compute caret, tilde, and pessimistic upper bounds.
    /// Schemes whose values have no numeric release return `None`.
    fn release(parsed: &Self::Parsed) -> Option<Vec<u64>>;
}

/// Marker for schemes whose ordering is total.
pub trait TotalOrder: Scheme {
    /// Order `a` relative to `b`.
    fn total_cmp(a: &Self::Parsed, b: &Self::Parsed) -> Ordering;
}

/// A parsed version, generic over its [`Scheme`].
///
/// Comparison and equality go through the scheme, so `1.0` and `1.0.0` are equal
/// under [`Semver`] even though they display differently.
#[derive(Derivative, Display)]
#[derivative(Clone(bound = ""), Debug(bound = ""))]
#[display("{input}")]
pub struct Version<S: Scheme = Semver> {
    /// The parsed version.
    pub(crate) parsed: S::Parsed,

    /// The original input, displayed verbatim.
    pub(crate) input: CompactString,
}

impl<S: Scheme> Version<S> {
    /// Parse the input string according to the scheme.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, Error> {
        let input = input.as_ref();
        let parsed = S::parse(input)?;
        Ok(Self {
            parsed,
            input: input.to_compact_string(),
        })
    }

    /// View the original input as a string.
    pub fn as_str(&self) -> &str {
        self.input.as_str()
    }

    /// View the parsed form.
    pub fn parsed(&self) -> &S::Parsed {
        &self.parsed
    }

    /// The leading numeric release segments, if the scheme has any.
    pub fn release(&self) -> Option<Vec<u64>> {
        S::release(&self.parsed)
    }
}

impl<S: Scheme> PartialEq for Version<S> {
    fn eq(&self, other: &Self) -> bool {
        S::compare(&self.parsed, &other.parsed) == Some(Ordering::Equal)
    }
}

impl<S: Scheme> Eq for Version<S> {}

impl<S: Scheme> PartialOrd for Version<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        S::compare(&self.parsed, &other.parsed)
    }
}

impl<S: TotalOrder> Ord for Version<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        S::total_cmp(&self.parsed, &other.parsed)
    }
}

impl<S: Scheme> FromStr for Version<S> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<S: Scheme> TryFrom<&str> for Version<S> {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl<S: Scheme> TryFrom<String> for Version<S> {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl<S: Scheme> AsRef<str> for Version<S> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl<S: Scheme> Serialize for Version<S> {
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: serde::Serializer,
    {
        self.as_str().serialize(serializer)
    }
}

impl<'de, S: Scheme> Deserialize<'de> for Version<S> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(s).map_err(serde::de::Error::custom)
    }
}

/// Compare two numeric release sequences, treating missing trailing segments as zero.
pub(crate) fn compare_segments(a: &[u64], b: &[u64]) -> Ordering {
    let len = a.len().max(b.len());
    (0..len)
        .map(|i| {
            let l = a.get(i).copied().unwrap_or(0);
            let r = b.get(i).copied().unwrap_or(0);
            l.cmp(&r)
        })
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Exclusive upper bound for a caret requirement on `segments`.
///
/// Bumps the major segment, or the minor segment when the major is zero:
/// `^1.2.3` stops at `2`, `^0.2.3` and `^0.2` at `0.3`, `^0.0.3` at `0.1`, and a bare `^0` at `1`.
pub(crate) fn caret_ceiling(segments: &[u64]) -> Vec<u64> {
    let index = match segments {
        [0, _, ..] => 1,
        _ => 0,
    };
    bump_at(segments, index)
}

/// Exclusive upper bound for a tilde requirement on `segments`.
///
/// `~1.2.3` stops at `1.3`, `~1` stops at `2`.
pub(crate) fn tilde_ceiling(segments: &[u64]) -> Vec<u64> {
    let index = if segments.len() >= 2 { 1 } else { 0 };
    bump_at(segments, index)
}

/// Exclusive upper bound for a pessimistic (`~>`) requirement on `segments`.
///
/// Drops the last written segment and bumps the new last one:
/// `~> 2.2` stops at `3`, `~> 2.2.3` stops at `2.3`.
pub(crate) fn pessimistic_ceiling(segments: &[u64]) -> Vec<u64> {
    let index = segments.len().saturating_sub(2);
    bump_at(segments, index)
}

fn bump_at(segments: &[u64], index: usize) -> Vec<u64> {
    let mut ceiling = segments
        .iter()
        .take(index + 1)
        .copied()
        .collect::<Vec<_>>();
    match ceiling.last_mut() {
        Some(last) => *last = last.saturating_add(1),
        None => ceiling.push(1),
    }
    ceiling
}

/// Create a [`Version`] from a literal, panicking if it does not parse.
///
/// Intended for tests and examples.
///
/// ```
/// # use bumpreq::{Version, Opam};
/// let version = bumpreq::version!("1.2.3");
/// assert_eq!(version.as_str(), "1.2.3");
///
/// let version = bumpreq::version!(Opam => "1.0~beta");
/// assert!(version < bumpreq::version!(Opam => "1.0"));
/// ```
#[macro_export]
macro_rules! version {
    ($scheme:ty => $input:expr) => {
        $crate::Version::<$scheme>::parse($input).expect("parse version")
    };
    ($input:expr) => {
        $crate::Version::<$crate::Semver>::parse($input).expect("parse version")
    };
}
