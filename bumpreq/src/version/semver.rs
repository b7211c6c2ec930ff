//! Semver-style versions, extended for registry quirks such as BCR revisions.

use std::cmp::Ordering;

use compact_str::{CompactString, ToCompactString};
use nom::{
    IResult, Parser,
    bytes::complete::{tag, take_while1},
    character::complete::{char, digit1},
    combinator::{map_res, opt, recognize},
    multi::separated_list1,
    sequence::preceded,
};

use super::{Scheme, TotalOrder, Version, compare_segments};
use crate::{Error, error};

/// Semantic versions, as used by Cargo, npm, Shards, Elm, and the Bazel Central Registry.
///
/// More permissive than strict SemVer 2.0:
/// - Any number of release segments: `1`, `1.2`, `1.2.3.4`.
/// - An optional leading `v`: `v1.2.3`. Uppercase `V` is rejected.
/// - An optional BCR suffix: `1.6.50.bcr.1`, ordered `1.6.50 < 1.6.50.bcr.1 < 1.6.50.bcr.2`.
///   The prerelease is compared first, so `1.6.50.bcr.1-rc.1 < 1.6.50`.
///
/// Prerelease and build metadata follow SemVer: `1.0.0-rc.1 < 1.0.0`,
/// and build metadata never affects ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Semver;

/// The parsed parts of a [`Semver`] version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemverParts {
    prefixed: bool,
    segments: Vec<u64>,
    bcr: Option<u64>,
    prerelease: Option<CompactString>,
    build: Option<CompactString>,
}

impl Scheme for Semver {
    const NAME: &'static str = "semver";
    type Parsed = SemverParts;

    fn parse(input: &str) -> Result<Self::Parsed, Error> {
        match parts(input) {
            Ok(("", parts)) => Ok(parts),
            Ok((rest, _)) => {
                let offset = input.len() - rest.len();
                Err(error::malformed!(
                    Self::NAME,
                    input => (offset, rest.len()),
                    format!("unexpected trailing text '{rest}'")
                ))
            }
            Err(nom::Err::Error(err) | nom::Err::Failure(err)) => {
                let offset = input.len() - err.input.len();
                Err(error::malformed!(
                    Self::NAME,
                    input => (offset, err.input.len().min(1)),
                    "expected a numeric release segment"
                ))
            }
            Err(nom::Err::Incomplete(_)) => Err(error::malformed!(
                Self::NAME,
                input => (0, input.len()),
                "incomplete version"
            )),
        }
    }

    fn compare(a: &Self::Parsed, b: &Self::Parsed) -> Option<Ordering> {
        Some(Self::total_cmp(a, b))
    }

    fn release(parsed: &Self::Parsed) -> Option<Vec<u64>> {
        Some(parsed.segments.clone())
    }
}

impl TotalOrder for Semver {
    fn total_cmp(a: &Self::Parsed, b: &Self::Parsed) -> Ordering {
        compare_segments(&a.segments, &b.segments)
            .then_with(|| compare_prerelease(a.prerelease.as_deref(), b.prerelease.as_deref()))
            .then_with(|| a.bcr.cmp(&b.bcr))
    }
}

fn parts(input: &str) -> IResult<&str, SemverParts> {
    fn number(input: &str) -> IResult<&str, u64> {
        map_res(digit1, |s: &str| s.parse::<u64>()).parse(input)
    }

    fn identifier(input: &str) -> IResult<&str, &str> {
        take_while1(|c: char| c.is_ascii_alphanumeric() || c == '-').parse(input)
    }

    fn dotted(input: &str) -> IResult<&str, &str> {
        recognize(separated_list1(char('.'), identifier)).parse(input)
    }

    let (input, prefix) = opt(char('v')).parse(input)?;
    let (input, segments) = separated_list1(char('.'), number).parse(input)?;
    let (input, bcr) = opt(preceded(tag(".bcr."), number)).parse(input)?;
    let (input, prerelease) = opt(preceded(char('-'), dotted)).parse(input)?;
    let (input, build) = opt(preceded(char('+'), dotted)).parse(input)?;

    Ok((
        input,
        SemverParts {
            prefixed: prefix.is_some(),
            segments,
            bcr,
            prerelease: prerelease.map(CompactString::from),
            build: build.map(CompactString::from),
        },
    ))
}

/// Releases sort above their prereleases.
/// Identifiers compare pairwise: numeric below alphanumeric, numbers numerically,
/// text lexically, and a shorter run of equal identifiers sorts first.
fn compare_prerelease(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => {
            let mut a = a.split('.');
            let mut b = b.split('.');
            loop {
                match (a.next(), b.next()) {
                    (None, None) => return Ordering::Equal,
                    (None, Some(_)) => return Ordering::Less,
                    (Some(_), None) => return Ordering::Greater,
                    (Some(l), Some(r)) => match compare_identifier(l, r) {
                        Ordering::Equal => continue,
                        ord => return ord,
                    },
                }
            }
        }
    }
}

fn compare_identifier(l: &str, r: &str) -> Ordering {
    match (l.parse::<u64>(), r.parse::<u64>()) {
        (Ok(l), Ok(r)) => l.cmp(&r),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => l.cmp(r),
    }
}

impl Version<Semver> {
    /// The numeric release segments, as written.
    pub fn segments(&self) -> &[u64] {
        &self.parsed.segments
    }

    /// The prerelease tag, without its leading `-`.
    pub fn prerelease(&self) -> Option<&str> {
        self.parsed.prerelease.as_deref()
    }

    /// Whether the version carries a prerelease tag.
    pub fn is_prerelease(&self) -> bool {
        self.parsed.prerelease.is_some()
    }

    /// The build metadata, without its leading `+`.
    pub fn build(&self) -> Option<&str> {
        self.parsed.build.as_deref()
    }

    /// The Bazel Central Registry revision, if any.
    pub fn bcr(&self) -> Option<u64> {
        self.parsed.bcr
    }

    /// Whether the version was written with a leading `v`.
    pub fn has_prefix(&self) -> bool {
        self.parsed.prefixed
    }

    /// The version as it should be written into a requirement:
    /// without a leading `v` and without build metadata.
    pub fn release_string(&self) -> &str {
        let text = self.as_str();
        let text = text.strip_prefix('v').unwrap_or(text);
        text.split_once('+').map(|(head, _)| head).unwrap_or(text)
    }
}

impl From<::semver::Version> for Version<Semver> {
    fn from(version: ::semver::Version) -> Self {
        let parsed = SemverParts {
            prefixed: false,
            segments: vec![version.major, version.minor, version.patch],
            bcr: None,
            prerelease: (!version.pre.is_empty()).then(|| version.pre.as_str().into()),
            build: (!version.build.is_empty()).then(|| version.build.as_str().into()),
        };
        Self {
            parsed,
            input: version.to_compact_string(),
        }
    }
}
