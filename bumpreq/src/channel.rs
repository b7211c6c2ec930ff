//! # Rust toolchain channels
//!
//! A `rust-toolchain` file names one of:
//! - A version, `1.72` or `1.72.0`.
//! - A dated channel, `nightly-2023-08-01`.
//! - A bare stability, `stable`.
//!
//! Channels of different kinds cannot be ordered against each other,
//! so [`Channel`] implements only [`PartialOrd`].

use std::{cmp::Ordering, fmt, str::FromStr};

use compact_str::{CompactString, ToCompactString};
use enum_assoc::Assoc;
use lazy_regex::regex_captures;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::{Error, Scheme, error, version::compare_segments};

/// The stability of a toolchain channel.
///
/// Ranked `stable > beta > nightly`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
    Assoc,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[func(pub(crate) const fn rank(&self) -> u8)]
pub enum Stability {
    /// Built every night from the default branch.
    #[assoc(rank = 0)]
    Nightly,

    /// The next stable release, in testing.
    #[assoc(rank = 1)]
    Beta,

    /// Released.
    #[assoc(rank = 2)]
    Stable,
}

/// A toolchain version, with or without its patch component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolchainVersion {
    major: u64,
    minor: u64,
    patch: Option<u64>,
}

impl ToolchainVersion {
    /// The major component.
    pub fn major(&self) -> u64 {
        self.major
    }

    /// The minor component.
    pub fn minor(&self) -> u64 {
        self.minor
    }

    /// The patch component, if written.
    pub fn patch(&self) -> Option<u64> {
        self.patch
    }

    /// Whether this version names only `major.minor`.
    pub fn is_major_minor(&self) -> bool {
        self.patch.is_none()
    }

    /// The same version without its patch component.
    pub fn to_major_minor(&self) -> Self {
        Self {
            patch: None,
            ..*self
        }
    }

    /// The components as written.
    pub fn segments(&self) -> Vec<u64> {
        [Some(self.major), Some(self.minor), self.patch]
            .into_iter()
            .flatten()
            .collect()
    }
}

impl fmt::Display for ToolchainVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.patch {
            Some(patch) => write!(f, "{}.{}.{patch}", self.major, self.minor),
            None => write!(f, "{}.{}", self.major, self.minor),
        }
    }
}

/// A Rust toolchain channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
#[non_exhaustive]
pub enum Channel {
    /// A numbered release, `1.72` or `1.72.0`.
    Version(ToolchainVersion),

    /// A dated channel, `nightly-2023-08-01`.
    Dated {
        /// The channel's stability.
        stability: Stability,

        /// The date, in `YYYY-MM-DD` form.
        date: CompactString,
    },

    /// A bare stability, `stable`.
    Stability(Stability),
}

impl Channel {
    /// Parse a toolchain channel.
    ///
    /// Returns `None` for strings that aren't channels; callers treat those as unknown.
    pub fn parse(input: impl AsRef<str>) -> Option<Self> {
        let input = input.as_ref().trim();
        if let Some((_, major, minor, patch)) =
            regex_captures!(r"^(\d+)\.(\d+)(?:\.(\d+))?$", input)
        {
            let patch = match patch {
                "" => None,
                patch => Some(patch.parse().ok()?),
            };
            return Some(Self::Version(ToolchainVersion {
                major: major.parse().ok()?,
                minor: minor.parse().ok()?,
                patch,
            }));
        }
        if let Some((_, stability, date)) =
            regex_captures!(r"^(stable|beta|nightly)-(\d{4}-\d{2}-\d{2})$", input)
        {
            return Some(Self::Dated {
                stability: stability.parse().ok()?,
                date: date.to_compact_string(),
            });
        }
        Stability::from_str(input).ok().map(Self::Stability)
    }

    /// The stability of the channel.
    ///
    /// Numbered releases are always stable.
    pub fn stability(&self) -> Stability {
        match self {
            Self::Version(_) => Stability::Stable,
            Self::Dated { stability, .. } => *stability,
            Self::Stability(stability) => *stability,
        }
    }

    /// The version, if this is a numbered release.
    pub fn version(&self) -> Option<&ToolchainVersion> {
        match self {
            Self::Version(version) => Some(version),
            _ => None,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Version(version) => write!(f, "{version}"),
            Self::Dated { stability, date } => write!(f, "{stability}-{date}"),
            Self::Stability(stability) => write!(f, "{stability}"),
        }
    }
}

impl FromStr for Channel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            error::malformed!(RustToolchain::NAME, s => error::span(s, s.trim()), "not a toolchain channel")
        })
    }
}

impl PartialEq for Channel {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Channel {
    /// - Versions compare numerically, with a missing patch treated as zero.
    /// - Dated channels compare by date when their stabilities match.
    /// - Bare stabilities compare by rank.
    /// - Anything else is incomparable.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Version(a), Self::Version(b)) => {
                Some(compare_segments(&a.segments(), &b.segments()))
            }
            (
                Self::Dated {
                    stability: sa,
                    date: da,
                },
                Self::Dated {
                    stability: sb,
                    date: db,
                },
            ) if sa == sb => Some(da.cmp(db)),
            (Self::Stability(a), Self::Stability(b)) => Some(a.rank().cmp(&b.rank())),
            _ => None,
        }
    }
}

/// Rust toolchain channels as a version [`Scheme`].
///
/// Partially ordered; see [`Channel`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RustToolchain;

impl Scheme for RustToolchain {
    const NAME: &'static str = "rust toolchain";
    type Parsed = Channel;

    fn parse(input: &str) -> Result<Self::Parsed, Error> {
        input.parse()
    }

    fn compare(a: &Self::Parsed, b: &Self::Parsed) -> Option<Ordering> {
        a.partial_cmp(b)
    }

    fn release(parsed: &Self::Parsed) -> Option<Vec<u64>> {
        parsed.version().map(ToolchainVersion::segments)
    }
}

/// Select the candidate releases that are valid updates for the `current` channel.
///
/// - A full version keeps every numbered release.
/// - A `major.minor` version keeps numbered releases collapsed to `major.minor`, deduplicated.
/// - A dated channel keeps dated channels of the same stability.
/// - A bare stability keeps nothing.
pub fn filter_releases(
    current: &Channel,
    candidates: impl IntoIterator<Item = Channel>,
) -> Vec<Channel> {
    let candidates = candidates.into_iter();
    match current {
        Channel::Version(version) if version.is_major_minor() => {
            candidates.fold(Vec::new(), |mut kept, candidate| {
                if let Channel::Version(v) = candidate {
                    let collapsed = Channel::Version(v.to_major_minor());
                    if !kept.contains(&collapsed) {
                        kept.push(collapsed);
                    }
                }
                kept
            })
        }
        Channel::Version(_) => candidates
            .filter(|c| matches!(c, Channel::Version(_)))
            .collect(),
        Channel::Dated { stability, .. } => candidates
            .filter(|c| matches!(c, Channel::Dated { stability: s, .. } if s == stability))
            .collect(),
        Channel::Stability(_) => {
            tracing::debug!(%current, "bare stability channels are never updated");
            Vec::new()
        }
    }
}

/// The greatest candidate that is a valid update for `current` and newer than it.
pub fn latest_release(
    current: &Channel,
    candidates: impl IntoIterator<Item = Channel>,
) -> Option<Channel> {
    filter_releases(current, candidates)
        .into_iter()
        .filter(|c| c.partial_cmp(current) == Some(Ordering::Greater))
        .reduce(|best, c| match c.partial_cmp(&best) {
            Some(Ordering::Greater) => c,
            _ => best,
        })
}
