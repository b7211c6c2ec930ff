//! # Requirement rewriting
//!
//! Given a requirement as written in a manifest and the version a dependency is being updated to,
//! a [`Rewriter`] produces the requirement that should be written back.
//! It edits the requirement in place, keeping the operators, prefixes, separators, quotes,
//! and precision that were already there, so the resulting diff is as small as possible.
//!
//! ```
//! # use bumpreq::Rewriter;
//! let cargo = Rewriter::cargo();
//! assert_eq!(cargo.rewrite("^1.2.3", "1.5.0"), "^1.5.0");
//! assert_eq!(cargo.rewrite(">= 1.0.0, < 1.2.0", "1.5.0"), ">= 1.0.0, < 1.6.0");
//!
//! let opam = Rewriter::opam();
//! assert_eq!(opam.rewrite(r#">= "4.08" & < "4.14""#, "4.14.1"), r#">= "4.08""#);
//! ```
//!
//! Rewriting never fails: anything that can't be understood is returned unchanged.

use std::cmp::Ordering;

use bon::Builder;
use getset::CopyGetters;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

mod elm;
mod opam;
mod semver;
mod toolchain;

/// When lower bounds and pins are rewritten.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Always move pins and lower bounds to the target.
    #[default]
    BumpVersions,

    /// Rewrite only when the target doesn't already satisfy the requirement.
    BumpVersionsIfNecessary,

    /// Keep everything the requirement already allows, extending it to cover the target.
    WidenRanges,

    /// Never rewrite; only the lockfile changes.
    LockfileOnly,
}

/// What happens to an upper bound that excludes the target.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UpperBoundPolicy {
    /// Move the bound up far enough to admit the target.
    #[default]
    Widen,

    /// Remove the bound.
    Drop,
}

/// How a bare version with no operator is read.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BareVersion {
    /// `1.2.3` means exactly `1.2.3`, as in npm.
    #[default]
    Exact,

    /// `1.2.3` means `^1.2.3`, as in Cargo.
    Caret,
}

/// The requirement syntax being rewritten.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Flavor {
    /// Cargo, npm, Shards, Helm, and Bazel requirement strings.
    #[default]
    Semver,

    /// Elm's `1.0.0 <= v < 2.0.0` ranges and exact pins.
    Elm,

    /// opam formulas.
    Opam,

    /// Rust toolchain channels.
    RustToolchain,
}

/// The result of rewriting a requirement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Rewrite {
    /// The requirement should be replaced with this text.
    Updated(String),

    /// The requirement already admits the target, or can't be understood.
    Unchanged,

    /// The requirement can't be rewritten to admit the target.
    Unfixable,
}

impl Rewrite {
    /// The requirement text to write back, given the original.
    pub fn into_requirement(self, original: &str) -> String {
        match self {
            Self::Updated(updated) => updated,
            Self::Unchanged | Self::Unfixable => original.to_string(),
        }
    }

    /// Whether the rewrite changes the requirement.
    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated(_))
    }
}

/// Rewrites requirements to admit a target version.
///
/// Build one with [`Rewriter::builder`], or start from a preset.
///
/// ```
/// # use bumpreq::{Rewriter, Strategy, BareVersion};
/// let rewriter = Rewriter::builder()
///     .strategy(Strategy::BumpVersionsIfNecessary)
///     .bare_version(BareVersion::Caret)
///     .build();
/// assert_eq!(rewriter.rewrite("1.2.3", "1.5.0"), "1.2.3");
/// assert_eq!(rewriter.rewrite("0.1", "1.5.0"), "1.5");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Builder, CopyGetters, Serialize, Deserialize,
)]
#[getset(get_copy = "pub")]
pub struct Rewriter {
    /// When lower bounds and pins are rewritten.
    #[builder(default)]
    #[serde(default)]
    strategy: Strategy,

    /// What happens to upper bounds that exclude the target.
    #[builder(default)]
    #[serde(default)]
    upper_bound: UpperBoundPolicy,

    /// How bare versions are read.
    #[builder(default)]
    #[serde(default)]
    bare_version: BareVersion,

    /// The requirement syntax.
    #[builder(default)]
    #[serde(default)]
    flavor: Flavor,
}

impl Rewriter {
    /// Cargo: bare versions are caret requirements, and pins follow the target.
    pub fn cargo() -> Self {
        Self::builder()
            .strategy(Strategy::BumpVersions)
            .bare_version(BareVersion::Caret)
            .build()
    }

    /// npm and Yarn: libraries widen their ranges, applications bump them.
    pub fn npm(library: bool) -> Self {
        let strategy = if library {
            Strategy::WidenRanges
        } else {
            Strategy::BumpVersions
        };
        Self::builder().strategy(strategy).build()
    }

    /// Crystal Shards: requirements are only touched when they exclude the target.
    pub fn shards() -> Self {
        Self::builder()
            .strategy(Strategy::BumpVersionsIfNecessary)
            .build()
    }

    /// Bazel modules: exact pins, with `.bcr.N` revisions written out in full.
    ///
    /// Same settings as an npm application; the semver rewriter already
    /// writes BCR revisions verbatim.
    pub fn bazel() -> Self {
        Self::npm(false)
    }

    /// Elm packages.
    pub fn elm() -> Self {
        Self::builder().flavor(Flavor::Elm).build()
    }

    /// opam packages: violated upper bounds are dropped.
    pub fn opam() -> Self {
        Self::builder()
            .strategy(Strategy::BumpVersionsIfNecessary)
            .upper_bound(UpperBoundPolicy::Drop)
            .flavor(Flavor::Opam)
            .build()
    }

    /// Rust toolchain files.
    pub fn rust_toolchain() -> Self {
        Self::builder().flavor(Flavor::RustToolchain).build()
    }

    /// Rewrite `original` to admit `target`, returning the text to write back.
    ///
    /// Returns `original` unchanged when no rewrite is needed or possible.
    pub fn rewrite(&self, original: &str, target: &str) -> String {
        let outcome = self.rewrite_outcome(original, target);
        if outcome == Rewrite::Unfixable {
            tracing::warn!(original, target, "requirement cannot admit target");
        }
        outcome.into_requirement(original)
    }

    /// Rewrite `original` to admit `target`, reporting what happened.
    #[tracing::instrument(level = "debug", skip(self), fields(flavor = %self.flavor, strategy = %self.strategy))]
    pub fn rewrite_outcome(&self, original: &str, target: &str) -> Rewrite {
        if self.strategy == Strategy::LockfileOnly {
            return Rewrite::Unchanged;
        }

        let outcome = match self.flavor {
            Flavor::Semver => semver::rewrite(self, original, target),
            Flavor::Elm => elm::rewrite(original, target),
            Flavor::Opam => opam::rewrite(self, original, target),
            Flavor::RustToolchain => toolchain::rewrite(original, target),
        };

        match outcome {
            Rewrite::Updated(updated) if updated.trim() == original.trim() => Rewrite::Unchanged,
            outcome => outcome,
        }
    }
}

/// The release segments of an exclusive upper bound that admits `target`,
/// written at the precision of `bound`.
///
/// The target is bumped at the position of the bound's last nonzero segment
/// and zero-filled after it.
fn widen_segments(bound: &[u64], target: &[u64]) -> Vec<u64> {
    let index = bound
        .iter()
        .rposition(|segment| *segment != 0)
        .unwrap_or(bound.len().saturating_sub(1));
    (0..bound.len())
        .map(|i| {
            let segment = target.get(i).copied().unwrap_or(0);
            match i.cmp(&index) {
                Ordering::Less => segment,
                Ordering::Equal => segment.saturating_add(1),
                Ordering::Greater => 0,
            }
        })
        .collect()
}
