//! Rewrites semver-style requirement strings, as written by Cargo, npm, Shards, Helm, and Bazel.
//!
//! The requirement is edited clause by clause: each clause keeps its operator and the
//! whitespace after it, and the separators between clauses are carried over untouched.

use itertools::Itertools;
use lazy_regex::{regex, regex_captures, regex_is_match};

use super::{BareVersion, Rewrite, Rewriter, Strategy, UpperBoundPolicy, widen_segments};
use crate::{Comparable, Semver, Version};

/// Segments that match anything.
const WILDCARDS: &[&str] = &["x", "X", "*"];

pub(super) fn rewrite(rewriter: &Rewriter, original: &str, target: &str) -> Rewrite {
    let requirement = original.trim();
    if !requirement.contains(|c: char| c.is_ascii_digit()) {
        tracing::debug!(original, "no version in requirement");
        return Rewrite::Unchanged;
    }
    if regex_is_match!(r"(?:^|[^0-9A-Za-z])V\d", requirement) {
        tracing::debug!(original, "uppercase version prefix");
        return Rewrite::Unchanged;
    }

    let target = match Version::<Semver>::parse(target.trim()) {
        Ok(target) => target,
        Err(err) => {
            tracing::debug!(%err, "target does not parse");
            return Rewrite::Unchanged;
        }
    };

    if requirement.contains("||") {
        rewrite_alternatives(rewriter, requirement, &target)
    } else {
        rewrite_branch(rewriter, requirement, &target)
    }
}

/// Only the last alternative is kept when rewriting, so the result is a single range.
fn rewrite_alternatives(rewriter: &Rewriter, requirement: &str, target: &Version<Semver>) -> Rewrite {
    let branches = requirement.split("||").map(str::trim).collect::<Vec<_>>();
    if branches.iter().any(|branch| branch.is_empty()) {
        tracing::debug!(requirement, "empty alternative");
        return Rewrite::Unchanged;
    }

    if rewriter.strategy() != Strategy::BumpVersions
        && branches
            .iter()
            .any(|branch| branch_satisfied(rewriter, branch, target) == Some(true))
    {
        return Rewrite::Unchanged;
    }

    let Some(last) = branches.last() else {
        return Rewrite::Unchanged;
    };
    if branch_satisfied(rewriter, last, target).is_none() {
        tracing::debug!(branch = last, "alternative does not parse");
        return Rewrite::Unchanged;
    }
    match rewrite_branch(rewriter, last, target) {
        Rewrite::Unchanged => Rewrite::Updated(last.to_string()),
        outcome => outcome,
    }
}

fn rewrite_branch(rewriter: &Rewriter, branch: &str, target: &Version<Semver>) -> Rewrite {
    match HyphenRange::parse(branch) {
        Some(range) => range.rewrite(rewriter, target),
        None => rewrite_group(rewriter, branch, target),
    }
}

fn branch_satisfied(rewriter: &Rewriter, branch: &str, target: &Version<Semver>) -> Option<bool> {
    match HyphenRange::parse(branch) {
        Some(range) => range.satisfied_by(target),
        None => Requirement::parse(branch, rewriter.bare_version())?.satisfied_by(target),
    }
}

fn rewrite_group(rewriter: &Rewriter, group: &str, target: &Version<Semver>) -> Rewrite {
    let Some(requirement) = Requirement::parse(group, rewriter.bare_version()) else {
        return Rewrite::Unchanged;
    };
    let Some(satisfied) = requirement
        .clauses
        .iter()
        .map(|clause| clause.satisfied_by(target))
        .collect::<Option<Vec<_>>>()
    else {
        tracing::debug!(group, "clause version does not parse");
        return Rewrite::Unchanged;
    };

    let bump = rewriter.strategy() == Strategy::BumpVersions;
    let all_satisfied = satisfied.iter().all(|ok| *ok);

    let texts = match requirement.clauses.as_slice() {
        [clause] if clause.kind.is_pin_like() => {
            if !bump && all_satisfied {
                return Rewrite::Unchanged;
            }
            vec![Some(clause.render(&bump_text(clause.version, target)))]
        }
        clauses if bump && all_satisfied && clauses.iter().all(|c| c.kind == Kind::Lower) => clauses
            .iter()
            .map(|clause| match clause.op {
                ">=" => Some(clause.render(&bump_text(clause.version, target))),
                _ => Some(clause.text.to_string()),
            })
            .collect(),
        _ if all_satisfied => return Rewrite::Unchanged,
        clauses => {
            let mut texts = Vec::with_capacity(clauses.len());
            for (clause, ok) in clauses.iter().zip(&satisfied) {
                if *ok {
                    texts.push(Some(clause.text.to_string()));
                    continue;
                }
                let text = match clause.kind {
                    Kind::Upper => match rewriter.upper_bound() {
                        UpperBoundPolicy::Widen => {
                            let Some(widened) = widen_text(clause.op, clause.version, target) else {
                                return Rewrite::Unchanged;
                            };
                            Some(clause.render(&widened))
                        }
                        UpperBoundPolicy::Drop => None,
                    },
                    Kind::Lower if clause.op == ">=" => {
                        Some(clause.render(&bump_text(clause.version, target)))
                    }
                    Kind::Lower | Kind::NotEqual => {
                        tracing::debug!(clause = clause.text, %target, "clause excludes target");
                        return Rewrite::Unfixable;
                    }
                    Kind::Pin | Kind::Caret | Kind::Tilde | Kind::Pessimistic => {
                        Some(clause.render(&bump_text(clause.version, target)))
                    }
                };
                texts.push(text);
            }
            texts
        }
    };

    Rewrite::Updated(requirement.render(texts))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Pin,
    Caret,
    Tilde,
    Pessimistic,
    Lower,
    Upper,
    NotEqual,
}

impl Kind {
    fn of(op: &str, bare: BareVersion) -> Self {
        match op {
            "" => match bare {
                BareVersion::Exact => Self::Pin,
                BareVersion::Caret => Self::Caret,
            },
            "=" | "==" => Self::Pin,
            "^" => Self::Caret,
            "~" => Self::Tilde,
            "~>" => Self::Pessimistic,
            ">" | ">=" => Self::Lower,
            "<" | "<=" => Self::Upper,
            _ => Self::NotEqual,
        }
    }

    fn is_pin_like(self) -> bool {
        matches!(self, Self::Pin | Self::Caret | Self::Tilde | Self::Pessimistic)
    }
}

#[derive(Debug)]
struct Clause<'a> {
    /// The whole clause as written.
    text: &'a str,
    op: &'a str,
    /// Whitespace between the operator and the version.
    gap: &'a str,
    version: &'a str,
    kind: Kind,
}

impl Clause<'_> {
    /// `None` if the version can't be read.
    fn satisfied_by(&self, target: &Version<Semver>) -> Option<bool> {
        let (bound, partial) = lenient(self.version)?;
        let satisfied = match self.kind {
            Kind::Pin if partial => prefix_matches(&bound, target),
            Kind::Pin => bound == *target,
            Kind::Caret => bound.caret(target),
            Kind::Tilde => bound.tilde(target),
            Kind::Pessimistic => bound.pessimistic(target),
            Kind::Lower if self.op == ">" => bound.greater(target),
            Kind::Lower => bound.greater_or_equal(target),
            Kind::Upper if self.op == "<" => bound.less(target),
            Kind::Upper => bound.less_or_equal(target),
            Kind::NotEqual => bound.not_equal(target),
        };
        Some(satisfied)
    }

    fn render(&self, version: &str) -> String {
        format!("{}{}{version}", self.op, self.gap)
    }
}

/// A comma or space separated group of clauses.
#[derive(Debug)]
struct Requirement<'a> {
    clauses: Vec<Clause<'a>>,

    /// The text before each clause, then the text after the last.
    separators: Vec<&'a str>,
}

impl<'a> Requirement<'a> {
    fn parse(text: &'a str, bare: BareVersion) -> Option<Self> {
        let pattern = regex!(
            r"(>=|<=|!=|~>|==|>|<|=|\^|~)?(\s*)(v?\d[0-9A-Za-z.\-_*]*(?:\+[0-9A-Za-z.\-]+)?)"
        );

        let mut clauses = Vec::new();
        let mut separators = Vec::new();
        let mut end = 0;
        for captures in pattern.captures_iter(text) {
            let whole = captures.get(0)?;
            separators.push(separator(text, end, whole.start())?);
            let op = captures.get(1).map_or("", |m| m.as_str());
            clauses.push(Clause {
                text: whole.as_str(),
                op,
                gap: captures.get(2).map_or("", |m| m.as_str()),
                version: captures.get(3)?.as_str(),
                kind: Kind::of(op, bare),
            });
            end = whole.end();
        }
        separators.push(separator(text, end, text.len())?);

        if clauses.is_empty() {
            return None;
        }
        Some(Self {
            clauses,
            separators,
        })
    }

    fn satisfied_by(&self, target: &Version<Semver>) -> Option<bool> {
        self.clauses
            .iter()
            .try_fold(true, |all, clause| Some(all && clause.satisfied_by(target)?))
    }

    /// Reassemble the requirement; a `None` clause is removed along with the separator before it.
    fn render(&self, texts: Vec<Option<String>>) -> String {
        let kept = self
            .separators
            .iter()
            .zip(texts)
            .filter_map(|(separator, text)| text.map(|text| (*separator, text)));

        let mut out = String::new();
        for (i, (separator, text)) in kept.enumerate() {
            if i > 0 {
                out.push_str(separator);
            }
            out.push_str(&text);
        }
        if out.is_empty() {
            return out;
        }

        let leading = self.separators.first().copied().unwrap_or_default();
        let trailing = self.separators.last().copied().unwrap_or_default();
        format!("{leading}{out}{trailing}")
    }
}

fn separator(text: &str, start: usize, end: usize) -> Option<&str> {
    let separator = text.get(start..end)?;
    if regex_is_match!(r#"^[\s,"']*$"#, separator) {
        Some(separator)
    } else {
        tracing::debug!(separator, "unrecognized text between clauses");
        None
    }
}

/// An inclusive npm range, `1.2.3 - 1.4.0`.
#[derive(Debug)]
struct HyphenRange<'a> {
    lead: &'a str,
    low: &'a str,
    dash: &'a str,
    high: &'a str,
    trail: &'a str,
}

impl<'a> HyphenRange<'a> {
    fn parse(text: &'a str) -> Option<Self> {
        let (_, lead, low, dash, high, trail) =
            regex_captures!(r"^(\s*)(\S+)(\s+-\s+)(\S+)(\s*)$", text)?;
        Some(Self {
            lead,
            low,
            dash,
            high,
            trail,
        })
    }

    fn satisfied_by(&self, target: &Version<Semver>) -> Option<bool> {
        let (low, _) = lenient(self.low)?;
        let (high, _) = lenient(self.high)?;
        Some(low.greater_or_equal(target) && high.less_or_equal(target))
    }

    /// Only the upper end moves; a target below the range can't be admitted.
    fn rewrite(&self, rewriter: &Rewriter, target: &Version<Semver>) -> Rewrite {
        if !matches!(
            rewriter.strategy(),
            Strategy::WidenRanges | Strategy::BumpVersions
        ) {
            return Rewrite::Unchanged;
        }
        let (Some((low, _)), Some(_)) = (lenient(self.low), lenient(self.high)) else {
            tracing::debug!(low = self.low, high = self.high, "range bound does not parse");
            return Rewrite::Unchanged;
        };
        if !low.greater_or_equal(target) {
            return Rewrite::Unfixable;
        }
        if self.satisfied_by(target) == Some(true) {
            return Rewrite::Unchanged;
        }
        match widen_text("<", self.high, target) {
            Some(high) => Rewrite::Updated(format!(
                "{}{}{}{high}{}",
                self.lead, self.low, self.dash, self.trail
            )),
            None => Rewrite::Unchanged,
        }
    }
}

/// Read a possibly wildcarded version, cutting it at the first wildcard segment.
///
/// The flag reports whether the version is partial: wildcarded, or with fewer than three segments.
fn lenient(text: &str) -> Option<(Version<Semver>, bool)> {
    let parts = text.split('.').collect::<Vec<_>>();
    let concrete = parts
        .iter()
        .take_while(|part| !WILDCARDS.contains(part))
        .count();
    let head = parts.get(..concrete)?.join(".");
    let version = Version::<Semver>::parse(&head).ok()?;
    let partial = concrete < parts.len() || version.segments().len() < 3;
    Some((version, partial))
}

/// A partial pin like `1.2` admits any release starting with `1.2`.
fn prefix_matches(bound: &Version<Semver>, target: &Version<Semver>) -> bool {
    !target.is_prerelease()
        && bound
            .segments()
            .iter()
            .enumerate()
            .all(|(i, segment)| target.segments().get(i).copied().unwrap_or(0) == *segment)
}

/// Replace `old` with `target`, keeping the written precision, the `v` prefix, and any wildcards.
///
/// Prerelease versions on either side, and BCR targets, are written in full.
fn bump_text(old: &str, target: &Version<Semver>) -> String {
    let (prefix, old) = match old.strip_prefix('v') {
        Some(rest) => ("v", rest),
        None => ("", old),
    };
    let release = target.release_string();
    if regex_is_match!(r"\d-", old) || target.is_prerelease() || target.bcr().is_some() {
        return format!("{prefix}{release}");
    }

    let bumped = old
        .split('.')
        .zip(release.split('.'))
        .map(|(old, new)| if WILDCARDS.contains(&old) { old } else { new })
        .join(".");
    format!("{prefix}{bumped}")
}

/// Move an upper bound up far enough to admit `target`.
///
/// `<=` becomes the target at the written precision.
/// `<` keeps its precision and bumps the target at the position of the bound's
/// last nonzero segment: `< 1.2.0` becomes `< 1.6.0` for `1.5.0`.
fn widen_text(op: &str, bound: &str, target: &Version<Semver>) -> Option<String> {
    let prefix = if bound.starts_with('v') { "v" } else { "" };
    if op == "<=" {
        let bumped = bump_text(bound, target);
        let admits = lenient(&bumped).is_some_and(|(b, _)| b.less_or_equal(target));
        return Some(match admits {
            true => bumped,
            false => format!("{prefix}{}", target.release_string()),
        });
    }

    let (bound, _) = lenient(bound)?;
    let widened = widen_segments(bound.segments(), target.segments()).iter().join(".");
    Some(format!("{prefix}{widened}"))
}
