use std::cmp::Ordering;

use super::Rewrite;
use crate::channel::Channel;

/// Numbered channels keep their precision; dated channels only move within their stability.
/// Nothing is written unless the target is newer than the current channel.
pub(super) fn rewrite(original: &str, target: &str) -> Rewrite {
    let (Some(current), Some(target)) = (Channel::parse(original), Channel::parse(target)) else {
        tracing::debug!(original, target, "not a toolchain channel");
        return Rewrite::Unchanged;
    };

    let written = match (&current, &target) {
        (Channel::Version(current), Channel::Version(target)) if current.is_major_minor() => {
            Channel::Version(target.to_major_minor())
        }
        (Channel::Version(_), Channel::Version(_)) => target.clone(),
        (Channel::Dated { stability: a, .. }, Channel::Dated { stability: b, .. }) if a == b => {
            target.clone()
        }
        _ => {
            tracing::debug!(%current, %target, "channels of different kinds");
            return Rewrite::Unchanged;
        }
    };

    if target.partial_cmp(&current) != Some(Ordering::Greater) {
        tracing::debug!(%current, %target, "target is not newer");
        return Rewrite::Unchanged;
    }
    if written.to_string() == current.to_string() {
        Rewrite::Unchanged
    } else {
        Rewrite::Updated(written.to_string())
    }
}
