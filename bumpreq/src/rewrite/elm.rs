//! Elm requirements are either an exact version or a range of the form `1.0.0 <= v < 2.0.0`.
//!
//! Ranges that exclude the target are always rewritten in the canonical `<= v <` form.

use lazy_regex::regex_captures;

use super::Rewrite;
use crate::{Comparable, Semver, Version};

pub(super) fn rewrite(original: &str, target: &str) -> Rewrite {
    let Ok(target) = Version::<Semver>::parse(target.trim()) else {
        tracing::debug!(target, "target does not parse");
        return Rewrite::Unchanged;
    };

    if let Some((_, low, lower_op, upper_op, high)) =
        regex_captures!(r"^\s*(\S+?)\s*(<=|<)\s*v\s*(<=|<)\s*(\S+)\s*$", original)
    {
        let (Ok(low), Ok(high)) = (Version::<Semver>::parse(low), Version::<Semver>::parse(high))
        else {
            tracing::debug!(original, "range bound does not parse");
            return Rewrite::Unchanged;
        };

        let above = match lower_op {
            "<=" => low.greater_or_equal(&target),
            _ => low.greater(&target),
        };
        let below = match upper_op {
            "<" => high.less(&target),
            _ => high.less_or_equal(&target),
        };
        if above && below {
            return Rewrite::Unchanged;
        }

        let major = target.segments().first().copied().unwrap_or(0);
        return Rewrite::Updated(format!(
            "{} <= v < {}.0.0",
            target.release_string(),
            major.saturating_add(1)
        ));
    }

    match Version::<Semver>::parse(original.trim()) {
        Ok(current) if current == target => Rewrite::Unchanged,
        Ok(_) => Rewrite::Updated(target.release_string().to_string()),
        Err(_) => {
            tracing::debug!(original, "not an elm requirement");
            Rewrite::Unchanged
        }
    }
}
