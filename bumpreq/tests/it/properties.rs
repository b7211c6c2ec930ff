use std::cmp::Ordering;

use proptest::prelude::*;

use bumpreq::{Opam, Rewriter, Semver, Version};

/// Regular expression that matches semver-style versions with:
/// - An optional leading `v`
/// - One to four numeric release segments without leading zeros
/// - An optional BCR revision
/// - An optional prerelease of up to three identifiers
const VALID_SEMVER: &str =
    r"v?(0|[1-9][0-9]{0,3})(\.(0|[1-9][0-9]{0,3})){0,3}(\.bcr\.[0-9]{1,2})?(-[0-9A-Za-z]{1,4}(\.[0-9A-Za-z]{1,4}){0,2})?";

/// Regular expression that matches opam versions drawn from a small alphabet,
/// so that equal runs and `~` show up often.
const VALID_OPAM: &str = r"[0-9][0-9a-c.~+]{0,7}";

/// Regular expression that matches plain `major.minor.patch` releases.
const RELEASE: &str = r"(0|[1-9][0-9]?)\.(0|[1-9][0-9]?)\.(0|[1-9][0-9]?)";

/// Regular expression that matches a single-clause requirement on a plain release.
const REQUIREMENT: &str =
    r"(\^|~|=|>=|>|<=|<|!=|~> )?(0|[1-9][0-9]?)\.(0|[1-9][0-9]?)\.(0|[1-9][0-9]?)";

fn semver(input: &str) -> Version<Semver> {
    Version::parse(input).expect("must parse semver")
}

fn opam(input: &str) -> Version<Opam> {
    Version::parse(input).expect("must parse opam")
}

fn presets() -> impl Strategy<Value = Rewriter> {
    prop_oneof![
        Just(Rewriter::cargo()),
        Just(Rewriter::npm(true)),
        Just(Rewriter::npm(false)),
        Just(Rewriter::shards()),
        Just(Rewriter::bazel()),
        Just(Rewriter::elm()),
        Just(Rewriter::opam()),
        Just(Rewriter::rust_toolchain()),
    ]
}

proptest! {
    /// Swapping the operands reverses the ordering, and the partial order agrees with the total one.
    #[test]
    fn semver_antisymmetric(a in VALID_SEMVER, b in VALID_SEMVER) {
        let (a, b) = (semver(&a), semver(&b));
        prop_assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
        prop_assert_eq!(a.partial_cmp(&b), Some(a.cmp(&b)));
    }
}

proptest! {
    #[test]
    fn semver_transitive(a in VALID_SEMVER, b in VALID_SEMVER, c in VALID_SEMVER) {
        let mut sorted = [semver(&a), semver(&b), semver(&c)];
        sorted.sort();
        prop_assert!(sorted[0] <= sorted[2]);
        prop_assert_ne!(sorted[0].cmp(&sorted[2]), Ordering::Greater);
    }
}

proptest! {
    /// `x.y.z < x.y.z.bcr.n < x.y.z.bcr.n+1 < x.y.z+1`
    #[test]
    fn bcr_revisions_sort_between_patches(
        major in 0u64..100,
        minor in 0u64..100,
        patch in 0u64..100,
        revision in 1u64..50,
    ) {
        let release = semver(&format!("{major}.{minor}.{patch}"));
        let revised = semver(&format!("{major}.{minor}.{patch}.bcr.{revision}"));
        let next_revision = semver(&format!("{major}.{minor}.{patch}.bcr.{}", revision + 1));
        let next_patch = semver(&format!("{major}.{minor}.{}", patch + 1));

        prop_assert!(release < revised);
        prop_assert!(revised < next_revision);
        prop_assert!(next_revision < next_patch);
    }
}

proptest! {
    #[test]
    fn opam_antisymmetric(a in VALID_OPAM, b in VALID_OPAM) {
        let (a, b) = (opam(&a), opam(&b));
        prop_assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
    }
}

proptest! {
    #[test]
    fn opam_transitive(a in VALID_OPAM, b in VALID_OPAM, c in VALID_OPAM) {
        let mut sorted = [opam(&a), opam(&b), opam(&c)];
        sorted.sort();
        prop_assert!(sorted[0] <= sorted[1]);
        prop_assert!(sorted[1] <= sorted[2]);
        prop_assert!(sorted[0] <= sorted[2]);
    }
}

proptest! {
    /// Anything after a `~` sorts below the version without it.
    #[test]
    fn opam_tilde_sorts_first(base in VALID_OPAM, suffix in r"[0-9a-c.~+]{0,5}") {
        let base = opam(&base);
        let tilde = opam(&format!("{base}~{suffix}"));
        prop_assert!(tilde < base, "{tilde} should sort below {base}");
    }
}

proptest! {
    /// Rewriting an already rewritten requirement to the same target changes nothing.
    #[test]
    fn rewrite_is_idempotent(rewriter in presets(), original in REQUIREMENT, target in RELEASE) {
        let once = rewriter.rewrite(&original, &target);
        let twice = rewriter.rewrite(&once, &target);
        prop_assert_eq!(&once, &twice, "{:?}: {} -> {} -> {}", rewriter, original, once, twice);
    }
}
