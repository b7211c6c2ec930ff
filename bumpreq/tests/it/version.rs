use std::cmp::Ordering;

use assert_matches::assert_matches;
use itertools::Itertools;
use simple_test_case::test_case;

use bumpreq::*;

#[test]
fn sorts_mixed_versions() {
    let sorted = ["2.0.0", "1.6.50.bcr.1", "1.6.50.bcr.2-rc.1", "1.0.0-rc.1", "1.6.50", "v1.0.0", "1.10.0", "1.9.9"]
        .into_iter()
        .map(|v| version!(v))
        .sorted()
        .map(|v| v.to_string())
        .collect_vec();
    pretty_assertions::assert_eq!(
        sorted,
        vec!["1.0.0-rc.1", "v1.0.0", "1.6.50.bcr.2-rc.1", "1.6.50", "1.6.50.bcr.1", "1.9.9", "1.10.0", "2.0.0"]
    );
}

#[test_case("1.0~~", "1.0~"; "double_tilde")]
#[test_case("1.0~", "1.0"; "tilde_before_end")]
#[test_case("1.0~beta", "1.0"; "tilde_prerelease")]
#[test_case("1.0", "1.0a"; "end_before_letter")]
#[test_case("1.0a", "1.0+"; "letter_before_symbol")]
#[test_case("1.9", "1.10"; "numeric_runs")]
#[test_case("4.08", "4.14.1"; "leading_zero")]
#[test]
fn opam_ordering(lower: &str, higher: &str) {
    let lower = version!(Opam => lower);
    let higher = version!(Opam => higher);
    pretty_assertions::assert_eq!(compare_versions(&lower, &higher), Ordering::Less, "{lower} < {higher}");
}

#[test]
fn opam_leading_zeros_are_equal() {
    pretty_assertions::assert_eq!(
        compare_versions(&version!(Opam => "1.01"), &version!(Opam => "1.1")),
        Ordering::Equal
    );
}

#[test_case(""; "empty")]
#[test_case("V1.2.3"; "uppercase_prefix")]
#[test_case("1.2.x"; "wildcard")]
#[test_case("latest"; "dist_tag")]
#[test_case("1.2.3 "; "trailing_space")]
#[test]
fn semver_rejects(input: &str) {
    assert_matches!(parse_version::<Semver>(input), Err(Error::MalformedVersion { .. }));
}

#[test_case(""; "empty")]
#[test_case("1.0 beta"; "space")]
#[test_case("1.0\""; "quote")]
#[test]
fn opam_rejects(input: &str) {
    assert_matches!(parse_version::<Opam>(input), Err(Error::MalformedVersion { .. }));
}

#[test]
fn semver_crate_interop() {
    let ours = version!("1.2.3");
    let theirs = semver::Version::parse("1.2.4").expect("parse");
    assert!(constraint!(Caret => ours.clone()).matches(&theirs));
    assert!(constraint!(Less => ours).matches(&semver::Version::parse("1.2.2").expect("parse")));
}

#[test]
fn release_segments() {
    pretty_assertions::assert_eq!(version!("1.2.3-rc.1").release(), Some(vec![1, 2, 3]));
    pretty_assertions::assert_eq!(version!(Opam => "4.14.1~alpha").release(), Some(vec![4, 14, 1]));
    pretty_assertions::assert_eq!(version!(Opam => "dev").release(), None);
}
