use std::cmp::Ordering;

use simple_test_case::test_case;

use bumpreq::{channel::*, *};

fn channel(input: &str) -> Channel {
    Channel::parse(input).expect("parse channel")
}

#[test_case("1.72", "1.73", Some(Ordering::Less); "versions")]
#[test_case("1.72", "1.72.0", Some(Ordering::Equal); "missing_patch_is_zero")]
#[test_case("nightly-2023-08-01", "nightly-2023-07-01", Some(Ordering::Greater); "same_stability_dates")]
#[test_case("nightly-2023-08-01", "beta-2023-08-01", None; "different_stability_dates")]
#[test_case("stable", "nightly", Some(Ordering::Greater); "bare_stabilities")]
#[test_case("1.72", "nightly-2023-08-01", None; "version_and_dated")]
#[test_case("1.72", "stable", None; "version_and_stability")]
#[test]
fn ordering(a: &str, b: &str, expected: Option<Ordering>) {
    pretty_assertions::assert_eq!(compare_channels(&channel(a), &channel(b)), expected);
}

#[test_case("my-custom-toolchain"; "custom")]
#[test_case("1"; "major_only")]
#[test_case("nightly-23-08-01"; "short_date")]
#[test_case(""; "empty")]
#[test]
fn unknown(input: &str) {
    pretty_assertions::assert_eq!(Channel::parse(input), None);
    assert!(input.parse::<Channel>().is_err());
}

#[test]
fn incomparable_channels_satisfy_nothing() {
    let bound = version!(RustToolchain => "1.72.0");
    let nightly = version!(RustToolchain => "nightly-2023-08-01");
    for op in [Op::Equal, Op::NotEqual, Op::Less, Op::Greater, Op::GreaterOrEqual] {
        let constraint = Constraint::from_op(op, bound.clone());
        assert!(!constraint.matches(&nightly), "{constraint} should not match {nightly}");
    }
}

#[test]
fn latest_major_minor_release() {
    let current = channel("1.72");
    let candidates = ["1.71.1", "1.72.0", "1.73.0", "1.73.1", "nightly-2023-08-01"].map(channel);
    pretty_assertions::assert_eq!(latest_release(&current, candidates), Some(channel("1.73")));
}

#[test]
fn latest_dated_release() {
    let current = channel("nightly-2023-08-01");
    let candidates = [
        "nightly-2023-07-01",
        "nightly-2023-09-01",
        "beta-2023-10-01",
        "1.80.0",
    ]
    .map(channel);
    pretty_assertions::assert_eq!(
        latest_release(&current, candidates),
        Some(channel("nightly-2023-09-01"))
    );
}

#[test]
fn bare_stability_never_updates() {
    let current = channel("stable");
    pretty_assertions::assert_eq!(filter_releases(&current, [channel("1.80.0")]), vec![]);
}
