//! Tests for the crate.

use impls::impls;
use simple_test_case::test_case;
use static_assertions::const_assert;

use bumpreq::*;

mod channel;
mod constraint;
mod properties;
mod version;

#[test]
fn thread_safe() {
    const_assert!(impls!(Version<Semver>: Send & Sync));
    const_assert!(impls!(Version<Opam>: Send & Sync));
    const_assert!(impls!(Version<RustToolchain>: Send & Sync));
    const_assert!(impls!(Channel: Send & Sync));
    const_assert!(impls!(Expression<Version<Semver>>: Send & Sync));
    const_assert!(impls!(Rewriter: Send & Sync & Copy));
    const_assert!(impls!(Error: Send & Sync));
}

#[test_case(r#""bump_versions""#, Strategy::BumpVersions; "bump_versions")]
#[test_case(r#""bump_versions_if_necessary""#, Strategy::BumpVersionsIfNecessary; "bump_versions_if_necessary")]
#[test_case(r#""widen_ranges""#, Strategy::WidenRanges; "widen_ranges")]
#[test_case(r#""lockfile_only""#, Strategy::LockfileOnly; "lockfile_only")]
#[test]
fn strategy_serializes(expected: &str, value: Strategy) {
    assert_eq!(expected, serde_json::to_string(&value).unwrap());
}

#[test_case(Rewriter::cargo(); "cargo")]
#[test_case(Rewriter::npm(true); "npm_library")]
#[test_case(Rewriter::opam(); "opam")]
#[test_case(Rewriter::rust_toolchain(); "rust_toolchain")]
#[test]
fn rewriter_roundtrip(rewriter: Rewriter) {
    let serialized = serde_json::to_string(&rewriter).expect("must serialize");
    let deserialized: Rewriter = serde_json::from_str(&serialized).expect("must deserialize");
    assert_eq!(rewriter, deserialized);
}

#[test_case("1.0.0"; "plain")]
#[test_case("v1.2.3"; "prefixed")]
#[test_case("1.6.50.bcr.1"; "bcr")]
#[test_case("1.0.0-rc.10+r1234"; "prerelease_and_build")]
#[test]
fn version_roundtrip(input: &str) {
    let version = version!(input);
    let serialized = serde_json::to_string(&version).expect("must serialize");
    let deserialized: Version = serde_json::from_str(&serialized).expect("must deserialize");
    assert_eq!(version.as_str(), deserialized.as_str());
}
