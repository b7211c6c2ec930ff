//! Tests for constraint parsing and evaluation.

use simple_test_case::test_case;

use bumpreq::{Constraint, Constraints, Op, Version, constraint, constraint::*, constraints, version};

#[test_case(constraint!(Caret => version!("1.2.3")), version!("1.9.0"); "1.9.0_caret_1.2.3")]
#[test_case(constraint!(Caret => version!("0.2.3")), version!("0.2.9"); "0.2.9_caret_0.2.3")]
#[test_case(constraint!(Caret => version!("0.0.3")), version!("0.0.5"); "0.0.5_caret_0.0.3")]
#[test_case(constraint!(Caret => version!("0")), version!("0.9.9"); "0.9.9_caret_0")]
#[test_case(constraint!(Caret => version!("0.0.3")), version!("0.0.3"); "0.0.3_caret_0.0.3")]
#[test_case(constraint!(Tilde => version!("1.2.3")), version!("1.2.9"); "1.2.9_tilde_1.2.3")]
#[test_case(constraint!(Tilde => version!("1")), version!("1.9.0"); "1.9.0_tilde_1")]
#[test_case(constraint!(Pessimistic => version!("2.2")), version!("2.9.0"); "2.9.0_pessimistic_2.2")]
#[test_case(constraint!(Pessimistic => version!("2.2.3")), version!("2.2.9"); "2.2.9_pessimistic_2.2.3")]
#[test_case(constraint!(Equal => version!("1.0")), version!("1.0.0"); "1.0.0_equal_1.0")]
#[test_case(constraint!(NotEqual => version!("1.2.3")), version!("1.2.4"); "1.2.4_notequal_1.2.3")]
#[test_case(constraint!(Less => version!("1.2.3")), version!("1.2.3-rc.1"); "1.2.3-rc.1_less_1.2.3")]
#[test_case(constraint!(GreaterOrEqual => version!("1.6.50")), version!("1.6.50.bcr.1"); "bcr_greater_or_equal")]
#[test_case(constraint!(Any), version!("0.0.1"); "any")]
#[test_case(constraint!(Latest), version!("9.9.9"); "latest")]
#[test]
fn matches(constraint: Constraint<Version>, target: Version) {
    assert!(
        constraint.matches(&target),
        "version '{target}' should match constraint '{constraint}'"
    );
}

#[test_case(constraint!(Caret => version!("1.2.3")), version!("2.0.0"); "2.0.0_caret_1.2.3")]
#[test_case(constraint!(Caret => version!("0.2.3")), version!("0.3.0"); "0.3.0_caret_0.2.3")]
#[test_case(constraint!(Caret => version!("0.0.3")), version!("0.1.0"); "0.1.0_caret_0.0.3")]
#[test_case(constraint!(Caret => version!("1.2.3")), version!("1.2.2"); "1.2.2_caret_1.2.3")]
#[test_case(constraint!(Tilde => version!("1.2.3")), version!("1.3.0"); "1.3.0_tilde_1.2.3")]
#[test_case(constraint!(Pessimistic => version!("2.2")), version!("3.0.0"); "3.0.0_pessimistic_2.2")]
#[test_case(constraint!(Pessimistic => version!("2.2.3")), version!("2.3.0"); "2.3.0_pessimistic_2.2.3")]
#[test_case(constraint!(Greater => version!("1.2.3")), version!("1.2.3+build"); "build_metadata_is_equal")]
#[test]
fn rejects(constraint: Constraint<Version>, target: Version) {
    assert!(
        !constraint.matches(&target),
        "version '{target}' should not match constraint '{constraint}'"
    );
}

#[test_case(constraints!({ Greater => version!("1.2.3") }, { Less => version!("2.0.0") }), version!("1.2.4"); "1.2.4_greater_1.2.3_and_less_2.0.0")]
#[test_case(constraints!({ GreaterOrEqual => version!("1.0") }, { NotEqual => version!("1.5.0") }), version!("1.4.0"); "1.4.0_at_least_1.0_not_1.5.0")]
#[test]
fn constraints_all(constraints: Constraints<Version>, target: Version) {
    assert!(
        constraints.all_match(&target),
        "version '{target}' should match all constraints in '{constraints}'"
    );
}

#[test_case(vec![constraints!({ Caret => version!("2.2.3") }), constraints!({ Caret => version!("1.2.3") })], version!("1.2.4"); "1.2.4_caret_1.2.3_or_2.2.3")]
#[test]
fn expression_any_group(groups: Vec<Constraints<Version>>, target: Version) {
    let expression = Expression::from(groups);
    assert!(
        expression.matches(&target),
        "version '{target}' should match at least one group in '{expression}'"
    );
}

#[test_case(">= 1.2.0 < 2", "1.5.0", true; "spaced_range")]
#[test_case(">=1.2.0,<2", "2.0.0", false; "comma_range_upper")]
#[test_case("^1.0.0 || ^2.0.0", "2.3.0", true; "alternatives")]
#[test_case("~> 2.2, >= 2.2.1", "2.2.0", false; "pessimistic_with_floor")]
#[test_case("1.2.3 - 1.4.0", "1.4.0", true; "hyphen_inclusive")]
#[test_case("*", "0.0.1", true; "wildcard")]
#[test_case("latest", "3.0.0", true; "latest")]
#[test_case("", "3.0.0", true; "empty")]
#[test_case("v1.2.3", "1.2.3", true; "prefixed_pin")]
#[test]
fn expressions(input: &str, target: &str, expected: bool) {
    let expression = parse_expression::<bumpreq::Semver>(input).expect("parse expression");
    pretty_assertions::assert_eq!(expression.matches(&version!(target)), expected, "{input} against {target}");
}

#[test_case(">="; "dangling_operator")]
#[test_case(">= < 1.0"; "operator_after_operator")]
#[test_case(">= >=1.2.3"; "operator_before_operator_led_token")]
#[test_case("* 1.0"; "wildcard_then_version")]
#[test_case("^1.0 ||"; "empty_alternative")]
#[test_case(">= 1.0,"; "trailing_comma")]
#[test_case("^1.x"; "x_range")]
#[test_case("V1.2.3"; "uppercase_prefix")]
#[test_case("npm:other@1.0.0"; "alias")]
#[test]
fn malformed(input: &str) {
    pretty_assertions::assert_eq!(parse_expression::<bumpreq::Semver>(input), None);
}

#[test]
fn opam_formula() {
    let formula = opam::parse(r#"{>= "4.08" & < "5.0" & with-test}"#).expect("parse formula");
    assert!(formula.matches(&version!(bumpreq::Opam => "4.14.1")));
    assert!(formula.matches(&version!(bumpreq::Opam => "5.0~alpha1")));
    assert!(!formula.matches(&version!(bumpreq::Opam => "5.0")));
}

#[test]
fn splits_into_tokens() {
    pretty_assertions::assert_eq!(
        split::split(">= 1.2.0, < 2.0.0 || ~> 3.1").expect("split"),
        vec![">=1.2.0", "<2.0.0", "~>3.1"]
    );
}

#[test_case(Op::Less, "2.0.0", Some("2.0.0-rc.1"); "less_admits_prerelease")]
#[test_case(Op::Less, "1.5.0", Some("1.0.0"); "less")]
#[test_case(Op::GreaterOrEqual, "1.0.0", Some("2.0.0"); "greater_or_equal")]
#[test_case(Op::Caret, "1.0.0", Some("1.5.0"); "caret")]
#[test_case(Op::Greater, "2.0.0", None; "nothing_above")]
#[test_case(Op::Any, "0.0.0", Some("2.0.0"); "any")]
#[test]
fn highest_matching_version(op: Op, bound: &str, expected: Option<&str>) {
    let candidates = ["0.9.0", "1.0.0", "1.5.0", "2.0.0-rc.1", "2.0.0"].map(|v| version!(v));
    let best = bumpreq::highest_matching_version(&candidates, op, &version!(bound));
    pretty_assertions::assert_eq!(best.map(|v| v.to_string()), expected.map(String::from));
}

#[test]
fn display() {
    let expression = parse_expression::<bumpreq::Semver>(">= 1.2, < 2 || ^3.0.0").expect("parse");
    pretty_assertions::assert_eq!(expression.to_string(), ">=1.2, <2 || ^3.0.0");
}
