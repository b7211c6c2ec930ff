//! Debian-style versions used by opam.

use std::cmp::Ordering;

use compact_str::CompactString;
use lazy_regex::{regex_captures, regex_is_match};

use super::{Scheme, TotalOrder};
use crate::{Error, error};

/// Versions of OCaml packages, ordered the way Debian orders package versions.
///
/// A version is split into alternating runs of non-digits and digits:
/// - Non-digit runs compare character by character, where `~` sorts below
///   the end of the string, which sorts below letters, which sort below everything else.
/// - Digit runs compare as arbitrarily large integers, so leading zeros are ignored.
///
/// This yields `1.0~beta < 1.0 < 1.0.1` and `~~ < ~ < (empty)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Opam;

impl Scheme for Opam {
    const NAME: &'static str = "opam";
    type Parsed = CompactString;

    fn parse(input: &str) -> Result<Self::Parsed, Error> {
        if input.is_empty() {
            return Err(error::malformed!(Self::NAME, input => (0, 0), "empty version"));
        }
        if !regex_is_match!(r"^[A-Za-z0-9+.~_\-]+$", input) {
            let bad = input
                .char_indices()
                .find(|(_, c)| !(c.is_ascii_alphanumeric() || "+.~_-".contains(*c)))
                .map(|(i, c)| (i, c.len_utf8()))
                .unwrap_or((0, input.len()));
            return Err(error::malformed!(Self::NAME, input => bad, "unexpected character"));
        }
        Ok(CompactString::from(input))
    }

    fn compare(a: &Self::Parsed, b: &Self::Parsed) -> Option<Ordering> {
        Some(Self::total_cmp(a, b))
    }

    fn release(parsed: &Self::Parsed) -> Option<Vec<u64>> {
        let (_, release) = regex_captures!(r"^(\d+(?:\.\d+)*)", parsed.as_str())?;
        release.split('.').map(|s| s.parse().ok()).collect()
    }
}

impl TotalOrder for Opam {
    fn total_cmp(a: &Self::Parsed, b: &Self::Parsed) -> Ordering {
        compare(a, b)
    }
}

/// Compare two opam version strings.
///
/// Unlike [`Version::parse`](crate::Version::parse) this accepts any string,
/// including the empty string, which sorts above anything starting with `~`.
pub fn compare(a: &str, b: &str) -> Ordering {
    let (mut a, mut b) = (a.as_bytes(), b.as_bytes());
    while !a.is_empty() || !b.is_empty() {
        let (a_text, a_rest) = split_run(a, |c| !c.is_ascii_digit());
        let (b_text, b_rest) = split_run(b, |c| !c.is_ascii_digit());
        match compare_text(a_text, b_text) {
            Ordering::Equal => {}
            ord => return ord,
        }

        let (a_num, a_rest) = split_run(a_rest, |c| c.is_ascii_digit());
        let (b_num, b_rest) = split_run(b_rest, |c| c.is_ascii_digit());
        match compare_numeric(a_num, b_num) {
            Ordering::Equal => {}
            ord => return ord,
        }

        a = a_rest;
        b = b_rest;
    }
    Ordering::Equal
}

fn split_run(input: &[u8], pred: impl Fn(&u8) -> bool) -> (&[u8], &[u8]) {
    let end = input.iter().position(|c| !pred(c)).unwrap_or(input.len());
    input.split_at(end)
}

fn weight(c: Option<u8>) -> i32 {
    match c {
        None => 0,
        Some(b'~') => -1,
        Some(c) if c.is_ascii_alphabetic() => i32::from(c),
        Some(c) => i32::from(c) + 256,
    }
}

fn compare_text(a: &[u8], b: &[u8]) -> Ordering {
    let len = a.len().max(b.len());
    (0..len)
        .map(|i| weight(a.get(i).copied()).cmp(&weight(b.get(i).copied())))
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}

fn compare_numeric(a: &[u8], b: &[u8]) -> Ordering {
    let strip = |n: &[u8]| -> usize { n.iter().take_while(|c| **c == b'0').count() };
    let a = &a[strip(a)..];
    let b = &b[strip(b)..];
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
