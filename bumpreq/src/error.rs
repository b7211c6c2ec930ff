use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Records all errors reported by this library.
///
/// Only version parsing is fallible in the error sense.
/// Malformed constraint expressions and incomparable toolchain channels are
/// routine in third-party manifests, so those surface as `None` instead.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The input does not match the version grammar of the scheme it was parsed with.
    #[error("malformed {scheme} version '{input}': {reason}")]
    #[diagnostic(code(bumpreq::malformed_version))]
    MalformedVersion {
        /// The name of the version scheme.
        scheme: &'static str,

        /// The input originally provided.
        #[source_code]
        input: String,

        /// Why the input was rejected.
        reason: String,

        /// The location of the offending text.
        #[label("here")]
        span: SourceSpan,
    },

    /// The input named a toolchain stability that does not exist.
    #[error("unknown toolchain stability '{0}'")]
    #[diagnostic(code(bumpreq::unknown_stability))]
    UnknownStability(String),
}

impl From<strum::ParseError> for Error {
    fn from(err: strum::ParseError) -> Self {
        Self::UnknownStability(err.to_string())
    }
}

/// Return the span of `substr` inside `text`.
pub(crate) fn span(text: &str, substr: &str) -> (usize, usize) {
    text.find(substr)
        .map(|start| (start, substr.len()))
        .unwrap_or((0, text.len()))
}

/// Construct and return a new [`Error::MalformedVersion`].
///
/// Provide the scheme name and input, along with the part of it that failed and why.
///
/// ```ignore
/// error::malformed!(Semver::NAME, input => (0, 2), "empty segment");
/// ```
macro_rules! malformed {
    ($scheme:expr, $input:expr => $span:expr, $reason:expr) => {
        $crate::error::Error::MalformedVersion {
            scheme: $scheme,
            input: $input.into(),
            span: $span.into(),
            reason: $reason.into(),
        }
    };
}
pub(crate) use malformed;
