//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! distribution resolution failures, unsupported request categories and shape kinds,
//! exhausted shape construction retries, invalid configuration and malformed resource
//! identifiers.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown distribution '{name}'")]
    UnknownDistribution { name: String },

    #[error("invalid parameters for distribution '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("unrecognized shape kind '{kind}': expected points, lines or polygons")]
    UnrecognizedShapeKind { kind: String },

    #[error("unsupported category '{category}'")]
    UnsupportedCategory { category: String },

    #[error("no valid shape after {attempts} attempts")]
    RetryLimitExceeded { attempts: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid resource identifier '{urn}': {reason}")]
    InvalidUrn { urn: String, reason: String },

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub(crate) fn invalid_parameter(name: impl Into<String>, reason: impl ToString) -> Self {
        Error::InvalidParameter {
            name: name.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_string_uses_other_variant() {
        let err: Error = String::from("boom").into();
        matches!(err, Error::Other(_))
            .then_some(())
            .expect("expected Other variant");
    }

    #[test]
    fn from_str_allocates_owned_message() {
        let err: Error = "issue".into();
        assert!(matches!(err, Error::Other(ref msg) if msg == "issue"));
    }

    #[test]
    fn invalid_parameter_renders_name_and_reason() {
        let err = Error::invalid_parameter("gaussian", "expected 0 or 2 parameters, got 3");
        assert_eq!(
            err.to_string(),
            "invalid parameters for distribution 'gaussian': expected 0 or 2 parameters, got 3"
        );
    }
}
