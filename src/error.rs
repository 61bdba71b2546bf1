//! Error types for eddy.
//!
//! Every variant is a contract violation: composing two components whose
//! output keys collide, a model not producing what its view declared, a
//! feedback body not returning a looped name. They are programmer errors
//! surfaced as values so the mount call site fails fast and loud; nothing
//! here is retried or recovered from.

use thiserror::Error;

use eddy_reactive::PlaceholderError;

/// Errors raised while composing or mounting components.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    /// Two composed components exposed the same output key
    #[error("duplicate output key `{key}` when merging component outputs")]
    DuplicateKey { key: String },

    /// A model did not return an output its view declared as input
    #[error("model `{model}` did not return output `{key}` declared by its view")]
    MissingModelKey { model: String, key: String },

    /// A feedback body did not return one of its looped names
    #[error("feedback body did not return looped output `{name}`")]
    MissingLoopKey { name: String },

    /// An output record accessor missed
    #[error("no output named `{key}` in record")]
    KeyNotFound { key: String },

    /// An output record accessor found the wrong kind of entry
    #[error("output `{key}` is a {found}, expected a {expected}")]
    KindMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    /// The mount target selector resolved to nothing
    #[error("mount target `{selector}` not found")]
    TargetNotFound { selector: String },

    /// A placeholder was resolved with a nested record, which is not a
    /// reactive value
    #[error("output `{key}` cannot resolve a placeholder (records are not reactive values)")]
    InvalidResolution { key: String },

    /// Placeholder resolution failed (double resolution, self resolution)
    #[error(transparent)]
    Placeholder(#[from] PlaceholderError),
}

/// Result type for eddy operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offender() {
        let err = Error::DuplicateKey { key: "click".into() };
        assert!(err.to_string().contains("click"));

        let err = Error::MissingModelKey { model: "counter".into(), key: "count".into() };
        let message = err.to_string();
        assert!(message.contains("counter"), "the model function must be named");
        assert!(message.contains("count"));

        let err = Error::TargetNotFound { selector: "#app".into() };
        assert!(err.to_string().contains("#app"));
    }

    #[test]
    fn placeholder_errors_convert() {
        let err: Error = PlaceholderError::AlreadyResolved.into();
        assert_eq!(err, Error::Placeholder(PlaceholderError::AlreadyResolved));
    }
}
