//! # Error Types
//!
//! Errors raised while constructing domain values. Runtime evaluation never
//! fails: a missing field is reported as [`MissingFieldError`] and the
//! evaluator treats it as "rule does not apply".

use thiserror::Error;

/// A domain value failed validation at construction time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The login is empty or contains characters GitHub never issues.
    #[error("invalid login {0:?}: must be non-empty and contain no whitespace or '/'")]
    InvalidLogin(String),
}

/// A user record does not carry the requested field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("user {login} has no usable value for field {field:?}")]
pub struct MissingFieldError {
    /// Login of the record that was queried.
    pub login: String,
    /// The field name that was requested.
    pub field: String,
}

/// The filter document could not be turned into a [`crate::FilterRuleSet`].
#[derive(Error, Debug)]
pub enum FilterConfigError {
    /// The document is neither an object nor an empty list.
    #[error("filter document must be a JSON object keyed by field name, got {0}")]
    InvalidDocument(String),

    /// A field name was empty.
    #[error("filter field names must be non-empty")]
    EmptyFieldName,

    /// A field's rule object has the wrong shape (unknown key, non-string pattern, ...).
    #[error("invalid rule for field {field:?}: {source}")]
    InvalidRule {
        /// The field whose rule was malformed.
        field: String,
        /// The underlying decode error.
        source: serde_json::Error,
    },

    /// A pattern failed to compile.
    #[error("invalid {list} pattern {pattern:?} for field {field:?}: {source}")]
    InvalidPattern {
        /// The field the pattern belongs to.
        field: String,
        /// Either `reject` or `allow`.
        list: &'static str,
        /// The pattern source text.
        pattern: String,
        /// The regex compile error.
        source: regex::Error,
    },

    /// The document text is not valid JSON.
    #[error("filter document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
