//! # User Records
//!
//! [`Login`] is the identity used for every set operation. [`UserRecord`]
//! pairs it with whatever other attributes the API returned, so filter rules
//! can target any field without a schema change.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{MissingFieldError, ValidationError};

/// A GitHub account login.
///
/// Compared exactly as returned by the API. Both the desired and the actual
/// sets come from the same API, so casing is consistent within a run.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Login(String);

impl Login {
    /// Validate and wrap a login.
    pub fn new(login: impl Into<String>) -> Result<Self, ValidationError> {
        let login = login.into();
        if login.is_empty() || login.contains('/') || login.chars().any(char::is_whitespace) {
            return Err(ValidationError::InvalidLogin(login));
        }
        Ok(Self(login))
    }

    /// Access the login text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Login {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Login> for String {
    fn from(login: Login) -> Self {
        login.0
    }
}

impl AsRef<str> for Login {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Login {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One organization or team member.
///
/// Deserializes directly from a GitHub user object: `login` is lifted out
/// and validated, every other key lands in the attribute map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    login: Login,
    #[serde(flatten)]
    attributes: Map<String, Value>,
}

impl UserRecord {
    /// A record carrying only a login.
    pub fn new(login: Login) -> Self {
        Self {
            login,
            attributes: Map::new(),
        }
    }

    /// A record with additional attributes. A `login` key in `attributes`
    /// is dropped; the typed login always wins.
    pub fn with_attributes(login: Login, mut attributes: Map<String, Value>) -> Self {
        attributes.remove("login");
        Self { login, attributes }
    }

    /// The identity used for set membership.
    pub fn login(&self) -> &Login {
        &self.login
    }

    /// Every attribute other than `login`.
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Whether `field` resolves to a usable value on this record.
    pub fn has_field(&self, field: &str) -> bool {
        self.field(field).is_ok()
    }

    /// Look up a field as text.
    ///
    /// Strings are returned as-is, numbers and booleans by their textual
    /// form. `null`, arrays, objects and absent keys are all missing.
    pub fn field(&self, field: &str) -> Result<Cow<'_, str>, MissingFieldError> {
        if field == "login" {
            return Ok(Cow::Borrowed(self.login.as_str()));
        }
        match self.attributes.get(field) {
            Some(Value::String(s)) => Ok(Cow::Borrowed(s.as_str())),
            Some(Value::Number(n)) => Ok(Cow::Owned(n.to_string())),
            Some(Value::Bool(b)) => Ok(Cow::Owned(b.to_string())),
            _ => Err(MissingFieldError {
                login: self.login.to_string(),
                field: field.to_string(),
            }),
        }
    }

    /// Combine a summary record with a full profile of the same user.
    ///
    /// Profile attributes override summary attributes; the login of `self`
    /// is kept.
    pub fn merged_with(self, profile: UserRecord) -> UserRecord {
        let mut attributes = self.attributes;
        attributes.extend(profile.attributes);
        Self {
            login: self.login,
            attributes,
        }
    }
}
