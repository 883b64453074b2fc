//! User identity anchor.
//!
//! Users are created on first sign-in (or by the demo seed) and never
//! deleted by the tracker.

use super::ModelValidationError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque, stable user identifier.
///
/// Generated ids are UUID v4 text, but values issued by an external
/// identity provider are accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Wraps an externally issued id, rejecting blank values.
    pub fn parse(value: impl Into<String>) -> Result<Self, ModelValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ModelValidationError::BlankUserId);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Generates a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for UserId {
    type Error = ModelValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

/// Stored user profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: Option<String>,
    /// Display name.
    pub name: Option<String>,
    pub image: Option<String>,
}

impl User {
    /// Creates a user with a generated id.
    ///
    /// `email` is trimmed and must not be blank; a blank `name` is stored
    /// as `None`.
    pub fn new(email: &str, name: Option<&str>) -> Result<Self, ModelValidationError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(ModelValidationError::BlankEmail);
        }
        let name = name
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        Ok(Self {
            id: UserId::generate(),
            email: Some(email.to_string()),
            name,
            image: None,
        })
    }
}
