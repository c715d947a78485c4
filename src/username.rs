//! Validation of GitHub usernames.
use std::{fmt, str::FromStr};

/// The maximum length of a GitHub username.
const MAX_LENGTH: usize = 39;

/// A validated GitHub username.
///
/// Usernames are 1 to 39 characters long, consist of alphanumeric characters
/// and hyphens, may not begin or end with a hyphen and may not contain
/// consecutive hyphens. Instances can only be created through [`FromStr`],
/// making every username held by the program a valid one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

/// An error describing why a candidate username is invalid.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum InvalidUsername {
    #[error("username cannot be empty")]
    Empty,
    #[error("username may only contain alphanumeric characters and hyphens")]
    InvalidCharacter,
    #[error("username cannot begin or end with a hyphen")]
    HyphenAtBoundary,
    #[error("username cannot be longer than {MAX_LENGTH} characters")]
    TooLong,
    #[error("username cannot contain consecutive hyphens")]
    ConsecutiveHyphens,
}

impl FromStr for Username {
    type Err = InvalidUsername;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(InvalidUsername::Empty);
        }
        if !s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(InvalidUsername::InvalidCharacter);
        }
        if s.starts_with('-') || s.ends_with('-') {
            return Err(InvalidUsername::HyphenAtBoundary);
        }
        if s.len() > MAX_LENGTH {
            return Err(InvalidUsername::TooLong);
        }
        if s.contains("--") {
            return Err(InvalidUsername::ConsecutiveHyphens);
        }
        Ok(Username(s.to_string()))
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Username {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
