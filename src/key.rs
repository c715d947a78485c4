//! Public keys in the format used by the authorized keys file.
use std::{fmt, str::FromStr};

/// Key types accepted into the authorized keys file.
const KEY_TYPES: [&str; 6] = [
    "ssh-rsa",
    "ssh-dss",
    "ssh-ed25519",
    "ecdsa-sha2-nistp256",
    "ecdsa-sha2-nistp384",
    "ecdsa-sha2-nistp521",
];

/// Width of the found keys listing, truncation point included.
const LISTING_WIDTH: usize = 80;

/// A single key line, `<type> <base64 material> [comment]`.
///
/// The line is kept verbatim and compared as an opaque string; two lines
/// differing only in comment or whitespace are distinct entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AuthorizedKey {
    line: String,
}

/// An error describing why a line is not an acceptable key.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum InvalidKey {
    #[error("key line must contain a type and key material")]
    MissingMaterial,
    #[error("unrecognized key type `{0}`")]
    UnrecognizedType(String),
}

impl FromStr for AuthorizedKey {
    type Err = InvalidKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let Some(key_type) = tokens.next() else {
            return Err(InvalidKey::MissingMaterial);
        };
        if tokens.next().is_none() {
            return Err(InvalidKey::MissingMaterial);
        }
        if !KEY_TYPES.contains(&key_type) {
            return Err(InvalidKey::UnrecognizedType(key_type.to_string()));
        }
        Ok(AuthorizedKey {
            line: s.to_string(),
        })
    }
}

impl fmt::Display for AuthorizedKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.line)
    }
}

impl AuthorizedKey {
    /// The full key line as it appears in the authorized keys file.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.line
    }

    /// The key line shortened to fit a listing.
    #[must_use]
    pub fn truncated(&self) -> String {
        if self.line.chars().count() > LISTING_WIDTH {
            let head: String = self.line.chars().take(LISTING_WIDTH - 3).collect();
            format!("{head}...")
        } else {
            self.line.clone()
        }
    }
}
