//! Account types

use serde::{Deserialize, Serialize};

/// A registered user and its stored password hash.
///
/// `password_hash` is always the PHC-like string produced by
/// [`crate::crypto::hash_password`], never the plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCredential {
    pub domain: String,
    pub username: String,
    pub password_hash: String,
}

/// Identity carried by a verified token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub domain: String,
    pub username: String,
}

impl Principal {
    #[must_use]
    pub fn new(domain: &str, username: &str) -> Self {
        Self {
            domain: domain.to_string(),
            username: username.to_string(),
        }
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}${}", self.username, self.domain)
    }
}
