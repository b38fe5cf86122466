//! `username$domain` aliases

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{CoreError, CoreResult};

/// Longest accepted username.
pub const MAX_USERNAME_LENGTH: usize = 25;

#[allow(clippy::expect_used)]
static USERNAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^[a-z0-9._-]{{1,{MAX_USERNAME_LENGTH}}}$")).expect("valid username regex")
});

#[allow(clippy::expect_used)]
static DOMAIN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9.\-]+\.[a-z]{2,}$").expect("valid domain regex"));

/// Check a username against the alias rules.
pub fn validate_username(username: &str) -> CoreResult<()> {
    if USERNAME_REGEX.is_match(username) {
        Ok(())
    } else {
        Err(CoreError::ValidationError(format!(
            "Invalid username format: must be 1-{MAX_USERNAME_LENGTH} characters of a-z, 0-9, '.', '_' or '-'"
        )))
    }
}

/// Check a domain against the alias rules.
pub fn validate_alias_domain(domain: &str) -> CoreResult<()> {
    if DOMAIN_REGEX.is_match(domain) {
        Ok(())
    } else {
        Err(CoreError::ValidationError(format!(
            "Invalid domain format: {domain}"
        )))
    }
}

/// A parsed alias.
///
/// Both `alice$example.com` and `alice@example.com` are accepted; `$` wins
/// when both separators appear.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Alias {
    pub username: String,
    pub domain: String,
}

impl Alias {
    pub fn parse(alias: &str) -> CoreResult<Self> {
        let separator = if alias.contains('$') { '$' } else { '@' };
        let parts: Vec<&str> = alias.split(separator).collect();
        let [username, domain] = parts.as_slice() else {
            return Err(CoreError::ValidationError(
                "Incorrect alias format: expected username$domain".to_string(),
            ));
        };

        validate_username(username)?;
        validate_alias_domain(domain)?;

        Ok(Self {
            username: (*username).to_string(),
            domain: (*domain).to_string(),
        })
    }
}

impl FromStr for Alias {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}${}", self.username, self.domain)
    }
}
