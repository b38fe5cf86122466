//! Authorization gate for mutating operations
//!
//! The checks compose in a fixed order: [`AuthorizationGate::authenticate`]
//! turns the `Authorization` header into a [`Principal`], then
//! [`AuthorizationGate::authorize`] compares it with the operation's target.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::token::TokenService;
use crate::error::AuthError;
use crate::types::Principal;

const BEARER_PREFIX: &str = "Bearer ";

/// Extract the token from a `Bearer <token>` header value.
pub fn parse_bearer(header: Option<&str>) -> Result<&str, AuthError> {
    header
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MalformedHeader)
}

/// Wraps a [`TokenService`] with header parsing and target matching.
#[derive(Debug, Clone)]
pub struct AuthorizationGate {
    tokens: Arc<TokenService>,
}

impl AuthorizationGate {
    #[must_use]
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }

    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Parse and validate the header, yielding the token's identity.
    pub fn authenticate(
        &self,
        header: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Principal, AuthError> {
        let token = parse_bearer(header)?;
        let claims = self.tokens.validate(token, now)?;
        Ok(claims.principal())
    }

    /// Require the principal to own the target `(domain, username)`.
    pub fn authorize(principal: &Principal, domain: &str, username: &str) -> Result<(), AuthError> {
        if principal.domain != domain {
            return Err(AuthError::Unauthorized("Domains do not match".to_string()));
        }
        if principal.username != username {
            return Err(AuthError::Unauthorized(
                "Usernames do not match".to_string(),
            ));
        }
        Ok(())
    }

    /// Authenticate, then authorize against the target.
    pub fn guard(
        &self,
        header: Option<&str>,
        domain: &str,
        username: &str,
        now: DateTime<Utc>,
    ) -> Result<Principal, AuthError> {
        let principal = self.authenticate(header, now)?;
        Self::authorize(&principal, domain, username)?;
        Ok(principal)
    }
}
