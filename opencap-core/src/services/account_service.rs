//! Account service
//!
//! Registration, login and account removal.

use std::sync::Arc;

use crate::auth::TokenService;
use crate::crypto;
use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::{validate_alias_domain, validate_username, UserCredential};

/// Account service
pub struct AccountService {
    ctx: Arc<ServiceContext>,
    tokens: Arc<TokenService>,
    pbkdf2_iterations: u32,
}

impl AccountService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>, tokens: Arc<TokenService>) -> Self {
        Self {
            ctx,
            tokens,
            pbkdf2_iterations: crypto::DEFAULT_PBKDF2_ITERATIONS,
        }
    }

    /// Override the PBKDF2 iteration count for new password hashes.
    #[must_use]
    pub fn with_pbkdf2_iterations(mut self, iterations: u32) -> Self {
        self.pbkdf2_iterations = iterations;
        self
    }

    /// Register a user under `domain`.
    ///
    /// The password is hashed here; only the hash reaches the registry.
    pub async fn create_user(&self, domain: &str, username: &str, password: &str) -> CoreResult<()> {
        validate_alias_domain(domain)?;
        validate_username(username)?;
        crypto::validate_password(password)?;

        // PBKDF2 is CPU-bound; keep it off the async workers
        let password = password.to_string();
        let iterations = self.pbkdf2_iterations;
        let password_hash = tokio::task::spawn_blocking(move || {
            crypto::hash_password_with_iterations(&password, iterations)
        })
        .await
        .map_err(|e| CoreError::SerializationError(format!("Task join error: {e}")))?;

        let user = UserCredential {
            domain: domain.to_string(),
            username: username.to_string(),
            password_hash,
        };
        self.ctx.registry.create_user(&user).await?;

        log::info!("User created: {username}${domain}");
        Ok(())
    }

    /// Check a password and issue a bearer token.
    pub async fn login(&self, domain: &str, username: &str, password: &str) -> CoreResult<String> {
        let stored = self
            .ctx
            .registry
            .get_password_hash(domain, username)
            .await?
            .ok_or_else(|| CoreError::UserNotFound(format!("{username}${domain}")))?;

        let password = password.to_string();
        let matches = tokio::task::spawn_blocking(move || crypto::verify_password(&password, &stored))
            .await
            .map_err(|e| CoreError::SerializationError(format!("Task join error: {e}")))??;
        if !matches {
            return Err(CoreError::InvalidCredentials(format!("{username}${domain}")));
        }

        self.tokens.issue_now(domain, username)
    }

    /// Delete a user and every address it owns.
    pub async fn delete_user(&self, domain: &str, username: &str) -> CoreResult<()> {
        if self.ctx.registry.delete_user(domain, username).await? {
            log::info!("User deleted: {username}${domain}");
            Ok(())
        } else {
            Err(CoreError::UserNotFound(format!("{username}${domain}")))
        }
    }
}
