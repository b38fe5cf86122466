//! Application bootstrap for the OpenCAP server.
//!
//! Provides `AppState` (service container), `AppStateBuilder` (adapter
//! injection) and the storage adapters behind `AddressRegistry`.

pub mod adapters;

use std::sync::Arc;
use std::time::Duration;

use opencap_core::auth::{AuthorizationGate, TokenService};
use opencap_core::crypto::DEFAULT_PBKDF2_ITERATIONS;
use opencap_core::error::{CoreError, CoreResult};
use opencap_core::services::{AccountService, AddressService, DomainService, ServiceContext};
use opencap_core::traits::{AddressRegistry, DomainResolver};

/// Deadline applied to a domain resolution when none is configured.
pub const DEFAULT_RESOLVE_TIMEOUT: Duration = Duration::from_secs(5);

/// Application state shared by every request handler.
///
/// Constructed once at startup via `AppStateBuilder`.
pub struct AppState {
    /// Service context (holds the registry and the resolver)
    pub ctx: Arc<ServiceContext>,
    /// Address lookup and maintenance
    pub address_service: AddressService,
    /// Registration, login and account removal
    pub account_service: AccountService,
    /// Domain association
    pub domain_service: DomainService,
    /// Bearer-token gate for mutating routes
    pub gate: AuthorizationGate,
}

/// Builder for constructing `AppState` with concrete adapters.
///
/// # Required
/// - `registry` — where users, addresses and public keys live
/// - `resolver` — how domains are discovered
/// - `token_service` — token secret, algorithm and lifetime
///
/// # Optional
/// - `resolve_timeout` — defaults to [`DEFAULT_RESOLVE_TIMEOUT`]
/// - `pbkdf2_iterations` — defaults to `DEFAULT_PBKDF2_ITERATIONS`
pub struct AppStateBuilder {
    registry: Option<Arc<dyn AddressRegistry>>,
    resolver: Option<Arc<dyn DomainResolver>>,
    token_service: Option<Arc<TokenService>>,
    resolve_timeout: Duration,
    pbkdf2_iterations: u32,
}

impl AppStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: None,
            resolver: None,
            token_service: None,
            resolve_timeout: DEFAULT_RESOLVE_TIMEOUT,
            pbkdf2_iterations: DEFAULT_PBKDF2_ITERATIONS,
        }
    }

    #[must_use]
    pub fn registry(mut self, registry: Arc<dyn AddressRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    #[must_use]
    pub fn resolver(mut self, resolver: Arc<dyn DomainResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    #[must_use]
    pub fn token_service(mut self, tokens: Arc<TokenService>) -> Self {
        self.token_service = Some(tokens);
        self
    }

    #[must_use]
    pub fn resolve_timeout(mut self, timeout: Duration) -> Self {
        self.resolve_timeout = timeout;
        self
    }

    #[must_use]
    pub fn pbkdf2_iterations(mut self, iterations: u32) -> Self {
        self.pbkdf2_iterations = iterations;
        self
    }

    /// Build the `AppState`.
    ///
    /// # Errors
    /// Returns `CoreError::ValidationError` if required adapters are missing.
    pub fn build(self) -> CoreResult<AppState> {
        let registry = self
            .registry
            .ok_or_else(|| CoreError::ValidationError("registry is required".to_string()))?;
        let resolver = self
            .resolver
            .ok_or_else(|| CoreError::ValidationError("resolver is required".to_string()))?;
        let tokens = self
            .token_service
            .ok_or_else(|| CoreError::ValidationError("token_service is required".to_string()))?;

        let ctx = Arc::new(ServiceContext::new(registry, resolver));

        let address_service = AddressService::new(Arc::clone(&ctx));
        let account_service = AccountService::new(Arc::clone(&ctx), Arc::clone(&tokens))
            .with_pbkdf2_iterations(self.pbkdf2_iterations);
        let domain_service = DomainService::new(Arc::clone(&ctx), self.resolve_timeout);
        let gate = AuthorizationGate::new(tokens);

        Ok(AppState {
            ctx,
            address_service,
            account_service,
            domain_service,
            gate,
        })
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
