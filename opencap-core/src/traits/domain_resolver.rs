//! Domain discovery abstract Trait

use async_trait::async_trait;

use opencap_resolver::{DomainAdvertisement, OpencapResolver, ResolverResult};

/// Resolves what a domain advertises over DNS.
///
/// No retry and no deadline: the caller imposes both.
#[async_trait]
pub trait DomainResolver: Send + Sync {
    async fn resolve(&self, domain: &str) -> ResolverResult<DomainAdvertisement>;
}

#[async_trait]
impl DomainResolver for OpencapResolver {
    async fn resolve(&self, domain: &str) -> ResolverResult<DomainAdvertisement> {
        OpencapResolver::resolve(self, domain).await
    }
}
