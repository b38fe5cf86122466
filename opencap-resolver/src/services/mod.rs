//! Domain discovery service.

mod dns;
mod resolver;
mod txt;

pub use txt::parse_advertisement;

use std::net::IpAddr;

use hickory_resolver::TokioResolver;

use crate::error::{ResolverError, ResolverResult};
use crate::types::{DomainAdvertisement, ResolverKeys};

/// Validate and normalise a domain name.
///
/// Trims whitespace, converts internationalised names to ASCII via IDNA 2008
/// and rejects empty or overlong inputs. A trailing root dot is dropped.
pub fn validate_domain(domain: &str) -> ResolverResult<String> {
    let domain = domain.trim().trim_end_matches('.');
    if domain.is_empty() {
        return Err(ResolverError::ValidationError(
            "Domain name is required".to_string(),
        ));
    }
    if domain.parse::<IpAddr>().is_ok() {
        return Err(ResolverError::ValidationError(format!(
            "Expected a domain name, got an IP address: {domain}"
        )));
    }
    let ascii_domain = idna::domain_to_ascii_strict(domain)
        .map_err(|_| ResolverError::ValidationError(format!("Invalid domain name: {domain}")))?;
    if ascii_domain.len() > 253 {
        return Err(ResolverError::ValidationError(format!(
            "Domain name exceeds maximum length of 253 characters (got {})",
            ascii_domain.len()
        )));
    }
    Ok(ascii_domain)
}

/// Locates the authoritative OpenCAP server of a domain and reads its
/// public-key advertisement.
///
/// Stateless apart from the hickory resolver handle; safe to share between
/// concurrent requests. No retry and no deadline is applied here.
///
/// ```rust,no_run
/// use opencap_resolver::{OpencapResolver, ResolverKeys};
/// # async fn demo() -> opencap_resolver::ResolverResult<()> {
/// let resolver = OpencapResolver::new(ResolverKeys::default());
/// let adv = resolver.resolve("example.com").await?;
/// let (host, port) = adv.primary_server();
/// # Ok(())
/// # }
/// ```
pub struct OpencapResolver {
    resolver: TokioResolver,
    keys: ResolverKeys,
}

impl OpencapResolver {
    /// Resolver backed by the host system DNS configuration.
    pub fn new(keys: ResolverKeys) -> Self {
        Self::with_nameserver(None, keys)
    }

    /// Resolver that queries one specific nameserver, or the system
    /// configuration when `nameserver` is `None`.
    pub fn with_nameserver(nameserver: Option<IpAddr>, keys: ResolverKeys) -> Self {
        log::info!(
            "OpenCAP resolver using DNS servers: {}",
            resolver::nameserver_label(nameserver)
        );
        Self {
            resolver: resolver::build_resolver_for_ns(nameserver),
            keys,
        }
    }

    /// TXT key names this resolver looks for.
    pub fn keys(&self) -> &ResolverKeys {
        &self.keys
    }

    /// Resolve the advertisement of `domain`.
    ///
    /// Both the SRV and the TXT lookup must succeed; an empty answer is not a
    /// failure.
    pub async fn resolve(&self, domain: &str) -> ResolverResult<DomainAdvertisement> {
        let domain = validate_domain(domain)?;

        let servers = dns::lookup_srv(&self.resolver, &domain).await?;
        let records = dns::lookup_txt(&self.resolver, &domain).await?;
        let (public_key, dns_signature) = parse_advertisement(&domain, &records, &self.keys)?;

        log::debug!(
            "Resolved {domain}: {} server(s), public key {}, dns signature {dns_signature}",
            servers.len(),
            if public_key.is_some() { "present" } else { "absent" }
        );

        Ok(DomainAdvertisement {
            domain,
            servers,
            public_key,
            dns_signature,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::validate_domain;
    use crate::error::ResolverError;

    #[test]
    fn test_validate_domain_normal() {
        assert_eq!(validate_domain("example.com").unwrap(), "example.com");
    }

    #[test]
    fn test_validate_domain_idn() {
        assert_eq!(validate_domain("münchen.de").unwrap(), "xn--mnchen-3ya.de");
    }

    #[test]
    fn test_validate_domain_trims_whitespace_and_root_dot() {
        assert_eq!(validate_domain("  example.com.  ").unwrap(), "example.com");
    }

    #[test]
    fn test_validate_domain_rejects_ip() {
        assert!(matches!(
            validate_domain("1.2.3.4"),
            Err(ResolverError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_domain_empty() {
        assert!(matches!(
            validate_domain("   "),
            Err(ResolverError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_domain_invalid() {
        assert!(matches!(
            validate_domain("not a valid domain!!!"),
            Err(ResolverError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_domain_too_long() {
        let label = "a".repeat(60);
        let domain = format!("{label}.{label}.{label}.{label}.{label}.com");
        assert!(matches!(
            validate_domain(&domain),
            Err(ResolverError::ValidationError(_))
        ));
    }
}
