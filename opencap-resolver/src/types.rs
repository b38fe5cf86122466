//! Public types returned by domain discovery.

use serde::{Deserialize, Serialize};

/// Port an OpenCAP server listens on when a domain publishes no SRV record.
pub const DEFAULT_PORT: u16 = 41145;

/// Length in bytes of an advertised Ed25519 public key.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// SRV service label queried for every domain.
pub const SERVICE: &str = "opencap";

/// SRV protocol label queried for every domain.
pub const PROTOCOL: &str = "tcp";

fn default_public_key_key() -> String {
    "opencap_key".to_string()
}

fn default_dns_signature_key() -> String {
    "opencap_dnssig".to_string()
}

/// TXT keys that carry the advertisement.
///
/// The key names changed between protocol revisions (`opencap_key` vs `camp`),
/// so they are configuration rather than literals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverKeys {
    /// Key whose value is the hex-encoded public key.
    #[serde(default = "default_public_key_key")]
    pub public_key: String,
    /// Key whose value is `"1"` when the zone is DNS-signed.
    #[serde(default = "default_dns_signature_key")]
    pub dns_signature: String,
}

impl Default for ResolverKeys {
    fn default() -> Self {
        Self {
            public_key: default_public_key_key(),
            dns_signature: default_dns_signature_key(),
        }
    }
}

/// One candidate server taken from an SRV answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrvTarget {
    /// Target host, trailing dot removed.
    pub host: String,
    pub port: u16,
    pub priority: u16,
    pub weight: u16,
}

/// What a domain advertises about its OpenCAP deployment.
///
/// Recomputed on every resolution; never cached here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainAdvertisement {
    /// The queried domain (normalised).
    pub domain: String,
    /// SRV targets, lowest priority value first.
    pub servers: Vec<SrvTarget>,
    /// `None` means the domain advertises no key: callers must revoke any
    /// stored key rather than keep it.
    pub public_key: Option<[u8; PUBLIC_KEY_LENGTH]>,
    /// Whether the DNS-signature flag was published as `"1"`.
    pub dns_signature: bool,
}

impl DomainAdvertisement {
    /// Host and port a client should contact first.
    ///
    /// Falls back to the domain itself on [`DEFAULT_PORT`] when no SRV
    /// record was published.
    pub fn primary_server(&self) -> (&str, u16) {
        self.servers.first().map_or_else(
            || (self.domain.as_str(), DEFAULT_PORT),
            |srv| (srv.host.as_str(), srv.port),
        )
    }

    /// Hex encoding of the advertised key, if any.
    pub fn public_key_hex(&self) -> Option<String> {
        self.public_key.map(hex::encode)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn advertisement(servers: Vec<SrvTarget>) -> DomainAdvertisement {
        DomainAdvertisement {
            domain: "example.com".to_string(),
            servers,
            public_key: None,
            dns_signature: false,
        }
    }

    #[test]
    fn test_primary_server_falls_back_to_domain() {
        let adv = advertisement(Vec::new());
        assert_eq!(adv.primary_server(), ("example.com", 41145));
    }

    #[test]
    fn test_primary_server_uses_first_srv_target() {
        let adv = advertisement(vec![
            SrvTarget {
                host: "cap1.example.com".to_string(),
                port: 443,
                priority: 0,
                weight: 5,
            },
            SrvTarget {
                host: "cap2.example.com".to_string(),
                port: 8443,
                priority: 10,
                weight: 5,
            },
        ]);
        assert_eq!(adv.primary_server(), ("cap1.example.com", 443));
    }

    #[test]
    fn test_default_keys() {
        let keys = ResolverKeys::default();
        assert_eq!(keys.public_key, "opencap_key");
        assert_eq!(keys.dns_signature, "opencap_dnssig");
    }

    #[test]
    fn test_public_key_hex() {
        let mut adv = advertisement(Vec::new());
        assert_eq!(adv.public_key_hex(), None);
        adv.public_key = Some([0xab; PUBLIC_KEY_LENGTH]);
        assert_eq!(adv.public_key_hex().unwrap(), "ab".repeat(32));
    }
}
