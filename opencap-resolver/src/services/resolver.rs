//! Construction of the underlying hickory resolver.

use std::net::IpAddr;

use hickory_resolver::{
    TokioResolver,
    config::{NameServerConfigGroup, ResolverConfig, ResolverOpts},
    name_server::TokioConnectionProvider,
};

/// Deduplicate nameserver IP addresses from a resolver configuration.
pub(crate) fn dedup_ips(config: &ResolverConfig) -> Vec<String> {
    let mut ips: Vec<String> = Vec::new();
    for ns in config.name_servers() {
        let ip = ns.socket_addr.ip().to_string();
        if !ips.contains(&ip) {
            ips.push(ip);
        }
    }
    ips
}

/// Human-readable description of the nameservers a resolver will use.
pub(crate) fn nameserver_label(ns_ip: Option<IpAddr>) -> String {
    if let Some(ip) = ns_ip {
        return ip.to_string();
    }

    #[cfg(any(unix, target_os = "windows"))]
    {
        if let Ok((config, _opts)) = hickory_resolver::system_conf::read_system_conf() {
            let ips = dedup_ips(&config);
            if !ips.is_empty() {
                return ips.join(", ");
            }
        }
    }

    let ips = dedup_ips(&ResolverConfig::default());
    if ips.is_empty() {
        "Default".to_string()
    } else {
        ips.join(", ")
    }
}

/// Build a resolver that targets a specific nameserver IP, or falls back to the
/// system configuration when `ns_ip` is `None`.
pub(crate) fn build_resolver_for_ns(ns_ip: Option<IpAddr>) -> TokioResolver {
    if let Some(ns_ip) = ns_ip {
        let config = ResolverConfig::from_parts(
            None,
            vec![],
            NameServerConfigGroup::from_ips_clear(&[ns_ip], 53, true),
        );
        return TokioResolver::builder_with_config(config, TokioConnectionProvider::default())
            .with_options(ResolverOpts::default())
            .build();
    }

    build_system_resolver()
}

/// Build a resolver using the host system DNS configuration (with fallback).
///
/// Falls back to hickory's default upstream set when `/etc/resolv.conf` (or the
/// platform equivalent) cannot be read.
fn build_system_resolver() -> TokioResolver {
    #[cfg(any(unix, target_os = "windows"))]
    {
        match TokioResolver::builder_tokio() {
            Ok(builder) => return builder.build(),
            Err(e) => {
                log::warn!(
                    "Failed to load system DNS configuration, falling back to defaults: {e}"
                );
            }
        }
    }

    TokioResolver::builder_with_config(
        ResolverConfig::default(),
        TokioConnectionProvider::default(),
    )
    .with_options(ResolverOpts::default())
    .build()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_ips_default_config() {
        let ips = dedup_ips(&ResolverConfig::default());
        assert!(!ips.is_empty());
    }

    #[test]
    fn test_dedup_ips_empty_config() {
        let config = ResolverConfig::from_parts(None, vec![], NameServerConfigGroup::new());
        assert!(dedup_ips(&config).is_empty());
    }

    #[test]
    fn test_dedup_ips_removes_duplicates() {
        let ip: IpAddr = "1.2.3.4".parse().unwrap();
        let ns_group = NameServerConfigGroup::from_ips_clear(&[ip, ip], 53, true);
        let config = ResolverConfig::from_parts(None, vec![], ns_group);
        let ips = dedup_ips(&config);
        assert_eq!(ips.iter().filter(|&x| x == "1.2.3.4").count(), 1);
    }

    #[test]
    fn test_nameserver_label_explicit_ip() {
        let ip: IpAddr = "9.9.9.9".parse().unwrap();
        assert_eq!(nameserver_label(Some(ip)), "9.9.9.9");
    }

    #[test]
    fn test_nameserver_label_system_not_empty() {
        assert!(!nameserver_label(None).is_empty());
    }
}
