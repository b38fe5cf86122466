//! SRV / TXT 查询模块

use hickory_resolver::{
    ResolveError, TokioResolver,
    proto::{ProtoErrorKind, rr::rdata::SRV},
};

use crate::error::{ResolverError, ResolverResult};
use crate::types::{PROTOCOL, SERVICE, SrvTarget};

/// An empty answer (NXDOMAIN or NODATA) is a valid result, not a lookup failure.
fn is_no_records(err: &ResolveError) -> bool {
    err.proto()
        .is_some_and(|proto| matches!(proto.kind(), ProtoErrorKind::NoRecordsFound { .. }))
}

/// Owner name of the OpenCAP service record for `domain`.
pub(crate) fn srv_name(domain: &str) -> String {
    format!("_{SERVICE}._{PROTOCOL}.{domain}")
}

pub(crate) fn srv_to_target(srv: &SRV) -> SrvTarget {
    SrvTarget {
        host: srv.target().to_string().trim_end_matches('.').to_string(),
        port: srv.port(),
        priority: srv.priority(),
        weight: srv.weight(),
    }
}

/// Order targets by priority, keeping the DNS answer order within a priority.
pub(crate) fn order_targets(targets: &mut [SrvTarget]) {
    targets.sort_by_key(|t| t.priority);
}

pub(crate) async fn lookup_srv(
    resolver: &TokioResolver,
    domain: &str,
) -> ResolverResult<Vec<SrvTarget>> {
    let name = srv_name(domain);
    match resolver.srv_lookup(name.as_str()).await {
        Ok(response) => {
            let mut targets: Vec<SrvTarget> = response.iter().map(srv_to_target).collect();
            order_targets(&mut targets);
            Ok(targets)
        }
        Err(e) if is_no_records(&e) => {
            log::debug!("No SRV records published at {name}");
            Ok(Vec::new())
        }
        Err(e) => Err(ResolverError::SrvLookup {
            domain: domain.to_string(),
            message: e.to_string(),
        }),
    }
}

/// Each TXT record is returned as one string, its character-strings joined.
pub(crate) async fn lookup_txt(
    resolver: &TokioResolver,
    domain: &str,
) -> ResolverResult<Vec<String>> {
    match resolver.txt_lookup(domain).await {
        Ok(response) => Ok(response
            .iter()
            .map(|txt| {
                txt.iter()
                    .map(|data| String::from_utf8_lossy(data).to_string())
                    .collect::<String>()
            })
            .collect()),
        Err(e) if is_no_records(&e) => {
            log::debug!("No TXT records published at {domain}");
            Ok(Vec::new())
        }
        Err(e) => Err(ResolverError::TxtLookup {
            domain: domain.to_string(),
            message: e.to_string(),
        }),
    }
}
