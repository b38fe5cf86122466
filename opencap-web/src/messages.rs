//! Request and response bodies

use std::collections::BTreeMap;

use actix_web::http::StatusCode;
use base64::prelude::*;
use opencap_core::types::{AddressRecord, AddressTypeId, DomainAdvertisement, SrvTarget, SubtypeId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
}

impl ErrorBody {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code: status.as_u16(),
            message: message.into(),
        }
    }
}

/// One address as returned to clients.
#[derive(Debug, Serialize, Deserialize)]
pub struct LookupResponse {
    pub sub_type: SubtypeId,
    /// Base64 of the stored payload
    pub address: String,
    /// Reserved; always empty.
    pub extensions: BTreeMap<String, String>,
}

impl From<&AddressRecord> for LookupResponse {
    fn from(record: &AddressRecord) -> Self {
        Self {
            sub_type: record.subtype,
            address: BASE64_STANDARD.encode(&record.payload),
            extensions: BTreeMap::new(),
        }
    }
}

/// Alias lookup entry when no type was requested.
#[derive(Debug, Serialize, Deserialize)]
pub struct AliasAddressResponse {
    pub address_type: AddressTypeId,
    #[serde(flatten)]
    pub address: LookupResponse,
}

impl From<&AddressRecord> for AliasAddressResponse {
    fn from(record: &AddressRecord) -> Self {
        Self {
            address_type: record.address_type,
            address: LookupResponse::from(record),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AliasQuery {
    pub alias: String,
    pub address_type: Option<AddressTypeId>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateAddressRequest {
    pub sub_type: SubtypeId,
    /// Base64 of the payload
    pub address: String,
}

#[derive(Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub domain: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub jwt: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssociateDomainRequest {
    pub domain: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServerResponse {
    pub host: String,
    pub port: u16,
}

impl From<&SrvTarget> for ServerResponse {
    fn from(target: &SrvTarget) -> Self {
        Self {
            host: target.host.clone(),
            port: target.port,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssociateDomainResponse {
    pub domain: String,
    /// Server clients should contact first
    pub primary: ServerResponse,
    pub servers: Vec<ServerResponse>,
    /// Hex-encoded key, `null` when none is advertised
    pub public_key: Option<String>,
    pub dns_signature: bool,
}

impl From<&DomainAdvertisement> for AssociateDomainResponse {
    fn from(adv: &DomainAdvertisement) -> Self {
        let (host, port) = adv.primary_server();
        Self {
            domain: adv.domain.clone(),
            primary: ServerResponse {
                host: host.to_string(),
                port,
            },
            servers: adv.servers.iter().map(ServerResponse::from).collect(),
            public_key: adv.public_key_hex(),
            dns_signature: adv.dns_signature,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DomainResponse {
    pub domain: String,
    pub public_key: String,
}
