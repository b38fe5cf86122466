//! 统一错误类型定义

use serde::Serialize;
use thiserror::Error;

/// Resolver error type.
///
/// Each lookup reports its own variant so callers can tell which half of the
/// discovery failed.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum ResolverError {
    /// The domain name itself is unusable
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// `_opencap._tcp` SRV lookup failed
    #[error("SRV lookup failed for {domain}: {message}")]
    SrvLookup { domain: String, message: String },

    /// TXT lookup failed
    #[error("TXT lookup failed for {domain}: {message}")]
    TxtLookup { domain: String, message: String },

    /// The advertised public key is not valid hex or has the wrong length
    #[error("Invalid public key advertised by {domain}: {message}")]
    InvalidPublicKey { domain: String, message: String },

    /// The caller-imposed deadline elapsed before both lookups finished
    #[error("Resolution of {domain} timed out after {after_secs}s")]
    Timeout { domain: String, after_secs: u64 },
}

/// Resolver Result 类型别名
pub type ResolverResult<T> = std::result::Result<T, ResolverError>;
