//! Unified error type definition

use thiserror::Error;

// Re-export library error type
pub use opencap_resolver::ResolverError;

/// Address validation failures.
///
/// Messages never echo the rejected input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// Characters, length or structure do not fit the address family
    #[error("Invalid address format: {0}")]
    Format(String),

    /// Embedded checksum does not match the computed one
    #[error("Invalid address checksum")]
    Checksum,

    /// Well-formed, but not the requested type (or the type is unknown)
    #[error("Address type mismatch: {0}")]
    TypeMismatch(String),
}

/// Bearer-token and authorization failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authorization header missing or not `Bearer <token>`
    #[error("Malformed authorization header")]
    MalformedHeader,

    /// Token cannot be decoded or its signature does not verify
    #[error("Invalid token: {0}")]
    Invalid(String),

    /// Signature is valid but `exp` lies in the past
    #[error("Token expired")]
    Expired,

    /// Valid token for a different domain or user
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

/// Core layer error type
#[derive(Error, Debug)]
pub enum CoreError {
    /// Address validation error
    #[error(transparent)]
    Address(#[from] AddressError),

    /// Authentication / authorization error
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Malformed alias, username, password or request field
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// User not found
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// Address record not found
    #[error("Address not found: {0}")]
    AddressNotFound(String),

    /// No public key stored for the domain
    #[error("Domain not found: {0}")]
    DomainNotFound(String),

    /// Account already exists
    #[error("Already exists: {0}")]
    Duplicate(String),

    /// Password does not match
    #[error("Invalid credentials for: {0}")]
    InvalidCredentials(String),

    /// DNS discovery error (converted from the resolver library)
    #[error("Resolution error: {0}")]
    Resolution(#[from] ResolverError),

    /// Storage layer error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl CoreError {
    /// Whether it is expected behavior (user input, resource does not exist, etc.) is used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added. **
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::Address(_)
            | Self::Auth(_)
            | Self::ValidationError(_)
            | Self::UserNotFound(_)
            | Self::AddressNotFound(_)
            | Self::DomainNotFound(_)
            | Self::Duplicate(_)
            | Self::InvalidCredentials(_) => true,
            Self::Resolution(ResolverError::ValidationError(_)) => true,
            Self::Resolution(_) | Self::StorageError(_) | Self::SerializationError(_) => false,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
