//! Signed, expiring bearer tokens
//!
//! Tokens use the JWT compact form (`header.claims.signature`, base64url
//! without padding) with an HMAC signature, so standard JWT tooling can
//! inspect them.

use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD as BASE64URL, Engine};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::{Sha256, Sha384, Sha512};

use crate::error::{AuthError, CoreError, CoreResult};
use crate::types::Principal;

/// Token lifetime used when none is configured.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 600;

/// Longest accepted token lifetime (one year).
pub const MAX_TOKEN_TTL_SECS: i64 = 365 * 24 * 60 * 60;

/// HMAC variant used to sign tokens. Fixed per `TokenService`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SigningAlgorithm {
    #[default]
    HS256,
    HS384,
    HS512,
}

impl SigningAlgorithm {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HS256 => "HS256",
            Self::HS384 => "HS384",
            Self::HS512 => "HS512",
        }
    }
}

impl fmt::Display for SigningAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SigningAlgorithm {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "HS256" => Ok(Self::HS256),
            "HS384" => Ok(Self::HS384),
            "HS512" => Ok(Self::HS512),
            other => Err(CoreError::ValidationError(format!(
                "Unsupported signing algorithm: {other}"
            ))),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    typ: String,
}

/// Claims carried by a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    pub domain: String,
    /// Issued at, seconds since the Unix epoch.
    pub iat: i64,
    /// Expires at, seconds since the Unix epoch.
    pub exp: i64,
}

impl Claims {
    #[must_use]
    pub fn principal(&self) -> Principal {
        Principal::new(&self.domain, &self.username)
    }
}

/// Issues and validates tokens with one secret and one algorithm.
pub struct TokenService {
    secret: Vec<u8>,
    algorithm: SigningAlgorithm,
    ttl: Duration,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl TokenService {
    /// Create a token service. The secret must not be empty.
    pub fn new(secret: &[u8], algorithm: SigningAlgorithm, ttl: Duration) -> CoreResult<Self> {
        if secret.is_empty() {
            return Err(CoreError::ValidationError(
                "Token signing secret must not be empty".to_string(),
            ));
        }
        Ok(Self {
            secret: secret.to_vec(),
            algorithm,
            ttl,
        })
    }

    #[must_use]
    pub fn algorithm(&self) -> SigningAlgorithm {
        self.algorithm
    }

    /// Lifetime applied by [`Self::issue_now`].
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn sign(&self, input: &[u8]) -> CoreResult<Vec<u8>> {
        macro_rules! hmac_sign {
            ($digest:ty) => {{
                let mut mac = Hmac::<$digest>::new_from_slice(&self.secret)
                    .map_err(|e| CoreError::SerializationError(format!("HMAC key: {e}")))?;
                mac.update(input);
                mac.finalize().into_bytes().to_vec()
            }};
        }

        Ok(match self.algorithm {
            SigningAlgorithm::HS256 => hmac_sign!(Sha256),
            SigningAlgorithm::HS384 => hmac_sign!(Sha384),
            SigningAlgorithm::HS512 => hmac_sign!(Sha512),
        })
    }

    fn verify(&self, input: &[u8], signature: &[u8]) -> bool {
        macro_rules! hmac_verify {
            ($digest:ty) => {{
                match Hmac::<$digest>::new_from_slice(&self.secret) {
                    Ok(mut mac) => {
                        mac.update(input);
                        mac.verify_slice(signature).is_ok()
                    }
                    Err(_) => false,
                }
            }};
        }

        match self.algorithm {
            SigningAlgorithm::HS256 => hmac_verify!(Sha256),
            SigningAlgorithm::HS384 => hmac_verify!(Sha384),
            SigningAlgorithm::HS512 => hmac_verify!(Sha512),
        }
    }

    /// Issue a token for `(domain, username)` valid from `now` for `ttl`.
    pub fn issue(
        &self,
        domain: &str,
        username: &str,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> CoreResult<String> {
        let header = Header {
            alg: self.algorithm.as_str().to_string(),
            typ: "JWT".to_string(),
        };
        let expires = now.checked_add_signed(ttl).ok_or_else(|| {
            CoreError::SerializationError("Token expiry out of range".to_string())
        })?;
        let claims = Claims {
            username: username.to_string(),
            domain: domain.to_string(),
            iat: now.timestamp(),
            exp: expires.timestamp(),
        };

        let header = serde_json::to_vec(&header)
            .map_err(|e| CoreError::SerializationError(e.to_string()))?;
        let claims = serde_json::to_vec(&claims)
            .map_err(|e| CoreError::SerializationError(e.to_string()))?;

        let signing_input = format!("{}.{}", BASE64URL.encode(header), BASE64URL.encode(claims));
        let signature = self.sign(signing_input.as_bytes())?;

        Ok(format!("{signing_input}.{}", BASE64URL.encode(signature)))
    }

    /// Issue a token with the configured lifetime, starting now.
    pub fn issue_now(&self, domain: &str, username: &str) -> CoreResult<String> {
        self.issue(domain, username, Utc::now(), self.ttl)
    }

    /// Verify signature and expiry.
    ///
    /// A token whose `exp` lies before `now` is [`AuthError::Expired`] even
    /// though its signature verifies.
    pub fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        let invalid_shape = || AuthError::Invalid("expected three segments".to_string());
        let (signing_input, signature) = token.rsplit_once('.').ok_or_else(invalid_shape)?;
        let (header, claims) = signing_input.split_once('.').ok_or_else(invalid_shape)?;
        if claims.contains('.') {
            return Err(invalid_shape());
        }

        let header_json = BASE64URL
            .decode(header)
            .map_err(|_| AuthError::Invalid("header is not base64url".to_string()))?;
        let header: Header = serde_json::from_slice(&header_json)
            .map_err(|_| AuthError::Invalid("header is not JSON".to_string()))?;
        if header.alg != self.algorithm.as_str() {
            return Err(AuthError::Invalid(format!(
                "unexpected signing algorithm {}",
                header.alg
            )));
        }

        let signature = BASE64URL
            .decode(signature)
            .map_err(|_| AuthError::Invalid("signature is not base64url".to_string()))?;
        if !self.verify(signing_input.as_bytes(), &signature) {
            return Err(AuthError::Invalid("signature mismatch".to_string()));
        }

        let claims_json = BASE64URL
            .decode(claims)
            .map_err(|_| AuthError::Invalid("claims are not base64url".to_string()))?;
        let claims: Claims = serde_json::from_slice(&claims_json)
            .map_err(|_| AuthError::Invalid("claims are not JSON".to_string()))?;

        if claims.exp < now.timestamp() {
            return Err(AuthError::Expired);
        }

        Ok(claims)
    }
}
