//! TOML configuration
//!
//! A missing file is created with the defaults and startup continues.

use std::net::IpAddr;
use std::path::Path;

use anyhow::{bail, Context};
use opencap_core::auth::{SigningAlgorithm, DEFAULT_TOKEN_TTL_SECS, MAX_TOKEN_TTL_SECS};
use opencap_resolver::{ResolverKeys, DEFAULT_PORT};
use serde::{Deserialize, Serialize};

/// Environment variable that overrides `auth.jwt_secret`.
pub const JWT_SECRET_ENV: &str = "OPENCAP_JWT_SECRET";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub resolver: ResolverConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 0 lets actix pick one worker per physical core.
    pub workers: usize,
    /// Pretty-print JSON response bodies.
    pub debug: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            workers: 0,
            debug: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SeaORM` connection URL, or `memory`.
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://opencap.db?mode=rwc".to_string(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub algorithm: SigningAlgorithm,
    pub token_ttl_secs: i64,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("token_ttl_secs", &self.token_ttl_secs)
            .finish()
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            algorithm: SigningAlgorithm::default(),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub public_key_txt_key: String,
    pub dns_signature_txt_key: String,
    pub timeout_secs: u64,
    /// Query this nameserver instead of the system configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nameserver: Option<IpAddr>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        let keys = ResolverKeys::default();
        Self {
            public_key_txt_key: keys.public_key,
            dns_signature_txt_key: keys.dns_signature,
            timeout_secs: 5,
            nameserver: None,
        }
    }
}

impl ResolverConfig {
    #[must_use]
    pub fn keys(&self) -> ResolverKeys {
        ResolverKeys {
            public_key: self.public_key_txt_key.clone(),
            dns_signature: self.dns_signature_txt_key.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter; `RUST_LOG` takes precedence.
    pub level: String,
    pub json: bool,
    /// Directory for daily-rotated log files; empty logs to stderr only.
    pub directory: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            directory: String::new(),
        }
    }
}

impl Config {
    /// Read `path`, writing the defaults there first if it does not exist.
    ///
    /// `secret_override` (normally from [`JWT_SECRET_ENV`]) replaces the
    /// configured secret when set.
    pub fn load_or_init(path: &Path, secret_override: Option<String>) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            toml::from_str::<Self>(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?
        } else {
            let config = Self::default();
            let contents =
                toml::to_string_pretty(&config).context("Failed to serialize default config")?;
            std::fs::write(path, contents)
                .with_context(|| format!("Failed to write default config {}", path.display()))?;
            config
        };

        if let Some(secret) = secret_override.filter(|s| !s.is_empty()) {
            config.auth.jwt_secret = secret;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.auth.jwt_secret.is_empty() {
            bail!("auth.jwt_secret must be set (or provide {JWT_SECRET_ENV})");
        }
        if !(1..=MAX_TOKEN_TTL_SECS).contains(&self.auth.token_ttl_secs) {
            bail!("auth.token_ttl_secs must be between 1 and {MAX_TOKEN_TTL_SECS}");
        }
        if self.resolver.timeout_secs == 0 {
            bail!("resolver.timeout_secs must be positive");
        }
        Ok(())
    }
}
