//! Application configuration module
//!
//! Provides the server configuration, built either explicitly through
//! [`AppConfigBuilder`] or from environment variables with [`AppConfig::from_env`].

use crate::shared::chat::UserId;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use thiserror::Error;

/// Development signing secret used when `JWT_SECRET` is absent
pub const DEV_JWT_SECRET: &str = "lostfound-dev-secret-change-in-production";

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_TOKEN_TTL_SECS: u64 = 30 * 24 * 60 * 60;
const DEFAULT_REALTIME_BUFFER: usize = 256;
const DEFAULT_LOG_FILTER: &str = "info";

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to
    pub bind_addr: SocketAddr,
    /// PostgreSQL connection string; `None` runs on the in-memory store
    pub database_url: Option<String>,
    /// HMAC secret used to verify bearer tokens
    pub jwt_secret: String,
    /// Lifetime of issued tokens, in seconds
    pub token_ttl_secs: u64,
    /// Capacity of each connection's outbound queue
    pub realtime_buffer: usize,
    /// Default tracing filter when `RUST_LOG` is not set
    pub log_filter: String,
    /// Users known to the in-memory directory when running without a database
    pub seed_users: Vec<(UserId, String)>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT),
            database_url: None,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            realtime_buffer: DEFAULT_REALTIME_BUFFER,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            seed_users: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Load the configuration from the process environment
    ///
    /// Recognised keys: `SERVER_HOST`, `SERVER_PORT`, `DATABASE_URL`,
    /// `JWT_SECRET`, `JWT_TTL_SECS`, `REALTIME_BUFFER`, `RUST_LOG`,
    /// `CHAT_SEED_USERS` (`id:Full Name` pairs separated by commas).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load the configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = AppConfig::builder();

        let host = match lookup("SERVER_HOST") {
            Some(host) => host
                .parse::<IpAddr>()
                .map_err(|_| ConfigError::InvalidValue("SERVER_HOST", host))?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };
        let port = match lookup("SERVER_PORT") {
            Some(port) => port
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidValue("SERVER_PORT", port))?,
            None => DEFAULT_PORT,
        };
        builder = builder.bind_addr(SocketAddr::new(host, port));

        if let Some(url) = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()) {
            builder = builder.database_url(url);
        }
        match lookup("JWT_SECRET") {
            Some(secret) => builder = builder.jwt_secret(secret),
            None => {
                tracing::warn!("JWT_SECRET not set. Using the development secret.");
            }
        }
        if let Some(ttl) = lookup("JWT_TTL_SECS") {
            let ttl = ttl
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue("JWT_TTL_SECS", ttl))?;
            builder = builder.token_ttl_secs(ttl);
        }
        if let Some(buffer) = lookup("REALTIME_BUFFER") {
            let buffer = buffer
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidValue("REALTIME_BUFFER", buffer))?;
            builder = builder.realtime_buffer(buffer);
        }
        if let Some(filter) = lookup("RUST_LOG") {
            builder = builder.log_filter(filter);
        }
        if let Some(users) = lookup("CHAT_SEED_USERS") {
            for (user_id, full_name) in parse_seed_users(&users)? {
                builder = builder.seed_user(user_id, full_name);
            }
        }

        builder.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(ConfigError::MissingValue("JWT_SECRET"));
        }
        if self.token_ttl_secs == 0 {
            return Err(ConfigError::InvalidValue("JWT_TTL_SECS", "0".to_string()));
        }
        if self.realtime_buffer == 0 {
            return Err(ConfigError::InvalidValue("REALTIME_BUFFER", "0".to_string()));
        }
        Ok(())
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    bind_addr: Option<SocketAddr>,
    database_url: Option<String>,
    jwt_secret: Option<String>,
    token_ttl_secs: Option<u64>,
    realtime_buffer: Option<usize>,
    log_filter: Option<String>,
    seed_users: Vec<(UserId, String)>,
}

impl AppConfigBuilder {
    /// Set the listen address
    pub fn bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = Some(addr);
        self
    }

    /// Set the database URL
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    /// Set the token signing secret
    pub fn jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.jwt_secret = Some(secret.into());
        self
    }

    /// Set the token lifetime
    pub fn token_ttl_secs(mut self, ttl: u64) -> Self {
        self.token_ttl_secs = Some(ttl);
        self
    }

    /// Set the per-connection outbound queue capacity
    pub fn realtime_buffer(mut self, capacity: usize) -> Self {
        self.realtime_buffer = Some(capacity);
        self
    }

    /// Set the default log filter
    pub fn log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = Some(filter.into());
        self
    }

    /// Add a user to the in-memory directory
    pub fn seed_user(mut self, user_id: UserId, full_name: impl Into<String>) -> Self {
        self.seed_users.push((user_id, full_name.into()));
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let defaults = AppConfig::default();
        let config = AppConfig {
            bind_addr: self.bind_addr.unwrap_or(defaults.bind_addr),
            database_url: self.database_url,
            jwt_secret: self.jwt_secret.unwrap_or(defaults.jwt_secret),
            token_ttl_secs: self.token_ttl_secs.unwrap_or(defaults.token_ttl_secs),
            realtime_buffer: self.realtime_buffer.unwrap_or(defaults.realtime_buffer),
            log_filter: self.log_filter.unwrap_or(defaults.log_filter),
            seed_users: self.seed_users,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Parse `1:Alice Finder, 2:Bob Owner`
fn parse_seed_users(value: &str) -> Result<Vec<(UserId, String)>, ConfigError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let invalid = || ConfigError::InvalidValue("CHAT_SEED_USERS", entry.to_string());
            let (user_id, full_name) = entry.split_once(':').ok_or_else(invalid)?;
            let user_id = user_id.trim().parse::<UserId>().map_err(|_| invalid())?;
            let full_name = full_name.trim();
            if full_name.is_empty() {
                return Err(invalid());
            }
            Ok((user_id, full_name.to_string()))
        })
        .collect()
}

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
}
