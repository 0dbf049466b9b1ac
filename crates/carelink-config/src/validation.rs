//! Startup checks over a loaded [`AppConfig`].
//!
//! Every check runs, so a misconfigured deployment reports all of its
//! problems at once.

use crate::{AppConfig, CacheConfig, DatabaseConfig, RedisConfig, SecurityConfig};
use thiserror::Error;

const MIN_JWT_SECRET_LEN: usize = 32;
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// One rejected setting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("security.jwt_secret has {actual} characters, needs at least {minimum}")]
    JwtSecretTooShort { actual: usize, minimum: usize },

    #[error("security.session_cookie_name cannot be empty")]
    EmptyCookieName,

    #[error("server.port cannot be 0")]
    InvalidPort,

    #[error("{setting} must start with {expected}")]
    InvalidUrl {
        setting: &'static str,
        expected: &'static str,
    },

    #[error("database.min_connections ({min}) exceeds database.max_connections ({max})")]
    InvalidPoolSize { min: u32, max: u32 },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error(
        "cache.profile_read_timeout_ms ({profile_ms}) must be shorter than \
         cache.master_data_read_timeout_ms ({master_data_ms})"
    )]
    ProfileTimeoutNotShorter { profile_ms: u64, master_data_ms: u64 },

    #[error("cache.master_data_key_version cannot be empty")]
    EmptyKeyVersion,

    #[error("observability.log_level '{0}' is not one of trace, debug, info, warn, error")]
    InvalidLogLevel(String),
}

/// Validates a whole [`AppConfig`].
pub struct ConfigValidator {
    errors: Vec<ConfigValidationError>,
}

impl ConfigValidator {
    /// Returns every problem found, or `Ok` if there were none.
    pub fn validate(config: &AppConfig) -> Result<(), Vec<ConfigValidationError>> {
        let mut v = Self { errors: Vec::new() };

        v.security(&config.security);
        if config.server.port == 0 {
            v.errors.push(ConfigValidationError::InvalidPort);
        }
        v.non_zero("server.request_timeout_secs", config.server.request_timeout_secs);
        v.database(&config.database);
        v.redis(&config.redis);
        v.cache(&config.cache);

        let level = &config.observability.log_level;
        if !LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            v.errors.push(ConfigValidationError::InvalidLogLevel(level.clone()));
        }

        if v.errors.is_empty() {
            Ok(())
        } else {
            Err(v.errors)
        }
    }

    fn non_zero<N: Into<u64>>(&mut self, setting: &'static str, value: N) {
        if value.into() == 0 {
            self.errors.push(ConfigValidationError::Zero(setting));
        }
    }

    fn url(&mut self, setting: &'static str, url: &str, schemes: &[&str], expected: &'static str) {
        if !schemes.iter().any(|scheme| url.starts_with(scheme)) {
            self.errors
                .push(ConfigValidationError::InvalidUrl { setting, expected });
        }
    }

    fn security(&mut self, security: &SecurityConfig) {
        let len = security.jwt_secret.len();
        if len < MIN_JWT_SECRET_LEN {
            self.errors.push(ConfigValidationError::JwtSecretTooShort {
                actual: len,
                minimum: MIN_JWT_SECRET_LEN,
            });
        }
        self.non_zero(
            "security.jwt_access_expiration_secs",
            security.jwt_access_expiration_secs,
        );
        if security.session_cookie_name.trim().is_empty() {
            self.errors.push(ConfigValidationError::EmptyCookieName);
        }
    }

    fn database(&mut self, database: &DatabaseConfig) {
        self.url(
            "database.url",
            &database.url,
            &["postgres://", "postgresql://"],
            "postgres://",
        );
        if database.min_connections > database.max_connections {
            self.errors.push(ConfigValidationError::InvalidPoolSize {
                min: database.min_connections,
                max: database.max_connections,
            });
        }
        self.non_zero("database.max_connections", database.max_connections);
        self.non_zero("database.connect_timeout_secs", database.connect_timeout_secs);
        self.non_zero("database.idle_timeout_secs", database.idle_timeout_secs);
    }

    fn redis(&mut self, redis: &RedisConfig) {
        if !redis.enabled {
            return;
        }
        self.url("redis.url", &redis.url, &["redis://", "rediss://"], "redis://");
        self.non_zero("redis.pool_size", redis.pool_size);
    }

    fn cache(&mut self, cache: &CacheConfig) {
        self.non_zero("cache.profile_ttl_secs", cache.profile_ttl_secs);
        self.non_zero("cache.profile_read_timeout_ms", cache.profile_read_timeout_ms);
        self.non_zero("cache.master_data_ttl_secs", cache.master_data_ttl_secs);
        self.non_zero(
            "cache.master_data_read_timeout_ms",
            cache.master_data_read_timeout_ms,
        );
        self.non_zero(
            "cache.master_data_fetch_attempts",
            cache.master_data_fetch_attempts,
        );

        if cache.profile_read_timeout_ms >= cache.master_data_read_timeout_ms {
            self.errors
                .push(ConfigValidationError::ProfileTimeoutNotShorter {
                    profile_ms: cache.profile_read_timeout_ms,
                    master_data_ms: cache.master_data_read_timeout_ms,
                });
        }
        if cache.master_data_key_version.trim().is_empty() {
            self.errors.push(ConfigValidationError::EmptyKeyVersion);
        }
    }
}

/// Renders a numbered list for the startup error.
#[must_use]
pub fn format_validation_errors(errors: &[ConfigValidationError]) -> String {
    errors.iter().enumerate().fold(
        String::from("Configuration validation failed:\n"),
        |mut out, (i, error)| {
            out.push_str(&format!("  {}. {}\n", i + 1, error));
            out
        },
    )
}
