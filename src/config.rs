// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Propgate Contributors

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup and is
//! read-only afterwards. The process refuses to start without a signing
//! secret; every other variable has a default.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `TOKEN_SECRET` | Symmetric JWT signing secret | Required |
//! | `TOKEN_TTL_SECS` | Token validity window in seconds | `3600` |
//! | `DATA_DIR` | Directory holding the user database | `/data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;
use std::path::PathBuf;

use crate::auth::DEFAULT_TTL_SECS;

/// Environment variable name for the JWT signing secret.
pub const TOKEN_SECRET_ENV: &str = "TOKEN_SECRET";

/// Environment variable name for the token validity window.
pub const TOKEN_TTL_ENV: &str = "TOKEN_TTL_SECS";

/// Environment variable name for the data directory.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

/// Process-wide configuration, consumed by component constructors at startup.
#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub token_secret: String,
    pub token_ttl_secs: i64,
    pub log_format: String,
}

// The signing secret must never appear in logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("data_dir", &self.data_dir)
            .field("token_secret", &"[REDACTED]")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Fails fast if the signing secret is absent or empty - issuing
    /// unverifiable tokens is worse than not starting.
    pub fn from_env() -> Result<Self, ConfigError> {
        let token_secret = env::var(TOKEN_SECRET_ENV)
            .map_err(|_| ConfigError::MissingVar(TOKEN_SECRET_ENV))?;
        if token_secret.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                TOKEN_SECRET_ENV,
                "cannot be empty".to_string(),
            ));
        }

        let token_ttl_secs = match env::var(TOKEN_TTL_ENV) {
            Ok(value) => value.parse::<i64>().ok().filter(|ttl| *ttl > 0).ok_or_else(|| {
                ConfigError::InvalidValue(TOKEN_TTL_ENV, format!("{value:?} is not a positive integer"))
            })?,
            Err(_) => DEFAULT_TTL_SECS,
        };

        let port = match env::var("PORT") {
            Ok(value) => value.parse::<u16>().map_err(|_| {
                ConfigError::InvalidValue("PORT", format!("{value:?} is not a valid port"))
            })?,
            Err(_) => 8080,
        };

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
            data_dir: PathBuf::from(env::var(DATA_DIR_ENV).unwrap_or_else(|_| "/data".to_string())),
            token_secret,
            token_ttl_secs,
            log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_the_secret() {
        let config = Config {
            host: "0.0.0.0".to_string(),
            port: 8080,
            data_dir: PathBuf::from("/data"),
            token_secret: "super-secret".to_string(),
            token_ttl_secs: DEFAULT_TTL_SECS,
            log_format: "pretty".to_string(),
        };

        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
