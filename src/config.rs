// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup and
//! injected by value; nothing in this crate reads the environment after
//! [`AppConfig::from_env`] returns.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `TOKEN_SIGNING_SECRET` | HS256 secret for access tokens | Required |
//! | `ACCESS_TOKEN_TTL_SECS` | Access token lifetime in seconds | `3600` |
//! | `REFRESH_TOKEN_TTL_DAYS` | Refresh token lifetime in days | `14` |
//! | `KAKAO_USER_INFO_URL` | Kakao user-info endpoint | `https://kapi.kakao.com/v2/user/me` |
//! | `AUTH_EXEMPT_PATHS` | Comma-separated paths reachable without a token; a trailing `/**` makes an entry a prefix match | login, refresh, health, docs |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;
use std::net::SocketAddr;

use chrono::Duration;

use crate::auth::middleware::ExemptPaths;

/// Environment variable name for the HS256 access-token signing secret.
pub const TOKEN_SIGNING_SECRET_ENV: &str = "TOKEN_SIGNING_SECRET";

/// Environment variable name for the Kakao user-info endpoint override.
pub const KAKAO_USER_INFO_URL_ENV: &str = "KAKAO_USER_INFO_URL";

/// Environment variable name for the exempt-path allow-list override.
pub const AUTH_EXEMPT_PATHS_ENV: &str = "AUTH_EXEMPT_PATHS";

const DEFAULT_KAKAO_USER_INFO_URL: &str = "https://kapi.kakao.com/v2/user/me";
const DEFAULT_ACCESS_TOKEN_TTL_SECS: i64 = 3600;
const DEFAULT_REFRESH_TOKEN_TTL_DAYS: i64 = 14;

/// Paths reachable without an access token when `AUTH_EXEMPT_PATHS` is unset:
/// the login and refresh endpoints, liveness probes, and the API console.
pub const DEFAULT_EXEMPT_PATHS: &[&str] = &[
    "/auth/login",
    "/auth/token/refresh",
    "/health/**",
    "/docs/**",
    "/api-doc/**",
];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),

    #[error("environment variable {name} has invalid value: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Process-wide immutable configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// HS256 secret shared by token issuance and validation.
    pub signing_secret: String,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
    pub kakao_user_info_url: String,
    pub exempt_paths: ExemptPaths,
}

impl AppConfig {
    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = parse_env("PORT", 8080u16)?;
        let bind_addr = format!("{host}:{port}")
            .parse()
            .map_err(|e| ConfigError::Invalid {
                name: "HOST",
                reason: format!("{host}:{port} is not a bind address: {e}"),
            })?;

        let signing_secret = env::var(TOKEN_SIGNING_SECRET_ENV)
            .map_err(|_| ConfigError::Missing(TOKEN_SIGNING_SECRET_ENV))?;
        if signing_secret.trim().is_empty() {
            return Err(ConfigError::Invalid {
                name: TOKEN_SIGNING_SECRET_ENV,
                reason: "secret must not be blank".to_string(),
            });
        }

        let access_secs = parse_env("ACCESS_TOKEN_TTL_SECS", DEFAULT_ACCESS_TOKEN_TTL_SECS)?;
        let refresh_days = parse_env("REFRESH_TOKEN_TTL_DAYS", DEFAULT_REFRESH_TOKEN_TTL_DAYS)?;

        let kakao_user_info_url = env::var(KAKAO_USER_INFO_URL_ENV)
            .unwrap_or_else(|_| DEFAULT_KAKAO_USER_INFO_URL.to_string());

        let exempt_paths = match env::var(AUTH_EXEMPT_PATHS_ENV) {
            Ok(raw) => ExemptPaths::parse(raw.split(',').map(str::trim)),
            Err(_) => ExemptPaths::parse(DEFAULT_EXEMPT_PATHS.iter().copied()),
        };

        Ok(Self {
            bind_addr,
            signing_secret,
            access_token_ttl: Duration::seconds(access_secs),
            refresh_token_ttl: Duration::days(refresh_days),
            kakao_user_info_url,
            exempt_paths,
        })
    }
}

fn parse_env<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.parse().map_err(|e| ConfigError::Invalid {
            name,
            reason: format!("{raw}: {e}"),
        }),
        Err(_) => Ok(default),
    }
}
