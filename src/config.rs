// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Each service reads its configuration from the process environment once at
//! startup. `from_lookup` takes any key lookup so tests need not touch the
//! real environment.
//!
//! ## Environment Variables
//!
//! | Variable | Service | Description | Default |
//! |----------|---------|-------------|---------|
//! | `HOST` | all | Bind address | `0.0.0.0` |
//! | `PORT` | all | Bind port | `8080` / `8081` / `8082` |
//! | `JWT_SECRET` | gateway, auth | HMAC signing key | Required |
//! | `JWT_EXPIRATION_HOURS` | auth | Access token lifetime (refresh is 7x) | `24` |
//! | `AUTH_SERVICE_URL` | gateway | Auth service base URL | `http://localhost:8081` |
//! | `STUDENT_SERVICE_URL` | gateway | Student service base URL | `http://localhost:8082` |
//! | `EMPLOYER_SERVICE_URL` | gateway | Employer service base URL | `http://localhost:8083` |
//! | `STUDENTS_REQUIRED_ROLE` | gateway | Role required on `/api/students` | any role |
//! | `EMPLOYERS_REQUIRED_ROLE` | gateway | Role required on `/api/employers` | any role |
//! | `MISSING_ROLE_POLICY` | gateway | `reject` or `allow` tokens without a role | `reject` |
//! | `PROXY_TIMEOUT_SECS` | gateway | Upstream request timeout | `30` |
//! | `PROXY_MAX_BODY_BYTES` | gateway | Largest request body forwarded | `10485760` |
//! | `LOG_FORMAT` | all | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | all | Log level filter | `info,tower_http=debug` |

use std::net::SocketAddr;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::auth::{MissingRolePolicy, Role};
use crate::gateway::proxy::{DEFAULT_MAX_BODY_BYTES, DEFAULT_TIMEOUT};

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const JWT_EXPIRATION_HOURS_ENV: &str = "JWT_EXPIRATION_HOURS";
pub const AUTH_SERVICE_URL_ENV: &str = "AUTH_SERVICE_URL";
pub const STUDENT_SERVICE_URL_ENV: &str = "STUDENT_SERVICE_URL";
pub const EMPLOYER_SERVICE_URL_ENV: &str = "EMPLOYER_SERVICE_URL";
pub const STUDENTS_REQUIRED_ROLE_ENV: &str = "STUDENTS_REQUIRED_ROLE";
pub const EMPLOYERS_REQUIRED_ROLE_ENV: &str = "EMPLOYERS_REQUIRED_ROLE";
pub const MISSING_ROLE_POLICY_ENV: &str = "MISSING_ROLE_POLICY";
pub const PROXY_TIMEOUT_SECS_ENV: &str = "PROXY_TIMEOUT_SECS";
pub const PROXY_MAX_BODY_BYTES_ENV: &str = "PROXY_MAX_BODY_BYTES";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_JWT_EXPIRATION_HOURS: u64 = 24;

/// Startup configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{name} has invalid value '{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

fn invalid(name: &'static str, value: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        name,
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Non-empty value of `name`, treating blank as unset.
fn read(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn bind_addr(
    lookup: &impl Fn(&str) -> Option<String>,
    default_port: u16,
) -> Result<SocketAddr, ConfigError> {
    let host = read(lookup, HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = match read(lookup, PORT_ENV) {
        Some(raw) => raw
            .parse::<u16>()
            .map_err(|e| invalid(PORT_ENV, &raw, e.to_string()))?,
        None => default_port,
    };

    let addr = format!("{host}:{port}");
    addr.parse()
        .map_err(|_| invalid(HOST_ENV, &host, "not a valid IP address"))
}

fn jwt_secret(lookup: &impl Fn(&str) -> Option<String>) -> Result<SecretString, ConfigError> {
    // Not trimmed: surrounding whitespace is part of the key.
    match lookup(JWT_SECRET_ENV) {
        Some(secret) if !secret.is_empty() => Ok(SecretString::from(secret)),
        _ => Err(ConfigError::Missing(JWT_SECRET_ENV)),
    }
}

fn service_url(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: &str,
) -> Result<Url, ConfigError> {
    let raw = read(lookup, name).unwrap_or_else(|| default.to_string());
    let url = Url::parse(&raw).map_err(|e| invalid(name, &raw, e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(name, &raw, "scheme must be http or https"));
    }
    if url.host_str().is_none() {
        return Err(invalid(name, &raw, "missing host"));
    }
    Ok(url)
}

fn optional_role(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<Role>, ConfigError> {
    match read(lookup, name) {
        Some(raw) => Role::from_str(&raw)
            .map(Some)
            .ok_or_else(|| invalid(name, &raw, "unknown role")),
        None => Ok(None),
    }
}

fn positive<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    let Some(raw) = read(lookup, name) else {
        return Ok(default);
    };
    match raw.parse::<T>() {
        Ok(value) if value > T::default() => Ok(value),
        _ => Err(invalid(name, &raw, "must be a positive integer")),
    }
}

// =============================================================================
// Auth service
// =============================================================================

#[derive(Debug)]
pub struct AuthServiceConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: SecretString,
    pub access_lifetime: Duration,
}

impl AuthServiceConfig {
    pub const DEFAULT_PORT: u16 = 8081;

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let hours = positive(&lookup, JWT_EXPIRATION_HOURS_ENV, DEFAULT_JWT_EXPIRATION_HOURS)?;
        let secs = hours
            .checked_mul(3600)
            .ok_or_else(|| invalid(JWT_EXPIRATION_HOURS_ENV, &hours.to_string(), "too large"))?;

        Ok(Self {
            bind_addr: bind_addr(&lookup, Self::DEFAULT_PORT)?,
            jwt_secret: jwt_secret(&lookup)?,
            access_lifetime: Duration::from_secs(secs),
        })
    }
}

// =============================================================================
// Gateway
// =============================================================================

#[derive(Debug)]
pub struct GatewayConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: SecretString,
    pub auth_service_url: Url,
    pub student_service_url: Url,
    pub employer_service_url: Url,
    pub students_required_role: Option<Role>,
    pub employers_required_role: Option<Role>,
    pub missing_role_policy: MissingRolePolicy,
    pub proxy_timeout: Duration,
    pub proxy_max_body_bytes: usize,
}

impl GatewayConfig {
    pub const DEFAULT_PORT: u16 = 8080;

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let missing_role_policy = match read(&lookup, MISSING_ROLE_POLICY_ENV) {
            Some(raw) => MissingRolePolicy::from_str(&raw)
                .ok_or_else(|| invalid(MISSING_ROLE_POLICY_ENV, &raw, "expected 'reject' or 'allow'"))?,
            None => MissingRolePolicy::default(),
        };

        Ok(Self {
            bind_addr: bind_addr(&lookup, Self::DEFAULT_PORT)?,
            jwt_secret: jwt_secret(&lookup)?,
            auth_service_url: service_url(&lookup, AUTH_SERVICE_URL_ENV, "http://localhost:8081")?,
            student_service_url: service_url(
                &lookup,
                STUDENT_SERVICE_URL_ENV,
                "http://localhost:8082",
            )?,
            employer_service_url: service_url(
                &lookup,
                EMPLOYER_SERVICE_URL_ENV,
                "http://localhost:8083",
            )?,
            students_required_role: optional_role(&lookup, STUDENTS_REQUIRED_ROLE_ENV)?,
            employers_required_role: optional_role(&lookup, EMPLOYERS_REQUIRED_ROLE_ENV)?,
            missing_role_policy,
            proxy_timeout: Duration::from_secs(positive(
                &lookup,
                PROXY_TIMEOUT_SECS_ENV,
                DEFAULT_TIMEOUT.as_secs(),
            )?),
            proxy_max_body_bytes: positive(
                &lookup,
                PROXY_MAX_BODY_BYTES_ENV,
                DEFAULT_MAX_BODY_BYTES,
            )?,
        })
    }
}

// =============================================================================
// Student service
// =============================================================================

#[derive(Debug)]
pub struct StudentServiceConfig {
    pub bind_addr: SocketAddr,
}

impl StudentServiceConfig {
    pub const DEFAULT_PORT: u16 = 8082;

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            bind_addr: bind_addr(&lookup, Self::DEFAULT_PORT)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn auth_defaults() {
        let config = AuthServiceConfig::from_lookup(env(&[("JWT_SECRET", "s3cret")])).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:8081".parse().unwrap());
        assert_eq!(config.access_lifetime, Duration::from_secs(24 * 3600));
        assert_eq!(config.jwt_secret.expose_secret(), "s3cret");
    }

    #[test]
    fn auth_requires_secret() {
        let err = AuthServiceConfig::from_lookup(env(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_SECRET")));

        let err = AuthServiceConfig::from_lookup(env(&[("JWT_SECRET", "")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_SECRET")));
    }

    #[test]
    fn auth_expiration_must_be_positive() {
        for bad in ["0", "-1", "soon"] {
            let err = AuthServiceConfig::from_lookup(env(&[
                ("JWT_SECRET", "s"),
                ("JWT_EXPIRATION_HOURS", bad),
            ]))
            .unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { .. }), "{bad}");
        }

        let config = AuthServiceConfig::from_lookup(env(&[
            ("JWT_SECRET", "s"),
            ("JWT_EXPIRATION_HOURS", "2"),
        ]))
        .unwrap();
        assert_eq!(config.access_lifetime, Duration::from_secs(7200));
    }

    #[test]
    fn gateway_defaults() {
        let config = GatewayConfig::from_lookup(env(&[("JWT_SECRET", "s")])).unwrap();

        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.auth_service_url.as_str(), "http://localhost:8081/");
        assert_eq!(config.student_service_url.port(), Some(8082));
        assert_eq!(config.employer_service_url.port(), Some(8083));
        assert_eq!(config.students_required_role, None);
        assert_eq!(config.employers_required_role, None);
        assert_eq!(config.missing_role_policy, MissingRolePolicy::Reject);
        assert_eq!(config.proxy_timeout, Duration::from_secs(30));
        assert_eq!(config.proxy_max_body_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn gateway_overrides() {
        let config = GatewayConfig::from_lookup(env(&[
            ("JWT_SECRET", "s"),
            ("PORT", "9000"),
            ("STUDENT_SERVICE_URL", "http://students.internal:7000"),
            ("EMPLOYERS_REQUIRED_ROLE", "employer"),
            ("MISSING_ROLE_POLICY", "allow"),
            ("PROXY_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.student_service_url.host_str(), Some("students.internal"));
        assert_eq!(config.employers_required_role, Some(Role::Employer));
        assert_eq!(config.missing_role_policy, MissingRolePolicy::Allow);
        assert_eq!(config.proxy_timeout, Duration::from_secs(5));
    }

    #[test]
    fn gateway_rejects_bad_values() {
        let cases = [
            ("AUTH_SERVICE_URL", "not a url"),
            ("AUTH_SERVICE_URL", "ftp://auth:21"),
            ("STUDENTS_REQUIRED_ROLE", "Student"),
            ("MISSING_ROLE_POLICY", "sometimes"),
            ("PROXY_MAX_BODY_BYTES", "0"),
            ("PORT", "70000"),
            ("HOST", "not-an-ip"),
        ];
        for (name, value) in cases {
            let result = GatewayConfig::from_lookup(env(&[("JWT_SECRET", "s"), (name, value)]));
            assert!(
                matches!(result, Err(ConfigError::Invalid { .. })),
                "{name}={value}"
            );
        }
    }

    #[test]
    fn student_service_port() {
        let config = StudentServiceConfig::from_lookup(env(&[("PORT", "9100")])).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:9100".parse().unwrap());
    }
}
