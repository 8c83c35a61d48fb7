//! Bridge configuration
//!
//! Read once at startup from the environment. `from_lookup` takes any
//! key/value source so tests don't touch the process environment.

use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::api::cookies::{CookieSettings, SameSitePolicy};
use crate::flow::{
    ClaimFilter, ClaimPolicy, FlowSettings, DEFAULT_CONSENT_REMEMBER_SECS, DEFAULT_SESSION_TTL_SECS,
};
use crate::hydra::DEFAULT_ADMIN_TIMEOUT;
use hydra_bridge_auth::verifiers::{DEFAULT_HTTP_TIMEOUT, INTERNAL_PROVIDER};
use hydra_bridge_auth::DEFAULT_AUTH_TIMEOUT;

/// Upper bound for `SESSION_TTL_SECONDS`: 10 years
pub const MAX_SESSION_TTL_SECS: i64 = 10 * 365 * 24 * 3600;

/// Errors loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Complete bridge configuration
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Listen address, `host:port`
    pub addr: String,
    /// Authorization-server admin base URL
    pub hydra_admin_url: String,
    /// Credential-authority base URL for the HTTP verifier
    pub login_api_url: String,
    /// HMAC secret for session cookies and CSRF tokens
    pub cookie_auth_key: String,
    pub default_provider: String,
    pub session_ttl_secs: i64,
    pub consent_remember_secs: i64,
    pub cookie_domain: Option<String>,
    pub cookie_secure: bool,
    pub cookie_same_site: SameSitePolicy,
    pub hydra_timeout: Duration,
    pub login_api_timeout: Duration,
    pub auth_timeout: Duration,
    pub claim_policy: ClaimPolicy,
    /// `user:password:subject;...` for the static verifier
    pub static_users: Option<String>,
}

impl BridgeConfig {
    /// Load from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key/value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let session_ttl_secs: i64 =
            parse_or(&get, "SESSION_TTL_SECONDS", DEFAULT_SESSION_TTL_SECS)?;
        let session_ttl_secs = if session_ttl_secs <= 0 {
            DEFAULT_SESSION_TTL_SECS
        } else {
            session_ttl_secs
        };
        if session_ttl_secs > MAX_SESSION_TTL_SECS {
            return Err(ConfigError::Invalid {
                key: "SESSION_TTL_SECONDS",
                message: format!("must be at most {} seconds", MAX_SESSION_TTL_SECS),
            });
        }

        let cookie_secure = parse_bool_or(&get, "COOKIE_SECURE", false)?;
        let cookie_same_site = get("COOKIE_SAMESITE")
            .map(|v| SameSitePolicy::parse(&v))
            .unwrap_or_default();

        if cookie_same_site == SameSitePolicy::None && !cookie_secure {
            return Err(ConfigError::Invalid {
                key: "COOKIE_SAMESITE",
                message: "SameSite=None requires COOKIE_SECURE=true".into(),
            });
        }

        Ok(Self {
            addr: required("BRIDGE_ADDR")?,
            hydra_admin_url: required("HYDRA_ADMIN_URL")?,
            login_api_url: required("LOGIN_API_URL")?,
            cookie_auth_key: required("COOKIE_AUTH_KEY")?,
            default_provider: get("DEFAULT_PROVIDER")
                .unwrap_or_else(|| INTERNAL_PROVIDER.to_string()),
            session_ttl_secs,
            consent_remember_secs: parse_or(
                &get,
                "CONSENT_REMEMBER_SECONDS",
                DEFAULT_CONSENT_REMEMBER_SECS,
            )?,
            cookie_domain: get("COOKIE_DOMAIN"),
            cookie_secure,
            cookie_same_site,
            hydra_timeout: secs_or(&get, "HYDRA_TIMEOUT_SECONDS", DEFAULT_ADMIN_TIMEOUT)?,
            login_api_timeout: secs_or(&get, "LOGIN_API_TIMEOUT_SECONDS", DEFAULT_HTTP_TIMEOUT)?,
            auth_timeout: secs_or(&get, "AUTH_TIMEOUT_SECONDS", DEFAULT_AUTH_TIMEOUT)?,
            claim_policy: ClaimPolicy {
                // Unset means all; an explicitly empty value means none
                id_token: lookup("ID_TOKEN_CLAIMS")
                    .map(|v| ClaimFilter::parse(&v))
                    .unwrap_or_default(),
                access_token: lookup("ACCESS_TOKEN_CLAIMS")
                    .map(|v| ClaimFilter::parse(&v))
                    .unwrap_or_default(),
            },
            static_users: get("STATIC_USERS"),
        })
    }

    /// Settings for the login and consent flows
    pub fn flow_settings(&self) -> FlowSettings {
        FlowSettings {
            default_provider: self.default_provider.clone(),
            session_ttl_secs: self.session_ttl_secs,
            consent_remember_secs: self.consent_remember_secs,
            auth_timeout: self.auth_timeout,
            claim_policy: self.claim_policy.clone(),
        }
    }

    /// Settings for the bridge session cookie
    pub fn cookie_settings(&self) -> CookieSettings {
        CookieSettings {
            domain: self.cookie_domain.clone(),
            secure: self.cookie_secure,
            same_site: self.cookie_same_site,
            max_age_secs: self.session_ttl_secs,
            ..CookieSettings::default()
        }
    }
}

fn parse_or<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            message: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn parse_bool_or<G>(get: &G, key: &'static str, default: bool) -> Result<bool, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    match get(key).map(|v| v.trim().to_ascii_lowercase()) {
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid {
                key,
                message: format!("'{}' is not a boolean", v),
            }),
        },
        None => Ok(default),
    }
}

fn secs_or<G>(get: &G, key: &'static str, default: Duration) -> Result<Duration, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    let secs: u64 = parse_or(get, key, default.as_secs())?;
    Ok(Duration::from_secs(secs))
}
