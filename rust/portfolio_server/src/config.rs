// src/config.rs

use quote_service::DEFAULT_BASE_URL;
use secrecy::SecretString;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 465;
pub const DEFAULT_KEEPALIVE_SECS: u64 = 300;

/// Errors related to application configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable required by the application is not set.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: String, reason: String },
}

pub struct MailSettings {
    pub owner: String,
    pub password: SecretString,
    pub host: String,
    pub port: u16,
}

pub struct ServerConfig {
    pub bind_addr: String,
    pub api_key: SecretString,
    pub provider_base_url: String,
    pub mail: Option<MailSettings>,
    pub catalog_path: Option<PathBuf>,
    pub resume_path: Option<PathBuf>,
    pub keepalive_interval: Duration,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = get("ALPHAVANTAGE_API_KEY")
            .ok_or_else(|| ConfigError::MissingEnvVar("ALPHAVANTAGE_API_KEY".to_string()))?;

        let mail = match (get("CONTACT_EMAIL"), get("CONTACT_EMAIL_PASSWORD")) {
            (Some(owner), Some(password)) => Some(MailSettings {
                owner,
                password: SecretString::from(password),
                host: get("SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
                port: parse_or("SMTP_PORT", get("SMTP_PORT"), DEFAULT_SMTP_PORT)?,
            }),
            _ => None,
        };

        let keepalive_secs: u64 =
            parse_or("KEEPALIVE_SECS", get("KEEPALIVE_SECS"), DEFAULT_KEEPALIVE_SECS)?;
        if keepalive_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "KEEPALIVE_SECS".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(ServerConfig {
            bind_addr: get("PORTFOLIO_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            api_key: SecretString::from(api_key),
            provider_base_url: get("ALPHAVANTAGE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            mail,
            catalog_path: get("CATALOG_PATH").map(PathBuf::from),
            resume_path: get("RESUME_PATH").map(PathBuf::from),
            keepalive_interval: Duration::from_secs(keepalive_secs),
        })
    }
}

fn parse_or<T>(name: &str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value.parse().map_err(|e: T::Err| ConfigError::Invalid {
            name: name.to_string(),
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
