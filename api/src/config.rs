use std::env;

use crate::error::ConfigError;

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Sender address, also used as the SMTP username.
    pub email_user: String,
    /// App password for the SMTP account (not the account password).
    pub email_app_password: String,
    /// Fallback recipient for `send` runs without an explicit --to.
    pub email_recipient: Option<String>,
    /// Key for the Exa search API. Serve mode refuses to start without it.
    pub exa_api_key: Option<String>,
    pub smtp_host: String,
    pub smtp_port: u16,
    /// Port the HTTP gateway listens on.
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            email_user: require("EMAIL_USER")?,
            email_app_password: require("EMAIL_APP_PASSWORD")?,
            email_recipient: env::var("EMAIL_RECIPIENT").ok(),
            exa_api_key: env::var("EXA_API_KEY").ok(),
            smtp_host: env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string()),
            smtp_port: parse_port("SMTP_PORT", 587),
            port: parse_port("PORT", 8000),
        })
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVar(name))
}

fn parse_port(name: &str, default: u16) -> u16 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
