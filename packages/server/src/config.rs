use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

use crate::kernel::Limits;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_TABLE_PREFIX: &str = "EventCRM";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// In-memory storage is used when unset
    pub database_url: Option<String>,
    pub port: u16,
    pub table_prefix: String,
    pub sendgrid: Option<SendGridConfig>,
    pub limits: Limits,
}

#[derive(Debug, Clone)]
pub struct SendGridConfig {
    pub api_key: String,
    pub sender_email: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let defaults = Limits::default();
        let limits = Limits {
            count_lookup_concurrency: parse_var(
                "COUNT_LOOKUP_CONCURRENCY",
                defaults.count_lookup_concurrency,
            )?,
            bulk_email_concurrency: parse_var(
                "BULK_EMAIL_CONCURRENCY",
                defaults.bulk_email_concurrency,
            )?,
            max_email_recipients: parse_var("MAX_EMAIL_RECIPIENTS", defaults.max_email_recipients)?,
        };

        let sendgrid = match (
            non_empty_var("SENDGRID_API_KEY"),
            non_empty_var("SENDGRID_SENDER_EMAIL"),
        ) {
            (Some(api_key), Some(sender_email)) => Some(SendGridConfig {
                api_key,
                sender_email,
            }),
            _ => None,
        };

        Ok(Self {
            database_url: non_empty_var("DATABASE_URL"),
            port: parse_var("PORT", DEFAULT_PORT)?,
            table_prefix: non_empty_var("TABLE_PREFIX")
                .unwrap_or_else(|| DEFAULT_TABLE_PREFIX.to_string()),
            sendgrid,
            limits,
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match non_empty_var(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid number, got '{}'", name, raw)),
        None => Ok(default),
    }
}
