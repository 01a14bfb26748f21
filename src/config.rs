use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

use crate::services::freshness::DEFAULT_TOLERANCE_SECS;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub environment: String,
    pub port: u16,
    /// Shared HMAC key for webhook signature verification. Read once at
    /// startup and passed into the verifier; never logged.
    #[serde(skip_serializing)]
    pub secret_key: String,
    /// Maximum accepted age of a payload's embedded timestamp, in seconds
    pub freshness_tolerance_secs: i64,
    /// Optional PostgreSQL connection string. When absent, accepted
    /// payloads are logged instead of persisted.
    pub database_url: Option<String>,
    /// Upper bound on a single store call, in seconds
    pub store_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        Ok(Config {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?,
            secret_key: env::var("SECRET_KEY")
                .map_err(|_| anyhow::anyhow!("SECRET_KEY environment variable is required"))?,
            freshness_tolerance_secs: env::var("WEBHOOK_TOLERANCE_SECS")
                .unwrap_or_else(|_| DEFAULT_TOLERANCE_SECS.to_string())
                .parse()?,
            database_url: env::var("DATABASE_URL").ok(),
            store_timeout_secs: env::var("STORE_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()?,
        })
    }

    /// Validate configuration values before the server starts.
    pub fn validate(&self) -> Result<()> {
        if self.secret_key.trim().is_empty() {
            anyhow::bail!("SECRET_KEY must not be empty");
        }
        if self.secret_key.len() < 16 && self.environment == "production" {
            anyhow::bail!("SECRET_KEY must be at least 16 characters in production");
        }
        if self.freshness_tolerance_secs < 0 {
            anyhow::bail!("WEBHOOK_TOLERANCE_SECS must not be negative");
        }
        Ok(())
    }
}
