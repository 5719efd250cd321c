use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// MongoDB connection string. When unset the server runs against the
    /// in-process memory store (local development only).
    pub mongodb_uri: Option<String>,
    pub mongodb_database: String,
    /// Upper bound on the whole catalog fan-out join. Branches not completed
    /// by then are reported as failed sources for that page.
    pub federation_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let federation_timeout_ms: u64 = env::var("FEDERATION_TIMEOUT_MS")
            .unwrap_or_else(|_| "4000".to_string())
            .parse()
            .context("FEDERATION_TIMEOUT_MS must be a valid number of milliseconds")?;

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            mongodb_uri: env::var("MONGODB_URI").ok(),
            mongodb_database: env::var("MONGODB_DATABASE")
                .unwrap_or_else(|_| "realty_exchange".to_string()),
            federation_timeout: Duration::from_millis(federation_timeout_ms),
        })
    }
}
