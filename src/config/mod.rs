mod file_config;

pub use file_config::FileConfig;

use crate::goodreads;
use crate::hardcover;
use crate::server::RequestsLoggingLevel;
use anyhow::{Context, Result};
use clap::ValueEnum;

/// Environment variable holding the pre-shared key expected in `X-API-Key`.
pub const API_KEY_ENV: &str = "BOOKBLEND_API_KEY";

/// Environment variable holding the bearer token for the tag metadata service.
pub const BEARER_TOKEN_ENV: &str = "HARDCOVER_BEARER_TOKEN";

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub goodreads_base_url: Option<String>,
    pub hardcover_url: Option<String>,
    pub upstream_timeout_sec: u64,
}

/// Secrets loaded once at process start. Business logic receives them through
/// [`AppConfig`] and never reads the environment itself.
#[derive(Debug, Clone)]
pub struct Secrets {
    pub api_key: String,
    pub hardcover_bearer_token: String,
}

impl Secrets {
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .with_context(|| format!("{} must be set", API_KEY_ENV))?;
        let hardcover_bearer_token = std::env::var(BEARER_TOKEN_ENV)
            .with_context(|| format!("{} must be set", BEARER_TOKEN_ENV))?;
        Ok(Self {
            api_key,
            hardcover_bearer_token,
        })
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub goodreads_base_url: String,
    pub hardcover_url: String,
    pub upstream_timeout_sec: u64,
    pub secrets: Secrets,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(
        cli: &CliConfig,
        file_config: Option<FileConfig>,
        secrets: Secrets,
    ) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let port = file.port.unwrap_or(cli.port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let goodreads_base_url = file
            .goodreads_base_url
            .or_else(|| cli.goodreads_base_url.clone())
            .unwrap_or_else(|| goodreads::DEFAULT_BASE_URL.to_string());

        let hardcover_url = file
            .hardcover_url
            .or_else(|| cli.hardcover_url.clone())
            .unwrap_or_else(|| hardcover::DEFAULT_GRAPHQL_URL.to_string());

        let upstream_timeout_sec = file.upstream_timeout_sec.unwrap_or(cli.upstream_timeout_sec);

        Ok(Self {
            port,
            logging_level,
            goodreads_base_url,
            hardcover_url,
            upstream_timeout_sec,
            secrets,
        })
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
