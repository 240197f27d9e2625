use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bookblend_server::catalog::CatalogService;
use bookblend_server::config::{AppConfig, CliConfig, FileConfig, Secrets};
use bookblend_server::goodreads::GoodreadsClient;
use bookblend_server::hardcover::HardcoverClient;
use bookblend_server::server::{run_server, RequestsLoggingLevel, ServerConfig};

#[derive(Parser, Debug)]
struct CliArgs {
    /// The port to listen on.
    #[clap(short, long, default_value_t = 3001)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Base URL of the shelf catalog site.
    #[clap(long)]
    pub goodreads_base_url: Option<String>,

    /// URL of the tag metadata GraphQL endpoint.
    #[clap(long)]
    pub hardcover_url: Option<String>,

    /// Timeout in seconds for upstream requests.
    #[clap(long, default_value_t = 30)]
    pub upstream_timeout_sec: u64,

    /// Path to a TOML config file. File values override CLI values.
    #[clap(long)]
    pub config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    let file_config = match &cli_args.config {
        Some(path) => Some(FileConfig::load(path)?),
        None => None,
    };

    let secrets = Secrets::from_env().context("Failed to load secrets from environment")?;

    let cli_config = CliConfig {
        port: cli_args.port,
        logging_level: cli_args.logging_level,
        goodreads_base_url: cli_args.goodreads_base_url,
        hardcover_url: cli_args.hardcover_url,
        upstream_timeout_sec: cli_args.upstream_timeout_sec,
    };
    let config = AppConfig::resolve(&cli_config, file_config, secrets)?;

    let shelf = Arc::new(GoodreadsClient::new(
        config.goodreads_base_url.clone(),
        config.upstream_timeout_sec,
    )?);
    let tags = Arc::new(HardcoverClient::new(
        config.hardcover_url.clone(),
        config.secrets.hardcover_bearer_token.clone(),
        config.upstream_timeout_sec,
    )?);
    let catalog = Arc::new(CatalogService::new(shelf, tags));

    info!("Shelf catalog source at {}", config.goodreads_base_url);
    info!("Tag metadata source at {}", config.hardcover_url);
    info!("Ready to serve at port {}!", config.port);

    let server_config = ServerConfig {
        port: config.port,
        requests_logging_level: config.logging_level,
        api_key: config.secrets.api_key,
    };
    run_server(server_config, catalog).await
}
