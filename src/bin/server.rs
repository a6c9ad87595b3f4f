// GraphQL Endpoint - Server Binary
// Loads configuration, publishes a schema and serves the endpoint
// Run with: cargo run --bin server -- --schema schema.json

//! # GraphQL Endpoint Server Binary
//!
//! Startup order:
//! ```text
//! .env → CLI flags → EndpointConfig (file + GRAPHQL_ENDPOINT__* variables)
//!   ↓
//! tracing subscriber (RUST_LOG, else the configured log filter)
//!   ↓
//! schema descriptors (--schema / schema_path, else a built-in `version` query)
//!   ↓ build_schema
//! SchemaRegistry::global()
//!   ↓
//! GraphQLServerBuilder → Axum server
//! ```
//!
//! ## Rust Learning Notes:
//!
//! `main` returns `anyhow::Result`, so every library error converts with `?`
//! and is printed with its full message if startup fails.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use dotenv::dotenv;
use graphql_endpoint::{
    build_schema, default_descriptors, load_descriptors, EndpointConfig, GraphQLServerBuilder,
    SchemaRegistry,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "graphql-endpoint")]
#[command(about = "Serve a GraphQL endpoint over HTTP")]
#[command(version)]
struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long, env = "GRAPHQL_ENDPOINT_CONFIG")]
    config: Option<PathBuf>,

    /// Listen host, overrides the configuration
    #[arg(long)]
    host: Option<String>,

    /// Listen port, overrides the configuration
    #[arg(short, long)]
    port: Option<u16>,

    /// JSON file of schema descriptors to publish
    #[arg(long)]
    schema: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long)]
    log_filter: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional
    dotenv().ok();

    let cli = Cli::parse();

    let mut config = EndpointConfig::load(cli.config.as_deref())
        .context("failed to load endpoint configuration")?;
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(schema) = cli.schema {
        config.schema_path = Some(schema);
    }
    if let Some(log_filter) = cli.log_filter {
        config.log_filter = log_filter;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("🚀 Starting GraphQL Endpoint...");
    info!("=====================================");

    let descriptors = match &config.schema_path {
        Some(path) => load_descriptors(path)
            .with_context(|| format!("failed to read schema descriptors from {}", path.display()))?,
        None => {
            info!("No schema file configured, publishing the built-in version query");
            default_descriptors()
        }
    };
    let schema = build_schema(&descriptors).context("failed to build schema")?;
    SchemaRegistry::global().replace(schema);
    info!("✅ Schema published");

    GraphQLServerBuilder::new()
        .with_config(config)
        .build_and_run()
        .await?;

    Ok(())
}
