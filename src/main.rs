use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pocketbase_gateway::cli::{self, Cli, Command};
use pocketbase_gateway::config::{AppConfig, LogFormat};
use pocketbase_gateway::{app, auth::TokenService, pocketbase::PocketBaseClient, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so local runs pick up POCKETBASE_URL, PRIVATEKEY, etc.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env();
    cli.apply(&mut config);

    init_tracing(config.logging.format);

    match cli.command() {
        Command::Serve => serve(config).await,
        Command::CheckKeys => {
            cli::check_keys(&config)?;
            println!("key pair OK");
            Ok(())
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    tracing::info!(environment = ?config.environment, version = %config.server.version, "starting gateway");

    let tokens = TokenService::from_config(&config.security).context("loading key material")?;
    let store = PocketBaseClient::from_config(&config.pocketbase).context("building record store client")?;
    tracing::info!(pocketbase = %store.base_url(), "record store configured");

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let state = AppState::new(config, tokens, Arc::new(store));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!(addr = %bind_addr, "listening");

    axum::serve(listener, app(state)).await.context("server error")?;
    Ok(())
}
