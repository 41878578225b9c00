// cli.rs - command line for the gateway binary
use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::auth::{SessionPayload, TokenService, UserProfile};
use crate::config::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "pocketbase-gateway")]
#[command(about = "CRUD and session API gateway in front of PocketBase")]
#[command(version)]
pub struct Cli {
    /// Overrides PORT
    #[arg(long, global = true)]
    pub port: Option<u16>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Start the HTTP server (default)
    Serve,
    /// Load the key pair, then sign and verify a probe token
    CheckKeys,
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Serve)
    }

    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}

/// Round-trips a short-lived token through the configured key pair.
pub fn check_keys(config: &AppConfig) -> anyhow::Result<()> {
    let tokens = TokenService::from_config(&config.security).context("loading key material")?;

    let probe = SessionPayload {
        profile: UserProfile {
            id: "check-keys".to_string(),
            ..Default::default()
        },
        ext_token: String::new(),
    };
    let token = tokens.issue(&probe, 60).context("signing probe token")?;
    let decoded: SessionPayload = tokens.verify(&token).context("verifying probe token")?;

    anyhow::ensure!(decoded.profile.id == probe.profile.id, "probe token did not round-trip");
    Ok(())
}
