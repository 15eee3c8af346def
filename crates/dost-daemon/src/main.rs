//! Dost Daemon - collaborative coding classroom backend
//!
//! The daemon provides:
//! - Account registration and bearer-token login
//! - Code execution through Judge0
//! - AI assistant and Liveblocks token proxies

use clap::Parser;
use dost_daemon::error::{DaemonError, DaemonResult};
use dost_daemon::{DaemonConfig, Server};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Dost Daemon CLI
#[derive(Parser)]
#[command(name = "dostd")]
#[command(about = "Dost Daemon - collaborative coding classroom backend", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "DOST_CONFIG")]
    config: Option<String>,

    /// Listen address (overrides server.listen_addr)
    #[arg(short, long, env = "DOST_LISTEN_ADDR")]
    listen: Option<String>,

    /// Log level (overrides logging.level)
    #[arg(long, env = "DOST_LOG_LEVEL")]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long, env = "DOST_LOG_JSON")]
    json: bool,
}

#[tokio::main]
async fn main() -> DaemonResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = DaemonConfig::load(cli.config.as_deref())?;

    // Override with CLI args
    if let Some(listen) = cli.listen.as_deref() {
        config.server.listen_addr = listen
            .parse()
            .map_err(|e| DaemonError::Config(format!("Invalid listen address: {}", e)))?;
    }

    // Initialize tracing
    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| level.into());

    if cli.json || config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    let server = Server::new(config.clone())?;

    // Print startup banner
    println!(
        r#"
  ____   ___  ____ _____
 |  _ \ / _ \/ ___|_   _|
 | | | | | | \___ \ | |
 | |_| | |_| |___) || |
 |____/ \___/|____/ |_|

  Dost - Collaborative Coding Classroom
  Version: {}
  Judge0: {}
  Listening: {}
"#,
        env!("CARGO_PKG_VERSION"),
        if config.judge.uses_keyed_provider() {
            "RapidAPI (keyed)"
        } else {
            "public instance"
        },
        config.server.listen_addr
    );

    server.run().await
}
