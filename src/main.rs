//! Account panel server
//!
//! ```sh
//! # Run with default config (~/.config/account-panel/config.toml)
//! account-panel
//!
//! # Custom config path and port
//! account-panel --config /etc/account-panel/config.toml --port 9090
//!
//! # Validate config without starting
//! account-panel --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use account_panel::config::{default_config_path, AppConfig};
use account_panel::server::{init_tracing, ServerHandle, ServerOptions};

/// User account management API for the panel.
#[derive(Parser, Debug)]
#[command(
    name = "account-panel",
    version,
    about = "User account management REST API",
    long_about = "REST API for creating, searching, updating and deleting panel \
                  user accounts, gated by bearer-token scopes.\n\n\
                  Default config: ~/.config/account-panel/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "ACCOUNTS_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.unwrap_or_else(default_config_path);

    let mut config = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            let cfg = cfg.with_log_level(cli.log_level.clone());
            init_tracing(&cfg);
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            if cli.check {
                eprintln!("Configuration is invalid: {}", e);
                return Err(e.into());
            }
            // Defaults carry no token secret; log the failure and stop
            init_tracing(&AppConfig::default().with_log_level(cli.log_level.clone()));
            error!("Failed to load config from {}: {}", config_path.display(), e);
            return Err(e.into());
        }
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(port) = cli.port {
        info!("CLI override: port = {}", port);
        config.server.port = port;
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   API address : {}", config.server.address());
        println!("   Database    : {}", config.database.url);
        println!(
            "   Page sizes  : default {}, max {}",
            config.paging.default_page_size, config.paging.max_page_size
        );
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    // ── Start server ───────────────────────────────────────────
    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
        create_default_admin: true,
    })
    .await?;

    handle.install_signal_handler();

    info!("Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
