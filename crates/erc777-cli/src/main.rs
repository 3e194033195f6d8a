//! # operator-tck
//!
//! Runs the ERC-777 operator conformance suite against a token.
//!
//! ## Usage
//!
//! ```bash
//! # In-memory reference token
//! operator-tck run --reference
//!
//! # Token deployed on a node, one deployment per scenario
//! operator-tck --rpc-url http://localhost:8545 run --bytecode token.hex
//! operator-tck run --filter revoke
//!
//! # Scenario catalogue
//! operator-tck list
//!
//! # Configuration
//! operator-tck config --show
//! operator-tck config --set-rpc http://localhost:8545 --set-bytecode token.hex
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod error;
mod output;

pub use config::Config;
pub use error::CliError;
pub use output::Output;

/// ERC-777 operator conformance runner
#[derive(Parser, Debug)]
#[command(name = "operator-tck")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// RPC endpoint URL
    #[arg(long, global = true)]
    rpc_url: Option<String>,

    /// Log level, used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

/// CLI commands
#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the operator suite
    Run(commands::run::RunCommand),
    /// List scenarios
    List(commands::list::ListCommand),
    /// Show or edit configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
        /// Set RPC URL
        #[arg(long, value_name = "URL")]
        set_rpc: Option<String>,
        /// Set the token bytecode file
        #[arg(long, value_name = "PATH")]
        set_bytecode: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mut config = Config::load();

    if let Some(rpc_url) = cli.rpc_url {
        config.rpc_url = rpc_url;
    }

    let result = match cli.command {
        Commands::Run(cmd) => cmd.execute(&config, cli.json).await,
        Commands::List(cmd) => cmd.execute(cli.json),
        Commands::Config {
            show,
            set_rpc,
            set_bytecode,
        } => handle_config(&mut config, show, set_rpc, set_bytecode, cli.json),
    };

    if let Err(e) = result {
        if !e.is_reported() {
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({
                        "error": e.to_string(),
                        "success": false
                    })
                );
            } else {
                eprintln!("Error: {}", e);
            }
        }
        std::process::exit(1);
    }
}

fn handle_config(
    config: &mut Config,
    show: bool,
    set_rpc: Option<String>,
    set_bytecode: Option<PathBuf>,
    json: bool,
) -> Result<(), CliError> {
    let mut modified = false;

    if let Some(rpc) = set_rpc {
        config.rpc_url = rpc;
        modified = true;
    }

    if let Some(path) = set_bytecode {
        config.bytecode_path = Some(path);
        modified = true;
    }

    if modified {
        let path = config.save()?;
        Output::new(json)
            .field("status", "saved")
            .field("path", &path.display().to_string())
            .line(format!("Configuration saved to {}", path.display()))
            .print();
    } else if show {
        let bytecode = config
            .bytecode_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none)".to_string());
        Output::new(json)
            .field_value("config", serde_json::to_value(&*config)?)
            .line(format!("RPC URL:          {}", config.rpc_url))
            .line(format!("Gas:              {}", config.gas))
            .line(format!("Mint gas:         {}", config.mint_gas))
            .line(format!("Initial amount:   {}", config.initial_amount))
            .line(format!("Decimals:         {}", config.decimals))
            .line(format!("Receipt poll:     {}ms", config.receipt_poll_ms))
            .line(format!("Mint signature:   {}", config.mint_signature))
            .line(format!("Bytecode:         {}", bytecode))
            .print();
    } else {
        Output::new(json)
            .line("Use --show to display config, or --set-rpc/--set-bytecode to modify")
            .print();
    }

    Ok(())
}
