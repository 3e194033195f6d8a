//! Suite execution

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use erc777_conformance::{ReferenceFixture, RpcFixture, Runner, SuiteReport};
use erc777_sdk::RpcClient;

use crate::{config::Config, CliError};

/// Run the operator suite
#[derive(Debug, Args)]
pub struct RunCommand {
    /// Target the in-memory reference token instead of a node
    #[arg(long, conflicts_with = "bytecode")]
    reference: bool,

    /// File with the token's hex creation bytecode (overrides config)
    #[arg(long, value_name = "PATH")]
    bytecode: Option<PathBuf>,

    /// Only run scenarios whose id or title contains TEXT
    #[arg(long, value_name = "TEXT")]
    filter: Option<String>,
}

impl RunCommand {
    pub async fn execute(self, config: &Config, json: bool) -> Result<(), CliError> {
        let mut runner = Runner::new(config.suite_settings());
        if let Some(filter) = self.filter {
            runner = runner.with_filter(filter);
        }

        let report = if self.reference {
            runner.run(&ReferenceFixture::new()).await
        } else {
            let path = self
                .bytecode
                .or_else(|| config.bytecode_path.clone())
                .ok_or_else(|| {
                    CliError::Bytecode(
                        "no token bytecode; pass --bytecode PATH, set one with \
                         `config --set-bytecode PATH`, or use --reference"
                            .to_string(),
                    )
                })?;
            let code = read_bytecode(&path)?;

            let client =
                Arc::new(RpcClient::connect(&config.rpc_url).with_poll_interval(config.poll_interval()));
            let fixture = RpcFixture::from_hex(client.clone(), &code)?
                .with_mint_signature(config.mint_signature.clone());

            let chain_id = client
                .chain_id()
                .await
                .map_err(|e| CliError::Sdk(e.to_string()))?;
            tracing::info!(rpc_url = %config.rpc_url, chain_id, "connected");
            let fixture =
                fixture.with_endpoint(format!("{} (chain {})", config.rpc_url, chain_id));
            runner.run(&fixture).await
        };

        if report.results.is_empty() {
            return Err(CliError::InvalidInput(
                "no scenario matches the filter".to_string(),
            ));
        }
        print_report(&report, json)?;

        if !report.is_success() {
            return Err(CliError::SuiteFailed {
                failed: report.failed(),
                total: report.results.len(),
            });
        }
        Ok(())
    }
}

fn read_bytecode(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path)
        .map_err(|e| CliError::Bytecode(format!("cannot read {}: {}", path.display(), e)))
}

fn print_report(report: &SuiteReport, json: bool) -> Result<(), CliError> {
    if json {
        println!("{}", serde_json::to_string_pretty(&report.to_json())?);
    } else {
        print!("{}", report.summary());
    }
    Ok(())
}
