//! Scenario listing

use clap::Args;
use erc777_conformance::{Labels, Runner, SuiteSettings};
use serde_json::json;

use crate::{output::Output, CliError};

/// List scenarios without running them
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Only list scenarios whose id or title contains TEXT
    #[arg(long, value_name = "TEXT")]
    filter: Option<String>,
}

impl ListCommand {
    pub fn execute(self, json: bool) -> Result<(), CliError> {
        let mut runner = Runner::new(SuiteSettings::default());
        if let Some(filter) = self.filter {
            runner = runner.with_filter(filter);
        }

        let labels = Labels::placeholder();
        let selected = runner.selected(&labels);

        let entries: Vec<_> = selected
            .iter()
            .map(|s| json!({ "id": s.id(), "title": s.title(&labels) }))
            .collect();

        let mut output = Output::new(json)
            .field_u64("count", selected.len() as u64)
            .field_value("scenarios", entries.into());
        for scenario in &selected {
            output = output.line(format!("{:<26} {}", scenario.id(), scenario.title(&labels)));
        }
        output.print();
        Ok(())
    }
}
