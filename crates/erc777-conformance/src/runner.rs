//! Sequential scenario runner

use std::time::Instant;

use crate::fixture::TokenFixture;
use crate::harness::{SuiteSettings, TestContext};
use crate::report::{ScenarioResult, SuiteReport};
use crate::scenarios::{Labels, Scenario, PLACEHOLDER_SYMBOL};

/// Runs scenarios one after another, each on a fresh token
#[derive(Debug, Clone)]
pub struct Runner {
    settings: SuiteSettings,
    scenarios: Vec<Scenario>,
    filter: Option<String>,
}

impl Runner {
    /// Runner over every scenario
    pub fn new(settings: SuiteSettings) -> Self {
        Self {
            settings,
            scenarios: Scenario::ALL.to_vec(),
            filter: None,
        }
    }

    /// Restrict to an explicit scenario list
    pub fn with_scenarios(mut self, scenarios: Vec<Scenario>) -> Self {
        self.scenarios = scenarios;
        self
    }

    /// Keep only scenarios whose id or title contains `filter`
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Settings applied to every scenario
    pub fn settings(&self) -> &SuiteSettings {
        &self.settings
    }

    /// Scenarios that would run, given title labels
    pub fn selected(&self, labels: &Labels) -> Vec<Scenario> {
        self.scenarios
            .iter()
            .copied()
            .filter(|s| match &self.filter {
                Some(filter) => s.matches(filter, labels),
                None => true,
            })
            .collect()
    }

    /// Run the selection against `fixture`.
    ///
    /// Failures are recorded, never propagated: a broken setup fails the
    /// scenario it belongs to and the run moves on.
    pub async fn run(&self, fixture: &dyn TokenFixture) -> SuiteReport {
        let mut labels = self.labels(fixture).await;

        let selected = self.selected(&labels);
        let mut report = SuiteReport::new(fixture.name());
        tracing::info!(
            fixture = %fixture.name(),
            scenarios = selected.len(),
            "starting operator suite"
        );

        for scenario in selected {
            let started = Instant::now();
            tracing::debug!(scenario = scenario.id(), "setting up");

            let outcome = match TestContext::setup(fixture, &self.settings).await {
                Ok(ctx) => {
                    labels = ctx.labels();
                    scenario.run(&ctx).await
                }
                Err(e) => Err(e),
            };

            let title = scenario.title(&labels);
            let elapsed = started.elapsed();
            match outcome {
                Ok(()) => {
                    tracing::info!(
                        scenario = scenario.id(),
                        elapsed_ms = elapsed.as_millis() as u64,
                        "passed"
                    );
                    report.record(ScenarioResult::pass(scenario.id(), title, elapsed));
                }
                Err(e) => {
                    tracing::warn!(scenario = scenario.id(), error = %e, "failed");
                    report.record(ScenarioResult::fail(
                        scenario.id(),
                        title,
                        e.to_string(),
                        elapsed,
                    ));
                }
            }
        }

        tracing::info!(
            passed = report.passed(),
            failed = report.failed(),
            "operator suite finished"
        );
        report
    }

    /// Title labels for selection. With a filter set, one token is deployed
    /// up front so titles carry the real symbol.
    async fn labels(&self, fixture: &dyn TokenFixture) -> Labels {
        let accounts = match fixture.chain().accounts().await {
            Ok(accounts) => accounts,
            Err(e) => {
                tracing::warn!(error = %e, "could not list accounts");
                return Labels::placeholder();
            }
        };
        if self.filter.is_none() {
            return Labels::new(&accounts, PLACEHOLDER_SYMBOL);
        }

        let symbol = match fixture.deploy().await {
            Ok(token) => token.symbol().await,
            Err(e) => Err(e),
        };
        match symbol {
            Ok(symbol) => Labels::new(&accounts, &symbol),
            Err(e) => {
                tracing::warn!(error = %e, "could not read token symbol");
                Labels::new(&accounts, PLACEHOLDER_SYMBOL)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::ReferenceFixture;

    #[test]
    fn test_filter_selection() {
        let runner = Runner::new(SuiteSettings::default()).with_filter("revoke");
        let selected = runner.selected(&Labels::placeholder());
        assert_eq!(
            selected,
            vec![
                Scenario::RevokeOperator,
                Scenario::RejectSelfRevoke,
                Scenario::RejectRevokedSend,
            ]
        );
    }

    #[test]
    fn test_explicit_scenarios() {
        let runner = Runner::new(SuiteSettings::default())
            .with_scenarios(vec![Scenario::SelfIsOperator]);
        assert_eq!(runner.selected(&Labels::placeholder()), vec![Scenario::SelfIsOperator]);
    }

    #[tokio::test]
    async fn test_run_records_titles_with_symbol() {
        let fixture = ReferenceFixture::new().symbol("OPR");
        let report = Runner::new(SuiteSettings::default())
            .with_scenarios(vec![Scenario::OperatorSend])
            .run(&fixture)
            .await;

        assert!(report.is_success(), "{}", report.summary());
        assert!(report.results[0].title.contains("1.12 OPR"));
    }

    #[tokio::test]
    async fn test_filter_matches_real_symbol() {
        let report = Runner::new(SuiteSettings::default())
            .with_filter("1.12 XRT")
            .run(&ReferenceFixture::new())
            .await;

        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].id, "operator-send");
        assert!(report.is_success(), "{}", report.summary());
    }

    #[tokio::test]
    async fn test_setup_failure_is_recorded() {
        let settings = SuiteSettings {
            initial_amount: "-1".to_string(),
            ..Default::default()
        };
        let report = Runner::new(settings)
            .with_scenarios(vec![Scenario::SelfIsOperator, Scenario::DetectNotOperator])
            .run(&ReferenceFixture::new())
            .await;

        assert_eq!(report.failed(), 2);
        assert!(report.results[0]
            .detail
            .as_deref()
            .unwrap_or_default()
            .starts_with("invalid amount"));
    }
}
