//! Suite results

use std::fmt::Write as _;
use std::time::Duration;

use serde::Serialize;

/// Outcome of one scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioResult {
    /// Scenario identifier
    pub id: String,
    /// Title with account labels filled in
    pub title: String,
    /// Whether every assertion held
    pub passed: bool,
    /// Failure description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Wall time including setup
    pub elapsed_ms: u64,
}

impl ScenarioResult {
    /// Passing result
    pub fn pass(id: &str, title: String, elapsed: Duration) -> Self {
        Self {
            id: id.to_string(),
            title,
            passed: true,
            detail: None,
            elapsed_ms: elapsed.as_millis() as u64,
        }
    }

    /// Failing result
    pub fn fail(id: &str, title: String, detail: String, elapsed: Duration) -> Self {
        Self {
            id: id.to_string(),
            title,
            passed: false,
            detail: Some(detail),
            elapsed_ms: elapsed.as_millis() as u64,
        }
    }
}

/// Results of one suite run
#[derive(Debug, Clone, Default, Serialize)]
pub struct SuiteReport {
    /// Token the suite ran against
    pub target: String,
    /// Per-scenario outcomes, in execution order
    pub results: Vec<ScenarioResult>,
}

impl SuiteReport {
    /// Empty report for `target`
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            results: Vec::new(),
        }
    }

    /// Append one outcome
    pub fn record(&mut self, result: ScenarioResult) {
        self.results.push(result);
    }

    /// Number of passing scenarios
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    /// Number of failing scenarios
    pub fn failed(&self) -> usize {
        self.results.len() - self.passed()
    }

    /// True when nothing failed
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Failing outcomes
    pub fn failures(&self) -> impl Iterator<Item = &ScenarioResult> {
        self.results.iter().filter(|r| !r.passed)
    }

    /// Mocha-style listing followed by the failure details
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "operator ({})", self.target);
        for result in &self.results {
            let mark = if result.passed { "ok" } else { "FAIL" };
            let _ = writeln!(out, "  [{}] {} ({}ms)", mark, result.title, result.elapsed_ms);
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "{} passing, {} failing", self.passed(), self.failed());
        for (index, failure) in self.failures().enumerate() {
            let _ = writeln!(
                out,
                "  {}) {}: {}",
                index + 1,
                failure.title,
                failure.detail.as_deref().unwrap_or("failed")
            );
        }
        out
    }

    /// JSON rendering with summary counters
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "target": self.target,
            "passed": self.passed(),
            "failed": self.failed(),
            "success": self.is_success(),
            "results": self.results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SuiteReport {
        let mut report = SuiteReport::new("reference token (in-memory)");
        report.record(ScenarioResult::pass(
            "self-is-operator",
            "should make a3 an operator for himself by default".to_string(),
            Duration::from_millis(3),
        ));
        report.record(ScenarioResult::fail(
            "operator-send",
            "should let a3 send 1.12 XRT from a1 to a2".to_string(),
            "assertion failed: balance of a1 is 10, expected 8.88".to_string(),
            Duration::from_millis(5),
        ));
        report
    }

    #[test]
    fn test_counters() {
        let report = sample();
        assert_eq!(report.passed(), 1);
        assert_eq!(report.failed(), 1);
        assert!(!report.is_success());
        assert!(SuiteReport::new("empty").is_success());
    }

    #[test]
    fn test_summary() {
        let summary = sample().summary();
        assert!(summary.contains("[ok] should make a3 an operator for himself by default (3ms)"));
        assert!(summary.contains("1 passing, 1 failing"));
        assert!(summary.contains("1) should let a3 send 1.12 XRT from a1 to a2: assertion failed"));
    }

    #[test]
    fn test_json() {
        let json = sample().to_json();
        assert_eq!(json["passed"], 1);
        assert_eq!(json["success"], false);
        assert_eq!(json["results"][0]["id"], "self-is-operator");
        assert!(json["results"][0].get("detail").is_none());
        assert_eq!(json["results"][1]["elapsed_ms"], 5);
    }
}
