//! Output formatting

use serde_json::{Map, Value};

/// Output builder for human or JSON CLI output
pub struct Output {
    json_mode: bool,
    fields: Map<String, Value>,
    lines: Vec<String>,
}

impl Output {
    /// Create a new output builder
    pub fn new(json_mode: bool) -> Self {
        Self {
            json_mode,
            fields: Map::new(),
            lines: Vec::new(),
        }
    }

    /// Add a string field
    pub fn field(mut self, key: &str, value: &str) -> Self {
        self.fields
            .insert(key.to_string(), Value::String(value.to_string()));
        self
    }

    /// Add a u64 field
    pub fn field_u64(mut self, key: &str, value: u64) -> Self {
        self.fields.insert(key.to_string(), Value::from(value));
        self
    }

    /// Add a JSON value field
    pub fn field_value(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    /// Append a line of human-readable output
    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    /// Rendered text, without the trailing newline
    pub fn render(&self) -> String {
        if self.json_mode {
            serde_json::to_string_pretty(&Value::Object(self.fields.clone())).unwrap_or_default()
        } else {
            self.lines.join("\n")
        }
    }

    /// Print the output
    pub fn print(self) {
        let rendered = self.render();
        if !rendered.is_empty() {
            println!("{}", rendered);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_mode_prints_lines() {
        let out = Output::new(false)
            .field("rpc_url", "http://localhost:8545")
            .line("first")
            .line("second");
        assert_eq!(out.render(), "first\nsecond");
    }

    #[test]
    fn test_json_mode_prints_fields() {
        let out = Output::new(true)
            .field("rpc_url", "http://localhost:8545")
            .field_u64("gas", 300_000)
            .line("ignored");
        let value: Value = serde_json::from_str(&out.render()).unwrap();
        assert_eq!(value["rpc_url"], "http://localhost:8545");
        assert_eq!(value["gas"], 300_000);
    }

    #[test]
    fn test_empty_human_output() {
        assert_eq!(Output::new(false).field("a", "b").render(), "");
    }
}
