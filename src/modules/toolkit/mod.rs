//! Toolkit commands for ABI inspection and calldata conversion

pub mod decode;
pub mod encode;
pub mod felt;
pub mod functions;
pub mod multicall;
pub mod schema;
pub mod selector;

use anyhow::{bail, Context};
use serde_json::{Map, Value};

/// Result of a toolkit operation
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    pub title: String,
    pub content: Vec<(String, String)>, // (label, value) pairs
    /// Structured payload printed as-is in JSON mode
    pub data: Option<Value>,
}

impl ToolResult {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: Vec::new(),
            data: None,
        }
    }

    pub fn add(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.content.push((label.into(), value.into()));
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Look up the first value for `label`
    pub fn get(&self, label: &str) -> Option<&str> {
        self.content
            .iter()
            .find(|(k, _)| k == label)
            .map(|(_, v)| v.as_str())
    }

    pub fn render_text(&self) -> String {
        let width = self.content.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        let mut out = format!("{}\n", self.title);
        for (label, value) in &self.content {
            let mut lines = value.lines();
            let first = lines.next().unwrap_or("");
            out.push_str(&format!("  {label:<width$}  {first}\n"));
            for line in lines {
                out.push_str(&format!("  {:width$}  {line}\n", ""));
            }
        }
        out
    }

    pub fn to_json(&self) -> Value {
        if let Some(data) = &self.data {
            return data.clone();
        }
        let mut object = Map::new();
        object.insert("title".to_string(), Value::String(self.title.clone()));
        for (label, value) in &self.content {
            object.insert(label.clone(), Value::String(value.clone()));
        }
        Value::Object(object)
    }
}

/// Collect felt tokens from command-line input
///
/// Accepts a single JSON array, or tokens separated by whitespace/commas
/// across any number of arguments.
pub fn parse_tokens(inputs: &[String]) -> anyhow::Result<Vec<String>> {
    if let [single] = inputs {
        let trimmed = single.trim();
        if trimmed.starts_with('[') {
            let values: Vec<Value> =
                serde_json::from_str(trimmed).context("invalid JSON token array")?;
            return values
                .into_iter()
                .map(|value| match value {
                    Value::String(s) => Ok(s),
                    Value::Number(n) => Ok(n.to_string()),
                    other => bail!("unsupported calldata token: {other}"),
                })
                .collect();
        }
    }

    Ok(inputs
        .iter()
        .flat_map(|input| input.split(|c: char| c == ',' || c.is_whitespace()))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect())
}

/// Pretty-print a JSON value for the text renderer
fn pretty(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}
