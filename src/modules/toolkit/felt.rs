//! Felt hex/decimal/short-string conversion

use anyhow::{bail, Context};

use super::ToolResult;
use crate::domain::felt::Felt;

/// Convert between hex, decimal, and short-string representations
pub fn felt_convert(input: &str) -> anyhow::Result<ToolResult> {
    let input = input.trim();
    if input.is_empty() {
        bail!("usage: felt <value>");
    }

    let numeric = input.starts_with("0x")
        || input.starts_with("0X")
        || input.chars().all(|c| c.is_ascii_digit());

    if numeric {
        let felt = Felt::parse(input).with_context(|| format!("invalid felt `{input}`"))?;
        let mut result = ToolResult::new("Felt Convert")
            .add("hex", felt.to_hex())
            .add("dec", felt.to_dec());
        if let Some(text) = felt.to_short_string().filter(|s| !s.is_empty()) {
            result = result.add("string", format!("\"{text}\""));
        }
        return Ok(result);
    }

    let felt = Felt::from_short_string(input).with_context(|| {
        format!("`{input}` is not a number or a short string (max 31 ASCII chars)")
    })?;
    Ok(ToolResult::new("Felt Convert")
        .add("string", format!("\"{input}\""))
        .add("hex", felt.to_hex())
        .add("dec", felt.to_dec()))
}
