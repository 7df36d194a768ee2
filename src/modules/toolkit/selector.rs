//! Entry point selector calculation

use anyhow::bail;

use super::ToolResult;
use crate::domain::felt::selector_from_name;

/// Compute the selector of a function name
///
/// A trailing parameter list is dropped, since Starknet selectors only
/// hash the bare name.
pub fn selector(input: &str) -> anyhow::Result<ToolResult> {
    let name = normalize_name(input);
    if name.is_empty() {
        bail!("usage: selector <function_name>");
    }

    let selector = selector_from_name(name);
    Ok(ToolResult::new("Selector")
        .add("name", name)
        .add("selector", selector.to_hex())
        .add("dec", selector.to_dec()))
}

fn normalize_name(input: &str) -> &str {
    let name = input.trim();
    let name = name.split('(').next().unwrap_or(name).trim();
    // `IERC20::transfer` style paths hash the last segment only
    name.rsplit("::").next().unwrap_or(name)
}
