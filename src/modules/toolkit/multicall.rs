//! Multicall command: split and decode `__execute__` calldata

use serde_json::json;

use super::{pretty, ToolResult};
use crate::infrastructure::abi::CallDecoder;

pub fn multicall(decoder: &CallDecoder, tokens: &[String]) -> ToolResult {
    let batch = decoder.decode_multicall(tokens);

    let mut result = ToolResult::new("Multicall")
        .add("calls", batch.calls.len().to_string())
        .add("known_selectors", decoder.registry().len().to_string());

    for (idx, call) in batch.calls.iter().enumerate() {
        let name = call.function_name.as_deref().unwrap_or("<unknown>");
        let contract = call.contract.as_deref().unwrap_or("-");
        result = result.add(format!("[{idx}]"), format!("{name} @ {contract} ({})", call.selector));
        for arg in &call.arguments {
            result = result.add(format!("[{idx}] {}", arg.name), pretty(&arg.value));
        }
        for issue in &call.issues {
            result = result.add(format!("[{idx}] issue"), issue.to_string());
        }
    }
    for issue in &batch.issues {
        result = result.add("issue", issue.to_string());
    }

    result.with_data(json!(batch))
}
