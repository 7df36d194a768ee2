//! Function listing for a parsed ABI

use serde_json::json;

use super::ToolResult;
use crate::domain::abi::FunctionDescriptor;
use crate::infrastructure::abi::ParsedAbi;

pub fn functions(abi: &ParsedAbi) -> ToolResult {
    let mut result = ToolResult::new("Functions");

    if let Some(constructor) = &abi.constructor {
        result = result.add("constructor", line(constructor));
    }
    for function in &abi.read_functions {
        result = result.add("read", line(function));
    }
    for function in &abi.write_functions {
        result = result.add("write", line(function));
    }
    for function in &abi.l1_handlers {
        result = result.add("l1_handler", line(function));
    }

    result.with_data(json!({
        "constructor": abi.constructor,
        "read_functions": abi.read_functions,
        "write_functions": abi.write_functions,
        "l1_handlers": abi.l1_handlers,
    }))
}

fn line(function: &FunctionDescriptor) -> String {
    let outputs: Vec<&str> = function.outputs.iter().map(|p| p.type_name.as_str()).collect();
    let returns = if outputs.is_empty() {
        String::new()
    } else {
        format!(" -> ({})", outputs.join(", "))
    };
    format!("{}{returns}  {}", function.signature(), function.selector_hex())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::abi::parse_abi_json;

    #[test]
    fn test_groups_and_lines() {
        let abi = parse_abi_json(
            r#"[
                {"type": "function", "name": "get", "inputs": [],
                 "outputs": [{"type": "core::felt252"}], "state_mutability": "view"},
                {"type": "function", "name": "set",
                 "inputs": [{"name": "v", "type": "core::felt252"}],
                 "outputs": [], "state_mutability": "external"}
            ]"#,
        )
        .unwrap();

        let result = functions(&abi);
        let read = result.get("read").unwrap();
        assert!(read.starts_with("get() -> (core::felt252)  0x"));
        assert!(result.get("write").unwrap().starts_with("set(core::felt252)  0x"));
        assert_eq!(result.to_json()["read_functions"][0]["name"], "get");
        assert!(result.to_json()["constructor"].is_null());
    }
}
