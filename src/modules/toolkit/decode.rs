//! Decode command for calldata and call results

use serde_json::json;

use super::encode::find_function;
use super::{pretty, ToolResult};
use crate::infrastructure::abi::{decode_inputs, decode_outputs, DecodedArgs, ParsedAbi};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Calldata passed to the function
    Inputs,
    /// Values returned by the function
    Outputs,
}

pub fn decode(
    abi: &ParsedAbi,
    function: &str,
    tokens: &[String],
    direction: Direction,
) -> anyhow::Result<ToolResult> {
    let descriptor = find_function(abi, function)?;
    let decoded = match direction {
        Direction::Inputs => decode_inputs(descriptor, tokens),
        Direction::Outputs => decode_outputs(descriptor, tokens),
    };

    let title = match direction {
        Direction::Inputs => "Decode Calldata",
        Direction::Outputs => "Decode Result",
    };
    let mut result = ToolResult::new(title).add("function", descriptor.signature());
    result = add_args(result, &decoded);

    Ok(result.with_data(json!({
        "function": descriptor.name,
        "selector": descriptor.selector_hex(),
        "args": decoded.args,
        "consumed": decoded.consumed,
        "issues": decoded.issues,
    })))
}

fn add_args(mut result: ToolResult, decoded: &DecodedArgs) -> ToolResult {
    for arg in &decoded.args {
        result = result.add(format!("{} ({})", arg.name, arg.kind), pretty(&arg.value));
    }
    for issue in &decoded.issues {
        result = result.add("issue", issue.to_string());
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::abi::parse_abi_json;

    const ABI: &str = r#"[
        {"type": "function", "name": "balance_of", "state_mutability": "view",
         "inputs": [
            {"name": "account", "type": "core::starknet::contract_address::ContractAddress"}
         ],
         "outputs": [{"type": "core::integer::u256"}]}
    ]"#;

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_decode_outputs() {
        let abi = parse_abi_json(ABI).unwrap();
        let result = decode(&abi, "balance_of", &tokens(&["5", "1"]), Direction::Outputs).unwrap();
        assert_eq!(
            result.get("arg0 (core::integer::u256)"),
            Some("340282366920938463463374607431768211461")
        );
        assert_eq!(result.to_json()["consumed"], 2);
    }

    #[test]
    fn test_decode_reports_issues() {
        let abi = parse_abi_json(ABI).unwrap();
        let result =
            decode(&abi, "balance_of", &tokens(&["0x1", "0x2"]), Direction::Inputs).unwrap();
        assert_eq!(result.get("issue"), Some("1 unexpected trailing tokens"));
    }
}
