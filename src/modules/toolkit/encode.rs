//! Encode command for building function calldata from JSON arguments

use anyhow::{anyhow, Context};
use serde_json::{json, Value};

use super::ToolResult;
use crate::domain::abi::FunctionDescriptor;
use crate::infrastructure::abi::{encode_inputs, ParsedAbi};

/// Encode `args` (a JSON object or array) for `function`
pub fn encode(abi: &ParsedAbi, function: &str, args: &str) -> anyhow::Result<ToolResult> {
    let descriptor = find_function(abi, function)?;

    let args = args.trim();
    let value: Value = if args.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(args).context("arguments must be a JSON object or array")?
    };

    let calldata = encode_inputs(descriptor, &value)
        .with_context(|| format!("failed to encode arguments for `{}`", descriptor.name))?;

    Ok(ToolResult::new("Encode")
        .add("function", descriptor.signature())
        .add("selector", descriptor.selector_hex())
        .add("calldata", json!(calldata).to_string())
        .add("len", calldata.len().to_string())
        .with_data(json!({
            "function": descriptor.name,
            "selector": descriptor.selector_hex(),
            "calldata": calldata,
        })))
}

/// Find a function by name, listing the available ones on a miss
pub fn find_function<'a>(abi: &'a ParsedAbi, name: &str) -> anyhow::Result<&'a FunctionDescriptor> {
    let name = name.trim();
    abi.function(name).ok_or_else(|| {
        let known: Vec<&str> = abi
            .functions()
            .chain(abi.constructor.as_ref())
            .map(|f| f.name.as_str())
            .collect();
        anyhow!("no function `{name}` in ABI (available: {})", known.join(", "))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::abi::parse_abi_json;

    const ABI: &str = r#"[
        {"type": "function", "name": "transfer", "state_mutability": "external", "outputs": [],
         "inputs": [
            {"name": "recipient", "type": "core::starknet::contract_address::ContractAddress"},
            {"name": "amount", "type": "core::integer::u256"}
         ]}
    ]"#;

    #[test]
    fn test_encode_object_and_array() {
        let abi = parse_abi_json(ABI).unwrap();

        let result = encode(&abi, "transfer", r#"{"recipient": "0x1", "amount": "10"}"#).unwrap();
        assert_eq!(result.get("calldata"), Some(r#"["0x1","10","0"]"#));
        assert_eq!(result.get("len"), Some("3"));

        let result = encode(&abi, "transfer", r#"["0x1", 10]"#).unwrap();
        assert_eq!(result.to_json()["calldata"], json!(["0x1", "10", "0"]));
    }

    #[test]
    fn test_encode_errors() {
        let abi = parse_abi_json(ABI).unwrap();
        let err = encode(&abi, "mint", "{}").unwrap_err();
        assert!(err.to_string().contains("available: transfer"));

        let err = encode(&abi, "transfer", r#"{"recipient": "0x1", "amount": "-1"}"#).unwrap_err();
        assert!(format!("{err:#}").contains("amount"));

        assert!(encode(&abi, "transfer", "not json").is_err());
    }
}
