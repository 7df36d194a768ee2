//! JSON Schema scaffolding for call forms

use anyhow::Context;

use super::{pretty, ToolResult};
use crate::infrastructure::abi::{function_schema, to_json_schema, ParsedAbi};

/// Schema of a whole call, one property per input
pub fn schema(abi: &ParsedAbi, function: &str) -> anyhow::Result<ToolResult> {
    let descriptor = super::encode::find_function(abi, function)?;
    let schema = function_schema(descriptor);

    Ok(ToolResult::new("Schema")
        .add("function", descriptor.name.as_str())
        .add("schema", pretty(&schema))
        .with_data(schema))
}

/// Schema of a single type string, resolved against the ABI's declarations
pub fn type_schema(abi: &ParsedAbi, type_name: &str) -> anyhow::Result<ToolResult> {
    let node = abi
        .resolve(type_name)
        .with_context(|| format!("cannot resolve `{type_name}`"))?;
    let schema = to_json_schema(&node);

    Ok(ToolResult::new("Schema")
        .add("type", type_name)
        .add("schema", pretty(&schema))
        .with_data(schema))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::abi::{extract_abi, parse_abi_json, parse_abi_with, ResolverOptions};
    use serde_json::json;

    const ABI: &str = r#"[
        {"type": "struct", "name": "demo::Point", "members": [
            {"name": "x", "type": "core::felt252"},
            {"name": "y", "type": "core::felt252"}
        ]},
        {"type": "function", "name": "move_to", "state_mutability": "external", "outputs": [],
         "inputs": [{"name": "p", "type": "demo::Point"}]}
    ]"#;

    #[test]
    fn test_function_schema() {
        let abi = parse_abi_json(ABI).unwrap();
        let result = schema(&abi, "move_to").unwrap();
        let data = result.to_json();
        assert_eq!(data["required"], json!(["p"]));
        assert_eq!(data["properties"]["p"]["required"], json!(["x", "y"]));
        assert!(schema(&abi, "nope").is_err());
    }

    #[test]
    fn test_type_schema() {
        let abi = parse_abi_json(ABI).unwrap();
        let data = type_schema(&abi, "core::array::Array::<demo::Point>")
            .unwrap()
            .to_json();
        assert_eq!(data["type"], "array");
        assert_eq!(data["items"]["title"], "demo::Point");
    }

    #[test]
    fn test_type_schema_uses_parse_depth() {
        let entries = extract_abi(&serde_json::from_str(ABI).unwrap()).unwrap();
        let abi = parse_abi_with(&entries, ResolverOptions { max_depth: 1 }).unwrap();
        let data = type_schema(&abi, "core::array::Array::<demo::Point>")
            .unwrap()
            .to_json();
        assert_eq!(data["type"], "array");
        // the element already sits at the depth limit
        assert_eq!(data["items"], json!({"type": "object", "title": "demo::Point"}));
    }
}
