//! Scanner and multicall decoding over ABI files on disk

use std::fs;
use std::path::Path;

use felt_lens::config;
use felt_lens::domain::abi::DecodeIssue;
use felt_lens::domain::felt::selector_from_name;
use felt_lens::infrastructure::{AbiScanner, CallDecoder};
use serde_json::json;

const TOKEN_ABI: &str = r#"[
    {"type": "struct", "name": "core::integer::u256", "members": [
        {"name": "low", "type": "core::integer::u128"},
        {"name": "high", "type": "core::integer::u128"}
    ]},
    {"type": "function", "name": "transfer", "state_mutability": "external",
     "inputs": [
        {"name": "recipient", "type": "core::starknet::contract_address::ContractAddress"},
        {"name": "amount", "type": "core::integer::u256"}
     ],
     "outputs": [{"type": "core::bool"}]},
    {"type": "function", "name": "approve", "state_mutability": "external",
     "inputs": [
        {"name": "spender", "type": "core::starknet::contract_address::ContractAddress"},
        {"name": "amount", "type": "core::integer::u256"}
     ],
     "outputs": [{"type": "core::bool"}]}
]"#;

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[test]
fn test_scan_project_tree() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    // Scarb contract class with the ABI embedded as a JSON string
    let class = json!({ "sierra_program": [], "abi": TOKEN_ABI });
    write(
        &root.join("target/dev/token_Token.contract_class.json"),
        &class.to_string(),
    );
    // Dependencies are never scanned
    write(
        &root.join("node_modules/pkg/abi.json"),
        r#"[{"type": "function", "name": "ignored", "inputs": [], "outputs": []}]"#,
    );
    write(&root.join("package.json"), r#"{"name": "frontend"}"#);
    write(&root.join("broken.json"), "{ nope");
    write(&root.join("README.md"), "# not json");

    let registry = AbiScanner::default().scan(root);
    assert_eq!(registry.scanned_files, 3);
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.errors.len(), 1);
    assert!(registry.errors[0].contains("broken.json"));

    let transfer = registry.lookup(&selector_from_name("transfer")).unwrap();
    assert!(transfer
        .source
        .as_ref()
        .unwrap()
        .ends_with("target/dev/token_Token.contract_class.json"));
    assert!(registry.lookup(&selector_from_name("ignored")).is_none());
}

#[test]
fn test_decode_multicall_against_scanned_abis() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("erc20.json"), TOKEN_ABI);

    let registry = AbiScanner::default().scan_roots(&[dir.path().to_path_buf()]);
    let decoder = CallDecoder::new(registry);

    let transfer = selector_from_name("transfer").to_hex();
    let approve = selector_from_name("approve").to_hex();
    let calldata: Vec<String> = [
        "0x3",
        "0x49d36570d4e46f48e99674bd3fcc84644ddd6b96f7c741b1562b82f9e004dc7",
        transfer.as_str(),
        "0x3",
        "0x5b53783880534bf39ba4224ffbf6cdbca5d9f8f018a21cf1fe870dff409b3ce",
        "0x9184e72a000",
        "0x0",
        "0x49d36570d4e46f48e99674bd3fcc84644ddd6b96f7c741b1562b82f9e004dc7",
        approve.as_str(),
        "0x3",
        "0x1",
        "0x2",
        "0x0",
        "0x7",
        "0x1234",
        "0x1",
        "0xabc",
    ]
    .iter()
    .map(|t| t.to_string())
    .collect();

    let batch = decoder.decode_multicall(&calldata);
    assert!(batch.issues.is_empty());
    assert_eq!(batch.calls.len(), 3);

    let first = &batch.calls[0];
    assert_eq!(first.function_name.as_deref(), Some("transfer"));
    assert_eq!(first.arguments[1].name, "amount");
    assert_eq!(first.arguments[1].value, json!("10000000000000"));

    assert_eq!(batch.calls[1].function_name.as_deref(), Some("approve"));
    assert_eq!(batch.calls[1].arguments[1].value, json!("2"));

    let unknown = &batch.calls[2];
    assert_eq!(unknown.function_name, None);
    assert_eq!(unknown.contract.as_deref(), Some("0x7"));
    assert_eq!(unknown.arguments[0].kind, "unknown");
    assert_eq!(
        unknown.issues,
        vec![DecodeIssue::UnknownSelector {
            selector: "0x1234".into()
        }]
    );
}

#[test]
fn test_config_file_drives_scan() {
    let dir = tempfile::tempdir().unwrap();
    let abis = dir.path().join("abis");
    write(&abis.join("erc20.json"), TOKEN_ABI);

    let config_path = dir.path().join("config.toml");
    fs::write(
        &config_path,
        "abi_paths = [\"abis\"]\n\n[scan]\nmax_file_bytes = 1048576\n\n[resolver]\nmax_depth = 8\n",
    )
    .unwrap();

    let config = config::load_from(&config_path).unwrap();
    assert_eq!(config.resolver.max_depth, 8);

    let roots = config.abi_roots(dir.path());
    assert_eq!(roots, [abis]);

    let registry = AbiScanner::new(config.scan_options()).scan_roots(&roots);
    assert_eq!(registry.loaded_functions, 2);
}
