//! felt-lens: ABI-driven calldata codec for Starknet contracts
//!
//! Resolves Cairo ABI type strings into a [`TypeNode`](domain::abi::TypeNode)
//! tree and uses it to generate JSON Schemas, encode JSON values into felt
//! calldata and decode calldata or call results back into JSON.

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logging;
pub mod modules;
