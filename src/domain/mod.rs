//! Domain layer - felts, ABI shapes and the resolved type model

pub mod abi;
pub mod felt;
