//! Infrastructure layer
//!
//! This layer contains:
//! - The ABI codec (type resolver, schema generator, encoder, decoder)
//! - ABI discovery on the local filesystem

pub mod abi;

pub use abi::{AbiScanner, CallDecoder};
