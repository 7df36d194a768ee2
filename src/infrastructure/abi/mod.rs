//! Starknet ABI codec - type resolution, calldata encoding/decoding, scanning

mod decoder;
mod encoder;
mod multicall;
mod parser;
mod resolver;
mod scanner;
mod schema;

pub use decoder::{decode, decode_inputs, decode_outputs, Decoded, DecodedArgs};
pub use encoder::{encode, encode_inputs};
pub use multicall::{split_multicall, CallDecoder, DecodedMulticall, Multicall, RawCall};
pub use parser::{
    extract_abi, parse_abi, parse_abi_json, parse_abi_value, parse_abi_with, ParsedAbi,
};
pub use resolver::{resolve_type, ResolverOptions, TypeResolver, DEFAULT_MAX_DEPTH};
pub use scanner::{AbiScanner, ScanOptions, DEFAULT_MAX_FILE_BYTES};
pub use schema::{function_schema, to_json_schema};
