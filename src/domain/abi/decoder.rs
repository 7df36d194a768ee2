//! ABI decoder trait and types

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use super::FunctionDescriptor;
use crate::domain::felt::Felt;

/// A decoded function argument
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedArg {
    /// Parameter name (or "arg{n}" if unnamed)
    pub name: String,
    /// Cairo type string (e.g., "core::felt252"), "unknown" if undecoded
    pub kind: String,
    /// Structured value; felts stay as their original token strings
    pub value: Value,
}

/// Something that did not line up while decoding
///
/// Decoding never fails outright; these are reported next to the
/// best-effort value instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum DecodeIssue {
    /// The token stream ended before `path` could be read
    Truncated { path: String, position: usize },
    /// A length, discriminant or limb token is not a number
    InvalidNumber { path: String, token: String },
    /// An Option discriminant other than 0 or 1
    InvalidDiscriminant { path: String, token: String },
    /// An enum index with no matching variant
    UnknownVariant { path: String, index: String },
    /// An array of zero-width elements claims more elements than are decoded
    LengthTooLarge { path: String, len: usize },
    /// A u256 limb is not below 2^128
    LimbOutOfRange { path: String, token: String },
    /// A generic/unknown type swallowed the remaining tokens as raw values
    Opaque {
        path: String,
        type_name: String,
        tokens: usize,
    },
    /// Tokens left over after all expected values were read
    TrailingTokens { count: usize },
    /// No known function for this selector
    UnknownSelector { selector: String },
}

impl fmt::Display for DecodeIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeIssue::Truncated { path, position } => {
                write!(f, "{path}: calldata ended at token {position}")
            }
            DecodeIssue::InvalidNumber { path, token } => {
                write!(f, "{path}: `{token}` is not a number")
            }
            DecodeIssue::InvalidDiscriminant { path, token } => {
                write!(f, "{path}: invalid option discriminant `{token}`")
            }
            DecodeIssue::UnknownVariant { path, index } => {
                write!(f, "{path}: no variant at index {index}")
            }
            DecodeIssue::LengthTooLarge { path, len } => {
                write!(f, "{path}: array length {len} is too large to decode")
            }
            DecodeIssue::LimbOutOfRange { path, token } => {
                write!(f, "{path}: u256 limb `{token}` exceeds 128 bits")
            }
            DecodeIssue::Opaque {
                path,
                type_name,
                tokens,
            } => write!(f, "{path}: `{type_name}` left undecoded ({tokens} raw tokens)"),
            DecodeIssue::TrailingTokens { count } => {
                write!(f, "{count} unexpected trailing tokens")
            }
            DecodeIssue::UnknownSelector { selector } => {
                write!(f, "no ABI function for selector {selector}")
            }
        }
    }
}

/// Result of decoding one contract call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedCall {
    /// Target contract, when the call came out of a multicall
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract: Option<String>,
    /// Function name, `None` if the selector is unknown
    pub function_name: Option<String>,
    pub selector: String,
    pub arguments: Vec<DecodedArg>,
    pub raw_args: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<DecodeIssue>,
}

/// Trait for calldata decoding implementations
pub trait AbiDecoder: Send + Sync {
    /// Decode call arguments given a function descriptor
    ///
    /// # Arguments
    /// * `function` - The function descriptor to decode with
    /// * `calldata` - The argument tokens (without multicall framing)
    fn decode_calldata(&self, function: &FunctionDescriptor, calldata: &[String]) -> DecodedCall;

    /// Decode call arguments by looking up the selector
    ///
    /// # Returns
    /// * `Some(DecodedCall)` - If the selector was found
    /// * `None` - If the selector was not found
    fn decode_by_selector(&self, selector: &Felt, calldata: &[String]) -> Option<DecodedCall>;
}
