//! ABI parsing and encoding errors

use thiserror::Error;

/// Errors raised while loading an ABI or resolving its types
#[derive(Debug, Error)]
pub enum AbiError {
    #[error("invalid ABI JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("document holds no ABI (expected an array or an object with an `abi` field)")]
    MissingAbi,

    /// An `Option`-family enum without a `Some` variant cannot be resolved
    #[error("option enum `{name}` must have a `Some` variant")]
    MissingSomeVariant { name: String },
}

/// Errors raised while encoding values into calldata
///
/// `path` points at the offending value, e.g. `p.members[2].amount`.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("{path}: invalid number `{value}`")]
    InvalidNumber { path: String, value: String },

    #[error("{path}: `{value}` does not fit in {bits} bits")]
    OutOfRange {
        path: String,
        value: String,
        bits: u16,
    },

    #[error("{path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: String,
    },

    #[error("{path}: missing value")]
    MissingField { path: String },

    #[error("{path}: unknown variant `{variant}` for enum `{name}`")]
    UnknownVariant {
        path: String,
        name: String,
        variant: String,
    },

    #[error("{path}: invalid embedded JSON: {source}")]
    InvalidJson {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("argument count mismatch: expected {expected}, got {found}")]
    ArgumentCount { expected: usize, found: usize },
}
