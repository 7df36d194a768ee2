//! Account multicall framing and per-call decoding

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::decoder::decode_inputs;
use crate::domain::abi::{
    AbiDecoder, DecodeIssue, DecodedArg, DecodedCall, FunctionDescriptor, SelectorRegistry,
};
use crate::domain::felt::{parse_u256, Felt};

/// One call of an `__execute__` batch, arguments still raw
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawCall {
    pub contract_address: String,
    pub selector: String,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Multicall {
    pub calls: Vec<RawCall>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<DecodeIssue>,
}

/// Split `[count, (to, selector, argc, args...)*]` into calls
///
/// A malformed header or argument count stops the split; the calls read so
/// far are kept.
pub fn split_multicall<S: AsRef<str>>(calldata: &[S]) -> Multicall {
    let tokens: Vec<&str> = calldata.iter().map(AsRef::<str>::as_ref).collect();
    let mut calls = Vec::new();
    let mut issues = Vec::new();

    let Some(count_token) = tokens.first() else {
        issues.push(DecodeIssue::Truncated {
            path: "call_count".to_string(),
            position: 0,
        });
        return Multicall { calls, issues };
    };
    let Some(count) = parse_count(count_token) else {
        issues.push(DecodeIssue::InvalidNumber {
            path: "call_count".to_string(),
            token: count_token.to_string(),
        });
        return Multicall { calls, issues };
    };

    let mut pos = 1;
    for idx in 0..count {
        let path = format!("calls[{idx}]");
        if pos + 3 > tokens.len() {
            issues.push(DecodeIssue::Truncated {
                path,
                position: tokens.len(),
            });
            return Multicall { calls, issues };
        }

        let contract_address = tokens[pos].to_string();
        let selector = tokens[pos + 1].to_string();
        let argc_token = tokens[pos + 2];
        let Some(argc) = parse_count(argc_token) else {
            issues.push(DecodeIssue::InvalidNumber {
                path: format!("{path}.calldata_len"),
                token: argc_token.to_string(),
            });
            return Multicall { calls, issues };
        };

        let start = pos + 3;
        let end = start.saturating_add(argc);
        if end > tokens.len() {
            issues.push(DecodeIssue::Truncated {
                path: format!("{path}.calldata"),
                position: tokens.len(),
            });
            calls.push(RawCall {
                contract_address,
                selector,
                args: tokens[start..].iter().map(|t| t.to_string()).collect(),
            });
            return Multicall { calls, issues };
        }

        calls.push(RawCall {
            contract_address,
            selector,
            args: tokens[start..end].iter().map(|t| t.to_string()).collect(),
        });
        pos = end;
    }

    if pos < tokens.len() {
        issues.push(DecodeIssue::TrailingTokens {
            count: tokens.len() - pos,
        });
    }
    Multicall { calls, issues }
}

fn parse_count(token: &str) -> Option<usize> {
    parse_u256(token).ok().and_then(|v| usize::try_from(v).ok())
}

/// A decoded multicall batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedMulticall {
    pub calls: Vec<DecodedCall>,
    /// Framing problems; per-call issues live on each call
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<DecodeIssue>,
}

/// Decodes calls against the functions of a selector registry
pub struct CallDecoder {
    registry: SelectorRegistry,
}

impl CallDecoder {
    pub fn new(registry: SelectorRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &SelectorRegistry {
        &self.registry
    }

    /// Split a multicall and decode every call it contains
    pub fn decode_multicall<S: AsRef<str>>(&self, calldata: &[S]) -> DecodedMulticall {
        let Multicall { calls, issues } = split_multicall(calldata);
        let calls = calls.into_iter().map(|call| self.decode_call(call)).collect();
        DecodedMulticall { calls, issues }
    }

    /// Decode a single framed call, falling back to raw arguments
    pub fn decode_call(&self, call: RawCall) -> DecodedCall {
        let known = Felt::parse(&call.selector)
            .ok()
            .and_then(|selector| self.decode_by_selector(&selector, &call.args));

        let mut decoded = known.unwrap_or_else(|| unknown_call(&call));
        decoded.contract = Some(call.contract_address);
        decoded
    }
}

impl AbiDecoder for CallDecoder {
    fn decode_calldata(&self, function: &FunctionDescriptor, calldata: &[String]) -> DecodedCall {
        let decoded = decode_inputs(function, calldata);
        DecodedCall {
            contract: None,
            function_name: Some(function.name.clone()),
            selector: function.selector_hex(),
            arguments: decoded.args,
            raw_args: calldata.to_vec(),
            issues: decoded.issues,
        }
    }

    fn decode_by_selector(&self, selector: &Felt, calldata: &[String]) -> Option<DecodedCall> {
        let function = self.registry.lookup(selector)?;
        Some(self.decode_calldata(function, calldata))
    }
}

fn unknown_call(call: &RawCall) -> DecodedCall {
    debug!(selector = %call.selector, "no ABI for selector, keeping raw arguments");
    let selector = Felt::parse(&call.selector)
        .map(|s| s.to_hex())
        .unwrap_or_else(|_| call.selector.clone());

    DecodedCall {
        contract: None,
        function_name: None,
        selector: selector.clone(),
        arguments: call
            .args
            .iter()
            .enumerate()
            .map(|(idx, arg)| DecodedArg {
                name: format!("arg{idx}"),
                kind: "unknown".to_string(),
                value: Value::String(arg.clone()),
            })
            .collect(),
        raw_args: call.args.clone(),
        issues: vec![DecodeIssue::UnknownSelector { selector }],
    }
}
