//! JSON values to flat calldata tokens

use std::borrow::Cow;

use alloy_primitives::U256;
use serde_json::Value;
use tracing::debug;

use crate::domain::abi::types::{is_bool, is_u256};
use crate::domain::abi::{EncodeError, EnumType, FunctionDescriptor, StructType, TypeNode};
use crate::domain::felt::{parse_u256, FeltError};

const LOW_MASK: U256 = U256::from_limbs([u64::MAX, u64::MAX, 0, 0]);

/// Encode one value of type `node` into felt tokens
pub fn encode(node: &TypeNode, value: &Value) -> Result<Vec<String>, EncodeError> {
    let mut out = Vec::new();
    encode_into(node, value, "value", &mut out)?;
    Ok(out)
}

/// Encode a full argument set for `function`
///
/// `args` is either an object keyed by input name or an array in input
/// order. Tokens are concatenated in declaration order.
pub fn encode_inputs(
    function: &FunctionDescriptor,
    args: &Value,
) -> Result<Vec<String>, EncodeError> {
    let mut out = Vec::new();
    match args {
        Value::Object(map) => {
            for input in &function.inputs {
                match map.get(&input.name) {
                    Some(value) => encode_into(&input.ty, value, &input.name, &mut out)?,
                    None if input.ty.is_option() => out.push("1".to_string()),
                    None => {
                        return Err(EncodeError::MissingField {
                            path: input.name.clone(),
                        })
                    }
                }
            }
        }
        Value::Array(values) => {
            if values.len() != function.inputs.len() {
                return Err(EncodeError::ArgumentCount {
                    expected: function.inputs.len(),
                    found: values.len(),
                });
            }
            for (input, value) in function.inputs.iter().zip(values) {
                encode_into(&input.ty, value, &input.name, &mut out)?;
            }
        }
        Value::Null if function.inputs.is_empty() => {}
        other => {
            return Err(EncodeError::TypeMismatch {
                path: function.name.clone(),
                expected: "object or array of arguments",
                found: json_kind(other).to_string(),
            })
        }
    }
    Ok(out)
}

fn encode_into(
    node: &TypeNode,
    value: &Value,
    path: &str,
    out: &mut Vec<String>,
) -> Result<(), EncodeError> {
    match node {
        TypeNode::Primitive(p) if is_u256(&p.name) => {
            let (low, high) = split_u256(value, path)?;
            out.push(low);
            out.push(high);
        }
        TypeNode::Primitive(_) => out.push(scalar_token(value, path)?),
        TypeNode::Struct(s) => encode_struct(s, value, path, out)?,
        TypeNode::Enum(e) if is_bool(&e.name) => out.push(bool_token(value, path)?.to_string()),
        TypeNode::Enum(e) => encode_enum(e, value, path, out)?,
        TypeNode::Option(o) => {
            if value.is_null() {
                out.push("1".to_string());
            } else {
                out.push("0".to_string());
                let payload = if o.element_type.is_option() {
                    some_payload(value, path)?
                } else {
                    value
                };
                encode_into(&o.element_type, payload, path, out)?;
            }
        }
        TypeNode::Array(a) => {
            let parsed = parse_embedded(value, path)?;
            let Value::Array(items) = parsed.as_ref() else {
                return Err(mismatch(path, "array", parsed.as_ref()));
            };
            out.push(items.len().to_string());
            for (idx, item) in items.iter().enumerate() {
                encode_into(&a.element_type, item, &format!("{path}[{idx}]"), out)?;
            }
        }
        TypeNode::Generic(_) | TypeNode::Unknown(_) => {
            debug!(
                path,
                type_name = %node.name(),
                "type has no calldata encoding, emitting nothing"
            );
        }
    }
    Ok(())
}

fn encode_struct(
    def: &StructType,
    value: &Value,
    path: &str,
    out: &mut Vec<String>,
) -> Result<(), EncodeError> {
    let parsed = parse_embedded(value, path)?;
    match parsed.as_ref() {
        Value::Object(map) => {
            for member in &def.members {
                let member_path = format!("{path}.{}", member.name);
                match map.get(&member.name) {
                    Some(v) => encode_into(&member.ty, v, &member_path, out)?,
                    None if member.ty.is_option() => out.push("1".to_string()),
                    None => return Err(EncodeError::MissingField { path: member_path }),
                }
            }
        }
        Value::Array(items) => {
            if items.len() > def.members.len() {
                return Err(EncodeError::TypeMismatch {
                    path: path.to_string(),
                    expected: "no more values than struct members",
                    found: format!("{} values", items.len()),
                });
            }
            for (idx, member) in def.members.iter().enumerate() {
                let member_path = format!("{path}.{}", member.name);
                match items.get(idx) {
                    Some(v) => encode_into(&member.ty, v, &member_path, out)?,
                    None if member.ty.is_option() => out.push("1".to_string()),
                    None => return Err(EncodeError::MissingField { path: member_path }),
                }
            }
        }
        other => return Err(mismatch(path, "object", other)),
    }
    Ok(())
}

/// `"Variant"` or `{"Variant": payload}` → `[index, ...payload]`
fn encode_enum(
    def: &EnumType,
    value: &Value,
    path: &str,
    out: &mut Vec<String>,
) -> Result<(), EncodeError> {
    let parsed = match value {
        Value::String(s) if s.trim_start().starts_with('{') => {
            parse_embedded(value, path)?.into_owned()
        }
        other => other.clone(),
    };

    let (variant_name, payload) = match &parsed {
        Value::String(name) => (name.as_str(), None),
        Value::Object(map) if map.len() == 1 => match map.iter().next() {
            Some((name, payload)) => (name.as_str(), Some(payload)),
            None => return Err(mismatch(path, "variant name or single-key object", &parsed)),
        },
        other => return Err(mismatch(path, "variant name or single-key object", other)),
    };

    let (index, variant) = def
        .variants
        .iter()
        .enumerate()
        .find(|(_, v)| v.name == variant_name)
        .ok_or_else(|| EncodeError::UnknownVariant {
            path: path.to_string(),
            name: def.name.clone(),
            variant: variant_name.to_string(),
        })?;

    out.push(index.to_string());
    if let Some(ty) = &variant.ty {
        let payload_path = format!("{path}.{variant_name}");
        match payload {
            Some(payload) => encode_into(ty, payload, &payload_path, out)?,
            None if ty.is_option() => out.push("1".to_string()),
            None => return Err(EncodeError::MissingField { path: payload_path }),
        }
    }
    Ok(())
}

/// `{"Some": v}` → `v`, the explicit form a nested Option needs so that
/// `Some(None)` and `None` stay distinct
fn some_payload<'v>(value: &'v Value, path: &str) -> Result<&'v Value, EncodeError> {
    match value {
        Value::Object(map) if map.len() == 1 => map
            .get("Some")
            .ok_or_else(|| mismatch(path, "null or {\"Some\": value}", value)),
        other => Err(mismatch(path, "null or {\"Some\": value}", other)),
    }
}

fn split_u256(value: &Value, path: &str) -> Result<(String, String), EncodeError> {
    let parsed = match value {
        Value::String(s) => parse_u256(s).map_err(|err| u256_error(err, path, s))?,
        Value::Number(n) => match n.as_u64() {
            Some(v) => U256::from(v),
            None if n.as_i64().is_some() => {
                return Err(EncodeError::OutOfRange {
                    path: path.to_string(),
                    value: n.to_string(),
                    bits: 256,
                })
            }
            None => {
                return Err(EncodeError::InvalidNumber {
                    path: path.to_string(),
                    value: n.to_string(),
                })
            }
        },
        other => return Err(mismatch(path, "integer", other)),
    };

    let low = parsed & LOW_MASK;
    let high = parsed >> 128usize;
    Ok((low.to_string(), high.to_string()))
}

fn u256_error(err: FeltError, path: &str, raw: &str) -> EncodeError {
    match err {
        FeltError::Overflow(_) | FeltError::Negative(_) => EncodeError::OutOfRange {
            path: path.to_string(),
            value: raw.to_string(),
            bits: 256,
        },
        _ => EncodeError::InvalidNumber {
            path: path.to_string(),
            value: raw.to_string(),
        },
    }
}

fn scalar_token(value: &Value, path: &str) -> Result<String, EncodeError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(if *b { "1" } else { "0" }.to_string()),
        other => Err(mismatch(path, "scalar", other)),
    }
}

fn bool_token(value: &Value, path: &str) -> Result<&'static str, EncodeError> {
    match value {
        Value::Bool(true) => Ok("1"),
        Value::Bool(false) => Ok("0"),
        Value::String(s) => match s.trim() {
            "true" | "1" | "True" => Ok("1"),
            "false" | "0" | "False" => Ok("0"),
            _ => Err(mismatch(path, "boolean", value)),
        },
        Value::Number(n) => match n.as_u64() {
            Some(1) => Ok("1"),
            Some(0) => Ok("0"),
            _ => Err(mismatch(path, "boolean", value)),
        },
        other => Err(mismatch(path, "boolean", other)),
    }
}

/// Struct and array values may arrive as JSON text from form inputs
fn parse_embedded<'v>(value: &'v Value, path: &str) -> Result<Cow<'v, Value>, EncodeError> {
    match value {
        Value::String(text) => serde_json::from_str(text)
            .map(Cow::Owned)
            .map_err(|source| EncodeError::InvalidJson {
                path: path.to_string(),
                source,
            }),
        other => Ok(Cow::Borrowed(other)),
    }
}

fn mismatch(path: &str, expected: &'static str, found: &Value) -> EncodeError {
    EncodeError::TypeMismatch {
        path: path.to_string(),
        expected,
        found: json_kind(found).to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
