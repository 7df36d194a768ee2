//! Flat calldata tokens back to structured JSON values
//!
//! Decoding is best-effort. A short or malformed stream still yields a
//! value (with `null` where nothing could be read) and the problems are
//! reported as [`DecodeIssue`]s next to it.

use alloy_primitives::U256;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::abi::types::{is_bool, is_u256};
use crate::domain::abi::{AbiParam, DecodeIssue, DecodedArg, EnumType, FunctionDescriptor, TypeNode};
use crate::domain::felt::parse_u256;

const LIMB_BOUND: U256 = U256::from_limbs([0, 0, 1, 0]);

/// Zero-width elements take no tokens, so their length is the only bound
const MAX_ZERO_WIDTH_ELEMENTS: usize = 1 << 16;

/// A decoded value together with how much of the stream it used
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decoded {
    pub value: Value,
    pub consumed: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<DecodeIssue>,
}

/// Named arguments decoded against a function's inputs or outputs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedArgs {
    pub args: Vec<DecodedArg>,
    pub consumed: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<DecodeIssue>,
}

/// Cursor over felt tokens that records issues as it goes
struct FeltReader<'a, S> {
    tokens: &'a [S],
    pos: usize,
    issues: Vec<DecodeIssue>,
    /// Set once the stream can no longer be trusted to line up
    halted: bool,
}

impl<'a, S: AsRef<str>> FeltReader<'a, S> {
    fn new(tokens: &'a [S]) -> Self {
        Self {
            tokens,
            pos: 0,
            issues: Vec::new(),
            halted: false,
        }
    }

    fn remaining(&self) -> usize {
        self.tokens.len().saturating_sub(self.pos)
    }

    fn next(&mut self, path: &str) -> Option<&'a str> {
        if self.halted {
            return None;
        }
        match self.tokens.get(self.pos) {
            Some(token) => {
                self.pos += 1;
                Some(AsRef::<str>::as_ref(token))
            }
            None => {
                self.truncated(path);
                None
            }
        }
    }

    fn take_rest(&mut self) -> Vec<Value> {
        if self.halted {
            return Vec::new();
        }
        let rest = self.tokens[self.pos..]
            .iter()
            .map(|t| Value::String(AsRef::<str>::as_ref(t).to_string()))
            .collect();
        self.pos = self.tokens.len();
        rest
    }

    fn truncated(&mut self, path: &str) {
        self.issues.push(DecodeIssue::Truncated {
            path: path.to_string(),
            position: self.pos,
        });
        self.halted = true;
    }

    fn halt(&mut self, issue: DecodeIssue) {
        self.issues.push(issue);
        self.halted = true;
    }

    fn finish(&mut self) {
        let trailing = self.remaining();
        if trailing > 0 && !self.halted {
            self.issues.push(DecodeIssue::TrailingTokens { count: trailing });
        }
    }
}

/// Decode one value of type `node` from the start of `tokens`
///
/// Tokens left over afterwards are reported as `TrailingTokens`.
pub fn decode<S: AsRef<str>>(tokens: &[S], node: &TypeNode) -> Decoded {
    let mut reader = FeltReader::new(tokens);
    let value = read_value(&mut reader, node, "value");
    reader.finish();
    Decoded {
        value,
        consumed: reader.pos,
        issues: reader.issues,
    }
}

/// Decode call arguments for display
pub fn decode_inputs<S: AsRef<str>>(function: &FunctionDescriptor, tokens: &[S]) -> DecodedArgs {
    decode_params(&function.inputs, tokens)
}

/// Decode a call result against the declared outputs
pub fn decode_outputs<S: AsRef<str>>(function: &FunctionDescriptor, tokens: &[S]) -> DecodedArgs {
    decode_params(&function.outputs, tokens)
}

fn decode_params<S: AsRef<str>>(params: &[AbiParam], tokens: &[S]) -> DecodedArgs {
    let mut reader = FeltReader::new(tokens);
    let args = params
        .iter()
        .enumerate()
        .map(|(idx, param)| {
            let name = if param.name.is_empty() {
                format!("arg{idx}")
            } else {
                param.name.clone()
            };
            let value = read_value(&mut reader, &param.ty, &name);
            DecodedArg {
                name,
                kind: param.type_name.clone(),
                value,
            }
        })
        .collect();
    reader.finish();

    DecodedArgs {
        args,
        consumed: reader.pos,
        issues: reader.issues,
    }
}

fn read_value<S: AsRef<str>>(reader: &mut FeltReader<'_, S>, node: &TypeNode, path: &str) -> Value {
    if reader.halted {
        return Value::Null;
    }

    match node {
        TypeNode::Primitive(p) if is_u256(&p.name) => read_u256(reader, path),
        TypeNode::Primitive(_) => reader
            .next(path)
            .map(|token| Value::String(token.to_string()))
            .unwrap_or(Value::Null),
        TypeNode::Struct(s) => {
            let mut object = Map::new();
            for member in &s.members {
                let member_path = format!("{path}.{}", member.name);
                let value = read_value(reader, &member.ty, &member_path);
                object.insert(member.name.clone(), value);
            }
            Value::Object(object)
        }
        TypeNode::Enum(e) if is_bool(&e.name) => read_bool(reader, path),
        TypeNode::Enum(e) => read_enum(reader, e, path),
        TypeNode::Option(o) => {
            let Some(token) = reader.next(path) else {
                return Value::Null;
            };
            match parse_u256(token).ok().and_then(|v| u8::try_from(v).ok()) {
                Some(0) if o.element_type.is_option() => {
                    let inner = read_value(reader, &o.element_type, path);
                    let mut object = Map::new();
                    object.insert("Some".to_string(), inner);
                    Value::Object(object)
                }
                Some(0) => read_value(reader, &o.element_type, path),
                Some(1) => Value::Null,
                _ => {
                    reader.halt(DecodeIssue::InvalidDiscriminant {
                        path: path.to_string(),
                        token: token.to_string(),
                    });
                    Value::Null
                }
            }
        }
        TypeNode::Array(a) => read_array(reader, &a.element_type, path),
        TypeNode::Generic(_) | TypeNode::Unknown(_) => {
            let rest = reader.take_rest();
            debug!(path, type_name = %node.name(), tokens = rest.len(), "returning raw tokens");
            reader.issues.push(DecodeIssue::Opaque {
                path: path.to_string(),
                type_name: node.name(),
                tokens: rest.len(),
            });
            Value::Array(rest)
        }
    }
}

fn read_u256<S: AsRef<str>>(reader: &mut FeltReader<'_, S>, path: &str) -> Value {
    let Some(low) = reader.next(path) else {
        return Value::Null;
    };
    let Some(high) = reader.next(path) else {
        return Value::Null;
    };

    let mut limbs = [U256::ZERO; 2];
    for (slot, token) in limbs.iter_mut().zip([low, high]) {
        match parse_u256(token) {
            Ok(limb) if limb < LIMB_BOUND => *slot = limb,
            Ok(_) => {
                reader.issues.push(DecodeIssue::LimbOutOfRange {
                    path: path.to_string(),
                    token: token.to_string(),
                });
                return Value::Null;
            }
            Err(_) => {
                reader.issues.push(DecodeIssue::InvalidNumber {
                    path: path.to_string(),
                    token: token.to_string(),
                });
                return Value::Null;
            }
        }
    }

    let [low, high] = limbs;
    Value::String(((high << 128usize) | low).to_string())
}

fn read_bool<S: AsRef<str>>(reader: &mut FeltReader<'_, S>, path: &str) -> Value {
    let Some(token) = reader.next(path) else {
        return Value::Null;
    };
    match parse_u256(token).ok().and_then(|v| u8::try_from(v).ok()) {
        Some(0) => Value::Bool(false),
        Some(1) => Value::Bool(true),
        _ => {
            reader.issues.push(DecodeIssue::InvalidDiscriminant {
                path: path.to_string(),
                token: token.to_string(),
            });
            Value::String(token.to_string())
        }
    }
}

fn read_enum<S: AsRef<str>>(reader: &mut FeltReader<'_, S>, def: &EnumType, path: &str) -> Value {
    let Some(token) = reader.next(path) else {
        return Value::Null;
    };
    let Some(index) = parse_u256(token).ok().and_then(|v| usize::try_from(v).ok()) else {
        reader.halt(DecodeIssue::InvalidNumber {
            path: path.to_string(),
            token: token.to_string(),
        });
        return Value::Null;
    };
    let Some(variant) = def.variants.get(index) else {
        reader.halt(DecodeIssue::UnknownVariant {
            path: path.to_string(),
            index: token.to_string(),
        });
        return Value::Null;
    };

    match &variant.ty {
        None => Value::String(variant.name.clone()),
        Some(ty) => {
            let payload = read_value(reader, ty, &format!("{path}.{}", variant.name));
            let mut object = Map::new();
            object.insert(variant.name.clone(), payload);
            Value::Object(object)
        }
    }
}

fn read_array<S: AsRef<str>>(
    reader: &mut FeltReader<'_, S>,
    element: &TypeNode,
    path: &str,
) -> Value {
    let Some(token) = reader.next(path) else {
        return Value::Null;
    };
    let Some(len) = parse_u256(token).ok().and_then(|v| usize::try_from(v).ok()) else {
        reader.halt(DecodeIssue::InvalidNumber {
            path: path.to_string(),
            token: token.to_string(),
        });
        return Value::Null;
    };

    let width = min_width(element);
    let bounded = if width == 0 {
        if len > MAX_ZERO_WIDTH_ELEMENTS {
            reader.halt(DecodeIssue::LengthTooLarge {
                path: path.to_string(),
                len,
            });
            return Value::Null;
        }
        len
    } else {
        // One element past what the stream can hold is enough for the
        // read itself to report the truncation.
        len.min(reader.remaining() / width + 1)
    };

    let mut items = Vec::with_capacity(bounded);
    for idx in 0..bounded {
        if reader.halted {
            break;
        }
        let item = read_value(reader, element, &format!("{path}[{idx}]"));
        if reader.halted && item.is_null() {
            break;
        }
        items.push(item);
    }
    Value::Array(items)
}

/// Fewest tokens any value of `node` occupies
fn min_width(node: &TypeNode) -> usize {
    match node {
        TypeNode::Primitive(p) if is_u256(&p.name) => 2,
        TypeNode::Primitive(_) | TypeNode::Enum(_) | TypeNode::Option(_) | TypeNode::Array(_) => 1,
        TypeNode::Struct(s) => s.members.iter().map(|m| min_width(&m.ty)).sum(),
        TypeNode::Generic(_) | TypeNode::Unknown(_) => 0,
    }
}
