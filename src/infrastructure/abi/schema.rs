//! JSON Schema generation for resolved types

use serde_json::{json, Map, Value};

use crate::domain::abi::types::is_bool;
use crate::domain::abi::{FunctionDescriptor, TypeNode};

/// Build a JSON Schema describing the values `encode` accepts for `node`
pub fn to_json_schema(node: &TypeNode) -> Value {
    match node {
        TypeNode::Primitive(p) => json!({ "type": "string", "title": p.name }),
        TypeNode::Struct(s) => {
            let mut properties = Map::new();
            let mut required = Vec::new();
            for member in &s.members {
                properties.insert(member.name.clone(), to_json_schema(&member.ty));
                if !member.ty.is_option() {
                    required.push(Value::String(member.name.clone()));
                }
            }
            json!({
                "type": "object",
                "title": s.name,
                "properties": properties,
                "required": required,
                "additionalProperties": false,
            })
        }
        TypeNode::Enum(e) if is_bool(&e.name) => json!({ "type": "boolean", "title": e.name }),
        TypeNode::Enum(e) => {
            let names: Vec<&str> = e.variants.iter().map(|v| v.name.as_str()).collect();
            json!({ "type": "string", "enum": names, "title": e.name })
        }
        TypeNode::Option(o) if o.element_type.is_option() => nullable(json!({
            "type": "object",
            "title": o.name,
            "properties": { "Some": to_json_schema(&o.element_type) },
            "required": ["Some"],
            "additionalProperties": false,
        })),
        TypeNode::Option(o) => nullable(to_json_schema(&o.element_type)),
        TypeNode::Array(a) => json!({ "type": "array", "items": to_json_schema(&a.element_type) }),
        TypeNode::Generic(g) => {
            if g.name.contains("Option") {
                return match g.type_arguments.first() {
                    Some(inner) => nullable(to_json_schema(inner)),
                    None => json!({ "type": "object", "title": g.name, "nullable": true }),
                };
            }
            if g.name.contains("Map") || g.name.contains("Dict") {
                let values = g
                    .type_arguments
                    .get(1)
                    .map(to_json_schema)
                    .unwrap_or(Value::Bool(true));
                return json!({ "type": "object", "title": g.name, "additionalProperties": values });
            }
            json!({ "type": "object", "title": g.name })
        }
        TypeNode::Unknown(u) => json!({ "type": "object", "title": u.name }),
    }
}

/// Object schema for a whole call form, one property per input
pub fn function_schema(function: &FunctionDescriptor) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();
    for input in &function.inputs {
        properties.insert(input.name.clone(), to_json_schema(&input.ty));
        if !input.ty.is_option() {
            required.push(Value::String(input.name.clone()));
        }
    }
    json!({
        "type": "object",
        "title": function.name,
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    })
}

fn nullable(mut schema: Value) -> Value {
    if let Value::Object(map) = &mut schema {
        map.insert("nullable".to_string(), Value::Bool(true));
    }
    schema
}
