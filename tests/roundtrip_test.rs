//! Generated-input checks of the calldata layout
//!
//! This test verifies that:
//! 1. Decoding the encoding of any well-typed value gives the value back
//! 2. u256 limbs always recombine into the original integer

use alloy_primitives::U256;
use proptest::prelude::*;
use serde_json::{json, Map, Value};

use felt_lens::domain::abi::{EnumType, EnumVariant, StructMember, StructType, TypeNode};
use felt_lens::infrastructure::abi::{decode, encode};

const U256_NAME: &str = "core::integer::u256";

fn bool_type() -> TypeNode {
    TypeNode::Enum(EnumType {
        name: "core::bool".into(),
        variants: vec![
            EnumVariant { name: "False".into(), ty: None },
            EnumVariant { name: "True".into(), ty: None },
        ],
    })
}

fn struct_type(name: &str, members: Vec<TypeNode>) -> TypeNode {
    TypeNode::Struct(StructType {
        name: name.into(),
        members: members
            .into_iter()
            .enumerate()
            .map(|(idx, ty)| StructMember { name: format!("m{idx}"), ty })
            .collect(),
    })
}

fn type_tree() -> impl Strategy<Value = TypeNode> {
    let leaf = prop_oneof![
        Just(TypeNode::primitive("core::felt252")),
        Just(TypeNode::primitive(U256_NAME)),
        Just(bool_type()),
        Just(struct_type("()", vec![])),
    ];

    leaf.prop_recursive(4, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4)
                .prop_map(|members| struct_type("demo::Record", members)),
            inner.clone().prop_map(TypeNode::array),
            inner.clone().prop_map(|element| {
                let name = format!("core::option::Option::<{}>", element.name());
                TypeNode::option(name, element)
            }),
            prop::collection::vec(prop::option::of(inner), 1..4).prop_map(|payloads| {
                TypeNode::Enum(EnumType {
                    name: "demo::Choice".into(),
                    variants: payloads
                        .into_iter()
                        .enumerate()
                        .map(|(idx, ty)| EnumVariant { name: format!("V{idx}"), ty })
                        .collect(),
                })
            }),
        ]
    })
}

/// Values shaped the way the decoder reports them
fn value_for(node: &TypeNode) -> BoxedStrategy<Value> {
    match node {
        TypeNode::Primitive(p) if p.name == U256_NAME => any::<[u64; 4]>()
            .prop_map(|limbs| Value::String(U256::from_limbs(limbs).to_string()))
            .boxed(),
        TypeNode::Primitive(_) => prop_oneof!["[0-9]{1,20}", "0x[0-9a-f]{1,16}"]
            .prop_map(Value::String)
            .boxed(),
        TypeNode::Enum(e) if e.name == "core::bool" => any::<bool>().prop_map(Value::Bool).boxed(),
        TypeNode::Enum(e) => {
            let variants = e.variants.clone();
            (0..variants.len())
                .prop_flat_map(move |idx| {
                    let EnumVariant { name, ty } = variants[idx].clone();
                    match ty {
                        None => Just(Value::String(name)).boxed(),
                        Some(ty) => value_for(&ty)
                            .prop_map(move |payload| {
                                let mut object = Map::new();
                                object.insert(name.clone(), payload);
                                Value::Object(object)
                            })
                            .boxed(),
                    }
                })
                .boxed()
        }
        TypeNode::Struct(s) => {
            let names: Vec<String> = s.members.iter().map(|m| m.name.clone()).collect();
            let members: Vec<BoxedStrategy<Value>> =
                s.members.iter().map(|m| value_for(&m.ty)).collect();
            members
                .prop_map(move |values| Value::Object(names.iter().cloned().zip(values).collect()))
                .boxed()
        }
        TypeNode::Array(a) => prop::collection::vec(value_for(&a.element_type), 0..4)
            .prop_map(Value::Array)
            .boxed(),
        TypeNode::Option(o) if o.element_type.is_option() => prop_oneof![
            Just(Value::Null),
            value_for(&o.element_type).prop_map(|inner| json!({ "Some": inner })),
        ]
        .boxed(),
        TypeNode::Option(o) => prop_oneof![Just(Value::Null), value_for(&o.element_type)].boxed(),
        TypeNode::Generic(_) | TypeNode::Unknown(_) => Just(Value::Null).boxed(),
    }
}

fn typed_value() -> impl Strategy<Value = (TypeNode, Value)> {
    type_tree().prop_flat_map(|node| {
        let values = value_for(&node);
        (Just(node), values)
    })
}

proptest! {
    #[test]
    fn test_decode_inverts_encode((node, value) in typed_value()) {
        let tokens = encode(&node, &value).unwrap();
        let decoded = decode(tokens.as_slice(), &node);
        prop_assert_eq!(&decoded.value, &value);
        prop_assert!(decoded.issues.is_empty(), "issues: {:?}", decoded.issues);
        prop_assert_eq!(decoded.consumed, tokens.len());
    }

    #[test]
    fn test_u256_limbs_recombine(limbs in any::<[u64; 4]>()) {
        let value = U256::from_limbs(limbs);
        let tokens = encode(&TypeNode::primitive(U256_NAME), &json!(value.to_string())).unwrap();
        prop_assert_eq!(tokens.len(), 2);

        let low: U256 = tokens[0].parse().unwrap();
        let high: U256 = tokens[1].parse().unwrap();
        prop_assert!(low < U256::from(1u64) << 128usize);
        prop_assert_eq!(low + (high << 128usize), value);
    }
}

#[test]
fn test_empty_containers_round_trip() {
    let unit = struct_type("()", vec![]);
    for (node, value) in [
        (TypeNode::array(unit.clone()), json!([{}, {}])),
        (TypeNode::array(TypeNode::primitive(U256_NAME)), json!([])),
        (struct_type("demo::Empty", vec![]), json!({})),
        (TypeNode::option("core::option::Option::<()>", unit), json!({})),
    ] {
        let tokens = encode(&node, &value).unwrap();
        let decoded = decode(tokens.as_slice(), &node);
        assert_eq!(decoded.value, value, "{node:?}");
        assert!(decoded.issues.is_empty());
    }
}
