//! Starknet contract ABI JSON shapes
//!
//! Only the entries the codec needs are modelled; events, impls and any
//! future entry kinds deserialize into [`AbiEntry::Other`].

use serde::{Deserialize, Serialize};

/// A named, typed ABI parameter (struct member, enum variant, input)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedParam {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

impl TypedParam {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<TypedParam>,
    #[serde(default)]
    pub outputs: Vec<TypedParam>,
    /// `state_mutability` in Cairo 1 ABIs, `stateMutability` in legacy ones
    #[serde(
        default,
        alias = "stateMutability",
        skip_serializing_if = "Option::is_none"
    )]
    pub state_mutability: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructEntry {
    pub name: String,
    #[serde(default)]
    pub members: Vec<TypedParam>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumEntry {
    pub name: String,
    #[serde(default)]
    pub variants: Vec<TypedParam>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceEntry {
    pub name: String,
    #[serde(default)]
    pub items: Vec<AbiEntry>,
}

/// One top-level ABI declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AbiEntry {
    Function(FunctionEntry),
    L1Handler(FunctionEntry),
    Constructor(FunctionEntry),
    Struct(StructEntry),
    Enum(EnumEntry),
    Interface(InterfaceEntry),
    #[serde(other)]
    Other,
}
