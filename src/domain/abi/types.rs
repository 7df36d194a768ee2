//! Resolved ABI type tree

use serde::Serialize;

pub const FELT252: &str = "core::felt252";
pub const U256: &str = "core::integer::u256";
pub const BOOL: &str = "core::bool";
pub const SPAN_PREFIX: &str = "core::array::Span";
pub const OPTION_PREFIX: &str = "core::option::Option";

/// Element type used when a Span declaration cannot be unwrapped
pub const SPAN_FALLBACK_ELEMENT: &str = "felt252";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrimitiveType {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructMember {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeNode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructType {
    pub name: String,
    /// Declaration order; this is the flattening order on the wire
    pub members: Vec<StructMember>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumVariant {
    pub name: String,
    /// `None` for unit variants
    #[serde(rename = "value_type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<TypeNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumType {
    pub name: String,
    /// Declaration order; the position is the discriminant
    pub variants: Vec<EnumVariant>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionType {
    pub name: String,
    pub element_type: Box<TypeNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArrayType {
    pub element_type: Box<TypeNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenericType {
    pub name: String,
    pub type_arguments: Vec<TypeNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnknownType {
    pub name: String,
}

/// A fully resolved Cairo type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TypeNode {
    Primitive(PrimitiveType),
    Struct(StructType),
    Enum(EnumType),
    Option(OptionType),
    Array(ArrayType),
    Generic(GenericType),
    Unknown(UnknownType),
}

impl TypeNode {
    pub fn primitive(name: impl Into<String>) -> Self {
        TypeNode::Primitive(PrimitiveType { name: name.into() })
    }

    pub fn array(element: TypeNode) -> Self {
        TypeNode::Array(ArrayType {
            element_type: Box::new(element),
        })
    }

    pub fn option(name: impl Into<String>, element: TypeNode) -> Self {
        TypeNode::Option(OptionType {
            name: name.into(),
            element_type: Box::new(element),
        })
    }

    pub fn unknown(name: impl Into<String>) -> Self {
        TypeNode::Unknown(UnknownType { name: name.into() })
    }

    /// Human-readable name, used as a title in schemas and listings
    pub fn name(&self) -> String {
        match self {
            TypeNode::Primitive(p) => p.name.clone(),
            TypeNode::Struct(s) => s.name.clone(),
            TypeNode::Enum(e) => e.name.clone(),
            TypeNode::Option(o) => o.name.clone(),
            TypeNode::Array(a) => format!("Array<{}>", a.element_type.name()),
            TypeNode::Generic(g) => g.name.clone(),
            TypeNode::Unknown(u) => u.name.clone(),
        }
    }

    pub fn is_option(&self) -> bool {
        matches!(self, TypeNode::Option(_))
    }
}

pub fn is_u256(name: &str) -> bool {
    name == U256 || name == "u256"
}

pub fn is_bool(name: &str) -> bool {
    name == BOOL || name == "bool"
}
