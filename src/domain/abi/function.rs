//! Function descriptors produced by the ABI parser

use std::path::PathBuf;

use serde::Serialize;

use super::TypeNode;
use crate::domain::felt::Felt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionKind {
    Function,
    L1Handler,
    Constructor,
}

/// A resolved function parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AbiParam {
    /// Empty for unnamed outputs
    pub name: String,
    /// Type string as declared in the ABI
    pub type_name: String,
    #[serde(rename = "type")]
    pub ty: TypeNode,
}

/// A callable entry point with fully resolved parameter types
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionDescriptor {
    pub name: String,
    pub selector: Felt,
    pub kind: FunctionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_mutability: Option<String>,
    /// Interface block the function was declared in, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
    pub inputs: Vec<AbiParam>,
    pub outputs: Vec<AbiParam>,
    /// File the ABI was loaded from, when scanned from disk
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
}

impl FunctionDescriptor {
    /// `view` and `pure` functions are reads; everything else writes
    pub fn is_read(&self) -> bool {
        matches!(self.state_mutability.as_deref(), Some("view") | Some("pure"))
    }

    pub fn selector_hex(&self) -> String {
        self.selector.to_hex()
    }

    /// `name(type, type)` listing signature
    pub fn signature(&self) -> String {
        let params: Vec<&str> = self.inputs.iter().map(|p| p.type_name.as_str()).collect();
        format!("{}({})", self.name, params.join(", "))
    }
}
