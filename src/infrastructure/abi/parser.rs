//! Whole-ABI parsing into resolved function descriptors

use serde_json::Value;
use tracing::debug;

use super::resolver::{ResolverOptions, TypeResolver};
use crate::domain::abi::{
    AbiEntry, AbiError, AbiParam, FunctionDescriptor, FunctionEntry, FunctionKind,
    SelectorRegistry, TypeNode, TypeRegistry, TypedParam,
};
use crate::domain::felt::selector_from_name;

/// An ABI split into callable entry points
#[derive(Debug, Clone, Default)]
pub struct ParsedAbi {
    pub constructor: Option<FunctionDescriptor>,
    /// `view` and `pure` functions
    pub read_functions: Vec<FunctionDescriptor>,
    pub write_functions: Vec<FunctionDescriptor>,
    pub l1_handlers: Vec<FunctionDescriptor>,
    pub registry: TypeRegistry,
    /// Options the entry points were resolved with
    pub resolver: ResolverOptions,
}

impl ParsedAbi {
    /// Every callable entry point except the constructor
    pub fn functions(&self) -> impl Iterator<Item = &FunctionDescriptor> {
        self.read_functions
            .iter()
            .chain(&self.write_functions)
            .chain(&self.l1_handlers)
    }

    /// Find an entry point by name, the constructor included
    pub fn function(&self, name: &str) -> Option<&FunctionDescriptor> {
        self.functions()
            .chain(self.constructor.as_ref())
            .find(|function| function.name == name)
    }

    /// Index the entry points by selector
    pub fn selector_registry(&self) -> SelectorRegistry {
        let mut registry = SelectorRegistry::new();
        for function in self.functions() {
            registry.insert(function.clone());
        }
        registry
    }

    /// Resolve a type string against this ABI's declarations
    pub fn resolve(&self, type_str: &str) -> Result<TypeNode, AbiError> {
        TypeResolver::with_options(&self.registry, self.resolver).resolve(type_str)
    }
}

pub fn parse_abi(entries: &[AbiEntry]) -> Result<ParsedAbi, AbiError> {
    parse_abi_with(entries, ResolverOptions::default())
}

pub fn parse_abi_with(
    entries: &[AbiEntry],
    options: ResolverOptions,
) -> Result<ParsedAbi, AbiError> {
    let registry = TypeRegistry::from_entries(entries);
    let resolver = TypeResolver::with_options(&registry, options);

    let mut constructor = None;
    let mut read_functions = Vec::new();
    let mut write_functions = Vec::new();
    let mut l1_handlers = Vec::new();

    let mut flat = Vec::new();
    flatten(entries, None, &mut flat);

    for (entry, interface) in flat {
        match entry {
            AbiEntry::Function(f) => {
                let function = describe(&resolver, f, FunctionKind::Function, interface)?;
                if function.is_read() {
                    read_functions.push(function);
                } else {
                    write_functions.push(function);
                }
            }
            AbiEntry::L1Handler(f) => {
                l1_handlers.push(describe(&resolver, f, FunctionKind::L1Handler, interface)?);
            }
            AbiEntry::Constructor(f) => {
                if constructor.is_none() {
                    constructor =
                        Some(describe(&resolver, f, FunctionKind::Constructor, interface)?);
                } else {
                    debug!(name = %f.name, "ignoring additional constructor");
                }
            }
            AbiEntry::Interface(_) | AbiEntry::Struct(_) | AbiEntry::Enum(_) | AbiEntry::Other => {}
        }
    }

    debug!(
        structs = registry.struct_count(),
        enums = registry.enum_count(),
        reads = read_functions.len(),
        writes = write_functions.len(),
        "parsed ABI"
    );

    Ok(ParsedAbi {
        constructor,
        read_functions,
        write_functions,
        l1_handlers,
        registry,
        resolver: options,
    })
}

/// Parse ABI JSON text (raw array or contract class object)
pub fn parse_abi_json(json: &str) -> Result<ParsedAbi, AbiError> {
    let value: Value = serde_json::from_str(json)?;
    parse_abi_value(&value)
}

pub fn parse_abi_value(value: &Value) -> Result<ParsedAbi, AbiError> {
    let entries = extract_abi(value)?;
    parse_abi(&entries)
}

/// Pull the ABI entries out of a JSON document
///
/// Accepts a raw ABI array, or an object whose `abi` field is an array or
/// a JSON-encoded string (as in class responses from RPC nodes).
pub fn extract_abi(value: &Value) -> Result<Vec<AbiEntry>, AbiError> {
    match value {
        Value::Array(_) => Ok(serde_json::from_value(value.clone())?),
        Value::Object(map) => match map.get("abi") {
            Some(abi @ Value::Array(_)) => Ok(serde_json::from_value(abi.clone())?),
            Some(Value::String(text)) => Ok(serde_json::from_str(text)?),
            _ => Err(AbiError::MissingAbi),
        },
        _ => Err(AbiError::MissingAbi),
    }
}

/// Unpack interface blocks in place, tagging their items with the interface name
fn flatten<'a>(
    entries: &'a [AbiEntry],
    interface: Option<&'a str>,
    out: &mut Vec<(&'a AbiEntry, Option<&'a str>)>,
) {
    for entry in entries {
        match entry {
            AbiEntry::Interface(block) => flatten(&block.items, Some(&block.name), out),
            other => out.push((other, interface)),
        }
    }
}

fn describe(
    resolver: &TypeResolver<'_>,
    entry: &FunctionEntry,
    kind: FunctionKind,
    interface: Option<&str>,
) -> Result<FunctionDescriptor, AbiError> {
    Ok(FunctionDescriptor {
        name: entry.name.clone(),
        selector: selector_from_name(&entry.name),
        kind,
        state_mutability: entry.state_mutability.clone(),
        interface: interface.map(str::to_string),
        inputs: resolve_params(resolver, &entry.inputs)?,
        outputs: resolve_params(resolver, &entry.outputs)?,
        source: None,
    })
}

fn resolve_params(
    resolver: &TypeResolver<'_>,
    params: &[TypedParam],
) -> Result<Vec<AbiParam>, AbiError> {
    params
        .iter()
        .map(|param| {
            Ok(AbiParam {
                name: param.name.clone(),
                type_name: param.ty.clone(),
                ty: resolver.resolve(&param.ty)?,
            })
        })
        .collect()
}
