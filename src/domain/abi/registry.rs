//! Type and selector registries

use std::collections::HashMap;

use super::{AbiEntry, EnumEntry, FunctionDescriptor, StructEntry};
use crate::domain::felt::Felt;

/// Struct and enum declarations of one ABI, keyed by full type name
///
/// Built once per ABI and never mutated afterwards, so it can be shared
/// freely between resolution passes.
#[derive(Debug, Default, Clone)]
pub struct TypeRegistry {
    structs: HashMap<String, StructEntry>,
    enums: HashMap<String, EnumEntry>,
}

impl TypeRegistry {
    /// Collect every top-level struct and enum declaration
    ///
    /// A name declared twice keeps its first declaration.
    pub fn from_entries(entries: &[AbiEntry]) -> Self {
        let mut structs = HashMap::new();
        let mut enums = HashMap::new();

        for entry in entries {
            match entry {
                AbiEntry::Struct(def) => {
                    structs.entry(def.name.clone()).or_insert_with(|| def.clone());
                }
                AbiEntry::Enum(def) => {
                    enums.entry(def.name.clone()).or_insert_with(|| def.clone());
                }
                _ => {}
            }
        }

        Self { structs, enums }
    }

    pub fn struct_def(&self, name: &str) -> Option<&StructEntry> {
        self.structs.get(name)
    }

    pub fn enum_def(&self, name: &str) -> Option<&EnumEntry> {
        self.enums.get(name)
    }

    pub fn struct_count(&self) -> usize {
        self.structs.len()
    }

    pub fn enum_count(&self) -> usize {
        self.enums.len()
    }
}

/// Function descriptors indexed by entry point selector
#[derive(Debug, Default, Clone)]
pub struct SelectorRegistry {
    functions: HashMap<Felt, FunctionDescriptor>,
    /// Number of files scanned
    pub scanned_files: usize,
    /// Number of functions loaded
    pub loaded_functions: usize,
    /// Scan errors
    pub errors: Vec<String>,
    /// Scan duration in milliseconds
    pub scan_ms: u128,
}

impl SelectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a function descriptor
    ///
    /// Note: First function for a given selector wins (no overwrite)
    pub fn insert(&mut self, function: FunctionDescriptor) {
        self.functions.entry(function.selector).or_insert(function);
        self.loaded_functions = self.functions.len();
    }

    pub fn lookup(&self, selector: &Felt) -> Option<&FunctionDescriptor> {
        self.functions.get(selector)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Merge another registry into this one
    ///
    /// Functions from the other registry are only added if their
    /// selector is not already present (first wins).
    pub fn merge(&mut self, other: Self) {
        self.scanned_files = self.scanned_files.saturating_add(other.scanned_files);
        self.errors.extend(other.errors);
        for (selector, function) in other.functions {
            self.functions.entry(selector).or_insert(function);
        }
        self.loaded_functions = self.functions.len();
    }
}
