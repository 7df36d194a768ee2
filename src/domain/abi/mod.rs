//! ABI domain models and contracts
//!
//! This module defines the ABI JSON shapes, the resolved type tree and the
//! decoder contract, independent of the codec implementation.

mod decoder;
mod entry;
mod error;
mod function;
mod registry;
pub mod types;

pub use decoder::{AbiDecoder, DecodeIssue, DecodedArg, DecodedCall};
pub use entry::{AbiEntry, EnumEntry, FunctionEntry, InterfaceEntry, StructEntry, TypedParam};
pub use error::{AbiError, EncodeError};
pub use function::{AbiParam, FunctionDescriptor, FunctionKind};
pub use registry::{SelectorRegistry, TypeRegistry};
pub use types::{
    ArrayType, EnumType, EnumVariant, GenericType, OptionType, PrimitiveType, StructMember,
    StructType, TypeNode, UnknownType,
};
