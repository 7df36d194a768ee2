//! Type-string resolution against an ABI's struct/enum registry

use std::cell::RefCell;
use std::collections::HashMap;

use tracing::{debug, warn};

use crate::domain::abi::types::{OPTION_PREFIX, SPAN_FALLBACK_ELEMENT, SPAN_PREFIX};
use crate::domain::abi::{
    types, AbiError, EnumType, EnumVariant, GenericType, StructEntry, StructMember, StructType,
    TypeNode, TypeRegistry,
};

pub const DEFAULT_MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, Copy)]
pub struct ResolverOptions {
    /// Nesting limit; deeper types resolve to `Unknown`
    pub max_depth: usize,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Resolution result plus whether a cycle/depth cut happened below it.
/// Cut subtrees depend on the resolution stack and are not memoized.
struct Resolved {
    node: TypeNode,
    cut: bool,
}

impl Resolved {
    fn clean(node: TypeNode) -> Self {
        Self { node, cut: false }
    }
}

/// Resolves ABI type strings into [`TypeNode`] trees
///
/// Resolution is permissive: anything that is neither a declared type nor
/// a recognizable container degrades to `Primitive`. The only hard failure
/// is an Option enum without a `Some` variant.
pub struct TypeResolver<'a> {
    registry: &'a TypeRegistry,
    options: ResolverOptions,
    memo: RefCell<HashMap<String, TypeNode>>,
}

impl<'a> TypeResolver<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self::with_options(registry, ResolverOptions::default())
    }

    pub fn with_options(registry: &'a TypeRegistry, options: ResolverOptions) -> Self {
        Self {
            registry,
            options,
            memo: RefCell::new(HashMap::new()),
        }
    }

    pub fn resolve(&self, type_str: &str) -> Result<TypeNode, AbiError> {
        let mut stack = Vec::new();
        self.resolve_at(type_str, &mut stack).map(|resolved| resolved.node)
    }

    fn resolve_at(&self, raw: &str, stack: &mut Vec<String>) -> Result<Resolved, AbiError> {
        let trimmed = raw.trim();
        let type_str = trimmed.strip_prefix('@').unwrap_or(trimmed).trim();

        if let Some(node) = self.memo.borrow().get(type_str) {
            return Ok(Resolved::clean(node.clone()));
        }

        if stack.iter().any(|seen| seen == type_str) {
            warn!(type_name = type_str, "recursive type definition, resolving as unknown");
            return Ok(Resolved {
                node: TypeNode::unknown(type_str),
                cut: true,
            });
        }
        if stack.len() >= self.options.max_depth {
            warn!(
                type_name = type_str,
                max_depth = self.options.max_depth,
                "type nesting too deep, resolving as unknown"
            );
            return Ok(Resolved {
                node: TypeNode::unknown(type_str),
                cut: true,
            });
        }

        stack.push(type_str.to_string());
        let result = self.resolve_uncached(type_str, stack);
        stack.pop();

        let resolved = result?;
        if !resolved.cut {
            self.memo
                .borrow_mut()
                .insert(type_str.to_string(), resolved.node.clone());
        }
        Ok(resolved)
    }

    fn resolve_uncached(
        &self,
        type_str: &str,
        stack: &mut Vec<String>,
    ) -> Result<Resolved, AbiError> {
        // u256 is always one logical integer, even where the ABI declares
        // its {low, high} struct.
        if type_str == types::U256 {
            return Ok(Resolved::clean(TypeNode::primitive(type_str)));
        }

        if let Some(def) = self.registry.struct_def(type_str) {
            if def.name.starts_with(SPAN_PREFIX) {
                return self.resolve_span(def, stack);
            }
            let members = def.members.iter().map(|m| (m.name.as_str(), m.ty.as_str()));
            return self.resolve_struct(&def.name, members, stack);
        }

        if let Some(def) = self.registry.enum_def(type_str) {
            if def.name.starts_with(OPTION_PREFIX) {
                let some = def
                    .variants
                    .iter()
                    .find(|variant| variant.name == "Some")
                    .ok_or_else(|| AbiError::MissingSomeVariant {
                        name: def.name.clone(),
                    })?;
                let element = self.resolve_at(&some.ty, stack)?;
                return Ok(Resolved {
                    node: TypeNode::option(def.name.clone(), element.node),
                    cut: element.cut,
                });
            }

            let mut cut = false;
            let mut variants = Vec::with_capacity(def.variants.len());
            for variant in &def.variants {
                let ty = if is_unit(&variant.ty) {
                    None
                } else {
                    let resolved = self.resolve_at(&variant.ty, stack)?;
                    cut |= resolved.cut;
                    Some(resolved.node)
                };
                variants.push(EnumVariant {
                    name: variant.name.clone(),
                    ty,
                });
            }
            return Ok(Resolved {
                node: TypeNode::Enum(EnumType {
                    name: def.name.clone(),
                    variants,
                }),
                cut,
            });
        }

        if let Some(elements) = split_tuple(type_str) {
            let names: Vec<String> = (0..elements.len()).map(|i| i.to_string()).collect();
            return self.resolve_struct(
                type_str,
                names.iter().map(String::as_str).zip(elements.iter().copied()),
                stack,
            );
        }

        if let Some((base, args)) = split_generic(type_str) {
            let short = base.rsplit("::").next().unwrap_or(base);
            if matches!(short, "Array" | "Span") && args.len() == 1 {
                let element = self.resolve_at(args[0], stack)?;
                return Ok(Resolved {
                    node: TypeNode::array(element.node),
                    cut: element.cut,
                });
            }

            let mut cut = false;
            let mut type_arguments = Vec::with_capacity(args.len());
            for arg in args {
                let resolved = self.resolve_at(arg, stack)?;
                cut |= resolved.cut;
                type_arguments.push(resolved.node);
            }
            return Ok(Resolved {
                node: TypeNode::Generic(GenericType {
                    name: base.to_string(),
                    type_arguments,
                }),
                cut,
            });
        }

        Ok(Resolved::clean(TypeNode::primitive(type_str)))
    }

    fn resolve_struct<'s>(
        &self,
        name: &str,
        members: impl Iterator<Item = (&'s str, &'s str)>,
        stack: &mut Vec<String>,
    ) -> Result<Resolved, AbiError> {
        let mut cut = false;
        let mut resolved_members = Vec::new();
        for (member_name, member_ty) in members {
            let resolved = self.resolve_at(member_ty, stack)?;
            cut |= resolved.cut;
            resolved_members.push(StructMember {
                name: member_name.to_string(),
                ty: resolved.node,
            });
        }
        Ok(Resolved {
            node: TypeNode::Struct(StructType {
                name: name.to_string(),
                members: resolved_members,
            }),
            cut,
        })
    }

    /// `core::array::Span::<T>` declared as `{ snapshot: @Array<T> }`
    fn resolve_span(
        &self,
        def: &StructEntry,
        stack: &mut Vec<String>,
    ) -> Result<Resolved, AbiError> {
        let inner = def
            .members
            .iter()
            .find(|member| member.name == "snapshot" && member.ty.contains("core::array::Array"))
            .and_then(|member| generic_inner(&member.ty));

        match inner {
            Some(inner) => {
                let element = self.resolve_at(inner, stack)?;
                Ok(Resolved {
                    node: TypeNode::array(element.node),
                    cut: element.cut,
                })
            }
            None => {
                debug!(span = %def.name, "span without array snapshot, assuming felt elements");
                Ok(Resolved::clean(TypeNode::array(TypeNode::primitive(
                    SPAN_FALLBACK_ELEMENT,
                ))))
            }
        }
    }
}

/// Resolve a single type string with default options
pub fn resolve_type(type_str: &str, registry: &TypeRegistry) -> Result<TypeNode, AbiError> {
    TypeResolver::new(registry).resolve(type_str)
}

fn is_unit(ty: &str) -> bool {
    let ty = ty.trim();
    ty.is_empty() || ty == "()"
}

/// Substring between the first `<` and the last `>`
fn generic_inner(type_str: &str) -> Option<&str> {
    let start = type_str.find('<')?;
    let end = type_str.rfind('>')?;
    (end > start).then(|| type_str[start + 1..end].trim())
}

/// `base::<A, B>` → (`base`, [`A`, `B`]); `None` if malformed
fn split_generic(type_str: &str) -> Option<(&str, Vec<&str>)> {
    if !type_str.ends_with('>') {
        return None;
    }
    let start = type_str.find('<')?;
    let base = type_str[..start].trim_end_matches("::").trim();
    if base.is_empty() {
        return None;
    }
    let args = split_top_level(&type_str[start + 1..type_str.len() - 1])?;
    if args.is_empty() || args.iter().any(|arg| arg.is_empty()) {
        return None;
    }
    Some((base, args))
}

/// `(A, B)` → [`A`, `B`]; `()` → []
fn split_tuple(type_str: &str) -> Option<Vec<&str>> {
    let inner = type_str.strip_prefix('(')?.strip_suffix(')')?;
    if inner.trim().is_empty() {
        return Some(Vec::new());
    }
    let elements = split_top_level(inner)?;
    if elements.iter().any(|element| element.is_empty()) {
        return None;
    }
    Some(elements)
}

/// Split on commas outside of nested brackets; `None` if unbalanced
fn split_top_level(inner: &str) -> Option<Vec<&str>> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (idx, ch) in inner.char_indices() {
        match ch {
            '<' | '(' | '[' => depth += 1,
            '>' | ')' | ']' => depth = depth.checked_sub(1)?,
            ',' if depth == 0 => {
                parts.push(inner[start..idx].trim());
                start = idx + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return None;
    }

    let last = inner[start..].trim();
    // Tolerate a trailing comma, as in the one-element tuple `(T,)`
    if !last.is_empty() || parts.is_empty() {
        parts.push(last);
    }
    Some(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::abi::{AbiEntry, EnumEntry, TypedParam};

    fn registry(entries: Vec<AbiEntry>) -> TypeRegistry {
        TypeRegistry::from_entries(&entries)
    }

    fn struct_entry(name: &str, members: &[(&str, &str)]) -> AbiEntry {
        AbiEntry::Struct(StructEntry {
            name: name.to_string(),
            members: members
                .iter()
                .map(|(n, t)| TypedParam::new(*n, *t))
                .collect(),
        })
    }

    fn enum_entry(name: &str, variants: &[(&str, &str)]) -> AbiEntry {
        AbiEntry::Enum(EnumEntry {
            name: name.to_string(),
            variants: variants
                .iter()
                .map(|(n, t)| TypedParam::new(*n, *t))
                .collect(),
        })
    }

    #[test]
    fn test_unknown_string_is_primitive() {
        let reg = TypeRegistry::default();
        assert_eq!(
            resolve_type("core::felt252", &reg).unwrap(),
            TypeNode::primitive("core::felt252")
        );
        assert_eq!(
            resolve_type("core::array::Array::<core::felt252", &reg).unwrap(),
            TypeNode::primitive("core::array::Array::<core::felt252")
        );
    }

    #[test]
    fn test_struct_members_keep_order() {
        let reg = registry(vec![struct_entry(
            "demo::Point",
            &[("y", "core::felt252"), ("x", "core::integer::u8")],
        )]);
        let node = resolve_type("demo::Point", &reg).unwrap();
        let TypeNode::Struct(s) = node else {
            panic!("expected struct, got {node:?}");
        };
        let names: Vec<&str> = s.members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["y", "x"]);
        assert_eq!(s.members[1].ty, TypeNode::primitive("core::integer::u8"));
    }

    #[test]
    fn test_span_struct_unwraps_to_array() {
        let reg = registry(vec![struct_entry(
            "core::array::Span::<core::felt252>",
            &[("snapshot", "@core::array::Array::<core::felt252>")],
        )]);
        let node = resolve_type("core::array::Span::<core::felt252>", &reg).unwrap();
        assert_eq!(node, TypeNode::array(TypeNode::primitive("core::felt252")));
    }

    #[test]
    fn test_span_without_snapshot_falls_back_to_felt_array() {
        let reg = registry(vec![struct_entry(
            "core::array::Span::<demo::Thing>",
            &[("data", "core::felt252")],
        )]);
        let node = resolve_type("core::array::Span::<demo::Thing>", &reg).unwrap();
        assert_eq!(node, TypeNode::array(TypeNode::primitive("felt252")));
    }

    #[test]
    fn test_array_and_nested_arrays() {
        let reg = TypeRegistry::default();
        let node = resolve_type(
            "core::array::Array::<core::array::Array::<core::integer::u32>>",
            &reg,
        )
        .unwrap();
        assert_eq!(
            node,
            TypeNode::array(TypeNode::array(TypeNode::primitive("core::integer::u32")))
        );

        let span = resolve_type("core::array::Span::<core::felt252>", &reg).unwrap();
        assert_eq!(span, TypeNode::array(TypeNode::primitive("core::felt252")));
    }

    #[test]
    fn test_option_requires_some() {
        let reg = registry(vec![enum_entry(
            "core::option::Option::<core::felt252>",
            &[("Some", "core::felt252"), ("None", "()")],
        )]);
        let node = resolve_type("core::option::Option::<core::felt252>", &reg).unwrap();
        assert_eq!(
            node,
            TypeNode::option(
                "core::option::Option::<core::felt252>",
                TypeNode::primitive("core::felt252")
            )
        );

        let broken = registry(vec![enum_entry(
            "core::option::Option::<core::felt252>",
            &[("Present", "core::felt252"), ("None", "()")],
        )]);
        let err = resolve_type("core::option::Option::<core::felt252>", &broken).unwrap_err();
        assert!(matches!(err, AbiError::MissingSomeVariant { name } if name.contains("Option")));
    }

    #[test]
    fn test_enum_variants_in_order() {
        let reg = registry(vec![enum_entry(
            "demo::Action",
            &[("Stop", "()"), ("Move", "core::integer::u8")],
        )]);
        let TypeNode::Enum(e) = resolve_type("demo::Action", &reg).unwrap() else {
            panic!("expected enum");
        };
        assert_eq!(e.variants[0].name, "Stop");
        assert_eq!(e.variants[0].ty, None);
        assert_eq!(
            e.variants[1].ty,
            Some(TypeNode::primitive("core::integer::u8"))
        );
    }

    #[test]
    fn test_u256_struct_declaration_stays_primitive() {
        let reg = registry(vec![struct_entry(
            "core::integer::u256",
            &[("low", "core::integer::u128"), ("high", "core::integer::u128")],
        )]);
        assert_eq!(
            resolve_type("core::integer::u256", &reg).unwrap(),
            TypeNode::primitive("core::integer::u256")
        );
    }

    #[test]
    fn test_tuple_becomes_positional_struct() {
        let reg = TypeRegistry::default();
        let TypeNode::Struct(s) =
            resolve_type("(core::felt252, core::array::Array::<core::integer::u8>)", &reg).unwrap()
        else {
            panic!("expected struct");
        };
        assert_eq!(s.members.len(), 2);
        assert_eq!(s.members[0].name, "0");
        assert_eq!(
            s.members[1].ty,
            TypeNode::array(TypeNode::primitive("core::integer::u8"))
        );

        let TypeNode::Struct(unit) = resolve_type("()", &reg).unwrap() else {
            panic!("expected unit struct");
        };
        assert!(unit.members.is_empty());
    }

    #[test]
    fn test_other_generics() {
        let reg = TypeRegistry::default();
        let node = resolve_type(
            "core::starknet::storage::Map::<core::felt252, core::integer::u64>",
            &reg,
        )
        .unwrap();
        assert_eq!(
            node,
            TypeNode::Generic(GenericType {
                name: "core::starknet::storage::Map".into(),
                type_arguments: vec![
                    TypeNode::primitive("core::felt252"),
                    TypeNode::primitive("core::integer::u64"),
                ],
            })
        );
    }

    #[test]
    fn test_self_referential_struct_is_cut() {
        let reg = registry(vec![struct_entry(
            "demo::Node",
            &[
                ("value", "core::felt252"),
                ("children", "core::array::Array::<demo::Node>"),
            ],
        )]);
        let TypeNode::Struct(s) = resolve_type("demo::Node", &reg).unwrap() else {
            panic!("expected struct");
        };
        assert_eq!(
            s.members[1].ty,
            TypeNode::array(TypeNode::unknown("demo::Node"))
        );
    }

    #[test]
    fn test_resolution_is_deterministic_with_cycles() {
        let reg = registry(vec![
            struct_entry("demo::A", &[("b", "demo::B")]),
            struct_entry("demo::B", &[("a", "demo::A")]),
        ]);
        let resolver = TypeResolver::new(&reg);
        let first_a = resolver.resolve("demo::A").unwrap();
        let b = resolver.resolve("demo::B").unwrap();
        let second_a = resolver.resolve("demo::A").unwrap();
        assert_eq!(first_a, second_a);
        assert_eq!(b, resolve_type("demo::B", &reg).unwrap());
    }

    #[test]
    fn test_depth_limit() {
        let reg = TypeRegistry::default();
        let resolver = TypeResolver::with_options(&reg, ResolverOptions { max_depth: 2 });
        let node = resolver
            .resolve("core::array::Array::<core::array::Array::<core::felt252>>")
            .unwrap();
        assert_eq!(
            node,
            TypeNode::array(TypeNode::array(TypeNode::unknown("core::felt252")))
        );
    }

    #[test]
    fn test_split_top_level() {
        assert_eq!(split_top_level("a, b<c, d>, (e, f)").unwrap(), ["a", "b<c, d>", "(e, f)"]);
        assert_eq!(split_top_level("a,").unwrap(), ["a"]);
        assert!(split_top_level("a>, b").is_none());
        assert!(split_top_level("a<b").is_none());
    }
}
