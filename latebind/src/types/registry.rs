//! The explicit type registration table.
//!
//! There is no reflection here: the embedding application declares every
//! named type it intends to dispatch over, together with its base types,
//! implemented interfaces and user-defined implicit conversions. The
//! registry is the single source of truth the conversion oracle consults.

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use std::sync::Arc;

use crate::error::ContractError;
use crate::types::{PrimitiveKind, TypeDesc, TypeId, TypeKind};

/// Whether a registered type behaves like a reference or a value.
///
/// Classes and interfaces admit null; structs do not unless explicitly
/// wrapped in a nullable type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Class,
    Interface,
    Struct,
}

#[derive(Debug, Clone)]
struct TypeEntry {
    name: Arc<str>,
    kind: ReferenceKind,
    /// Base class and implemented interfaces, in declaration order.
    bases: Vec<TypeId>,
}

/// Registration table for named types and implicit conversions.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    entries: Vec<TypeEntry>,
    names: IndexMap<Arc<str>, TypeId>,
    implicit: Vec<(TypeDesc, TypeDesc)>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named type with no bases.
    pub fn register(
        &mut self,
        name: impl Into<Arc<str>>,
        kind: ReferenceKind,
    ) -> Result<TypeId, ContractError> {
        self.register_with_bases(name, kind, &[])
    }

    /// Register a named type declaring its base class and interfaces.
    pub fn register_with_bases(
        &mut self,
        name: impl Into<Arc<str>>,
        kind: ReferenceKind,
        bases: &[TypeId],
    ) -> Result<TypeId, ContractError> {
        let name = name.into();
        if self.names.contains_key(&name) {
            return Err(ContractError::DuplicateType {
                name: name.to_string(),
            });
        }
        let id = TypeId::new(self.entries.len() as u32);
        self.entries.push(TypeEntry {
            name: name.clone(),
            kind,
            bases: bases.to_vec(),
        });
        self.names.insert(name, id);
        Ok(id)
    }

    /// Record that a user-defined implicit conversion exists from `from`
    /// to `to`. Only the existence is recorded; performing the conversion
    /// is the invoked member's concern.
    pub fn register_implicit(&mut self, from: TypeDesc, to: TypeDesc) {
        self.implicit.push((from, to));
    }

    /// Look up a registered type by name.
    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.names.get(name).copied()
    }

    /// The registered name of a type id, if it exists.
    pub fn name(&self, id: TypeId) -> Option<&str> {
        self.entries.get(id.index as usize).map(|e| e.name.as_ref())
    }

    /// True for class- and interface-kind types.
    pub fn is_reference(&self, id: TypeId) -> bool {
        matches!(
            self.entries.get(id.index as usize).map(|e| e.kind),
            Some(ReferenceKind::Class) | Some(ReferenceKind::Interface)
        )
    }

    /// Reflexive, transitive is-a over declared bases and interfaces.
    pub fn is_subtype(&self, a: TypeId, b: TypeId) -> bool {
        if a == b {
            return true;
        }
        let mut visited = FxHashSet::default();
        let mut work = vec![a];
        while let Some(id) = work.pop() {
            if !visited.insert(id) {
                continue;
            }
            let Some(entry) = self.entries.get(id.index as usize) else {
                continue;
            };
            for &base in &entry.bases {
                if base == b {
                    return true;
                }
                work.push(base);
            }
        }
        false
    }

    /// True iff a user-defined implicit conversion `from -> to` was
    /// registered. Single indirection only; conversions never chain.
    pub fn has_implicit(&self, from: &TypeDesc, to: &TypeDesc) -> bool {
        self.implicit
            .iter()
            .any(|(f, t)| f == from && t == to)
    }

    /// Parse a manifest type name.
    ///
    /// Grammar: a base name (`any`, `string`, a primitive name, `$N` for
    /// generic slot N, or a registered type name) followed by any number
    /// of `[]` (list) and `?` (nullable) suffixes, applied innermost-first.
    pub fn parse_type(&self, text: &str) -> Result<TypeDesc, ContractError> {
        let text = text.trim();
        if let Some(inner) = text.strip_suffix('?') {
            return Ok(TypeDesc::nullable(self.parse_type(inner)?));
        }
        if let Some(inner) = text.strip_suffix("[]") {
            return Ok(TypeDesc::list(self.parse_type(inner)?));
        }
        if let Some(slot) = text.strip_prefix('$') {
            let slot = slot.parse::<u32>().map_err(|_| ContractError::UnknownType {
                name: text.to_string(),
            })?;
            return Ok(TypeDesc::generic(slot));
        }
        match text {
            "any" => Ok(TypeDesc::any()),
            "string" => Ok(TypeDesc::str()),
            _ => {
                if let Some(p) = PrimitiveKind::from_name(text) {
                    return Ok(TypeDesc::new(TypeKind::Primitive(p)));
                }
                self.lookup(text).map(TypeDesc::named).ok_or_else(|| {
                    ContractError::UnknownType {
                        name: text.to_string(),
                    }
                })
            }
        }
    }

    /// Render a type with registered names resolved, for diagnostics.
    pub fn display(&self, ty: &TypeDesc) -> String {
        match ty.kind.as_ref() {
            TypeKind::Named(id) => self
                .name(*id)
                .map(str::to_string)
                .unwrap_or_else(|| ty.to_string()),
            TypeKind::List(element) => format!("{}[]", self.display(element)),
            TypeKind::Nullable(inner) => format!("{}?", self.display(inner)),
            TypeKind::Generic { slot, constraint: Some(c) } => {
                format!("${}: {}", slot, self.display(c))
            }
            _ => ty.to_string(),
        }
    }
}
