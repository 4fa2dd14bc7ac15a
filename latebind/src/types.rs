//! Runtime type tokens.
//!
//! Dispatch operates on values whose types are only known at run time, so
//! types are first-class data here: a [`TypeDesc`] is a cheap-to-clone
//! handle over an immutable [`TypeKind`]. Named (application-defined) types
//! are described in a [`TypeRegistry`] the embedding application populates
//! up front; the engine itself never introspects anything.

use std::fmt;
use std::sync::Arc;

pub mod registry;

pub use registry::{ReferenceKind, TypeRegistry};

/// Identifier of a registered named type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId {
    pub index: u32,
}

impl TypeId {
    /// Create a type id from a raw index.
    pub fn new(index: u32) -> Self {
        Self { index }
    }
}

/// Primitive kinds participating in the implicit widening table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Decimal,
}

impl PrimitiveKind {
    /// Canonical lowercase name, as accepted by the manifest type parser.
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Char => "char",
            PrimitiveKind::I8 => "i8",
            PrimitiveKind::I16 => "i16",
            PrimitiveKind::I32 => "i32",
            PrimitiveKind::I64 => "i64",
            PrimitiveKind::U8 => "u8",
            PrimitiveKind::U16 => "u16",
            PrimitiveKind::U32 => "u32",
            PrimitiveKind::U64 => "u64",
            PrimitiveKind::F32 => "f32",
            PrimitiveKind::F64 => "f64",
            PrimitiveKind::Decimal => "decimal",
        }
    }

    /// Parse a canonical primitive name.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "bool" => PrimitiveKind::Bool,
            "char" => PrimitiveKind::Char,
            "i8" => PrimitiveKind::I8,
            "i16" => PrimitiveKind::I16,
            "i32" => PrimitiveKind::I32,
            "i64" => PrimitiveKind::I64,
            "u8" => PrimitiveKind::U8,
            "u16" => PrimitiveKind::U16,
            "u32" => PrimitiveKind::U32,
            "u64" => PrimitiveKind::U64,
            "f32" => PrimitiveKind::F32,
            "f64" => PrimitiveKind::F64,
            "decimal" => PrimitiveKind::Decimal,
            _ => return None,
        })
    }
}

/// The shape of a runtime type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    /// The universal top type; every value is usable where `Any` is declared.
    Any,
    /// A primitive value kind.
    Primitive(PrimitiveKind),
    /// Immutable string; reference-like, hence nullable.
    Str,
    /// An application-registered class, interface or struct.
    Named(TypeId),
    /// Homogeneous sequence of the element type. Also the packed
    /// representation of a variadic tail.
    List(TypeDesc),
    /// Explicit nullable wrapping of a value type.
    Nullable(TypeDesc),
    /// An unbound generic type parameter of the member itself. The
    /// constraint defaults to `Any` when absent.
    Generic {
        slot: u32,
        constraint: Option<TypeDesc>,
    },
}

/// A runtime type token.
///
/// Cloning is cheap; the kind is shared behind an `Arc` and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDesc {
    pub kind: Arc<TypeKind>,
}

impl TypeDesc {
    /// Create a type token from a kind.
    pub fn new(kind: TypeKind) -> Self {
        Self { kind: Arc::new(kind) }
    }

    pub fn any() -> Self {
        Self::new(TypeKind::Any)
    }

    pub fn bool() -> Self {
        Self::new(TypeKind::Primitive(PrimitiveKind::Bool))
    }

    pub fn char() -> Self {
        Self::new(TypeKind::Primitive(PrimitiveKind::Char))
    }

    pub fn i8() -> Self {
        Self::new(TypeKind::Primitive(PrimitiveKind::I8))
    }

    pub fn i16() -> Self {
        Self::new(TypeKind::Primitive(PrimitiveKind::I16))
    }

    pub fn i32() -> Self {
        Self::new(TypeKind::Primitive(PrimitiveKind::I32))
    }

    pub fn i64() -> Self {
        Self::new(TypeKind::Primitive(PrimitiveKind::I64))
    }

    pub fn u8() -> Self {
        Self::new(TypeKind::Primitive(PrimitiveKind::U8))
    }

    pub fn u16() -> Self {
        Self::new(TypeKind::Primitive(PrimitiveKind::U16))
    }

    pub fn u32() -> Self {
        Self::new(TypeKind::Primitive(PrimitiveKind::U32))
    }

    pub fn u64() -> Self {
        Self::new(TypeKind::Primitive(PrimitiveKind::U64))
    }

    pub fn f32() -> Self {
        Self::new(TypeKind::Primitive(PrimitiveKind::F32))
    }

    pub fn f64() -> Self {
        Self::new(TypeKind::Primitive(PrimitiveKind::F64))
    }

    pub fn decimal() -> Self {
        Self::new(TypeKind::Primitive(PrimitiveKind::Decimal))
    }

    pub fn str() -> Self {
        Self::new(TypeKind::Str)
    }

    pub fn named(id: TypeId) -> Self {
        Self::new(TypeKind::Named(id))
    }

    pub fn list(element: TypeDesc) -> Self {
        Self::new(TypeKind::List(element))
    }

    pub fn nullable(inner: TypeDesc) -> Self {
        Self::new(TypeKind::Nullable(inner))
    }

    /// An unconstrained generic placeholder for the given slot.
    pub fn generic(slot: u32) -> Self {
        Self::new(TypeKind::Generic { slot, constraint: None })
    }

    /// A generic placeholder bounded by a constraint type.
    pub fn generic_bounded(slot: u32, constraint: TypeDesc) -> Self {
        Self::new(TypeKind::Generic {
            slot,
            constraint: Some(constraint),
        })
    }

    /// True iff this type denotes an unbound generic parameter of the
    /// member itself.
    pub fn is_generic_placeholder(&self) -> bool {
        matches!(self.kind.as_ref(), TypeKind::Generic { .. })
    }

    /// The type arguments are actually checked against: the constraint for
    /// a generic placeholder (`Any` when unconstrained), the type itself
    /// otherwise.
    pub fn effective(&self) -> TypeDesc {
        match self.kind.as_ref() {
            TypeKind::Generic { constraint, .. } => {
                constraint.clone().unwrap_or_else(TypeDesc::any)
            }
            _ => self.clone(),
        }
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind.as_ref() {
            TypeKind::Any => write!(f, "any"),
            TypeKind::Primitive(p) => write!(f, "{}", p.name()),
            TypeKind::Str => write!(f, "string"),
            TypeKind::Named(id) => write!(f, "#{}", id.index),
            TypeKind::List(element) => write!(f, "{}[]", element),
            TypeKind::Nullable(inner) => write!(f, "{}?", inner),
            TypeKind::Generic { slot, constraint: None } => write!(f, "${}", slot),
            TypeKind::Generic { slot, constraint: Some(c) } => {
                write!(f, "${}: {}", slot, c)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_placeholder_detection() {
        assert!(TypeDesc::generic(0).is_generic_placeholder());
        assert!(TypeDesc::generic_bounded(1, TypeDesc::str()).is_generic_placeholder());
        assert!(!TypeDesc::i32().is_generic_placeholder());
        assert!(!TypeDesc::nullable(TypeDesc::i32()).is_generic_placeholder());
    }

    #[test]
    fn effective_type_of_generic() {
        assert_eq!(TypeDesc::generic(0).effective(), TypeDesc::any());
        assert_eq!(
            TypeDesc::generic_bounded(0, TypeDesc::i64()).effective(),
            TypeDesc::i64()
        );
        assert_eq!(TypeDesc::i32().effective(), TypeDesc::i32());
    }

    #[test]
    fn structural_equality() {
        assert_eq!(TypeDesc::i32(), TypeDesc::i32());
        assert_ne!(TypeDesc::i32(), TypeDesc::i64());
        assert_eq!(
            TypeDesc::list(TypeDesc::nullable(TypeDesc::i32())),
            TypeDesc::list(TypeDesc::nullable(TypeDesc::i32()))
        );
        assert_ne!(
            TypeDesc::nullable(TypeDesc::i32()),
            TypeDesc::i32()
        );
    }

    #[test]
    fn display_round_trips_names() {
        assert_eq!(TypeDesc::i32().to_string(), "i32");
        assert_eq!(TypeDesc::str().to_string(), "string");
        assert_eq!(TypeDesc::nullable(TypeDesc::u8()).to_string(), "u8?");
        assert_eq!(TypeDesc::list(TypeDesc::f64()).to_string(), "f64[]");
        assert_eq!(TypeDesc::generic(2).to_string(), "$2");
    }
}
