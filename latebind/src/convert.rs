//! Type compatibility oracle.
//!
//! Decides, for a pair of runtime types, whether a value of the source
//! type may be used where the target type is declared. The oracle borrows
//! the [`TypeRegistry`] for named-type relationships and user-defined
//! implicit conversions; everything else is a closed relation over
//! [`TypeKind`].

use crate::types::{PrimitiveKind, TypeDesc, TypeKind, TypeRegistry};

/// The closed implicit numeric widening relation.
///
/// A fixed table, not a promotion algorithm: a source kind widens only to
/// the kinds listed for it. `bool`, `f64` and `decimal` widen to nothing.
pub fn widens_to(source: PrimitiveKind, target: PrimitiveKind) -> bool {
    use PrimitiveKind::*;
    matches!(
        (source, target),
        (I8, I16 | I32 | I64 | F32 | F64 | Decimal)
            | (U8, I16 | U16 | I32 | U32 | I64 | U64 | F32 | F64 | Decimal)
            | (I16, I32 | I64 | F32 | F64 | Decimal)
            | (U16, I32 | U32 | I64 | U64 | F32 | F64 | Decimal)
            | (I32, I64 | F32 | F64 | Decimal)
            | (U32, I64 | U64 | F32 | F64 | Decimal)
            | (I64, F32 | F64 | Decimal)
            | (U64, F32 | F64 | Decimal)
            | (Char, U16 | I32 | U32 | I64 | U64 | F32 | F64 | Decimal)
            | (F32, F64)
    )
}

/// Compatibility queries over the registered type universe.
pub struct ConversionOracle<'a> {
    types: &'a TypeRegistry,
}

impl<'a> ConversionOracle<'a> {
    pub fn new(types: &'a TypeRegistry) -> Self {
        Self { types }
    }

    /// True for any reference-like type and for explicitly nullable
    /// wrappings of value types.
    pub fn is_nullable(&self, ty: &TypeDesc) -> bool {
        match ty.kind.as_ref() {
            TypeKind::Any | TypeKind::Str | TypeKind::List(_) | TypeKind::Nullable(_) => true,
            TypeKind::Named(id) => self.types.is_reference(*id),
            TypeKind::Primitive(_) => false,
            TypeKind::Generic { .. } => self.is_nullable(&ty.effective()),
        }
    }

    /// Whether a value of `source` may be used where `target` is declared.
    pub fn can_convert(&self, source: &TypeDesc, target: &TypeDesc) -> bool {
        // Rule 1: the top type accepts everything.
        if matches!(target.kind.as_ref(), TypeKind::Any) {
            return true;
        }
        // Rule 2: identity or is-a.
        if self.is_a(source, target) {
            return true;
        }
        // Rule 3: user-defined implicit conversion, one indirection.
        if self.types.has_implicit(source, target) {
            return true;
        }
        // Rule 4: the numeric widening table.
        if let (TypeKind::Primitive(s), TypeKind::Primitive(t)) =
            (source.kind.as_ref(), target.kind.as_ref())
        {
            if widens_to(*s, *t) {
                return true;
            }
        }
        // Rule 5: a nullable target accepts anything its underlying type
        // accepts.
        if let TypeKind::Nullable(underlying) = target.kind.as_ref() {
            return self.can_convert(source, underlying);
        }
        false
    }

    /// Identity, or subtype/interface-implementation between named types.
    fn is_a(&self, source: &TypeDesc, target: &TypeDesc) -> bool {
        if source == target {
            return true;
        }
        match (source.kind.as_ref(), target.kind.as_ref()) {
            (TypeKind::Named(s), TypeKind::Named(t)) => self.types.is_subtype(*s, *t),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ReferenceKind;
    use proptest::prelude::*;

    static ALL_KINDS: [PrimitiveKind; 13] = [
        PrimitiveKind::Bool,
        PrimitiveKind::Char,
        PrimitiveKind::I8,
        PrimitiveKind::I16,
        PrimitiveKind::I32,
        PrimitiveKind::I64,
        PrimitiveKind::U8,
        PrimitiveKind::U16,
        PrimitiveKind::U32,
        PrimitiveKind::U64,
        PrimitiveKind::F32,
        PrimitiveKind::F64,
        PrimitiveKind::Decimal,
    ];

    #[test]
    fn any_accepts_everything() {
        let reg = TypeRegistry::new();
        let oracle = ConversionOracle::new(&reg);
        assert!(oracle.can_convert(&TypeDesc::i32(), &TypeDesc::any()));
        assert!(oracle.can_convert(&TypeDesc::str(), &TypeDesc::any()));
        assert!(oracle.can_convert(
            &TypeDesc::list(TypeDesc::bool()),
            &TypeDesc::any()
        ));
    }

    #[test]
    fn identity_always_converts() {
        let reg = TypeRegistry::new();
        let oracle = ConversionOracle::new(&reg);
        assert!(oracle.can_convert(&TypeDesc::i32(), &TypeDesc::i32()));
        assert!(oracle.can_convert(&TypeDesc::str(), &TypeDesc::str()));
        assert!(oracle.can_convert(
            &TypeDesc::nullable(TypeDesc::i32()),
            &TypeDesc::nullable(TypeDesc::i32())
        ));
    }

    #[test]
    fn named_subtypes_convert() {
        let mut reg = TypeRegistry::new();
        let animal = reg.register("Animal", ReferenceKind::Class).unwrap();
        let dog = reg
            .register_with_bases("Dog", ReferenceKind::Class, &[animal])
            .unwrap();
        let oracle = ConversionOracle::new(&reg);
        assert!(oracle.can_convert(&TypeDesc::named(dog), &TypeDesc::named(animal)));
        assert!(!oracle.can_convert(&TypeDesc::named(animal), &TypeDesc::named(dog)));
    }

    #[test]
    fn user_defined_implicit_conversion() {
        let mut reg = TypeRegistry::new();
        let meters = reg.register("Meters", ReferenceKind::Struct).unwrap();
        reg.register_implicit(TypeDesc::named(meters), TypeDesc::f64());
        let oracle = ConversionOracle::new(&reg);
        assert!(oracle.can_convert(&TypeDesc::named(meters), &TypeDesc::f64()));
        // Not symmetric, and no chaining through f64 -> anything else.
        assert!(!oracle.can_convert(&TypeDesc::f64(), &TypeDesc::named(meters)));
        assert!(!oracle.can_convert(&TypeDesc::named(meters), &TypeDesc::f32()));
    }

    #[test]
    fn widening_samples_from_the_table() {
        assert!(widens_to(PrimitiveKind::I32, PrimitiveKind::I64));
        assert!(widens_to(PrimitiveKind::I32, PrimitiveKind::F32));
        assert!(widens_to(PrimitiveKind::I32, PrimitiveKind::Decimal));
        assert!(widens_to(PrimitiveKind::U8, PrimitiveKind::U64));
        assert!(widens_to(PrimitiveKind::U8, PrimitiveKind::I16));
        assert!(widens_to(PrimitiveKind::Char, PrimitiveKind::U16));
        assert!(widens_to(PrimitiveKind::F32, PrimitiveKind::F64));

        assert!(!widens_to(PrimitiveKind::I64, PrimitiveKind::I32));
        assert!(!widens_to(PrimitiveKind::I8, PrimitiveKind::U8));
        assert!(!widens_to(PrimitiveKind::U64, PrimitiveKind::I64));
        assert!(!widens_to(PrimitiveKind::F64, PrimitiveKind::F32));
        assert!(!widens_to(PrimitiveKind::Bool, PrimitiveKind::I32));
        assert!(!widens_to(PrimitiveKind::Decimal, PrimitiveKind::F64));
        assert!(!widens_to(PrimitiveKind::U16, PrimitiveKind::I16));
    }

    #[test]
    fn nullable_target_unwraps_once() {
        let reg = TypeRegistry::new();
        let oracle = ConversionOracle::new(&reg);
        // i32 -> i64? goes through the widening table after unwrapping.
        assert!(oracle.can_convert(
            &TypeDesc::i32(),
            &TypeDesc::nullable(TypeDesc::i64())
        ));
        assert!(oracle.can_convert(
            &TypeDesc::i32(),
            &TypeDesc::nullable(TypeDesc::i32())
        ));
        assert!(!oracle.can_convert(
            &TypeDesc::str(),
            &TypeDesc::nullable(TypeDesc::i32())
        ));
        // Wrapped sources do not implicitly unwrap.
        assert!(!oracle.can_convert(
            &TypeDesc::nullable(TypeDesc::i32()),
            &TypeDesc::i32()
        ));
    }

    #[test]
    fn nullability_by_kind() {
        let mut reg = TypeRegistry::new();
        let class = reg.register("C", ReferenceKind::Class).unwrap();
        let strukt = reg.register("S", ReferenceKind::Struct).unwrap();
        let oracle = ConversionOracle::new(&reg);

        assert!(oracle.is_nullable(&TypeDesc::any()));
        assert!(oracle.is_nullable(&TypeDesc::str()));
        assert!(oracle.is_nullable(&TypeDesc::list(TypeDesc::i32())));
        assert!(oracle.is_nullable(&TypeDesc::nullable(TypeDesc::i32())));
        assert!(oracle.is_nullable(&TypeDesc::named(class)));
        assert!(!oracle.is_nullable(&TypeDesc::named(strukt)));
        assert!(!oracle.is_nullable(&TypeDesc::i32()));

        // Placeholders defer to their effective constraint.
        assert!(oracle.is_nullable(&TypeDesc::generic(0)));
        assert!(!oracle.is_nullable(&TypeDesc::generic_bounded(0, TypeDesc::i32())));
        assert!(oracle.is_nullable(&TypeDesc::generic_bounded(0, TypeDesc::named(class))));
    }

    #[test]
    fn lists_are_invariant() {
        let reg = TypeRegistry::new();
        let oracle = ConversionOracle::new(&reg);
        assert!(oracle.can_convert(
            &TypeDesc::list(TypeDesc::i32()),
            &TypeDesc::list(TypeDesc::i32())
        ));
        // No collection covariance: i32[] is not usable as i64[].
        assert!(!oracle.can_convert(
            &TypeDesc::list(TypeDesc::i32()),
            &TypeDesc::list(TypeDesc::i64())
        ));
    }

    proptest! {
        #[test]
        fn widening_is_never_reflexive(kind in proptest::sample::select(&ALL_KINDS[..])) {
            prop_assert!(!widens_to(kind, kind));
        }

        #[test]
        fn widening_implies_can_convert(
            source in proptest::sample::select(&ALL_KINDS[..]),
            target in proptest::sample::select(&ALL_KINDS[..]),
        ) {
            prop_assume!(widens_to(source, target));
            let reg = TypeRegistry::new();
            let oracle = ConversionOracle::new(&reg);
            let s = TypeDesc::new(crate::types::TypeKind::Primitive(source));
            let t = TypeDesc::new(crate::types::TypeKind::Primitive(target));
            prop_assert!(oracle.can_convert(&s, &t));
        }

        #[test]
        fn sink_kinds_widen_to_nothing(target in proptest::sample::select(&ALL_KINDS[..])) {
            prop_assert!(!widens_to(PrimitiveKind::F64, target));
            prop_assert!(!widens_to(PrimitiveKind::Decimal, target));
            prop_assert!(!widens_to(PrimitiveKind::Bool, target));
        }
    }
}
