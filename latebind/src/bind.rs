//! Invocation-time argument binding.
//!
//! Scoring decides *whether* a call fits a signature; binding makes the
//! argument list actually match the declared parameter list before the
//! member runs: omitted optionals receive their defaults, primitive
//! values are widened to the declared representation, and the variadic
//! tail is packed into a single list value.

use rust_decimal::Decimal;

use crate::contract::{MemberSignature, ParamSpec};
use crate::convert::{widens_to, ConversionOracle};
use crate::error::{DispatchError, DispatchResult};
use crate::types::{PrimitiveKind, TypeDesc, TypeKind, TypeRegistry};
use crate::value::Value;

/// Align `args` to the signature's parameter list.
///
/// Returns one value per declared parameter; a variadic tail becomes a
/// packed [`Value::List`]. Tail elements that cannot convert to the
/// declared element type surface as
/// [`DispatchError::IncompatibleVariadicArgument`].
pub fn bind_arguments(
    member: &str,
    signature: &MemberSignature,
    args: &[Value],
    types: &TypeRegistry,
) -> DispatchResult<Vec<Value>> {
    let oracle = ConversionOracle::new(types);
    let params = signature.params();
    let mut bound = Vec::with_capacity(params.len());

    for (index, param) in params.iter().enumerate() {
        if param.variadic {
            let tail = args.get(index..).unwrap_or(&[]);
            bound.push(pack_tail(member, param, index, tail, types, &oracle)?);
            break;
        }

        match args.get(index) {
            Some(arg) => bound.push(coerce(arg, &param.ty.effective())),
            None if param.optional => bound.push(
                param
                    .default
                    .clone()
                    .unwrap_or_else(|| Value::default_of(&param.ty.effective())),
            ),
            None => {
                return Err(DispatchError::MissingArgument {
                    member: member.to_string(),
                    index,
                })
            }
        }
    }
    Ok(bound)
}

/// Pack the variadic tail, coercing each element to the declared element
/// type.
fn pack_tail(
    member: &str,
    param: &ParamSpec,
    first_index: usize,
    tail: &[Value],
    types: &TypeRegistry,
    oracle: &ConversionOracle<'_>,
) -> DispatchResult<Value> {
    let element_ty = param.ty.effective();
    let mut packed = Vec::with_capacity(tail.len());
    for (offset, arg) in tail.iter().enumerate() {
        let fits = match arg.type_desc() {
            None => oracle.is_nullable(&element_ty),
            Some(actual) => actual == element_ty || oracle.can_convert(&actual, &element_ty),
        };
        if !fits {
            return Err(DispatchError::IncompatibleVariadicArgument {
                member: member.to_string(),
                index: first_index + offset,
                expected: types.display(&element_ty),
            });
        }
        packed.push(coerce(arg, &element_ty));
    }
    Ok(Value::List(packed))
}

/// Best-effort representation adjustment.
///
/// Primitive values are widened to the declared kind; everything else
/// (subtype references, user-defined conversions, `any` slots) passes
/// through unchanged for the member to interpret.
fn coerce(value: &Value, target: &TypeDesc) -> Value {
    if value.is_null() {
        return Value::Null;
    }
    match target.kind.as_ref() {
        TypeKind::Primitive(kind) => widen(value, *kind).unwrap_or_else(|| value.clone()),
        TypeKind::Nullable(inner) => coerce(value, inner),
        _ => value.clone(),
    }
}

/// Perform one table-sanctioned widening on an actual value.
fn widen(value: &Value, target: PrimitiveKind) -> Option<Value> {
    let source = value.primitive_kind()?;
    if source == target {
        return Some(value.clone());
    }
    if !widens_to(source, target) {
        return None;
    }

    if let Value::F32(v) = value {
        if target == PrimitiveKind::F64 {
            return Some(Value::F64(f64::from(*v)));
        }
    }

    // Every other table entry starts from an exact integral payload.
    let payload: i128 = match value {
        Value::I8(v) => i128::from(*v),
        Value::I16(v) => i128::from(*v),
        Value::I32(v) => i128::from(*v),
        Value::I64(v) => i128::from(*v),
        Value::U8(v) => i128::from(*v),
        Value::U16(v) => i128::from(*v),
        Value::U32(v) => i128::from(*v),
        Value::U64(v) => i128::from(*v),
        Value::Char(v) => i128::from(u32::from(*v)),
        _ => return None,
    };
    Some(match target {
        PrimitiveKind::I16 => Value::I16(payload as i16),
        PrimitiveKind::I32 => Value::I32(payload as i32),
        PrimitiveKind::I64 => Value::I64(payload as i64),
        PrimitiveKind::U16 => Value::U16(payload as u16),
        PrimitiveKind::U32 => Value::U32(payload as u32),
        PrimitiveKind::U64 => Value::U64(payload as u64),
        PrimitiveKind::F32 => Value::F32(payload as f32),
        PrimitiveKind::F64 => Value::F64(payload as f64),
        PrimitiveKind::Decimal => Value::Decimal(Decimal::from_i128_with_scale(payload, 0)),
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sig(params: Vec<ParamSpec>) -> MemberSignature {
        MemberSignature::build("f", 0, params).unwrap()
    }

    #[test]
    fn exact_arguments_pass_through() {
        let reg = TypeRegistry::new();
        let s = sig(vec![
            ParamSpec::required(TypeDesc::i32()),
            ParamSpec::required(TypeDesc::str()),
        ]);
        let bound =
            bind_arguments("f", &s, &[Value::I32(1), Value::from("x")], &reg).unwrap();
        assert_eq!(bound, vec![Value::I32(1), Value::from("x")]);
    }

    #[test]
    fn primitives_widen_to_declared_representation() {
        let reg = TypeRegistry::new();
        let s = sig(vec![
            ParamSpec::required(TypeDesc::i64()),
            ParamSpec::required(TypeDesc::f64()),
            ParamSpec::required(TypeDesc::decimal()),
        ]);
        let bound = bind_arguments(
            "f",
            &s,
            &[Value::I32(7), Value::F32(1.5), Value::U8(9)],
            &reg,
        )
        .unwrap();
        assert_eq!(
            bound,
            vec![
                Value::I64(7),
                Value::F64(1.5),
                Value::Decimal(Decimal::from_i128_with_scale(9, 0)),
            ]
        );
    }

    #[test]
    fn omitted_optional_takes_explicit_default() {
        let reg = TypeRegistry::new();
        let s = sig(vec![
            ParamSpec::required(TypeDesc::str()),
            ParamSpec::optional_with(TypeDesc::str(), Value::from("hello")),
        ]);
        let bound = bind_arguments("f", &s, &[Value::from("world")], &reg).unwrap();
        assert_eq!(bound, vec![Value::from("world"), Value::from("hello")]);
    }

    #[test]
    fn omitted_optional_falls_back_to_type_default() {
        let reg = TypeRegistry::new();
        let s = sig(vec![ParamSpec::optional(TypeDesc::i32())]);
        assert_eq!(bind_arguments("f", &s, &[], &reg).unwrap(), vec![Value::I32(0)]);

        let s = sig(vec![ParamSpec::optional(TypeDesc::nullable(TypeDesc::i32()))]);
        assert_eq!(bind_arguments("f", &s, &[], &reg).unwrap(), vec![Value::Null]);
    }

    #[test]
    fn variadic_tail_packs_in_order_and_widens() {
        let reg = TypeRegistry::new();
        let s = sig(vec![
            ParamSpec::required(TypeDesc::str()),
            ParamSpec::variadic(TypeDesc::i64()),
        ]);
        let bound = bind_arguments(
            "f",
            &s,
            &[Value::from("label"), Value::I32(1), Value::I64(2), Value::I8(3)],
            &reg,
        )
        .unwrap();
        assert_eq!(
            bound,
            vec![
                Value::from("label"),
                Value::List(vec![Value::I64(1), Value::I64(2), Value::I64(3)]),
            ]
        );
    }

    #[test]
    fn empty_variadic_tail_packs_empty_list() {
        let reg = TypeRegistry::new();
        let s = sig(vec![ParamSpec::variadic(TypeDesc::i32())]);
        assert_eq!(
            bind_arguments("f", &s, &[], &reg).unwrap(),
            vec![Value::List(vec![])]
        );
    }

    #[test]
    fn incompatible_tail_element_is_its_own_error() {
        let reg = TypeRegistry::new();
        let s = sig(vec![ParamSpec::variadic(TypeDesc::i32())]);
        let err = bind_arguments(
            "f",
            &s,
            &[Value::I32(1), Value::from("nope")],
            &reg,
        )
        .unwrap_err();
        assert_eq!(
            err,
            DispatchError::IncompatibleVariadicArgument {
                member: "f".to_string(),
                index: 1,
                expected: "i32".to_string(),
            }
        );
    }

    #[test]
    fn missing_required_argument_is_reported() {
        let reg = TypeRegistry::new();
        let s = sig(vec![ParamSpec::required(TypeDesc::i32())]);
        let err = bind_arguments("f", &s, &[], &reg).unwrap_err();
        assert_eq!(
            err,
            DispatchError::MissingArgument {
                member: "f".to_string(),
                index: 0,
            }
        );
    }

    #[test]
    fn null_stays_null_in_nullable_slots() {
        let reg = TypeRegistry::new();
        let s = sig(vec![ParamSpec::required(TypeDesc::nullable(TypeDesc::i64()))]);
        assert_eq!(
            bind_arguments("f", &s, &[Value::Null], &reg).unwrap(),
            vec![Value::Null]
        );
        // A concrete value in a nullable slot still widens to the
        // underlying representation.
        assert_eq!(
            bind_arguments("f", &s, &[Value::I32(4)], &reg).unwrap(),
            vec![Value::I64(4)]
        );
    }
}
