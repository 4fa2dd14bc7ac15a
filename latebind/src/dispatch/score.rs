//! Signature deviancy scoring.
//!
//! The scorer is a pure function from one candidate plus one call to a
//! non-negative score: 0 is a perfect match, every widening conversion
//! adds one unit, every omitted optional parameter adds a unit large
//! enough to dominate any realistic number of conversions, and
//! [`NO_MATCH`] marks a candidate that cannot serve the call at all.
//! Selection among scored candidates is the dispatcher's concern; the
//! scorer never tie-breaks.

use crate::contract::{MemberSignature, ParamSpec};
use crate::convert::ConversionOracle;
use crate::dispatch::candidate::Candidate;
use crate::types::TypeDesc;
use crate::value::Value;

/// Sentinel score: this candidate cannot satisfy the call.
pub const NO_MATCH: u32 = u32::MAX;

/// Cost of one implicit conversion (widening, boxing to nullable, null
/// into a nullable slot).
pub const CONVERSION_COST: u32 = 1;

/// Cost of relying on one optional-parameter default. Dominates any
/// realistic sum of conversion units so an explicit argument always beats
/// a defaulted one.
pub const OPTIONAL_COST: u32 = 1000;

/// One dispatch request: member name, generic type arguments, argument
/// values. Transient; never stored.
#[derive(Debug, Clone, Copy)]
pub struct CallRequest<'a> {
    pub name: &'a str,
    pub generic_args: &'a [TypeDesc],
    pub args: &'a [Value],
}

/// Score a candidate against a call.
pub fn score_member(candidate: &Candidate, call: &CallRequest<'_>, oracle: &ConversionOracle<'_>) -> u32 {
    if call.name != candidate.preferred_name() {
        return NO_MATCH;
    }
    let signature = candidate.signature();
    if call.generic_args.len() != signature.generic_count() as usize {
        return NO_MATCH;
    }
    score_signature(signature, call.args, oracle)
}

/// Score an argument list against a signature's parameter list.
///
/// Name and generic-arity gates are assumed to have passed.
pub fn score_signature(
    signature: &MemberSignature,
    args: &[Value],
    oracle: &ConversionOracle<'_>,
) -> u32 {
    let params = signature.params();
    if args.len() > params.len() && !signature.has_variadic_tail() {
        return NO_MATCH;
    }

    let mut total = 0u32;
    for (index, param) in params.iter().enumerate() {
        if param.variadic {
            // The tail binds every remaining argument element-wise. By
            // construction nothing is declared after it.
            for arg in args.get(index..).unwrap_or(&[]) {
                let cost = provided_cost(arg, param, oracle);
                if cost == NO_MATCH {
                    return NO_MATCH;
                }
                total = total.saturating_add(cost);
            }
            break;
        }

        let cost = match args.get(index) {
            Some(arg) => provided_cost(arg, param, oracle),
            None => missing_cost(param),
        };
        if cost == NO_MATCH {
            return NO_MATCH;
        }
        total = total.saturating_add(cost);
    }
    total
}

/// Deviancy contribution of one supplied argument.
fn provided_cost(arg: &Value, param: &ParamSpec, oracle: &ConversionOracle<'_>) -> u32 {
    let effective = param.ty.effective();
    let Some(actual) = arg.type_desc() else {
        // Null binds to any nullable slot at one conversion unit.
        return if oracle.is_nullable(&effective) {
            CONVERSION_COST
        } else {
            NO_MATCH
        };
    };
    if actual == effective {
        return 0;
    }
    if !oracle.can_convert(&actual, &effective) {
        return NO_MATCH;
    }
    // Generic binding is free: the concrete type is substituted at call
    // time, so the conversion is not charged.
    if param.is_generic_placeholder() {
        0
    } else {
        CONVERSION_COST
    }
}

/// Deviancy contribution of a parameter that received no argument.
fn missing_cost(param: &ParamSpec) -> u32 {
    if param.optional {
        OPTIONAL_COST
    } else {
        NO_MATCH
    }
}
