//! Member and event contract descriptions.
//!
//! A contract is declared in code by the embedding application: each
//! invocable member is described by a [`MemberSignature`] (name, generic
//! arity, ordered parameter list), each raisable event by an
//! [`EventSpec`]. Signatures are validated at construction and immutable
//! afterwards.

use std::sync::Arc;

use crate::error::ContractError;
use crate::types::TypeDesc;
use crate::value::Value;

pub mod manifest;

/// One declared parameter of a member signature.
///
/// For a variadic parameter, `ty` is the element type each trailing
/// argument is checked against.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub ty: TypeDesc,
    pub optional: bool,
    pub variadic: bool,
    /// Explicit default substituted when an optional parameter receives no
    /// argument. Absent means the type default.
    pub default: Option<Value>,
}

impl ParamSpec {
    /// A required positional parameter.
    pub fn required(ty: TypeDesc) -> Self {
        Self {
            ty,
            optional: false,
            variadic: false,
            default: None,
        }
    }

    /// An optional parameter falling back to the type default.
    pub fn optional(ty: TypeDesc) -> Self {
        Self {
            ty,
            optional: true,
            variadic: false,
            default: None,
        }
    }

    /// An optional parameter with an explicit default value.
    pub fn optional_with(ty: TypeDesc, default: Value) -> Self {
        Self {
            ty,
            optional: true,
            variadic: false,
            default: Some(default),
        }
    }

    /// A variadic tail binding zero or more trailing arguments of the
    /// given element type.
    pub fn variadic(element: TypeDesc) -> Self {
        Self {
            ty: element,
            optional: false,
            variadic: true,
            default: None,
        }
    }

    /// True iff the declared type is an unbound generic placeholder of
    /// the member itself.
    pub fn is_generic_placeholder(&self) -> bool {
        self.ty.is_generic_placeholder()
    }
}

/// Immutable description of one invocable member.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberSignature {
    name: Arc<str>,
    generic_count: u32,
    params: Vec<ParamSpec>,
}

impl MemberSignature {
    /// Build a signature, validating its invariants: only the last
    /// parameter may be variadic, a variadic parameter carries no other
    /// modifier, and defaults appear only on optional parameters.
    pub fn build(
        name: impl Into<Arc<str>>,
        generic_count: u32,
        params: Vec<ParamSpec>,
    ) -> Result<Self, ContractError> {
        let last = params.len().saturating_sub(1);
        for (index, param) in params.iter().enumerate() {
            if param.variadic {
                if index != last {
                    return Err(ContractError::VariadicNotLast { index });
                }
                if param.optional || param.default.is_some() {
                    return Err(ContractError::VariadicModifier { index });
                }
            } else if param.default.is_some() && !param.optional {
                return Err(ContractError::DefaultOnRequired { index });
            }
        }
        Ok(Self {
            name: name.into(),
            generic_count,
            params,
        })
    }

    /// A no-parameter, non-generic signature. Cannot fail validation.
    pub fn nullary(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            generic_count: 0,
            params: Vec::new(),
        }
    }

    /// The signature's internal name. Dispatch matches on the candidate's
    /// preferred name, which may differ.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn generic_count(&self) -> u32 {
        self.generic_count
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// True iff the last declared parameter is a variadic tail.
    pub fn has_variadic_tail(&self) -> bool {
        self.params.last().is_some_and(|p| p.variadic)
    }
}

/// Declared shape of a raisable event: name plus payload parameter types.
#[derive(Debug, Clone, PartialEq)]
pub struct EventSpec {
    name: Arc<str>,
    params: Vec<TypeDesc>,
}

impl EventSpec {
    pub fn new(name: impl Into<Arc<str>>, params: Vec<TypeDesc>) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[TypeDesc] {
        &self.params
    }
}
