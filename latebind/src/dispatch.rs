//! Member registry and dispatch.
//!
//! This module implements the resolution algorithm that selects which
//! registered member to invoke for a call supplied by name with run-time
//! argument values.
//!
//! # Algorithm Overview
//!
//! 1. **Score candidates**: every registered member is scored against the
//!    call by the deviancy scorer
//! 2. **Filter**: candidates scoring the no-match sentinel are discarded
//! 3. **Select best**: the unique lowest-scoring candidate wins
//! 4. **Report**: an empty survivor set is a not-found condition, a tie is
//!    an ambiguity carrying every tied signature

use std::sync::Arc;

use tracing::{debug, trace};

use crate::bind::bind_arguments;
use crate::convert::ConversionOracle;
use crate::error::{DispatchError, DispatchResult};
use crate::types::{TypeDesc, TypeRegistry};
use crate::value::Value;

pub mod candidate;
pub mod score;

pub use candidate::{
    Accessor, Candidate, FieldMember, InvokableMember, InvokeFn, MethodMember, PropertyMember,
};
pub use score::{CallRequest, CONVERSION_COST, NO_MATCH, OPTIONAL_COST};

use crate::contract::{MemberSignature, ParamSpec};
use score::score_member;

/// Outcome of resolving a call against the candidate list.
#[derive(Debug)]
pub enum Resolution<'a> {
    /// A unique best-scoring candidate was found.
    Resolved { candidate: &'a Candidate, score: u32 },
    /// No candidate can serve the call.
    NotFound,
    /// Two or more candidates tied for the lowest score.
    Ambiguous { candidates: Vec<&'a Candidate> },
}

/// An immutable member registry bound to one target instance.
///
/// Holds no mutable state; concurrent calls are safe as long as the
/// invoked members themselves are.
pub struct Dispatcher {
    types: Arc<TypeRegistry>,
    target: Value,
    candidates: Vec<Candidate>,
}

impl Dispatcher {
    /// Create a dispatcher over an owned candidate list.
    pub fn new(types: Arc<TypeRegistry>, target: Value, candidates: Vec<Candidate>) -> Self {
        Self {
            types,
            target,
            candidates,
        }
    }

    /// Start declaring members for a target instance.
    pub fn builder(types: Arc<TypeRegistry>, target: Value) -> DispatcherBuilder {
        DispatcherBuilder {
            types,
            target,
            candidates: Vec::new(),
        }
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn target(&self) -> &Value {
        &self.target
    }

    /// Resolve a call to its winning candidate without invoking it.
    pub fn resolve(&self, call: &CallRequest<'_>) -> Resolution<'_> {
        let oracle = ConversionOracle::new(&self.types);
        let mut best = NO_MATCH;
        let mut winners: Vec<&Candidate> = Vec::new();

        for candidate in &self.candidates {
            let score = score_member(candidate, call, &oracle);
            trace!(
                "candidate `{}` scored {} for `{}`",
                candidate.preferred_name(),
                score,
                call.name
            );
            if score == NO_MATCH {
                continue;
            }
            if score < best {
                best = score;
                winners.clear();
                winners.push(candidate);
            } else if score == best {
                winners.push(candidate);
            }
        }

        match winners.len() {
            0 => Resolution::NotFound,
            1 => {
                debug!("resolved `{}` with score {}", call.name, best);
                Resolution::Resolved {
                    candidate: winners[0],
                    score: best,
                }
            }
            _ => Resolution::Ambiguous { candidates: winners },
        }
    }

    /// Resolve and invoke a member by name.
    ///
    /// Arguments are bound to the winner's parameter list (defaults
    /// substituted, numeric representations widened, variadic tail
    /// packed) before the member executes, exactly once.
    pub fn invoke(
        &self,
        name: &str,
        generic_args: &[TypeDesc],
        args: &[Value],
    ) -> DispatchResult<Value> {
        let call = CallRequest {
            name,
            generic_args,
            args,
        };
        match self.resolve(&call) {
            Resolution::Resolved { candidate, .. } => {
                let bound = bind_arguments(
                    candidate.preferred_name(),
                    candidate.signature(),
                    args,
                    &self.types,
                )?;
                candidate.invoke(&self.target, generic_args, &bound)
            }
            Resolution::NotFound => Err(DispatchError::MemberNotFound {
                name: name.to_string(),
            }),
            Resolution::Ambiguous { candidates } => Err(DispatchError::AmbiguousMember {
                name: name.to_string(),
                candidates: candidates
                    .into_iter()
                    .map(|c| c.signature().clone())
                    .collect(),
            }),
        }
    }
}

/// Explicit member registration for one target instance.
///
/// This is the code-level replacement for attribute scanning: the
/// embedding application declares each member's name, parameters and
/// capability directly.
pub struct DispatcherBuilder {
    types: Arc<TypeRegistry>,
    target: Value,
    candidates: Vec<Candidate>,
}

impl DispatcherBuilder {
    /// Register a method candidate.
    pub fn method<F>(
        mut self,
        preferred_name: impl Into<Arc<str>>,
        signature: MemberSignature,
        run: F,
    ) -> Self
    where
        F: Fn(&Value, &[TypeDesc], &[Value]) -> DispatchResult<Value> + Send + Sync + 'static,
    {
        self.candidates
            .push(Candidate::Method(MethodMember::new(
                preferred_name,
                signature,
                run,
            )));
        self
    }

    /// Register a read-only property: one nullary getter candidate.
    pub fn property<G>(
        mut self,
        preferred_name: impl Into<Arc<str>>,
        get: G,
    ) -> Self
    where
        G: Fn(&Value) -> DispatchResult<Value> + Send + Sync + 'static,
    {
        let preferred_name = preferred_name.into();
        self.candidates.push(Candidate::Property(PropertyMember::new(
            preferred_name.clone(),
            MemberSignature::nullary(preferred_name),
            Accessor::Get,
            move |target, _, _| get(target),
        )));
        self
    }

    /// Register a read-write property: a getter candidate plus a setter
    /// candidate taking the value type as its single parameter.
    pub fn property_rw<G, S>(
        mut self,
        preferred_name: impl Into<Arc<str>>,
        value_ty: TypeDesc,
        get: G,
        set: S,
    ) -> Self
    where
        G: Fn(&Value) -> DispatchResult<Value> + Send + Sync + 'static,
        S: Fn(&Value, &Value) -> DispatchResult<()> + Send + Sync + 'static,
    {
        let preferred_name = preferred_name.into();
        self = self.property(preferred_name.clone(), get);
        self.candidates.push(Candidate::Property(PropertyMember::new(
            preferred_name.clone(),
            setter_signature(preferred_name.as_ref(), value_ty),
            Accessor::Set,
            move |target, _, args| run_setter(&preferred_name, &set, target, args),
        )));
        self
    }

    /// Register a field: a getter candidate plus a setter candidate.
    pub fn field<G, S>(
        mut self,
        preferred_name: impl Into<Arc<str>>,
        value_ty: TypeDesc,
        get: G,
        set: S,
    ) -> Self
    where
        G: Fn(&Value) -> DispatchResult<Value> + Send + Sync + 'static,
        S: Fn(&Value, &Value) -> DispatchResult<()> + Send + Sync + 'static,
    {
        let preferred_name = preferred_name.into();
        self.candidates.push(Candidate::Field(FieldMember::new(
            preferred_name.clone(),
            MemberSignature::nullary(preferred_name.clone()),
            Accessor::Get,
            move |target, _, _| get(target),
        )));
        let setter_name = preferred_name.clone();
        self.candidates.push(Candidate::Field(FieldMember::new(
            preferred_name.clone(),
            setter_signature(preferred_name.as_ref(), value_ty),
            Accessor::Set,
            move |target, _, args| run_setter(&setter_name, &set, target, args),
        )));
        self
    }

    /// Register an already-built candidate.
    pub fn candidate(mut self, candidate: Candidate) -> Self {
        self.candidates.push(candidate);
        self
    }

    pub fn build(self) -> Dispatcher {
        Dispatcher::new(self.types, self.target, self.candidates)
    }
}

fn setter_signature(name: &str, value_ty: TypeDesc) -> MemberSignature {
    MemberSignature::build(name, 0, vec![ParamSpec::required(value_ty)])
        .expect("checked: a single required parameter is always valid")
}

fn run_setter<S>(
    member: &str,
    set: &S,
    target: &Value,
    args: &[Value],
) -> DispatchResult<Value>
where
    S: Fn(&Value, &Value) -> DispatchResult<()>,
{
    let Some(value) = args.first() else {
        return Err(DispatchError::MissingArgument {
            member: member.to_string(),
            index: 0,
        });
    };
    set(target, value)?;
    Ok(Value::Null)
}
