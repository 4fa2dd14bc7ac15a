//! Registered member candidates.
//!
//! A candidate pairs a signature with a preferred dispatch name and an
//! executable capability. The three member varieties form a closed tagged
//! union; all of them expose the same flat [`InvokableMember`] surface, so
//! the dispatcher never cares which variety won.

use std::fmt;
use std::sync::Arc;

use crate::contract::MemberSignature;
use crate::error::DispatchResult;
use crate::types::TypeDesc;
use crate::value::Value;

/// The executable capability of a candidate.
///
/// Receives the target instance, the caller's generic type arguments and
/// the bound argument list (one value per declared parameter, variadic
/// tail packed as a list).
pub type InvokeFn =
    Arc<dyn Fn(&Value, &[TypeDesc], &[Value]) -> DispatchResult<Value> + Send + Sync>;

/// Common surface of every registered member.
pub trait InvokableMember {
    fn signature(&self) -> &MemberSignature;

    /// The externally visible dispatch name, independent of the
    /// signature's internal name.
    fn preferred_name(&self) -> &str;

    fn invoke(
        &self,
        target: &Value,
        generic_args: &[TypeDesc],
        args: &[Value],
    ) -> DispatchResult<Value>;
}

/// Which accessor a property or field candidate represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accessor {
    Get,
    Set,
}

/// An invocable method.
pub struct MethodMember {
    signature: MemberSignature,
    preferred_name: Arc<str>,
    run: InvokeFn,
}

impl MethodMember {
    pub fn new<F>(
        preferred_name: impl Into<Arc<str>>,
        signature: MemberSignature,
        run: F,
    ) -> Self
    where
        F: Fn(&Value, &[TypeDesc], &[Value]) -> DispatchResult<Value> + Send + Sync + 'static,
    {
        Self {
            signature,
            preferred_name: preferred_name.into(),
            run: Arc::new(run),
        }
    }
}

impl InvokableMember for MethodMember {
    fn signature(&self) -> &MemberSignature {
        &self.signature
    }

    fn preferred_name(&self) -> &str {
        &self.preferred_name
    }

    fn invoke(
        &self,
        target: &Value,
        generic_args: &[TypeDesc],
        args: &[Value],
    ) -> DispatchResult<Value> {
        (self.run)(target, generic_args, args)
    }
}

impl fmt::Debug for MethodMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodMember")
            .field("preferred_name", &self.preferred_name)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// One accessor of a property.
pub struct PropertyMember {
    signature: MemberSignature,
    preferred_name: Arc<str>,
    accessor: Accessor,
    run: InvokeFn,
}

impl PropertyMember {
    pub fn new<F>(
        preferred_name: impl Into<Arc<str>>,
        signature: MemberSignature,
        accessor: Accessor,
        run: F,
    ) -> Self
    where
        F: Fn(&Value, &[TypeDesc], &[Value]) -> DispatchResult<Value> + Send + Sync + 'static,
    {
        Self {
            signature,
            preferred_name: preferred_name.into(),
            accessor,
            run: Arc::new(run),
        }
    }

    pub fn accessor(&self) -> Accessor {
        self.accessor
    }
}

impl InvokableMember for PropertyMember {
    fn signature(&self) -> &MemberSignature {
        &self.signature
    }

    fn preferred_name(&self) -> &str {
        &self.preferred_name
    }

    fn invoke(
        &self,
        target: &Value,
        generic_args: &[TypeDesc],
        args: &[Value],
    ) -> DispatchResult<Value> {
        (self.run)(target, generic_args, args)
    }
}

impl fmt::Debug for PropertyMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyMember")
            .field("preferred_name", &self.preferred_name)
            .field("accessor", &self.accessor)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// One accessor of a plain data field.
pub struct FieldMember {
    signature: MemberSignature,
    preferred_name: Arc<str>,
    accessor: Accessor,
    run: InvokeFn,
}

impl FieldMember {
    pub fn new<F>(
        preferred_name: impl Into<Arc<str>>,
        signature: MemberSignature,
        accessor: Accessor,
        run: F,
    ) -> Self
    where
        F: Fn(&Value, &[TypeDesc], &[Value]) -> DispatchResult<Value> + Send + Sync + 'static,
    {
        Self {
            signature,
            preferred_name: preferred_name.into(),
            accessor,
            run: Arc::new(run),
        }
    }

    pub fn accessor(&self) -> Accessor {
        self.accessor
    }
}

impl InvokableMember for FieldMember {
    fn signature(&self) -> &MemberSignature {
        &self.signature
    }

    fn preferred_name(&self) -> &str {
        &self.preferred_name
    }

    fn invoke(
        &self,
        target: &Value,
        generic_args: &[TypeDesc],
        args: &[Value],
    ) -> DispatchResult<Value> {
        (self.run)(target, generic_args, args)
    }
}

impl fmt::Debug for FieldMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldMember")
            .field("preferred_name", &self.preferred_name)
            .field("accessor", &self.accessor)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// A registered member considered for every call.
#[derive(Debug)]
pub enum Candidate {
    Method(MethodMember),
    Property(PropertyMember),
    Field(FieldMember),
}

impl Candidate {
    pub fn signature(&self) -> &MemberSignature {
        match self {
            Candidate::Method(m) => m.signature(),
            Candidate::Property(p) => p.signature(),
            Candidate::Field(f) => f.signature(),
        }
    }

    pub fn preferred_name(&self) -> &str {
        match self {
            Candidate::Method(m) => m.preferred_name(),
            Candidate::Property(p) => p.preferred_name(),
            Candidate::Field(f) => f.preferred_name(),
        }
    }

    pub fn invoke(
        &self,
        target: &Value,
        generic_args: &[TypeDesc],
        args: &[Value],
    ) -> DispatchResult<Value> {
        match self {
            Candidate::Method(m) => m.invoke(target, generic_args, args),
            Candidate::Property(p) => p.invoke(target, generic_args, args),
            Candidate::Field(f) => f.invoke(target, generic_args, args),
        }
    }
}
