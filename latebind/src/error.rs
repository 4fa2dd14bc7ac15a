//! Error types for dispatch and contract construction.

use thiserror::Error;

use crate::contract::MemberSignature;

/// Dispatch result type.
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Errors surfaced by member resolution and invocation.
///
/// Per-candidate "no match" outcomes are not errors; they are score values
/// that never escape the scorer. These are the conditions a caller sees.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    /// No registered candidate survived scoring for the requested name.
    #[error("no member named `{name}` matches the call")]
    MemberNotFound { name: String },

    /// Two or more candidates tied for the lowest score. The tied
    /// signatures are carried so the caller can disambiguate.
    #[error("call to `{name}` is ambiguous between {} candidates", .candidates.len())]
    AmbiguousMember {
        name: String,
        candidates: Vec<MemberSignature>,
    },

    /// A variadic-tail element could not be converted to the declared
    /// element type at invocation time.
    #[error("argument {index} of `{member}` cannot convert to variadic element type `{expected}`")]
    IncompatibleVariadicArgument {
        member: String,
        index: usize,
        expected: String,
    },

    /// A required parameter received no argument. Only reachable when the
    /// binder is driven directly with an unscored argument list.
    #[error("missing required argument {index} for `{member}`")]
    MissingArgument { member: String, index: usize },

    /// The invoked member itself failed.
    #[error("member `{member}` failed: {message}")]
    Invocation { member: String, message: String },
}

/// Errors raised while building contracts: signatures, registered types
/// and manifests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    #[error("variadic parameter must be last (parameter {index})")]
    VariadicNotLast { index: usize },

    #[error("variadic parameter {index} cannot be optional or carry a default")]
    VariadicModifier { index: usize },

    #[error("parameter {index} declares a default but is not optional")]
    DefaultOnRequired { index: usize },

    #[error("unknown type name `{name}`")]
    UnknownType { name: String },

    #[error("type `{name}` is already registered")]
    DuplicateType { name: String },

    #[error("invalid contract manifest: {message}")]
    Manifest { message: String },
}
