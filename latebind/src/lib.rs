//! Runtime member dispatch for contract-described objects.
//!
//! Given a contract describing an object's methods, properties and
//! fields, latebind invokes a member by name with dynamically supplied
//! arguments and generic type parameters, resolving among overloads by
//! deviancy scoring: every candidate whose preferred name and generic
//! arity match is scored on how far the supplied arguments deviate from
//! its declared parameter list, and the unique lowest-scoring candidate
//! wins.
//!
//! There is no reflection anywhere: the embedding application registers
//! its types in a [`TypeRegistry`] and declares members through a
//! [`DispatcherBuilder`] (or a JSON [`contract::manifest`]), supplying a
//! closure capability for each one.
//!
//! ```
//! use std::sync::Arc;
//! use latebind::{Dispatcher, MemberSignature, ParamSpec, TypeDesc, TypeRegistry, Value};
//!
//! let types = Arc::new(TypeRegistry::new());
//! let dispatcher = Dispatcher::builder(types, Value::Null)
//!     .method(
//!         "Double",
//!         MemberSignature::build("Double", 0, vec![ParamSpec::required(TypeDesc::i64())])
//!             .unwrap(),
//!         |_, _, args| match args {
//!             [Value::I64(n)] => Ok(Value::I64(n * 2)),
//!             _ => Ok(Value::Null),
//!         },
//!     )
//!     .build();
//!
//! // The i32 argument widens to the declared i64 before the member runs.
//! let out = dispatcher.invoke("Double", &[], &[Value::I32(21)]).unwrap();
//! assert_eq!(out, Value::I64(42));
//! ```

pub mod bind;
pub mod contract;
pub mod convert;
pub mod dispatch;
pub mod error;
pub mod types;
pub mod value;

pub use contract::{EventSpec, MemberSignature, ParamSpec};
pub use convert::{widens_to, ConversionOracle};
pub use dispatch::{
    Accessor, CallRequest, Candidate, Dispatcher, DispatcherBuilder, FieldMember,
    InvokableMember, MethodMember, PropertyMember, Resolution, CONVERSION_COST, NO_MATCH,
    OPTIONAL_COST,
};
pub use error::{ContractError, DispatchError, DispatchResult};
pub use types::{PrimitiveKind, ReferenceKind, TypeDesc, TypeId, TypeKind, TypeRegistry};
pub use value::{ObjectRef, Value};
