//! Runtime argument and return values.

use rust_decimal::Decimal;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::types::{PrimitiveKind, TypeDesc, TypeId, TypeKind};

/// A shared handle to an application-defined object.
///
/// The payload is opaque to the engine; only the registered type id takes
/// part in dispatch. Equality is identity: same type and same allocation.
#[derive(Clone)]
pub struct ObjectRef {
    type_id: TypeId,
    payload: Arc<dyn Any + Send + Sync>,
}

impl ObjectRef {
    pub fn new<T: Any + Send + Sync>(type_id: TypeId, payload: T) -> Self {
        Self {
            type_id,
            payload: Arc::new(payload),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Borrow the payload as a concrete type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectRef(#{})", self.type_id.index)
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id && Arc::ptr_eq(&self.payload, &other.payload)
    }
}

/// A dynamically typed value flowing through dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Char(char),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Decimal(Decimal),
    Str(Arc<str>),
    List(Vec<Value>),
    Object(ObjectRef),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The primitive kind of this value, if it carries one.
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        Some(match self {
            Value::Bool(_) => PrimitiveKind::Bool,
            Value::Char(_) => PrimitiveKind::Char,
            Value::I8(_) => PrimitiveKind::I8,
            Value::I16(_) => PrimitiveKind::I16,
            Value::I32(_) => PrimitiveKind::I32,
            Value::I64(_) => PrimitiveKind::I64,
            Value::U8(_) => PrimitiveKind::U8,
            Value::U16(_) => PrimitiveKind::U16,
            Value::U32(_) => PrimitiveKind::U32,
            Value::U64(_) => PrimitiveKind::U64,
            Value::F32(_) => PrimitiveKind::F32,
            Value::F64(_) => PrimitiveKind::F64,
            Value::Decimal(_) => PrimitiveKind::Decimal,
            _ => return None,
        })
    }

    /// The run-time type of this value. `Null` carries none.
    ///
    /// A list's element type is the common type of its elements, `any`
    /// when the list is empty or heterogeneous.
    pub fn type_desc(&self) -> Option<TypeDesc> {
        Some(match self {
            Value::Null => return None,
            Value::Str(_) => TypeDesc::str(),
            Value::List(items) => {
                let mut element: Option<TypeDesc> = None;
                for item in items {
                    match (item.type_desc(), &element) {
                        (Some(ty), None) => element = Some(ty),
                        (Some(ty), Some(seen)) if ty == *seen => {}
                        _ => {
                            element = Some(TypeDesc::any());
                            break;
                        }
                    }
                }
                TypeDesc::list(element.unwrap_or_else(TypeDesc::any))
            }
            Value::Object(obj) => TypeDesc::named(obj.type_id()),
            // Remaining variants all carry a primitive kind.
            Value::Bool(_)
            | Value::Char(_)
            | Value::I8(_)
            | Value::I16(_)
            | Value::I32(_)
            | Value::I64(_)
            | Value::U8(_)
            | Value::U16(_)
            | Value::U32(_)
            | Value::U64(_)
            | Value::F32(_)
            | Value::F64(_)
            | Value::Decimal(_) => TypeDesc::new(TypeKind::Primitive(
                self.primitive_kind().expect("primitive variant"),
            )),
        })
    }

    /// The value substituted for an omitted optional parameter that
    /// declares no explicit default.
    pub fn default_of(ty: &TypeDesc) -> Value {
        match ty.kind.as_ref() {
            TypeKind::Primitive(p) => match p {
                PrimitiveKind::Bool => Value::Bool(false),
                PrimitiveKind::Char => Value::Char('\0'),
                PrimitiveKind::I8 => Value::I8(0),
                PrimitiveKind::I16 => Value::I16(0),
                PrimitiveKind::I32 => Value::I32(0),
                PrimitiveKind::I64 => Value::I64(0),
                PrimitiveKind::U8 => Value::U8(0),
                PrimitiveKind::U16 => Value::U16(0),
                PrimitiveKind::U32 => Value::U32(0),
                PrimitiveKind::U64 => Value::U64(0),
                PrimitiveKind::F32 => Value::F32(0.0),
                PrimitiveKind::F64 => Value::F64(0.0),
                PrimitiveKind::Decimal => Value::Decimal(Decimal::ZERO),
            },
            TypeKind::Str => Value::Str("".into()),
            TypeKind::List(_) => Value::List(Vec::new()),
            _ => Value::Null,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Value::Char(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::I32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::I64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::F64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.into())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v.into())
    }
}
