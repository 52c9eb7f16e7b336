//! Boxed values of the uniform calling convention.
//!
//! Every adapter operation takes a nullable instance reference plus a slice
//! of [`Value`]s and produces one [`Value`]. Scalars are carried inline;
//! everything else travels as an [`ObjRef`], a shared dynamically typed
//! instance tagged with the qualified name it was registered under.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A shared, dynamically typed instance.
///
/// The tag is the qualified type name the instance was wrapped with;
/// reference casts compare tags, downcasts compare concrete types.
#[derive(Clone)]
pub struct ObjRef {
    type_name: Arc<str>,
    inner: Arc<dyn Any + Send + Sync>,
}

impl ObjRef {
    /// Wrap a host value under the given qualified type name.
    pub fn new<T: Any + Send + Sync>(type_name: &str, value: T) -> ObjRef {
        ObjRef {
            type_name: Arc::from(type_name),
            inner: Arc::new(value),
        }
    }

    /// Qualified name this instance was registered under.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Whether the wrapped value is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    /// Borrow the wrapped value as a `T`, if it is one.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Whether two references point at the same instance.
    pub fn ptr_eq(&self, other: &ObjRef) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for ObjRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjRef({})", self.type_name)
    }
}

/// A value in the uniform boxed calling convention.
#[derive(Debug, Clone)]
pub enum Value {
    /// Absent value; also the neutral result of void operations.
    Null,
    Bool(bool),
    Char(char),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    /// A shared instance reference.
    Ref(ObjRef),
}

impl Value {
    /// Wrap a host value as a reference under the given qualified type name.
    pub fn of<T: Any + Send + Sync>(type_name: &str, value: T) -> Value {
        Value::Ref(ObjRef::new(type_name, value))
    }

    /// Whether this is the null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The instance reference, if this value carries one.
    pub fn as_obj(&self) -> Option<&ObjRef> {
        match self {
            Value::Ref(obj) => Some(obj),
            _ => None,
        }
    }

    /// Borrow a reference value's payload as a `T`, if it is one.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_obj().and_then(ObjRef::downcast_ref)
    }
}

impl From<ObjRef> for Value {
    fn from(obj: ObjRef) -> Value {
        Value::Ref(obj)
    }
}

/// Scalars compare by value, null by itself, references by instance identity.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Short(a), Value::Short(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::Ref(a), Value::Ref(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}
