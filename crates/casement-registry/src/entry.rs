//! Registered types and their member entries.

use std::fmt;
use std::sync::Arc;

use casement_core::{MethodSig, ObjRef, TypeSig, Value};

use crate::error::Result;

/// Thunk invoking a registered method over the uniform calling convention.
pub type MethodThunk = Arc<dyn Fn(Option<&ObjRef>, &[Value]) -> Result<Value> + Send + Sync>;

/// Thunk building a new instance of the owning type.
pub type ConstructorThunk = Arc<dyn Fn(&[Value]) -> Result<ObjRef> + Send + Sync>;

/// Thunk reading a registered field.
pub type GetterThunk = Arc<dyn Fn(Option<&ObjRef>) -> Result<Value> + Send + Sync>;

/// Thunk writing a registered field.
pub type SetterThunk = Arc<dyn Fn(Option<&ObjRef>, Value) -> Result<()> + Send + Sync>;

/// Member visibility. Private members are reachable only through a
/// privileged invoker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    pub fn is_public(self) -> bool {
        matches!(self, Visibility::Public)
    }
}

/// A registered method.
#[derive(Clone)]
pub struct MethodEntry {
    pub name: String,
    pub signature: MethodSig,
    pub is_static: bool,
    pub visibility: Visibility,
    pub(crate) thunk: MethodThunk,
}

impl MethodEntry {
    /// Invoke the member thunk.
    pub fn invoke(&self, instance: Option<&ObjRef>, args: &[Value]) -> Result<Value> {
        (self.thunk)(instance, args)
    }

    /// Clone the thunk for capture in a compiled dispatch table.
    pub fn thunk(&self) -> MethodThunk {
        self.thunk.clone()
    }
}

impl fmt::Debug for MethodEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodEntry")
            .field("name", &self.name)
            .field("signature", &self.signature.to_string())
            .field("is_static", &self.is_static)
            .field("visibility", &self.visibility)
            .finish_non_exhaustive()
    }
}

/// A registered constructor.
#[derive(Clone)]
pub struct ConstructorEntry {
    pub signature: MethodSig,
    pub visibility: Visibility,
    pub(crate) thunk: ConstructorThunk,
}

impl ConstructorEntry {
    /// Build a new instance of the owning type.
    pub fn construct(&self, args: &[Value]) -> Result<ObjRef> {
        (self.thunk)(args)
    }

    /// Clone the thunk for capture in a compiled dispatch table.
    pub fn thunk(&self) -> ConstructorThunk {
        self.thunk.clone()
    }
}

impl fmt::Debug for ConstructorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorEntry")
            .field("signature", &self.signature.to_string())
            .field("visibility", &self.visibility)
            .finish_non_exhaustive()
    }
}

/// A registered field with a getter and an optional setter.
#[derive(Clone)]
pub struct FieldEntry {
    pub name: String,
    pub signature: TypeSig,
    pub is_static: bool,
    pub visibility: Visibility,
    pub(crate) getter: GetterThunk,
    pub(crate) setter: Option<SetterThunk>,
}

impl FieldEntry {
    /// Read the field.
    pub fn read(&self, instance: Option<&ObjRef>) -> Result<Value> {
        (self.getter)(instance)
    }

    /// Write the field, if a setter was registered.
    pub fn write(&self, instance: Option<&ObjRef>, value: Value) -> Option<Result<()>> {
        self.setter.as_ref().map(|set| set(instance, value))
    }

    /// Whether a setter was registered.
    pub fn is_writable(&self) -> bool {
        self.setter.is_some()
    }

    /// Clone the getter thunk for capture in a compiled dispatch table.
    pub fn getter(&self) -> GetterThunk {
        self.getter.clone()
    }

    /// Clone the setter thunk for capture, if one was registered.
    pub fn setter(&self) -> Option<SetterThunk> {
        self.setter.clone()
    }
}

impl fmt::Debug for FieldEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldEntry")
            .field("name", &self.name)
            .field("signature", &self.signature.to_string())
            .field("is_static", &self.is_static)
            .field("visibility", &self.visibility)
            .field("writable", &self.is_writable())
            .finish_non_exhaustive()
    }
}

/// A registered target type and its invocable members.
#[derive(Debug, Clone)]
pub struct TypeEntry {
    pub(crate) name: String,
    pub(crate) methods: Vec<MethodEntry>,
    pub(crate) constructors: Vec<ConstructorEntry>,
    pub(crate) fields: Vec<FieldEntry>,
}

impl TypeEntry {
    /// Qualified name this type is registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All methods with the given name, any signature.
    pub fn methods_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MethodEntry> {
        self.methods.iter().filter(move |m| m.name == name)
    }

    /// The method with the given name and exact parameter types.
    pub fn method(&self, name: &str, params: &[TypeSig]) -> Option<&MethodEntry> {
        self.methods
            .iter()
            .find(|m| m.name == name && m.signature.params == params)
    }

    /// All registered constructors.
    pub fn constructors(&self) -> &[ConstructorEntry] {
        &self.constructors
    }

    /// The constructor with the exact parameter types.
    pub fn constructor(&self, params: &[TypeSig]) -> Option<&ConstructorEntry> {
        self.constructors.iter().find(|c| c.signature.params == params)
    }

    /// The field with the given name.
    pub fn field(&self, name: &str) -> Option<&FieldEntry> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Wrap a host instance as a reference tagged with this type's name.
    pub fn wrap<T: std::any::Any + Send + Sync>(&self, value: T) -> ObjRef {
        ObjRef::new(&self.name, value)
    }
}
