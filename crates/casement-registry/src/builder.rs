//! Typed registration builder for target types.
//!
//! The builder is where native members meet the uniform calling
//! convention: each registration parses the member's declared signature,
//! and the generated thunk conforms scalar arguments to it (with the
//! permissive zero-default policy) before the host closure runs, then
//! boxes the result. Host closures therefore see arguments already in the
//! declared kinds and never deal with receiver downcasting themselves.

use std::any::Any;
use std::marker::PhantomData;
use std::sync::Arc;

use casement_core::marshal::{conform_argument, conform_return};
use casement_core::{MethodSig, ObjRef, TypeSig, Value};

use crate::entry::{
    ConstructorEntry, FieldEntry, MethodEntry, TypeEntry, Visibility,
};
use crate::error::{MemberError, RegistryError};

/// Builds a [`TypeEntry`] for host type `T`.
pub struct TypeEntryBuilder<T> {
    name: String,
    methods: Vec<MethodEntry>,
    constructors: Vec<ConstructorEntry>,
    fields: Vec<FieldEntry>,
    _marker: PhantomData<fn() -> T>,
}

impl TypeEntry {
    /// Start registering host type `T` under the given qualified name.
    pub fn builder<T: Any + Send + Sync>(name: &str) -> TypeEntryBuilder<T> {
        TypeEntryBuilder {
            name: name.to_string(),
            methods: Vec::new(),
            constructors: Vec::new(),
            fields: Vec::new(),
            _marker: PhantomData,
        }
    }
}

impl<T: Any + Send + Sync> TypeEntryBuilder<T> {
    /// Register an instance method.
    ///
    /// Arguments are conformed to `signature` before `f` runs; the
    /// receiver is downcast to `T` first.
    pub fn method<F>(
        mut self,
        name: &str,
        signature: &str,
        visibility: Visibility,
        f: F,
    ) -> Result<Self, RegistryError>
    where
        F: Fn(&T, &[Value]) -> Result<Value, MemberError> + Send + Sync + 'static,
    {
        let sig = MethodSig::parse(signature)?;
        self.check_method_free(name, &sig)?;
        let params = sig.params.clone();
        let owner = self.name.clone();
        self.methods.push(MethodEntry {
            name: name.to_string(),
            signature: sig,
            is_static: false,
            visibility,
            thunk: Arc::new(move |instance, args| {
                let receiver = downcast_receiver::<T>(&owner, instance)?;
                f(receiver, &conform_all(&params, args))
            }),
        });
        Ok(self)
    }

    /// Register a static method. The instance reference is ignored.
    pub fn static_method<F>(
        mut self,
        name: &str,
        signature: &str,
        visibility: Visibility,
        f: F,
    ) -> Result<Self, RegistryError>
    where
        F: Fn(&[Value]) -> Result<Value, MemberError> + Send + Sync + 'static,
    {
        let sig = MethodSig::parse(signature)?;
        self.check_method_free(name, &sig)?;
        let params = sig.params.clone();
        self.methods.push(MethodEntry {
            name: name.to_string(),
            signature: sig,
            is_static: true,
            visibility,
            thunk: Arc::new(move |_instance, args| f(&conform_all(&params, args))),
        });
        Ok(self)
    }

    /// Register a constructor. The signature must return void; the new
    /// instance is wrapped under this type's name.
    pub fn constructor<F>(
        mut self,
        signature: &str,
        visibility: Visibility,
        f: F,
    ) -> Result<Self, RegistryError>
    where
        F: Fn(&[Value]) -> Result<T, MemberError> + Send + Sync + 'static,
    {
        let sig = MethodSig::parse(signature)?;
        if sig.ret != TypeSig::Void {
            return Err(RegistryError::ConstructorReturnsValue {
                signature: signature.to_string(),
            });
        }
        if self.constructors.iter().any(|c| c.signature.params == sig.params) {
            return Err(RegistryError::DuplicateMember {
                type_name: self.name.clone(),
                member: format!("<init>{sig}"),
            });
        }
        let params = sig.params.clone();
        let owner = self.name.clone();
        self.constructors.push(ConstructorEntry {
            signature: sig,
            visibility,
            thunk: Arc::new(move |args| {
                Ok(ObjRef::new(&owner, f(&conform_all(&params, args))?))
            }),
        });
        Ok(self)
    }

    /// Register a read-only instance field.
    pub fn field<G>(
        self,
        name: &str,
        signature: &str,
        visibility: Visibility,
        get: G,
    ) -> Result<Self, RegistryError>
    where
        G: Fn(&T) -> Value + Send + Sync + 'static,
    {
        self.push_field(name, signature, false, visibility, get, None::<fn(&T, Value)>)
    }

    /// Register a writable instance field.
    pub fn field_mut<G, S>(
        self,
        name: &str,
        signature: &str,
        visibility: Visibility,
        get: G,
        set: S,
    ) -> Result<Self, RegistryError>
    where
        G: Fn(&T) -> Value + Send + Sync + 'static,
        S: Fn(&T, Value) + Send + Sync + 'static,
    {
        self.push_field(name, signature, false, visibility, get, Some(set))
    }

    /// Register a read-only static field. The instance reference is ignored.
    pub fn static_field<G>(
        mut self,
        name: &str,
        signature: &str,
        visibility: Visibility,
        get: G,
    ) -> Result<Self, RegistryError>
    where
        G: Fn() -> Value + Send + Sync + 'static,
    {
        let sig = self.check_field_free(name, signature)?;
        let read_sig = sig.clone();
        self.fields.push(FieldEntry {
            name: name.to_string(),
            signature: sig,
            is_static: true,
            visibility,
            getter: Arc::new(move |_instance| Ok(conform_return(&read_sig, get()))),
            setter: None,
        });
        Ok(self)
    }

    /// Register a writable static field.
    pub fn static_field_mut<G, S>(
        mut self,
        name: &str,
        signature: &str,
        visibility: Visibility,
        get: G,
        set: S,
    ) -> Result<Self, RegistryError>
    where
        G: Fn() -> Value + Send + Sync + 'static,
        S: Fn(Value) + Send + Sync + 'static,
    {
        let sig = self.check_field_free(name, signature)?;
        let read_sig = sig.clone();
        let write_sig = sig.clone();
        self.fields.push(FieldEntry {
            name: name.to_string(),
            signature: sig,
            is_static: true,
            visibility,
            getter: Arc::new(move |_instance| Ok(conform_return(&read_sig, get()))),
            setter: Some(Arc::new(move |_instance, value| {
                set(conform_argument(&write_sig, Some(&value)));
                Ok(())
            })),
        });
        Ok(self)
    }

    /// Finish registration.
    pub fn build(self) -> TypeEntry {
        TypeEntry {
            name: self.name,
            methods: self.methods,
            constructors: self.constructors,
            fields: self.fields,
        }
    }

    fn push_field<G, S>(
        mut self,
        name: &str,
        signature: &str,
        is_static: bool,
        visibility: Visibility,
        get: G,
        set: Option<S>,
    ) -> Result<Self, RegistryError>
    where
        G: Fn(&T) -> Value + Send + Sync + 'static,
        S: Fn(&T, Value) + Send + Sync + 'static,
    {
        let sig = self.check_field_free(name, signature)?;
        let owner = self.name.clone();
        let read_sig = sig.clone();
        let read_owner = owner.clone();
        let getter: crate::entry::GetterThunk = Arc::new(move |instance: Option<&ObjRef>| {
            let receiver = downcast_receiver::<T>(&read_owner, instance)?;
            Ok(conform_return(&read_sig, get(receiver)))
        });
        let setter = set.map(|set| {
            let write_sig = sig.clone();
            let thunk: crate::entry::SetterThunk = Arc::new(move |instance, value| {
                let receiver = downcast_receiver::<T>(&owner, instance)?;
                set(receiver, conform_argument(&write_sig, Some(&value)));
                Ok(())
            });
            thunk
        });
        self.fields.push(FieldEntry {
            name: name.to_string(),
            signature: sig,
            is_static,
            visibility,
            getter,
            setter,
        });
        Ok(self)
    }

    fn check_method_free(&self, name: &str, sig: &MethodSig) -> Result<(), RegistryError> {
        if self
            .methods
            .iter()
            .any(|m| m.name == name && m.signature.params == sig.params)
        {
            return Err(RegistryError::DuplicateMember {
                type_name: self.name.clone(),
                member: format!("{name}{sig}"),
            });
        }
        Ok(())
    }

    fn check_field_free(&self, name: &str, signature: &str) -> Result<TypeSig, RegistryError> {
        let sig = TypeSig::parse(signature)?;
        if self.fields.iter().any(|f| f.name == name) {
            return Err(RegistryError::DuplicateMember {
                type_name: self.name.clone(),
                member: name.to_string(),
            });
        }
        Ok(sig)
    }
}

fn downcast_receiver<'a, T: Any>(
    expected: &str,
    instance: Option<&'a ObjRef>,
) -> Result<&'a T, MemberError> {
    let obj = instance.ok_or(MemberError::MissingReceiver)?;
    obj.downcast_ref::<T>()
        .ok_or_else(|| MemberError::ReceiverMismatch {
            expected: expected.to_string(),
            actual: obj.type_name().to_string(),
        })
}

fn conform_all(params: &[TypeSig], args: &[Value]) -> Vec<Value> {
    params
        .iter()
        .enumerate()
        .map(|(i, p)| conform_argument(p, args.get(i)))
        .collect()
}
