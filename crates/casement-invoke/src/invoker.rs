//! Runtime lookup-and-invoke over the type registry.

use std::sync::Arc;

use casement_core::{MethodSig, ObjRef, Value};
use casement_registry::{TypeEntry, TypeRegistry, Visibility};

use crate::access::PrivilegedAccess;
use crate::error::{InvokeError, Result};

/// Resolves owner and member per call and forwards to the member thunk.
///
/// Every call pays full lookup cost; there is no shared cached state.
#[derive(Debug)]
pub struct Invoker {
    registry: Arc<TypeRegistry>,
    access: Option<PrivilegedAccess>,
}

impl Invoker {
    /// An invoker that sees public members only.
    pub fn new(registry: Arc<TypeRegistry>) -> Invoker {
        Invoker {
            registry,
            access: None,
        }
    }

    /// An invoker that also reaches non-public members.
    pub fn privileged(registry: Arc<TypeRegistry>, access: PrivilegedAccess) -> Invoker {
        Invoker {
            registry,
            access: Some(access),
        }
    }

    /// Invoke a method located by name and decoded parameter types.
    pub fn invoke_method(
        &self,
        owner: &str,
        name: &str,
        signature: &str,
        instance: Option<&ObjRef>,
        args: &[Value],
    ) -> Result<Value> {
        let entry = self.owner(owner)?;
        let sig = MethodSig::parse(signature)?;

        let mut name_seen = false;
        for method in entry.methods_named(name) {
            if !self.sees(method.visibility) {
                continue;
            }
            name_seen = true;
            if method.signature.params == sig.params {
                return Ok(method.invoke(instance, args)?);
            }
        }

        Err(if name_seen {
            InvokeError::TypeMismatch {
                owner: owner.to_string(),
                member: name.to_string(),
                signature: signature.to_string(),
            }
        } else {
            InvokeError::MemberNotFound {
                owner: owner.to_string(),
                member: name.to_string(),
            }
        })
    }

    /// Invoke a constructor located by decoded parameter types.
    ///
    /// Returns the newly built instance.
    pub fn invoke_constructor(
        &self,
        owner: &str,
        signature: &str,
        args: &[Value],
    ) -> Result<Value> {
        let entry = self.owner(owner)?;
        let sig = MethodSig::parse(signature)?;

        let mut any_seen = false;
        for ctor in entry.constructors() {
            if !self.sees(ctor.visibility) {
                continue;
            }
            any_seen = true;
            if ctor.signature.params == sig.params {
                return Ok(Value::Ref(ctor.construct(args)?));
            }
        }

        Err(if any_seen {
            InvokeError::TypeMismatch {
                owner: owner.to_string(),
                member: "<init>".to_string(),
                signature: signature.to_string(),
            }
        } else {
            InvokeError::MemberNotFound {
                owner: owner.to_string(),
                member: "<init>".to_string(),
            }
        })
    }

    /// Read a field located by name.
    pub fn read_field(&self, owner: &str, name: &str, instance: Option<&ObjRef>) -> Result<Value> {
        let entry = self.owner(owner)?;
        let field = self.field(&entry, owner, name)?;
        Ok(field.read(instance)?)
    }

    /// Write a field located by name.
    pub fn write_field(
        &self,
        owner: &str,
        name: &str,
        instance: Option<&ObjRef>,
        value: Value,
    ) -> Result<()> {
        let entry = self.owner(owner)?;
        let field = self.field(&entry, owner, name)?;
        match field.write(instance, value) {
            Some(outcome) => Ok(outcome?),
            // No setter registered: the writable member does not exist.
            None => Err(InvokeError::MemberNotFound {
                owner: owner.to_string(),
                member: name.to_string(),
            }),
        }
    }

    fn owner(&self, owner: &str) -> Result<Arc<TypeEntry>> {
        self.registry
            .get(owner)
            .cloned()
            .ok_or_else(|| InvokeError::TypeNotFound {
                owner: owner.to_string(),
            })
    }

    fn field<'a>(
        &self,
        entry: &'a TypeEntry,
        owner: &str,
        name: &str,
    ) -> Result<&'a casement_registry::FieldEntry> {
        entry
            .field(name)
            .filter(|f| self.sees(f.visibility))
            .ok_or_else(|| InvokeError::MemberNotFound {
                owner: owner.to_string(),
                member: name.to_string(),
            })
    }

    fn sees(&self, visibility: Visibility) -> bool {
        visibility.is_public() || self.access.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casement_registry::MemberError;
    use std::sync::atomic::{AtomicI32, Ordering};

    struct Account {
        balance: AtomicI32,
    }

    fn registry() -> Arc<TypeRegistry> {
        let entry = TypeEntry::builder::<Account>("bank.Account")
            .constructor("(I)V", Visibility::Public, |args| {
                Ok(Account {
                    balance: AtomicI32::new(args[0].as_int()),
                })
            })
            .unwrap()
            .method("deposit", "(I)I", Visibility::Public, |account, args| {
                let amount = args[0].as_int();
                Ok(Value::Int(
                    account.balance.fetch_add(amount, Ordering::SeqCst) + amount,
                ))
            })
            .unwrap()
            .method("deposit", "(D)D", Visibility::Public, |account, args| {
                let amount = args[0].as_double() as i32;
                Ok(Value::Double(
                    (account.balance.fetch_add(amount, Ordering::SeqCst) + amount) as f64,
                ))
            })
            .unwrap()
            .method("audit", "()I", Visibility::Private, |account, _args| {
                Ok(Value::Int(account.balance.load(Ordering::SeqCst)))
            })
            .unwrap()
            .method("fail", "()V", Visibility::Public, |_, _| {
                Err(MemberError::raised("ledger unavailable"))
            })
            .unwrap()
            .field(
                "balance",
                "I",
                Visibility::Public,
                |account| Value::Int(account.balance.load(Ordering::SeqCst)),
            )
            .unwrap()
            .build();

        let mut registry = TypeRegistry::new();
        registry.register(entry).unwrap();
        Arc::new(registry)
    }

    fn account(registry: &TypeRegistry, balance: i32) -> ObjRef {
        registry.get("bank.Account").unwrap().wrap(Account {
            balance: AtomicI32::new(balance),
        })
    }

    #[test]
    fn method_invocation() {
        let registry = registry();
        let invoker = Invoker::new(registry.clone());
        let instance = account(&registry, 10);

        let out = invoker
            .invoke_method("bank.Account", "deposit", "(I)I", Some(&instance), &[Value::Int(5)])
            .unwrap();
        assert_eq!(out, Value::Int(15));
    }

    #[test]
    fn overloads_matched_structurally() {
        let registry = registry();
        let invoker = Invoker::new(registry.clone());
        let instance = account(&registry, 0);

        // Same member name, selected by decoded parameter types.
        let int_out = invoker
            .invoke_method("bank.Account", "deposit", "(I)I", Some(&instance), &[Value::Int(3)])
            .unwrap();
        assert_eq!(int_out, Value::Int(3));

        let double_out = invoker
            .invoke_method(
                "bank.Account",
                "deposit",
                "(D)D",
                Some(&instance),
                &[Value::Double(4.0)],
            )
            .unwrap();
        assert_eq!(double_out, Value::Double(7.0));
    }

    #[test]
    fn constructor_returns_instance() {
        let registry = registry();
        let invoker = Invoker::new(registry);

        let out = invoker
            .invoke_constructor("bank.Account", "(I)V", &[Value::Int(100)])
            .unwrap();
        let obj = out.as_obj().unwrap();
        assert_eq!(obj.type_name(), "bank.Account");
        assert_eq!(
            obj.downcast_ref::<Account>().unwrap().balance.load(Ordering::SeqCst),
            100
        );
    }

    #[test]
    fn field_read() {
        let registry = registry();
        let invoker = Invoker::new(registry.clone());
        let instance = account(&registry, 42);

        let out = invoker
            .read_field("bank.Account", "balance", Some(&instance))
            .unwrap();
        assert_eq!(out, Value::Int(42));
    }

    #[test]
    fn read_only_field_rejects_writes() {
        let registry = registry();
        let invoker = Invoker::new(registry.clone());
        let instance = account(&registry, 0);

        assert!(matches!(
            invoker.write_field("bank.Account", "balance", Some(&instance), Value::Int(1)),
            Err(InvokeError::MemberNotFound { .. })
        ));
    }

    #[test]
    fn missing_owner_and_member() {
        let registry = registry();
        let invoker = Invoker::new(registry.clone());
        let instance = account(&registry, 0);

        assert!(matches!(
            invoker.invoke_method("bank.Vault", "deposit", "(I)I", Some(&instance), &[]),
            Err(InvokeError::TypeNotFound { .. })
        ));
        assert!(matches!(
            invoker.invoke_method("bank.Account", "withdraw", "(I)I", Some(&instance), &[]),
            Err(InvokeError::MemberNotFound { .. })
        ));
    }

    #[test]
    fn no_matching_overload_is_a_type_mismatch() {
        let registry = registry();
        let invoker = Invoker::new(registry.clone());
        let instance = account(&registry, 0);

        assert!(matches!(
            invoker.invoke_method(
                "bank.Account",
                "deposit",
                "(Llang.String;)I",
                Some(&instance),
                &[],
            ),
            Err(InvokeError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn target_failure_is_wrapped() {
        let registry = registry();
        let invoker = Invoker::new(registry.clone());
        let instance = account(&registry, 0);

        let err = invoker
            .invoke_method("bank.Account", "fail", "()V", Some(&instance), &[])
            .unwrap_err();
        match err {
            InvokeError::Invocation(inner) => {
                assert_eq!(inner.to_string(), "ledger unavailable");
            }
            other => panic!("expected Invocation, got {other:?}"),
        }
    }

    #[test]
    fn private_members_need_privileged_access() {
        let registry = registry();
        let instance = account(&registry, 9);

        let public = Invoker::new(registry.clone());
        assert!(matches!(
            public.invoke_method("bank.Account", "audit", "()I", Some(&instance), &[]),
            Err(InvokeError::MemberNotFound { .. })
        ));

        let privileged = Invoker::privileged(registry, PrivilegedAccess::acquire());
        let out = privileged
            .invoke_method("bank.Account", "audit", "()I", Some(&instance), &[])
            .unwrap();
        assert_eq!(out, Value::Int(9));
    }

    #[test]
    fn malformed_signature_surfaces() {
        let registry = registry();
        let invoker = Invoker::new(registry);

        assert!(matches!(
            invoker.invoke_method("bank.Account", "deposit", "(Q)I", None, &[]),
            Err(InvokeError::Signature(_))
        ));
    }
}
