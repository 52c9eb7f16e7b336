//! Per-operation dispatch-table compilation.
//!
//! The synthesizer turns an interface description plus a handler id into
//! an [`Adapter`]: one closure per operation, each capturing its resolved
//! binding. Direct bindings are resolved against the registry here, at
//! build time, and pay near-native cost per call; generic bindings capture
//! only strings and defer resolution to the invoker on every call.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use casement_core::marshal::conform_return;
use casement_core::{MethodSig, ObjRef, TypeSig, Value};
use casement_invoke::{InvokeError, Invoker, PrivilegedAccess};
use casement_registry::{MemberError, TypeEntry, TypeRegistry};

use crate::adapter::{Adapter, OperationImpl};
use crate::binding::{Action, Binding, DispatchMode};
use crate::error::BuildError;
use crate::interface::{InterfaceSpec, OperationSpec};
use crate::report::BuildReport;

/// Builds forwarding adapters against a type registry.
#[derive(Debug)]
pub struct Synthesizer {
    registry: Arc<TypeRegistry>,
    invoker: Arc<Invoker>,
}

impl Synthesizer {
    /// Create a synthesizer over the given registry.
    ///
    /// The generic path holds privileged access so that generic bindings
    /// reach non-public members.
    pub fn new(registry: Arc<TypeRegistry>) -> Synthesizer {
        let invoker = Arc::new(Invoker::privileged(
            registry.clone(),
            PrivilegedAccess::acquire(),
        ));
        Synthesizer { registry, invoker }
    }

    /// Build a forwarding adapter for the interface and handler.
    ///
    /// Building is side-effect-free; adapters for partially covered
    /// handlers build successfully, with missing operations failing only
    /// when invoked.
    pub fn build(&self, spec: &InterfaceSpec, handler: &str) -> Result<Adapter, BuildError> {
        let start = Instant::now();
        let mut ops: HashMap<String, OperationImpl> = HashMap::new();
        let mut direct_ops = 0;
        let mut generic_ops = 0;
        let mut unimplemented_ops = 0;

        for op in &spec.operations {
            let declared = MethodSig::parse(&op.signature)?;
            ensure_operation_shaped(&spec.name, op, &declared)?;

            let imp = match op.binding_for(handler) {
                None => {
                    unimplemented_ops += 1;
                    unimplemented(&op.name, handler)
                }
                Some(binding) => {
                    if binding.action == Action::CallConstructor && binding.is_static {
                        return Err(BuildError::StaticConstructor {
                            operation: op.name.clone(),
                            handler: handler.to_string(),
                        });
                    }
                    match binding.dispatch {
                        DispatchMode::Direct => {
                            direct_ops += 1;
                            self.compile_direct(&op.name, binding, declared.ret.clone())?
                        }
                        DispatchMode::Generic => {
                            generic_ops += 1;
                            self.compile_generic(binding, declared.ret.clone())
                        }
                    }
                }
            };
            ops.insert(op.name.clone(), imp);
        }

        let report = BuildReport {
            interface: spec.name.clone(),
            handler: handler.to_string(),
            direct_ops,
            generic_ops,
            unimplemented_ops,
            duration_ms: start.elapsed().as_millis() as u64,
        };
        tracing::debug!(
            interface = %spec.name,
            handler,
            direct_ops,
            generic_ops,
            unimplemented_ops,
            "adapter synthesized"
        );

        Ok(Adapter {
            interface: spec.name.clone(),
            handler: handler.to_string(),
            ops,
            report,
        })
    }

    /// Resolve the member now and capture its thunk.
    fn compile_direct(
        &self,
        operation: &str,
        binding: &Binding,
        declared_ret: TypeSig,
    ) -> Result<OperationImpl, BuildError> {
        let entry = self
            .registry
            .get(&binding.owner)
            .ok_or_else(|| unresolved(operation, format!("type {} is not registered", binding.owner)))?
            .clone();

        match binding.action {
            Action::CallMethod => self.compile_call(operation, binding, &entry, declared_ret),
            Action::CallConstructor => {
                self.compile_construct(operation, binding, &entry, declared_ret)
            }
            Action::GetField => self.compile_get(operation, binding, &entry, declared_ret),
            Action::SetField => self.compile_set(operation, binding, &entry, declared_ret),
        }
    }

    fn compile_call(
        &self,
        operation: &str,
        binding: &Binding,
        entry: &TypeEntry,
        declared_ret: TypeSig,
    ) -> Result<OperationImpl, BuildError> {
        let sig = MethodSig::parse(&binding.signature)?;
        let method = entry
            .method(&binding.member, &sig.params)
            .filter(|m| m.visibility.is_public())
            .ok_or_else(|| {
                unresolved(
                    operation,
                    format!(
                        "no public method {}{} in {}",
                        binding.member, binding.signature, binding.owner
                    ),
                )
            })?;
        if method.is_static != binding.is_static {
            return Err(unresolved(
                operation,
                format!(
                    "method {} in {} is {}static",
                    binding.member,
                    binding.owner,
                    if method.is_static { "" } else { "not " },
                ),
            ));
        }

        let thunk = method.thunk();
        let needs_instance = !method.is_static;
        let owner = binding.owner.clone();
        Ok(Arc::new(move |instance, args| {
            let instance = if needs_instance {
                Some(checked_instance(&owner, instance)?)
            } else {
                None
            };
            let out = thunk(instance, args)?;
            Ok(conform_return(&declared_ret, out))
        }))
    }

    fn compile_construct(
        &self,
        operation: &str,
        binding: &Binding,
        entry: &TypeEntry,
        declared_ret: TypeSig,
    ) -> Result<OperationImpl, BuildError> {
        let sig = MethodSig::parse(&binding.signature)?;
        let ctor = entry
            .constructor(&sig.params)
            .filter(|c| c.visibility.is_public())
            .ok_or_else(|| {
                unresolved(
                    operation,
                    format!(
                        "no public constructor {} in {}",
                        binding.signature, binding.owner
                    ),
                )
            })?;

        let thunk = ctor.thunk();
        Ok(Arc::new(move |_instance, args| {
            let built = thunk(args)?;
            Ok(conform_return(&declared_ret, Value::Ref(built)))
        }))
    }

    fn compile_get(
        &self,
        operation: &str,
        binding: &Binding,
        entry: &TypeEntry,
        declared_ret: TypeSig,
    ) -> Result<OperationImpl, BuildError> {
        let field = self.resolve_field(operation, binding, entry)?;
        let getter = field.getter();
        let needs_instance = !field.is_static;
        let owner = binding.owner.clone();
        Ok(Arc::new(move |instance, _args| {
            let instance = if needs_instance {
                Some(checked_instance(&owner, instance)?)
            } else {
                None
            };
            let out = getter(instance)?;
            Ok(conform_return(&declared_ret, out))
        }))
    }

    fn compile_set(
        &self,
        operation: &str,
        binding: &Binding,
        entry: &TypeEntry,
        declared_ret: TypeSig,
    ) -> Result<OperationImpl, BuildError> {
        let field = self.resolve_field(operation, binding, entry)?;
        let setter = field.setter().ok_or_else(|| {
            unresolved(
                operation,
                format!("field {} in {} is read-only", binding.member, binding.owner),
            )
        })?;
        let needs_instance = !field.is_static;
        let owner = binding.owner.clone();
        Ok(Arc::new(move |instance, args| {
            let instance = if needs_instance {
                Some(checked_instance(&owner, instance)?)
            } else {
                None
            };
            setter(instance, args.first().cloned().unwrap_or(Value::Null))?;
            // The prior field value is never read back.
            Ok(conform_return(&declared_ret, Value::Null))
        }))
    }

    fn resolve_field<'a>(
        &self,
        operation: &str,
        binding: &Binding,
        entry: &'a TypeEntry,
    ) -> Result<&'a casement_registry::FieldEntry, BuildError> {
        let sig = TypeSig::parse(&binding.signature)?;
        let field = entry
            .field(&binding.member)
            .filter(|f| f.visibility.is_public())
            .ok_or_else(|| {
                unresolved(
                    operation,
                    format!("no public field {} in {}", binding.member, binding.owner),
                )
            })?;
        if field.signature != sig {
            return Err(unresolved(
                operation,
                format!(
                    "field {} in {} has signature {}, binding declares {}",
                    binding.member, binding.owner, field.signature, binding.signature
                ),
            ));
        }
        if field.is_static != binding.is_static {
            return Err(unresolved(
                operation,
                format!(
                    "field {} in {} is {}static",
                    binding.member,
                    binding.owner,
                    if field.is_static { "" } else { "not " },
                ),
            ));
        }
        Ok(field)
    }

    /// Capture only the binding's strings; resolve on every call.
    fn compile_generic(&self, binding: &Binding, declared_ret: TypeSig) -> OperationImpl {
        let invoker = self.invoker.clone();
        let binding = binding.clone();
        Arc::new(move |instance, args| {
            let out = match binding.action {
                Action::CallMethod => invoker.invoke_method(
                    &binding.owner,
                    &binding.member,
                    &binding.signature,
                    instance,
                    args,
                )?,
                Action::CallConstructor => {
                    invoker.invoke_constructor(&binding.owner, &binding.signature, args)?
                }
                Action::GetField => {
                    invoker.read_field(&binding.owner, &binding.member, instance)?
                }
                Action::SetField => {
                    invoker.write_field(
                        &binding.owner,
                        &binding.member,
                        instance,
                        args.first().cloned().unwrap_or(Value::Null),
                    )?;
                    Value::Null
                }
            };
            Ok(conform_return(&declared_ret, out))
        })
    }
}

/// The uniform ABI: one nullable instance reference plus one ordered
/// argument array, any return type.
fn ensure_operation_shaped(
    interface: &str,
    op: &OperationSpec,
    declared: &MethodSig,
) -> Result<(), BuildError> {
    let shaped = declared.params.len() == 2
        && matches!(declared.params[0], TypeSig::Reference(_))
        && matches!(
            &declared.params[1],
            TypeSig::Array { element, depth: 1 } if matches!(element.as_ref(), TypeSig::Reference(_))
        );
    if shaped {
        Ok(())
    } else {
        Err(BuildError::NotOperationShaped {
            interface: interface.to_string(),
            operation: op.name.clone(),
        })
    }
}

fn unimplemented(operation: &str, handler: &str) -> OperationImpl {
    let operation = operation.to_string();
    let handler = handler.to_string();
    Arc::new(move |_instance, _args| {
        Err(InvokeError::Unimplemented {
            operation: operation.clone(),
            handler: handler.clone(),
        })
    })
}

fn checked_instance<'a>(
    owner: &str,
    instance: Option<&'a ObjRef>,
) -> Result<&'a ObjRef, InvokeError> {
    let obj = instance.ok_or(InvokeError::Invocation(MemberError::MissingReceiver))?;
    if obj.type_name() != owner {
        return Err(InvokeError::InstanceMismatch {
            expected: owner.to_string(),
            actual: obj.type_name().to_string(),
        });
    }
    Ok(obj)
}

fn unresolved(operation: &str, detail: String) -> BuildError {
    BuildError::UnresolvedBinding {
        operation: operation.to_string(),
        detail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::OperationSpec;
    use casement_registry::Visibility;

    const OP_SIG: &str = "(Llang.Object;[Llang.Object;)I";

    fn registry_with_probe() -> Arc<TypeRegistry> {
        let entry = TypeEntry::builder::<()>("demo.Probe")
            .static_method("ping", "()I", Visibility::Public, |_| Ok(Value::Int(1)))
            .unwrap()
            .method("echo", "(I)I", Visibility::Private, |_, args| {
                Ok(args[0].clone())
            })
            .unwrap()
            .build();
        let mut registry = TypeRegistry::new();
        registry.register(entry).unwrap();
        Arc::new(registry)
    }

    #[test]
    fn rejects_misshapen_operations() {
        let synthesizer = Synthesizer::new(registry_with_probe());

        for bad in [
            "()I",
            "(Llang.Object;)I",
            "(I[Llang.Object;)I",
            "(Llang.Object;[I)I",
            "(Llang.Object;[[Llang.Object;)I",
            "(Llang.Object;[Llang.Object;Llang.Object;)I",
        ] {
            let spec = InterfaceSpec::new("demo.View")
                .with_operation(OperationSpec::new("op", bad));
            assert!(
                matches!(
                    synthesizer.build(&spec, "v1"),
                    Err(BuildError::NotOperationShaped { .. })
                ),
                "signature {bad} should not be operation-shaped"
            );
        }
    }

    #[test]
    fn rejects_static_constructor() {
        let synthesizer = Synthesizer::new(registry_with_probe());
        let spec = InterfaceSpec::new("demo.View").with_operation(
            OperationSpec::new("make", OP_SIG)
                .with_binding(Binding::constructor("v1", "demo.Probe", "()V").static_member()),
        );
        assert!(matches!(
            synthesizer.build(&spec, "v1"),
            Err(BuildError::StaticConstructor { .. })
        ));
    }

    #[test]
    fn direct_binding_requires_registered_public_member() {
        let synthesizer = Synthesizer::new(registry_with_probe());

        let missing_type = InterfaceSpec::new("demo.View").with_operation(
            OperationSpec::new("op", OP_SIG)
                .with_binding(Binding::method("v1", "demo.Ghost", "ping", "()I").static_member()),
        );
        assert!(matches!(
            synthesizer.build(&missing_type, "v1"),
            Err(BuildError::UnresolvedBinding { .. })
        ));

        // Private members are invisible to direct dispatch.
        let private = InterfaceSpec::new("demo.View").with_operation(
            OperationSpec::new("op", OP_SIG)
                .with_binding(Binding::method("v1", "demo.Probe", "echo", "(I)I")),
        );
        assert!(matches!(
            synthesizer.build(&private, "v1"),
            Err(BuildError::UnresolvedBinding { .. })
        ));
    }

    #[test]
    fn static_flag_must_match_member() {
        let synthesizer = Synthesizer::new(registry_with_probe());
        let spec = InterfaceSpec::new("demo.View").with_operation(
            OperationSpec::new("op", OP_SIG)
                .with_binding(Binding::method("v1", "demo.Probe", "ping", "()I")),
        );
        assert!(matches!(
            synthesizer.build(&spec, "v1"),
            Err(BuildError::UnresolvedBinding { .. })
        ));
    }

    #[test]
    fn missing_binding_defers_failure_to_invocation() {
        let synthesizer = Synthesizer::new(registry_with_probe());
        let spec = InterfaceSpec::new("demo.View").with_operation(
            OperationSpec::new("op", OP_SIG)
                .with_binding(Binding::method("v1", "demo.Probe", "ping", "()I").static_member()),
        );

        // Handler v2 has no binding at all; the build still succeeds.
        let adapter = synthesizer.build(&spec, "v2").unwrap();
        assert_eq!(adapter.report().unimplemented_ops, 1);
        assert!(matches!(
            adapter.invoke("op", None, &[]),
            Err(InvokeError::Unimplemented { .. })
        ));
    }
}
