//! Abstract interface descriptions.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use casement_core::{MethodSig, SignatureError, TypeSig};

use crate::binding::{Action, Binding};
use crate::error::DeclarationError;

/// One abstract operation with its candidate bindings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationSpec {
    /// Operation name, unique within the interface.
    pub name: String,
    /// Declared descriptor of the operation. Must follow the uniform
    /// calling convention: one instance reference plus one argument array.
    pub signature: String,
    /// Candidate bindings, at most one per handler.
    #[serde(default)]
    pub bindings: Vec<Binding>,
}

impl OperationSpec {
    pub fn new(name: &str, signature: &str) -> OperationSpec {
        OperationSpec {
            name: name.to_string(),
            signature: signature.to_string(),
            bindings: Vec::new(),
        }
    }

    /// Attach a binding.
    pub fn with_binding(mut self, binding: Binding) -> OperationSpec {
        self.bindings.push(binding);
        self
    }

    /// Resolve the binding for a handler. Exact match only; no fallback,
    /// inheritance, or wildcards between handler ids.
    pub fn binding_for(&self, handler: &str) -> Option<&Binding> {
        self.bindings.iter().find(|b| b.handler == handler)
    }
}

/// A complete interface description: the stable surface callers depend on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceSpec {
    /// Interface name; the cache keys on it.
    pub name: String,
    /// Operations in declaration order.
    #[serde(default)]
    pub operations: Vec<OperationSpec>,
}

impl InterfaceSpec {
    pub fn new(name: &str) -> InterfaceSpec {
        InterfaceSpec {
            name: name.to_string(),
            operations: Vec::new(),
        }
    }

    /// Attach an operation.
    pub fn with_operation(mut self, operation: OperationSpec) -> InterfaceSpec {
        self.operations.push(operation);
        self
    }

    /// Find an operation by name.
    pub fn operation(&self, name: &str) -> Option<&OperationSpec> {
        self.operations.iter().find(|op| op.name == name)
    }

    /// Validate the declaration: every signature parses, operation names
    /// are unique, and no operation carries two bindings for one handler.
    ///
    /// Malformed signatures surface here, at binding definition, before
    /// any adapter is requested.
    pub fn validate(&self) -> Result<(), DeclarationError> {
        let mut op_names = HashSet::new();
        for op in &self.operations {
            if !op_names.insert(op.name.as_str()) {
                return Err(DeclarationError::DuplicateOperation {
                    interface: self.name.clone(),
                    operation: op.name.clone(),
                });
            }

            parse_in_context(&op.signature, || {
                format!("operation {} of {}", op.name, self.name)
            })?;

            let mut handlers = HashSet::new();
            for binding in &op.bindings {
                if !handlers.insert(binding.handler.as_str()) {
                    return Err(DeclarationError::DuplicateBinding {
                        operation: op.name.clone(),
                        handler: binding.handler.clone(),
                    });
                }
                validate_binding_signature(binding, || {
                    format!(
                        "binding of operation {} for handler {}",
                        op.name, binding.handler
                    )
                })?;
            }
        }
        Ok(())
    }
}

/// Field bindings use the type form, everything else the method form.
fn validate_binding_signature(
    binding: &Binding,
    context: impl Fn() -> String,
) -> Result<(), DeclarationError> {
    let outcome = match binding.action {
        Action::CallMethod | Action::CallConstructor => {
            MethodSig::parse(&binding.signature).map(|_| ())
        }
        Action::GetField | Action::SetField => TypeSig::parse(&binding.signature).map(|_| ()),
    };
    outcome.map_err(|source| DeclarationError::Signature {
        context: context(),
        source,
    })
}

fn parse_in_context(
    signature: &str,
    context: impl Fn() -> String,
) -> Result<MethodSig, DeclarationError> {
    MethodSig::parse(signature).map_err(|source: SignatureError| DeclarationError::Signature {
        context: context(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const OP_SIG: &str = "(Llang.Object;[Llang.Object;)I";

    #[test]
    fn binding_resolution_is_exact() {
        let op = OperationSpec::new("increment", OP_SIG)
            .with_binding(Binding::method("v1", "demo.Counter", "increment", "(I)I"))
            .with_binding(Binding::method("v2", "demo.Counter", "add", "(I)I"));

        assert_eq!(op.binding_for("v1").unwrap().member, "increment");
        assert_eq!(op.binding_for("v2").unwrap().member, "add");
        assert!(op.binding_for("v3").is_none());
        assert!(op.binding_for("v").is_none());
    }

    #[test]
    fn validate_accepts_well_formed() {
        let spec = InterfaceSpec::new("demo.CounterView").with_operation(
            OperationSpec::new("increment", OP_SIG)
                .with_binding(Binding::method("v1", "demo.Counter", "increment", "(I)I")),
        );
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn validate_rejects_duplicate_handler() {
        let spec = InterfaceSpec::new("demo.CounterView").with_operation(
            OperationSpec::new("increment", OP_SIG)
                .with_binding(Binding::method("v1", "demo.Counter", "increment", "(I)I"))
                .with_binding(Binding::method("v1", "demo.Counter", "add", "(I)I")),
        );
        assert!(matches!(
            spec.validate(),
            Err(DeclarationError::DuplicateBinding { .. })
        ));
    }

    #[test]
    fn validate_rejects_duplicate_operation() {
        let spec = InterfaceSpec::new("demo.CounterView")
            .with_operation(OperationSpec::new("increment", OP_SIG))
            .with_operation(OperationSpec::new("increment", OP_SIG));
        assert!(matches!(
            spec.validate(),
            Err(DeclarationError::DuplicateOperation { .. })
        ));
    }

    #[test]
    fn validate_rejects_malformed_signatures() {
        let bad_op = InterfaceSpec::new("demo.CounterView")
            .with_operation(OperationSpec::new("increment", "(Q)I"));
        assert!(matches!(
            bad_op.validate(),
            Err(DeclarationError::Signature { .. })
        ));

        let bad_binding = InterfaceSpec::new("demo.CounterView").with_operation(
            OperationSpec::new("increment", OP_SIG)
                .with_binding(Binding::method("v1", "demo.Counter", "increment", "(I")),
        );
        assert!(matches!(
            bad_binding.validate(),
            Err(DeclarationError::Signature { .. })
        ));
    }

    #[test]
    fn field_bindings_use_type_signatures() {
        let spec = InterfaceSpec::new("demo.CounterView").with_operation(
            OperationSpec::new("count", OP_SIG)
                .with_binding(Binding::get_field("v1", "demo.Counter", "count", "I")),
        );
        assert!(spec.validate().is_ok());

        let bad = InterfaceSpec::new("demo.CounterView").with_operation(
            OperationSpec::new("count", OP_SIG)
                .with_binding(Binding::get_field("v1", "demo.Counter", "count", "(I)I")),
        );
        assert!(matches!(
            bad.validate(),
            Err(DeclarationError::Signature { .. })
        ));
    }
}
