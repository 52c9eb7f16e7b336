//! Declarative operation-to-member bindings.

use serde::{Deserialize, Serialize};

/// Action performed by a bound operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    /// Call a method; arguments are forwarded, the result is returned.
    #[default]
    CallMethod,
    /// Call a constructor; the result is the new instance.
    CallConstructor,
    /// Read a field; arguments are ignored.
    GetField,
    /// Write a field to the first argument; the result is always empty.
    SetField,
}

/// Dispatch strategy for a binding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DispatchMode {
    /// Member resolved at build time; near-native call cost.
    #[default]
    Direct,
    /// Member resolved on every call through the generic invoker; slower,
    /// reaches non-public members, tolerant of structural drift.
    Generic,
}

/// Mapping from an abstract operation to a concrete native member for one
/// handler. Declared externally, consumed read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binding {
    /// Handler identifier this binding serves, usually a version id.
    pub handler: String,
    /// Qualified name of the type owning the member.
    pub owner: String,
    /// Member name. Conventionally `<init>` for constructors.
    #[serde(default)]
    pub member: String,
    /// Member signature: method form for calls, type form for fields.
    pub signature: String,
    /// What the operation does with the member.
    #[serde(default)]
    pub action: Action,
    /// Whether the member is static; static members expect no instance.
    #[serde(default, rename = "static")]
    pub is_static: bool,
    /// How the forwarding is dispatched.
    #[serde(default)]
    pub dispatch: DispatchMode,
}

impl Binding {
    /// A direct method-call binding; the common case.
    pub fn method(handler: &str, owner: &str, member: &str, signature: &str) -> Binding {
        Binding {
            handler: handler.to_string(),
            owner: owner.to_string(),
            member: member.to_string(),
            signature: signature.to_string(),
            action: Action::CallMethod,
            is_static: false,
            dispatch: DispatchMode::Direct,
        }
    }

    /// A direct constructor binding.
    pub fn constructor(handler: &str, owner: &str, signature: &str) -> Binding {
        Binding {
            member: "<init>".to_string(),
            action: Action::CallConstructor,
            ..Binding::method(handler, owner, "<init>", signature)
        }
    }

    /// A direct field-read binding.
    pub fn get_field(handler: &str, owner: &str, member: &str, signature: &str) -> Binding {
        Binding {
            action: Action::GetField,
            ..Binding::method(handler, owner, member, signature)
        }
    }

    /// A direct field-write binding.
    pub fn set_field(handler: &str, owner: &str, member: &str, signature: &str) -> Binding {
        Binding {
            action: Action::SetField,
            ..Binding::method(handler, owner, member, signature)
        }
    }

    /// Mark the member static.
    pub fn static_member(mut self) -> Binding {
        self.is_static = true;
        self
    }

    /// Dispatch through the generic invoker instead of compiling.
    pub fn generic(mut self) -> Binding {
        self.dispatch = DispatchMode::Generic;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_shorthands() {
        let b = Binding::method("v1", "demo.Counter", "increment", "(I)I");
        assert_eq!(b.action, Action::CallMethod);
        assert_eq!(b.dispatch, DispatchMode::Direct);
        assert!(!b.is_static);

        let c = Binding::constructor("v1", "demo.Counter", "(I)V");
        assert_eq!(c.action, Action::CallConstructor);
        assert_eq!(c.member, "<init>");

        let s = Binding::get_field("v1", "demo.Counter", "total", "I").static_member();
        assert!(s.is_static);

        let g = Binding::method("v1", "demo.Counter", "increment", "(I)I").generic();
        assert_eq!(g.dispatch, DispatchMode::Generic);
    }

    #[test]
    fn kebab_case_serialization() {
        let b = Binding::set_field("v2", "demo.Counter", "count", "I").generic();
        let toml = toml::to_string(&b).unwrap();
        assert!(toml.contains("action = \"set-field\""));
        assert!(toml.contains("dispatch = \"generic\""));

        let back: Binding = toml::from_str(&toml).unwrap();
        assert_eq!(back, b);
    }

    #[test]
    fn defaults_fill_in() {
        let b: Binding = toml::from_str(
            r#"
handler = "v1"
owner = "demo.Counter"
member = "increment"
signature = "(I)I"
"#,
        )
        .unwrap();
        assert_eq!(b.action, Action::CallMethod);
        assert_eq!(b.dispatch, DispatchMode::Direct);
        assert!(!b.is_static);
    }
}
