//! Privileged member access capability.

/// Capability token authorizing access to non-public members.
///
/// Visibility bypass is opt-in: an invoker only reaches private members
/// when constructed with this token, and every acquisition emits an audit
/// event.
#[derive(Debug, Clone)]
pub struct PrivilegedAccess {
    _private: (),
}

impl PrivilegedAccess {
    /// Acquire the capability.
    pub fn acquire() -> PrivilegedAccess {
        tracing::debug!(target: "casement::access", "privileged member access acquired");
        PrivilegedAccess { _private: () }
    }
}
