//! Generic lookup-and-invoke path for the casement framework.
//!
//! The [`Invoker`] resolves an owner type and member by name against the
//! registry on every call, matching method overloads structurally by the
//! parameter types decoded from the signature string. It is the slower,
//! higher-compatibility counterpart of compiled dispatch: nothing is
//! resolved or cached ahead of time, so it keeps working across structural
//! drift that would fail a compiled binding at build time.
//!
//! With a [`PrivilegedAccess`] capability the invoker also reaches
//! non-public members; without one they are invisible to it.

pub mod access;
pub mod error;
pub mod invoker;

// Re-export key types for convenience
pub use access::PrivilegedAccess;
pub use error::InvokeError;
pub use invoker::Invoker;
