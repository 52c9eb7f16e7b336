//! Adapter synthesis for version-dependent APIs.
//!
//! Calling code depends on a stable interface description; this crate
//! builds, once per (interface, handler) pair, a forwarding adapter whose
//! operations each forward to a concrete member of a registered target
//! type. Bindings select the member per handler; dispatch is either
//! compiled at build time (direct) or resolved per call through the
//! generic invoker.
//!
//! [`Casement`] is the entry point: declare interfaces, then
//! [`Casement::acquire`] adapters. Acquisition is idempotent — the cache
//! returns the identical adapter for repeated requests and guarantees at
//! most one synthesis per key under concurrent callers.
//!
//! ## Modules
//!
//! - [`binding`] — operation-to-member binding model
//! - [`interface`] — abstract interface descriptions
//! - [`declaration`] — TOML binding declaration files
//! - [`synthesizer`] — per-operation dispatch-table compilation
//! - [`adapter`] — the synthesized forwarding object
//! - [`cache`] — synthesize-once cache and the [`Casement`] entry point
//! - [`report`] — per-build synthesis report
//! - [`error`] — declaration and build failures

pub mod adapter;
pub mod binding;
pub mod cache;
pub mod declaration;
pub mod error;
pub mod interface;
pub mod report;
pub mod synthesizer;

// Re-export key types for convenience
pub use adapter::{Adapter, OperationImpl};
pub use binding::{Action, Binding, DispatchMode};
pub use cache::{AdapterKey, Casement};
pub use declaration::BindingDeclaration;
pub use error::{BuildError, DeclarationError};
pub use interface::{InterfaceSpec, OperationSpec};
pub use report::BuildReport;
pub use synthesizer::Synthesizer;
