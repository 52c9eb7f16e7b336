//! Signature model and boxed value convention for the casement framework.
//!
//! Everything above this crate speaks one calling convention: a nullable
//! instance reference plus an ordered slice of [`Value`]s in, one [`Value`]
//! out. This crate defines that convention, the compact signature grammar
//! describing native member shapes, and the marshalling rules between the
//! two.
//!
//! ## Modules
//!
//! - [`signature`] — compact type/method signature parser
//! - [`value`] — boxed values and shared instance references
//! - [`marshal`] — boxed ↔ native conversion policy
//! - [`error`] — signature grammar errors

pub mod error;
pub mod marshal;
pub mod signature;
pub mod value;

// Re-export key types for convenience
pub use error::SignatureError;
pub use signature::{MethodSig, Scalar, TypeSig};
pub use value::{ObjRef, Value};
