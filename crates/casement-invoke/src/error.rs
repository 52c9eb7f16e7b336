//! Call-time error types shared by adapters and the generic invoker.

use casement_registry::MemberError;

/// Errors surfaced when an adapter operation or invoker call runs.
///
/// [`InvokeError::Unimplemented`] is a routine "capability absent for this
/// handler" outcome; every other kind is exceptional and not recoverable
/// by this subsystem.
#[derive(Debug, thiserror::Error)]
pub enum InvokeError {
    /// No binding exists for the requested handler.
    #[error("operation {operation} is not implemented for handler {handler}")]
    Unimplemented { operation: String, handler: String },

    /// The operation name is not part of the interface.
    #[error("unknown operation {operation}")]
    UnknownOperation { operation: String },

    /// The owner type is not registered.
    #[error("type {owner} is not registered")]
    TypeNotFound { owner: String },

    /// No visible member with the given name exists in the owner type.
    #[error("member {member} not found in {owner}")]
    MemberNotFound { owner: String, member: String },

    /// A member with the name exists, but no overload matches the decoded
    /// parameter types.
    #[error("no overload of {member} in {owner} matches {signature}")]
    TypeMismatch {
        owner: String,
        member: String,
        signature: String,
    },

    /// The instance reference does not match the binding's owner type.
    #[error("instance of type {actual} does not match owner {expected}")]
    InstanceMismatch { expected: String, actual: String },

    /// A signature string failed to parse.
    #[error(transparent)]
    Signature(#[from] casement_core::SignatureError),

    /// The target member itself failed; the underlying error is wrapped
    /// verbatim.
    #[error(transparent)]
    Invocation(#[from] MemberError),
}

/// Result type alias for call-time operations.
pub type Result<T> = std::result::Result<T, InvokeError>;
