//! Registration and member error types.

/// Errors raised while registering a type entry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// A member signature failed to parse.
    #[error(transparent)]
    Signature(#[from] casement_core::SignatureError),

    /// A constructor signature must return void.
    #[error("constructor signature {signature} must return void")]
    ConstructorReturnsValue { signature: String },

    /// Two members of the same kind with the same name and parameters.
    #[error("duplicate member {member} in {type_name}")]
    DuplicateMember { type_name: String, member: String },

    /// A type name registered twice.
    #[error("type {name} is already registered")]
    DuplicateType { name: String },
}

/// Failure raised by a registered member thunk.
#[derive(Debug, thiserror::Error)]
pub enum MemberError {
    /// An instance member was invoked without a receiver.
    #[error("missing receiver for instance member")]
    MissingReceiver,

    /// The receiver's dynamic type is not the owning type.
    #[error("receiver is a {actual}, expected {expected}")]
    ReceiverMismatch { expected: String, actual: String },

    /// Failure raised by the target member itself.
    #[error("{0}")]
    Raised(Box<dyn std::error::Error + Send + Sync>),
}

impl MemberError {
    /// Wrap a failure raised by the target member.
    pub fn raised<E>(error: E) -> MemberError
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        MemberError::Raised(error.into())
    }
}

/// Result type alias for member thunks.
pub type Result<T> = std::result::Result<T, MemberError>;
