//! Signature grammar error types.

/// Errors raised when a type or method signature fails to parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    /// The signature string is empty.
    #[error("empty signature")]
    Empty,

    /// A character that starts no known type form.
    #[error("unknown type code '{code}' at offset {at}")]
    UnknownCode { code: char, at: usize },

    /// The signature ends in the middle of a type form.
    #[error("signature truncated at offset {at}")]
    Truncated { at: usize },

    /// A reference form (`L...;`) without its terminator.
    #[error("unterminated reference name at offset {at}")]
    UnterminatedReference { at: usize },

    /// A reference form with nothing between marker and terminator.
    #[error("empty reference name at offset {at}")]
    EmptyReference { at: usize },

    /// A method signature that does not open with `(`.
    #[error("method signature must start with '('")]
    MissingParameterList,

    /// A parameter list without its closing `)`.
    #[error("unterminated parameter list")]
    UnterminatedParameterList,

    /// `V` used anywhere other than a method return type.
    #[error("void is only valid as a return type (offset {at})")]
    VoidOutsideReturn { at: usize },

    /// Input remaining after a complete signature.
    #[error("trailing input after signature: {rest:?}")]
    Trailing { rest: String },
}

/// Result type alias for signature parsing.
pub type Result<T> = std::result::Result<T, SignatureError>;
