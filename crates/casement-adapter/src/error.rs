//! Declaration and build error types.

/// Errors raised while declaring interfaces and bindings.
#[derive(Debug, thiserror::Error)]
pub enum DeclarationError {
    /// An operation or binding signature failed to parse.
    #[error("invalid signature for {context}: {source}")]
    Signature {
        context: String,
        source: casement_core::SignatureError,
    },

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// I/O error while loading a declaration file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An interface name declared twice.
    #[error("interface {interface} is already declared")]
    DuplicateInterface { interface: String },

    /// An operation name appearing twice within one interface.
    #[error("duplicate operation {operation} in interface {interface}")]
    DuplicateOperation {
        interface: String,
        operation: String,
    },

    /// Two bindings for the same operation and handler.
    #[error("duplicate binding for operation {operation} and handler {handler}")]
    DuplicateBinding {
        operation: String,
        handler: String,
    },

    /// A declaration file without an interface name.
    #[error("declaration is missing the interface name")]
    MissingInterfaceName,
}

/// Errors raised while building an adapter.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The interface was never declared.
    #[error("interface {interface} is not declared")]
    UnknownInterface { interface: String },

    /// An operation does not follow the uniform calling convention.
    #[error(
        "operation {operation} of {interface} does not follow the \
         (instance, arguments) calling convention"
    )]
    NotOperationShaped {
        interface: String,
        operation: String,
    },

    /// A constructor binding declared static.
    #[error("constructor binding for operation {operation} declared static for handler {handler}")]
    StaticConstructor {
        operation: String,
        handler: String,
    },

    /// A direct binding that cannot be compiled against the registry.
    #[error("cannot resolve direct binding for operation {operation}: {detail}")]
    UnresolvedBinding { operation: String, detail: String },

    /// A signature string failed to parse.
    #[error(transparent)]
    Signature(#[from] casement_core::SignatureError),
}
