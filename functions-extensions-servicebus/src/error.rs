//! Error kinds for the decode pipeline and the settlement client.

/// Errors surfaced by this crate. Every fallible operation in the decode
/// pipeline or the settlement client returns one of these; nothing is
/// swallowed.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The binding payload's `content` was empty.
    #[error("binding payload content is empty")]
    EmptyContent,

    /// The binding payload's `content` was missing entirely.
    #[error("binding payload content is null")]
    NullContent,

    /// The `x-opt-lock-token` marker was not found in the payload.
    #[error("lock token marker not found in binding payload")]
    LockTokenNotFound,

    /// The AMQP codec failed to decode the message bytes.
    #[error("failed to decode AMQP message: {0}")]
    AmqpDecodeFailed(#[source] serde_amqp::Error),

    /// The AMQP codec failed to encode a properties-to-modify map.
    #[error("failed to encode AMQP map: {0}")]
    AmqpEncodeFailed(#[source] serde_amqp::Error),

    /// A settlement call was made without a lock token.
    #[error("lock token is required for this operation")]
    ArgumentError,

    /// A property value's AMQP type could not be determined.
    #[error("unsupported property type for key '{key}': {type_name}")]
    UnsupportedType {
        /// Offending application-property key.
        key: String,
        /// Name of the Rust type/variant that could not be classified.
        type_name: &'static str,
    },

    /// [`crate::property_encoder::encode_for_operation`] wraps an
    /// underlying encode failure with the operation name.
    #[error("Failed to encode properties for {op} operation: {source}")]
    EncodeFailed {
        /// Settlement operation name (`"abandon"`, `"deadletter"`, ...).
        op: &'static str,
        /// Underlying cause.
        #[source]
        source: Box<Error>,
    },

    /// `renew_session_lock` succeeded but the response carried no
    /// `locked_until` value.
    #[error("renew_session_lock response did not contain a locked_until value")]
    EmptyResponse,

    /// A resource factory tag was registered twice.
    #[error("resource type '{0}' is already registered")]
    AlreadyRegistered(String),

    /// `ServiceBusFactoryInitFailed`: the bootstrap factory failed.
    #[error("Service Bus factory initialization failed: {0}")]
    ServiceBusFactoryInitFailed(String),

    /// Transport-level error, passed through verbatim.
    #[error(transparent)]
    Transport(#[from] tonic::Status),

    /// Failure constructing the underlying gRPC channel.
    #[error(transparent)]
    Connect(#[from] tonic::transport::Error),

    /// Base-crate error (registry / argument parsing), surfaced as-is.
    #[error(transparent)]
    Base(#[from] functions_extensions_base::Error),
}
