//! Error types shared by the resource-factory registry and the transport
//! bootstrap.

/// Errors surfaced by [`crate::registry`] and [`crate::args`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A factory was already registered under this tag.
    #[error("resource type '{0}' is already registered")]
    AlreadyRegistered(String),

    /// `create` was called for a tag with no registered factory.
    #[error("resource type '{0}' is not registered")]
    NotRegistered(String),

    /// One or more required process arguments were missing.
    #[error("Missing required arguments: {0}")]
    MissingArguments(String),

    /// A process argument was present but could not be parsed as expected.
    #[error("invalid value for argument '{name}': {reason}")]
    InvalidArgument {
        /// Name of the offending flag, without the leading `--`.
        name: &'static str,
        /// Human-readable reason the value was rejected.
        reason: String,
    },
}
