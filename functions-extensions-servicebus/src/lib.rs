#![deny(missing_docs, missing_debug_implementations)]

//! Service Bus message decode pipeline and settlement-actions gRPC client
//! for Azure Functions Rust worker extensions.
//!
//! Given the host's opaque model-binding payload for a Service Bus trigger,
//! [`decoder::decode`] recovers the 16-byte lock token and the AMQP 1.0
//! message bytes; [`message::project`] turns the decoded message into a
//! [`message::ReceivedMessage`] a handler can read directly. Settlement
//! (complete/abandon/deadletter/defer/lock-renew/session-manage) is issued
//! through [`settlement::Actions`], a process-wide gRPC client over the
//! host's `Settlement` service.

pub mod amqp_codec;
pub mod amqp_value;
pub mod decoder;
pub mod error;
pub mod factory;
pub mod lock_token;
pub mod message;
pub mod property_encoder;
pub mod settlement;

pub use amqp_value::{AmqpScalar, PropertyValue};
pub use error::Error;
pub use factory::ServiceBusMessageContext;
pub use message::{MessageBody, MessageState, ReceivedMessage};
pub use settlement::Actions;

/// Installs the Service Bus deferred-binding factory on the process-wide
/// registry. Safe to call more than once.
pub fn register() -> Result<(), Error> {
    factory::register(&functions_extensions_base::global_registry())
}
