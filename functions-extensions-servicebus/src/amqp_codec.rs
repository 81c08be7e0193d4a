//! Thin wrapper over the AMQP codec. All encode/decode work is
//! delegated to `serde_amqp`/`fe2o3-amqp-types`; this module only adapts
//! their API to the names the rest of this crate expects.

use fe2o3_amqp_types::messaging::message::__private::Deserializable;
use fe2o3_amqp_types::messaging::Message;
use serde_amqp::primitives::Dec128;
use serde_amqp::{from_slice, to_vec, Value};

use crate::error::Error;

/// The annotated message shape this crate works with throughout: a body
/// whose value section (if present) is a generic [`Value`]. `Message<T>`'s
/// body field is `Body<T>`, so this carries any of the three body section
/// shapes (data/sequence/value).
pub type AnnotatedMessage = Message<Value>;

/// Decodes `bytes` as an AMQP 1.0 annotated message.
///
/// `Message<T>` only implements `serde::Deserialize` through the crate's
/// `Deserializable<T>` wrapper, never directly.
///
/// The host's own framing is known to trigger benign warnings in the
/// underlying codec about message-section shape; those are expected here
/// and are not treated as errors. A real decode failure (malformed bytes)
/// still surfaces as [`Error::AmqpDecodeFailed`].
pub fn decode(bytes: &[u8]) -> Result<AnnotatedMessage, Error> {
    from_slice::<Deserializable<AnnotatedMessage>>(bytes)
        .map(|wrapped| wrapped.0)
        .map_err(Error::AmqpDecodeFailed)
}

/// Encodes a map of AMQP-typed values as AMQP map bytes, suitable for the
/// settlement client's `properties_to_modify` field.
pub fn encode_map(map: &serde_amqp::primitives::OrderedMap<String, Value>) -> Result<Vec<u8>, Error> {
    to_vec(map).map_err(Error::AmqpEncodeFailed)
}

/// Wraps a 64-bit signed integer as an AMQP `long`, never as a `double`.
pub fn wrap_long(value: i64) -> Value {
    Value::Long(value)
}

/// Wraps a 64-bit unsigned integer as an AMQP `ulong`.
pub fn wrap_ulong(value: u64) -> Value {
    Value::ULong(value)
}

/// Wraps 16 raw BID-encoded bytes as an AMQP `decimal128`.
pub fn wrap_decimal128(bytes: [u8; 16]) -> Value {
    Value::Decimal128(Dec128::from(bytes))
}

/// Wraps a byte buffer as AMQP `binary`.
pub fn wrap_binary(bytes: Vec<u8>) -> Value {
    Value::Binary(bytes.into())
}
