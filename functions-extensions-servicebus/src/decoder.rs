//! Binding-payload decoder: splits the host's opaque
//! model-binding buffer into a lock token and an AMQP-encoded tail, then
//! hands the tail to the [`crate::amqp_codec`] adapter.

use crate::amqp_codec::{self, AnnotatedMessage};
use crate::error::Error;
use crate::lock_token::{self, LOCK_TOKEN_MARKER};

/// The byte offset at which the AMQP-encoded message begins, once the
/// sentinel's presence has been confirmed.
///
/// Resolved as offset `16`: the marker's byte index is a presence check
/// only, never an offset into the buffer.
const AMQP_SLICE_OFFSET: usize = 16;

/// Decodes a Service Bus binding payload's `content` buffer into an AMQP
/// annotated message and its lock-token string.
///
/// The host's wire layout is `[16 raw lock-token bytes][AMQP-encoded
/// message]`; the AMQP message itself carries an `x-opt-lock-token`
/// message-annotation key, which is what [`find_marker`] actually locates.
/// Its byte offset is therefore not meaningful as a slice boundary, only
/// its presence matters, as a sanity check that the payload is really a
/// Service Bus binding and not some other binding type's buffer.
pub fn decode(content: &[u8]) -> Result<(AnnotatedMessage, String), Error> {
    if content.is_empty() {
        return Err(Error::EmptyContent);
    }

    let marker_index = find_marker(content).ok_or(Error::LockTokenNotFound)?;
    let token = lock_token::extract(content, marker_index);

    let amqp_slice = &content[AMQP_SLICE_OFFSET.min(content.len())..];
    let message = amqp_codec::decode(amqp_slice)?;

    Ok((message, token))
}

fn find_marker(content: &[u8]) -> Option<usize> {
    content
        .windows(LOCK_TOKEN_MARKER.len())
        .position(|window| window == LOCK_TOKEN_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fe2o3_amqp_types::messaging::{
        annotations::OwnedKey, Body, Data, Message, MessageAnnotations,
    };
    use fe2o3_amqp_types::messaging::message::__private::Serializable;
    use serde_amqp::primitives::{OrderedMap, Symbol};
    use serde_amqp::{to_vec, Value};

    fn sample_payload() -> Vec<u8> {
        let mut buf = vec![
            0xBDu8, 0xB0, 0x8A, 0xEE, 0x3E, 0xA8, 0x06, 0x45, 0xBA, 0x30, 0x19, 0xCC, 0xB4, 0x0B,
            0x50, 0x73,
        ];

        let mut annotations = OrderedMap::default();
        annotations.insert(
            OwnedKey::Symbol(Symbol::from("x-opt-lock-token")),
            Value::Bool(true),
        );
        let message = Message::<Value> {
            header: None,
            delivery_annotations: None,
            message_annotations: Some(MessageAnnotations(annotations)),
            properties: None,
            application_properties: None,
            body: Body::Data(Data(Vec::new().into())),
            footer: None,
        };
        buf.extend_from_slice(&to_vec(&Serializable(message)).unwrap());
        buf
    }

    #[test]
    fn empty_content_fails() {
        let err = decode(&[]).unwrap_err();
        assert!(matches!(err, Error::EmptyContent));
    }

    #[test]
    fn missing_marker_fails() {
        let err = decode(&[0u8; 32]).unwrap_err();
        assert!(matches!(err, Error::LockTokenNotFound));
    }

    #[test]
    fn decodes_lock_token_and_amqp_tail() {
        let payload = sample_payload();
        let (_, token) = decode(&payload).unwrap();
        assert_eq!(token, "ee8ab0bd-a83e-4506-ba30-19ccb40b5073");
    }
}
