//! Received-message projector and the normalized record it
//! produces.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use fe2o3_amqp_types::messaging::{Body, Message};
use fe2o3_amqp_types::primitives::SimpleValue;
use serde_amqp::Value;

use crate::amqp_codec::AnnotatedMessage;
use crate::amqp_value::PropertyValue;

/// Lifecycle state of a received message, from the handler's point of view.
/// The host, not this crate, drives transitions past `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageState {
    /// Not yet settled.
    #[default]
    Active,
    /// Settled with `defer`.
    Deferred,
    /// Delivered on a schedule, not yet due.
    Scheduled,
}

/// Normalized form of an AMQP-received Service Bus message, handed to
/// handler code.
#[derive(Debug, Clone)]
pub struct ReceivedMessage {
    /// Content-type-projected body.
    pub body: MessageBody,
    /// AMQP `properties.message_id`, rendered as a string regardless of its
    /// underlying AMQP message-ID type.
    pub message_id: Option<String>,
    /// AMQP `properties.correlation_id`, rendered the same way as
    /// [`ReceivedMessage::message_id`].
    pub correlation_id: Option<String>,
    /// AMQP `properties.content_type`, the value [`MessageBody`] projection
    /// was driven by.
    pub content_type: Option<String>,
    /// AMQP `properties.subject`.
    pub subject: Option<String>,
    /// AMQP `properties.to`.
    pub to: Option<String>,
    /// AMQP `properties.reply_to`.
    pub reply_to: Option<String>,
    /// AMQP `properties.reply_to_group_id`.
    pub reply_to_session_id: Option<String>,
    /// AMQP `properties.group_id`, the Service Bus session identifier.
    pub session_id: Option<String>,
    /// AMQP `header.time_to_live`, in milliseconds.
    pub time_to_live: Option<u64>,
    /// Copy of the AMQP application-properties map.
    pub application_properties: HashMap<String, PropertyValue>,
    /// AMQP `header.delivery_count`, or 0 if the header is absent.
    pub delivery_count: u32,
    /// Required for settlement; rendered by [`crate::lock_token`].
    pub lock_token: String,
    /// `x-opt-enqueued-time` message annotation.
    pub enqueued_time_utc: Option<DateTime<Utc>>,
    /// `x-opt-locked-until` message annotation.
    pub locked_until_utc: Option<DateTime<Utc>>,
    /// `x-opt-sequence-number` message annotation.
    pub sequence_number: Option<i64>,
    /// `x-opt-offset` message annotation, falling back to
    /// [`ReceivedMessage::sequence_number`] when absent.
    pub enqueued_sequence_number: Option<i64>,
    /// `DeadLetterReason` application property.
    pub dead_letter_reason: Option<String>,
    /// `DeadLetterErrorDescription` application property.
    pub dead_letter_error_description: Option<String>,
    /// `x-opt-deadletter-source` message annotation.
    pub dead_letter_source: Option<String>,
    /// Standard Service Bus partitioned-entity annotation.
    pub partition_key: Option<String>,
    /// See [`ReceivedMessage::partition_key`].
    pub via_partition_key: Option<String>,
    /// Lifecycle state from the handler's point of view.
    pub state: MessageState,
    /// Back-reference to the underlying AMQP form, for handlers that need
    /// to re-parse the raw body bytes themselves.
    pub raw_amqp_message: Arc<AnnotatedMessage>,
}

/// Content-type-aware body projection result.
#[derive(Debug, Clone)]
pub enum MessageBody {
    /// UTF-8-decoded text, used for `text/plain`, `application/xml`,
    /// unknown/missing content types, and as the JSON-parse-failure
    /// fallback.
    Text(String),
    /// Successfully parsed `application/json` body.
    Json(serde_json::Value),
    /// Non-binary-section body (`Sequence`/`Value`/`Empty`), passed through
    /// as-is.
    Raw(Value),
    /// Binary-section body that is not valid UTF-8.
    Bytes(Vec<u8>),
}

const ANNOTATION_ENQUEUED_TIME: &str = "x-opt-enqueued-time";
const ANNOTATION_LOCKED_UNTIL: &str = "x-opt-locked-until";
const ANNOTATION_SEQUENCE_NUMBER: &str = "x-opt-sequence-number";
const ANNOTATION_OFFSET: &str = "x-opt-offset";
const ANNOTATION_DEADLETTER_SOURCE: &str = "x-opt-deadletter-source";
const ANNOTATION_PARTITION_KEY: &str = "x-opt-partition-key";
const ANNOTATION_VIA_PARTITION_KEY: &str = "x-opt-via-partition-key";

const APP_PROP_DEAD_LETTER_REASON: &str = "DeadLetterReason";
const APP_PROP_DEAD_LETTER_ERROR_DESCRIPTION: &str = "DeadLetterErrorDescription";

/// Projects a decoded AMQP annotated message plus its already-extracted
/// lock token into a [`ReceivedMessage`].
pub fn project(message: AnnotatedMessage, lock_token: String) -> ReceivedMessage {
    let properties = message.properties.clone();
    let header = message.header.clone();

    let message_id = properties.as_ref().and_then(|p| p.message_id.as_ref()).map(message_id_to_string);
    let correlation_id = properties
        .as_ref()
        .and_then(|p| p.correlation_id.as_ref())
        .map(message_id_to_string);
    let content_type = properties
        .as_ref()
        .and_then(|p| p.content_type.as_ref())
        .map(|s| s.as_str().to_string());
    let subject = properties.as_ref().and_then(|p| p.subject.clone());
    let to = properties.as_ref().and_then(|p| p.to.clone());
    let reply_to = properties.as_ref().and_then(|p| p.reply_to.clone());
    let session_id = properties.as_ref().and_then(|p| p.group_id.clone());
    let reply_to_session_id = properties.as_ref().and_then(|p| p.reply_to_group_id.clone());

    let time_to_live = header.as_ref().and_then(|h| h.ttl).map(|ms| ms as u64);
    let delivery_count = header.as_ref().map(|h| h.delivery_count).unwrap_or(0);

    let application_properties = message
        .application_properties
        .as_ref()
        .map(|ap| {
            ap.0
                .iter()
                .map(|(k, v)| (k.clone(), simple_value_to_property_value(v)))
                .collect()
        })
        .unwrap_or_default();

    let dead_letter_reason = string_app_property(&application_properties, APP_PROP_DEAD_LETTER_REASON);
    let dead_letter_error_description =
        string_app_property(&application_properties, APP_PROP_DEAD_LETTER_ERROR_DESCRIPTION);

    let annotations = message.message_annotations.as_ref().map(|a| &a.0);

    let enqueued_time_utc = annotation_instant(annotations, ANNOTATION_ENQUEUED_TIME);
    let locked_until_utc = annotation_instant(annotations, ANNOTATION_LOCKED_UNTIL);
    let sequence_number = annotation_i64(annotations, ANNOTATION_SEQUENCE_NUMBER);
    let offset = annotation_i64(annotations, ANNOTATION_OFFSET);
    // Fallback rule: x-opt-offset wins when present, otherwise
    // enqueued_sequence_number adopts the sequence number.
    let enqueued_sequence_number = offset.or(sequence_number);
    let dead_letter_source = annotation_string(annotations, ANNOTATION_DEADLETTER_SOURCE);
    let partition_key = annotation_string(annotations, ANNOTATION_PARTITION_KEY);
    let via_partition_key = annotation_string(annotations, ANNOTATION_VIA_PARTITION_KEY);

    let body = project_body(&message.body, content_type.as_deref());

    ReceivedMessage {
        body,
        message_id,
        correlation_id,
        content_type,
        subject,
        to,
        reply_to,
        reply_to_session_id,
        session_id,
        time_to_live,
        application_properties,
        delivery_count,
        lock_token,
        enqueued_time_utc,
        locked_until_utc,
        sequence_number,
        enqueued_sequence_number,
        dead_letter_reason,
        dead_letter_error_description,
        dead_letter_source,
        partition_key,
        via_partition_key,
        state: MessageState::Active,
        raw_amqp_message: Arc::new(message),
    }
}

/// Binary-section (AMQP typecode 117) bodies are interpreted by content
/// type; anything else passes through raw.
fn project_body(body: &Body<Value>, content_type: Option<&str>) -> MessageBody {
    let Body::Data(data) = body else {
        return match body {
            Body::Sequence(seq) => MessageBody::Raw(Value::List(
                seq.0.clone().into_iter().collect(),
            )),
            Body::Value(value) => MessageBody::Raw(value.0.clone()),
            Body::Empty => MessageBody::Raw(Value::Null),
            Body::Data(_) => unreachable!(),
        };
    };

    let bytes = data.0.as_slice();
    let text = match std::str::from_utf8(bytes) {
        Ok(s) => s,
        Err(_) => return MessageBody::Bytes(bytes.to_vec()),
    };

    match content_type {
        Some("application/json") => match serde_json::from_str(text) {
            Ok(json) => MessageBody::Json(json),
            Err(_) => MessageBody::Text(text.to_string()),
        },
        _ => MessageBody::Text(text.to_string()),
    }
}

fn message_id_to_string(id: &fe2o3_amqp_types::messaging::MessageId) -> String {
    use fe2o3_amqp_types::messaging::MessageId;
    match id {
        MessageId::Ulong(v) => v.to_string(),
        MessageId::Uuid(uuid) => uuid::Uuid::from_bytes(uuid.clone().into_inner()).to_string(),
        MessageId::Binary(bytes) => hex_encode(bytes.as_slice()),
        MessageId::String(s) => s.clone(),
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn string_app_property(properties: &HashMap<String, PropertyValue>, key: &str) -> Option<String> {
    match properties.get(key) {
        Some(PropertyValue::String(s)) => Some(s.clone()),
        _ => None,
    }
}

fn annotation_value<'a>(
    annotations: Option<&'a fe2o3_amqp_types::messaging::Annotations>,
    key: &str,
) -> Option<&'a Value> {
    let annotations = annotations?;
    let owned_key = fe2o3_amqp_types::messaging::annotations::OwnedKey::Symbol(
        serde_amqp::primitives::Symbol::from(key),
    );
    annotations.get(&owned_key)
}

fn annotation_i64(annotations: Option<&fe2o3_amqp_types::messaging::Annotations>, key: &str) -> Option<i64> {
    match annotation_value(annotations, key)? {
        Value::Byte(v) => Some(*v as i64),
        Value::UByte(v) => Some(*v as i64),
        Value::Short(v) => Some(*v as i64),
        Value::UShort(v) => Some(*v as i64),
        Value::Int(v) => Some(*v as i64),
        Value::UInt(v) => Some(*v as i64),
        Value::Long(v) => Some(*v),
        Value::ULong(v) => Some(*v as i64),
        _ => None,
    }
}

fn annotation_string(annotations: Option<&fe2o3_amqp_types::messaging::Annotations>, key: &str) -> Option<String> {
    match annotation_value(annotations, key)? {
        Value::String(s) => Some(s.clone()),
        Value::Symbol(s) => Some(s.as_str().to_string()),
        _ => None,
    }
}

/// Accepts an instant, integer milliseconds, or ISO string.
fn annotation_instant(
    annotations: Option<&fe2o3_amqp_types::messaging::Annotations>,
    key: &str,
) -> Option<DateTime<Utc>> {
    match annotation_value(annotations, key)? {
        Value::Timestamp(ts) => Utc.timestamp_millis_opt(ts.milliseconds()).single(),
        Value::Long(ms) => Utc.timestamp_millis_opt(*ms).single(),
        Value::ULong(ms) => Utc.timestamp_millis_opt(*ms as i64).single(),
        Value::String(s) => DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.with_timezone(&Utc)),
        _ => None,
    }
}

/// Converts an AMQP application-property scalar to the closed
/// [`PropertyValue`] shape the record exposes. Lossy only for the decimal family, which is carried as raw
/// bytes rather than re-derived into a coefficient/scale pair.
fn simple_value_to_property_value(value: &SimpleValue) -> PropertyValue {
    match value {
        SimpleValue::Null => PropertyValue::Null,
        SimpleValue::Bool(b) => PropertyValue::Bool(*b),
        SimpleValue::UByte(v) => PropertyValue::Int(*v as i64),
        SimpleValue::UShort(v) => PropertyValue::Int(*v as i64),
        SimpleValue::UInt(v) => PropertyValue::Int(*v as i64),
        SimpleValue::ULong(v) => PropertyValue::UInt(*v),
        SimpleValue::Byte(v) => PropertyValue::Int(*v as i64),
        SimpleValue::Short(v) => PropertyValue::Int(*v as i64),
        SimpleValue::Int(v) => PropertyValue::Int(*v as i64),
        SimpleValue::Long(v) => PropertyValue::Int(*v),
        SimpleValue::Float(v) => PropertyValue::Float(v.into_inner() as f64),
        SimpleValue::Double(v) => PropertyValue::Float(v.into_inner()),
        SimpleValue::Decimal32(d) => PropertyValue::Bytes(d.clone().into_inner().to_vec()),
        SimpleValue::Decimal64(d) => PropertyValue::Bytes(d.clone().into_inner().to_vec()),
        SimpleValue::Decimal128(d) => PropertyValue::Bytes(d.clone().into_inner().to_vec()),
        SimpleValue::Char(c) => PropertyValue::String(c.to_string()),
        SimpleValue::Timestamp(ts) => Utc
            .timestamp_millis_opt(ts.milliseconds())
            .single()
            .map(PropertyValue::DateTime)
            .unwrap_or(PropertyValue::Int(ts.milliseconds())),
        SimpleValue::Uuid(uuid) => {
            PropertyValue::String(uuid::Uuid::from_bytes(uuid.clone().into_inner()).to_string())
        }
        SimpleValue::Binary(bytes) => PropertyValue::Bytes(bytes.to_vec()),
        SimpleValue::String(s) => PropertyValue::String(s.clone()),
        SimpleValue::Symbol(s) => PropertyValue::String(s.as_str().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fe2o3_amqp_types::messaging::{
        annotations::OwnedKey, ApplicationProperties, Data, Header, Message, MessageAnnotations,
        Properties,
    };
    use serde_amqp::primitives::{OrderedMap, Symbol, Timestamp};
    use std::collections::BTreeMap;

    fn base_message(body: Body<Value>) -> AnnotatedMessage {
        Message {
            header: None,
            delivery_annotations: None,
            message_annotations: None,
            properties: None,
            application_properties: None,
            body,
            footer: None,
        }
    }

    #[test]
    fn sequence_number_fallback_when_offset_absent() {
        let mut annotations = OrderedMap::default();
        annotations.insert(
            OwnedKey::Symbol(Symbol::from(ANNOTATION_SEQUENCE_NUMBER)),
            Value::Long(42),
        );
        let mut message = base_message(Body::Data(Data(vec![].into())));
        message.message_annotations = Some(MessageAnnotations(annotations));

        let projected = project(message, "token".to_string());
        assert_eq!(projected.sequence_number, Some(42));
        assert_eq!(projected.enqueued_sequence_number, Some(42));
    }

    #[test]
    fn offset_wins_when_both_present() {
        let mut annotations = OrderedMap::default();
        annotations.insert(
            OwnedKey::Symbol(Symbol::from(ANNOTATION_SEQUENCE_NUMBER)),
            Value::Long(42),
        );
        annotations.insert(OwnedKey::Symbol(Symbol::from(ANNOTATION_OFFSET)), Value::Long(99));
        let mut message = base_message(Body::Data(Data(vec![].into())));
        message.message_annotations = Some(MessageAnnotations(annotations));

        let projected = project(message, "token".to_string());
        assert_eq!(projected.enqueued_sequence_number, Some(99));
    }

    #[test]
    fn dead_letter_fields_read_from_application_properties() {
        let mut props = BTreeMap::new();
        props.insert(
            APP_PROP_DEAD_LETTER_REASON.to_string(),
            SimpleValue::String("MaxDeliveryCountExceeded".to_string()),
        );
        props.insert(
            APP_PROP_DEAD_LETTER_ERROR_DESCRIPTION.to_string(),
            SimpleValue::String("failed 5x".to_string()),
        );
        let mut message = base_message(Body::Data(Data(vec![].into())));
        message.application_properties = Some(ApplicationProperties(props));

        let projected = project(message, "token".to_string());
        assert_eq!(projected.dead_letter_reason.as_deref(), Some("MaxDeliveryCountExceeded"));
        assert_eq!(
            projected.dead_letter_error_description.as_deref(),
            Some("failed 5x")
        );
    }

    #[test]
    fn text_plain_body_projects_to_string() {
        let mut message = base_message(Body::Data(Data(b"hello".to_vec().into())));
        message.properties = Some(Properties {
            content_type: Some(Symbol::from("text/plain")),
            ..Properties::new()
        });
        let projected = project(message, "token".to_string());
        assert!(matches!(projected.body, MessageBody::Text(ref s) if s == "hello"));
    }

    #[test]
    fn valid_json_body_parses() {
        let mut message = base_message(Body::Data(Data(b"{\"n\":1}".to_vec().into())));
        message.properties = Some(Properties {
            content_type: Some(Symbol::from("application/json")),
            ..Properties::new()
        });
        let projected = project(message, "token".to_string());
        match projected.body {
            MessageBody::Json(v) => assert_eq!(v["n"], 1),
            other => panic!("expected Json, got {other:?}"),
        }
    }

    #[test]
    fn invalid_json_falls_back_to_text_without_panicking() {
        let mut message = base_message(Body::Data(Data(b"not json".to_vec().into())));
        message.properties = Some(Properties {
            content_type: Some(Symbol::from("application/json")),
            ..Properties::new()
        });
        let projected = project(message, "token".to_string());
        assert!(matches!(projected.body, MessageBody::Text(ref s) if s == "not json"));
    }

    #[test]
    fn missing_content_type_projects_to_text() {
        let message = base_message(Body::Data(Data(b"raw".to_vec().into())));
        let projected = project(message, "token".to_string());
        assert!(matches!(projected.body, MessageBody::Text(ref s) if s == "raw"));
    }

    #[test]
    fn delivery_count_defaults_to_zero() {
        let message = base_message(Body::Data(Data(vec![].into())));
        let projected = project(message, "token".to_string());
        assert_eq!(projected.delivery_count, 0);
    }

    #[test]
    fn delivery_count_taken_from_header_when_present() {
        let mut message = base_message(Body::Data(Data(vec![].into())));
        message.header = Some(Header {
            delivery_count: 3,
            ..Header::default()
        });
        let projected = project(message, "token".to_string());
        assert_eq!(projected.delivery_count, 3);
    }

    #[test]
    fn starts_in_active_state() {
        let message = base_message(Body::Data(Data(vec![].into())));
        let projected = project(message, "token".to_string());
        assert_eq!(projected.state, MessageState::Active);
    }

    #[test]
    fn partition_key_annotations_surface() {
        let mut annotations = OrderedMap::default();
        annotations.insert(
            OwnedKey::Symbol(Symbol::from(ANNOTATION_PARTITION_KEY)),
            Value::String("pk-1".to_string()),
        );
        let mut message = base_message(Body::Data(Data(vec![].into())));
        message.message_annotations = Some(MessageAnnotations(annotations));

        let projected = project(message, "token".to_string());
        assert_eq!(projected.partition_key.as_deref(), Some("pk-1"));
    }

    #[test]
    fn raw_amqp_message_reachable_for_precision_recovery() {
        let raw = b"{\"orderId\":\"abc\",\"amount\":9007199254740993}".to_vec();
        let message = base_message(Body::Data(Data(raw.clone().into())));
        let projected = project(message, "token".to_string());
        match &projected.raw_amqp_message.body {
            Body::Data(data) => assert_eq!(data.0.as_slice(), raw.as_slice()),
            other => panic!("unexpected body {other:?}"),
        }
    }
}
