//! The settlement actions client itself: a process-wide gRPC client over a
//! shared [`tonic::transport::Channel`].

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use functions_extensions_base::args::TransportConfig;
use tokio::sync::OnceCell;
use tonic::transport::Channel;

use super::pb::{
    self, nullable_string, renew_message_lock_response, renew_session_lock_response,
    settlement_client::SettlementClient, NullableString,
};
use crate::amqp_value::PropertyValue;
use crate::error::Error;
use crate::message::ReceivedMessage;
use crate::property_encoder;

/// Process-wide handle a [`ReceivedMessage`] batch shares.
///
/// Cloning is cheap: [`tonic::transport::Channel`] is itself `Clone` and
/// multiplexes concurrent requests over one HTTP/2 connection, so every
/// settlement call below clones the generated client rather than holding a
/// lock across an `await` point.
#[derive(Debug, Clone)]
pub struct Actions {
    client: SettlementClient<Channel>,
}

static INSTANCE: OnceCell<Arc<Actions>> = OnceCell::const_new();

impl Actions {
    /// Dials the host's `Settlement` service per `config`.
    pub async fn connect(config: TransportConfig) -> Result<Self, Error> {
        let endpoint = format!("http://{}:{}", config.host, config.port);
        let channel = Channel::from_shared(endpoint)?.connect().await?;
        let client = SettlementClient::with_max_message_length(channel, config.max_message_length);
        Ok(Self { client })
    }

    /// Returns the process-wide instance, dialing the host on first use.
    ///
    /// Concurrent callers observe exactly one dial attempt: [`tokio::sync::OnceCell`] resolves every racing caller
    /// against the single in-flight future rather than starting one each.
    pub async fn get_or_init() -> Result<Arc<Actions>, Error> {
        INSTANCE
            .get_or_try_init(|| async {
                let config = TransportConfig::from_env_args().map_err(Error::Base)?;
                Actions::connect(config).await.map(Arc::new)
            })
            .await
            .cloned()
    }

    /// Synchronous entry point for [`crate::factory`], whose
    /// [`functions_extensions_base::registry::ResourceFactory`] trait is
    /// not `async`. Requires a multi-threaded Tokio runtime on the calling
    /// thread; see `DESIGN.md` for why this boundary exists.
    pub fn get_or_init_blocking() -> Result<Arc<Actions>, Error> {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(Self::get_or_init())
        })
    }

    fn require_lock_token(lock_token: &str) -> Result<(), Error> {
        if lock_token.is_empty() {
            return Err(Error::ArgumentError);
        }
        Ok(())
    }

    /// Completes `msg`.
    pub async fn complete(&self, msg: &ReceivedMessage) -> Result<(), Error> {
        Self::require_lock_token(&msg.lock_token)?;
        record_attempt("complete", &msg.lock_token);
        let mut client = self.client.clone();
        client
            .complete(pb::LockTokenRequest {
                locktoken: msg.lock_token.clone(),
            })
            .await?;
        Ok(())
    }

    /// Abandons `msg`, optionally re-encoding `properties` as the
    /// properties-to-modify map.
    pub async fn abandon(
        &self,
        msg: &ReceivedMessage,
        properties: Option<&HashMap<String, PropertyValue>>,
    ) -> Result<(), Error> {
        Self::require_lock_token(&msg.lock_token)?;
        let properties_to_modify = property_encoder::encode_for_operation(properties, "abandon")?;
        record_attempt("abandon", &msg.lock_token);
        let mut client = self.client.clone();
        client
            .abandon(pb::PropertiesRequest {
                locktoken: msg.lock_token.clone(),
                properties_to_modify,
            })
            .await?;
        Ok(())
    }

    /// Dead-letters `msg` with an optional reason/description.
    pub async fn deadletter(
        &self,
        msg: &ReceivedMessage,
        properties: Option<&HashMap<String, PropertyValue>>,
        reason: Option<String>,
        description: Option<String>,
    ) -> Result<(), Error> {
        Self::require_lock_token(&msg.lock_token)?;
        let properties_to_modify = property_encoder::encode_for_operation(properties, "deadletter")?;
        record_attempt("deadletter", &msg.lock_token);
        let mut client = self.client.clone();
        client
            .deadletter(pb::DeadletterRequest {
                locktoken: msg.lock_token.clone(),
                properties_to_modify,
                deadletter_reason: reason.map(wrap_nullable_string),
                deadletter_error_description: description.map(wrap_nullable_string),
            })
            .await?;
        Ok(())
    }

    /// Defers `msg`, optionally re-encoding `properties`.
    pub async fn defer(
        &self,
        msg: &ReceivedMessage,
        properties: Option<&HashMap<String, PropertyValue>>,
    ) -> Result<(), Error> {
        Self::require_lock_token(&msg.lock_token)?;
        let properties_to_modify = property_encoder::encode_for_operation(properties, "defer")?;
        record_attempt("defer", &msg.lock_token);
        let mut client = self.client.clone();
        client
            .defer(pb::PropertiesRequest {
                locktoken: msg.lock_token.clone(),
                properties_to_modify,
            })
            .await?;
        Ok(())
    }

    /// Renews the message-level lock on `msg`.
    ///
    /// Returns the renewed expiry when the host populates it, `None`
    /// otherwise. Unlike [`Actions::renew_session_lock`], an absent value
    /// here is not an error, no caller depends on it being present.
    pub async fn renew_message_lock(&self, msg: &ReceivedMessage) -> Result<Option<DateTime<Utc>>, Error> {
        Self::require_lock_token(&msg.lock_token)?;
        record_attempt("renew_message_lock", &msg.lock_token);
        let mut client = self.client.clone();
        let response = client
            .renew_message_lock(pb::LockTokenRequest {
                locktoken: msg.lock_token.clone(),
            })
            .await?
            .into_inner();

        Ok(response.locked_until.and_then(|locked_until| {
            let renew_message_lock_response::LockedUntil::LockedUntilUnixMillis(ms) = locked_until;
            Utc.timestamp_millis_opt(ms).single()
        }))
    }

    /// Sets the session-state blob for `session_id`.
    pub async fn set_session_state(&self, session_id: &str, state: Vec<u8>) -> Result<(), Error> {
        let mut client = self.client.clone();
        client
            .set_session_state(pb::SetSessionStateRequest {
                session_id: session_id.to_string(),
                session_state: state,
            })
            .await?;
        Ok(())
    }

    /// Releases the session lock for `session_id`.
    pub async fn release_session(&self, session_id: &str) -> Result<(), Error> {
        let mut client = self.client.clone();
        client
            .release_session(pb::SessionRequest {
                session_id: session_id.to_string(),
            })
            .await?;
        Ok(())
    }

    /// Renews the session lock for `session_id`, returning its new
    /// expiry instant. Fails with [`Error::EmptyResponse`] if the host's
    /// response carries no `locked_until`.
    pub async fn renew_session_lock(&self, session_id: &str) -> Result<DateTime<Utc>, Error> {
        let mut client = self.client.clone();
        let response = client
            .renew_session_lock(pb::SessionRequest {
                session_id: session_id.to_string(),
            })
            .await?
            .into_inner();

        match response.locked_until {
            Some(renew_session_lock_response::LockedUntil::LockedUntilUnixMillis(ms)) => {
                Utc.timestamp_millis_opt(ms).single().ok_or(Error::EmptyResponse)
            }
            None => Err(Error::EmptyResponse),
        }
    }
}

fn wrap_nullable_string(value: String) -> NullableString {
    NullableString {
        string: Some(nullable_string::String::Value(value)),
    }
}

fn record_attempt(op: &'static str, lock_token: &str) {
    #[cfg(feature = "tracing")]
    tracing::debug!(op, lock_token, "settlement RPC attempt");
    #[cfg(feature = "log")]
    log::debug!("settlement RPC attempt: {op} lock_token={lock_token}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageBody;
    use std::sync::Arc as StdArc;

    fn message_with_lock_token(lock_token: &str) -> ReceivedMessage {
        use fe2o3_amqp_types::messaging::{Body, Data, Message};

        let amqp = Message {
            header: None,
            delivery_annotations: None,
            message_annotations: None,
            properties: None,
            application_properties: None,
            body: Body::Data(Data(Vec::new().into())),
            footer: None,
        };

        ReceivedMessage {
            body: MessageBody::Bytes(Vec::new()),
            message_id: None,
            correlation_id: None,
            content_type: None,
            subject: None,
            to: None,
            reply_to: None,
            reply_to_session_id: None,
            session_id: None,
            time_to_live: None,
            application_properties: HashMap::new(),
            delivery_count: 0,
            lock_token: lock_token.to_string(),
            enqueued_time_utc: None,
            locked_until_utc: None,
            sequence_number: None,
            enqueued_sequence_number: None,
            dead_letter_reason: None,
            dead_letter_error_description: None,
            dead_letter_source: None,
            partition_key: None,
            via_partition_key: None,
            state: crate::message::MessageState::Active,
            raw_amqp_message: StdArc::new(amqp),
        }
    }

    fn unconnected_actions() -> Actions {
        // A channel bound to an endpoint is lazily connected by tonic, so
        // this never touches the network for the argument-check tests
        // below.
        let channel = Channel::from_static("http://127.0.0.1:1").connect_lazy();
        Actions {
            client: SettlementClient::new(channel),
        }
    }

    #[tokio::test]
    async fn complete_rejects_empty_lock_token_before_any_rpc() {
        let actions = unconnected_actions();
        let msg = message_with_lock_token("");
        let err = actions.complete(&msg).await.unwrap_err();
        assert!(matches!(err, Error::ArgumentError));
    }

    #[tokio::test]
    async fn abandon_rejects_empty_lock_token_before_encoding_properties() {
        let actions = unconnected_actions();
        let msg = message_with_lock_token("");
        let mut props = HashMap::new();
        props.insert("k".to_string(), PropertyValue::Int(1));
        let err = actions.abandon(&msg, Some(&props)).await.unwrap_err();
        assert!(matches!(err, Error::ArgumentError));
    }

    #[tokio::test]
    async fn defer_rejects_empty_lock_token() {
        let actions = unconnected_actions();
        let msg = message_with_lock_token("");
        let err = actions.defer(&msg, None).await.unwrap_err();
        assert!(matches!(err, Error::ArgumentError));
    }

    #[tokio::test]
    async fn deadletter_rejects_empty_lock_token() {
        let actions = unconnected_actions();
        let msg = message_with_lock_token("");
        let err = actions
            .deadletter(&msg, None, Some("reason".to_string()), None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ArgumentError));
    }

    #[tokio::test]
    async fn renew_message_lock_rejects_empty_lock_token() {
        let actions = unconnected_actions();
        let msg = message_with_lock_token("");
        let err = actions.renew_message_lock(&msg).await.unwrap_err();
        assert!(matches!(err, Error::ArgumentError));
    }

    #[test]
    fn wraps_nullable_string_as_value_variant() {
        let wrapped = wrap_nullable_string("MaxDeliveryCountExceeded".to_string());
        match wrapped.string {
            Some(nullable_string::String::Value(v)) => assert_eq!(v, "MaxDeliveryCountExceeded"),
            None => panic!("expected Some"),
        }
    }
}
