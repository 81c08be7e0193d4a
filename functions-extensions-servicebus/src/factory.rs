//! Service-Bus factory registration: bootstraps the shared
//! resource-factory registry with a factory composing the binding decoder,
//! the received-message projector, and the settlement client singleton.

use std::sync::Arc;

use functions_extensions_base::registry::{FactoryOutput, ResourceFactoryRegistry};
use functions_extensions_base::tags::AZURE_SERVICE_BUS_RECEIVED_MESSAGE;
use functions_extensions_base::{BindingData, BindingInput};

use crate::decoder;
use crate::error::Error;
use crate::message::{self, ReceivedMessage};
use crate::settlement::Actions;

/// What a handler receives for an `AzureServiceBusReceivedMessage` binding.
#[derive(Debug)]
pub struct ServiceBusMessageContext {
    /// One entry per binding-data record the host handed down.
    pub messages: Vec<ReceivedMessage>,
    /// The process-wide settlement client, shared by every message in the
    /// batch.
    pub actions: Arc<Actions>,
}

/// Registers the Service Bus factory under
/// [`AZURE_SERVICE_BUS_RECEIVED_MESSAGE`] if nothing is registered there
/// yet.
///
/// Idempotent by design: a second call after a first successful
/// registration is a no-op, matching "if the registry does not already
/// carry the tag, install a factory" rather than re-asserting
/// [`functions_extensions_base::Error::AlreadyRegistered`] on every
/// subsequent module load.
pub fn register(registry: &ResourceFactoryRegistry) -> Result<(), Error> {
    if registry.has(AZURE_SERVICE_BUS_RECEIVED_MESSAGE) {
        return Ok(());
    }

    registry
        .register(AZURE_SERVICE_BUS_RECEIVED_MESSAGE, Arc::new(create_from_binding))
        .map_err(|e| Error::ServiceBusFactoryInitFailed(e.to_string()))
}

fn create_from_binding(
    input: BindingInput,
) -> Result<FactoryOutput, Box<dyn std::error::Error + Send + Sync>> {
    let records = match input {
        BindingInput::Single(data) => vec![data],
        BindingInput::Batch(data) => data,
    };

    let messages = records
        .into_iter()
        .map(project_one)
        .collect::<Result<Vec<_>, Error>>()?;

    let actions = Actions::get_or_init_blocking()?;
    let context = ServiceBusMessageContext { messages, actions };
    Ok(Box::new(context))
}

fn project_one(data: BindingData) -> Result<ReceivedMessage, Error> {
    let content = data.content.ok_or(Error::NullContent)?;
    let (amqp_message, lock_token) = decoder::decode(&content)?;
    let received = message::project(amqp_message, lock_token);

    #[cfg(feature = "tracing")]
    tracing::debug!(lock_token = %received.lock_token, "projected Service Bus message");

    Ok(received)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_is_idempotent() {
        let registry = ResourceFactoryRegistry::default();
        register(&registry).unwrap();
        assert!(registry.has(AZURE_SERVICE_BUS_RECEIVED_MESSAGE));
        // A second call must not attempt (and fail) a duplicate registration.
        register(&registry).unwrap();
    }

    #[test]
    fn null_content_is_rejected_before_decoding() {
        let err = create_from_binding(BindingInput::Single(BindingData::default())).unwrap_err();
        assert!(err.downcast_ref::<Error>().is_some());
    }

    /// E5: a batch binding input (a list of records) projects one message
    /// per record, all with distinct lock tokens.
    #[test]
    fn batch_binding_projects_one_message_per_record() {
        use fe2o3_amqp_types::messaging::message::__private::Serializable;
        use fe2o3_amqp_types::messaging::{
            annotations::OwnedKey, Body, Data, Message, MessageAnnotations,
        };
        use serde_amqp::primitives::{OrderedMap, Symbol};
        use serde_amqp::{to_vec, Value};

        fn payload(first_byte: u8) -> Vec<u8> {
            let mut buf = vec![first_byte; 16];
            let mut annotations = OrderedMap::default();
            annotations.insert(
                OwnedKey::Symbol(Symbol::from("x-opt-lock-token")),
                Value::Bool(true),
            );
            let amqp_message = Message::<Value> {
                header: None,
                delivery_annotations: None,
                message_annotations: Some(MessageAnnotations(annotations)),
                properties: None,
                application_properties: None,
                body: Body::Data(Data(Vec::new().into())),
                footer: None,
            };
            buf.extend_from_slice(&to_vec(&Serializable(amqp_message)).unwrap());
            buf
        }

        let records = vec![BindingData::new(payload(0x01)), BindingData::new(payload(0x02))];
        let messages = records
            .into_iter()
            .map(project_one)
            .collect::<Result<Vec<_>, Error>>()
            .unwrap();

        assert_eq!(messages.len(), 2);
        assert_ne!(messages[0].lock_token, messages[1].lock_token);
    }
}
