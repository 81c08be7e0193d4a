//! Well-known resource-type tags deferred bindings register under.

/// Tag for the Azure Storage Blobs deferred binding.
pub const AZURE_STORAGE_BLOBS: &str = "AzureStorageBlobs";

/// Tag for the Azure Service Bus received-message deferred binding.
pub const AZURE_SERVICE_BUS_RECEIVED_MESSAGE: &str = "AzureServiceBusReceivedMessage";

/// Tag for the Azure Event Hubs event-data deferred binding.
pub const AZURE_EVENT_HUBS_EVENT_DATA: &str = "AzureEventHubsEventData";

/// Tag for the Cosmos DB deferred binding.
pub const COSMOS_DB: &str = "CosmosDB";
