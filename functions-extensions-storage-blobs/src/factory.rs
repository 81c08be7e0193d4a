//! Blob-client factory registration: composes the
//! connection-strategy probe and the LRU cache behind the shared
//! resource-factory registry, under the `AzureStorageBlobs` tag.
//!
//! Deliberately minimal: no `azure_storage_blobs` dependency is pulled in,
//! so [`BlobClient`] only carries the resolved connection strategy and
//! container/blob names a real client constructor would need, rather than
//! an actual Azure SDK handle.

use std::sync::{Arc, OnceLock};

use functions_extensions_base::registry::{FactoryOutput, ResourceFactoryRegistry};
use functions_extensions_base::tags::AZURE_STORAGE_BLOBS;
use functions_extensions_base::{BindingData, BindingInput};

use crate::cache::{BlobClientCache, Disposable};
use crate::connection::{self, ConnectionStrategy};
use crate::error::Error;

/// A resolved, cacheable blob client handle.
///
/// `source` on the binding data carries `"<container>/<blob>"`; `version`
/// carries the app-setting name to resolve a connection strategy for
/// (e.g. `AzureWebJobsStorage`).
#[derive(Debug, Clone)]
pub struct BlobClient {
    /// How this client authenticates against the storage account.
    pub connection: ConnectionStrategy,
    /// Blob container name.
    pub container: String,
    /// Blob name within [`BlobClient::container`].
    pub blob: String,
}

impl Disposable for BlobClient {
    fn dispose(&self) {
        #[cfg(feature = "tracing")]
        tracing::debug!(container = %self.container, blob = %self.blob, "disposed evicted blob client");
        #[cfg(feature = "log")]
        log::debug!("disposed evicted blob client for {}/{}", self.container, self.blob);
    }
}

static CACHE: OnceLock<BlobClientCache<BlobClient>> = OnceLock::new();

fn cache() -> &'static BlobClientCache<BlobClient> {
    CACHE.get_or_init(BlobClientCache::new)
}

/// Registers the blob-client factory under [`AZURE_STORAGE_BLOBS`] if
/// nothing is registered there yet.
pub fn register(registry: &ResourceFactoryRegistry) -> Result<(), Error> {
    if registry.has(AZURE_STORAGE_BLOBS) {
        return Ok(());
    }
    registry
        .register(AZURE_STORAGE_BLOBS, Arc::new(create_from_binding))
        .map_err(Error::from)
}

fn create_from_binding(
    input: BindingInput,
) -> Result<FactoryOutput, Box<dyn std::error::Error + Send + Sync>> {
    // Blob bindings are not batched; a
    // `Batch` input here means the host mis-dispatched a record meant for a
    // different binding type.
    let data = match input {
        BindingInput::Single(data) => data,
        BindingInput::Batch(_) => return Err(Error::InvalidBindingData.into()),
    };
    let setting_name = data.version.ok_or(Error::InvalidBindingData)?;
    let (container, blob) = data
        .source
        .as_deref()
        .and_then(|s| s.split_once('/'))
        .ok_or(Error::InvalidBindingData)?;

    let env: std::collections::HashMap<String, String> = std::env::vars().collect();
    let strategy = connection::resolve(&setting_name, &env)?;

    let connection_key = match &strategy {
        ConnectionStrategy::ConnectionString(s) => s.clone(),
        ConnectionStrategy::ManagedIdentity { service_uri } => service_uri.clone(),
        ConnectionStrategy::UserAssignedManagedIdentity { service_uri, .. } => service_uri.clone(),
    };
    let key = crate::cache::cache_key(&connection_key, container, blob);

    if let Some(client) = cache().get(&key) {
        return Ok(Box::new(client));
    }

    let client = BlobClient {
        connection: strategy,
        container: container.to_string(),
        blob: blob.to_string(),
    };
    cache().put(key, client.clone());
    Ok(Box::new(client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_is_idempotent() {
        let registry = ResourceFactoryRegistry::default();
        register(&registry).unwrap();
        assert!(registry.has(AZURE_STORAGE_BLOBS));
        register(&registry).unwrap();
    }

    #[test]
    fn missing_source_is_rejected() {
        let data = BindingData {
            content: None,
            content_type: None,
            source: None,
            version: Some("AzureWebJobsStorage".to_string()),
        };
        let err = create_from_binding(BindingInput::Single(data)).unwrap_err();
        assert!(err.downcast_ref::<Error>().is_some());
    }

    #[test]
    fn batch_input_is_rejected() {
        let err = create_from_binding(BindingInput::Batch(Vec::new())).unwrap_err();
        assert!(err.downcast_ref::<Error>().is_some());
    }
}
