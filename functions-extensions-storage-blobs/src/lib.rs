#![deny(missing_docs, missing_debug_implementations)]

//! Blob-client factory cache for the Azure Storage Blobs deferred binding.
//! Secondary to this workspace's Service Bus core, included
//! so the resource-factory registry has a second consumer.

pub mod cache;
pub mod connection;
pub mod error;
pub mod factory;

pub use cache::{BlobClientCache, Disposable};
pub use connection::ConnectionStrategy;
pub use error::Error;
pub use factory::BlobClient;

/// Installs the blob-client factory on the process-wide registry. Safe to
/// call more than once.
pub fn register() -> Result<(), Error> {
    factory::register(&functions_extensions_base::global_registry())
}
