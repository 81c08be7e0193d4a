//! Error kinds for the blob-client factory cache.

/// Errors surfaced by [`crate::connection`] and [`crate::factory`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// None of the recognized environment-variable shapes were present
    /// for the given binding name.
    #[error("no connection configuration found for '{0}'")]
    ConnectionNotConfigured(String),

    /// The binding payload's `content` was missing.
    #[error("blob binding data is missing required fields")]
    InvalidBindingData,

    /// Base-crate error (registry), surfaced as-is.
    #[error(transparent)]
    Base(#[from] functions_extensions_base::Error),
}
