//! Connection-strategy selection for a blob binding.
//!
//! A binding names a setting, e.g. `AzureWebJobsStorage`; this module
//! probes a snapshot of the process environment for the shapes the host
//! recognizes, in precedence order, and reports which one (if any) applies.
//! Kept as a pure function over a `HashMap` snapshot rather than reading
//! `std::env` directly so it can be unit-tested without mutating real
//! process environment.

use std::collections::HashMap;

use crate::error::Error;

/// How a blob client should authenticate, once a binding name has been
/// resolved against the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStrategy {
    /// `<Name>` holds a literal connection string.
    ConnectionString(String),
    /// `<Name>__serviceUri` (or the `__blobServiceUri` alternative
    /// spelling) holds a managed-identity endpoint.
    ManagedIdentity {
        /// The resolved managed-identity endpoint.
        service_uri: String,
    },
    /// `<Name>__clientId` + `<Name>__credential` + `<Name>__serviceUri`
    /// together select a user-assigned managed identity.
    UserAssignedManagedIdentity {
        /// The user-assigned identity's client ID.
        client_id: String,
        /// The credential kind, e.g. `managedidentity`.
        credential: String,
        /// The resolved managed-identity endpoint.
        service_uri: String,
    },
}

/// Resolves a connection strategy for `binding_name` against `env`
/// (typically `std::env::vars().collect()` at the real call site).
///
/// Precedence: a direct connection string wins over either service-URI
/// spelling; `__serviceUri` and `__blobServiceUri` are equivalent; the
/// user-assigned triple is only selected when all three of its keys are
/// present.
pub fn resolve(binding_name: &str, env: &HashMap<String, String>) -> Result<ConnectionStrategy, Error> {
    if let Some(value) = env.get(binding_name) {
        return Ok(ConnectionStrategy::ConnectionString(value.clone()));
    }

    let client_id = env.get(&format!("{binding_name}__clientId"));
    let credential = env.get(&format!("{binding_name}__credential"));
    let service_uri = env
        .get(&format!("{binding_name}__serviceUri"))
        .or_else(|| env.get(&format!("{binding_name}__blobServiceUri")));

    if let (Some(client_id), Some(credential), Some(service_uri)) = (client_id, credential, service_uri) {
        return Ok(ConnectionStrategy::UserAssignedManagedIdentity {
            client_id: client_id.clone(),
            credential: credential.clone(),
            service_uri: service_uri.clone(),
        });
    }

    if let Some(service_uri) = service_uri {
        return Ok(ConnectionStrategy::ManagedIdentity {
            service_uri: service_uri.clone(),
        });
    }

    Err(Error::ConnectionNotConfigured(binding_name.to_string()))
}
