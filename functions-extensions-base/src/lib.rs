#![deny(missing_docs, missing_debug_implementations)]

//! Shared plumbing for Azure Functions Rust worker extensions.
//!
//! This crate owns the process-wide [`registry::ResourceFactoryRegistry`]
//! that deferred bindings (Service Bus, Storage Blobs, Event Hubs, Cosmos
//! DB) register against, the [`binding::BindingData`] envelope the host
//! hands down at invocation time, and the [`args::TransportConfig`]
//! bootstrap read from the worker process's argument vector.

pub mod args;
pub mod binding;
pub mod error;
pub mod registry;
pub mod tags;

pub use binding::{BindingData, BindingInput};
pub use error::Error;
pub use registry::{global as global_registry, FactoryOutput, ResourceFactory, ResourceFactoryRegistry};
