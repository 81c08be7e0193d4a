//! Process-wide resource-factory registry.
//!
//! A deferred binding (Service Bus, Storage Blobs, ...) registers a factory
//! once at load time under a stable tag; the host's model-binding machinery
//! later calls [`ResourceFactoryRegistry::create`] to turn a [`BindingData`]
//! into the SDK-shaped object a handler receives.
//!
//! The source this crate is modeled on binds its registry to a well-known
//! global symbol so that two copies of the JS module (bundled + installed)
//! still observe one instance. Rust has no equivalent module-duplication
//! hazard: a `static` in a linked binary is unique for the life of the
//! process, so [`global`] is the direct equivalent, one `OnceLock` shared
//! by every caller in the process regardless of how many crates depend on
//! this one.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

use crate::binding::BindingInput;
use crate::error::Error;

/// A boxed, type-erased result a factory hands back to the host.
///
/// Concrete binding crates downcast this with [`std::any::Any`]; the
/// registry itself never needs to know the shape.
pub type FactoryOutput = Box<dyn Any + Send + Sync>;

/// A resource factory: given the raw binding data (single record or batch),
/// produce the strongly typed object (or list of messages + actions, in the
/// Service Bus case) the handler will receive.
pub trait ResourceFactory: Send + Sync {
    /// Builds the bound resource from raw binding data.
    fn create(&self, data: BindingInput) -> Result<FactoryOutput, Box<dyn std::error::Error + Send + Sync>>;
}

impl<F> ResourceFactory for F
where
    F: Fn(BindingInput) -> Result<FactoryOutput, Box<dyn std::error::Error + Send + Sync>> + Send + Sync,
{
    fn create(&self, data: BindingInput) -> Result<FactoryOutput, Box<dyn std::error::Error + Send + Sync>> {
        (self)(data)
    }
}

/// Process-wide map from a binding-type tag to its factory.
#[derive(Default)]
pub struct ResourceFactoryRegistry {
    factories: RwLock<HashMap<&'static str, Arc<dyn ResourceFactory>>>,
}

impl std::fmt::Debug for ResourceFactoryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceFactoryRegistry")
            .field("tags", &self.factories.read().keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ResourceFactoryRegistry {
    /// Registers `factory` under `tag`.
    ///
    /// Fails with [`Error::AlreadyRegistered`] if the tag is taken; entries
    /// are install-once, never silently overwritten.
    pub fn register(
        &self,
        tag: &'static str,
        factory: Arc<dyn ResourceFactory>,
    ) -> Result<(), Error> {
        let mut factories = self.factories.write();
        if factories.contains_key(tag) {
            return Err(Error::AlreadyRegistered(tag.to_string()));
        }
        factories.insert(tag, factory);
        #[cfg(feature = "tracing")]
        tracing::debug!(tag, "registered resource factory");
        #[cfg(feature = "log")]
        log::debug!("registered resource factory for tag '{tag}'");
        Ok(())
    }

    /// Removes the factory registered under `tag`, if any.
    pub fn unregister(&self, tag: &str) {
        self.factories.write().remove(tag);
    }

    /// Whether a factory is currently registered under `tag`.
    pub fn has(&self, tag: &str) -> bool {
        self.factories.read().contains_key(tag)
    }

    /// Invokes the factory registered under `tag`.
    ///
    /// Fails with [`Error::NotRegistered`] if nothing is registered there.
    pub fn create(
        &self,
        tag: &str,
        data: BindingInput,
    ) -> Result<FactoryOutput, Box<dyn std::error::Error + Send + Sync>> {
        let factory = self
            .factories
            .read()
            .get(tag)
            .cloned()
            .ok_or_else(|| Error::NotRegistered(tag.to_string()))?;
        factory.create(data)
    }

    /// Removes every registration. Not reachable from production code paths
    /// (see [`reset_for_tests`]); exists purely so test modules can start
    /// from a clean slate despite the registry being process-wide.
    #[doc(hidden)]
    pub fn clear(&self) {
        self.factories.write().clear();
    }
}

static REGISTRY: OnceLock<Arc<ResourceFactoryRegistry>> = OnceLock::new();

/// Returns the process-wide registry, creating it on first use.
pub fn global() -> Arc<ResourceFactoryRegistry> {
    REGISTRY
        .get_or_init(|| Arc::new(ResourceFactoryRegistry::default()))
        .clone()
}

/// Clears the process-wide registry. Must only be called from test code;
/// calling it from a production path would let a later `register` silently
/// resurrect a tag a handler believes is already bound.
#[doc(hidden)]
pub fn reset_for_tests() {
    global().clear();
}
