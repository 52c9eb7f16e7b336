//! Synthesize-once adapter cache and the framework entry point.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use casement_registry::TypeRegistry;

use crate::adapter::Adapter;
use crate::error::{BuildError, DeclarationError};
use crate::interface::InterfaceSpec;
use crate::synthesizer::Synthesizer;

/// Cache identity: one adapter per (interface, handler).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AdapterKey {
    pub interface: String,
    pub handler: String,
}

impl AdapterKey {
    pub fn new(interface: &str, handler: &str) -> AdapterKey {
        AdapterKey {
            interface: interface.to_string(),
            handler: handler.to_string(),
        }
    }
}

/// The sole entry point of the framework.
///
/// Declare interfaces first, then acquire adapters. Acquisition is
/// idempotent: the same `Arc<Adapter>` is returned for repeated requests,
/// and the cache mutex is held across synthesis so concurrent callers for
/// one key trigger at most one build. Adapters are never evicted.
pub struct Casement {
    synthesizer: Synthesizer,
    interfaces: Mutex<HashMap<String, Arc<InterfaceSpec>>>,
    cache: Mutex<HashMap<AdapterKey, Arc<Adapter>>>,
}

impl Casement {
    /// Create a framework instance over the given registry.
    pub fn new(registry: Arc<TypeRegistry>) -> Casement {
        Casement {
            synthesizer: Synthesizer::new(registry),
            interfaces: Mutex::new(HashMap::new()),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Declare an interface. Must happen before any adapter for it is
    /// requested; bindings do not change at runtime.
    pub fn declare(&self, spec: InterfaceSpec) -> Result<(), DeclarationError> {
        spec.validate()?;
        let mut interfaces = self.interfaces.lock();
        if interfaces.contains_key(&spec.name) {
            return Err(DeclarationError::DuplicateInterface {
                interface: spec.name.clone(),
            });
        }
        interfaces.insert(spec.name.clone(), Arc::new(spec));
        Ok(())
    }

    /// Build-or-fetch the adapter for (interface, handler).
    pub fn acquire(&self, interface: &str, handler: &str) -> Result<Arc<Adapter>, BuildError> {
        let spec = self
            .interfaces
            .lock()
            .get(interface)
            .cloned()
            .ok_or_else(|| BuildError::UnknownInterface {
                interface: interface.to_string(),
            })?;

        let key = AdapterKey::new(interface, handler);
        // Held across synthesis: at most one build per key.
        let mut cache = self.cache.lock();
        if let Some(adapter) = cache.get(&key) {
            tracing::trace!(interface, handler, "adapter cache hit");
            return Ok(adapter.clone());
        }

        let adapter = Arc::new(self.synthesizer.build(&spec, handler)?);
        cache.insert(key, adapter.clone());
        Ok(adapter)
    }

    /// Number of cached adapters.
    pub fn cached(&self) -> usize {
        self.cache.lock().len()
    }
}

impl std::fmt::Debug for Casement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Casement")
            .field("interfaces", &self.interfaces.lock().len())
            .field("cached", &self.cached())
            .finish_non_exhaustive()
    }
}
