//! The name-keyed type registry.

use std::collections::HashMap;
use std::sync::Arc;

use crate::entry::TypeEntry;
use crate::error::RegistryError;

/// Registered target types, keyed by qualified name.
///
/// Populated by the owning modules before any adapter is requested and
/// read-only afterwards; lookups need no synchronization.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: HashMap<String, Arc<TypeEntry>>,
}

impl TypeRegistry {
    /// Create an empty registry.
    pub fn new() -> TypeRegistry {
        TypeRegistry::default()
    }

    /// Register a type entry under its qualified name.
    pub fn register(&mut self, entry: TypeEntry) -> Result<(), RegistryError> {
        if self.types.contains_key(entry.name()) {
            return Err(RegistryError::DuplicateType {
                name: entry.name().to_string(),
            });
        }
        self.types.insert(entry.name().to_string(), Arc::new(entry));
        Ok(())
    }

    /// Look up a type by qualified name.
    pub fn get(&self, name: &str) -> Option<&Arc<TypeEntry>> {
        self.types.get(name)
    }

    /// Whether a type is registered under the given name.
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Visibility;
    use casement_core::Value;

    fn empty_entry(name: &str) -> TypeEntry {
        TypeEntry::builder::<()>(name)
            .static_method("noop", "()V", Visibility::Public, |_| Ok(Value::Null))
            .unwrap()
            .build()
    }

    #[test]
    fn register_and_lookup() {
        let mut registry = TypeRegistry::new();
        registry.register(empty_entry("demo.A")).unwrap();
        registry.register(empty_entry("demo.B")).unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("demo.A"));
        assert!(registry.get("demo.B").is_some());
        assert!(registry.get("demo.C").is_none());
    }

    #[test]
    fn duplicate_type_rejected() {
        let mut registry = TypeRegistry::new();
        registry.register(empty_entry("demo.A")).unwrap();
        assert!(matches!(
            registry.register(empty_entry("demo.A")),
            Err(RegistryError::DuplicateType { .. })
        ));
    }
}
