//! Key registry: the set of every message key variant the application knows.
//!
//! Variants are registered explicitly at startup through [`KeyRegistryBuilder`].
//! [`KeyRegistry::discover_all`] instantiates each one and maps its canonical
//! identifier to a representative instance.

use std::sync::Arc;

use indexmap::IndexMap;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::i18n::MessageKey;

/// A registered variant could not be constructed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to instantiate message key '{type_name}': {reason}")]
pub struct InstantiationError {
    /// Simple type name of the variant
    pub type_name: &'static str,

    /// Why construction failed
    pub reason: String,
}

impl InstantiationError {
    /// Create an error for the variant `type_name`.
    ///
    /// # Arguments
    /// * `type_name` - Simple type name of the variant
    /// * `reason` - Why it could not be built
    pub fn new(type_name: &'static str, reason: impl Into<String>) -> Self {
        Self {
            type_name,
            reason: reason.into(),
        }
    }
}

/// Factory producing a representative instance of one variant.
pub type KeyFactory = fn() -> Result<Box<dyn MessageKey>, InstantiationError>;

/// Descriptor for one registered variant.
#[derive(Clone)]
pub struct KeyDescriptor {
    /// Simple type name, used for diagnostics when the factory fails
    pub type_name: &'static str,

    /// Builds the representative instance
    pub factory: KeyFactory,
}

impl std::fmt::Debug for KeyDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyDescriptor")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

fn default_factory<K: MessageKey + Default>() -> Result<Box<dyn MessageKey>, InstantiationError> {
    Ok(Box::new(K::default()))
}

/// Builder collecting variant descriptors in registration order.
#[derive(Debug, Default)]
pub struct KeyRegistryBuilder {
    descriptors: Vec<KeyDescriptor>,
}

impl KeyRegistryBuilder {
    /// Register a default-constructible variant.
    pub fn register<K: MessageKey + Default>(mut self) -> Self {
        self.descriptors.push(KeyDescriptor {
            type_name: short_type_name::<K>(),
            factory: default_factory::<K>,
        });
        self
    }

    /// Register a variant built by a fallible factory.
    pub fn register_factory(mut self, type_name: &'static str, factory: KeyFactory) -> Self {
        self.descriptors.push(KeyDescriptor { type_name, factory });
        self
    }

    /// Freeze the registered descriptors into a [`KeyRegistry`].
    pub fn build(self) -> KeyRegistry {
        KeyRegistry {
            descriptors: self.descriptors,
        }
    }
}

/// Result of a discovery pass: canonical identifier to representative key,
/// in discovery order.
#[derive(Clone, Default)]
pub struct DiscoveredKeys {
    entries: IndexMap<String, Arc<dyn MessageKey>>,
}

impl DiscoveredKeys {
    /// Look up a key by canonical identifier.
    ///
    /// # Arguments
    /// * `identifier` - Canonical identifier (e.g., "welcome")
    ///
    /// # Returns
    /// * `Some(&Arc<dyn MessageKey>)` if a variant maps to the identifier
    /// * `None` otherwise
    pub fn get(&self, identifier: &str) -> Option<&Arc<dyn MessageKey>> {
        self.entries.get(identifier)
    }

    /// Check if a variant maps to `identifier`
    pub fn contains(&self, identifier: &str) -> bool {
        self.entries.contains_key(identifier)
    }

    /// Number of distinct identifiers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(identifier, key)` pairs in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn MessageKey>)> + '_ {
        self.entries.iter().map(|(id, key)| (id.as_str(), key))
    }

    /// Identifiers in discovery order.
    pub fn identifiers(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }
}

impl std::fmt::Debug for DiscoveredKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(id, key)| (id, key.key_id())))
            .finish()
    }
}

/// Registry of every message key variant known to the application.
#[derive(Debug, Clone, Default)]
pub struct KeyRegistry {
    descriptors: Vec<KeyDescriptor>,
}

impl KeyRegistry {
    /// Start registering variants.
    pub fn builder() -> KeyRegistryBuilder {
        KeyRegistryBuilder::default()
    }

    /// Registered descriptors in registration order.
    pub fn descriptors(&self) -> &[KeyDescriptor] {
        &self.descriptors
    }

    /// Instantiate every registered variant and index it by canonical identifier.
    ///
    /// A variant whose factory fails is logged and skipped. When two variants
    /// share an identifier the later one replaces the earlier one and a
    /// warning is logged.
    pub fn discover_all(&self) -> DiscoveredKeys {
        let mut discovered = DiscoveredKeys::default();

        for descriptor in &self.descriptors {
            let key: Arc<dyn MessageKey> = match (descriptor.factory)() {
                Ok(key) => Arc::from(key),
                Err(e) => {
                    error!("Failed to instantiate message key {}: {}", descriptor.type_name, e);
                    continue;
                }
            };

            let identifier = key_path("", key.simple_name());
            debug!("Mapped key: {} -> {}", identifier, key.simple_name());

            if let Some(previous) = discovered.entries.insert(identifier.clone(), key) {
                warn!(
                    "Message key identifier collision: '{}' from {} replaced by {}",
                    identifier,
                    previous.simple_name(),
                    descriptor.type_name
                );
            }
        }

        discovered
    }
}

/// Canonical identifier for a key named `simple_name` under `prefix`.
///
/// With an empty prefix this is the lower-cased name; otherwise the prefix and
/// name joined with `.`. Discovery always uses the empty prefix.
pub fn key_path(prefix: &str, simple_name: &str) -> String {
    let name = simple_name.to_lowercase();
    if prefix.is_empty() {
        name
    } else {
        format!("{}.{}", prefix.to_lowercase(), name)
    }
}

fn short_type_name<K>() -> &'static str {
    let full = std::any::type_name::<K>();
    let base = full.split('<').next().unwrap_or(full);
    match base.rfind("::") {
        Some(idx) => &base[idx + 2..],
        None => base,
    }
}
