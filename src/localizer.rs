//! Localizer: the one shared localization service of a process.
//!
//! Construct it once at startup and hand out references (or clones, which
//! share the same store) to whatever needs to resolve messages.

use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use crate::config::Config;
use crate::i18n::{
    Auditor, DiscoveredKeys, KeyRegistry, LanguageCode, LanguagePack, MessageStore, Resolver,
};

#[derive(Debug, Clone)]
pub struct Localizer {
    config: Arc<Config>,
    discovered: Arc<DiscoveredKeys>,
    store: Arc<MessageStore>,
    resolver: Resolver,
    auditor: Auditor,
}

impl Localizer {
    /// Build the service with an empty store. Key discovery runs once here.
    pub fn new(config: Config, registry: KeyRegistry) -> Self {
        let registry = Arc::new(registry);
        let discovered = Arc::new(registry.discover_all());
        let store = Arc::new(MessageStore::new());
        let resolver = Resolver::new(Arc::clone(&store), config.default_language.clone());
        let auditor = Auditor::new(Arc::clone(&registry), Arc::clone(&store));

        info!(
            "Localizer ready: {} message keys, default language {}",
            discovered.len(),
            config.default_language
        );

        Self {
            config: Arc::new(config),
            discovered,
            store,
            resolver,
            auditor,
        }
    }

    /// Configuration the service was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Keys found by the discovery pass run at construction.
    pub fn discovered(&self) -> &DiscoveredKeys {
        &self.discovered
    }

    /// Shared template store.
    pub fn store(&self) -> &Arc<MessageStore> {
        &self.store
    }

    /// Resolver bound to the shared store and the configured default language.
    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Auditor comparing the registry against the shared store.
    pub fn auditor(&self) -> &Auditor {
        &self.auditor
    }

    /// Replace a language with a complete pack.
    pub fn load_pack(&self, pack: LanguagePack) {
        self.store.replace_language(pack);
    }

    /// Replace `lang` with the messages found in a parsed document.
    pub fn load_tree(&self, lang: LanguageCode, tree: &Value) {
        let pack = LanguagePack::from_tree(lang, tree, &self.discovered);
        self.load_pack(pack);
    }

    /// Configured languages that have no pack loaded.
    pub fn unloaded_languages(&self) -> Vec<LanguageCode> {
        let loaded = self.store.languages();
        self.config
            .languages
            .iter()
            .filter(|lang| !loaded.contains(*lang))
            .cloned()
            .collect()
    }
}
