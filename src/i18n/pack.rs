//! Language packs: a complete key-to-template mapping for one language.
//!
//! Packs are built either key by key, or from an already-parsed document tree
//! whose nested object paths (joined with `.`) name canonical identifiers.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::i18n::{DiscoveredKeys, LanguageCode, LanguageMessages, MessageKey, MessageTemplate};

/// Top-level document field holding the pack's version label.
pub const VERSION_FIELD: &str = "langVersion";

/// A complete mapping for one language, ready to be swapped into the store.
#[derive(Debug, Clone)]
pub struct LanguagePack {
    language: LanguageCode,
    messages: LanguageMessages,
}

impl LanguagePack {
    pub fn new(language: LanguageCode) -> Self {
        Self {
            language,
            messages: LanguageMessages::default(),
        }
    }

    /// Add a template, replacing any previous one for the same key.
    pub fn insert<K: MessageKey + ?Sized>(&mut self, key: &K, template: impl Into<MessageTemplate>) {
        self.messages.insert(key.key_id(), template.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with<K: MessageKey + ?Sized>(mut self, key: &K, template: impl Into<MessageTemplate>) -> Self {
        self.insert(key, template);
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.messages.set_version(Some(version.into()));
        self
    }

    /// Build a pack from a parsed document.
    ///
    /// String leaves whose dotted path matches a discovered identifier become
    /// templates. Unmatched paths and non-text values are skipped. A top-level
    /// `langVersion` scalar sets the pack version.
    ///
    /// # Example
    /// ```
    /// use message_keys::i18n::{KeyRegistry, LanguageCode, LanguagePack};
    ///
    /// message_keys::message_keys! {
    ///     pub struct Welcome;
    /// }
    ///
    /// let keys = KeyRegistry::builder().register::<Welcome>().build().discover_all();
    /// let tree = serde_json::json!({ "langVersion": "2", "welcome": "Hello, %s!" });
    /// let pack = LanguagePack::from_tree(LanguageCode::ENGLISH, &tree, &keys);
    ///
    /// assert_eq!(pack.version(), Some("2"));
    /// assert_eq!(pack.get(&Welcome).map(|t| t.as_str()), Some("Hello, %s!"));
    /// ```
    pub fn from_tree(language: LanguageCode, tree: &Value, keys: &DiscoveredKeys) -> Self {
        let mut pack = Self::new(language);

        let Some(root) = tree.as_object() else {
            warn!(
                "Language document for '{}' is not a mapping; no messages loaded",
                pack.language
            );
            return pack;
        };

        if let Some(version) = root.get(VERSION_FIELD).and_then(scalar_text) {
            pack.messages.set_version(Some(version));
        }

        pack.walk("", root, keys);
        debug!(
            "Mapped {} of {} known keys for language: {}",
            pack.len(),
            keys.len(),
            pack.language
        );
        pack
    }

    fn walk(&mut self, prefix: &str, map: &Map<String, Value>, keys: &DiscoveredKeys) {
        for (name, value) in map {
            if prefix.is_empty() && name == VERSION_FIELD {
                continue;
            }

            let path = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{}.{}", prefix, name)
            };
            debug!("Processing path: {}", path);

            match value {
                Value::String(template) => match keys.get(&path) {
                    Some(key) => {
                        self.insert(&**key, template.as_str());
                        debug!("Mapped: {} -> {}", path, template);
                    }
                    None => debug!("No message key for path: {}", path),
                },
                Value::Object(nested) => self.walk(&path, nested, keys),
                _ => debug!("Skipping non-text value at path: {}", path),
            }
        }
    }

    pub fn language(&self) -> &LanguageCode {
        &self.language
    }

    pub fn version(&self) -> Option<&str> {
        self.messages.version()
    }

    pub fn get<K: MessageKey + ?Sized>(&self, key: &K) -> Option<&MessageTemplate> {
        self.messages.get(&key.key_id())
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub(crate) fn into_parts(self) -> (LanguageCode, LanguageMessages) {
        (self.language, self.messages)
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::KeyRegistry;
    use serde_json::json;

    crate::message_keys! {
        struct Welcome;
        struct Goodbye;
        struct Farewell;
    }

    fn keys() -> DiscoveredKeys {
        KeyRegistry::builder()
            .register::<Welcome>()
            .register::<Goodbye>()
            .register::<Farewell>()
            .build()
            .discover_all()
    }

    // ==================== Builder Tests ====================

    #[test]
    fn test_insert_and_get() {
        let mut pack = LanguagePack::new(LanguageCode::ENGLISH);
        pack.insert(&Welcome, "Hello");
        assert_eq!(pack.get(&Welcome).unwrap().as_str(), "Hello");
        assert!(pack.get(&Goodbye).is_none());
        assert_eq!(pack.len(), 1);
    }

    #[test]
    fn test_with_chain() {
        let pack = LanguagePack::new(LanguageCode::ENGLISH)
            .with(&Welcome, "Hello")
            .with(&Goodbye, "Bye")
            .with_version("1.2");
        assert_eq!(pack.len(), 2);
        assert_eq!(pack.version(), Some("1.2"));
        assert_eq!(pack.language(), &LanguageCode::ENGLISH);
    }

    // ==================== from_tree Tests ====================

    #[test]
    fn test_from_tree_flat() {
        let tree = json!({ "welcome": "Hello, %s!", "goodbye": "Bye" });
        let pack = LanguagePack::from_tree(LanguageCode::ENGLISH, &tree, &keys());

        assert_eq!(pack.len(), 2);
        assert_eq!(pack.get(&Welcome).unwrap().as_str(), "Hello, %s!");
        assert_eq!(pack.get(&Goodbye).unwrap().as_str(), "Bye");
    }

    #[test]
    fn test_from_tree_skips_unknown_paths() {
        let tree = json!({ "welcome": "Hello", "unknown": "???" });
        let pack = LanguagePack::from_tree(LanguageCode::ENGLISH, &tree, &keys());
        assert_eq!(pack.len(), 1);
    }

    #[test]
    fn test_from_tree_nested_paths_do_not_match_flat_identifiers() {
        let tree = json!({ "gui": { "welcome": "Hello" } });
        let pack = LanguagePack::from_tree(LanguageCode::ENGLISH, &tree, &keys());
        assert!(pack.is_empty());
    }

    #[test]
    fn test_from_tree_skips_non_text_values() {
        let tree = json!({ "welcome": 42, "goodbye": ["a"], "farewell": null });
        let pack = LanguagePack::from_tree(LanguageCode::ENGLISH, &tree, &keys());
        assert!(pack.is_empty());
    }

    #[test]
    fn test_from_tree_is_case_sensitive() {
        let tree = json!({ "Welcome": "Hello" });
        let pack = LanguagePack::from_tree(LanguageCode::ENGLISH, &tree, &keys());
        assert!(pack.is_empty());
    }

    #[test]
    fn test_from_tree_reads_version() {
        let tree = json!({ "langVersion": 3, "welcome": "Hello" });
        let pack = LanguagePack::from_tree(LanguageCode::ENGLISH, &tree, &keys());
        assert_eq!(pack.version(), Some("3"));
        assert_eq!(pack.len(), 1);
    }

    #[test]
    fn test_from_tree_without_version() {
        let tree = json!({ "welcome": "Hello" });
        let pack = LanguagePack::from_tree(LanguageCode::ENGLISH, &tree, &keys());
        assert!(pack.version().is_none());
    }

    #[test]
    fn test_from_tree_non_object_root() {
        let pack = LanguagePack::from_tree(LanguageCode::ENGLISH, &json!("text"), &keys());
        assert!(pack.is_empty());
    }
}
