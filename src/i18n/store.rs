//! Message store: per-language templates, shared across request threads.
//!
//! Each language's mapping lives behind its own `Arc`. Writers build or copy a
//! mapping and swap it in under the write lock, so a reader holding a snapshot
//! never sees a language half-written.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info};

use crate::i18n::{KeyId, LanguageCode, LanguagePack, MessageKey};

/// An immutable printf-style template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageTemplate(Arc<str>);

impl MessageTemplate {
    pub fn new(template: impl Into<Arc<str>>) -> Self {
        Self(template.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MessageTemplate {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for MessageTemplate {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// All templates of one language.
#[derive(Debug, Clone, Default)]
pub struct LanguageMessages {
    templates: HashMap<KeyId, MessageTemplate>,
    version: Option<String>,
}

impl LanguageMessages {
    pub fn get(&self, id: &KeyId) -> Option<&MessageTemplate> {
        self.templates.get(id)
    }

    pub fn contains(&self, id: &KeyId) -> bool {
        self.templates.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &KeyId> + '_ {
        self.templates.keys()
    }

    /// Version label declared by the language pack, if any.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub(crate) fn insert(&mut self, id: KeyId, template: MessageTemplate) -> Option<MessageTemplate> {
        self.templates.insert(id, template)
    }

    pub(crate) fn set_version(&mut self, version: Option<String>) {
        self.version = version;
    }
}

/// Process-wide store of templates keyed by language and message key.
#[derive(Default)]
pub struct MessageStore {
    languages: RwLock<HashMap<LanguageCode, Arc<LanguageMessages>>>,
}

impl MessageStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // Contents are replace-only, so a poisoned lock still guards consistent data.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<LanguageCode, Arc<LanguageMessages>>> {
        self.languages.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<LanguageCode, Arc<LanguageMessages>>> {
        self.languages.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Template for `key` in `lang`, or `None` if the language is unknown or
    /// the key untranslated.
    pub fn get<K: MessageKey + ?Sized>(&self, lang: &LanguageCode, key: &K) -> Option<MessageTemplate> {
        self.read()
            .get(lang)
            .and_then(|messages| messages.get(&key.key_id()).cloned())
    }

    /// Check if `lang` has a template for `key`
    pub fn contains<K: MessageKey + ?Sized>(&self, lang: &LanguageCode, key: &K) -> bool {
        self.read()
            .get(lang)
            .is_some_and(|messages| messages.contains(&key.key_id()))
    }

    /// Set a single template. Readers holding an earlier snapshot of the
    /// language keep seeing the old mapping.
    pub fn put<K: MessageKey + ?Sized>(
        &self,
        lang: &LanguageCode,
        key: &K,
        template: impl Into<MessageTemplate>,
    ) {
        let mut languages = self.write();
        let messages = languages.entry(lang.clone()).or_default();
        Arc::make_mut(messages).insert(key.key_id(), template.into());
    }

    /// Atomically replace a whole language with `pack`.
    pub fn replace_language(&self, pack: LanguagePack) {
        let (language, messages) = pack.into_parts();
        info!(
            "Loaded {} messages for language: {}",
            messages.len(),
            language
        );
        self.write().insert(language, Arc::new(messages));
    }

    /// Remove a language. Returns `true` if it was present.
    pub fn remove_language(&self, lang: &LanguageCode) -> bool {
        let removed = self.write().remove(lang).is_some();
        if removed {
            debug!("Removed language: {}", lang);
        }
        removed
    }

    /// Consistent snapshot of one language.
    pub fn language(&self, lang: &LanguageCode) -> Option<Arc<LanguageMessages>> {
        self.read().get(lang).cloned()
    }

    /// Version label of the pack loaded for `lang`.
    ///
    /// # Returns
    /// * `Some(String)` if the loaded pack declared a `langVersion`
    /// * `None` if the language is unknown or declared no version
    pub fn version(&self, lang: &LanguageCode) -> Option<String> {
        self.read()
            .get(lang)
            .and_then(|messages| messages.version().map(str::to_string))
    }

    /// Every language with a mapping, sorted.
    pub fn languages(&self) -> BTreeSet<LanguageCode> {
        self.read().keys().cloned().collect()
    }
}

impl fmt::Debug for MessageStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let languages = self.read();
        f.debug_map()
            .entries(languages.iter().map(|(lang, messages)| (lang, messages.len())))
            .finish()
    }
}
