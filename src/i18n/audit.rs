//! Missing-translation audit.
//!
//! Compares the registry's identifiers against a language's stored templates
//! and reports every key that would fall back to its raw identifier.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::i18n::{DiscoveredKeys, KeyRegistry, LanguageCode, MessageStore};

/// Audit result for one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    /// Audited language
    pub language: LanguageCode,

    /// Number of identifiers known to the registry
    pub total: usize,

    /// Identifiers with no template, in registry order
    pub missing: Vec<String>,
}

impl AuditReport {
    /// Check if every known key is translated
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// Translated share of known keys as a percentage (0-100).
    /// An empty registry counts as fully covered.
    pub fn coverage_percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        ((self.total - self.missing.len()) as f64 / self.total as f64) * 100.0
    }
}

/// Diffs the key registry against the message store.
#[derive(Debug, Clone)]
pub struct Auditor {
    registry: Arc<KeyRegistry>,
    store: Arc<MessageStore>,
}

impl Auditor {
    pub fn new(registry: Arc<KeyRegistry>, store: Arc<MessageStore>) -> Self {
        Self { registry, store }
    }

    /// Identifiers of every registered key without a template in `lang`.
    ///
    /// Logs a warning per missing identifier. An unknown language reports
    /// every identifier.
    ///
    /// # Arguments
    /// * `lang` - Language to audit
    ///
    /// # Returns
    /// Missing identifiers in registration order
    pub fn find_missing(&self, lang: &LanguageCode) -> Vec<String> {
        self.missing_in(&self.registry.discover_all(), lang)
    }

    /// Full report for `lang`. Discovery runs once per report.
    pub fn report(&self, lang: &LanguageCode) -> AuditReport {
        self.report_with(&self.registry.discover_all(), lang)
    }

    fn report_with(&self, keys: &DiscoveredKeys, lang: &LanguageCode) -> AuditReport {
        let missing = self.missing_in(keys, lang);
        info!(
            "Audit for {}: {} of {} keys missing",
            lang,
            missing.len(),
            keys.len()
        );

        AuditReport {
            language: lang.clone(),
            total: keys.len(),
            missing,
        }
    }

    fn missing_in(&self, keys: &DiscoveredKeys, lang: &LanguageCode) -> Vec<String> {
        let messages = self.store.language(lang);

        let mut missing = Vec::new();
        for (identifier, key) in keys.iter() {
            let present = messages
                .as_ref()
                .is_some_and(|messages| messages.contains(&key.key_id()));
            if !present {
                warn!("Missing key: {} for language: {}", identifier, lang);
                missing.push(identifier.to_string());
            }
        }

        missing
    }

    /// Reports for every language in the store, sorted by language.
    pub fn report_all(&self) -> Vec<AuditReport> {
        let keys = self.registry.discover_all();
        self.store
            .languages()
            .iter()
            .map(|lang| self.report_with(&keys, lang))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{InstantiationError, MessageKey};
    use crate::logging::capture::{count, logs_of};

    crate::message_keys! {
        struct Welcome;
        struct Goodbye;
        struct Farewell;
    }

    fn spanish() -> LanguageCode {
        LanguageCode::parse("es").unwrap()
    }

    fn auditor(store: Arc<MessageStore>) -> Auditor {
        let registry = KeyRegistry::builder()
            .register::<Welcome>()
            .register::<Goodbye>()
            .register::<Farewell>()
            .build();
        Auditor::new(Arc::new(registry), store)
    }

    // ==================== find_missing Tests ====================

    #[test]
    fn test_find_missing_reports_untranslated_keys() {
        let store = Arc::new(MessageStore::new());
        store.put(&LanguageCode::ENGLISH, &Welcome, "Hello");

        let missing = auditor(store).find_missing(&LanguageCode::ENGLISH);
        assert_eq!(missing, vec!["goodbye", "farewell"]);
    }

    #[test]
    fn test_find_missing_empty_when_complete() {
        let store = Arc::new(MessageStore::new());
        store.put(&LanguageCode::ENGLISH, &Welcome, "Hello");
        store.put(&LanguageCode::ENGLISH, &Goodbye, "Bye");
        store.put(&LanguageCode::ENGLISH, &Farewell, "Farewell");

        assert!(auditor(store).find_missing(&LanguageCode::ENGLISH).is_empty());
    }

    #[test]
    fn test_find_missing_unknown_language_reports_everything() {
        let store = Arc::new(MessageStore::new());
        let missing = auditor(store).find_missing(&spanish());
        assert_eq!(missing, vec!["welcome", "goodbye", "farewell"]);
    }

    #[test]
    fn test_find_missing_is_per_language() {
        let store = Arc::new(MessageStore::new());
        store.put(&LanguageCode::ENGLISH, &Welcome, "Hello");
        store.put(&spanish(), &Goodbye, "Adiós");

        let auditor = auditor(store);
        assert_eq!(auditor.find_missing(&spanish()), vec!["welcome", "farewell"]);
    }

    #[test]
    fn test_find_missing_is_deterministic() {
        let store = Arc::new(MessageStore::new());
        store.put(&LanguageCode::ENGLISH, &Goodbye, "Bye");

        let auditor = auditor(store);
        assert_eq!(
            auditor.find_missing(&LanguageCode::ENGLISH),
            auditor.find_missing(&LanguageCode::ENGLISH)
        );
    }

    #[test]
    fn test_find_missing_warns_per_key() {
        let store = Arc::new(MessageStore::new());
        store.put(&LanguageCode::ENGLISH, &Welcome, "Hello");
        let auditor = auditor(store);

        let lines = logs_of(|| {
            auditor.find_missing(&LanguageCode::ENGLISH);
        });
        assert_eq!(count(&lines, "WARN", "Missing key: goodbye for language: en"), 1);
        assert_eq!(count(&lines, "WARN", "Missing key: farewell for language: en"), 1);
        assert_eq!(count(&lines, "WARN", "Missing key: welcome"), 0);
    }

    // ==================== Report Tests ====================

    #[test]
    fn test_report_coverage() {
        let store = Arc::new(MessageStore::new());
        store.put(&LanguageCode::ENGLISH, &Welcome, "Hello");

        let report = auditor(store).report(&LanguageCode::ENGLISH);
        assert_eq!(report.total, 3);
        assert_eq!(report.missing.len(), 2);
        assert!(!report.is_complete());
        assert!((report.coverage_percent() - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_report_empty_registry_is_complete() {
        let auditor = Auditor::new(Arc::new(KeyRegistry::default()), Arc::new(MessageStore::new()));
        let report = auditor.report(&LanguageCode::ENGLISH);
        assert!(report.is_complete());
        assert_eq!(report.coverage_percent(), 100.0);
    }

    #[test]
    fn test_report_all_covers_stored_languages() {
        let store = Arc::new(MessageStore::new());
        store.put(&spanish(), &Welcome, "Hola");
        store.put(&LanguageCode::ENGLISH, &Welcome, "Hello");

        let reports = auditor(store).report_all();
        let languages: Vec<&str> = reports.iter().map(|r| r.language.as_str()).collect();
        assert_eq!(languages, vec!["en", "es"]);
    }

    fn failing_factory() -> Result<Box<dyn MessageKey>, InstantiationError> {
        Err(InstantiationError::new("Broken", "no zero-argument constructor"))
    }

    #[test]
    fn test_report_discovers_once() {
        let registry = KeyRegistry::builder()
            .register::<Welcome>()
            .register_factory("Broken", failing_factory)
            .build();
        let store = Arc::new(MessageStore::new());
        store.put(&LanguageCode::ENGLISH, &Welcome, "Hello");
        store.put(&spanish(), &Welcome, "Hola");
        let auditor = Auditor::new(Arc::new(registry), store);

        let lines = logs_of(|| {
            auditor.report(&LanguageCode::ENGLISH);
        });
        assert_eq!(count(&lines, "ERROR", "Failed to instantiate message key Broken"), 1);

        let lines = logs_of(|| {
            auditor.report_all();
        });
        assert_eq!(count(&lines, "ERROR", "Failed to instantiate message key Broken"), 1);
    }

    #[test]
    fn test_report_serialization() {
        let report = AuditReport {
            language: LanguageCode::ENGLISH,
            total: 1,
            missing: vec!["goodbye".to_string()],
        };
        let json = serde_json::to_string(&report).expect("serialize");
        assert_eq!(json, r#"{"language":"en","total":1,"missing":["goodbye"]}"#);
    }
}
