//! Resolver: turns (context, key, arguments) into display text.
//!
//! Lookup order for the effective language:
//! 1. the stored template, formatted with the arguments
//! 2. an explicit default message, for callers that supply one
//! 3. the key's raw identifier
//!
//! A template that fails to format is an authoring bug and is returned as an
//! error rather than hidden behind a fallback.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::i18n::{format, Arg, Context, FormatError, LanguageCode, MessageKey, MessageStore};

/// Where a resolved message's text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageOrigin {
    /// A stored template for the effective language
    Translated,

    /// The caller-supplied default message
    ExplicitDefault,

    /// The key's raw identifier
    KeyFallback,
}

/// Display-ready message text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedMessage {
    pub text: String,
    pub origin: MessageOrigin,
}

impl FormattedMessage {
    /// Text from a stored template.
    pub fn translated(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            origin: MessageOrigin::Translated,
        }
    }

    /// Text from a caller-supplied default.
    pub fn explicit_default(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            origin: MessageOrigin::ExplicitDefault,
        }
    }

    /// Text from the key's raw identifier.
    pub fn key_fallback(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            origin: MessageOrigin::KeyFallback,
        }
    }

    /// Check if the text came from a stored template
    pub fn is_translated(&self) -> bool {
        self.origin == MessageOrigin::Translated
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

impl fmt::Display for FormattedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Resolves message keys against a shared [`MessageStore`].
///
/// Resolution only reads the store; results are never cached.
#[derive(Debug, Clone)]
pub struct Resolver {
    store: Arc<MessageStore>,
    default_language: LanguageCode,
}

impl Resolver {
    /// Create a resolver over `store`.
    ///
    /// # Arguments
    /// * `store` - Shared template store
    /// * `default_language` - Language used for [`Context::System`]
    pub fn new(store: Arc<MessageStore>, default_language: LanguageCode) -> Self {
        Self {
            store,
            default_language,
        }
    }

    /// The store this resolver reads.
    pub fn store(&self) -> &Arc<MessageStore> {
        &self.store
    }

    /// Language used for [`Context::System`].
    pub fn default_language(&self) -> &LanguageCode {
        &self.default_language
    }

    /// Language a context resolves in: the user's declaration (English when
    /// absent or empty), or the process default for the system.
    pub fn effective_language(&self, ctx: &Context) -> LanguageCode {
        match ctx {
            Context::User { language } => LanguageCode::from_declared(language.as_deref()),
            Context::System => self.default_language.clone(),
        }
    }

    /// Resolve `key` for `ctx`, falling back to the key's raw identifier.
    ///
    /// # Arguments
    /// * `ctx` - Whose language applies
    /// * `key` - Message to resolve
    /// * `args` - Positional template arguments
    ///
    /// # Returns
    /// * `Ok(FormattedMessage)` with the formatted template, or the raw
    ///   identifier when no template exists
    /// * `Err(FormatError)` when the stored template does not accept `args`
    ///
    /// # Errors
    /// Returns [`FormatError`] when a stored template does not accept `args`.
    pub fn resolve<K: MessageKey + ?Sized>(
        &self,
        ctx: &Context,
        key: &K,
        args: &[Arg],
    ) -> Result<FormattedMessage, FormatError> {
        match self.format_stored(ctx, key, args)? {
            Some(text) => Ok(FormattedMessage::translated(text)),
            None => Ok(key.default_display()),
        }
    }

    /// Resolve `key` for `ctx`, falling back to `default_message` verbatim.
    ///
    /// # Errors
    /// Returns [`FormatError`] when a stored template does not accept `args`.
    pub fn resolve_or_default<K: MessageKey + ?Sized>(
        &self,
        ctx: &Context,
        key: &K,
        default_message: &str,
        args: &[Arg],
    ) -> Result<FormattedMessage, FormatError> {
        match self.format_stored(ctx, key, args)? {
            Some(text) => Ok(FormattedMessage::translated(text)),
            None => Ok(FormattedMessage::explicit_default(default_message)),
        }
    }

    /// The unformatted template for `key`, or its raw identifier.
    pub fn resolve_raw<K: MessageKey + ?Sized>(&self, ctx: &Context, key: &K) -> String {
        let lang = self.effective_language(ctx);
        match self.store.get(&lang, key) {
            Some(template) => template.as_str().to_string(),
            None => key.raw(),
        }
    }

    /// Whether a template exists for `key` in the context's language.
    pub fn has_translation<K: MessageKey + ?Sized>(&self, ctx: &Context, key: &K) -> bool {
        self.store.contains(&self.effective_language(ctx), key)
    }

    fn format_stored<K: MessageKey + ?Sized>(
        &self,
        ctx: &Context,
        key: &K,
        args: &[Arg],
    ) -> Result<Option<String>, FormatError> {
        let lang = self.effective_language(ctx);
        self.store
            .get(&lang, key)
            .map(|template| format(template.as_str(), args))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;

    crate::message_keys! {
        struct Welcome;
        struct Goodbye;
        struct Inbox;
    }

    fn spanish() -> LanguageCode {
        LanguageCode::parse("es").unwrap()
    }

    fn resolver(default_language: LanguageCode) -> Resolver {
        let store = Arc::new(MessageStore::new());
        store.put(&LanguageCode::ENGLISH, &Welcome, "Hello, %s!");
        store.put(&LanguageCode::ENGLISH, &Inbox, "Hi %s, you have %d messages");
        store.put(&spanish(), &Welcome, "¡Hola, %s!");
        Resolver::new(store, default_language)
    }

    // ==================== Effective Language Tests ====================

    #[test]
    fn test_effective_language_user() {
        let r = resolver(LanguageCode::ENGLISH);
        assert_eq!(r.effective_language(&Context::user("es_MX")), spanish());
    }

    #[test]
    fn test_effective_language_empty_is_english() {
        let r = resolver(spanish());
        assert_eq!(r.effective_language(&Context::user("")), LanguageCode::ENGLISH);
        assert_eq!(r.effective_language(&Context::anonymous()), LanguageCode::ENGLISH);
    }

    #[test]
    fn test_effective_language_system_uses_default() {
        let r = resolver(spanish());
        assert_eq!(r.effective_language(&Context::System), spanish());
    }

    // ==================== resolve Tests ====================

    #[test]
    fn test_resolve_translated() {
        let r = resolver(LanguageCode::ENGLISH);
        let message = r.resolve(&Context::user("en"), &Welcome, &args!["Ann"]).unwrap();
        assert_eq!(message, FormattedMessage::translated("Hello, Ann!"));
    }

    #[test]
    fn test_resolve_multiple_arguments() {
        let r = resolver(LanguageCode::ENGLISH);
        let message = r.resolve(&Context::user("en"), &Inbox, &args!["Ann", 3]).unwrap();
        assert_eq!(message.text, "Hi Ann, you have 3 messages");
    }

    #[test]
    fn test_resolve_user_language() {
        let r = resolver(LanguageCode::ENGLISH);
        let message = r.resolve(&Context::user("es"), &Welcome, &args!["Ana"]).unwrap();
        assert_eq!(message.text, "¡Hola, Ana!");
    }

    #[test]
    fn test_resolve_system_context() {
        let r = resolver(spanish());
        let message = r.resolve(&Context::System, &Welcome, &args!["Ana"]).unwrap();
        assert_eq!(message.text, "¡Hola, Ana!");
    }

    #[test]
    fn test_resolve_missing_key_falls_back_to_raw() {
        let r = resolver(LanguageCode::ENGLISH);
        let message = r.resolve(&Context::user("en"), &Goodbye, &[]).unwrap();
        assert_eq!(message, Goodbye.default_display());
        assert_eq!(message.origin, MessageOrigin::KeyFallback);
    }

    #[test]
    fn test_resolve_unknown_language_falls_back_to_raw() {
        let r = resolver(LanguageCode::ENGLISH);
        let message = r.resolve(&Context::user("de"), &Welcome, &args!["Ann"]).unwrap();
        assert_eq!(message.text, "welcome");
    }

    #[test]
    fn test_resolve_format_error_is_surfaced() {
        let r = resolver(LanguageCode::ENGLISH);
        let err = r.resolve(&Context::user("en"), &Inbox, &args!["Ann"]).unwrap_err();
        assert!(matches!(err, FormatError::MissingArgument { position: 2, .. }));

        let err = r.resolve(&Context::user("en"), &Inbox, &args!["Ann", "three"]).unwrap_err();
        assert!(matches!(err, FormatError::Mismatch { .. }));
    }

    #[test]
    fn test_resolve_oversized_width_is_an_error() {
        let store = Arc::new(MessageStore::new());
        store.put(&LanguageCode::ENGLISH, &Goodbye, "[%18446744073709551615s]");
        let r = Resolver::new(store, LanguageCode::ENGLISH);

        let err = r.resolve(&Context::user("en"), &Goodbye, &args!["Ann"]).unwrap_err();
        assert!(matches!(err, FormatError::InvalidWidth(_)));
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let r = resolver(LanguageCode::ENGLISH);
        let first = r.resolve(&Context::user("en"), &Inbox, &args!["Ann", 3]).unwrap();
        let second = r.resolve(&Context::user("en"), &Inbox, &args!["Ann", 3]).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_key_t_delegates_to_resolver() {
        let r = resolver(LanguageCode::ENGLISH);
        assert_eq!(Goodbye.t(&r, &Context::user("en")).unwrap().text, "goodbye");
        assert!(Welcome.t(&r, &Context::user("en")).is_err());
    }

    // ==================== resolve_or_default Tests ====================

    #[test]
    fn test_resolve_or_default_uses_default() {
        let r = resolver(LanguageCode::ENGLISH);
        let message = r
            .resolve_or_default(&Context::user("en"), &Goodbye, "See you %s", &args!["Ann"])
            .unwrap();
        assert_eq!(message, FormattedMessage::explicit_default("See you %s"));
    }

    #[test]
    fn test_resolve_or_default_prefers_translation() {
        let r = resolver(LanguageCode::ENGLISH);
        let message = r
            .resolve_or_default(&Context::user("en"), &Welcome, "unused", &args!["Ann"])
            .unwrap();
        assert_eq!(message.text, "Hello, Ann!");
        assert!(message.is_translated());
    }

    // ==================== resolve_raw Tests ====================

    #[test]
    fn test_resolve_raw_returns_template_unformatted() {
        let r = resolver(LanguageCode::ENGLISH);
        assert_eq!(r.resolve_raw(&Context::user("en"), &Welcome), "Hello, %s!");
    }

    #[test]
    fn test_resolve_raw_falls_back_to_identifier() {
        let r = resolver(LanguageCode::ENGLISH);
        assert_eq!(r.resolve_raw(&Context::user("en"), &Goodbye), "goodbye");
    }

    // ==================== has_translation Tests ====================

    #[test]
    fn test_has_translation() {
        let r = resolver(LanguageCode::ENGLISH);
        assert!(r.has_translation(&Context::user("en"), &Welcome));
        assert!(!r.has_translation(&Context::user("en"), &Goodbye));
        assert!(!r.has_translation(&Context::user("es"), &Inbox));
    }

    // ==================== FormattedMessage Tests ====================

    #[test]
    fn test_formatted_message_display() {
        assert_eq!(FormattedMessage::translated("Hi").to_string(), "Hi");
    }

    #[test]
    fn test_formatted_message_serialization() {
        let json = serde_json::to_string(&FormattedMessage::key_fallback("goodbye")).expect("serialize");
        assert_eq!(json, r#"{"text":"goodbye","origin":"key_fallback"}"#);
    }
}
