//! Resolution context: whose language a message is resolved for.

/// Anything that declares a preferred language, such as a connected client.
pub trait Localized {
    /// Declared language or locale string (e.g. `"es"`, `"pt_BR"`), if any.
    fn language(&self) -> Option<&str>;
}

/// Per-call indication of which language applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Context {
    /// A user with an optional declared language.
    User { language: Option<String> },

    /// The process itself; resolves in the configured default language.
    System,
}

impl Context {
    pub fn user(language: impl Into<String>) -> Self {
        Context::User {
            language: Some(language.into()),
        }
    }

    /// Context for a user who has not declared a language.
    pub fn anonymous() -> Self {
        Context::User { language: None }
    }

    pub fn for_user<L: Localized + ?Sized>(user: &L) -> Self {
        Context::User {
            language: user.language().map(str::to_string),
        }
    }
}
