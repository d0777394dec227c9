//! Language codes: normalized primary language subtags.
//!
//! Locale strings such as `"en_US"` or `"pt-BR"` are reduced to their
//! lower-cased primary subtag. English is the universal fallback.

use std::borrow::{Borrow, Cow};
use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Rejected language code input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LanguageCodeError {
    #[error("language code is empty")]
    Empty,

    #[error("invalid language code: '{0}'")]
    Invalid(String),
}

/// A normalized language code (e.g. `"en"`, `"es"`, `"fil"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct LanguageCode(Cow<'static, str>);

impl LanguageCode {
    /// English, used whenever no usable language is declared.
    pub const ENGLISH: LanguageCode = LanguageCode(Cow::Borrowed("en"));

    /// Parse and normalize a language or locale string.
    ///
    /// # Example
    /// ```
    /// use message_keys::i18n::LanguageCode;
    ///
    /// let code = LanguageCode::parse("pt_BR").unwrap();
    /// assert_eq!(code.as_str(), "pt");
    /// ```
    pub fn parse(raw: &str) -> Result<LanguageCode, LanguageCodeError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LanguageCodeError::Empty);
        }

        let primary = trimmed
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        let valid_len = (2..=3).contains(&primary.len());
        if !valid_len || !primary.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(LanguageCodeError::Invalid(raw.to_string()));
        }

        if primary == "en" {
            return Ok(LanguageCode::ENGLISH);
        }
        Ok(LanguageCode(Cow::Owned(primary)))
    }

    /// Language for a user's declaration: absent, empty or unusable
    /// declarations resolve to English.
    pub fn from_declared(declared: Option<&str>) -> LanguageCode {
        declared
            .and_then(|raw| LanguageCode::parse(raw).ok())
            .unwrap_or(LanguageCode::ENGLISH)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_english(&self) -> bool {
        self.as_str() == "en"
    }
}

impl Default for LanguageCode {
    fn default() -> Self {
        LanguageCode::ENGLISH
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for LanguageCode {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for LanguageCode {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl std::str::FromStr for LanguageCode {
    type Err = LanguageCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LanguageCode::parse(s)
    }
}
