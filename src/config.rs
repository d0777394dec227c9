use anyhow::{Context, Result};

use crate::i18n::LanguageCode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    // Language used for system messages
    pub default_language: LanguageCode,

    // Languages the application ships packs for
    pub languages: Vec<LanguageCode>,

    // Verbose key-mapping diagnostics
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_language: LanguageCode::ENGLISH,
            languages: vec![LanguageCode::ENGLISH],
            debug: false,
        }
    }
}

impl Config {
    /// Load configuration from the environment, reading `.env` first if present.
    ///
    /// # Returns
    /// * `Ok(Config)` with defaults for unset variables
    /// * `Err` if a variable is set but cannot be parsed
    pub fn from_env() -> Result<Self> {
        // Load .env file (ignored when absent)
        let _ = dotenvy::dotenv();

        let default_language = match std::env::var("MESSAGE_KEYS_DEFAULT_LANGUAGE") {
            Ok(raw) => LanguageCode::parse(&raw)
                .with_context(|| format!("MESSAGE_KEYS_DEFAULT_LANGUAGE is invalid: '{}'", raw))?,
            Err(_) => system_language(),
        };

        let languages = match std::env::var("MESSAGE_KEYS_LANGUAGES") {
            Ok(raw) => parse_language_list(&raw).context("MESSAGE_KEYS_LANGUAGES is invalid")?,
            Err(_) => vec![LanguageCode::ENGLISH],
        };

        let debug = std::env::var("MESSAGE_KEYS_DEBUG")
            .ok()
            .and_then(|v| parse_bool(&v))
            .unwrap_or(false);

        Ok(Self {
            default_language,
            languages,
            debug,
        })
    }
}

/// Process default language from the OS locale, or English.
fn system_language() -> LanguageCode {
    sys_locale::get_locale()
        .and_then(|locale| LanguageCode::parse(&locale).ok())
        .unwrap_or(LanguageCode::ENGLISH)
}

/// Comma-separated codes, normalized, duplicates dropped, order kept.
fn parse_language_list(raw: &str) -> Result<Vec<LanguageCode>> {
    let mut languages: Vec<LanguageCode> = Vec::new();
    for entry in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let code = LanguageCode::parse(entry)
            .with_context(|| format!("invalid language code in list: '{}'", entry))?;
        if !languages.contains(&code) {
            languages.push(code);
        }
    }

    if languages.is_empty() {
        anyhow::bail!("no language codes given");
    }
    Ok(languages)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "t" | "yes" => Some(true),
        "false" | "0" | "f" | "no" => Some(false),
        _ => None,
    }
}
