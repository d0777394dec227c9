//! Runtime localization with typed message keys.
//!
//! Each localizable message is a distinct type implementing
//! [`i18n::MessageKey`]. A [`localizer::Localizer`] built once at startup
//! holds the shared template store and resolves keys for a user or the
//! system, falling back to an explicit default or the key's identifier when no
//! translation exists. The auditor reports keys missing from a language.

pub mod config;
pub mod i18n;
pub mod localizer;
pub mod logging;

pub use config::Config;
pub use localizer::Localizer;
