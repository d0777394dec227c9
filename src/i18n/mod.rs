//! Internationalization (i18n) module: typed message keys resolved to text.
//!
//! # Architecture
//!
//! - `key`: The `MessageKey` trait and the `message_keys!` declaration macro
//! - `registry`: Explicit registration and discovery of every key variant
//! - `language`: Normalized language codes with English as the fallback
//! - `store`: Per-language templates shared across threads
//! - `pack`: Complete language mappings, built by hand or from a parsed tree
//! - `format`: printf-style template formatting
//! - `context`: User or system resolution context
//! - `resolver`: Template lookup, formatting and the fallback chain
//! - `audit`: Missing-translation reports
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use message_keys::args;
//! use message_keys::i18n::{Context, LanguageCode, MessageStore, Resolver};
//!
//! message_keys::message_keys! {
//!     pub struct Welcome;
//! }
//!
//! let store = Arc::new(MessageStore::new());
//! store.put(&LanguageCode::ENGLISH, &Welcome, "Hello, %s!");
//!
//! let resolver = Resolver::new(store, LanguageCode::ENGLISH);
//! let message = resolver.resolve(&Context::user("en"), &Welcome, &args!["Ann"]).unwrap();
//! assert_eq!(message.text, "Hello, Ann!");
//! ```

mod audit;
mod context;
mod format;
mod key;
mod language;
mod pack;
mod registry;
mod resolver;
mod store;

pub use audit::{AuditReport, Auditor};
pub use context::{Context, Localized};
pub use format::{format, Arg, FormatError, MAX_WIDTH};
pub use key::{KeyId, LogLevel, MessageKey};
pub use language::{LanguageCode, LanguageCodeError};
pub use pack::{LanguagePack, VERSION_FIELD};
pub use registry::{
    key_path, DiscoveredKeys, InstantiationError, KeyDescriptor, KeyFactory, KeyRegistry,
    KeyRegistryBuilder,
};
pub use resolver::{FormattedMessage, MessageOrigin, Resolver};
pub use store::{LanguageMessages, MessageStore, MessageTemplate};
