//! Message keys: typed identities for localizable messages.
//!
//! Every localizable message is a zero-sized type implementing [`MessageKey`].
//! Two values of the same type are interchangeable; identity comes from the
//! type, never from the value. Declare keys with [`message_keys!`](crate::message_keys).

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

use tracing::{debug, error, info, warn};

use crate::i18n::registry::key_path;
use crate::i18n::{Context, FormatError, FormattedMessage, Resolver};

/// Structural identity of a message key variant.
///
/// Equality and hashing use the variant's `TypeId` only; the simple name is
/// carried along for diagnostics.
#[derive(Clone, Copy)]
pub struct KeyId {
    type_id: TypeId,
    name: &'static str,
}

impl KeyId {
    /// Identity of the variant `K`, labelled with its simple type name.
    pub fn of<K: 'static>(name: &'static str) -> Self {
        Self {
            type_id: TypeId::of::<K>(),
            name,
        }
    }

    /// Simple type name of the variant (e.g. `"Welcome"`).
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for KeyId {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for KeyId {}

impl Hash for KeyId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("KeyId").field(&self.name).finish()
    }
}

/// Severity accepted by [`MessageKey::log`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    Debug,
}

impl LogLevel {
    /// Parse a level name case-insensitively. Anything other than
    /// `INFO`, `WARN` or `ERROR` maps to [`LogLevel::Debug`].
    pub fn parse(level: &str) -> Self {
        match level.trim().to_ascii_uppercase().as_str() {
            "INFO" => LogLevel::Info,
            "WARN" => LogLevel::Warn,
            "ERROR" => LogLevel::Error,
            _ => LogLevel::Debug,
        }
    }
}

/// A distinct localizable message.
///
/// Implementors only supply their identity; display, logging and resolution
/// come for free. Use [`message_keys!`](crate::message_keys) rather than
/// implementing this by hand.
pub trait MessageKey: Send + Sync + 'static {
    /// Structural identity of this variant.
    fn key_id(&self) -> KeyId;

    /// Simple (unqualified) type name of this variant.
    fn simple_name(&self) -> &'static str;

    /// Canonical identifier: the lower-cased simple type name.
    ///
    /// Used as the store lookup path and as the last-resort display text.
    fn raw(&self) -> String {
        key_path("", self.simple_name())
    }

    /// The raw identifier wrapped as a displayable message.
    fn default_display(&self) -> FormattedMessage {
        FormattedMessage::key_fallback(self.raw())
    }

    /// Write the raw identifier to the log at `level`.
    fn log(&self, level: &str) {
        let message = self.raw();
        match LogLevel::parse(level) {
            LogLevel::Info => info!("{}", message),
            LogLevel::Warn => warn!("{}", message),
            LogLevel::Error => error!("{}", message),
            LogLevel::Debug => debug!("{}", message),
        }
    }

    /// Resolve this key without arguments for `ctx`.
    fn t(&self, resolver: &Resolver, ctx: &Context) -> Result<FormattedMessage, FormatError> {
        resolver.resolve(ctx, self, &[])
    }
}

/// Declare message key variants.
///
/// Each declaration becomes a unit struct implementing [`MessageKey`]:
///
/// ```rust
/// message_keys::message_keys! {
///     pub struct Welcome;
///     pub struct Goodbye;
/// }
///
/// use message_keys::i18n::MessageKey;
/// assert_eq!(Welcome.raw(), "welcome");
/// ```
#[macro_export]
macro_rules! message_keys {
    ($($(#[$meta:meta])* $vis:vis struct $name:ident;)*) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
            $vis struct $name;

            impl $crate::i18n::MessageKey for $name {
                fn key_id(&self) -> $crate::i18n::KeyId {
                    $crate::i18n::KeyId::of::<$name>(stringify!($name))
                }

                fn simple_name(&self) -> &'static str {
                    stringify!($name)
                }
            }
        )*
    };
}
