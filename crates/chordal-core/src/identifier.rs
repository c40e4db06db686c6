//! Identifier management using string interning for efficient storage and comparison.
//!
//! This module provides the [`Id`] type with an efficient string-interner based approach.
//! Element and relationship identities originate in the host model, which hands out
//! stable string identifiers; interning them keeps index lookups cheap during a
//! refresh pass.

use std::{
    fmt,
    sync::{Mutex, OnceLock},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for efficient identifier storage.
///
/// # Thread Safety
///
/// This uses `Mutex` for thread-safe access to the string interner.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

/// Efficient identifier type using string interning.
///
/// Identities are stable for the lifetime of the process: two `Id`s created
/// from the same string are equal and hash identically.
///
/// # Examples
///
/// ```
/// use chordal_core::identifier::Id;
///
/// let order_service = Id::new("order_service");
/// let same = Id::new("order_service");
/// assert_eq!(order_service, same);
/// assert_eq!(order_service.to_string(), "order_service");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from &str.
    ///
    /// # Arguments
    ///
    /// * `name` - The string representation of the identifier
    pub fn new(name: &str) -> Self {
        let mut interner = INTERNER
            .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
            .lock()
            .expect("Failed to acquire interner lock");
        let symbol = interner.get_or_intern(name);
        Self(symbol)
    }

    /// Resolves the identifier back to its string representation.
    pub fn as_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = INTERNER
            .get()
            .expect("Interner must be initialized before display")
            .lock()
            .expect("Failed to acquire interner lock");
        let name = interner
            .resolve(self.0)
            .expect("Id symbol should exist in interner");
        write!(f, "{name}")
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_equality_and_interning() {
        let a = Id::new("model::payments");
        let b = Id::new("model::payments");
        let c = Id::new("model::billing");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_id_display_round_trip() {
        let id = Id::new("Account");
        assert_eq!(id.to_string(), "Account");
        assert_eq!(id, "Account");
    }
}
