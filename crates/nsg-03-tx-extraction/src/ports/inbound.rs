//! # Inbound Ports
//!
//! Address resolution supplied by the wallet layer.

use std::collections::HashMap;

/// Maps an address to the account key that subscribes to it.
///
/// Treated as a pure lookup.
pub trait AddressResolver: Send + Sync {
    /// Account key owning `address`, if any.
    fn resolve(&self, address: &str) -> Option<String>;
}

impl<F> AddressResolver for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn resolve(&self, address: &str) -> Option<String> {
        self(address)
    }
}

/// Fixed address → account key table.
#[derive(Clone, Debug, Default)]
pub struct AddressBook {
    entries: HashMap<String, String>,
}

impl AddressBook {
    /// Empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Book from `(address, account key)` pairs.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            entries: pairs
                .into_iter()
                .map(|(address, key)| (address.to_string(), key.to_string()))
                .collect(),
        }
    }

    /// Subscribe `address` under `account_key`.
    pub fn insert(&mut self, address: impl Into<String>, account_key: impl Into<String>) {
        self.entries.insert(address.into(), account_key.into());
    }

    /// Number of watched addresses.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is watched.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl AddressResolver for AddressBook {
    fn resolve(&self, address: &str) -> Option<String> {
        self.entries.get(address).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_book() {
        let mut book = AddressBook::from_pairs([("NA", "a")]);
        book.insert("NB", "b");
        assert_eq!(book.resolve("NA").as_deref(), Some("a"));
        assert_eq!(book.resolve("NB").as_deref(), Some("b"));
        assert_eq!(book.resolve("NC"), None);
        assert_eq!(book.len(), 2);
    }
}
