//! Address book mapping account addresses to their public keys and funds
//!
//! The address book is the state the chain operates on. Block verification
//! works against a cloned snapshot, so a rejected block never touches the
//! live book.

use std::collections::BTreeMap;

use crate::account::{Address, Public};

/// State kept per known address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressEntry {
    pub address: Address,
    pub account: Public,
    pub funds: u64,
}

impl AddressEntry {
    /// Create an entry for a freshly announced account with no funds.
    pub fn new(account: Public) -> Self {
        AddressEntry {
            address: account.address(),
            account,
            funds: 0,
        }
    }
}

/// Ordered map from address to account state.
///
/// Keys are compared lexicographically by address bytes. Cloning the book
/// yields the snapshot used as the transactional boundary during block
/// verification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressBook {
    entries: BTreeMap<Address, AddressEntry>,
}

impl AddressBook {
    pub fn new() -> Self {
        AddressBook::default()
    }

    pub fn get(&self, address: &Address) -> Option<&AddressEntry> {
        self.entries.get(address)
    }

    pub fn get_mut(&mut self, address: &Address) -> Option<&mut AddressEntry> {
        self.entries.get_mut(address)
    }

    /// Insert or replace the entry under its own address.
    pub fn insert(&mut self, entry: AddressEntry) {
        self.entries.insert(entry.address, entry);
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.entries.contains_key(address)
    }

    /// Funds held by an address; unknown addresses hold nothing.
    pub fn funds(&self, address: &Address) -> u64 {
        self.entries.get(address).map_or(0, |entry| entry.funds)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in address order.
    pub fn iter(&self) -> impl Iterator<Item = &AddressEntry> {
        self.entries.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::Private;

    #[test]
    fn entries_are_ordered_by_address() {
        let mut book = AddressBook::new();
        for _ in 0..8 {
            book.insert(AddressEntry::new(Private::generate().public()));
        }

        let addresses: Vec<Address> = book.iter().map(|entry| entry.address).collect();
        let mut sorted = addresses.clone();
        sorted.sort();
        assert_eq!(addresses, sorted);
    }

    #[test]
    fn entry_address_matches_account() {
        let private = Private::generate();
        let entry = AddressEntry::new(private.public());
        assert_eq!(entry.address, private.address());
        assert_eq!(entry.funds, 0);
    }

    #[test]
    fn snapshot_isolation() {
        let private = Private::generate();
        let mut book = AddressBook::new();
        book.insert(AddressEntry::new(private.public()));

        let mut snapshot = book.clone();
        snapshot
            .get_mut(&private.address())
            .expect("entry exists")
            .funds = 1024;

        assert_eq!(book.funds(&private.address()), 0);
        assert_eq!(snapshot.funds(&private.address()), 1024);
    }

    #[test]
    fn unknown_address_has_no_funds() {
        let book = AddressBook::new();
        assert_eq!(book.funds(&[7u8; 32]), 0);
        assert!(!book.contains(&[7u8; 32]));
        assert!(book.is_empty());
    }
}
