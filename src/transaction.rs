//! Transaction module split into types and validation for better modularity

pub mod types;
pub mod validation;

pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::{Private, SIGNATURE_SIZE};
    use crate::addressbook::{AddressBook, AddressEntry};
    use crate::economics::calculate_fee;
    use crate::error::LedgerError;

    fn funded_book(owner: &Private, funds: u64) -> AddressBook {
        let mut book = AddressBook::new();
        let mut entry = AddressEntry::new(owner.public());
        entry.funds = funds;
        book.insert(entry);
        book
    }

    #[test]
    fn roundtrip_coinbase() {
        let miner = Private::generate();
        let tx = Transaction::coinbase(7, &miner, 32, 1234).unwrap();
        let decoded = Transaction::from_bytes(&tx.bytes()).unwrap();
        assert_eq!(decoded, tx);
        assert_eq!(decoded.hash(), tx.hash());
    }

    #[test]
    fn roundtrip_transfer_with_payload() {
        let sender = Private::generate();
        let recipient = Private::generate();
        let tx = Transaction::transfer(
            7,
            100,
            700,
            &sender,
            recipient.address(),
            b"invoice 42".to_vec(),
            1234,
        )
        .unwrap();
        let decoded = Transaction::from_bytes(&tx.bytes()).unwrap();
        assert_eq!(decoded, tx);
        assert_eq!(decoded.data, b"invoice 42");
    }

    #[test]
    fn truncated_bytes_rejected() {
        let miner = Private::generate();
        let tx = Transaction::coinbase(0, &miner, 32, 0).unwrap();
        let bytes = tx.bytes();
        let result = Transaction::from_bytes(&bytes[..bytes.len() - 80]);
        assert!(matches!(result, Err(LedgerError::MalformedInput(_))));
    }

    #[test]
    fn unknown_kind_rejected() {
        let miner = Private::generate();
        let tx = Transaction::coinbase(0, &miner, 32, 0).unwrap();
        let mut bytes = tx.bytes();
        bytes[8] = 9;
        assert!(matches!(
            Transaction::from_bytes(&bytes),
            Err(LedgerError::MalformedInput(_))
        ));
    }

    #[test]
    fn proof_excluded_from_partial_hash() {
        let miner = Private::generate();
        let mut tx = Transaction::coinbase(0, &miner, 32, 0).unwrap();
        let partial = tx.partial_hash();
        let full = tx.hash();

        tx.proof = [0xabu8; SIGNATURE_SIZE];
        assert_eq!(tx.partial_hash(), partial);
        assert_ne!(tx.hash(), full);
    }

    #[test]
    fn coinbase_proof_verifies() {
        let miner = Private::generate();
        let tx = Transaction::coinbase(0, &miner, 32, 0).unwrap();
        assert!(tx.verify_proof(&AddressBook::new()));
    }

    #[test]
    fn coinbase_proof_rejects_wrong_recipient() {
        let miner = Private::generate();
        let other = Private::generate();
        let mut tx = Transaction::coinbase(0, &miner, 32, 0).unwrap();
        tx.recipient = other.address();
        assert!(!tx.verify_proof(&AddressBook::new()));
    }

    #[test]
    fn announcement_proof_verifies() {
        let owner = Private::generate();
        let tx = Transaction::announce(0, &owner, 0).unwrap();
        assert!(tx.verify_proof(&AddressBook::new()));
    }

    #[test]
    fn transfer_proof_requires_known_sender() {
        let sender = Private::generate();
        let recipient = Private::generate();
        let tx =
            Transaction::transfer(0, 1, 512, &sender, recipient.address(), Vec::new(), 0).unwrap();

        assert!(!tx.verify_proof(&AddressBook::new()));
        assert!(tx.verify_proof(&funded_book(&sender, 1024)));
    }

    #[test]
    fn transfer_proof_rejects_foreign_signature() {
        let sender = Private::generate();
        let recipient = Private::generate();
        let forger = Private::generate();

        let mut tx =
            Transaction::transfer(0, 1, 512, &sender, recipient.address(), Vec::new(), 0).unwrap();
        tx.proof = forger.sign(&tx.partial_hash()).unwrap();
        assert!(!tx.verify_proof(&funded_book(&sender, 1024)));
    }

    #[test]
    fn fee_rules_per_kind() {
        let miner = Private::generate();
        let sender = Private::generate();
        let recipient = Private::generate();

        let coinbase = Transaction::coinbase(0, &miner, 33, 0).unwrap();
        assert!(!coinbase.verify_fees(32, 0));
        assert!(coinbase.verify_fees(33, 0));

        let announce = Transaction::announce(0, &sender, 0).unwrap();
        assert!(announce.verify_fees(0, u64::MAX));

        let floor = calculate_fee(0, 64);
        let transfer = Transaction::transfer(
            0,
            1,
            floor - 1,
            &sender,
            recipient.address(),
            Vec::new(),
            0,
        )
        .unwrap();
        assert!(!transfer.verify_fees(0, 64));
        assert!(transfer.verify_fees(0, 0));
    }

    #[test]
    fn coinbase_apply_creates_and_credits() {
        let miner = Private::generate();
        let tx = Transaction::coinbase(0, &miner, 32, 0).unwrap();

        let mut book = AddressBook::new();
        tx.apply(&mut book).unwrap();
        assert_eq!(book.funds(&miner.address()), 32);

        tx.apply(&mut book).unwrap();
        assert_eq!(book.funds(&miner.address()), 64);
    }

    #[test]
    fn announcement_apply_registers_account() {
        let owner = Private::generate();
        let tx = Transaction::announce(0, &owner, 0).unwrap();

        let mut book = AddressBook::new();
        tx.apply(&mut book).unwrap();
        let entry = book.get(&owner.address()).unwrap();
        assert_eq!(entry.funds, 0);
        assert_eq!(entry.account.public_key_bytes(), owner.public_key_bytes());
    }

    #[test]
    fn announcement_apply_rejects_key_rotation() {
        let owner = Private::generate();
        let imposter = Private::generate();

        let mut book = funded_book(&owner, 100);
        let mut tx = Transaction::announce(0, &owner, 0).unwrap();
        tx.data = imposter.public_key_bytes().to_vec();

        assert!(tx.apply(&mut book).is_err());
        assert_eq!(book.funds(&owner.address()), 100);
    }

    #[test]
    fn transfer_apply_moves_funds() {
        let sender = Private::generate();
        let recipient = Private::generate();

        let mut book = funded_book(&sender, 2000);
        book.insert(AddressEntry::new(recipient.public()));

        let tx =
            Transaction::transfer(0, 300, 512, &sender, recipient.address(), Vec::new(), 0)
                .unwrap();
        tx.apply(&mut book).unwrap();

        assert_eq!(book.funds(&sender.address()), 2000 - 300 - 512);
        assert_eq!(book.funds(&recipient.address()), 300);
    }

    #[test]
    fn transfer_apply_requires_both_entries() {
        let sender = Private::generate();
        let recipient = Private::generate();

        let tx =
            Transaction::transfer(0, 1, 512, &sender, recipient.address(), Vec::new(), 0).unwrap();

        let mut empty = AddressBook::new();
        assert!(tx.apply(&mut empty).is_err());

        let mut sender_only = funded_book(&sender, 2000);
        assert!(tx.apply(&mut sender_only).is_err());
        assert_eq!(sender_only.funds(&sender.address()), 2000);
    }

    #[test]
    fn transfer_apply_rejects_insufficient_funds() {
        let sender = Private::generate();
        let recipient = Private::generate();

        let mut book = funded_book(&sender, 500);
        book.insert(AddressEntry::new(recipient.public()));

        let tx =
            Transaction::transfer(0, 100, 512, &sender, recipient.address(), Vec::new(), 0)
                .unwrap();
        assert!(tx.apply(&mut book).is_err());
        assert_eq!(book.funds(&sender.address()), 500);
        assert_eq!(book.funds(&recipient.address()), 0);
    }

    #[test]
    fn transfer_apply_rejects_debit_overflow() {
        let sender = Private::generate();
        let recipient = Private::generate();

        let mut book = funded_book(&sender, u64::MAX);
        book.insert(AddressEntry::new(recipient.public()));

        let tx = Transaction::transfer(
            0,
            u64::MAX,
            u64::MAX,
            &sender,
            recipient.address(),
            Vec::new(),
            0,
        )
        .unwrap();

        let before = book.clone();
        assert!(tx.apply(&mut book).is_err());
        assert_eq!(book, before);
    }

    #[test]
    fn transfer_apply_rejects_credit_overflow() {
        let sender = Private::generate();
        let recipient = Private::generate();

        let mut book = funded_book(&sender, 2000);
        let mut entry = AddressEntry::new(recipient.public());
        entry.funds = u64::MAX;
        book.insert(entry);

        let tx =
            Transaction::transfer(0, 1, 512, &sender, recipient.address(), Vec::new(), 0).unwrap();

        let before = book.clone();
        assert!(tx.apply(&mut book).is_err());
        assert_eq!(book, before);
    }

    #[test]
    fn self_transfer_nets_to_fee() {
        let sender = Private::generate();

        let mut book = funded_book(&sender, 2000);
        let tx =
            Transaction::transfer(0, 100, 512, &sender, sender.address(), Vec::new(), 0).unwrap();
        tx.apply(&mut book).unwrap();

        assert_eq!(book.funds(&sender.address()), 2000 - 512);
    }
}
