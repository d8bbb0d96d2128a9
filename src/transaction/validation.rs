/// Validation logic for transactions separated from type definitions
use crate::account::Public;
use crate::addressbook::{AddressBook, AddressEntry};
use crate::economics::calculate_fee;
use crate::transaction::types::{Transaction, TxKind};

impl Transaction {
    /// Check that the transaction was authorized by the account it spends
    /// from. Coinbase and announcement proofs verify against the key
    /// carried in the payload; transfers verify against the key already
    /// recorded in the address book.
    pub fn verify_proof(&self, addresses: &AddressBook) -> bool {
        match self.kind {
            TxKind::Coinbase => {
                let public = match Public::from_bytes(&self.data) {
                    Ok(public) => public,
                    Err(_) => return false,
                };
                public.address() == self.recipient
                    && public.verify(&self.partial_hash(), &self.proof)
            }
            TxKind::Account => {
                let public = match Public::from_bytes(&self.data) {
                    Ok(public) => public,
                    Err(_) => return false,
                };
                public.address() == self.sender && public.verify(&self.partial_hash(), &self.proof)
            }
            TxKind::Transfer => match addresses.get(&self.sender) {
                Some(entry) => {
                    entry.address == self.sender
                        && entry.account.verify(&self.partial_hash(), &self.proof)
                }
                None => false,
            },
        }
    }

    /// Check the fee rules against the block reward and complexity.
    pub fn verify_fees(&self, reward: u64, complexity: u64) -> bool {
        match self.kind {
            TxKind::Coinbase => self.amount <= reward,
            TxKind::Account => true,
            TxKind::Transfer => self.fee >= calculate_fee(self.data.len() as u64, complexity),
        }
    }

    /// Apply the state transition to the address book. On failure the book
    /// is left untouched and the rejection reason is returned.
    pub fn apply(&self, addresses: &mut AddressBook) -> std::result::Result<(), String> {
        match self.kind {
            TxKind::Coinbase => {
                if let Some(entry) = addresses.get_mut(&self.recipient) {
                    entry.funds = entry
                        .funds
                        .checked_add(self.amount)
                        .ok_or_else(|| "Recipient funds overflow".to_string())?;
                    return Ok(());
                }
                let account = Public::from_bytes(&self.data).map_err(|e| e.to_string())?;
                let mut entry = AddressEntry::new(account);
                if entry.address != self.recipient {
                    return Err("Recipient does not match the announced key".to_string());
                }
                entry.funds = self.amount;
                addresses.insert(entry);
                Ok(())
            }
            TxKind::Account => {
                if let Some(entry) = addresses.get(&self.sender) {
                    // Rotating the key behind an existing address is not
                    // allowed.
                    if entry.account.public_key_bytes().as_slice() != self.data.as_slice() {
                        return Err("Announced key does not match the known account".to_string());
                    }
                    return Ok(());
                }
                let account = Public::from_bytes(&self.data).map_err(|e| e.to_string())?;
                let entry = AddressEntry::new(account);
                if entry.address != self.sender {
                    return Err("Sender does not match the announced key".to_string());
                }
                addresses.insert(entry);
                Ok(())
            }
            TxKind::Transfer => {
                let debit = self
                    .fee
                    .checked_add(self.amount)
                    .ok_or_else(|| "Fee and amount overflow".to_string())?;
                let sender_funds = addresses
                    .get(&self.sender)
                    .ok_or_else(|| "Sender is not known".to_string())?
                    .funds;
                let recipient_funds = addresses
                    .get(&self.recipient)
                    .ok_or_else(|| "Recipient is not known".to_string())?
                    .funds;
                if sender_funds < debit {
                    return Err(format!(
                        "Insufficient funds: required {}, available {}",
                        debit, sender_funds
                    ));
                }

                if self.sender == self.recipient {
                    // A self-transfer nets out to the fee.
                    if let Some(entry) = addresses.get_mut(&self.sender) {
                        entry.funds = sender_funds - debit + self.amount;
                    }
                } else {
                    let credited = recipient_funds
                        .checked_add(self.amount)
                        .ok_or_else(|| "Recipient funds overflow".to_string())?;
                    if let Some(entry) = addresses.get_mut(&self.sender) {
                        entry.funds = sender_funds - debit;
                    }
                    if let Some(entry) = addresses.get_mut(&self.recipient) {
                        entry.funds = credited;
                    }
                }
                Ok(())
            }
        }
    }
}
