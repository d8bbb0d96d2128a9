/// Transaction types for tallychain
use std::fmt;

use crate::account::{Address, Private, ADDRESS_SIZE, SIGNATURE_SIZE};
use crate::codec::{read_array, read_u64, write_bytes, write_u64};
use crate::error::{LedgerError, Result};
use crate::hash::{Hash, Hasher};

/// The all-zero address used where a slot is intentionally vacant, e.g. the
/// sender of a coinbase.
pub const EMPTY_ADDRESS: Address = [0u8; ADDRESS_SIZE];

/// Serialized size of every transaction field except the payload.
pub const TX_FIXED_SIZE: usize = 5 * 8 + 2 * ADDRESS_SIZE + SIGNATURE_SIZE;

/// Maximum serialized transaction size accepted from the wire (100KB).
pub const MAX_TRANSACTION_SIZE: usize = 100_000;

/// The three transaction kinds, in their wire encoding order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxKind {
    /// Mints the block reward to the miner.
    Coinbase = 0,
    /// Announces an account's public key under its address.
    Account = 1,
    /// Moves funds from a known sender to a known recipient.
    Transfer = 2,
}

impl TxKind {
    pub fn from_u64(value: u64) -> Option<Self> {
        match value {
            0 => Some(TxKind::Coinbase),
            1 => Some(TxKind::Account),
            2 => Some(TxKind::Transfer),
            _ => None,
        }
    }
}

/// A single signed operation recorded on the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub chain: u64,
    pub kind: TxKind,
    pub sender: Address,
    pub recipient: Address,
    pub amount: u64,
    pub fee: u64,
    pub timestamp: u64,
    pub proof: [u8; SIGNATURE_SIZE],
    pub data: Vec<u8>,
}

impl Transaction {
    /// Serialize to the binary wire format.
    pub fn bytes(&self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(TX_FIXED_SIZE + self.data.len());
        // The writers below cannot fail on a Vec.
        let _ = write_u64(&mut buffer, self.chain);
        let _ = write_u64(&mut buffer, self.kind as u64);
        let _ = write_u64(&mut buffer, self.amount);
        let _ = write_u64(&mut buffer, self.fee);
        let _ = write_u64(&mut buffer, self.timestamp);
        let _ = write_bytes(&mut buffer, &self.sender);
        let _ = write_bytes(&mut buffer, &self.recipient);
        let _ = write_bytes(&mut buffer, &self.proof);
        let _ = write_bytes(&mut buffer, &self.data);
        buffer
    }

    /// Parse a transaction from its binary wire format. The payload is
    /// whatever remains after the fixed-width fields.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut source = bytes;
        let chain = read_u64(&mut source)?;
        let kind_raw = read_u64(&mut source)?;
        let kind = TxKind::from_u64(kind_raw)
            .ok_or_else(|| LedgerError::MalformedInput(format!("Unknown kind {}", kind_raw)))?;
        let amount = read_u64(&mut source)?;
        let fee = read_u64(&mut source)?;
        let timestamp = read_u64(&mut source)?;
        let sender = read_array::<ADDRESS_SIZE, _>(&mut source)?;
        let recipient = read_array::<ADDRESS_SIZE, _>(&mut source)?;
        let proof = read_array::<SIGNATURE_SIZE, _>(&mut source)?;
        let data = source.to_vec();

        Ok(Transaction {
            chain,
            kind,
            sender,
            recipient,
            amount,
            fee,
            timestamp,
            proof,
            data,
        })
    }

    /// Hash over every field except the proof. This is what the authorizing
    /// account signs.
    pub fn partial_hash(&self) -> Hash {
        let mut hasher = Hasher::new();
        hasher.write_u64(self.chain);
        hasher.write_u64(self.kind as u64);
        hasher.write_u64(self.amount);
        hasher.write_u64(self.fee);
        hasher.write_u64(self.timestamp);
        hasher.write(&self.sender);
        hasher.write(&self.recipient);
        hasher.write(&self.data);
        hasher.sum()
    }

    /// The transaction identity: partial hash chained with the proof.
    pub fn hash(&self) -> Hash {
        let mut hasher = Hasher::new();
        hasher.write(&self.partial_hash());
        hasher.write(&self.proof);
        hasher.sum()
    }

    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash())
    }

    /// Build a coinbase minting `amount` to the miner.
    pub fn coinbase(chain: u64, miner: &Private, amount: u64, timestamp: u64) -> Result<Self> {
        let mut tx = Transaction {
            chain,
            kind: TxKind::Coinbase,
            sender: EMPTY_ADDRESS,
            recipient: miner.address(),
            amount,
            fee: 0,
            timestamp,
            proof: [0u8; SIGNATURE_SIZE],
            data: miner.public_key_bytes().to_vec(),
        };
        tx.proof = miner.sign(&tx.partial_hash())?;
        Ok(tx)
    }

    /// Build an announcement publishing the account's public key.
    pub fn announce(chain: u64, owner: &Private, timestamp: u64) -> Result<Self> {
        let mut tx = Transaction {
            chain,
            kind: TxKind::Account,
            sender: owner.address(),
            recipient: EMPTY_ADDRESS,
            amount: 0,
            fee: 0,
            timestamp,
            proof: [0u8; SIGNATURE_SIZE],
            data: owner.public_key_bytes().to_vec(),
        };
        tx.proof = owner.sign(&tx.partial_hash())?;
        Ok(tx)
    }

    /// Build a transfer of `amount` from the signer to `recipient` with an
    /// optional payload.
    pub fn transfer(
        chain: u64,
        amount: u64,
        fee: u64,
        from: &Private,
        recipient: Address,
        payload: Vec<u8>,
        timestamp: u64,
    ) -> Result<Self> {
        let mut tx = Transaction {
            chain,
            kind: TxKind::Transfer,
            sender: from.address(),
            recipient,
            amount,
            fee,
            timestamp,
            proof: [0u8; SIGNATURE_SIZE],
            data: payload,
        };
        tx.proof = from.sign(&tx.partial_hash())?;
        Ok(tx)
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            TxKind::Coinbase => write!(
                f,
                "TX Coinbase [miner = {}; reward = {}]",
                hex::encode(self.recipient),
                self.amount
            ),
            TxKind::Account => {
                write!(f, "TX Account [address = {}]", hex::encode(self.sender))
            }
            TxKind::Transfer => write!(
                f,
                "TX Transfer [from = {}; to = {}; amount = {}; fee = {}]",
                hex::encode(self.sender),
                hex::encode(self.recipient),
                self.amount,
                self.fee
            ),
        }
    }
}
