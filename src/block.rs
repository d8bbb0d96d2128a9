//! Block structure, proof-of-work compliance and verification

use std::fmt;
use std::io::Read;

use crate::account::Private;
use crate::addressbook::AddressBook;
use crate::codec::{read_array, read_u64, read_vec, write_bytes, write_u64};
use crate::economics::{block_reward, required_quality};
use crate::error::{LedgerError, Result};
use crate::hash::{Hash, Hasher, HASH_SIZE};
use crate::transaction::{Transaction, TxKind, MAX_TRANSACTION_SIZE, TX_FIXED_SIZE};

/// A block: five header integers, the hash of the predecessor and an
/// ordered transaction list whose first element must be the coinbase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub chain: u64,
    pub index: u64,
    pub complexity: u64,
    pub timestamp: u64,
    pub variance: u64,
    pub previous_hash: Hash,
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// Build the genesis block for a chain, carrying a single coinbase for
    /// the creator.
    pub fn genesis(chain: u64, complexity: u64, timestamp: u64, creator: &Private) -> Result<Self> {
        let coinbase =
            Transaction::coinbase(chain, creator, block_reward(complexity, &[]), timestamp)?;
        Ok(Block {
            chain,
            index: 0,
            complexity,
            timestamp,
            variance: 0,
            previous_hash: [0u8; HASH_SIZE],
            transactions: vec![coinbase],
        })
    }

    /// Build the empty follow-up block of `prev`.
    pub fn next(prev: &Block, timestamp: u64) -> Self {
        Block {
            chain: prev.chain,
            index: prev.index + 1,
            complexity: prev.complexity + 1,
            timestamp,
            variance: 0,
            previous_hash: prev.hash(),
            transactions: Vec::new(),
        }
    }

    pub fn push(&mut self, tx: Transaction) {
        self.transactions.push(tx);
    }

    /// The block identity: double-SHA-256 over the header integers, the
    /// previous hash and every transaction hash.
    pub fn hash(&self) -> Hash {
        let mut hasher = Hasher::new();
        hasher.write_u64(self.chain);
        hasher.write_u64(self.index);
        hasher.write_u64(self.complexity);
        hasher.write_u64(self.timestamp);
        hasher.write_u64(self.variance);
        hasher.write(&self.previous_hash);
        for tx in &self.transactions {
            hasher.write(&tx.hash());
        }
        hasher.sum()
    }

    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash())
    }

    /// The first 16 hex characters of the block hash, for display.
    pub fn fingerprint(&self) -> String {
        self.hash_hex()[..16].to_string()
    }

    /// Whether the block hash shows the quality required at its complexity.
    pub fn compliant(&self) -> bool {
        meets_quality(&self.hash(), required_quality(self.complexity))
    }

    /// Verify the block against a prior address-book snapshot. On success
    /// the mutated clone is returned; on failure the error names the first
    /// offending transaction and `fallback` is untouched.
    pub fn verify(&self, fallback: &AddressBook) -> Result<AddressBook> {
        if !self.compliant() {
            return Err(LedgerError::NotCompliant);
        }
        if self.transactions.is_empty() {
            return Err(LedgerError::EmptyBlock);
        }
        let mut book = fallback.clone();
        let reward = block_reward(self.complexity, &self.transactions);
        for (i, tx) in self.transactions.iter().enumerate() {
            if (tx.kind == TxKind::Coinbase) != (i == 0) {
                return Err(LedgerError::CoinbasePlacement(i));
            }
            if !tx.verify_fees(reward, self.complexity) {
                return Err(LedgerError::BadFees(i));
            }
            if !tx.verify_proof(&book) {
                return Err(LedgerError::BadProof(i));
            }
            tx.apply(&mut book)
                .map_err(|reason| LedgerError::BadApplication(i, reason))?;
        }
        Ok(book)
    }

    /// Check that this block directly extends `prev`.
    pub fn successor_of(&self, prev: &Block) -> Result<()> {
        if self.chain != prev.chain {
            return Err(LedgerError::NotSuccessor("Chain id should match".to_string()));
        }
        if self.index != prev.index + 1 {
            return Err(LedgerError::NotSuccessor(format!(
                "Index should be {}, got {}",
                prev.index + 1,
                self.index
            )));
        }
        if self.complexity != prev.complexity + 1 {
            return Err(LedgerError::NotSuccessor(format!(
                "Complexity should be {}, got {}",
                prev.complexity + 1,
                self.complexity
            )));
        }
        if self.timestamp < prev.timestamp {
            return Err(LedgerError::NotSuccessor(
                "Timestamp should not be older than the previous block".to_string(),
            ));
        }
        if self.previous_hash != prev.hash() {
            return Err(LedgerError::NotSuccessor(
                "Previous hash should match the hash of the previous block".to_string(),
            ));
        }
        Ok(())
    }

    /// Serialize to the binary wire format.
    pub fn bytes(&self) -> Vec<u8> {
        let mut buffer = Vec::new();
        let _ = write_u64(&mut buffer, self.chain);
        let _ = write_u64(&mut buffer, self.index);
        let _ = write_u64(&mut buffer, self.complexity);
        let _ = write_u64(&mut buffer, self.timestamp);
        let _ = write_u64(&mut buffer, self.variance);
        let _ = write_u64(&mut buffer, self.transactions.len() as u64);
        let _ = write_bytes(&mut buffer, &self.previous_hash);
        for tx in &self.transactions {
            let tx_bytes = tx.bytes();
            let _ = write_u64(&mut buffer, tx_bytes.len() as u64);
            let _ = write_bytes(&mut buffer, &tx_bytes);
        }
        buffer
    }

    /// Parse a block from a byte stream.
    pub fn read_from<R: Read>(source: &mut R) -> Result<Self> {
        let chain = read_u64(source)?;
        let index = read_u64(source)?;
        let complexity = read_u64(source)?;
        let timestamp = read_u64(source)?;
        let variance = read_u64(source)?;
        let tx_count = read_u64(source)?;
        let previous_hash = read_array::<HASH_SIZE, _>(source)?;

        let mut transactions = Vec::new();
        for _ in 0..tx_count {
            let tx_size = read_u64(source)? as usize;
            if tx_size < TX_FIXED_SIZE || tx_size > MAX_TRANSACTION_SIZE {
                return Err(LedgerError::MalformedInput(format!(
                    "Implausible transaction size {}",
                    tx_size
                )));
            }
            let tx_bytes = read_vec(source, tx_size)?;
            transactions.push(Transaction::from_bytes(&tx_bytes)?);
        }

        Ok(Block {
            chain,
            index,
            complexity,
            timestamp,
            variance,
            previous_hash,
            transactions,
        })
    }

    /// Parse a block from a byte slice.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Block::read_from(&mut &bytes[..])
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Block [chain = {}; index = {}; fingerprint = {}; quality = {}]",
            self.chain,
            self.index,
            self.fingerprint(),
            required_quality(self.complexity)
        )
    }
}

/// Whether a hash starts with at least `required` zero bits. A hash of all
/// zeros satisfies any requirement up to 256 bits; beyond that nothing
/// qualifies.
pub fn meets_quality(hash: &Hash, required: u64) -> bool {
    let mut remaining = required;
    for byte in hash {
        let leading = byte.leading_zeros() as u64;
        if remaining <= leading {
            return true;
        }
        if leading < 8 {
            return false;
        }
        remaining -= 8;
    }
    false
}
