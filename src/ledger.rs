//! The append-only chain, its live address book and its serialized form

use std::io::{Read, Write};

use crate::account::Private;
use crate::addressbook::AddressBook;
use crate::block::Block;
use crate::codec::{read_u64, write_bytes, write_u64};
use crate::error::{LedgerError, Result};
use crate::miner;

/// A single local chain. The address book always equals the state obtained
/// by replaying every block in order from the empty book.
///
/// The ledger is single-writer: callers coordinate exclusive access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    pub chain: u64,
    pub blocks: Vec<Block>,
    pub addresses: AddressBook,
}

impl Ledger {
    pub fn new(chain: u64) -> Self {
        Ledger {
            chain,
            blocks: Vec::new(),
            addresses: AddressBook::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// The current tip.
    pub fn last(&self) -> Result<&Block> {
        self.blocks.last().ok_or(LedgerError::EmptyLedger)
    }

    /// Verify a block against the current state and append it. On any
    /// failure both the block list and the address book are left exactly
    /// as they were.
    pub fn append(&mut self, block: Block) -> Result<()> {
        if let Some(last) = self.blocks.last() {
            block.successor_of(last)?;
        }
        let addresses = block.verify(&self.addresses)?;
        self.addresses = addresses;
        self.blocks.push(block);
        Ok(())
    }

    /// Reset the chain and seed it with a freshly mined genesis block.
    pub fn init(&mut self, complexity: u64, creator: &Private, timestamp: u64) -> Result<()> {
        self.blocks.clear();
        self.addresses = AddressBook::new();
        let genesis = Block::genesis(self.chain, complexity, timestamp, creator)?;
        self.append(miner::find(&genesis))
    }

    /// Serialize the whole chain.
    pub fn write_to<W: Write>(&self, sink: &mut W) -> Result<()> {
        write_u64(sink, self.chain)?;
        write_u64(sink, self.blocks.len() as u64)?;
        for block in &self.blocks {
            write_bytes(sink, &block.bytes())?;
        }
        Ok(())
    }

    /// Restore a chain, re-verifying every block through the full append
    /// discipline so the address book is rebuilt along the way. On failure
    /// the blocks read so far remain applied.
    pub fn read_from<R: Read>(&mut self, source: &mut R) -> Result<()> {
        self.blocks.clear();
        self.addresses = AddressBook::new();
        self.chain = read_u64(source)?;
        let count = read_u64(source)?;
        for _ in 0..count {
            let block = Block::read_from(source)?;
            self.append(block)?;
        }
        Ok(())
    }
}
