//! Economic rules: mining rewards, fee floors and difficulty curves

use crate::transaction::{Transaction, TxKind};

/// Scales block complexity down to the required hash quality.
pub const BLOCK_EPOCH: u64 = 16;
/// Reward units minted per point of hash quality.
pub const REWARD_BASE: u64 = 32;
/// Scales block complexity down for the fee floor.
pub const FEE_EPOCH: u64 = 64;
/// Minimum fee paid for each transfer.
pub const BASE_FEE: u64 = 512;
/// Fee component that scales with payload size.
pub const FEE_SIZE_SCALAR: u64 = 32;
/// Fee component that scales with block complexity.
pub const FEE_COMPLEXITY_SCALAR: u64 = 128;
/// Number of variance values handed to a mining worker at a time.
pub const VARIANCE_CHUNK_SIZE: u64 = 131072;

/// The number of leading zero bits a block hash must show at the given
/// complexity: `floor(sqrt(complexity / BLOCK_EPOCH))`.
pub fn required_quality(complexity: u64) -> u64 {
    (complexity as f64 / BLOCK_EPOCH as f64).sqrt() as u64
}

/// The fee floor for a transfer carrying `size` payload bytes in a block of
/// the given complexity.
pub fn calculate_fee(size: u64, complexity: u64) -> u64 {
    BASE_FEE
        + FEE_SIZE_SCALAR * size
        + FEE_COMPLEXITY_SCALAR * (complexity as f64 / FEE_EPOCH as f64).sqrt() as u64
}

/// The reward a coinbase may claim: all transfer fees collected in the
/// block plus the quality-scaled base reward.
pub fn block_reward(complexity: u64, transactions: &[Transaction]) -> u64 {
    let fees: u64 = transactions
        .iter()
        .filter(|tx| tx.kind == TxKind::Transfer)
        .map(|tx| tx.fee)
        .sum();
    fees + required_quality(complexity) * REWARD_BASE
}
