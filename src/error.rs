//! Error types for tallychain

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    MalformedInput(String),
    NotCompliant,
    EmptyBlock,
    CoinbasePlacement(usize),
    BadFees(usize),
    BadProof(usize),
    BadApplication(usize, String),
    NotSuccessor(String),
    EmptyLedger,
    CryptoError(String),
    WalletError(String),
    IoError(String),
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LedgerError::MalformedInput(msg) => write!(f, "Malformed input: {}", msg),
            LedgerError::NotCompliant => write!(f, "Block hash does not meet the required quality"),
            LedgerError::EmptyBlock => write!(f, "Block carries no transactions"),
            LedgerError::CoinbasePlacement(i) => {
                write!(f, "Transaction {} violates coinbase placement", i)
            }
            LedgerError::BadFees(i) => write!(f, "Transaction {} does not use valid fees", i),
            LedgerError::BadProof(i) => write!(f, "Transaction {} does not have a valid proof", i),
            LedgerError::BadApplication(i, msg) => {
                write!(f, "Transaction {} can not be applied: {}", i, msg)
            }
            LedgerError::NotSuccessor(msg) => write!(f, "Block is not a successor: {}", msg),
            LedgerError::EmptyLedger => write!(f, "Ledger is empty"),
            LedgerError::CryptoError(msg) => write!(f, "Cryptographic error: {}", msg),
            LedgerError::WalletError(msg) => write!(f, "Wallet error: {}", msg),
            LedgerError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for LedgerError {}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::IoError(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, LedgerError>;
