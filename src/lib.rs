//! tallychain - a minimal proof-of-work ledger of signed value transfers
//!
//! # Architecture
//!
//! The crate is organized into logical modules:
//!
//! ## Core Ledger
//! - [`ledger`] - The append-only chain and whole-chain serialization
//! - [`block`] - Block structure, verification and compliance
//! - [`transaction`] - Transaction types and state transitions
//! - [`addressbook`] - Ordered account/funds state with cheap snapshots
//!
//! ## Consensus & Mining
//! - [`economics`] - Reward, fee and difficulty curves
//! - [`miner`] - Parallel proof-of-work search
//!
//! ## Cryptography
//! - [`hash`] - Double-SHA-256 hashing
//! - [`account`] - P-256 key pairs, addresses and signatures
//! - [`container`] - Passphrase-sealed key containers
//!
//! ## Configuration & Utilities
//! - [`codec`] - Little-endian wire helpers
//! - [`config`] - Configuration management
//! - [`cli`] - Datastore helpers for the command-line driver
//! - [`error`] - Error types

#![forbid(unsafe_code)]

// ============================================================================
// Core Ledger
// ============================================================================
pub mod addressbook;
pub mod block;
pub mod ledger;
pub mod transaction;

// ============================================================================
// Consensus & Mining
// ============================================================================
pub mod economics;
pub mod miner;

// ============================================================================
// Cryptography
// ============================================================================
pub mod account;
pub mod container;
pub mod hash;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
