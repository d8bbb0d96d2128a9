//! Integration tests for chain assembly, transfers and the datastore

use tempfile::TempDir;

use tallychain::account::{address_to_hex, Private};
use tallychain::block::Block;
use tallychain::cli::{list_accounts, load_ledger, save_ledger, store_account, unlock_account};
use tallychain::economics::{block_reward, calculate_fee, REWARD_BASE};
use tallychain::error::LedgerError;
use tallychain::ledger::Ledger;
use tallychain::miner;
use tallychain::transaction::Transaction;

/// Mine and append an empty reward block for `miner_key`.
fn mine_next(
    ledger: &mut Ledger,
    miner_key: &Private,
    timestamp: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let prev = ledger.last()?.clone();
    let mut block = Block::next(&prev, timestamp);
    block.push(Transaction::coinbase(
        ledger.chain,
        miner_key,
        block_reward(block.complexity, &[]),
        timestamp,
    )?);
    ledger.append(miner::find(&block))?;
    Ok(())
}

#[test]
fn end_to_end_transfer_flow() -> Result<(), Box<dyn std::error::Error>> {
    let alice = Private::generate();
    let bob = Private::generate();

    // Complexity 16 keeps the required quality at one bit, so every block
    // mines quickly while still exercising the search.
    let mut ledger = Ledger::new(1);
    ledger.init(16, &alice, 1000)?;
    assert_eq!(ledger.addresses.funds(&alice.address()), REWARD_BASE);

    // Accumulate enough funds to afford the transfer fee floor.
    let mut timestamp = 1001;
    while ledger.addresses.funds(&alice.address()) < 1024 {
        mine_next(&mut ledger, &alice, timestamp)?;
        timestamp += 1;
    }
    let alice_funds = ledger.addresses.funds(&alice.address());

    // Announce bob, then pay him in the same block.
    let prev = ledger.last()?.clone();
    let mut block = Block::next(&prev, timestamp);
    let fee = calculate_fee(0, block.complexity);
    let announce = Transaction::announce(ledger.chain, &bob, timestamp)?;
    let transfer =
        Transaction::transfer(ledger.chain, 100, fee, &alice, bob.address(), Vec::new(), timestamp)?;
    let reward = block_reward(block.complexity, std::slice::from_ref(&transfer));
    block.push(Transaction::coinbase(ledger.chain, &alice, reward, timestamp)?);
    block.push(announce);
    block.push(transfer);
    ledger.append(miner::find(&block))?;

    assert_eq!(ledger.addresses.funds(&bob.address()), 100);
    assert_eq!(
        ledger.addresses.funds(&alice.address()),
        alice_funds + reward - fee - 100
    );

    // The whole chain still replays from its serialized form.
    let mut buffer = Vec::new();
    ledger.write_to(&mut buffer)?;
    let mut restored = Ledger::new(0);
    restored.read_from(&mut buffer.as_slice())?;
    assert_eq!(restored.blocks, ledger.blocks);
    assert_eq!(restored.addresses, ledger.addresses);
    Ok(())
}

#[test]
fn datastore_accounts_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let alice = Private::generate();
    let bob = Private::generate();

    store_account(dir.path(), b"alice pass", &alice)?;
    store_account(dir.path(), b"bob pass", &bob)?;

    let mut expected = vec![
        address_to_hex(&alice.address()),
        address_to_hex(&bob.address()),
    ];
    expected.sort();
    assert_eq!(list_accounts(dir.path())?, expected);

    let unlocked = unlock_account(dir.path(), &alice.address(), b"alice pass")?;
    assert_eq!(unlocked.address(), alice.address());

    assert!(unlock_account(dir.path(), &alice.address(), b"bob pass").is_err());
    Ok(())
}

#[test]
fn ledger_file_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let creator = Private::generate();

    let mut ledger = Ledger::new(4);
    ledger.init(16, &creator, 500)?;
    mine_next(&mut ledger, &creator, 501)?;
    save_ledger(dir.path(), &ledger)?;

    let restored = load_ledger(dir.path())?;
    assert_eq!(restored, ledger);
    Ok(())
}

#[test]
fn corrupted_ledger_file_fails_verification() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let creator = Private::generate();

    let mut ledger = Ledger::new(0);
    ledger.init(0, &creator, 500)?;
    mine_next(&mut ledger, &creator, 501)?;
    save_ledger(dir.path(), &ledger)?;

    // Flip a byte inside the second block's previous_hash: 16 bytes of
    // ledger header, the serialized first block, then 48 header bytes.
    let path = tallychain::cli::ledger_path(dir.path());
    let mut bytes = std::fs::read(&path)?;
    let offset = 16 + ledger.blocks[0].bytes().len() + 48;
    bytes[offset] ^= 0x01;
    std::fs::write(&path, &bytes)?;

    match load_ledger(dir.path()) {
        Err(LedgerError::NotSuccessor(_)) => {}
        other => panic!("Expected NotSuccessor, got {:?}", other),
    }
    Ok(())
}

#[test]
fn concurrent_searches_both_comply() -> Result<(), Box<dyn std::error::Error>> {
    let creator = Private::generate();
    let init = Block::genesis(0, 64, 500, &creator)?;

    let (first, second) = std::thread::scope(|scope| {
        let a = scope.spawn(|| miner::find(&init));
        let b = scope.spawn(|| miner::find(&init));
        (a.join().expect("search"), b.join().expect("search"))
    });

    for mined in [&first, &second] {
        assert!(mined.compliant());
        assert_eq!(mined.chain, init.chain);
        assert_eq!(mined.index, init.index);
        assert_eq!(mined.complexity, init.complexity);
        assert_eq!(mined.timestamp, init.timestamp);
        assert_eq!(mined.previous_hash, init.previous_hash);
        assert_eq!(mined.transactions, init.transactions);
    }
    Ok(())
}
