//! Parallel proof-of-work search over the block variance field

use std::thread;

use crossbeam_channel::{bounded, select};

use crate::block::Block;
use crate::economics::VARIANCE_CHUNK_SIZE;

/// Search for a variance that makes the block compliant, using one worker
/// per available CPU.
pub fn find(init: &Block) -> Block {
    let threads = thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
    find_with_threads(init, threads)
}

/// Search with a fixed worker count.
///
/// The dispatcher hands out contiguous variance chunks over a rendezvous
/// channel and alternates with polling the single-slot solution channel.
/// Every worker probes its own copy of the block, so the search shares no
/// mutable state. The first published variance wins; late winners are
/// dropped by the full solution slot. Once a solution arrives each worker
/// is handed a quit token before the channels go away.
pub fn find_with_threads(init: &Block, threads: usize) -> Block {
    let threads = threads.max(1);
    let (chunk_tx, chunk_rx) = bounded::<(u64, u64)>(0);
    let (solution_tx, solution_rx) = bounded::<u64>(1);
    let (quit_tx, quit_rx) = bounded::<()>(0);

    let variance = thread::scope(|scope| {
        for _ in 0..threads {
            let chunk_rx = chunk_rx.clone();
            let solution_tx = solution_tx.clone();
            let quit_rx = quit_rx.clone();
            let mut candidate = init.clone();
            scope.spawn(move || loop {
                select! {
                    recv(quit_rx) -> _ => return,
                    recv(chunk_rx) -> chunk => {
                        let Ok((start, end)) = chunk else { return };
                        for variance in start..end {
                            candidate.variance = variance;
                            if candidate.compliant() {
                                let _ = solution_tx.try_send(variance);
                            }
                        }
                    }
                }
            });
        }

        let mut next_chunk = 0u64;
        let variance = loop {
            select! {
                recv(solution_rx) -> solution => {
                    if let Ok(variance) = solution {
                        break variance;
                    }
                }
                send(chunk_tx, (next_chunk, next_chunk.wrapping_add(VARIANCE_CHUNK_SIZE))) -> _ => {
                    next_chunk = next_chunk.wrapping_add(VARIANCE_CHUNK_SIZE);
                }
            }
        };
        for _ in 0..threads {
            let _ = quit_tx.send(());
        }
        variance
    });

    let mut found = init.clone();
    found.variance = variance;
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::Private;
    use crate::addressbook::AddressBook;

    #[test]
    fn zero_complexity_needs_no_work() {
        let creator = Private::generate();
        let init = Block::genesis(0, 0, 100, &creator).unwrap();

        let mined = find(&init);
        assert!(mined.compliant());
    }

    #[test]
    fn mined_block_differs_only_in_variance() {
        let creator = Private::generate();
        let init = Block::genesis(0, 16, 100, &creator).unwrap();

        let mined = find(&init);
        assert!(mined.compliant());
        assert_eq!(mined.chain, init.chain);
        assert_eq!(mined.index, init.index);
        assert_eq!(mined.complexity, init.complexity);
        assert_eq!(mined.timestamp, init.timestamp);
        assert_eq!(mined.previous_hash, init.previous_hash);
        assert_eq!(mined.transactions, init.transactions);

        // The mined genesis still verifies.
        assert!(mined.verify(&AddressBook::new()).is_ok());
    }

    #[test]
    fn single_worker_search() {
        let creator = Private::generate();
        let init = Block::genesis(0, 16, 100, &creator).unwrap();

        let mined = find_with_threads(&init, 1);
        assert!(mined.compliant());
    }

    #[test]
    fn independent_searches_agree_on_compliance() {
        let creator = Private::generate();
        let init = Block::genesis(0, 32, 100, &creator).unwrap();

        let first = find(&init);
        let second = find(&init);
        assert!(first.compliant());
        assert!(second.compliant());
        assert_eq!(first.transactions, second.transactions);
    }
}
