#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use sharechain_ledger::DagLedger;
use sharechain_types::{ShareHash, ShareSummary, Timestamp, U256};
use sharechain_work::work_from_target;

#[derive(Arbitrary, Debug)]
enum Op {
    /// Insert share `id` whose parent is `parent` (0 means genesis).
    Insert { id: u8, parent: u8, target: [u8; 32] },
    Remove { id: u8 },
}

fn h(id: u8) -> ShareHash {
    ShareHash::from(id as u64 + 1)
}

// Drive random insert/remove sequences and check that every node's prefix
// sums extend its parent's by exactly its own contribution.
fuzz_target!(|ops: Vec<Op>| {
    let mut ledger = DagLedger::new();
    for op in ops {
        match op {
            Op::Insert { id, parent, target } => {
                let previous = if parent == 0 { ShareHash::NULL } else { h(parent) };
                let target = U256::from_big_endian(&target);
                let share = ShareSummary::new(h(id), previous, Timestamp::new(0), target, target);
                let existed = ledger.contains(&h(id));
                assert_eq!(ledger.insert(share).is_err(), existed);
            }
            Op::Remove { id } => {
                let existed = ledger.contains(&h(id));
                assert_eq!(ledger.remove(&h(id)).is_ok(), existed);
            }
        }
    }

    for share in ledger.iter() {
        let node = ledger.node(&share.hash).expect("iterated share has a node");
        let own = work_from_target(share.target);
        match node.parent {
            Some(parent) => {
                let p = ledger.node(&parent).expect("parent link resolves");
                assert!(p.children.contains(&share.hash));
                assert_eq!(node.cumulative_height, p.cumulative_height + 1);
                assert_eq!(node.cumulative_work, p.cumulative_work + own);
            }
            None => {
                assert_eq!(node.cumulative_height, 1);
                assert_eq!(node.cumulative_work, own);
            }
        }
    }
});
