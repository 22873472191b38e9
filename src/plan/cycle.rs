//! Cycle detection over the hard-edge graph.
//!
//! A directed cycle in `must_follow` means two moves each wait on the other's
//! prior play; no schedule exists and the strategy is rejected before any
//! search effort is spent.

use std::collections::VecDeque;

use crate::plan::{PseudoGame, RejectReason, SlotId};

/// Reject when any slot can reach itself through `must_follow` edges.
pub fn detect(pseudo: &PseudoGame) -> Result<(), RejectReason> {
    let n = pseudo.slots.len();
    let mut seen = vec![false; n];
    let mut queue: VecDeque<SlotId> = VecDeque::new();

    for start in 0..n {
        seen.iter_mut().for_each(|s| *s = false);
        queue.clear();
        queue.push_back(start);

        while let Some(id) = queue.pop_front() {
            for &pred in &pseudo.slots[id].must_follow {
                if pred == start {
                    return Err(RejectReason::CyclicPrecedence { slot: start });
                }
                if !seen[pred] {
                    seen[pred] = true;
                    queue.push_back(pred);
                }
            }
        }
    }
    Ok(())
}
