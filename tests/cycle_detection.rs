//! Randomized precedence graphs: forward-only edges always pass the cycle
//! check, and any injected back edge over a chain path is always caught.

use proof_game::core::board::LifeId;
use proof_game::core::piece::PieceKind;
use proof_game::plan::{MoveSlot, PseudoGame, RejectReason};
use proof_game::plan::cycle;

fn xorshift(state: &mut u64) -> u64 {
    let mut x = *state;
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    *state = x;
    x
}

/// A pseudo game of `n` synthetic one-move slots, one chain per slot.
fn synthetic_slots(n: usize) -> PseudoGame {
    let mut pseudo = PseudoGame::new();
    for i in 0..n {
        let life = LifeId::new(i % 32);
        let sq = proof_game::core::square::Square::from_index(i % 64);
        pseudo.push_slot(MoveSlot::new(life, PieceKind::Knight, sq, sq));
    }
    pseudo
}

#[test]
fn forward_edges_never_form_a_cycle() {
    let mut state = 0x9e3779b97f4a7c15u64;
    for round in 0..20 {
        let n = 8 + (round % 8);
        let mut pseudo = synthetic_slots(n);
        for _ in 0..3 * n {
            let a = (xorshift(&mut state) as usize) % n;
            let b = (xorshift(&mut state) as usize) % n;
            if a < b {
                pseudo.add_must(b, a);
            }
        }
        assert!(cycle::detect(&pseudo).is_ok(), "round {round}");
    }
}

#[test]
fn injected_back_edges_are_always_rejected() {
    let mut state = 0xdeadbeefcafef00du64;
    for round in 0..20 {
        let n = 8 + (round % 8);
        let mut pseudo = synthetic_slots(n);
        // A full forward path 0 -> 1 -> ... -> n-1, plus random forward edges.
        for i in 1..n {
            pseudo.add_must(i, i - 1);
        }
        for _ in 0..2 * n {
            let a = (xorshift(&mut state) as usize) % n;
            let b = (xorshift(&mut state) as usize) % n;
            if a < b {
                pseudo.add_must(b, a);
            }
        }
        // One back edge closes a cycle through the path.
        let a = (xorshift(&mut state) as usize) % (n - 1);
        let b = a + 1 + (xorshift(&mut state) as usize) % (n - a - 1);
        pseudo.add_must(a, b);

        match cycle::detect(&pseudo) {
            Err(RejectReason::CyclicPrecedence { .. }) => {}
            other => panic!("round {round}: expected a cycle rejection, got {other:?}"),
        }
    }
}
