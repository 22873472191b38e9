//! Memoization must never change the solution set, only the work done.

mod common;

use proof_game::solver::{SolveOptions, SolveStatus};
use proof_game::strategy::Strategy;

fn tempo_strategy() -> Strategy {
    let mut strategy = Strategy::initial();
    strategy.free_moves = [2, 2];
    strategy
}

fn sorted_lines(use_transposition: bool) -> (Vec<String>, u64) {
    let mut strategy = tempo_strategy();
    let mut ctx = common::solver();
    let options = SolveOptions {
        max_solutions: 100,
        use_transposition,
        ..SolveOptions::default()
    };
    let report = ctx
        .solve(&mut strategy, 4, &options)
        .expect("schedulable strategy");
    assert_eq!(report.status, SolveStatus::Exhausted);
    let mut lines: Vec<String> = report.solutions.iter().map(|s| s.to_string()).collect();
    lines.sort();
    (lines, report.nodes)
}

#[test]
fn solution_sets_agree_with_and_without_the_table() {
    let (with_table, _) = sorted_lines(true);
    let (without_table, _) = sorted_lines(false);
    assert_eq!(with_table, without_table);
    assert_eq!(with_table.len(), 16);
}
