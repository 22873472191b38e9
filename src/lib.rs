//! A move-scheduling and constrained-search core for shortest proof game puzzles.
//!
//! Given a target diagram and an exact half-move count, a proof game solver must
//! enumerate every legal game reaching the diagram. The expensive part is not
//! guessing *where* each man ends up (the strategy generator's job) but deciding
//! whether a committed strategy is *jointly realizable* and, if so, enumerating
//! the games that realize it. This crate implements that part:
//!
//! - [`plan::chain`] expands each piece's committed route into atomic move slots,
//! - [`plan::penalty`] charges forced detour costs caused by contested squares,
//! - [`plan::precedence`] derives hard/soft ordering edges between slots,
//! - [`plan::cycle`] rejects contradictory orderings,
//! - [`plan::schedule`] computes earliest/latest feasible plies per slot,
//! - [`plan::switchback`] resolves forced zero-net-displacement round trips,
//! - [`search`] runs an exhaustive, memoized backtracking search over legal
//!   chess moves honoring the schedule.
//!
//! The strategy generator and diagram I/O live outside this crate; tests play
//! the generator's role with hand-built [`strategy::Strategy`] values.

pub mod core;
pub mod oracle;
pub mod plan;
pub mod rules;
pub mod search;
pub mod solution;
pub mod solver;
pub mod strategy;
