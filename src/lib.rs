// wager-core: prediction market + bet-slip insurance engines.
// escrow-first architecture: funds move only through lock/release transitions.
// all computation is deterministic with no external I/O.
//
// file map (search X.0 for structs, X.1+ for logic):
//   1.x  types.rs: primitives: EventId, BetId, SlipId, AccountId, Quote, Bps
//   2.x  escrow.rs: the shared lock/release ledger discipline
//   3.x  notices.rs: notification records for external audit watchers
//   4.x  registry.rs: slip ownership capability + in-memory SlipBook
//   5.x  market.rs: Event/Bet state, outcome pools, event details
//   6.x  insurance.rs: Policy state, premium schedule
//   7.x  engine/: the two engines: market ops, insurance ops, config, errors

pub mod engine;
pub mod escrow;
pub mod insurance;
pub mod market;
pub mod notices;
pub mod registry;
pub mod types;

// re exports for convenience
pub use engine::*;
pub use escrow::*;
pub use insurance::*;
pub use market::*;
pub use notices::*;
pub use registry::*;
pub use types::*;
