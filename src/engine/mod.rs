// 7.0: the two peer engines plus their shared config and result types.
// both follow the same discipline: validate everything, then mutate, then notify.
// deterministic and notice-driven with no external I/O.

mod config;
mod insurance;
mod market;
mod results;

pub use config::{EngineConfig, ResolutionPolicy};
pub use insurance::InsuranceEngine;
pub use market::MarketEngine;
pub use results::{EngineError, PayoutResult, RefundResult, SettlementResult};
