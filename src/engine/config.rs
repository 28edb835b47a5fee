//! Engine configuration options.

use crate::insurance::PremiumSchedule;

/// When an event may be resolved relative to its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionPolicy {
    /// Resolution allowed at any time while the event is open.
    AnyTime,
    /// Resolution allowed only once the deadline has passed.
    AfterDeadline,
}

/// Engine configuration. Shared by both engines; each reads the fields it cares about.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Deadline gate for resolveEvent.
    pub resolution_policy: ResolutionPolicy,
    /// Premium rate table for the insurance engine.
    pub premium_schedule: PremiumSchedule,
    /// Maximum number of notices to retain in memory.
    pub max_notices: usize,
    /// Enable verbose logging.
    pub verbose: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            resolution_policy: ResolutionPolicy::AnyTime,
            premium_schedule: PremiumSchedule::default(),
            max_notices: 100_000,
            verbose: false,
        }
    }
}
