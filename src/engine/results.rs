// 7.0.2: result types and errors for engine operations.
//
// every validation failure aborts the whole operation with no partial mutation
// and no fund movement. there is no retry inside the core; callers decide.

use crate::escrow::EscrowError;
use crate::types::{AccountId, BetId, EventId, Quote, SlipId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayoutResult {
    pub bet_id: BetId,
    pub recipient: AccountId,
    pub amount: Quote,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefundResult {
    pub bet_id: BetId,
    pub recipient: AccountId,
    pub amount: Quote,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementResult {
    pub slip_id: SlipId,
    pub approved: bool,
    /// Zero when the claim was denied.
    pub amount_paid: Quote,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    // market
    #[error("Event {0} not found")]
    InvalidEvent(EventId),

    #[error("Outcome index {index} invalid for {event_id} ({outcome_count} outcomes)")]
    InvalidOutcome {
        event_id: EventId,
        index: usize,
        outcome_count: usize,
    },

    #[error("Event needs at least two outcomes, got {0}")]
    TooFewOutcomes(usize),

    #[error("Event duration must be positive")]
    InvalidDuration,

    #[error("Event {0} is closed to new bets")]
    EventClosed(EventId),

    #[error("Stake must be positive")]
    ZeroStake,

    #[error("Deadline for {0} has not passed")]
    DeadlineNotReached(EventId),

    #[error("Event {0} is not resolved")]
    NotResolved(EventId),

    #[error("Event {0} is not canceled")]
    NotCanceled(EventId),

    #[error("Bet {0} not found")]
    BetNotFound(BetId),

    #[error("Bet {0} already claimed")]
    AlreadyClaimed(BetId),

    #[error("Bet {bet_id} backed outcome {outcome_index}, winner is {winning_outcome}")]
    NotWinner {
        bet_id: BetId,
        outcome_index: usize,
        winning_outcome: usize,
    },

    #[error("Outcome {outcome_index} of {event_id} has no backing stake")]
    NoWinningPool {
        event_id: EventId,
        outcome_index: usize,
    },

    // insurance
    #[error("Slip {0} already carries a live policy")]
    AlreadyInsured(SlipId),

    #[error("Attached value {attached} does not match premium {expected}")]
    PremiumMismatch { expected: Quote, attached: Quote },

    #[error("No policy for slip {0}")]
    NotFound(SlipId),

    #[error("Policy for slip {0} is not active")]
    NotActive(SlipId),

    #[error("Policy for slip {0} has no pending claim")]
    NotPending(SlipId),

    #[error("Pool holds {held}, cannot cover {requested}")]
    InsufficientPool { requested: Quote, held: Quote },

    // shared
    #[error("Caller {0} is not authorized")]
    Unauthorized(AccountId),

    #[error("Escrow error: {0}")]
    Escrow(#[from] EscrowError),
}
