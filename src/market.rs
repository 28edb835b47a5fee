// 5.0: market-side state. an Event is the wagering subject, a Bet is one staked
// position on one of its outcomes. both are arena records: created once, mutated
// only through the engine's state transitions, never deleted.

use crate::escrow::{Escrow, EscrowError};
use crate::types::{AccountId, BetId, EventId, Quote, SlipId, Timestamp};
use serde::{Deserialize, Serialize};

// Open -> Resolved or Open -> Canceled. both terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventStatus {
    Open,
    Resolved,
    Canceled,
}

impl EventStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, EventStatus::Open)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    /// Outcome labels, index-addressed. Length fixed at creation, always >= 2.
    pub outcomes: Vec<String>,
    pub deadline: Timestamp,
    pub status: EventStatus,
    pub winning_outcome: Option<usize>,
    /// Stake sum per outcome index. Maintained incrementally as bets land.
    pub pools: Vec<Quote>,
    /// Event escrow: everything staked in, everything paid/refunded out.
    pub escrow: Escrow,
    pub created_at: Timestamp,
}

impl Event {
    pub fn new(
        id: EventId,
        title: String,
        outcomes: Vec<String>,
        deadline: Timestamp,
        created_at: Timestamp,
    ) -> Self {
        let pools = vec![Quote::zero(); outcomes.len()];
        Self {
            id,
            title,
            outcomes,
            deadline,
            status: EventStatus::Open,
            winning_outcome: None,
            pools,
            escrow: Escrow::new(),
            created_at,
        }
    }

    /// Open for new bets: not terminal and before the deadline.
    pub fn accepts_bets(&self, now: Timestamp) -> bool {
        self.status == EventStatus::Open && now < self.deadline
    }

    pub fn valid_outcome(&self, index: usize) -> bool {
        index < self.outcomes.len()
    }

    /// Sum of every stake ever placed. This is the full pool the payout
    /// formula distributes, losing stakes included.
    pub fn total_pool(&self) -> Quote {
        self.escrow.locked_total()
    }

    pub fn outcome_pool(&self, index: usize) -> Quote {
        self.pools.get(index).copied().unwrap_or_else(Quote::zero)
    }

    /// Lock a stake into the event: escrow first, then the outcome pool.
    /// Checked throughout; a failure leaves both untouched.
    pub fn add_stake(&mut self, outcome_index: usize, amount: Quote) -> Result<(), EscrowError> {
        let bumped = self.pools[outcome_index]
            .checked_add(amount)
            .ok_or(EscrowError::Overflow)?;
        self.escrow.lock(amount)?;
        self.pools[outcome_index] = bumped;
        Ok(())
    }

    pub fn details(&self) -> EventDetails {
        EventDetails {
            id: self.id,
            title: self.title.clone(),
            outcomes: self.outcomes.clone(),
            deadline: self.deadline,
            resolved: self.status == EventStatus::Resolved,
            canceled: self.status == EventStatus::Canceled,
            winning_outcome: self.winning_outcome,
            pools: self.pools.clone(),
            total_pool: self.total_pool(),
            escrow_held: self.escrow.held(),
        }
    }
}

/// Read-only snapshot of an event, for callers and watchers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDetails {
    pub id: EventId,
    pub title: String,
    pub outcomes: Vec<String>,
    pub deadline: Timestamp,
    pub resolved: bool,
    pub canceled: bool,
    pub winning_outcome: Option<usize>,
    pub pools: Vec<Quote>,
    pub total_pool: Quote,
    pub escrow_held: Quote,
}

// a bet settles at most once, through exactly one of the two exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BetState {
    Open,
    PaidOut,
    Refunded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bet {
    pub id: BetId,
    pub event_id: EventId,
    /// Slip minted by the external registry for this position. Ownership
    /// checks go through the registry, not through `bettor`.
    pub slip_id: SlipId,
    /// Account that placed the bet. Kept for the audit trail; the slip holder
    /// may differ after a transfer.
    pub bettor: AccountId,
    pub outcome_index: usize,
    pub stake: Quote,
    pub state: BetState,
    pub placed_at: Timestamp,
}

impl Bet {
    pub fn is_settled(&self) -> bool {
        self.state != BetState::Open
    }
}
