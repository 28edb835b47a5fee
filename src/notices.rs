// 3.0: every state change produces a notice. watchers consume these for audit trails
// and external ledger reconstruction; the engines never read them back. each notice
// carries the identifiers and amounts needed to replay the value movement.

use crate::types::{AccountId, BetId, EventId, Quote, SlipId, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NoticeId(pub u64);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notice {
    pub id: NoticeId,
    pub timestamp: Timestamp,
    pub payload: NoticePayload,
}

impl Notice {
    pub fn new(id: NoticeId, timestamp: Timestamp, payload: NoticePayload) -> Self {
        Self {
            id,
            timestamp,
            payload,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NoticePayload {
    // market lifecycle
    EventCreated(EventCreatedNotice),
    BetPlaced(BetPlacedNotice),
    EventResolved(EventResolvedNotice),
    EventCanceled(EventCanceledNotice),

    // market fund movement
    PayoutClaimed(PayoutClaimedNotice),
    BetRefunded(BetRefundedNotice),

    // insurance lifecycle
    InsurancePurchased(InsurancePurchasedNotice),
    ClaimFiled(ClaimFiledNotice),
    ClaimSettled(ClaimSettledNotice),
    PoolFunded(PoolFundedNotice),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventCreatedNotice {
    pub event_id: EventId,
    pub title: String,
    pub outcome_count: usize,
    pub deadline: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetPlacedNotice {
    pub event_id: EventId,
    pub bet_id: BetId,
    pub slip_id: SlipId,
    pub bettor: AccountId,
    pub outcome_index: usize,
    pub amount: Quote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventResolvedNotice {
    pub event_id: EventId,
    pub winning_outcome: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventCanceledNotice {
    pub event_id: EventId,
    pub escrow_held: Quote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoutClaimedNotice {
    pub event_id: EventId,
    pub bet_id: BetId,
    pub recipient: AccountId,
    pub amount: Quote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetRefundedNotice {
    pub event_id: EventId,
    pub bet_id: BetId,
    pub recipient: AccountId,
    pub amount: Quote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsurancePurchasedNotice {
    pub slip_id: SlipId,
    pub owner: AccountId,
    pub insured_amount: Quote,
    pub premium: Quote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimFiledNotice {
    pub slip_id: SlipId,
    pub owner: AccountId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimSettledNotice {
    pub slip_id: SlipId,
    pub approved: bool,
    pub amount_paid: Quote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolFundedNotice {
    pub funder: AccountId,
    pub amount: Quote,
    pub pool_held: Quote,
}

pub trait NoticeSink {
    fn emit(&mut self, notice: Notice);
}

// 3.1: bounded in-memory log. each engine owns one; watchers read through notices().
#[derive(Debug, Default)]
pub struct NoticeLog {
    notices: Vec<Notice>,
    next_id: u64,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self {
            notices: Vec::new(),
            next_id: 1,
        }
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn recent(&self, count: usize) -> &[Notice] {
        let start = self.notices.len().saturating_sub(count);
        &self.notices[start..]
    }

    pub fn clear(&mut self) {
        self.notices.clear();
    }

    pub fn next_id(&mut self) -> NoticeId {
        let id = NoticeId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn truncate_front(&mut self, max: usize) {
        if self.notices.len() > max {
            let drain_count = self.notices.len() - max;
            self.notices.drain(0..drain_count);
        }
    }
}

impl NoticeSink for NoticeLog {
    fn emit(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}
