// 7.1 engine/market.rs: the market engine. owns the Event/Bet arenas, the
// per-event escrow, and the market notice log. every operation is atomic:
// all validation happens before any state is touched.

use super::config::{EngineConfig, ResolutionPolicy};
use super::results::{EngineError, PayoutResult, RefundResult};
use crate::escrow::EscrowError;
use crate::market::{Bet, BetState, Event, EventDetails, EventStatus};
use crate::notices::{
    BetPlacedNotice, BetRefundedNotice, EventCanceledNotice, EventCreatedNotice,
    EventResolvedNotice, Notice, NoticeLog, NoticePayload, NoticeSink, PayoutClaimedNotice,
};
use crate::registry::PositionRegistry;
use crate::types::{AccountId, BetId, EventId, Quote, SlipId, Timestamp};
use rust_decimal::RoundingStrategy;
use std::collections::HashMap;

#[derive(Debug)]
pub struct MarketEngine {
    config: EngineConfig,
    admin: AccountId,
    events: HashMap<EventId, Event>,
    bets: HashMap<BetId, Bet>,
    next_event_id: u64,
    next_bet_id: u64,
    log: NoticeLog,
    current_time: Timestamp,
}

impl MarketEngine {
    pub fn new(admin: AccountId, config: EngineConfig) -> Self {
        Self {
            config,
            admin,
            events: HashMap::new(),
            bets: HashMap::new(),
            next_event_id: 0,
            next_bet_id: 0,
            log: NoticeLog::new(),
            current_time: Timestamp::from_millis(0),
        }
    }

    pub fn admin(&self) -> AccountId {
        self.admin
    }

    pub fn set_time(&mut self, timestamp: Timestamp) {
        self.current_time = timestamp;
    }

    pub fn time(&self) -> Timestamp {
        self.current_time
    }

    pub fn advance_time(&mut self, millis: i64) {
        self.current_time = Timestamp::from_millis(self.current_time.as_millis() + millis);
    }

    /// 7.1.1: open a new event. Admin only.
    pub fn create_event(
        &mut self,
        caller: AccountId,
        title: &str,
        outcomes: Vec<String>,
        duration_secs: u64,
    ) -> Result<EventId, EngineError> {
        if caller != self.admin {
            return Err(EngineError::Unauthorized(caller));
        }
        if outcomes.len() < 2 {
            return Err(EngineError::TooFewOutcomes(outcomes.len()));
        }
        if duration_secs == 0 {
            return Err(EngineError::InvalidDuration);
        }

        let event_id = EventId(self.next_event_id);
        self.next_event_id += 1;

        let deadline = self.current_time.plus_seconds(duration_secs);
        let event = Event::new(
            event_id,
            title.to_string(),
            outcomes,
            deadline,
            self.current_time,
        );

        self.emit(NoticePayload::EventCreated(EventCreatedNotice {
            event_id,
            title: event.title.clone(),
            outcome_count: event.outcomes.len(),
            deadline,
        }));
        self.events.insert(event_id, event);

        Ok(event_id)
    }

    /// 7.1.2: stake on an outcome. The stake is locked into the event escrow
    /// as the terminal effect of the call.
    pub fn place_bet(
        &mut self,
        caller: AccountId,
        event_id: EventId,
        outcome_index: usize,
        stake: Quote,
    ) -> Result<BetId, EngineError> {
        let now = self.current_time;
        let event = self
            .events
            .get_mut(&event_id)
            .ok_or(EngineError::InvalidEvent(event_id))?;

        if !event.accepts_bets(now) {
            return Err(EngineError::EventClosed(event_id));
        }
        if !event.valid_outcome(outcome_index) {
            return Err(EngineError::InvalidOutcome {
                event_id,
                index: outcome_index,
                outcome_count: event.outcomes.len(),
            });
        }
        if stake.is_zero() || stake.is_negative() {
            return Err(EngineError::ZeroStake);
        }

        event.add_stake(outcome_index, stake)?;

        let bet_id = BetId(self.next_bet_id);
        self.next_bet_id += 1;
        // slip numbering follows bet numbering; the external registry mints against it
        let slip_id = SlipId(bet_id.0);

        let bet = Bet {
            id: bet_id,
            event_id,
            slip_id,
            bettor: caller,
            outcome_index,
            stake,
            state: BetState::Open,
            placed_at: now,
        };
        self.bets.insert(bet_id, bet);

        self.emit(NoticePayload::BetPlaced(BetPlacedNotice {
            event_id,
            bet_id,
            slip_id,
            bettor: caller,
            outcome_index,
            amount: stake,
        }));

        Ok(bet_id)
    }

    /// 7.1.3: declare the winning outcome. Admin only. Moves no funds; payout
    /// is pull-based through claim_payout.
    ///
    /// An outcome with zero backing cannot win while other stakes exist: the
    /// pro-rata division would be undefined, so resolution itself rejects it
    /// and the admin must pick a backed outcome or cancel the event.
    pub fn resolve_event(
        &mut self,
        caller: AccountId,
        event_id: EventId,
        winning_outcome: usize,
    ) -> Result<(), EngineError> {
        if caller != self.admin {
            return Err(EngineError::Unauthorized(caller));
        }
        let now = self.current_time;
        let policy = self.config.resolution_policy;
        let event = self
            .events
            .get_mut(&event_id)
            .ok_or(EngineError::InvalidEvent(event_id))?;

        if event.status.is_terminal() {
            return Err(EngineError::EventClosed(event_id));
        }
        if policy == ResolutionPolicy::AfterDeadline && now < event.deadline {
            return Err(EngineError::DeadlineNotReached(event_id));
        }
        if !event.valid_outcome(winning_outcome) {
            return Err(EngineError::InvalidOutcome {
                event_id,
                index: winning_outcome,
                outcome_count: event.outcomes.len(),
            });
        }
        if event.outcome_pool(winning_outcome).is_zero() && !event.total_pool().is_zero() {
            return Err(EngineError::NoWinningPool {
                event_id,
                outcome_index: winning_outcome,
            });
        }

        event.status = EventStatus::Resolved;
        event.winning_outcome = Some(winning_outcome);

        self.emit(NoticePayload::EventResolved(EventResolvedNotice {
            event_id,
            winning_outcome,
        }));

        Ok(())
    }

    /// 7.1.4: cancel an open event. Admin only, only before resolution.
    /// Every bet becomes refundable for exactly its own stake.
    pub fn cancel_event(&mut self, caller: AccountId, event_id: EventId) -> Result<(), EngineError> {
        if caller != self.admin {
            return Err(EngineError::Unauthorized(caller));
        }
        let event = self
            .events
            .get_mut(&event_id)
            .ok_or(EngineError::InvalidEvent(event_id))?;

        if event.status.is_terminal() {
            return Err(EngineError::EventClosed(event_id));
        }

        event.status = EventStatus::Canceled;
        let escrow_held = event.escrow.held();

        self.emit(NoticePayload::EventCanceled(EventCanceledNotice {
            event_id,
            escrow_held,
        }));

        Ok(())
    }

    /// 7.1.5: pull a winning bet's payout. Caller must hold the bet's slip in
    /// the position registry. Pays `stake * total_pool / winning_pool`: the
    /// full pool, losing stakes included, pro rata among winning stakes.
    pub fn claim_payout(
        &mut self,
        caller: AccountId,
        event_id: EventId,
        bet_id: BetId,
        registry: &dyn PositionRegistry,
    ) -> Result<PayoutResult, EngineError> {
        let event = self
            .events
            .get(&event_id)
            .ok_or(EngineError::InvalidEvent(event_id))?;
        let bet = self
            .bets
            .get(&bet_id)
            .filter(|b| b.event_id == event_id)
            .ok_or(EngineError::BetNotFound(bet_id))?;

        if registry.owner_of(bet.slip_id) != Some(caller) {
            return Err(EngineError::Unauthorized(caller));
        }
        let winning_outcome = match (event.status, event.winning_outcome) {
            (EventStatus::Resolved, Some(w)) => w,
            _ => return Err(EngineError::NotResolved(event_id)),
        };
        if bet.is_settled() {
            return Err(EngineError::AlreadyClaimed(bet_id));
        }
        if bet.outcome_index != winning_outcome {
            return Err(EngineError::NotWinner {
                bet_id,
                outcome_index: bet.outcome_index,
                winning_outcome,
            });
        }

        // zero winning pool is rejected at resolution, so the division is
        // always defined here; checked math still guards the unreachable case.
        let winning_pool = event.outcome_pool(winning_outcome);
        let payout = bet
            .stake
            .checked_mul(event.total_pool().value())
            .and_then(|q| q.checked_div(winning_pool.value()))
            .ok_or(EngineError::Escrow(EscrowError::Overflow))?;
        // round toward zero so the pro-rata shares can never sum past the escrow
        let payout = Quote::new(
            payout
                .value()
                .round_dp_with_strategy(18, RoundingStrategy::ToZero),
        );

        let event = self.events.get_mut(&event_id).expect("checked above");
        event.escrow.release(payout)?;
        let bet = self.bets.get_mut(&bet_id).expect("checked above");
        bet.state = BetState::PaidOut;

        self.emit(NoticePayload::PayoutClaimed(PayoutClaimedNotice {
            event_id,
            bet_id,
            recipient: caller,
            amount: payout,
        }));

        Ok(PayoutResult {
            bet_id,
            recipient: caller,
            amount: payout,
        })
    }

    /// 7.1.6: reclaim the original stake of a bet on a canceled event. Not the
    /// payout formula: each bet refunds exactly its own stake, once.
    pub fn claim_refund(
        &mut self,
        caller: AccountId,
        event_id: EventId,
        bet_id: BetId,
        registry: &dyn PositionRegistry,
    ) -> Result<RefundResult, EngineError> {
        let event = self
            .events
            .get(&event_id)
            .ok_or(EngineError::InvalidEvent(event_id))?;
        let bet = self
            .bets
            .get(&bet_id)
            .filter(|b| b.event_id == event_id)
            .ok_or(EngineError::BetNotFound(bet_id))?;

        if registry.owner_of(bet.slip_id) != Some(caller) {
            return Err(EngineError::Unauthorized(caller));
        }
        if event.status != EventStatus::Canceled {
            return Err(EngineError::NotCanceled(event_id));
        }
        if bet.is_settled() {
            return Err(EngineError::AlreadyClaimed(bet_id));
        }

        let refund = bet.stake;
        let event = self.events.get_mut(&event_id).expect("checked above");
        event.escrow.release(refund)?;
        let bet = self.bets.get_mut(&bet_id).expect("checked above");
        bet.state = BetState::Refunded;

        self.emit(NoticePayload::BetRefunded(BetRefundedNotice {
            event_id,
            bet_id,
            recipient: caller,
            amount: refund,
        }));

        Ok(RefundResult {
            bet_id,
            recipient: caller,
            amount: refund,
        })
    }

    pub fn event_details(&self, event_id: EventId) -> Result<EventDetails, EngineError> {
        self.events
            .get(&event_id)
            .map(Event::details)
            .ok_or(EngineError::InvalidEvent(event_id))
    }

    pub fn get_event(&self, event_id: EventId) -> Option<&Event> {
        self.events.get(&event_id)
    }

    pub fn get_bet(&self, bet_id: BetId) -> Option<&Bet> {
        self.bets.get(&bet_id)
    }

    pub fn bets_iter(&self) -> impl Iterator<Item = (&BetId, &Bet)> {
        self.bets.iter()
    }

    pub fn notices(&self) -> &[Notice] {
        self.log.notices()
    }

    pub fn recent_notices(&self, count: usize) -> &[Notice] {
        self.log.recent(count)
    }

    fn emit(&mut self, payload: NoticePayload) {
        let id = self.log.next_id();
        let notice = Notice::new(id, self.current_time, payload);

        if self.config.verbose {
            println!("[Notice {}] {:?}", notice.id.0, notice.payload);
        }

        self.log.emit(notice);
        self.log.truncate_front(self.config.max_notices);
    }
}
