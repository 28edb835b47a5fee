// 7.2 engine/insurance.rs: the insurance engine. owns the Policy arena and a
// single pool escrow: premiums lock in, approved indemnities release out.
// same discipline as the market engine: validate fully, then mutate, then notify.

use super::config::EngineConfig;
use super::results::{EngineError, SettlementResult};
use crate::escrow::{Escrow, EscrowError};
use crate::insurance::{Policy, PolicyStatus};
use crate::notices::{
    ClaimFiledNotice, ClaimSettledNotice, InsurancePurchasedNotice, Notice, NoticeLog,
    NoticePayload, NoticeSink, PoolFundedNotice,
};
use crate::types::{AccountId, Quote, SlipId, Timestamp};
use std::collections::HashMap;

#[derive(Debug)]
pub struct InsuranceEngine {
    config: EngineConfig,
    admin: AccountId,
    policies: HashMap<SlipId, Policy>,
    pool: Escrow,
    log: NoticeLog,
    current_time: Timestamp,
}

impl InsuranceEngine {
    pub fn new(admin: AccountId, config: EngineConfig) -> Self {
        Self {
            config,
            admin,
            policies: HashMap::new(),
            pool: Escrow::new(),
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

    /// 7.2.1: quote the exact premium for a coverage amount. Pure: no state
    /// is read besides the configured schedule, none is written. The account
    /// parameter is the hook for an external risk factor; the base schedule
    /// prices all accounts alike.
    pub fn calculate_premium(
        &self,
        _account: AccountId,
        insured_amount: Quote,
    ) -> Result<Quote, EngineError> {
        self.config
            .premium_schedule
            .premium(insured_amount)
            .ok_or(EngineError::Escrow(EscrowError::Overflow))
    }

    /// 7.2.2: capitalize the indemnity pool. Admin only. Premiums alone may
    /// not cover insured amounts; the operator funds the difference.
    pub fn fund_pool(&mut self, caller: AccountId, amount: Quote) -> Result<(), EngineError> {
        if caller != self.admin {
            return Err(EngineError::Unauthorized(caller));
        }
        self.pool.lock(amount)?;

        let pool_held = self.pool.held();
        self.emit(NoticePayload::PoolFunded(PoolFundedNotice {
            funder: caller,
            amount,
            pool_held,
        }));
        Ok(())
    }

    /// 7.2.3: buy cover for a bet slip. The attached value must equal the
    /// quoted premium exactly. A slip with a live (Active or pending) policy
    /// cannot be re-insured; a slip whose policy reached a terminal settlement
    /// can, and the fresh policy replaces the settled record.
    pub fn purchase_insurance(
        &mut self,
        caller: AccountId,
        slip_id: SlipId,
        insured_amount: Quote,
        attached_value: Quote,
    ) -> Result<Policy, EngineError> {
        if insured_amount.is_zero() || insured_amount.is_negative() {
            return Err(EngineError::ZeroStake);
        }
        if let Some(existing) = self.policies.get(&slip_id) {
            if !existing.status.is_terminal() {
                return Err(EngineError::AlreadyInsured(slip_id));
            }
        }
        let expected = self.calculate_premium(caller, insured_amount)?;
        if attached_value != expected {
            return Err(EngineError::PremiumMismatch {
                expected,
                attached: attached_value,
            });
        }

        self.pool.lock(attached_value)?;

        let policy = Policy::new(slip_id, caller, insured_amount, attached_value, self.current_time);
        self.policies.insert(slip_id, policy.clone());

        self.emit(NoticePayload::InsurancePurchased(InsurancePurchasedNotice {
            slip_id,
            owner: caller,
            insured_amount,
            premium: attached_value,
        }));

        Ok(policy)
    }

    /// 7.2.4: open a claim on an active policy. Owner only. Moves no funds.
    pub fn file_claim(&mut self, caller: AccountId, slip_id: SlipId) -> Result<(), EngineError> {
        let now = self.current_time;
        let policy = self
            .policies
            .get_mut(&slip_id)
            .ok_or(EngineError::NotFound(slip_id))?;

        if policy.owner != caller {
            return Err(EngineError::Unauthorized(caller));
        }
        if policy.status != PolicyStatus::Active {
            return Err(EngineError::NotActive(slip_id));
        }

        policy.status = PolicyStatus::PendingSettlement;
        policy.claimed_at = Some(now);

        self.emit(NoticePayload::ClaimFiled(ClaimFiledNotice {
            slip_id,
            owner: caller,
        }));

        Ok(())
    }

    /// 7.2.5: settle a pending claim. Admin only. Approval releases the full
    /// insured amount from the pool; denial moves no funds. Terminal either
    /// way. If the pool cannot cover an approval the operation aborts and the
    /// claim stays pending until the pool is funded.
    pub fn settle_claim(
        &mut self,
        caller: AccountId,
        slip_id: SlipId,
        approved: bool,
    ) -> Result<SettlementResult, EngineError> {
        if caller != self.admin {
            return Err(EngineError::Unauthorized(caller));
        }
        let now = self.current_time;
        let pool_held = self.pool.held();
        let policy = self
            .policies
            .get_mut(&slip_id)
            .ok_or(EngineError::NotFound(slip_id))?;

        if policy.status != PolicyStatus::PendingSettlement {
            return Err(EngineError::NotPending(slip_id));
        }

        let amount_paid = if approved {
            let indemnity = policy.insured_amount;
            if !self.pool.can_release(indemnity) {
                return Err(EngineError::InsufficientPool {
                    requested: indemnity,
                    held: pool_held,
                });
            }
            self.pool.release(indemnity)?;
            policy.status = PolicyStatus::SettledPaid;
            indemnity
        } else {
            policy.status = PolicyStatus::SettledDenied;
            Quote::zero()
        };
        policy.settled_at = Some(now);

        self.emit(NoticePayload::ClaimSettled(ClaimSettledNotice {
            slip_id,
            approved,
            amount_paid,
        }));

        Ok(SettlementResult {
            slip_id,
            approved,
            amount_paid,
        })
    }

    pub fn policy(&self, slip_id: SlipId) -> Option<&Policy> {
        self.policies.get(&slip_id)
    }

    pub fn policies_iter(&self) -> impl Iterator<Item = (&SlipId, &Policy)> {
        self.policies.iter()
    }

    pub fn pool_held(&self) -> Quote {
        self.pool.held()
    }

    pub fn pool_ledger(&self) -> &Escrow {
        &self.pool
    }

    pub fn notices(&self) -> &[Notice] {
        self.log.notices()
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

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const ADMIN: AccountId = AccountId(1);
    const ALICE: AccountId = AccountId(10);
    const BOB: AccountId = AccountId(11);

    fn funded_engine() -> InsuranceEngine {
        let mut engine = InsuranceEngine::new(ADMIN, EngineConfig::default());
        engine.fund_pool(ADMIN, Quote::new(dec!(1_000))).unwrap();
        engine
    }

    fn insure(engine: &mut InsuranceEngine, owner: AccountId, slip: SlipId) -> Quote {
        let amount = Quote::new(dec!(1.0));
        let premium = engine.calculate_premium(owner, amount).unwrap();
        engine
            .purchase_insurance(owner, slip, amount, premium)
            .unwrap();
        premium
    }

    #[test]
    fn premium_quote_is_pure() {
        let engine = funded_engine();
        let amount = Quote::new(dec!(1.0));

        let first = engine.calculate_premium(ALICE, amount).unwrap();
        let second = engine.calculate_premium(ALICE, amount).unwrap();
        assert_eq!(first, second);
        // quoting emits nothing and moves nothing
        assert_eq!(engine.notices().len(), 1); // just the PoolFunded notice
        assert_eq!(engine.pool_held(), Quote::new(dec!(1_000)));
    }

    #[test]
    fn purchase_locks_premium_into_pool() {
        let mut engine = funded_engine();
        let premium = insure(&mut engine, ALICE, SlipId(1));

        let policy = engine.policy(SlipId(1)).unwrap();
        assert_eq!(policy.owner, ALICE);
        assert_eq!(policy.status, PolicyStatus::Active);
        assert_eq!(policy.premium, premium);
        assert_eq!(
            engine.pool_held(),
            Quote::new(dec!(1_000)).checked_add(premium).unwrap()
        );
    }

    #[test]
    fn wrong_attached_value_rejected() {
        let mut engine = funded_engine();
        let err = engine
            .purchase_insurance(ALICE, SlipId(1), Quote::new(dec!(1.0)), Quote::new(dec!(0.5)))
            .unwrap_err();
        assert!(matches!(err, EngineError::PremiumMismatch { .. }));
        assert!(engine.policy(SlipId(1)).is_none());
        assert_eq!(engine.pool_held(), Quote::new(dec!(1_000)));
    }

    #[test]
    fn live_policy_blocks_repurchase() {
        let mut engine = funded_engine();
        insure(&mut engine, ALICE, SlipId(1));

        let premium = engine.calculate_premium(BOB, Quote::new(dec!(1.0))).unwrap();
        assert_eq!(
            engine.purchase_insurance(BOB, SlipId(1), Quote::new(dec!(1.0)), premium),
            Err(EngineError::AlreadyInsured(SlipId(1)))
        );

        // still blocked while a claim is pending
        engine.file_claim(ALICE, SlipId(1)).unwrap();
        assert_eq!(
            engine.purchase_insurance(BOB, SlipId(1), Quote::new(dec!(1.0)), premium),
            Err(EngineError::AlreadyInsured(SlipId(1)))
        );
    }

    #[test]
    fn settled_slip_can_be_reinsured() {
        let mut engine = funded_engine();
        insure(&mut engine, ALICE, SlipId(1));
        engine.file_claim(ALICE, SlipId(1)).unwrap();
        engine.settle_claim(ADMIN, SlipId(1), false).unwrap();

        insure(&mut engine, BOB, SlipId(1));
        let policy = engine.policy(SlipId(1)).unwrap();
        assert_eq!(policy.owner, BOB);
        assert_eq!(policy.status, PolicyStatus::Active);
    }

    #[test]
    fn only_owner_files_claim() {
        let mut engine = funded_engine();
        insure(&mut engine, ALICE, SlipId(1));

        assert_eq!(
            engine.file_claim(BOB, SlipId(1)),
            Err(EngineError::Unauthorized(BOB))
        );
        assert_eq!(
            engine.file_claim(ALICE, SlipId(99)),
            Err(EngineError::NotFound(SlipId(99)))
        );
    }

    #[test]
    fn claim_then_approve_pays_insured_amount() {
        let mut engine = funded_engine();
        let premium = insure(&mut engine, ALICE, SlipId(1));
        let pool_before = engine.pool_held();

        engine.file_claim(ALICE, SlipId(1)).unwrap();
        let result = engine.settle_claim(ADMIN, SlipId(1), true).unwrap();

        assert!(result.approved);
        assert_eq!(result.amount_paid, Quote::new(dec!(1.0)));
        assert_eq!(
            engine.pool_held(),
            pool_before.checked_sub(Quote::new(dec!(1.0))).unwrap()
        );
        assert_eq!(
            engine.policy(SlipId(1)).unwrap().status,
            PolicyStatus::SettledPaid
        );
        // premium stays in the pool either way
        let _ = premium;
    }

    #[test]
    fn denied_claim_moves_no_funds() {
        let mut engine = funded_engine();
        insure(&mut engine, ALICE, SlipId(1));
        let pool_before = engine.pool_held();

        engine.file_claim(ALICE, SlipId(1)).unwrap();
        let result = engine.settle_claim(ADMIN, SlipId(1), false).unwrap();

        assert!(!result.approved);
        assert_eq!(result.amount_paid, Quote::zero());
        assert_eq!(engine.pool_held(), pool_before);
        assert_eq!(
            engine.policy(SlipId(1)).unwrap().status,
            PolicyStatus::SettledDenied
        );
    }

    #[test]
    fn settlement_is_terminal() {
        let mut engine = funded_engine();
        insure(&mut engine, ALICE, SlipId(1));
        engine.file_claim(ALICE, SlipId(1)).unwrap();
        engine.settle_claim(ADMIN, SlipId(1), true).unwrap();

        assert_eq!(
            engine.settle_claim(ADMIN, SlipId(1), true),
            Err(EngineError::NotPending(SlipId(1)))
        );
        // and no second claim either
        assert_eq!(
            engine.file_claim(ALICE, SlipId(1)),
            Err(EngineError::NotActive(SlipId(1)))
        );
    }

    #[test]
    fn settle_requires_pending_claim() {
        let mut engine = funded_engine();
        insure(&mut engine, ALICE, SlipId(1));

        assert_eq!(
            engine.settle_claim(ADMIN, SlipId(1), true),
            Err(EngineError::NotPending(SlipId(1)))
        );
        assert_eq!(
            engine.settle_claim(ALICE, SlipId(1), true),
            Err(EngineError::Unauthorized(ALICE))
        );
    }

    #[test]
    fn underfunded_pool_keeps_claim_pending() {
        let mut engine = InsuranceEngine::new(ADMIN, EngineConfig::default());
        let amount = Quote::new(dec!(100));
        let premium = engine.calculate_premium(ALICE, amount).unwrap();
        engine
            .purchase_insurance(ALICE, SlipId(1), amount, premium)
            .unwrap();
        engine.file_claim(ALICE, SlipId(1)).unwrap();

        // pool holds only the premium, nowhere near the insured amount
        let err = engine.settle_claim(ADMIN, SlipId(1), true).unwrap_err();
        assert!(matches!(err, EngineError::InsufficientPool { .. }));
        assert_eq!(
            engine.policy(SlipId(1)).unwrap().status,
            PolicyStatus::PendingSettlement
        );

        // funding the pool unblocks the settlement
        engine.fund_pool(ADMIN, Quote::new(dec!(200))).unwrap();
        engine.settle_claim(ADMIN, SlipId(1), true).unwrap();
    }

    #[test]
    fn notice_stream_reconstructs_lifecycle() {
        let mut engine = funded_engine();
        insure(&mut engine, ALICE, SlipId(1));
        engine.file_claim(ALICE, SlipId(1)).unwrap();
        engine.settle_claim(ADMIN, SlipId(1), true).unwrap();

        let kinds: Vec<&'static str> = engine
            .notices()
            .iter()
            .map(|n| match &n.payload {
                NoticePayload::PoolFunded(_) => "funded",
                NoticePayload::InsurancePurchased(_) => "purchased",
                NoticePayload::ClaimFiled(_) => "filed",
                NoticePayload::ClaimSettled(_) => "settled",
                _ => "other",
            })
            .collect();
        assert_eq!(kinds, vec!["funded", "purchased", "filed", "settled"]);

        match &engine.notices()[3].payload {
            NoticePayload::ClaimSettled(s) => {
                assert!(s.approved);
                assert_eq!(s.amount_paid, Quote::new(dec!(1.0)));
            }
            other => panic!("expected settlement notice, got {other:?}"),
        }
    }
}
