// 6.0: insurance-side state. a Policy hedges one bet slip; a claim is not a
// separate record, just the Active -> PendingSettlement transition plus its
// timestamp. the premium schedule is pure configuration, tiered by coverage.

use crate::types::{AccountId, Bps, Quote, SlipId, Timestamp};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

// Active -> PendingSettlement -> SettledPaid | SettledDenied. no way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolicyStatus {
    Active,
    PendingSettlement,
    SettledPaid,
    SettledDenied,
}

impl PolicyStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PolicyStatus::SettledPaid | PolicyStatus::SettledDenied)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    pub slip_id: SlipId,
    pub owner: AccountId,
    pub insured_amount: Quote,
    pub premium: Quote,
    pub status: PolicyStatus,
    pub purchased_at: Timestamp,
    pub claimed_at: Option<Timestamp>,
    pub settled_at: Option<Timestamp>,
}

impl Policy {
    pub fn new(
        slip_id: SlipId,
        owner: AccountId,
        insured_amount: Quote,
        premium: Quote,
        purchased_at: Timestamp,
    ) -> Self {
        Self {
            slip_id,
            owner,
            insured_amount,
            premium,
            status: PolicyStatus::Active,
            purchased_at,
            claimed_at: None,
            settled_at: None,
        }
    }
}

/// One rung of the premium rate table. Coverage up to `max_insured` is quoted
/// at `rate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PremiumTier {
    pub max_insured: Quote,
    pub rate: Bps,
}

/// Premium rate table. Rates must be non-decreasing across tiers so the
/// premium stays monotonic in the insured amount; `base_rate` covers anything
/// past the last tier. Pure data, no state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PremiumSchedule {
    pub tiers: Vec<PremiumTier>,
    pub base_rate: Bps,
    pub min_premium: Quote,
}

impl Default for PremiumSchedule {
    fn default() -> Self {
        Self {
            tiers: vec![
                PremiumTier {
                    max_insured: Quote::new(dec!(100)),
                    rate: Bps::new(200), // 2%
                },
                PremiumTier {
                    max_insured: Quote::new(dec!(1_000)),
                    rate: Bps::new(300), // 3%
                },
            ],
            base_rate: Bps::new(500), // 5%
            min_premium: Quote::new(dec!(0.01)),
        }
    }
}

impl PremiumSchedule {
    pub fn rate_for(&self, insured_amount: Quote) -> Bps {
        for tier in &self.tiers {
            if insured_amount <= tier.max_insured {
                return tier.rate;
            }
        }
        self.base_rate
    }

    /// Deterministic premium for the given coverage. `None` only on overflow.
    pub fn premium(&self, insured_amount: Quote) -> Option<Quote> {
        let raw = insured_amount.checked_mul(self.rate_for(insured_amount).as_fraction())?;
        Some(raw.max(self.min_premium))
    }
}
