// 2.0: the escrow ledger discipline both engines share. value enters a position by
// locking and leaves by releasing, each exactly once per obligation. the ledger
// keeps lifetime totals so conservation is checkable at any point:
//   locked_total == released_total + held()
// all arithmetic is checked. an overflow or an over-release aborts the operation,
// it never wraps and never truncates.

use crate::types::Quote;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EscrowError {
    #[error("Escrow arithmetic overflow")]
    Overflow,

    #[error("Release of {requested} exceeds held balance {held}")]
    OverRelease { requested: Quote, held: Quote },

    #[error("Escrow amounts must be positive, got {0}")]
    NonPositive(Quote),
}

/// Lifetime accounting for one escrow position (one market event, or the
/// insurance pool). Never reset, never decremented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Escrow {
    locked_total: Quote,
    released_total: Quote,
}

impl Escrow {
    pub fn new() -> Self {
        Self {
            locked_total: Quote::zero(),
            released_total: Quote::zero(),
        }
    }

    /// Value currently held against open obligations.
    pub fn held(&self) -> Quote {
        // released never exceeds locked (release() enforces it), so this cannot underflow.
        Quote::new(self.locked_total.value() - self.released_total.value())
    }

    pub fn locked_total(&self) -> Quote {
        self.locked_total
    }

    pub fn released_total(&self) -> Quote {
        self.released_total
    }

    /// Lock incoming value into the position.
    pub fn lock(&mut self, amount: Quote) -> Result<(), EscrowError> {
        if amount.is_zero() || amount.is_negative() {
            return Err(EscrowError::NonPositive(amount));
        }
        self.locked_total = self
            .locked_total
            .checked_add(amount)
            .ok_or(EscrowError::Overflow)?;
        Ok(())
    }

    /// Release value out of the position. Fails if the position does not hold enough.
    pub fn release(&mut self, amount: Quote) -> Result<(), EscrowError> {
        if amount.is_zero() || amount.is_negative() {
            return Err(EscrowError::NonPositive(amount));
        }
        if amount > self.held() {
            return Err(EscrowError::OverRelease {
                requested: amount,
                held: self.held(),
            });
        }
        self.released_total = self
            .released_total
            .checked_add(amount)
            .ok_or(EscrowError::Overflow)?;
        Ok(())
    }

    pub fn can_release(&self, amount: Quote) -> bool {
        !amount.is_negative() && amount <= self.held()
    }
}
