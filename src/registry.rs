// 4.0: position ownership lives outside the core. the slip-minting token registry
// proves who holds a position; the engines only ever ask "who owns slip X" through
// the PositionRegistry capability. SlipBook is the in-memory stand-in used by
// tests and the simulator.

use crate::types::{AccountId, SlipId};
use std::collections::HashMap;

/// Ownership lookup for bet slips. Injected into owner-gated operations so the
/// core stays testable without a real token registry.
pub trait PositionRegistry {
    /// Current holder of the slip, or None if the slip was never minted.
    fn owner_of(&self, slip_id: SlipId) -> Option<AccountId>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Slip {0} already minted")]
    AlreadyMinted(SlipId),

    #[error("Slip {0} not minted")]
    NotMinted(SlipId),

    #[error("Account {from} does not hold slip {slip_id}")]
    NotHolder { slip_id: SlipId, from: AccountId },
}

/// In-memory slip registry. Mint-once, freely transferable.
#[derive(Debug, Clone, Default)]
pub struct SlipBook {
    holders: HashMap<SlipId, AccountId>,
}

impl SlipBook {
    pub fn new() -> Self {
        Self {
            holders: HashMap::new(),
        }
    }

    pub fn mint(&mut self, slip_id: SlipId, owner: AccountId) -> Result<(), RegistryError> {
        if self.holders.contains_key(&slip_id) {
            return Err(RegistryError::AlreadyMinted(slip_id));
        }
        self.holders.insert(slip_id, owner);
        Ok(())
    }

    pub fn transfer(
        &mut self,
        slip_id: SlipId,
        from: AccountId,
        to: AccountId,
    ) -> Result<(), RegistryError> {
        match self.holders.get(&slip_id) {
            None => Err(RegistryError::NotMinted(slip_id)),
            Some(holder) if *holder != from => Err(RegistryError::NotHolder { slip_id, from }),
            Some(_) => {
                self.holders.insert(slip_id, to);
                Ok(())
            }
        }
    }

    pub fn minted_count(&self) -> usize {
        self.holders.len()
    }
}

impl PositionRegistry for SlipBook {
    fn owner_of(&self, slip_id: SlipId) -> Option<AccountId> {
        self.holders.get(&slip_id).copied()
    }
}
