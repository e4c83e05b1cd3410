//! # Accrual Engine
//!
//! Lazy-checkpoint reward accrual. Nothing is computed per tick: each
//! player carries the power they had at their last checkpoint, and the
//! reward for the interval since is `elapsed * power`, folded in the next
//! time their miner set changes or they claim.
//!
//! ```text
//! accrued  += (now - last_checkpoint) * power_at_checkpoint
//! power_at_checkpoint = current power
//! last_checkpoint     = now
//! ```

use std::collections::HashMap;

use bombmine_chain::{Address, U256};

use crate::error::{GameError, GameResult};

/// A player's reward bookkeeping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RewardState {
    /// Accrued since the last claim, as of `last_checkpoint`.
    pub accrued_unclaimed: U256,
    /// Timestamp of the last checkpoint.
    pub last_checkpoint: u64,
    /// Power in effect since `last_checkpoint`.
    pub power_at_checkpoint: u64,
    /// Everything ever claimed.
    pub total_claimed: U256,
}

impl RewardState {
    /// Reward earned between the last checkpoint and `now`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::ArithmeticOverflow`] if the total does not fit.
    pub fn projected(&self, now: u64) -> GameResult<U256> {
        let elapsed = now.saturating_sub(self.last_checkpoint);
        U256::from(elapsed)
            .checked_mul(U256::from(self.power_at_checkpoint))
            .and_then(|earned| self.accrued_unclaimed.checked_add(earned))
            .ok_or(GameError::ArithmeticOverflow)
    }
}

/// Per-player reward states plus the global mining start.
#[derive(Clone, Debug, Default)]
pub struct AccrualEngine {
    players: HashMap<Address, RewardState>,
    start_time: Option<u64>,
}

impl AccrualEngine {
    /// Creates an engine with no players.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a player's state, if they ever held a miner.
    #[must_use]
    pub fn state(&self, player: Address) -> Option<&RewardState> {
        self.players.get(&player)
    }

    /// Folds the interval since the last checkpoint into the accrued
    /// amount and switches to `power`.
    ///
    /// A player without state is registered at `now`, so accrual never
    /// predates their first miner. Time never runs backwards: a stale
    /// `now` leaves the checkpoint where it is.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::ArithmeticOverflow`] if the accrued amount does
    /// not fit.
    pub fn checkpoint(&mut self, player: Address, power: u64, now: u64) -> GameResult<()> {
        let state = self.players.entry(player).or_insert(RewardState {
            last_checkpoint: now,
            ..RewardState::default()
        });

        state.accrued_unclaimed = state.projected(now)?;
        state.last_checkpoint = state.last_checkpoint.max(now);
        state.power_at_checkpoint = power;

        tracing::debug!(
            "Checkpoint {}: power={}, accrued={}",
            player,
            power,
            state.accrued_unclaimed
        );
        Ok(())
    }

    /// Read-only projection of what a claim at `now` would mint.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::ArithmeticOverflow`] if the total does not fit.
    pub fn pending(&self, player: Address, now: u64) -> GameResult<U256> {
        self.players
            .get(&player)
            .map_or(Ok(U256::ZERO), |state| state.projected(now))
    }

    /// Takes the accrued amount, adding it to `total_claimed`. Call after
    /// a checkpoint at the claim time.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NoRewardsPending`] when there is nothing to take.
    pub fn drain(&mut self, player: Address) -> GameResult<U256> {
        let state = self
            .players
            .get_mut(&player)
            .ok_or(GameError::NoRewardsPending)?;
        if state.accrued_unclaimed.is_zero() {
            return Err(GameError::NoRewardsPending);
        }

        let amount = state.accrued_unclaimed;
        state.total_claimed = state
            .total_claimed
            .checked_add(amount)
            .ok_or(GameError::ArithmeticOverflow)?;
        state.accrued_unclaimed = U256::ZERO;
        Ok(amount)
    }

    /// Everything a player has claimed so far.
    #[must_use]
    pub fn total_claimed(&self, player: Address) -> U256 {
        self.players
            .get(&player)
            .map_or(U256::ZERO, |state| state.total_claimed)
    }

    /// Records the first miner issued anywhere. Later calls are ignored.
    /// Returns true on the first call.
    pub fn note_first_miner(&mut self, now: u64) -> bool {
        if self.start_time.is_some() {
            return false;
        }
        self.start_time = Some(now);
        true
    }

    /// Returns true once any miner has been issued.
    #[must_use]
    pub const fn mining_has_started(&self) -> bool {
        self.start_time.is_some()
    }

    /// Timestamp of the first miner issued, if any.
    #[must_use]
    pub const fn start_time(&self) -> Option<u64> {
        self.start_time
    }
}
