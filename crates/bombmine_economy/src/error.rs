//! # Game Error Types
//!
//! Every way an action can fail. A returned error always means the action
//! was rolled back in full.

use bombmine_chain::{Address, LedgerError, U256};
use thiserror::Error;

use crate::catalog::{FacilityIndex, HeroIndex};
use crate::miners::MinerId;

/// Errors that can occur in the game economy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Admin-only action called by someone else.
    #[error("unauthorized: {caller} is not the admin")]
    Unauthorized {
        /// The rejected caller.
        caller: Address,
    },

    /// Native payment did not match the price exactly.
    #[error("incorrect value: expected {expected}, got {actual}")]
    IncorrectValue {
        /// Required payment.
        expected: U256,
        /// Attached payment.
        actual: U256,
    },

    /// The caller already owns a facility.
    #[error("initial factory already purchased")]
    AlreadyPurchasedInitialFactory,

    /// The caller already took their free starter miner.
    #[error("starter miner already acquired")]
    StarterMinerAlreadyAcquired,

    /// Cell is out of bounds, occupied, or the caller has no facility.
    #[error("invalid miner coordinates ({x}, {y})")]
    InvalidMinerCoordinates {
        /// Requested column.
        x: u32,
        /// Requested row.
        y: u32,
    },

    /// The token pull for a purchase was refused.
    #[error("too poor: cost is {cost}")]
    TooPoor {
        /// Token cost that could not be pulled.
        cost: U256,
    },

    /// Nothing to claim.
    #[error("no rewards pending")]
    NoRewardsPending,

    /// The miner does not exist or belongs to someone else.
    #[error("player does not own miner {0}")]
    PlayerDoesNotOwnMiner(MinerId),

    /// The current facility's upgrade cooldown has not elapsed.
    #[error("can't buy new facility yet: ready at {ready_at}")]
    CantBuyNewFacilityYet {
        /// Timestamp from which the upgrade is allowed.
        ready_at: u64,
    },

    /// The caller has no facility yet.
    #[error("player has no facility")]
    NoFacility,

    /// There is no facility type after the caller's current one.
    #[error("no facility upgrade available after {0}")]
    NoFacilityUpgradeAvailable(FacilityIndex),

    /// The facility type exists but is not for sale.
    #[error("facility {0} is not active")]
    FacilityNotActive(FacilityIndex),

    /// No facility type with this index.
    #[error("facility {0} not found")]
    FacilityNotFound(FacilityIndex),

    /// No hero type with this index.
    #[error("hero {0} not found")]
    HeroNotFound(HeroIndex),

    /// The hero type exists but cannot be acquired.
    #[error("hero {0} is not in production")]
    HeroNotInProduction(HeroIndex),

    /// The hero type has no enabled secondary market listing.
    #[error("no secondary market for hero {0}")]
    NoSecondaryMarket(HeroIndex),

    /// Every miner slot of the facility is taken.
    #[error("facility full: {max_miners} miners placed")]
    FacilityFull {
        /// Capacity of the facility.
        max_miners: u32,
    },

    /// Player actions are switched off.
    #[error("production is disabled")]
    ProductionDisabled,

    /// Referral fee above the allowed maximum.
    #[error("invalid referral fee: {0} bps")]
    InvalidReferralFee(u16),

    /// A catalog entry failed validation.
    #[error("invalid catalog entry: {0}")]
    InvalidCatalogEntry(&'static str),

    /// The Bombcoin address has not been set.
    #[error("ledger address not configured")]
    LedgerNotConfigured,

    /// The treasury address has not been set.
    #[error("treasury address not configured")]
    TreasuryNotConfigured,

    /// A token push out of the game pool was refused.
    #[error("ledger refused transfer of {amount}")]
    LedgerTransferFailed {
        /// Amount that could not be moved.
        amount: U256,
    },

    /// Arithmetic overflow in an economic calculation.
    #[error("arithmetic overflow in economic calculation")]
    ArithmeticOverflow,

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The ledger itself failed.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;
