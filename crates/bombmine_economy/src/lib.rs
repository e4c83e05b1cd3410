//! # BOMBMINE Economy
//!
//! The idle-mining game as a pure Rust state machine. Players buy a
//! facility, stand miners on its grid and accrue Bombcoin in proportion to
//! their miners' combined power.
//!
//! ## Design Principles
//!
//! 1. **Zero floating point** - every amount is a `U256` in base units
//! 2. **O(1) accrual** - rewards are folded lazily at checkpoints, never per tick
//! 3. **Transactional actions** - every action commits in full or not at all
//! 4. **External configuration** - deployment parameters load from TOML
//!
//! ## Example
//!
//! ```rust,ignore
//! use bombmine_chain::{Address, MemoryLedger};
//! use bombmine_economy::{BombGame, Call, GameConfig, STARTER_FACILITY_PRICE};
//!
//! let config = GameConfig::load("bombmine.toml")?;
//! let mut game = BombGame::new(&config, MemoryLedger::new())?;
//!
//! let call = Call::new(player, now).with_value(STARTER_FACILITY_PRICE);
//! game.purchase_initial_facility(call, referrer)?;
//! game.get_free_starter_hero(Call::new(player, now), 0, 0)?;
//!
//! let pending = game.pending_rewards(player, now + 3600)?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod accrual;
pub mod catalog;
pub mod config;
pub mod error;
pub mod events;
pub mod facility;
pub mod game;
pub mod market;
pub mod miners;

pub use accrual::{AccrualEngine, RewardState};
pub use catalog::{
    Catalog, FacilityIndex, FacilityType, HeroIndex, HeroType, STARTER_FACILITY_INDEX,
    STARTER_HERO_INDEX,
};
pub use config::{
    FacilitySpec, GameConfig, HeroSpec, ListingSpec, MAX_REFERRAL_FEE_BPS, STARTER_FACILITY_PRICE,
};
pub use error::{GameError, GameResult};
pub use events::GameEvent;
pub use facility::{FacilityRegistry, PlayerFacility};
pub use game::{BombGame, Call, GameState, Settings};
pub use market::{split_referral, Listing, SecondaryMarket};
pub use miners::{Cell, MinerId, MinerInstance, MinerRegistry};
