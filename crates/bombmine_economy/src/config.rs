//! # Game Configuration
//!
//! Deployment parameters, loaded once from TOML. Amounts are written as
//! ether strings (`price = "0.005"`) or raw wei integers.
//!
//! ```toml
//! admin = "0x1111111111111111111111111111111111111111"
//! game_address = "0x9999999999999999999999999999999999999999"
//! treasury = "0x2222222222222222222222222222222222222222"
//! referral_fee_bps = 250
//!
//! [starter_facility]
//! grid_width = 4
//! grid_height = 4
//! price = "0.005"
//! active = true
//! upgrade_cooldown_secs = 86400
//! max_miners = 4
//!
//! [[heroes]]
//! power_per_second = 120
//! tier = 2
//! cost = "100"
//! in_production = true
//! ```

use std::path::Path;

use bombmine_chain::units::serde_ether;
use bombmine_chain::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::catalog::HeroIndex;
use crate::error::{GameError, GameResult};

/// Highest referral fee an admin may set (5%).
pub const MAX_REFERRAL_FEE_BPS: u16 = 500;

/// Default referral fee (2.5%).
pub const DEFAULT_REFERRAL_FEE_BPS: u16 = 250;

/// Default starter facility price: 0.005 ether.
pub const STARTER_FACILITY_PRICE: U256 = U256::from_limbs([5_000_000_000_000_000, 0, 0, 0]);

/// Default upgrade cooldown: one day.
pub const DEFAULT_UPGRADE_COOLDOWN_SECS: u64 = 24 * 60 * 60;

/// Default starter hero power: 0.0001 token per second.
pub const STARTER_HERO_POWER: u64 = 100_000_000_000_000;

/// Definition of a facility type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FacilitySpec {
    /// Grid columns (>= 1).
    pub grid_width: u32,
    /// Grid rows (>= 1).
    pub grid_height: u32,
    /// Native price in wei. Zero means free.
    #[serde(with = "serde_ether")]
    pub price: U256,
    /// Whether the type can be bought.
    pub active: bool,
    /// Seconds an owner must wait before upgrading away from this type.
    pub upgrade_cooldown_secs: u64,
    /// Placed miner capacity (>= 1).
    pub max_miners: u32,
}

impl Default for FacilitySpec {
    fn default() -> Self {
        Self {
            grid_width: 4,
            grid_height: 4,
            price: STARTER_FACILITY_PRICE,
            active: true,
            upgrade_cooldown_secs: DEFAULT_UPGRADE_COOLDOWN_SECS,
            max_miners: 4,
        }
    }
}

/// Definition of a hero (miner) type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeroSpec {
    /// Reward base units produced per second (>= 1).
    pub power_per_second: u64,
    /// Cosmetic rarity tier.
    pub tier: u8,
    /// Token cost in base units. Zero means free.
    #[serde(with = "serde_ether")]
    pub cost: U256,
    /// Whether `buy_hero` may issue this type.
    pub in_production: bool,
}

impl Default for HeroSpec {
    /// The starter hero: free, and only obtainable through the starter claim.
    fn default() -> Self {
        Self {
            power_per_second: STARTER_HERO_POWER,
            tier: 1,
            cost: U256::ZERO,
            in_production: false,
        }
    }
}

/// A secondary market listing seeded at deployment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListingSpec {
    /// Hero type the listing is for.
    pub hero_index: HeroIndex,
    /// Token payout per miner sold.
    #[serde(with = "serde_ether")]
    pub price: U256,
}

fn default_referral_fee_bps() -> u16 {
    DEFAULT_REFERRAL_FEE_BPS
}

fn default_true() -> bool {
    true
}

/// Complete deployment configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GameConfig {
    /// The single privileged account.
    pub admin: Address,
    /// The game's own account: token pool, `transferFrom` spender, value escrow.
    pub game_address: Address,
    /// Receiver of facility payments ("bombtoshi").
    #[serde(default)]
    pub treasury: Address,
    /// Bombcoin token contract.
    #[serde(default)]
    pub bombcoin: Address,
    /// Referral share of the starter facility payment.
    #[serde(default = "default_referral_fee_bps")]
    pub referral_fee_bps: u16,
    /// Global kill-switch for player actions.
    #[serde(default = "default_true")]
    pub production_enabled: bool,
    /// Facility index 1.
    #[serde(default)]
    pub starter_facility: FacilitySpec,
    /// Hero index 1.
    #[serde(default)]
    pub starter_hero: HeroSpec,
    /// Further facility types, indices 2, 3, ...
    #[serde(default)]
    pub facilities: Vec<FacilitySpec>,
    /// Further hero types, indices 2, 3, ...
    #[serde(default)]
    pub heroes: Vec<HeroSpec>,
    /// Secondary market listings.
    #[serde(default)]
    pub secondary_market: Vec<ListingSpec>,
}

impl GameConfig {
    /// Creates a configuration with default economics and no extra catalog.
    #[must_use]
    pub fn new(admin: Address, game_address: Address) -> Self {
        Self {
            admin,
            game_address,
            treasury: Address::ZERO,
            bombcoin: Address::ZERO,
            referral_fee_bps: DEFAULT_REFERRAL_FEE_BPS,
            production_enabled: true,
            starter_facility: FacilitySpec::default(),
            starter_hero: HeroSpec::default(),
            facilities: Vec::new(),
            heroes: Vec::new(),
            secondary_market: Vec::new(),
        }
    }

    /// Sets the treasury address.
    #[must_use]
    pub const fn with_treasury(mut self, treasury: Address) -> Self {
        self.treasury = treasury;
        self
    }

    /// Sets the Bombcoin address.
    #[must_use]
    pub const fn with_bombcoin(mut self, bombcoin: Address) -> Self {
        self.bombcoin = bombcoin;
        self
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidConfig`] on malformed TOML or values.
    pub fn from_toml_str(text: &str) -> GameResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| GameError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidConfig`] if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> GameResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| GameError::InvalidConfig(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Serializes back to TOML.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidConfig`] if serialization fails.
    pub fn to_toml_string(&self) -> GameResult<String> {
        toml::to_string(self).map_err(|e| GameError::InvalidConfig(e.to_string()))
    }

    /// Checks deployment-level invariants. Catalog entries are validated
    /// when they are seeded.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> GameResult<()> {
        if self.admin == Address::ZERO {
            return Err(GameError::InvalidConfig("admin must be set".to_string()));
        }
        if self.game_address == Address::ZERO {
            return Err(GameError::InvalidConfig(
                "game_address must be set".to_string(),
            ));
        }
        if self.referral_fee_bps > MAX_REFERRAL_FEE_BPS {
            return Err(GameError::InvalidReferralFee(self.referral_fee_bps));
        }
        Ok(())
    }
}
