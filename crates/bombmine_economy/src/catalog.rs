//! # Catalog
//!
//! Facility and hero types, kept in two arenas and referenced everywhere
//! by their stable numeric index.
//!
//! Entries are append-only: an index, once issued, always resolves to the
//! same grid, price and power. Availability is the only mutable bit
//! (`active` for facilities, `in_production` for heroes).
//!
//! Indices start at 1. The starter facility and the starter hero are the
//! first entries of their arenas.

use bombmine_chain::U256;

use crate::config::{FacilitySpec, HeroSpec};
use crate::error::{GameError, GameResult};

/// Index of a facility type.
pub type FacilityIndex = u32;

/// Index of a hero type.
pub type HeroIndex = u32;

/// Index of the facility every player starts in.
pub const STARTER_FACILITY_INDEX: FacilityIndex = 1;

/// Index of the hero handed out by the free starter claim.
pub const STARTER_HERO_INDEX: HeroIndex = 1;

/// A facility type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FacilityType {
    /// Stable index.
    pub index: FacilityIndex,
    /// Grid columns.
    pub grid_width: u32,
    /// Grid rows.
    pub grid_height: u32,
    /// Native price in wei.
    pub price_wei: U256,
    /// Whether the type can be bought.
    pub active: bool,
    /// Seconds an owner waits before upgrading away from this type.
    pub upgrade_cooldown_secs: u64,
    /// Placed miner capacity.
    pub max_miners: u32,
}

impl FacilityType {
    /// Returns true if `(x, y)` lies on this type's grid.
    #[inline]
    #[must_use]
    pub const fn contains(&self, x: u32, y: u32) -> bool {
        x < self.grid_width && y < self.grid_height
    }
}

/// A hero (miner) type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeroType {
    /// Stable index.
    pub index: HeroIndex,
    /// Reward base units produced per second.
    pub power_per_second: u64,
    /// Rarity tier.
    pub tier: u8,
    /// Token cost in base units.
    pub cost_tokens: U256,
    /// Whether `buy_hero` may issue this type.
    pub in_production: bool,
}

/// The two catalog arenas.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    facilities: Vec<FacilityType>,
    heroes: Vec<HeroType>,
}

impl Catalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a facility type.
    ///
    /// # Errors
    ///
    /// Rejects zero grid dimensions and zero capacity.
    pub fn add_facility(&mut self, spec: &FacilitySpec) -> GameResult<FacilityIndex> {
        if spec.grid_width == 0 || spec.grid_height == 0 {
            return Err(GameError::InvalidCatalogEntry(
                "grid dimensions must be at least 1",
            ));
        }
        if spec.max_miners == 0 {
            return Err(GameError::InvalidCatalogEntry("max_miners must be at least 1"));
        }

        let index = next_index(self.facilities.len())?;
        self.facilities.push(FacilityType {
            index,
            grid_width: spec.grid_width,
            grid_height: spec.grid_height,
            price_wei: spec.price,
            active: spec.active,
            upgrade_cooldown_secs: spec.upgrade_cooldown_secs,
            max_miners: spec.max_miners,
        });
        Ok(index)
    }

    /// Appends a hero type.
    ///
    /// # Errors
    ///
    /// Rejects zero power.
    pub fn add_hero(&mut self, spec: &HeroSpec) -> GameResult<HeroIndex> {
        if spec.power_per_second == 0 {
            return Err(GameError::InvalidCatalogEntry(
                "power_per_second must be at least 1",
            ));
        }

        let index = next_index(self.heroes.len())?;
        self.heroes.push(HeroType {
            index,
            power_per_second: spec.power_per_second,
            tier: spec.tier,
            cost_tokens: spec.cost,
            in_production: spec.in_production,
        });
        Ok(index)
    }

    /// Looks up a facility type.
    #[must_use]
    pub fn facility(&self, index: FacilityIndex) -> Option<&FacilityType> {
        self.facilities.get(slot_of(index)?)
    }

    /// Looks up a hero type.
    #[must_use]
    pub fn hero(&self, index: HeroIndex) -> Option<&HeroType> {
        self.heroes.get(slot_of(index)?)
    }

    /// Looks up a facility type, failing if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::FacilityNotFound`].
    pub fn require_facility(&self, index: FacilityIndex) -> GameResult<&FacilityType> {
        self.facility(index).ok_or(GameError::FacilityNotFound(index))
    }

    /// Looks up a hero type, failing if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::HeroNotFound`].
    pub fn require_hero(&self, index: HeroIndex) -> GameResult<&HeroType> {
        self.hero(index).ok_or(GameError::HeroNotFound(index))
    }

    /// Toggles whether a facility type can be bought.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::FacilityNotFound`].
    pub fn set_facility_active(&mut self, index: FacilityIndex, active: bool) -> GameResult<()> {
        let slot = slot_of(index).ok_or(GameError::FacilityNotFound(index))?;
        let facility = self
            .facilities
            .get_mut(slot)
            .ok_or(GameError::FacilityNotFound(index))?;
        facility.active = active;
        Ok(())
    }

    /// Toggles whether a hero type can be bought.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::HeroNotFound`].
    pub fn set_hero_in_production(&mut self, index: HeroIndex, in_production: bool) -> GameResult<()> {
        let slot = slot_of(index).ok_or(GameError::HeroNotFound(index))?;
        let hero = self
            .heroes
            .get_mut(slot)
            .ok_or(GameError::HeroNotFound(index))?;
        hero.in_production = in_production;
        Ok(())
    }

    /// Number of hero types ever added.
    #[inline]
    #[must_use]
    pub fn unique_hero_count(&self) -> u32 {
        // Bounded by `next_index`.
        u32::try_from(self.heroes.len()).unwrap_or(u32::MAX)
    }

    /// Number of facility types ever added.
    #[inline]
    #[must_use]
    pub fn unique_facility_count(&self) -> u32 {
        u32::try_from(self.facilities.len()).unwrap_or(u32::MAX)
    }

    /// Iterates hero types in index order.
    pub fn heroes(&self) -> impl Iterator<Item = &HeroType> {
        self.heroes.iter()
    }

    /// Iterates facility types in index order.
    pub fn facilities(&self) -> impl Iterator<Item = &FacilityType> {
        self.facilities.iter()
    }
}

/// Index for the entry appended after `len` existing ones.
fn next_index(len: usize) -> GameResult<u32> {
    u32::try_from(len)
        .ok()
        .and_then(|n| n.checked_add(1))
        .ok_or(GameError::ArithmeticOverflow)
}

/// Arena slot of a 1-based index.
fn slot_of(index: u32) -> Option<usize> {
    usize::try_from(index.checked_sub(1)?).ok()
}
