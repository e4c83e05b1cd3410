//! # Facility Registry
//!
//! One facility per player. A facility is a snapshot of the catalog entry
//! it was bought from: toggling that entry later never touches it.

use std::collections::HashMap;

use bombmine_chain::Address;

use crate::catalog::{FacilityIndex, FacilityType};

/// A player's owned facility.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerFacility {
    /// Catalog type the facility was bought as.
    pub facility_index: FacilityIndex,
    /// Grid columns.
    pub x: u32,
    /// Grid rows.
    pub y: u32,
    /// Placed miner capacity.
    pub max_miners: u32,
    /// Timestamp of the initial purchase.
    pub purchased_at: u64,
    /// Timestamp of the last purchase or upgrade.
    pub last_upgrade_at: u64,
}

impl PlayerFacility {
    /// Instantiates a facility from its catalog type.
    #[must_use]
    pub const fn from_type(kind: &FacilityType, now: u64) -> Self {
        Self {
            facility_index: kind.index,
            x: kind.grid_width,
            y: kind.grid_height,
            max_miners: kind.max_miners,
            purchased_at: now,
            last_upgrade_at: now,
        }
    }

    /// Returns true if `(x, y)` is on this facility's grid.
    #[inline]
    #[must_use]
    pub const fn contains(&self, x: u32, y: u32) -> bool {
        x < self.x && y < self.y
    }

    /// Earliest timestamp an upgrade away from this facility is allowed.
    #[inline]
    #[must_use]
    pub const fn ready_at(&self, cooldown_secs: u64) -> u64 {
        self.last_upgrade_at.saturating_add(cooldown_secs)
    }

    /// Moves the facility onto a new type, keeping `purchased_at`.
    pub fn upgrade(&mut self, kind: &FacilityType, now: u64) {
        self.facility_index = kind.index;
        self.x = kind.grid_width;
        self.y = kind.grid_height;
        self.max_miners = kind.max_miners;
        self.last_upgrade_at = now;
    }
}

/// Facility ownership and referral bookkeeping.
#[derive(Clone, Debug, Default)]
pub struct FacilityRegistry {
    owners: HashMap<Address, PlayerFacility>,
    referrers: HashMap<Address, Address>,
}

impl FacilityRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the player's facility, if any.
    #[must_use]
    pub fn get(&self, player: Address) -> Option<&PlayerFacility> {
        self.owners.get(&player)
    }

    /// Returns the player's facility for modification.
    pub fn get_mut(&mut self, player: Address) -> Option<&mut PlayerFacility> {
        self.owners.get_mut(&player)
    }

    /// Returns true if the player owns a facility.
    #[must_use]
    pub fn owns(&self, player: Address) -> bool {
        self.owners.contains_key(&player)
    }

    /// Records a first facility. Returns false if one already exists.
    pub fn open(&mut self, player: Address, facility: PlayerFacility) -> bool {
        if self.owns(player) {
            return false;
        }
        self.owners.insert(player, facility);
        true
    }

    /// Records who referred `player`.
    pub fn set_referrer(&mut self, player: Address, referrer: Address) {
        self.referrers.insert(player, referrer);
    }

    /// Returns who referred `player`, if anyone did.
    #[must_use]
    pub fn referrer_of(&self, player: Address) -> Option<Address> {
        self.referrers.get(&player).copied()
    }

    /// Number of facility owners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    /// Returns true if nobody owns a facility yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}
