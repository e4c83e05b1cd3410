//! # Miner Registry
//!
//! Every miner instance in the game, who owns it and where it stands.
//!
//! ## Invariants
//!
//! - Ids are issued from 1 and never reused, even after a sale.
//! - A placed miner lies within its owner's facility grid.
//! - No two placed miners of one owner share a cell.
//! - An owner never has more placed miners than their facility allows.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use bombmine_chain::Address;

use crate::catalog::{Catalog, HeroIndex};
use crate::error::{GameError, GameResult};
use crate::facility::PlayerFacility;

/// Globally unique miner id.
pub type MinerId = u64;

/// A grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
}

impl Cell {
    /// Creates a cell.
    #[inline]
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// One owned miner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MinerInstance {
    /// Globally unique id.
    pub id: MinerId,
    /// Current owner.
    pub owner: Address,
    /// Hero type.
    pub hero_index: HeroIndex,
    /// Grid position. `None` once a facility change pushed it off the grid.
    pub placement: Option<Cell>,
    /// Timestamp of issue.
    pub acquired_at: u64,
}

impl MinerInstance {
    /// Returns true if the miner stands on a cell and produces.
    #[inline]
    #[must_use]
    pub const fn is_placed(&self) -> bool {
        self.placement.is_some()
    }
}

/// Miner ownership and grid occupancy.
#[derive(Clone, Debug)]
pub struct MinerRegistry {
    next_id: MinerId,
    miners: BTreeMap<MinerId, MinerInstance>,
    by_owner: HashMap<Address, BTreeSet<MinerId>>,
    occupied: HashMap<(Address, Cell), MinerId>,
    starter_claimed: HashSet<Address>,
    retired: u64,
}

impl Default for MinerRegistry {
    fn default() -> Self {
        Self {
            next_id: 1,
            miners: BTreeMap::new(),
            by_owner: HashMap::new(),
            occupied: HashMap::new(),
            starter_claimed: HashSet::new(),
            retired: 0,
        }
    }
}

impl MinerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a miner by id.
    #[must_use]
    pub fn get(&self, id: MinerId) -> Option<&MinerInstance> {
        self.miners.get(&id)
    }

    /// Returns the miner if `owner` owns it.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::PlayerDoesNotOwnMiner`] if the id is unknown or
    /// owned by someone else.
    pub fn owned(&self, owner: Address, id: MinerId) -> GameResult<&MinerInstance> {
        self.miners
            .get(&id)
            .filter(|miner| miner.owner == owner)
            .ok_or(GameError::PlayerDoesNotOwnMiner(id))
    }

    /// Returns the id of the miner standing on `cell`, if any.
    #[must_use]
    pub fn occupant(&self, owner: Address, cell: Cell) -> Option<MinerId> {
        self.occupied.get(&(owner, cell)).copied()
    }

    /// Checks that `cell` is on the facility grid and free. The miner being
    /// moved, if any, does not count as an occupant.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidMinerCoordinates`].
    pub fn check_cell(
        &self,
        owner: Address,
        facility: &PlayerFacility,
        cell: Cell,
        moving: Option<MinerId>,
    ) -> GameResult<()> {
        let invalid = GameError::InvalidMinerCoordinates {
            x: cell.x,
            y: cell.y,
        };
        if !facility.contains(cell.x, cell.y) {
            return Err(invalid);
        }
        match self.occupant(owner, cell) {
            Some(id) if Some(id) != moving => Err(invalid),
            _ => Ok(()),
        }
    }

    /// Checks there is room for one more placed miner.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::FacilityFull`].
    pub fn ensure_capacity(&self, owner: Address, facility: &PlayerFacility) -> GameResult<()> {
        if self.placed_count(owner) >= facility.max_miners as usize {
            return Err(GameError::FacilityFull {
                max_miners: facility.max_miners,
            });
        }
        Ok(())
    }

    /// Issues a new miner on `cell`. The caller has validated the cell.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::ArithmeticOverflow`] if ids are exhausted.
    pub fn issue(
        &mut self,
        owner: Address,
        hero_index: HeroIndex,
        cell: Cell,
        now: u64,
    ) -> GameResult<MinerId> {
        let id = self.next_id;
        self.next_id = id.checked_add(1).ok_or(GameError::ArithmeticOverflow)?;

        self.miners.insert(
            id,
            MinerInstance {
                id,
                owner,
                hero_index,
                placement: Some(cell),
                acquired_at: now,
            },
        );
        self.by_owner.entry(owner).or_default().insert(id);
        self.occupied.insert((owner, cell), id);
        Ok(id)
    }

    /// Returns true if `owner` has taken their free starter miner.
    #[must_use]
    pub fn has_claimed_starter(&self, owner: Address) -> bool {
        self.starter_claimed.contains(&owner)
    }

    /// Records the free starter claim. Returns false if already recorded.
    pub fn mark_starter(&mut self, owner: Address) -> bool {
        self.starter_claimed.insert(owner)
    }

    /// Removes an owned miner and frees its cell.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::PlayerDoesNotOwnMiner`].
    pub fn remove(&mut self, owner: Address, id: MinerId) -> GameResult<MinerInstance> {
        self.owned(owner, id)?;
        let miner = self
            .miners
            .remove(&id)
            .ok_or(GameError::PlayerDoesNotOwnMiner(id))?;

        if let Some(cell) = miner.placement {
            self.occupied.remove(&(owner, cell));
        }
        if let Some(ids) = self.by_owner.get_mut(&owner) {
            ids.remove(&id);
            if ids.is_empty() {
                self.by_owner.remove(&owner);
            }
        }
        self.retired = self.retired.saturating_add(1);
        Ok(miner)
    }

    /// Moves an owned miner onto `cell`. The caller has validated the cell.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::PlayerDoesNotOwnMiner`].
    pub fn place(&mut self, owner: Address, id: MinerId, cell: Cell) -> GameResult<()> {
        let miner = self
            .miners
            .get_mut(&id)
            .filter(|miner| miner.owner == owner)
            .ok_or(GameError::PlayerDoesNotOwnMiner(id))?;

        if let Some(previous) = miner.placement.replace(cell) {
            self.occupied.remove(&(owner, previous));
        }
        self.occupied.insert((owner, cell), id);
        Ok(())
    }

    /// Takes miners off the grid so the owner's placement fits `facility`:
    /// first every miner outside the grid, then the newest placed miners
    /// until the count is within capacity. Returns the unplaced ids.
    pub fn fit_to(&mut self, owner: Address, facility: &PlayerFacility) -> Vec<MinerId> {
        let Some(ids) = self.by_owner.get(&owner) else {
            return Vec::new();
        };

        let mut placed: Vec<(MinerId, Cell)> = ids
            .iter()
            .filter_map(|id| {
                let miner = self.miners.get(id)?;
                miner.placement.map(|cell| (*id, cell))
            })
            .collect();

        let mut evicted: Vec<MinerId> = Vec::new();
        placed.retain(|(id, cell)| {
            let inside = facility.contains(cell.x, cell.y);
            if !inside {
                evicted.push(*id);
            }
            inside
        });

        let capacity = facility.max_miners as usize;
        if placed.len() > capacity {
            // Ascending by id, so the tail holds the newest.
            evicted.extend(placed.drain(capacity..).rev().map(|(id, _)| id));
        }

        for id in &evicted {
            if let Some(miner) = self.miners.get_mut(id) {
                if let Some(cell) = miner.placement.take() {
                    self.occupied.remove(&(owner, cell));
                }
            }
        }
        evicted
    }

    /// Owned miner ids in ascending order. An offset past the end yields an
    /// empty page.
    #[must_use]
    pub fn page(&self, owner: Address, offset: usize, limit: usize) -> Vec<MinerId> {
        self.by_owner
            .get(&owner)
            .map(|ids| ids.iter().skip(offset).take(limit).copied().collect())
            .unwrap_or_default()
    }

    /// Number of miners owned, placed or not.
    #[must_use]
    pub fn owned_count(&self, owner: Address) -> usize {
        self.by_owner.get(&owner).map_or(0, BTreeSet::len)
    }

    /// Number of miners on the owner's grid.
    #[must_use]
    pub fn placed_count(&self, owner: Address) -> usize {
        self.placed(owner).count()
    }

    /// Aggregate production of the owner's placed miners.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::ArithmeticOverflow`] if the sum does not fit.
    pub fn power_of(&self, owner: Address, catalog: &Catalog) -> GameResult<u64> {
        self.placed(owner).try_fold(0u64, |total, miner| {
            let power = catalog.require_hero(miner.hero_index)?.power_per_second;
            total
                .checked_add(power)
                .ok_or(GameError::ArithmeticOverflow)
        })
    }

    /// Number of miners ever issued.
    #[must_use]
    pub const fn total_issued(&self) -> u64 {
        self.next_id - 1
    }

    /// Number of miners sold back to the pool.
    #[must_use]
    pub const fn retired_count(&self) -> u64 {
        self.retired
    }

    fn placed(&self, owner: Address) -> impl Iterator<Item = &MinerInstance> {
        self.by_owner
            .get(&owner)
            .into_iter()
            .flatten()
            .filter_map(|id| self.miners.get(id))
            .filter(|miner| miner.is_placed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FacilityType;
    use crate::config::{FacilitySpec, HeroSpec};
    use bombmine_chain::U256;

    fn alice() -> Address {
        Address::repeat_byte(1)
    }

    fn bob() -> Address {
        Address::repeat_byte(2)
    }

    fn facility(w: u32, h: u32, max: u32) -> PlayerFacility {
        PlayerFacility::from_type(
            &FacilityType {
                index: 1,
                grid_width: w,
                grid_height: h,
                price_wei: U256::ZERO,
                active: true,
                upgrade_cooldown_secs: 0,
                max_miners: max,
            },
            0,
        )
    }

    #[test]
    fn test_ids_are_monotonic_and_never_reused() {
        let mut registry = MinerRegistry::new();
        let a = registry.issue(alice(), 1, Cell::new(0, 0), 0).unwrap();
        let b = registry.issue(bob(), 1, Cell::new(0, 0), 0).unwrap();
        assert_eq!((a, b), (1, 2));

        registry.remove(alice(), a).unwrap();
        let c = registry.issue(alice(), 1, Cell::new(0, 0), 0).unwrap();
        assert_eq!(c, 3);
        assert_eq!(registry.total_issued(), 3);
        assert_eq!(registry.retired_count(), 1);
    }

    #[test]
    fn test_check_cell_bounds_and_occupancy() {
        let mut registry = MinerRegistry::new();
        let grid = facility(2, 2, 4);

        assert!(registry.check_cell(alice(), &grid, Cell::new(1, 1), None).is_ok());
        assert_eq!(
            registry.check_cell(alice(), &grid, Cell::new(2, 0), None),
            Err(GameError::InvalidMinerCoordinates { x: 2, y: 0 })
        );

        let id = registry.issue(alice(), 1, Cell::new(1, 1), 0).unwrap();
        assert!(registry.check_cell(alice(), &grid, Cell::new(1, 1), None).is_err());
        // The occupant itself may stay where it is
        assert!(registry
            .check_cell(alice(), &grid, Cell::new(1, 1), Some(id))
            .is_ok());
        // Cells are per owner
        assert!(registry.check_cell(bob(), &grid, Cell::new(1, 1), None).is_ok());
    }

    #[test]
    fn test_remove_requires_ownership_and_frees_cell() {
        let mut registry = MinerRegistry::new();
        let id = registry.issue(alice(), 1, Cell::new(0, 1), 0).unwrap();

        assert_eq!(
            registry.remove(bob(), id),
            Err(GameError::PlayerDoesNotOwnMiner(id))
        );
        assert_eq!(
            registry.remove(alice(), 99),
            Err(GameError::PlayerDoesNotOwnMiner(99))
        );

        let miner = registry.remove(alice(), id).unwrap();
        assert_eq!(miner.placement, Some(Cell::new(0, 1)));
        assert_eq!(registry.occupant(alice(), Cell::new(0, 1)), None);
        assert_eq!(registry.owned_count(alice()), 0);
    }

    #[test]
    fn test_capacity() {
        let mut registry = MinerRegistry::new();
        let grid = facility(4, 4, 1);
        assert!(registry.ensure_capacity(alice(), &grid).is_ok());
        registry.issue(alice(), 1, Cell::new(0, 0), 0).unwrap();
        assert_eq!(
            registry.ensure_capacity(alice(), &grid),
            Err(GameError::FacilityFull { max_miners: 1 })
        );
    }

    #[test]
    fn test_fit_to_unplaces_outside_then_newest() {
        let mut registry = MinerRegistry::new();
        let a = registry.issue(alice(), 1, Cell::new(0, 0), 0).unwrap();
        let b = registry.issue(alice(), 1, Cell::new(3, 3), 0).unwrap();
        let c = registry.issue(alice(), 1, Cell::new(1, 0), 0).unwrap();
        let d = registry.issue(alice(), 1, Cell::new(0, 1), 0).unwrap();

        // 2x2 grid with room for two: b is outside, then d is the newest
        let evicted = registry.fit_to(alice(), &facility(2, 2, 2));
        assert_eq!(evicted, vec![b, d]);

        assert!(registry.get(a).unwrap().is_placed());
        assert!(registry.get(c).unwrap().is_placed());
        assert!(!registry.get(b).unwrap().is_placed());
        assert_eq!(registry.occupant(alice(), Cell::new(3, 3)), None);
        assert_eq!(registry.placed_count(alice()), 2);
        assert_eq!(registry.owned_count(alice()), 4);
    }

    #[test]
    fn test_place_moves_occupancy() {
        let mut registry = MinerRegistry::new();
        let id = registry.issue(alice(), 1, Cell::new(0, 0), 0).unwrap();
        registry.place(alice(), id, Cell::new(1, 1)).unwrap();

        assert_eq!(registry.occupant(alice(), Cell::new(0, 0)), None);
        assert_eq!(registry.occupant(alice(), Cell::new(1, 1)), Some(id));
        assert!(registry.place(bob(), id, Cell::new(0, 0)).is_err());
    }

    #[test]
    fn test_page_is_ascending_and_tolerates_offsets() {
        let mut registry = MinerRegistry::new();
        for x in 0..5 {
            registry.issue(alice(), 1, Cell::new(x, 0), 0).unwrap();
            registry.issue(bob(), 1, Cell::new(x, 0), 0).unwrap();
        }

        assert_eq!(registry.page(alice(), 0, 3), vec![1, 3, 5]);
        assert_eq!(registry.page(alice(), 3, 10), vec![7, 9]);
        assert!(registry.page(alice(), 5, 10).is_empty());
        assert!(registry.page(alice(), 100, 1).is_empty());
        assert!(registry.page(Address::repeat_byte(9), 0, 10).is_empty());
    }

    #[test]
    fn test_power_counts_placed_miners_only() {
        let mut catalog = Catalog::new();
        catalog.add_facility(&FacilitySpec::default()).unwrap();
        let weak = catalog
            .add_hero(&HeroSpec {
                power_per_second: 10,
                ..HeroSpec::default()
            })
            .unwrap();
        let strong = catalog
            .add_hero(&HeroSpec {
                power_per_second: 25,
                ..HeroSpec::default()
            })
            .unwrap();

        let mut registry = MinerRegistry::new();
        registry.issue(alice(), weak, Cell::new(0, 0), 0).unwrap();
        registry.issue(alice(), strong, Cell::new(5, 5), 0).unwrap();
        assert_eq!(registry.power_of(alice(), &catalog).unwrap(), 35);

        registry.fit_to(alice(), &facility(4, 4, 4));
        assert_eq!(registry.power_of(alice(), &catalog).unwrap(), 10);
        assert_eq!(registry.power_of(bob(), &catalog).unwrap(), 0);
    }

    #[test]
    fn test_starter_claim_once() {
        let mut registry = MinerRegistry::new();
        assert!(!registry.has_claimed_starter(alice()));
        assert!(registry.mark_starter(alice()));
        assert!(!registry.mark_starter(alice()));
        assert!(registry.has_claimed_starter(alice()));
    }
}
