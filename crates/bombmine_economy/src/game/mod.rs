//! # Game
//!
//! [`BombGame`] is the economic state machine. It owns the whole game
//! state and the ledger it settles through; every mutating action is a
//! transaction over both.
//!
//! ## Action pipeline
//!
//! ```text
//! Call -> transact() -> snapshot state
//!   1. Checks       (admin, production switch, catalog lookups, value)
//!   2. Effects      (registries, accrual checkpoint, pending events)
//!   3. Interactions (ledger: send_value / transferFrom / transfer / mint)
//! Ok  -> publish events
//! Err -> restore snapshot, drop events
//! ```
//!
//! Ledger calls come last, and each action makes at most one ledger call
//! that can be refused for lack of funds, and always as the first one.
//! A refused call therefore never leaves a partial settlement behind.

mod admin;
mod player;

use bombmine_chain::{Address, Ledger, U256};
use crossbeam_channel::{Receiver, Sender};

use crate::accrual::AccrualEngine;
use crate::catalog::{Catalog, FacilityIndex, FacilityType, HeroIndex, HeroType};
use crate::config::GameConfig;
use crate::error::{GameError, GameResult};
use crate::events::GameEvent;
use crate::facility::{FacilityRegistry, PlayerFacility};
use crate::market::SecondaryMarket;
use crate::miners::{MinerId, MinerInstance, MinerRegistry};

/// Caller context of one action: who sends it, what native value is
/// attached and the block timestamp it executes at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Call {
    /// Trusted caller address.
    pub sender: Address,
    /// Attached native value in wei.
    pub value: U256,
    /// Execution timestamp in seconds.
    pub timestamp: u64,
}

impl Call {
    /// A call without attached value.
    #[must_use]
    pub const fn new(sender: Address, timestamp: u64) -> Self {
        Self {
            sender,
            value: U256::ZERO,
            timestamp,
        }
    }

    /// Attaches native value.
    #[must_use]
    pub const fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }
}

/// Addresses and switches behind the admin setters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// The single privileged account.
    pub admin: Address,
    /// Receiver of facility payments.
    pub treasury: Address,
    /// Bombcoin token contract.
    pub bombcoin: Address,
    /// The game's own account.
    pub game_address: Address,
    /// Referral share of a starter purchase.
    pub referral_fee_bps: u16,
    /// Global switch for player actions.
    pub production_enabled: bool,
}

impl Settings {
    fn bombcoin(&self) -> GameResult<Address> {
        if self.bombcoin == Address::ZERO {
            return Err(GameError::LedgerNotConfigured);
        }
        Ok(self.bombcoin)
    }

    fn treasury(&self) -> GameResult<Address> {
        if self.treasury == Address::ZERO {
            return Err(GameError::TreasuryNotConfigured);
        }
        Ok(self.treasury)
    }
}

/// Everything a transaction may change. Cloned as the rollback snapshot.
#[derive(Clone, Debug)]
pub struct GameState {
    /// Addresses and switches.
    pub settings: Settings,
    /// Facility and hero types.
    pub catalog: Catalog,
    /// Player facilities.
    pub facilities: FacilityRegistry,
    /// Miner instances.
    pub miners: MinerRegistry,
    /// Reward bookkeeping.
    pub accrual: AccrualEngine,
    /// Buyback listings.
    pub market: SecondaryMarket,
}

/// The idle-mining game economy.
pub struct BombGame<L: Ledger> {
    state: GameState,
    ledger: L,
    log: Vec<GameEvent>,
    subscribers: Vec<Sender<GameEvent>>,
}

/// An action in progress.
struct Tx<'a, L: Ledger> {
    state: &'a mut GameState,
    ledger: &'a mut L,
    call: Call,
    events: Vec<GameEvent>,
}

impl<L: Ledger> Tx<'_, L> {
    fn sender(&self) -> Address {
        self.call.sender
    }

    fn now(&self) -> u64 {
        self.call.timestamp
    }

    fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    fn require_admin(&self) -> GameResult<()> {
        if self.call.sender != self.state.settings.admin {
            tracing::warn!("Rejected admin call from {}", self.call.sender);
            return Err(GameError::Unauthorized {
                caller: self.call.sender,
            });
        }
        Ok(())
    }

    fn require_production(&self) -> GameResult<()> {
        if !self.state.settings.production_enabled {
            return Err(GameError::ProductionDisabled);
        }
        Ok(())
    }

    fn facility_of(&self, player: Address) -> GameResult<PlayerFacility> {
        self.state
            .facilities
            .get(player)
            .copied()
            .ok_or(GameError::NoFacility)
    }

    /// Folds the interval since the player's last checkpoint at their old
    /// power and switches to the power of their current placement.
    fn checkpoint(&mut self, player: Address) -> GameResult<()> {
        let power = self.state.miners.power_of(player, &self.state.catalog)?;
        let now = self.now();
        self.state.accrual.checkpoint(player, power, now)
    }
}

impl<L: Ledger> BombGame<L> {
    /// Builds a game from a validated configuration, seeding the catalog
    /// and the secondary market.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting or catalog entry.
    pub fn new(config: &GameConfig, ledger: L) -> GameResult<Self> {
        config.validate()?;

        let mut catalog = Catalog::new();
        catalog.add_facility(&config.starter_facility)?;
        catalog.add_hero(&config.starter_hero)?;
        for facility in &config.facilities {
            catalog.add_facility(facility)?;
        }
        for hero in &config.heroes {
            catalog.add_hero(hero)?;
        }

        let mut market = SecondaryMarket::new();
        for listing in &config.secondary_market {
            catalog.require_hero(listing.hero_index)?;
            market.upsert(listing.hero_index, listing.price);
        }

        tracing::info!(
            "Game created: admin={}, {} facility types, {} hero types",
            config.admin,
            catalog.unique_facility_count(),
            catalog.unique_hero_count()
        );

        Ok(Self {
            state: GameState {
                settings: Settings {
                    admin: config.admin,
                    treasury: config.treasury,
                    bombcoin: config.bombcoin,
                    game_address: config.game_address,
                    referral_fee_bps: config.referral_fee_bps,
                    production_enabled: config.production_enabled,
                },
                catalog,
                facilities: FacilityRegistry::new(),
                miners: MinerRegistry::new(),
                accrual: AccrualEngine::new(),
                market,
            },
            ledger,
            log: Vec::new(),
            subscribers: Vec::new(),
        })
    }

    /// Runs `action` all-or-nothing: on error the state is restored and
    /// no event is published.
    fn transact<T>(
        &mut self,
        call: Call,
        action: impl FnOnce(&mut Tx<'_, L>) -> GameResult<T>,
    ) -> GameResult<T> {
        // Whole-state clone: O(players + miners) per action. Swap for an
        // undo log if a single game grows past in-memory session sizes.
        let snapshot = self.state.clone();

        let outcome = {
            let mut tx = Tx {
                state: &mut self.state,
                ledger: &mut self.ledger,
                call,
                events: Vec::new(),
            };
            action(&mut tx).map(|value| (value, tx.events))
        };

        match outcome {
            Ok((value, events)) => {
                self.publish(events);
                Ok(value)
            }
            Err(err) => {
                tracing::debug!("Action by {} rolled back: {}", call.sender, err);
                self.state = snapshot;
                Err(err)
            }
        }
    }

    fn publish(&mut self, events: Vec<GameEvent>) {
        if events.is_empty() {
            return;
        }
        // Dropped receivers are forgotten
        self.subscribers
            .retain(|tx| events.iter().all(|event| tx.send(*event).is_ok()));
        self.log.extend(events);
    }

    /// Opens an unbounded event stream. Every committed event is delivered
    /// to every live receiver in commit order.
    pub fn subscribe(&mut self) -> Receiver<GameEvent> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Drains the committed event log.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.log)
    }

    /// Committed events not yet drained.
    #[must_use]
    pub fn events(&self) -> &[GameEvent] {
        &self.log
    }

    /// Read access to the whole state.
    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// The settlement ledger.
    #[must_use]
    pub const fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Mutable access to the settlement ledger, for funding in simulations.
    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    // ---------------------------------------------------------------------
    // Views
    // ---------------------------------------------------------------------

    /// The player's facility, if they bought one.
    #[must_use]
    pub fn owner_to_facility(&self, player: Address) -> Option<&PlayerFacility> {
        self.state.facilities.get(player)
    }

    /// Rewards a claim at `now` would mint.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::ArithmeticOverflow`] if the amount does not fit.
    pub fn pending_rewards(&self, player: Address, now: u64) -> GameResult<U256> {
        self.state.accrual.pending(player, now)
    }

    /// Everything the player has claimed so far.
    #[must_use]
    pub fn total_claimed(&self, player: Address) -> U256 {
        self.state.accrual.total_claimed(player)
    }

    /// The player's miners, ids ascending. An offset past the end yields
    /// an empty page.
    #[must_use]
    pub fn get_player_heroes_paginated(
        &self,
        player: Address,
        offset: usize,
        limit: usize,
    ) -> Vec<MinerInstance> {
        self.state
            .miners
            .page(player, offset, limit)
            .into_iter()
            .filter_map(|id| self.state.miners.get(id).copied())
            .collect()
    }

    /// Aggregate power of the player's placed miners.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::ArithmeticOverflow`] if the sum does not fit.
    pub fn player_power(&self, player: Address) -> GameResult<u64> {
        self.state.miners.power_of(player, &self.state.catalog)
    }

    /// Who referred the player, if anyone did.
    #[must_use]
    pub fn referrer_of(&self, player: Address) -> Option<Address> {
        self.state.facilities.referrer_of(player)
    }

    /// A miner by id.
    #[must_use]
    pub fn miner(&self, id: MinerId) -> Option<&MinerInstance> {
        self.state.miners.get(id)
    }

    /// A hero type by index.
    #[must_use]
    pub fn hero(&self, index: HeroIndex) -> Option<&HeroType> {
        self.state.catalog.hero(index)
    }

    /// A facility type by index.
    #[must_use]
    pub fn facility(&self, index: FacilityIndex) -> Option<&FacilityType> {
        self.state.catalog.facility(index)
    }

    /// Buyback price of a hero type, if its listing is enabled.
    #[must_use]
    pub fn secondary_market_price(&self, hero_index: HeroIndex) -> Option<U256> {
        self.state.market.price(hero_index)
    }

    /// Number of hero types.
    #[must_use]
    pub fn unique_hero_count(&self) -> u32 {
        self.state.catalog.unique_hero_count()
    }

    /// Number of facility types.
    #[must_use]
    pub fn unique_facility_count(&self) -> u32 {
        self.state.catalog.unique_facility_count()
    }

    /// True once any miner has been issued.
    #[must_use]
    pub const fn mining_has_started(&self) -> bool {
        self.state.accrual.mining_has_started()
    }

    /// Timestamp of the first miner issued, if any.
    #[must_use]
    pub const fn start_block(&self) -> Option<u64> {
        self.state.accrual.start_time()
    }

    /// The current admin.
    #[must_use]
    pub const fn admin(&self) -> Address {
        self.state.settings.admin
    }

    /// Current addresses and switches.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.state.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::STARTER_HERO_INDEX;
    use bombmine_chain::MemoryLedger;

    fn admin() -> Address {
        Address::repeat_byte(0xAD)
    }

    fn game(config: &GameConfig) -> BombGame<MemoryLedger> {
        BombGame::new(config, MemoryLedger::new()).unwrap()
    }

    #[test]
    fn test_new_seeds_catalog() {
        let mut config = GameConfig::new(admin(), Address::repeat_byte(0x99));
        config.heroes.push(crate::config::HeroSpec {
            power_per_second: 120,
            tier: 2,
            cost: U256::from(100),
            in_production: true,
        });
        let game = game(&config);

        assert_eq!(game.unique_facility_count(), 1);
        assert_eq!(game.unique_hero_count(), 2);
        assert_eq!(game.hero(STARTER_HERO_INDEX).unwrap().cost_tokens, U256::ZERO);
        assert_eq!(game.hero(2).unwrap().power_per_second, 120);
        assert!(!game.mining_has_started());
        assert_eq!(game.start_block(), None);
    }

    #[test]
    fn test_new_rejects_listing_for_unknown_hero() {
        let mut config = GameConfig::new(admin(), Address::repeat_byte(0x99));
        config.secondary_market.push(crate::config::ListingSpec {
            hero_index: 7,
            price: U256::from(1),
        });
        assert!(matches!(
            BombGame::new(&config, MemoryLedger::new()),
            Err(GameError::HeroNotFound(7))
        ));
    }

    #[test]
    fn test_failed_transaction_restores_state() {
        let config = GameConfig::new(admin(), Address::repeat_byte(0x99));
        let mut game = game(&config);
        let call = Call::new(admin(), 1);

        let result: GameResult<()> = game.transact(call, |tx| {
            tx.state.settings.referral_fee_bps = 9;
            tx.emit(GameEvent::InitialFacilityPurchased { player: admin() });
            Err(GameError::ArithmeticOverflow)
        });

        assert_eq!(result, Err(GameError::ArithmeticOverflow));
        assert_eq!(game.settings().referral_fee_bps, config.referral_fee_bps);
        assert!(game.events().is_empty());
    }

    #[test]
    fn test_subscribers_receive_committed_events() {
        let config = GameConfig::new(admin(), Address::repeat_byte(0x99));
        let mut game = game(&config);
        let rx = game.subscribe();
        let dropped = game.subscribe();
        drop(dropped);

        game.transact(Call::new(admin(), 1), |tx| {
            tx.emit(GameEvent::InitialFacilityPurchased { player: admin() });
            Ok(())
        })
        .unwrap();

        assert_eq!(
            rx.try_recv().unwrap(),
            GameEvent::InitialFacilityPurchased { player: admin() }
        );
        assert_eq!(game.subscribers.len(), 1);
        assert_eq!(game.take_events().len(), 1);
        assert!(game.events().is_empty());
    }
}
