//! Player actions.

use bombmine_chain::{Address, Ledger, U256};

use super::{BombGame, Call, Tx};
use crate::catalog::{FacilityIndex, HeroIndex, STARTER_FACILITY_INDEX, STARTER_HERO_INDEX};
use crate::error::{GameError, GameResult};
use crate::events::GameEvent;
use crate::facility::PlayerFacility;
use crate::market::split_referral;
use crate::miners::{Cell, MinerId};

impl<L: Ledger> Tx<'_, L> {
    /// Issues a miner to the sender on `(x, y)` and checkpoints them.
    fn issue_miner(
        &mut self,
        hero_index: HeroIndex,
        cost: U256,
        x: u32,
        y: u32,
    ) -> GameResult<MinerId> {
        let player = self.sender();
        let cell = Cell::new(x, y);
        let facility = self
            .state
            .facilities
            .get(player)
            .copied()
            .ok_or(GameError::InvalidMinerCoordinates { x, y })?;

        self.state.miners.check_cell(player, &facility, cell, None)?;
        self.state.miners.ensure_capacity(player, &facility)?;

        // === EFFECTS ===
        let now = self.now();
        let id = self.state.miners.issue(player, hero_index, cell, now)?;
        if self.state.accrual.note_first_miner(now) {
            tracing::info!("Mining started at {}", now);
        }
        self.checkpoint(player)?;

        self.emit(GameEvent::MinerBought {
            player,
            hero_index,
            cost,
            id,
            x,
            y,
        });
        Ok(id)
    }
}

impl<L: Ledger> BombGame<L> {
    /// Buys the starter facility. `call.value` must equal its price.
    ///
    /// The referrer receives `referral_fee_bps` of the payment unless it is
    /// the zero address or the caller; the rest goes to the treasury.
    ///
    /// # Errors
    ///
    /// - [`GameError::IncorrectValue`] on a payment mismatch
    /// - [`GameError::AlreadyPurchasedInitialFactory`] on a second purchase
    /// - [`GameError::TreasuryNotConfigured`] without a treasury
    pub fn purchase_initial_facility(&mut self, call: Call, referrer: Address) -> GameResult<()> {
        self.transact(call, |tx| {
            tx.require_production()?;
            let player = tx.sender();

            let starter = *tx.state.catalog.require_facility(STARTER_FACILITY_INDEX)?;
            if !starter.active {
                return Err(GameError::FacilityNotActive(starter.index));
            }
            if tx.call.value != starter.price_wei {
                return Err(GameError::IncorrectValue {
                    expected: starter.price_wei,
                    actual: tx.call.value,
                });
            }
            if tx.state.facilities.owns(player) {
                return Err(GameError::AlreadyPurchasedInitialFactory);
            }
            let treasury = tx.state.settings.treasury()?;
            let game_address = tx.state.settings.game_address;

            // === EFFECTS ===
            let now = tx.now();
            tx.state
                .facilities
                .open(player, PlayerFacility::from_type(&starter, now));
            let referrer = (referrer != Address::ZERO && referrer != player).then_some(referrer);
            if let Some(referrer) = referrer {
                tx.state.facilities.set_referrer(player, referrer);
            }
            tx.emit(GameEvent::InitialFacilityPurchased { player });

            // === INTERACTIONS ===
            let value = tx.call.value;
            if value.is_zero() {
                return Ok(());
            }
            tx.ledger.send_value(player, game_address, value)?;

            let (referral, remainder) = match referrer {
                Some(_) => split_referral(value, tx.state.settings.referral_fee_bps),
                None => (U256::ZERO, value),
            };
            if let Some(referrer) = referrer.filter(|_| !referral.is_zero()) {
                tx.ledger.send_value(game_address, referrer, referral)?;
            }
            if !remainder.is_zero() {
                tx.ledger.send_value(game_address, treasury, remainder)?;
            }

            tracing::info!(
                "Initial facility purchased by {}: referral={}, treasury={}",
                player,
                referral,
                remainder
            );
            Ok(())
        })
    }

    /// Issues the free starter miner on `(x, y)`. Once per player.
    ///
    /// # Errors
    ///
    /// - [`GameError::StarterMinerAlreadyAcquired`] on a second claim
    /// - [`GameError::InvalidMinerCoordinates`] if the cell is off-grid,
    ///   occupied, or the caller has no facility
    /// - [`GameError::FacilityFull`] if every slot is taken
    pub fn get_free_starter_hero(&mut self, call: Call, x: u32, y: u32) -> GameResult<MinerId> {
        self.transact(call, |tx| {
            tx.require_production()?;
            let player = tx.sender();
            if tx.state.miners.has_claimed_starter(player) {
                return Err(GameError::StarterMinerAlreadyAcquired);
            }
            tx.state.catalog.require_hero(STARTER_HERO_INDEX)?;

            let id = tx.issue_miner(STARTER_HERO_INDEX, U256::ZERO, x, y)?;
            tx.state.miners.mark_starter(player);

            tracing::info!("Starter miner {} issued to {}", id, player);
            Ok(id)
        })
    }

    /// Buys a miner of `hero_index` onto `(x, y)`, pulling its token cost
    /// from the caller into the game pool.
    ///
    /// # Errors
    ///
    /// - [`GameError::HeroNotInProduction`] for unknown or retired types
    /// - [`GameError::TooPoor`] if the balance is short or the pull is
    ///   refused; a short balance is reported before any placement error
    /// - [`GameError::InvalidMinerCoordinates`] under the starter rules
    pub fn buy_hero(
        &mut self,
        call: Call,
        hero_index: HeroIndex,
        x: u32,
        y: u32,
    ) -> GameResult<MinerId> {
        self.transact(call, |tx| {
            tx.require_production()?;
            let player = tx.sender();

            let hero = tx
                .state
                .catalog
                .hero(hero_index)
                .copied()
                .filter(|hero| hero.in_production)
                .ok_or(GameError::HeroNotInProduction(hero_index))?;
            let cost = hero.cost_tokens;

            // Funds are checked before placement
            let token = if cost.is_zero() {
                None
            } else {
                Some(tx.state.settings.bombcoin()?)
            };
            if let Some(token) = token {
                if tx.ledger.balance_of(token, player) < cost {
                    return Err(GameError::TooPoor { cost });
                }
            }

            let id = tx.issue_miner(hero_index, cost, x, y)?;

            // === INTERACTIONS ===
            if let Some(token) = token {
                let pool = tx.state.settings.game_address;
                if !tx.ledger.transfer_from(token, pool, player, pool, cost)? {
                    return Err(GameError::TooPoor { cost });
                }
            }

            tracing::info!("Miner {} (hero {}) bought by {} for {}", id, hero_index, player, cost);
            Ok(id)
        })
    }

    /// Sells an owned miner back to the pool at its listing price and
    /// frees its cell. Returns the price paid.
    ///
    /// # Errors
    ///
    /// - [`GameError::PlayerDoesNotOwnMiner`] for missing or foreign ids
    /// - [`GameError::NoSecondaryMarket`] without an enabled listing
    /// - [`GameError::LedgerTransferFailed`] if the pool cannot pay
    pub fn sell_hero(&mut self, call: Call, id: MinerId) -> GameResult<U256> {
        self.transact(call, |tx| {
            tx.require_production()?;
            let player = tx.sender();

            let miner = *tx.state.miners.owned(player, id)?;
            let price = tx
                .state
                .market
                .price(miner.hero_index)
                .ok_or(GameError::NoSecondaryMarket(miner.hero_index))?;

            // === EFFECTS ===
            tx.state.miners.remove(player, id)?;
            tx.checkpoint(player)?;
            tx.emit(GameEvent::MinerSold {
                player,
                id,
                hero_index: miner.hero_index,
                price,
            });

            // === INTERACTIONS ===
            if !price.is_zero() {
                let token = tx.state.settings.bombcoin()?;
                let pool = tx.state.settings.game_address;
                if !tx.ledger.transfer(token, pool, player, price)? {
                    tracing::warn!("Pool could not pay {} for miner {}", price, id);
                    return Err(GameError::LedgerTransferFailed { amount: price });
                }
            }

            tracing::info!("Miner {} sold by {} for {}", id, player, price);
            Ok(price)
        })
    }

    /// Puts an owned miner on a free cell, placed or not before.
    ///
    /// # Errors
    ///
    /// - [`GameError::PlayerDoesNotOwnMiner`] for missing or foreign ids
    /// - [`GameError::InvalidMinerCoordinates`] if the cell is off-grid or taken
    /// - [`GameError::FacilityFull`] when placing an unplaced miner into a
    ///   full facility
    pub fn relocate_miner(&mut self, call: Call, id: MinerId, x: u32, y: u32) -> GameResult<()> {
        self.transact(call, |tx| {
            tx.require_production()?;
            let player = tx.sender();

            let miner = *tx.state.miners.owned(player, id)?;
            let facility = tx.facility_of(player)?;
            let cell = Cell::new(x, y);
            tx.state
                .miners
                .check_cell(player, &facility, cell, Some(id))?;
            if !miner.is_placed() {
                tx.state.miners.ensure_capacity(player, &facility)?;
            }

            // === EFFECTS ===
            tx.state.miners.place(player, id, cell)?;
            tx.checkpoint(player)?;
            tx.emit(GameEvent::MinerPlaced { player, id, x, y });
            Ok(())
        })
    }

    /// Upgrades to the next facility type. The call carries no value.
    /// Miners that no longer fit are taken off the grid and stay owned.
    /// Returns the new facility index.
    ///
    /// # Errors
    ///
    /// - [`GameError::NoFacility`] before the initial purchase
    /// - [`GameError::CantBuyNewFacilityYet`] during the cooldown of the
    ///   current type
    /// - [`GameError::NoFacilityUpgradeAvailable`] past the last type
    /// - [`GameError::FacilityNotActive`] if the next type is not for sale
    /// - [`GameError::IncorrectValue`] if value is attached
    pub fn buy_new_facility(&mut self, call: Call) -> GameResult<FacilityIndex> {
        self.transact(call, |tx| {
            tx.require_production()?;
            let player = tx.sender();
            let now = tx.now();

            let mut facility = tx.facility_of(player)?;
            let current = *tx.state.catalog.require_facility(facility.facility_index)?;
            let ready_at = facility.ready_at(current.upgrade_cooldown_secs);
            if now < ready_at {
                return Err(GameError::CantBuyNewFacilityYet { ready_at });
            }

            let next = current
                .index
                .checked_add(1)
                .and_then(|index| tx.state.catalog.facility(index))
                .copied()
                .ok_or(GameError::NoFacilityUpgradeAvailable(current.index))?;
            if !next.active {
                return Err(GameError::FacilityNotActive(next.index));
            }
            if !tx.call.value.is_zero() {
                return Err(GameError::IncorrectValue {
                    expected: U256::ZERO,
                    actual: tx.call.value,
                });
            }

            // === EFFECTS ===
            facility.upgrade(&next, now);
            if let Some(owned) = tx.state.facilities.get_mut(player) {
                *owned = facility;
            }
            let unplaced = tx.state.miners.fit_to(player, &facility);
            tx.checkpoint(player)?;

            if !unplaced.is_empty() {
                tracing::debug!("Unplaced {} miners of {}", unplaced.len(), player);
            }
            for id in unplaced {
                tx.emit(GameEvent::MinerUnplaced { player, id });
            }
            tx.emit(GameEvent::FacilityBought {
                player,
                new_facility_index: next.index,
            });

            tracing::info!("Facility {} bought by {}", next.index, player);
            Ok(next.index)
        })
    }

    /// Mints everything accrued so far to the caller. Works while
    /// production is switched off.
    ///
    /// # Errors
    ///
    /// - [`GameError::NoRewardsPending`] when nothing has accrued
    /// - [`GameError::LedgerNotConfigured`] without a token address
    pub fn claim_rewards(&mut self, call: Call) -> GameResult<U256> {
        self.transact(call, |tx| {
            let player = tx.sender();

            // === EFFECTS ===
            tx.checkpoint(player)?;
            let amount = tx.state.accrual.drain(player)?;
            tx.emit(GameEvent::RewardsClaimed { player, amount });

            // === INTERACTIONS ===
            let token = tx.state.settings.bombcoin()?;
            tx.ledger.mint(token, player, amount)?;

            tracing::info!("Rewards claimed by {}: {}", player, amount);
            Ok(amount)
        })
    }
}
