//! Admin actions. Every one checks the caller before anything else.

use bombmine_chain::{Address, Ledger, LedgerError, U256};

use super::{BombGame, Call};
use crate::catalog::{FacilityIndex, HeroIndex};
use crate::config::{FacilitySpec, HeroSpec, MAX_REFERRAL_FEE_BPS};
use crate::error::{GameError, GameResult};

fn non_zero(address: Address, what: &'static str) -> GameResult<Address> {
    if address == Address::ZERO {
        return Err(LedgerError::ZeroAddress(what).into());
    }
    Ok(address)
}

impl<L: Ledger> BombGame<L> {
    /// Points the game at a new Bombcoin contract.
    ///
    /// # Errors
    ///
    /// [`GameError::Unauthorized`] for non-admins; rejects the zero address.
    pub fn set_ledger_address(&mut self, call: Call, bombcoin: Address) -> GameResult<()> {
        self.transact(call, |tx| {
            tx.require_admin()?;
            tx.state.settings.bombcoin = non_zero(bombcoin, "bombcoin")?;
            tracing::info!("Bombcoin address set to {}", bombcoin);
            Ok(())
        })
    }

    /// Sets the receiver of facility payments.
    ///
    /// # Errors
    ///
    /// [`GameError::Unauthorized`] for non-admins; rejects the zero address.
    pub fn set_treasury_address(&mut self, call: Call, treasury: Address) -> GameResult<()> {
        self.transact(call, |tx| {
            tx.require_admin()?;
            tx.state.settings.treasury = non_zero(treasury, "treasury")?;
            tracing::info!("Treasury address set to {}", treasury);
            Ok(())
        })
    }

    /// Hands the admin role to `new_admin`.
    ///
    /// # Errors
    ///
    /// [`GameError::Unauthorized`] for non-admins; rejects the zero address.
    pub fn transfer_admin(&mut self, call: Call, new_admin: Address) -> GameResult<()> {
        self.transact(call, |tx| {
            tx.require_admin()?;
            tx.state.settings.admin = non_zero(new_admin, "admin")?;
            tracing::info!("Admin transferred from {} to {}", tx.sender(), new_admin);
            Ok(())
        })
    }

    /// Appends a facility type.
    ///
    /// # Errors
    ///
    /// [`GameError::Unauthorized`] for non-admins,
    /// [`GameError::InvalidCatalogEntry`] for zero grids or capacity.
    pub fn add_facility(&mut self, call: Call, spec: &FacilitySpec) -> GameResult<FacilityIndex> {
        self.transact(call, |tx| {
            tx.require_admin()?;
            let index = tx.state.catalog.add_facility(spec)?;
            tracing::info!(
                "Facility {} added: {}x{}, {} miners",
                index,
                spec.grid_width,
                spec.grid_height,
                spec.max_miners
            );
            Ok(index)
        })
    }

    /// Appends a hero type.
    ///
    /// # Errors
    ///
    /// [`GameError::Unauthorized`] for non-admins,
    /// [`GameError::InvalidCatalogEntry`] for zero power.
    pub fn add_hero(&mut self, call: Call, spec: &HeroSpec) -> GameResult<HeroIndex> {
        self.transact(call, |tx| {
            tx.require_admin()?;
            let index = tx.state.catalog.add_hero(spec)?;
            tracing::info!(
                "Hero {} added: power={}, cost={}",
                index,
                spec.power_per_second,
                spec.cost
            );
            Ok(index)
        })
    }

    /// Toggles whether a facility type is for sale.
    ///
    /// # Errors
    ///
    /// [`GameError::Unauthorized`] or [`GameError::FacilityNotFound`].
    pub fn set_facility_active(
        &mut self,
        call: Call,
        index: FacilityIndex,
        active: bool,
    ) -> GameResult<()> {
        self.transact(call, |tx| {
            tx.require_admin()?;
            tx.state.catalog.set_facility_active(index, active)
        })
    }

    /// Toggles whether a hero type can be bought.
    ///
    /// # Errors
    ///
    /// [`GameError::Unauthorized`] or [`GameError::HeroNotFound`].
    pub fn set_hero_in_production(
        &mut self,
        call: Call,
        index: HeroIndex,
        in_production: bool,
    ) -> GameResult<()> {
        self.transact(call, |tx| {
            tx.require_admin()?;
            tx.state.catalog.set_hero_in_production(index, in_production)
        })
    }

    /// Creates or reprices the buyback listing of a hero type. The listing
    /// ends up enabled.
    ///
    /// # Errors
    ///
    /// [`GameError::Unauthorized`] or [`GameError::HeroNotFound`].
    pub fn add_secondary_market_for_hero(
        &mut self,
        call: Call,
        hero_index: HeroIndex,
        price: U256,
    ) -> GameResult<()> {
        self.transact(call, |tx| {
            tx.require_admin()?;
            tx.state.catalog.require_hero(hero_index)?;
            tx.state.market.upsert(hero_index, price);
            tracing::info!("Secondary market for hero {} at {}", hero_index, price);
            Ok(())
        })
    }

    /// Opens or closes the buyback listing of a hero type.
    ///
    /// # Errors
    ///
    /// [`GameError::Unauthorized`] or [`GameError::NoSecondaryMarket`].
    pub fn set_secondary_market_enabled(
        &mut self,
        call: Call,
        hero_index: HeroIndex,
        enabled: bool,
    ) -> GameResult<()> {
        self.transact(call, |tx| {
            tx.require_admin()?;
            tx.state.market.set_enabled(hero_index, enabled)
        })
    }

    /// Sets the referral share of starter purchases.
    ///
    /// # Errors
    ///
    /// [`GameError::Unauthorized`], or [`GameError::InvalidReferralFee`]
    /// above 500 bps.
    pub fn set_referral_fee_bps(&mut self, call: Call, bps: u16) -> GameResult<()> {
        self.transact(call, |tx| {
            tx.require_admin()?;
            if bps > MAX_REFERRAL_FEE_BPS {
                return Err(GameError::InvalidReferralFee(bps));
            }
            tx.state.settings.referral_fee_bps = bps;
            tracing::info!("Referral fee set to {} bps", bps);
            Ok(())
        })
    }

    /// Switches player actions on or off. Claims keep working.
    ///
    /// # Errors
    ///
    /// [`GameError::Unauthorized`].
    pub fn set_production_enabled(&mut self, call: Call, enabled: bool) -> GameResult<()> {
        self.transact(call, |tx| {
            tx.require_admin()?;
            tx.state.settings.production_enabled = enabled;
            tracing::info!("Production enabled: {}", enabled);
            Ok(())
        })
    }
}
