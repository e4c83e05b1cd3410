//! # Market
//!
//! Secondary-market buyback prices per hero type, and the referral split
//! of a starter facility payment.

use std::collections::BTreeMap;

use bombmine_chain::{bps_of, U256};

use crate::catalog::HeroIndex;
use crate::error::{GameError, GameResult};

/// A buyback listing for one hero type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Listing {
    /// Hero type bought back.
    pub hero_index: HeroIndex,
    /// Tokens paid per miner sold.
    pub price_tokens: U256,
    /// Whether sales are currently accepted.
    pub enabled: bool,
}

/// Listings keyed by hero type. A missing key means "not sellable".
#[derive(Clone, Debug, Default)]
pub struct SecondaryMarket {
    listings: BTreeMap<HeroIndex, Listing>,
}

impl SecondaryMarket {
    /// Creates an empty market.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates or reprices a listing. The listing ends up enabled.
    pub fn upsert(&mut self, hero_index: HeroIndex, price_tokens: U256) {
        self.listings.insert(
            hero_index,
            Listing {
                hero_index,
                price_tokens,
                enabled: true,
            },
        );
    }

    /// Toggles a listing without touching its price.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NoSecondaryMarket`] if there is no listing.
    pub fn set_enabled(&mut self, hero_index: HeroIndex, enabled: bool) -> GameResult<()> {
        let listing = self
            .listings
            .get_mut(&hero_index)
            .ok_or(GameError::NoSecondaryMarket(hero_index))?;
        listing.enabled = enabled;
        Ok(())
    }

    /// Returns the listing, enabled or not.
    #[must_use]
    pub fn listing(&self, hero_index: HeroIndex) -> Option<&Listing> {
        self.listings.get(&hero_index)
    }

    /// Buyback price, if sales for the type are open.
    #[must_use]
    pub fn price(&self, hero_index: HeroIndex) -> Option<U256> {
        self.listings
            .get(&hero_index)
            .filter(|listing| listing.enabled)
            .map(|listing| listing.price_tokens)
    }
}

/// Splits a payment into `(referrer_share, treasury_share)`.
///
/// The two shares always add up to `value`.
#[must_use]
pub fn split_referral(value: U256, fee_bps: u16) -> (U256, U256) {
    let referral = bps_of(value, fee_bps);
    (referral, value - referral)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::STARTER_FACILITY_PRICE;

    #[test]
    fn test_upsert_and_toggle() {
        let mut market = SecondaryMarket::new();
        assert_eq!(market.price(1), None);

        market.upsert(1, U256::from(50));
        assert_eq!(market.price(1), Some(U256::from(50)));

        market.set_enabled(1, false).unwrap();
        assert_eq!(market.price(1), None);
        assert_eq!(market.listing(1).unwrap().price_tokens, U256::from(50));

        // Repricing reopens the listing
        market.upsert(1, U256::from(70));
        assert_eq!(market.price(1), Some(U256::from(70)));
    }

    #[test]
    fn test_toggle_missing_listing() {
        let mut market = SecondaryMarket::new();
        assert_eq!(
            market.set_enabled(3, true),
            Err(GameError::NoSecondaryMarket(3))
        );
    }

    #[test]
    fn test_referral_split_of_starter_price() {
        let (referral, treasury) = split_referral(STARTER_FACILITY_PRICE, 250);

        // 2.5% of 0.005 ether
        assert_eq!(referral, U256::from(125_000_000_000_000u64));
        assert_eq!(referral + treasury, STARTER_FACILITY_PRICE);
    }

    #[test]
    fn test_referral_split_rounds_toward_treasury() {
        let (referral, treasury) = split_referral(U256::from(399), 250);
        assert_eq!(referral, U256::from(9));
        assert_eq!(treasury, U256::from(390));

        let (referral, treasury) = split_referral(U256::from(1000), 0);
        assert_eq!(referral, U256::ZERO);
        assert_eq!(treasury, U256::from(1000));
    }
}
