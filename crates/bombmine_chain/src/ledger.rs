//! # Ledger Adapter
//!
//! The capability the economy settles through. Token calls mirror the
//! ERC-20 surface (`mint`, `transferFrom`, `transfer`, `balanceOf`) and are
//! addressed by token contract, so the game can be re-pointed at a new
//! token with a single setter. Native payouts go through [`Ledger::send_value`].

use alloy_primitives::{Address, U256};

use crate::error::LedgerResult;

/// External token ledger plus native-value transfers.
///
/// `transfer_from` and `transfer` return `Ok(false)` when the move is
/// refused for lack of balance or allowance, the way an ERC-20 reports
/// it. `Err` is reserved for faults of the ledger itself.
pub trait Ledger {
    /// Mints `amount` of `token` to `to`.
    ///
    /// # Errors
    ///
    /// Fails on zero recipient or supply overflow.
    fn mint(&mut self, token: Address, to: Address, amount: U256) -> LedgerResult<()>;

    /// Moves `amount` from `from` to `to`, spending `spender`'s allowance.
    ///
    /// # Errors
    ///
    /// Fails on ledger faults; a shortfall is `Ok(false)`.
    fn transfer_from(
        &mut self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> LedgerResult<bool>;

    /// Moves `amount` from `from`'s own balance to `to`.
    ///
    /// # Errors
    ///
    /// Fails on ledger faults; a shortfall is `Ok(false)`.
    fn transfer(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> LedgerResult<bool>;

    /// Returns `who`'s balance of `token`.
    fn balance_of(&self, token: Address, who: Address) -> U256;

    /// Moves native value from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Fails if `from` cannot cover `amount` or `to` is the zero address.
    fn send_value(&mut self, from: Address, to: Address, amount: U256) -> LedgerResult<()>;
}

impl<L: Ledger + ?Sized> Ledger for &mut L {
    fn mint(&mut self, token: Address, to: Address, amount: U256) -> LedgerResult<()> {
        (**self).mint(token, to, amount)
    }

    fn transfer_from(
        &mut self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> LedgerResult<bool> {
        (**self).transfer_from(token, spender, from, to, amount)
    }

    fn transfer(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> LedgerResult<bool> {
        (**self).transfer(token, from, to, amount)
    }

    fn balance_of(&self, token: Address, who: Address) -> U256 {
        (**self).balance_of(token, who)
    }

    fn send_value(&mut self, from: Address, to: Address, amount: U256) -> LedgerResult<()> {
        (**self).send_value(from, to, amount)
    }
}
