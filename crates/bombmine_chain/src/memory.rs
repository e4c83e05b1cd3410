//! # In-Memory Ledger
//!
//! A complete ERC-20 + native-value ledger held in hash maps. Used by the
//! economy's tests and by local simulations in place of a real chain.

use std::collections::HashMap;
use std::sync::Arc;

use alloy_primitives::{Address, U256};
use parking_lot::Mutex;

use crate::error::{LedgerError, LedgerResult};
use crate::ledger::Ledger;

/// A ledger handle that a test can keep while the game owns a clone.
pub type SharedLedger = Arc<Mutex<MemoryLedger>>;

/// In-memory token balances, allowances and native value.
#[derive(Clone, Debug, Default)]
pub struct MemoryLedger {
    /// Balances keyed by (token, owner).
    balances: HashMap<(Address, Address), U256>,
    /// Allowances keyed by (token, owner, spender).
    allowances: HashMap<(Address, Address, Address), U256>,
    /// Total minted per token.
    supply: HashMap<Address, U256>,
    /// Native value per account.
    native: HashMap<Address, U256>,
}

impl MemoryLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps the ledger in a shared handle.
    #[must_use]
    pub fn shared(self) -> SharedLedger {
        Arc::new(Mutex::new(self))
    }

    /// Sets `spender`'s allowance over `owner`'s `token` balance.
    /// `U256::MAX` is an infinite allowance and is never decremented.
    pub fn approve(&mut self, token: Address, owner: Address, spender: Address, amount: U256) {
        self.allowances.insert((token, owner, spender), amount);
    }

    /// Returns the remaining allowance.
    #[must_use]
    pub fn allowance(&self, token: Address, owner: Address, spender: Address) -> U256 {
        self.allowances
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or_default()
    }

    /// Returns the total minted supply of `token`.
    #[must_use]
    pub fn total_supply(&self, token: Address) -> U256 {
        self.supply.get(&token).copied().unwrap_or_default()
    }

    /// Credits native value out of thin air (a faucet).
    ///
    /// # Errors
    ///
    /// Fails on balance overflow.
    pub fn fund_native(&mut self, who: Address, amount: U256) -> LedgerResult<()> {
        let balance = self.native.entry(who).or_default();
        *balance = balance.checked_add(amount).ok_or(LedgerError::Overflow)?;
        Ok(())
    }

    /// Returns `who`'s native balance.
    #[must_use]
    pub fn native_balance(&self, who: Address) -> U256 {
        self.native.get(&who).copied().unwrap_or_default()
    }

    fn token_balance(&self, token: Address, who: Address) -> U256 {
        self.balances.get(&(token, who)).copied().unwrap_or_default()
    }

    /// Moves tokens between balances. Caller has checked `from` can pay.
    fn move_tokens(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> LedgerResult<()> {
        if from == to {
            return Ok(());
        }
        let credited = self
            .token_balance(token, to)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        let remaining = self.token_balance(token, from) - amount;
        self.balances.insert((token, from), remaining);
        self.balances.insert((token, to), credited);
        Ok(())
    }
}

impl Ledger for MemoryLedger {
    fn mint(&mut self, token: Address, to: Address, amount: U256) -> LedgerResult<()> {
        if to == Address::ZERO {
            return Err(LedgerError::ZeroAddress("mint recipient"));
        }
        let supply = self
            .total_supply(token)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        let balance = self
            .token_balance(token, to)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        self.supply.insert(token, supply);
        self.balances.insert((token, to), balance);
        Ok(())
    }

    fn transfer_from(
        &mut self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> LedgerResult<bool> {
        if to == Address::ZERO {
            return Err(LedgerError::ZeroAddress("transfer recipient"));
        }
        let allowance = self.allowance(token, from, spender);
        if allowance < amount || self.token_balance(token, from) < amount {
            return Ok(false);
        }
        self.move_tokens(token, from, to, amount)?;
        if allowance != U256::MAX {
            self.approve(token, from, spender, allowance - amount);
        }
        Ok(true)
    }

    fn transfer(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> LedgerResult<bool> {
        if to == Address::ZERO {
            return Err(LedgerError::ZeroAddress("transfer recipient"));
        }
        if self.token_balance(token, from) < amount {
            return Ok(false);
        }
        self.move_tokens(token, from, to, amount)?;
        Ok(true)
    }

    fn balance_of(&self, token: Address, who: Address) -> U256 {
        self.token_balance(token, who)
    }

    fn send_value(&mut self, from: Address, to: Address, amount: U256) -> LedgerResult<()> {
        if to == Address::ZERO {
            return Err(LedgerError::ZeroAddress("value recipient"));
        }
        let available = self.native_balance(from);
        if available < amount {
            return Err(LedgerError::InsufficientNative {
                owner: from,
                available,
                required: amount,
            });
        }
        if from != to {
            let credited = self
                .native_balance(to)
                .checked_add(amount)
                .ok_or(LedgerError::Overflow)?;
            self.native.insert(from, available - amount);
            self.native.insert(to, credited);
        }
        Ok(())
    }
}

impl<L: Ledger> Ledger for Arc<Mutex<L>> {
    fn mint(&mut self, token: Address, to: Address, amount: U256) -> LedgerResult<()> {
        self.lock().mint(token, to, amount)
    }

    fn transfer_from(
        &mut self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> LedgerResult<bool> {
        self.lock().transfer_from(token, spender, from, to, amount)
    }

    fn transfer(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> LedgerResult<bool> {
        self.lock().transfer(token, from, to, amount)
    }

    fn balance_of(&self, token: Address, who: Address) -> U256 {
        self.lock().balance_of(token, who)
    }

    fn send_value(&mut self, from: Address, to: Address, amount: U256) -> LedgerResult<()> {
        self.lock().send_value(from, to, amount)
    }
}
