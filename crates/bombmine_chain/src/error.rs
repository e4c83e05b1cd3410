//! # Ledger Error Types

use alloy_primitives::{Address, U256};
use thiserror::Error;

/// Errors raised by a [`crate::Ledger`] implementation.
///
/// A pull or push that merely lacks funds is not an error: the ERC-20
/// calls report it through their `bool` return, as the contract would.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Native value could not be moved because the sender is short.
    #[error("insufficient native balance: {owner} has {available}, needs {required}")]
    InsufficientNative {
        /// Account that tried to pay.
        owner: Address,
        /// Balance held.
        available: U256,
        /// Amount requested.
        required: U256,
    },

    /// The zero address was used as sender or recipient.
    #[error("zero address is not a valid {0}")]
    ZeroAddress(&'static str),

    /// A balance or supply would exceed `U256::MAX`.
    #[error("arithmetic overflow in ledger accounting")]
    Overflow,

    /// An amount string could not be parsed.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
