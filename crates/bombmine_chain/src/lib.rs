//! # BOMBMINE Chain Boundary
//!
//! Everything the economy needs to know about the chain it settles on.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐   mint / transferFrom   ┌─────────────────┐
//! │  BombGame       │ ──────────────────────▶ │  Ledger         │
//! │  (economy)      │   transfer / sendValue  │  (Bombcoin +    │
//! └────────┬────────┘                         │   native value) │
//!          │ GameEvent                        └─────────────────┘
//!          ▼
//! ┌─────────────────┐
//! │  EventLog       │  topic0 = signature hash, topic1 = player
//! └─────────────────┘
//! ```
//!
//! The token contract itself is an external collaborator. [`Ledger`] is the
//! capability the economy depends on; [`MemoryLedger`] is a faithful fake of
//! an ERC-20 with allowances plus a native-value balance sheet.

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod contracts;
pub mod error;
pub mod events;
pub mod ledger;
pub mod memory;
pub mod units;

pub use alloy_primitives::{Address, B256, U256};
pub use error::{LedgerError, LedgerResult};
pub use events::EventLog;
pub use ledger::Ledger;
pub use memory::{MemoryLedger, SharedLedger};
pub use units::{bps_of, format_ether, parse_ether, BPS_DENOMINATOR};
