//! # Event Logs
//!
//! EVM log encoding for game events, and the zero-copy readers an
//! off-chain observer uses to pick them apart again.

use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::SolEvent;

/// An encoded EVM log: `topics[0]` is the event signature hash,
/// `topics[1]` the indexed player, `data` the ABI-encoded remainder.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventLog {
    /// Indexed topics.
    pub topics: Vec<B256>,
    /// Non-indexed ABI payload.
    pub data: Vec<u8>,
}

impl EventLog {
    /// Encodes a `sol!` event whose only indexed parameter is `player`.
    #[must_use]
    pub fn encode<E: SolEvent>(player: Address, event: &E) -> Self {
        Self {
            topics: vec![E::SIGNATURE_HASH, address_topic(player)],
            data: event.encode_data(),
        }
    }

    /// Returns true if this log carries event `E`.
    #[inline]
    #[must_use]
    pub fn is<E: SolEvent>(&self) -> bool {
        self.topics.first() == Some(&E::SIGNATURE_HASH)
    }

    /// Reads the indexed player address back out of `topics[1]`.
    #[must_use]
    pub fn player(&self) -> Option<Address> {
        self.topics
            .get(1)
            .map(|topic| Address::from_slice(&topic[12..32]))
    }

    /// Reads the `index`-th 32-byte word of the data section.
    #[must_use]
    pub fn word(&self, index: usize) -> Option<U256> {
        let start = index.checked_mul(32)?;
        let end = start.checked_add(32)?;
        let bytes = self.data.get(start..end)?;
        Some(U256::from_be_slice(bytes))
    }
}

/// Left-pads an address into a 32-byte topic.
#[inline]
#[must_use]
pub fn address_topic(address: Address) -> B256 {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(address.as_slice());
    B256::from(word)
}
