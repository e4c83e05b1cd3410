//! # Game Events
//!
//! Typed records of every successful economic action. Events are only
//! published when the action that raised them commits.

use bombmine_chain::contracts::IMainGame;
use bombmine_chain::{Address, EventLog, U256};

use crate::catalog::{FacilityIndex, HeroIndex};
use crate::miners::MinerId;

/// An observable economic action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    /// A player bought their starter facility.
    InitialFacilityPurchased {
        /// Buyer.
        player: Address,
    },
    /// A miner was issued (free starter or bought).
    MinerBought {
        /// New owner.
        player: Address,
        /// Hero type.
        hero_index: HeroIndex,
        /// Tokens paid.
        cost: U256,
        /// New miner id.
        id: MinerId,
        /// Column.
        x: u32,
        /// Row.
        y: u32,
    },
    /// A miner was sold back to the pool.
    MinerSold {
        /// Seller.
        player: Address,
        /// Sold miner id.
        id: MinerId,
        /// Hero type.
        hero_index: HeroIndex,
        /// Tokens paid out.
        price: U256,
    },
    /// A player upgraded their facility.
    FacilityBought {
        /// Buyer.
        player: Address,
        /// New facility type.
        new_facility_index: FacilityIndex,
    },
    /// Rewards were minted to a player.
    RewardsClaimed {
        /// Claimer.
        player: Address,
        /// Tokens minted.
        amount: U256,
    },
    /// An owned miner was put on a cell.
    MinerPlaced {
        /// Owner.
        player: Address,
        /// Miner id.
        id: MinerId,
        /// Column.
        x: u32,
        /// Row.
        y: u32,
    },
    /// A miner was taken off the grid by a facility change.
    MinerUnplaced {
        /// Owner.
        player: Address,
        /// Miner id.
        id: MinerId,
    },
}

impl GameEvent {
    /// The player the event concerns.
    #[must_use]
    pub const fn player(&self) -> Address {
        match *self {
            Self::InitialFacilityPurchased { player }
            | Self::MinerBought { player, .. }
            | Self::MinerSold { player, .. }
            | Self::FacilityBought { player, .. }
            | Self::RewardsClaimed { player, .. }
            | Self::MinerPlaced { player, .. }
            | Self::MinerUnplaced { player, .. } => player,
        }
    }

    /// Encodes the event as the EVM log the game contract would emit.
    #[must_use]
    pub fn to_log(&self) -> EventLog {
        match *self {
            Self::InitialFacilityPurchased { player } => {
                EventLog::encode(player, &IMainGame::InitialFacilityPurchased { player })
            }
            Self::MinerBought {
                player,
                hero_index,
                cost,
                id,
                x,
                y,
            } => EventLog::encode(
                player,
                &IMainGame::MinerBought {
                    player,
                    heroIndex: U256::from(hero_index),
                    cost,
                    id: U256::from(id),
                    x: U256::from(x),
                    y: U256::from(y),
                },
            ),
            Self::MinerSold {
                player,
                id,
                hero_index,
                price,
            } => EventLog::encode(
                player,
                &IMainGame::MinerSold {
                    player,
                    id: U256::from(id),
                    heroIndex: U256::from(hero_index),
                    price,
                },
            ),
            Self::FacilityBought {
                player,
                new_facility_index,
            } => EventLog::encode(
                player,
                &IMainGame::FacilityBought {
                    player,
                    newFacilityIndex: U256::from(new_facility_index),
                },
            ),
            Self::RewardsClaimed { player, amount } => {
                EventLog::encode(player, &IMainGame::RewardsClaimed { player, amount })
            }
            Self::MinerPlaced { player, id, x, y } => EventLog::encode(
                player,
                &IMainGame::MinerPlaced {
                    player,
                    id: U256::from(id),
                    x: U256::from(x),
                    y: U256::from(y),
                },
            ),
            Self::MinerUnplaced { player, id } => EventLog::encode(
                player,
                &IMainGame::MinerUnplaced {
                    player,
                    id: U256::from(id),
                },
            ),
        }
    }
}
