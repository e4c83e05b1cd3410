//! # Contract Definitions
//!
//! Solidity ABI of the game contract's events, generated with alloy's
//! `sol!` macro. Off-chain observers decode logs against these.

// The sol! macro generates code that we can't document, so allow missing_docs
#![allow(missing_docs)]

use alloy_sol_types::sol;

sol! {
    /// The BOMBMINE game contract - every observable economic action.
    #[derive(Debug, PartialEq, Eq)]
    interface IMainGame {
        /// A player bought their starter facility.
        event InitialFacilityPurchased(address indexed player);

        /// A miner was issued to a player (free starter or bought).
        event MinerBought(
            address indexed player,
            uint256 heroIndex,
            uint256 cost,
            uint256 id,
            uint256 x,
            uint256 y
        );

        /// A miner was sold back to the pool.
        event MinerSold(
            address indexed player,
            uint256 id,
            uint256 heroIndex,
            uint256 price
        );

        /// A player upgraded to a new facility type.
        event FacilityBought(address indexed player, uint256 newFacilityIndex);

        /// Accrued rewards were minted to a player.
        event RewardsClaimed(address indexed player, uint256 amount);

        /// An owned miner was put on a grid cell.
        event MinerPlaced(address indexed player, uint256 id, uint256 x, uint256 y);

        /// A miner was taken off the grid by a facility change.
        event MinerUnplaced(address indexed player, uint256 id);
    }
}
