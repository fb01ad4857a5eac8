// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Poker hand evaluator.
//!
//! Each 5 cards combination is classified into a [HandRank] and given a numeric
//! value where every category occupies its own band:
//!
//! ```text
//!   Straight Flush   900 + high card
//!   Four of a Kind   800 + quads rank
//!   Full House       700 + trips rank + pair rank / 100
//!   Flush            600 + high card
//!   Straight         500 + high card (5 for A-2-3-4-5)
//!   Three of a Kind  400 + trips rank
//!   Two Pair         300 + high pair + low pair / 100
//!   Pair             200 + pair rank
//!   High Card          0 + high card
//! ```
//!
//! ranks not encoded in the value are kept as kickers, and the best hand is
//! the one with the highest value and then the highest kickers.
mod hand;
pub use hand::{HandRank, RankedHand};
