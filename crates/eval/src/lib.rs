// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Tablestakes Poker hand evaluator.
//!
//! Poker hand evaluator for 5, 6 and 7 cards hands. The evaluator searches all
//! the 5 cards combinations of a hand and returns the best [RankedHand], ranked
//! hands are totally ordered so that hands can be compared directly:
//!
//! ```
//! # use tablestakes_eval::*;
//! // 2C, 3C, .., JC
//! let cards = Deck::default().into_iter().take(10).collect::<Vec<_>>();
//! let v1 = RankedHand::eval(&cards[0..5]);
//! let v2 = RankedHand::eval(&cards[5..]);
//! assert!(v2 > v1);
//! assert_eq!(v2.rank(), HandRank::StraightFlush);
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
pub mod eval;
pub use eval::{HandRank, RankedHand};

// Reexport cards types.
pub use tablestakes_cards::{Card, Deck, Rank, Suit};
