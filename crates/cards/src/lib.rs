// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Tablestakes Poker cards types.
//!
//! This crate define types to create cards:
//!
//! ```
//! # use tablestakes_cards::{Card, Rank, Suit};
//! let ah = Card::new(Rank::Ace, Suit::Hearts);
//! assert_eq!(ah.to_string(), "AH");
//! assert_eq!(Card::parse("AH"), Some(ah));
//! ```
//!
//! and a [Deck] type for shuffling and dealing the cards of a hand:
//!
//! ```
//! # use tablestakes_cards::Deck;
//! let mut deck = Deck::new_and_shuffled(&mut rand::rng());
//! let (c1, c2) = (deck.deal().unwrap(), deck.deal().unwrap());
//! assert_ne!(c1, c2);
//! assert_eq!(deck.count(), Deck::SIZE - 2);
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
mod deck;
pub use deck::{Card, Deck, Rank, Suit};
