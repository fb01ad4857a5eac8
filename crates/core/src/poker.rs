// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Types used in a Poker game.
use serde::{Deserialize, Serialize};
use std::{fmt, iter, ops};

pub use tablestakes_eval::{Card, Deck, HandRank, Rank, RankedHand, Suit};

/// A player identifier, unique at a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(u32);

impl PlayerId {
    /// Creates a player id.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// The id value.
    pub const fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Chips amount.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Chips(u32);

impl Chips {
    /// The zero chips.
    pub const ZERO: Chips = Chips(0);

    /// Creates chips with the given value.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }
}

impl ops::Add for Chips {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Chips(self.0.saturating_add(rhs.0))
    }
}

impl ops::AddAssign for Chips {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl ops::Sub<Chips> for Chips {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl ops::SubAssign for Chips {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_sub(rhs.0);
    }
}

impl ops::Mul<u32> for Chips {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self::Output {
        Self(self.0.saturating_mul(rhs))
    }
}

impl ops::Div<u32> for Chips {
    type Output = Self;

    fn div(self, rhs: u32) -> Self::Output {
        Self(self.0 / rhs)
    }
}

impl ops::Rem<u32> for Chips {
    type Output = Self;

    fn rem(self, rhs: u32) -> Self::Output {
        Self(self.0 % rhs)
    }
}

impl iter::Sum for Chips {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Chips::ZERO, |acc, c| acc + c)
    }
}

impl fmt::Display for Chips {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Group digits by thousands.
        let digits = self.0.to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3);
        for (idx, c) in digits.chars().enumerate() {
            if idx > 0 && (digits.len() - idx) % 3 == 0 {
                out.push(',');
            }
            out.push(c);
        }

        f.write_str(&out)
    }
}

/// The player cards.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerCards {
    /// The player has no cards.
    #[default]
    None,
    /// The player has cards but their values are covered.
    Covered,
    /// The player cards.
    Cards(Card, Card),
}

impl PlayerCards {
    /// Checks if there are cards.
    pub fn has_cards(&self) -> bool {
        !matches!(self, PlayerCards::None)
    }

    /// Returns the covered version of these cards.
    pub fn covered(&self) -> PlayerCards {
        match self {
            PlayerCards::None => PlayerCards::None,
            _ => PlayerCards::Covered,
        }
    }
}

/// The stage of a round, stages only move forward.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Betting before the flop.
    PreFlop,
    /// Betting after three board cards are dealt.
    Flop,
    /// Betting after the fourth board card.
    Turn,
    /// Betting after the fifth board card.
    River,
    /// Hands are compared and the pot is paid.
    Showdown,
    /// The round has been paid, a new round can start.
    EndRound,
    /// The game cannot continue.
    GameOver,
}

impl Stage {
    /// Checks if players can bet in this stage.
    pub fn is_betting(&self) -> bool {
        matches!(
            self,
            Stage::PreFlop | Stage::Flop | Stage::Turn | Stage::River
        )
    }

    /// The stage name.
    pub fn name(&self) -> &'static str {
        match self {
            Stage::PreFlop => "Pre-flop",
            Stage::Flop => "Flop",
            Stage::Turn => "Turn",
            Stage::River => "River",
            Stage::Showdown => "Showdown",
            Stage::EndRound => "End of round",
            Stage::GameOver => "Game over",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
