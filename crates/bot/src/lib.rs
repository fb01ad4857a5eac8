// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Tablestakes Bot strategies.
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
use tablestakes_core::{
    action::{ActionRequest, PlayerAction},
    game_state::TableView,
    poker::Chips,
};

pub use tablestakes_core as core;

mod strategy;
pub use strategy::{CallingStation, HandStrength, RandomCaller};

/// A Poker bot strategy.
pub trait Strategy: Send + 'static {
    /// Execute an action given an action request and the bot view of the table.
    ///
    /// The returned chips are the raise increment over the call amount and are
    /// ignored for other actions.
    fn execute(&mut self, req: &ActionRequest, view: &TableView) -> (PlayerAction, Chips);
}

static NICKNAMES: &[&str] = &["Bob", "Alice", "Carol", "Dave", "Frank", "Mike"];

/// Returns the display name for the bot at the given index.
pub fn nickname(idx: usize) -> String {
    format!("Bot {}", NICKNAMES[idx % NICKNAMES.len()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bot_nicknames() {
        assert_eq!(nickname(0), "Bot Bob");
        assert_eq!(nickname(1), "Bot Alice");
        assert_eq!(nickname(NICKNAMES.len()), "Bot Bob");
    }
}
