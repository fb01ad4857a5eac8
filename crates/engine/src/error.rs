// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Engine errors.
use thiserror::Error;

use tablestakes_core::poker::Chips;

/// An engine error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The deck ran out of cards.
    #[error("deck exhausted")]
    DeckExhausted,
    /// An action was rejected, the game state is unchanged.
    #[error("invalid action: {0}")]
    InvalidAction(#[from] InvalidAction),
    /// Not enough players with chips to play a round.
    #[error("not enough players with chips")]
    InsufficientPlayers,
    /// The buy-in is below the table minimum.
    #[error("buy-in must be at least {min}")]
    InvalidBuyIn {
        /// The minimum buy-in.
        min: Chips,
    },
    /// The big blind is zero or smaller than the small blind.
    #[error("invalid blinds {small}/{big}")]
    InvalidBlinds {
        /// The small blind.
        small: Chips,
        /// The big blind.
        big: Chips,
    },
    /// A broken game invariant.
    #[error("internal error: {0}")]
    Internal(&'static str),
}

impl EngineError {
    /// Checks if this error ended the game.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            EngineError::DeckExhausted | EngineError::InsufficientPlayers | EngineError::Internal(_)
        )
    }
}

/// The reason an action was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidAction {
    /// The player is not the one to act.
    #[error("not your turn")]
    NotYourTurn,
    /// The round is not in a betting stage.
    #[error("no betting in progress")]
    NotBetting,
    /// The player cannot check facing a bet.
    #[error("cannot check facing a bet")]
    CannotCheck,
    /// The raise is below the minimum raise.
    #[error("raise must be at least {min_raise}")]
    RaiseTooSmall {
        /// The minimum raise.
        min_raise: Chips,
    },
    /// A round is already in progress.
    #[error("round in progress")]
    RoundInProgress,
    /// The round is not at showdown.
    #[error("not at showdown")]
    NotShowdown,
    /// The action is not a player action.
    #[error("unknown action")]
    UnknownAction,
}
