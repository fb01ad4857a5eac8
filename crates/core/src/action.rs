// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Player actions and action requests.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::poker::{Chips, PlayerId};

/// A Player action.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerAction {
    /// No action.
    #[default]
    None,
    /// Player pays small blind.
    SmallBlind,
    /// Player pays big blind.
    BigBlind,
    /// Player calls.
    Call,
    /// Player checks.
    Check,
    /// Player bets or raises.
    Raise,
    /// Player folds.
    Fold,
}

impl PlayerAction {
    /// The action label.
    pub fn label(&self) -> &'static str {
        match self {
            PlayerAction::None => "",
            PlayerAction::SmallBlind => "SB",
            PlayerAction::BigBlind => "BB",
            PlayerAction::Call => "CALL",
            PlayerAction::Check => "CHECK",
            PlayerAction::Raise => "RAISE",
            PlayerAction::Fold => "FOLD",
        }
    }
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An action request for the player whose turn it is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRequest {
    /// The player that should act.
    pub player_id: PlayerId,
    /// The legal actions.
    pub actions: Vec<PlayerAction>,
    /// The chips needed to match the highest bet.
    pub to_call: Chips,
    /// The minimum raise increment.
    pub min_raise: Chips,
    /// The largest raise increment, going all-in.
    pub max_raise: Chips,
    /// The round big blind.
    pub big_blind: Chips,
}

impl ActionRequest {
    /// Check if a call action is in the request.
    pub fn can_call(&self) -> bool {
        self.check_action(PlayerAction::Call)
    }

    /// Check if a check action is in the request.
    pub fn can_check(&self) -> bool {
        self.check_action(PlayerAction::Check)
    }

    /// Check if a raise action is in the request.
    pub fn can_raise(&self) -> bool {
        self.check_action(PlayerAction::Raise)
    }

    /// Check if a fold action is in the request.
    pub fn can_fold(&self) -> bool {
        self.check_action(PlayerAction::Fold)
    }

    fn check_action(&self, action: PlayerAction) -> bool {
        self.actions.iter().any(|a| a == &action)
    }
}
