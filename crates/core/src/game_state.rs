// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Table snapshot types given to front ends and bots.
use serde::{Deserialize, Serialize};

use crate::{
    action::{ActionRequest, PlayerAction},
    poker::{Card, Chips, PlayerCards, PlayerId, RankedHand, Stage},
};

/// A player as seen by a viewer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerView {
    /// This player id.
    pub player_id: PlayerId,
    /// This player name.
    pub name: String,
    /// This player chips.
    pub chips: Chips,
    /// The player bet in the current betting stage.
    pub bet: Chips,
    /// The last player action.
    pub action: PlayerAction,
    /// This player cards, covered for other players until showdown.
    pub cards: PlayerCards,
    /// The player has folded.
    pub is_folded: bool,
    /// The player has no chips left to bet.
    pub is_all_in: bool,
    /// The player is controlled by a strategy.
    pub is_bot: bool,
    /// The player has the button.
    pub has_button: bool,
    /// The evaluated hand, set at showdown for players still in the hand.
    pub hand: Option<RankedHand>,
}

/// A pot payoff for a winner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandPayoff {
    /// The player that won the chips.
    pub player_id: PlayerId,
    /// The chips won.
    pub chips: Chips,
    /// The winning cards, empty if the hand was won uncontested.
    pub cards: Vec<Card>,
}

/// A snapshot of the table state for a viewer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableView {
    /// The player this view was built for.
    pub viewer: PlayerId,
    /// The round stage.
    pub stage: Stage,
    /// The pot, not including the bets of the current stage.
    pub pot: Chips,
    /// The board cards.
    pub board: Vec<Card>,
    /// The players in seat order.
    pub players: Vec<PlayerView>,
    /// The player whose turn it is.
    pub current: Option<PlayerId>,
    /// The player with the button.
    pub dealer: Option<PlayerId>,
    /// The highest bet in the current betting stage.
    pub highest_bet: Chips,
    /// The minimum raise increment.
    pub min_raise: Chips,
    /// The last player that raised in this stage.
    pub last_raiser: Option<PlayerId>,
    /// A status message for the last event.
    pub message: String,
    /// The payoffs of the last showdown.
    pub payoffs: Vec<HandPayoff>,
    /// The best hand at the last showdown.
    pub winning_hand: Option<RankedHand>,
    /// The action request if it is the viewer turn.
    pub action_request: Option<ActionRequest>,
}

impl TableView {
    /// Returns the viewer player.
    pub fn local_player(&self) -> Option<&PlayerView> {
        self.player(self.viewer)
    }

    /// Returns a player by id.
    pub fn player(&self, player_id: PlayerId) -> Option<&PlayerView> {
        self.players.iter().find(|p| p.player_id == player_id)
    }

    /// Returns the player whose turn it is.
    pub fn current_player(&self) -> Option<&PlayerView> {
        self.current.and_then(|id| self.player(id))
    }

    /// Checks if it is the viewer turn.
    pub fn is_local_turn(&self) -> bool {
        self.current == Some(self.viewer) && self.action_request.is_some()
    }

    /// The pot including the bets of the current stage.
    pub fn total_pot(&self) -> Chips {
        self.pot + self.players.iter().map(|p| p.bet).sum::<Chips>()
    }
}
