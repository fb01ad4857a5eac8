// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Table player types.
use tablestakes_core::{
    action::PlayerAction,
    game_state::PlayerView,
    poker::{Chips, PlayerCards, PlayerId, RankedHand},
};

/// A table player state.
#[derive(Debug, Clone)]
pub struct Player {
    /// The player id.
    pub id: PlayerId,
    /// This player name.
    pub name: String,
    /// This player private cards.
    pub hole_cards: PlayerCards,
    /// This player chips.
    pub chips: Chips,
    /// The player bet in the current betting stage.
    pub bet: Chips,
    /// The player has folded this round.
    pub is_folded: bool,
    /// The player has put all the chips in.
    pub is_all_in: bool,
    /// The player acted in the current betting stage.
    pub has_acted: bool,
    /// The player is controlled by a strategy.
    pub is_bot: bool,
    /// The last player action.
    pub action: PlayerAction,
    /// The hand evaluated at showdown.
    pub hand: Option<RankedHand>,
    /// The hole cards are visible to all players.
    pub is_revealed: bool,
}

impl Player {
    /// Creates a new player.
    pub fn new(id: PlayerId, name: String, chips: Chips, is_bot: bool) -> Self {
        Self {
            id,
            name,
            hole_cards: PlayerCards::None,
            chips,
            bet: Chips::ZERO,
            is_folded: false,
            is_all_in: false,
            has_acted: false,
            is_bot,
            action: PlayerAction::None,
            hand: None,
            is_revealed: false,
        }
    }

    /// The player has not folded.
    pub fn in_hand(&self) -> bool {
        !self.is_folded
    }

    /// The player can still put chips in.
    pub fn can_bet(&self) -> bool {
        !self.is_folded && !self.is_all_in
    }

    /// The player has to act to match the highest bet or has not acted yet.
    pub fn needs_to_act(&self, highest_bet: Chips) -> bool {
        self.can_bet() && (!self.has_acted || self.bet < highest_bet)
    }

    /// Moves chips from the stack to the bet, capped at the stack, and
    /// returns the chips moved.
    pub fn put_chips(&mut self, chips: Chips) -> Chips {
        let amount = chips.min(self.chips);
        self.chips -= amount;
        self.bet += amount;

        if self.chips == Chips::ZERO {
            self.is_all_in = true;
        }

        amount
    }

    /// Posts a blind, the player is not considered to have acted.
    pub fn post_blind(&mut self, action: PlayerAction, chips: Chips) -> Chips {
        self.action = action;
        self.put_chips(chips)
    }

    /// Sets this player in fold state.
    pub fn fold(&mut self) {
        self.is_folded = true;
        self.has_acted = true;
        self.action = PlayerAction::Fold;
        self.hole_cards = PlayerCards::None;
        self.hand = None;
    }

    /// Reset state for a new round.
    pub fn start_round(&mut self) {
        self.hole_cards = PlayerCards::None;
        self.bet = Chips::ZERO;
        self.is_folded = false;
        self.is_all_in = false;
        self.has_acted = false;
        self.action = PlayerAction::None;
        self.hand = None;
        self.is_revealed = false;
    }

    /// Reset state for a new betting stage.
    pub fn start_stage(&mut self) {
        self.bet = Chips::ZERO;
        self.has_acted = false;
        if !self.is_folded {
            self.action = PlayerAction::None;
        }
    }

    /// Returns the view of this player for the given viewer.
    pub fn view(&self, viewer: PlayerId, has_button: bool) -> PlayerView {
        let visible = self.id == viewer || self.is_revealed;
        PlayerView {
            player_id: self.id,
            name: self.name.clone(),
            chips: self.chips,
            bet: self.bet,
            action: self.action,
            cards: if visible {
                self.hole_cards
            } else {
                self.hole_cards.covered()
            },
            is_folded: self.is_folded,
            is_all_in: self.is_all_in,
            is_bot: self.is_bot,
            has_button,
            hand: if self.is_revealed {
                self.hand.clone()
            } else {
                None
            },
        }
    }
}
