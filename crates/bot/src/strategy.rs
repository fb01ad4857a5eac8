// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Bot strategies.
use log::debug;
use rand::{Rng, SeedableRng, rngs::StdRng};

use tablestakes_core::{
    action::{ActionRequest, PlayerAction},
    game_state::TableView,
    poker::{Card, Chips, PlayerCards, Rank, RankedHand},
};

use crate::Strategy;

/// A strategy that plays according to the strength of its hand.
#[derive(Debug, Default, Clone)]
pub struct HandStrength;

impl HandStrength {
    /// Estimates the hand strength in the range 0..=1.
    pub fn strength(cards: PlayerCards, board: &[Card]) -> f64 {
        let PlayerCards::Cards(c1, c2) = cards else {
            return 0.0;
        };

        if board.is_empty() {
            if c1.rank() == c2.rank() {
                0.8
            } else if c1.rank() >= Rank::Ten && c2.rank() >= Rank::Ten {
                0.6
            } else {
                0.4
            }
        } else if board.len() >= 3 {
            let mut hand = Vec::with_capacity(7);
            hand.extend([c1, c2]);
            hand.extend_from_slice(board);

            let value = RankedHand::eval(&hand).value();
            if value >= 600.0 {
                0.9
            } else if value >= 400.0 {
                0.6
            } else {
                0.3
            }
        } else {
            0.5
        }
    }
}

impl Strategy for HandStrength {
    fn execute(&mut self, req: &ActionRequest, view: &TableView) -> (PlayerAction, Chips) {
        let Some(player) = view.local_player() else {
            return (PlayerAction::Fold, Chips::ZERO);
        };

        let strength = Self::strength(player.cards, &view.board);
        debug!("{} strength {strength:.1} to call {}", player.name, req.to_call);

        if req.to_call == Chips::ZERO {
            return (PlayerAction::Check, Chips::ZERO);
        }

        if strength >= 0.8 && player.chips > req.to_call * 2 && req.can_raise() {
            let amount = req.min_raise.max(player.chips / 2);
            (PlayerAction::Raise, amount)
        } else if strength >= 0.5 || req.to_call < player.chips / 10 {
            (PlayerAction::Call, Chips::ZERO)
        } else {
            (PlayerAction::Fold, Chips::ZERO)
        }
    }
}

/// A strategy that always calls or checks.
#[derive(Debug, Default, Clone)]
pub struct CallingStation;

impl Strategy for CallingStation {
    fn execute(&mut self, req: &ActionRequest, _view: &TableView) -> (PlayerAction, Chips) {
        if req.can_call() {
            (PlayerAction::Call, Chips::ZERO)
        } else if req.can_check() {
            (PlayerAction::Check, Chips::ZERO)
        } else {
            (PlayerAction::Fold, Chips::ZERO)
        }
    }
}

/// A strategy that mostly calls, folds sometimes and raises pocket pairs.
#[derive(Debug)]
pub struct RandomCaller {
    rng: StdRng,
}

impl RandomCaller {
    /// Creates a strategy with a seeded generator.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Strategy for RandomCaller {
    fn execute(&mut self, req: &ActionRequest, view: &TableView) -> (PlayerAction, Chips) {
        // Some randomness.
        let p = self.rng.random::<f64>();

        if let Some(PlayerCards::Cards(c1, c2)) = view.local_player().map(|p| p.cards) {
            if c1.rank() == c2.rank() && view.board.is_empty() && req.can_raise() && p > 0.2 {
                return (PlayerAction::Raise, req.min_raise);
            }
        }

        if p < 0.1 && !req.can_check() {
            (PlayerAction::Fold, Chips::ZERO)
        } else if p > 0.9 && req.can_raise() {
            let amount = req.min_raise.max(req.big_blind);
            (PlayerAction::Raise, amount)
        } else if req.can_call() {
            (PlayerAction::Call, Chips::ZERO)
        } else if req.can_check() {
            (PlayerAction::Check, Chips::ZERO)
        } else {
            (PlayerAction::Fold, Chips::ZERO)
        }
    }
}
