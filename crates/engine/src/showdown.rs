// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Showdown winners resolution.
use tablestakes_core::poker::{Card, PlayerCards, RankedHand};

use crate::player::Player;

/// The result of comparing the hands at showdown.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// The evaluated hand for each player still in the hand, by seat index.
    pub hands: Vec<(usize, RankedHand)>,
    /// The seat indices of the winners in seat order.
    pub winners: Vec<usize>,
}

impl Resolution {
    /// The winning hand.
    pub fn best(&self) -> Option<&RankedHand> {
        self.winners
            .first()
            .and_then(|w| self.hands.iter().find(|(idx, _)| idx == w))
            .map(|(_, hand)| hand)
    }

    /// The evaluated hand for a seat.
    pub fn hand(&self, seat: usize) -> Option<&RankedHand> {
        self.hands
            .iter()
            .find(|(idx, _)| *idx == seat)
            .map(|(_, hand)| hand)
    }
}

/// Evaluates the best hand of every player that has not folded and returns
/// the players with the best hand, more than one on a tie.
///
/// The board must have at least three cards.
pub fn resolve(players: &[Player], board: &[Card]) -> Resolution {
    let mut cards = Vec::with_capacity(7);
    let hands = players
        .iter()
        .enumerate()
        .filter(|(_, p)| p.in_hand())
        .filter_map(|(idx, p)| match p.hole_cards {
            PlayerCards::Cards(c1, c2) => {
                cards.clear();
                cards.extend([c1, c2]);
                cards.extend_from_slice(board);
                Some((idx, RankedHand::eval(&cards)))
            }
            _ => None,
        })
        .collect::<Vec<_>>();

    let winners = match hands.iter().map(|(_, h)| h).max() {
        Some(best) => hands
            .iter()
            .filter(|(_, h)| h == best)
            .map(|(idx, _)| *idx)
            .collect(),
        None => Vec::new(),
    };

    Resolution { hands, winners }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablestakes_core::poker::{Chips, HandRank, PlayerId};

    fn cards(s: &str) -> Vec<Card> {
        s.split_whitespace().filter_map(Card::parse).collect()
    }

    fn player(id: u32, hole: &str) -> Player {
        let c = cards(hole);
        let mut player = Player::new(PlayerId::new(id), format!("P{id}"), Chips::new(100), id != 0);
        player.hole_cards = PlayerCards::Cards(c[0], c[1]);
        player
    }

    #[test]
    fn single_winner() {
        let board = cards("2H 7D 9C JS KH");
        let players = vec![player(0, "AS AD"), player(1, "KC QD")];
        let res = resolve(&players, &board);
        assert_eq!(res.winners, vec![0]);
        assert_eq!(res.best().map(|h| h.rank()), Some(HandRank::OnePair));
        assert_eq!(res.hand(1).map(|h| h.label()), Some("Pair of Kings"));
    }

    #[test]
    fn board_plays_for_everyone() {
        let board = cards("TS JS QS KS AS");
        let players = vec![player(0, "2C 3D"), player(1, "4C 5D"), player(2, "6C 7D")];
        let res = resolve(&players, &board);
        assert_eq!(res.winners, vec![0, 1, 2]);
        assert_eq!(res.best().map(|h| h.rank()), Some(HandRank::RoyalFlush));
    }

    #[test]
    fn kickers_break_ties() {
        let board = cards("2H 7D 9C JS 3S");
        let players = vec![player(0, "AS 4D"), player(1, "AC KD"), player(2, "AH KH")];
        let res = resolve(&players, &board);
        assert_eq!(res.winners, vec![1, 2]);
    }

    #[test]
    fn folded_players_are_ignored() {
        let board = cards("2H 7D 9C JS 3S");
        let mut players = vec![player(0, "AS AD"), player(1, "KC QD")];
        players[0].fold();
        let res = resolve(&players, &board);
        assert_eq!(res.winners, vec![1]);
        assert_eq!(res.hands.len(), 1);
        assert!(res.hand(0).is_none());
    }
}
