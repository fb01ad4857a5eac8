// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Best 5 cards hand search and ranking.
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt};

use tablestakes_cards::{Card, Rank};

/// The hand category, from the lowest to the highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HandRank {
    /// No pairs.
    HighCard,
    /// One pair.
    OnePair,
    /// Two pairs.
    TwoPair,
    /// Three cards of the same rank.
    ThreeOfAKind,
    /// Five consecutive ranks.
    Straight,
    /// Five cards of the same suit.
    Flush,
    /// Three of a kind and a pair.
    FullHouse,
    /// Four cards of the same rank.
    FourOfAKind,
    /// A straight in one suit.
    StraightFlush,
    /// An Ace high straight flush.
    RoyalFlush,
}

impl HandRank {
    /// The start of this category value band.
    fn base(&self) -> u32 {
        match self {
            HandRank::HighCard => 0,
            HandRank::OnePair => 200,
            HandRank::TwoPair => 300,
            HandRank::ThreeOfAKind => 400,
            HandRank::Straight => 500,
            HandRank::Flush => 600,
            HandRank::FullHouse => 700,
            HandRank::FourOfAKind => 800,
            HandRank::StraightFlush | HandRank::RoyalFlush => 900,
        }
    }

    /// The category name.
    pub fn name(&self) -> &'static str {
        match self {
            HandRank::HighCard => "High Card",
            HandRank::OnePair => "Pair",
            HandRank::TwoPair => "Two Pair",
            HandRank::ThreeOfAKind => "Three of a Kind",
            HandRank::Straight => "Straight",
            HandRank::Flush => "Flush",
            HandRank::FullHouse => "Full House",
            HandRank::FourOfAKind => "Four of a Kind",
            HandRank::StraightFlush => "Straight Flush",
            HandRank::RoyalFlush => "Royal Flush",
        }
    }
}

impl fmt::Display for HandRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The best 5 cards hand out of a 5, 6 or 7 cards hand.
///
/// The hand value is stored in hundredths so that compound categories can
/// encode their second rank as a fraction, a Full House of Kings over Deuces
/// has value `713.02` and score `71302`. Hands compare by score and then by
/// kickers, where a missing kicker is lower than any rank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedHand {
    rank: HandRank,
    score: u32,
    kickers: Vec<Rank>,
    label: String,
    cards: [Card; 5],
}

impl RankedHand {
    /// Evaluates a 5, 6 or 7 cards hand and returns its best 5 cards hand.
    ///
    /// Panics if the number of cards is not 5 <= n <= 7.
    pub fn eval(cards: &[Card]) -> Self {
        assert!(
            (5..=7).contains(&cards.len()),
            "5 <= cards <= 7, got {}",
            cards.len()
        );

        let mut best = Self::eval_five([cards[0], cards[1], cards[2], cards[3], cards[4]]);
        for_each_five(cards, |hand| {
            let ranked = Self::eval_five(hand);
            if ranked > best {
                best = ranked;
            }
        });

        best
    }

    /// The hand category.
    pub fn rank(&self) -> HandRank {
        self.rank
    }

    /// The hand numeric value.
    pub fn value(&self) -> f64 {
        f64::from(self.score) / 100.0
    }

    /// The hand value in hundredths.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// The ranks used to break ties between hands with the same value.
    pub fn kickers(&self) -> &[Rank] {
        &self.kickers
    }

    /// A human readable description of this hand.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The five cards that make this hand sorted by descending rank.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    fn eval_five(mut cards: [Card; 5]) -> Self {
        cards.sort_by(|c1, c2| c2.rank().cmp(&c1.rank()));
        let ranks = cards.map(|c| c.rank());

        let is_flush = cards.iter().all(|c| c.suit() == cards[0].suit());

        let mut counts = AHashMap::with_capacity(5);
        for rank in ranks {
            *counts.entry(rank).or_insert(0u8) += 1;
        }

        // Ranks grouped by multiplicity, larger groups first then higher ranks.
        let mut groups = counts
            .into_iter()
            .map(|(rank, count)| (count, rank))
            .collect::<Vec<_>>();
        groups.sort_unstable_by(|g1, g2| g2.cmp(g1));

        let straight_high = if groups.len() < 5 {
            None
        } else if ranks == [Rank::Ace, Rank::Five, Rank::Four, Rank::Trey, Rank::Deuce] {
            Some(Rank::Five)
        } else if ranks[0].value() - ranks[4].value() == 4 {
            Some(ranks[0])
        } else {
            None
        };

        let kickers = |used: &[Rank]| {
            ranks
                .iter()
                .copied()
                .filter(|r| !used.contains(r))
                .collect::<Vec<_>>()
        };

        let counts = groups.iter().map(|(c, _)| *c).collect::<Vec<_>>();
        let (first, second) = (groups[0].1, groups.get(1).map(|g| g.1));

        let (rank, primary, secondary, kickers, label) = match (straight_high, counts.as_slice()) {
            (Some(Rank::Ace), _) if is_flush => (
                HandRank::RoyalFlush,
                Rank::Ace,
                None,
                Vec::new(),
                "Royal Flush".to_string(),
            ),
            (Some(high), _) if is_flush => (
                HandRank::StraightFlush,
                high,
                None,
                Vec::new(),
                format!("Straight Flush, {} high", high.name()),
            ),
            (_, [4, 1]) => (
                HandRank::FourOfAKind,
                first,
                None,
                kickers(&[first]),
                format!("Four of a Kind, {}", first.plural_name()),
            ),
            (_, [3, 2]) => {
                let pair = second.unwrap_or(first);
                (
                    HandRank::FullHouse,
                    first,
                    Some(pair),
                    Vec::new(),
                    format!(
                        "Full House, {} over {}",
                        first.plural_name(),
                        pair.plural_name()
                    ),
                )
            }
            _ if is_flush => (
                HandRank::Flush,
                ranks[0],
                None,
                ranks.to_vec(),
                format!("Flush, {} high", ranks[0].name()),
            ),
            (Some(high), _) => (
                HandRank::Straight,
                high,
                None,
                Vec::new(),
                format!("Straight, {} high", high.name()),
            ),
            (_, [3, 1, 1]) => (
                HandRank::ThreeOfAKind,
                first,
                None,
                kickers(&[first]),
                format!("Three of a Kind, {}", first.plural_name()),
            ),
            (_, [2, 2, 1]) => {
                let low = second.unwrap_or(first);
                (
                    HandRank::TwoPair,
                    first,
                    Some(low),
                    kickers(&[first, low]),
                    format!("Two Pair, {} and {}", first.plural_name(), low.plural_name()),
                )
            }
            (_, [2, 1, 1, 1]) => (
                HandRank::OnePair,
                first,
                None,
                kickers(&[first]),
                format!("Pair of {}", first.plural_name()),
            ),
            _ => (
                HandRank::HighCard,
                ranks[0],
                None,
                ranks.to_vec(),
                format!("High Card, {}", ranks[0].name()),
            ),
        };

        let score = (rank.base() + u32::from(primary.value())) * 100
            + secondary.map(|r| u32::from(r.value())).unwrap_or(0);

        Self {
            rank,
            score,
            kickers,
            label,
            cards,
        }
    }
}

impl PartialEq for RankedHand {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for RankedHand {}

impl PartialOrd for RankedHand {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RankedHand {
    fn cmp(&self, other: &Self) -> Ordering {
        // Slices compare element by element and a shorter prefix is lower.
        self.score
            .cmp(&other.score)
            .then_with(|| self.kickers.as_slice().cmp(other.kickers.as_slice()))
    }
}

impl fmt::Display for RankedHand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Calls the `f` closure for each 5 cards combination.
fn for_each_five<F>(cards: &[Card], mut f: F)
where
    F: FnMut([Card; 5]),
{
    let n = cards.len();
    for c1 in 0..n {
        for c2 in (c1 + 1)..n {
            for c3 in (c2 + 1)..n {
                for c4 in (c3 + 1)..n {
                    for c5 in (c4 + 1)..n {
                        f([cards[c1], cards[c2], cards[c3], cards[c4], cards[c5]]);
                    }
                }
            }
        }
    }
}
