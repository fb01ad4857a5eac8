// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0
//
// Run with:
//
// ```bash
// $ cargo r --release --example sample7 -- --hands 1000000
// ```
use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};
use std::time::Instant;

use tablestakes_eval::*;

#[derive(Debug, Parser)]
struct Cli {
    /// Number of random 7 cards hands to evaluate.
    #[clap(long, default_value_t = 1_000_000)]
    hands: usize,
    /// Random generator seed.
    #[clap(long, default_value_t = 101)]
    seed: u64,
}

const CATEGORIES: [HandRank; 10] = [
    HandRank::HighCard,
    HandRank::OnePair,
    HandRank::TwoPair,
    HandRank::ThreeOfAKind,
    HandRank::Straight,
    HandRank::Flush,
    HandRank::FullHouse,
    HandRank::FourOfAKind,
    HandRank::StraightFlush,
    HandRank::RoyalFlush,
];

fn main() {
    let cli = Cli::parse();
    let mut rng = StdRng::seed_from_u64(cli.seed);

    let now = Instant::now();
    let mut counts = [0usize; CATEGORIES.len()];

    for _ in 0..cli.hands {
        let mut deck = Deck::new_and_shuffled(&mut rng);
        let hand = (0..7).filter_map(|_| deck.deal()).collect::<Vec<_>>();
        let rank = RankedHand::eval(&hand).rank();
        counts[rank as usize] += 1;
    }

    let elapsed = now.elapsed().as_secs_f64();
    println!("Total hands      {}", cli.hands);
    println!("Elapsed:         {:.3}s", elapsed);
    println!("Hands/sec:       {:.0}\n", cli.hands as f64 / elapsed);

    for rank in CATEGORIES {
        let pct = counts[rank as usize] as f64 * 100.0 / cli.hands.max(1) as f64;
        println!("{:<16} {:>10} {:>8.4}%", rank.name(), counts[rank as usize], pct);
    }
}
