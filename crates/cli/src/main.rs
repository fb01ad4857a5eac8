// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Tablestakes CLI, play hold'em against bots in the terminal.
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
use anyhow::Result;
use clap::Parser;
use std::time::Duration;
use tokio::sync::mpsc;

use tablestakes_engine::{Chips, Config, Game, Table, bot::HandStrength};

pub mod command;
pub mod terminal;

#[derive(Debug, Parser)]
struct Cli {
    /// The chips you sit down with, at least twice the big blind.
    #[clap(long, default_value_t = 1_000)]
    buy_in: u32,
    /// Number of bots at the table.
    #[clap(long, short, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=5))]
    bots: u8,
    /// The small blind.
    #[clap(long, default_value_t = 10)]
    small_blind: u32,
    /// The big blind.
    #[clap(long, default_value_t = 20)]
    big_blind: u32,
    /// Pause in milliseconds before a bot acts.
    #[clap(long, default_value_t = 600)]
    delay_ms: u64,
    /// Seed for reproducible games.
    #[clap(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::builder()
        .filter_level(log::LevelFilter::Warn)
        .format_target(false)
        .format_timestamp_millis()
        .parse_default_env()
        .init();

    let config = Config {
        small_blind: Chips::new(cli.small_blind),
        big_blind: Chips::new(cli.big_blind),
        bots: cli.bots as usize,
        action_delay: Duration::from_millis(cli.delay_ms),
        seed: cli.seed,
        ..Config::default()
    };

    let mut game = Game::new(config);
    game.initialize_round(Chips::new(cli.buy_in))?;

    let (view_tx, view_rx) = mpsc::channel(64);
    let table = Table::spawn(game, |_| HandStrength, view_tx);

    terminal::run(table, view_rx).await
}
