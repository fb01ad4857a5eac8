// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Tablestakes Poker round engine.
//!
//! A [Game] runs one table of no-limit hold'em rounds between a human player
//! and bots. It is a synchronous state machine: every action is validated
//! against the player whose turn it is and the stage advances as soon as a
//! betting stage is complete. A [Table] drives a game asynchronously, pacing
//! bot actions and sending [TableView] updates to the front end.
#![warn(clippy::all, rust_2018_idioms, missing_docs)]

mod config;
mod error;
mod game;
mod player;
mod showdown;
mod table;

pub use config::Config;
pub use error::{EngineError, InvalidAction};
pub use game::Game;
pub use player::Player;
pub use showdown::{Resolution, resolve};
pub use table::{Table, TableCommand};

pub use tablestakes_bot as bot;
pub use tablestakes_core::{
    action::{ActionRequest, PlayerAction},
    game_state::{HandPayoff, PlayerView, TableView},
    poker::{Card, Chips, PlayerCards, PlayerId, RankedHand, Stage},
};
