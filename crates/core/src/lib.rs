// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Tablestakes Poker core types shared by the engine, the bots and the front ends.
#![warn(clippy::all, rust_2018_idioms, missing_docs)]

pub mod action;
pub mod game_state;
pub mod poker;
