// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Player commands typed at the prompt.
use anyhow::{Result, anyhow, bail};

use tablestakes_engine::{Chips, PlayerAction, TableCommand};

/// Parses a command line into a table command.
///
/// Commands: `c`/`check`, `k`/`call`, `r <amount>`/`raise <amount>`,
/// `f`/`fold`, `n`/`next` and `q`/`quit`.
pub fn parse(line: &str) -> Result<TableCommand> {
    let mut parts = line.split_whitespace();
    let Some(cmd) = parts.next() else {
        bail!("Empty command");
    };

    let action = |action| TableCommand::Action {
        action,
        amount: Chips::ZERO,
    };

    let cmd = match cmd.to_ascii_lowercase().as_str() {
        "c" | "check" => action(PlayerAction::Check),
        "k" | "call" => action(PlayerAction::Call),
        "f" | "fold" => action(PlayerAction::Fold),
        "r" | "raise" => {
            let amount = parts
                .next()
                .ok_or_else(|| anyhow!("Raise needs an amount"))?
                .parse::<u32>()
                .map_err(|_| anyhow!("Invalid raise amount"))?;

            TableCommand::Action {
                action: PlayerAction::Raise,
                amount: Chips::new(amount),
            }
        }
        "n" | "next" => TableCommand::NextRound,
        "q" | "quit" => TableCommand::Quit,
        other => bail!("Unknown command {other}"),
    };

    if parts.next().is_some() {
        bail!("Too many arguments");
    }

    Ok(cmd)
}
