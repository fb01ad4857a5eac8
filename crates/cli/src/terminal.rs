// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Terminal I/O.
use anyhow::Result;
use crossterm::{
    cursor,
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{self, Stylize},
    terminal::{Clear, ClearType, disable_raw_mode, enable_raw_mode},
};
use futures_util::StreamExt;
use std::io;
use tokio::sync::mpsc;

use tablestakes_engine::{
    Chips, PlayerAction, PlayerCards, PlayerView, Stage, Table, TableCommand, TableView,
};

use crate::command;

/// The prompt state.
#[derive(Debug, Default)]
struct Prompt {
    line: String,
    error: Option<String>,
}

/// Runs the terminal loop until the player quits or the table stops.
pub async fn run(table: Table, mut view_rx: mpsc::Receiver<TableView>) -> Result<()> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide)?;

    let res = event_loop(&table, &mut view_rx, &mut stdout).await;

    execute!(
        stdout,
        Clear(ClearType::All),
        cursor::MoveTo(0, 0),
        cursor::Show
    )?;
    disable_raw_mode()?;

    // Print the final table state after leaving raw mode.
    if let Ok(Some(view)) = &res {
        println!("{}", view.message);
        if let Some(player) = view.local_player() {
            println!("You leave the table with {} chips", player.chips);
        }
    }

    table.quit().await?;
    res.map(|_| ())
}

async fn event_loop(
    table: &Table,
    view_rx: &mut mpsc::Receiver<TableView>,
    w: &mut impl io::Write,
) -> Result<Option<TableView>> {
    let mut reader = EventStream::new();
    let mut prompt = Prompt::default();
    let mut last_view = None;

    loop {
        tokio::select! {
            // We have received an update from the table.
            res = view_rx.recv() => match res {
                Some(view) => {
                    print_table(w, &view, &prompt)?;
                    last_view = Some(view);
                }
                None => break,
            },
            // We have received an event from the terminal.
            res = reader.next() => {
                let Some(Ok(Event::Key(key))) = res else {
                    continue;
                };

                if key.kind != KeyEventKind::Press {
                    continue;
                }

                if is_interrupt(&key) {
                    break;
                }

                match key.code {
                    KeyCode::Char(c) => prompt.line.push(c),
                    KeyCode::Backspace => {
                        prompt.line.pop();
                    }
                    KeyCode::Esc => prompt.line.clear(),
                    KeyCode::Enter => {
                        let line = std::mem::take(&mut prompt.line);
                        match command::parse(&line) {
                            Ok(TableCommand::Quit) => break,
                            Ok(cmd) => {
                                prompt.error = None;
                                if table.send(cmd).await.is_err() {
                                    break;
                                }
                            }
                            Err(err) => prompt.error = Some(err.to_string()),
                        }
                    }
                    _ => {}
                }

                if let Some(view) = &last_view {
                    print_table(w, view, &prompt)?;
                }
            },
        }
    }

    Ok(last_view)
}

fn is_interrupt(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

fn print_table(w: &mut impl io::Write, view: &TableView, prompt: &Prompt) -> Result<()> {
    queue!(w, Clear(ClearType::All))?;

    let board = view
        .board
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ");

    let header = format!(
        "{:<12} Pot {:<10} Board {}",
        view.stage.to_string(),
        view.total_pot().to_string(),
        board
    );

    queue!(
        w,
        cursor::MoveTo(0, 0),
        style::PrintStyledContent(header.as_str().bold())
    )?;

    // The local player appears at the bottom.
    let mut row = 2;
    for player in view.players.iter().filter(|p| p.player_id != view.viewer) {
        print_player(w, view, player, row)?;
        row += 1;
    }

    if let Some(player) = view.local_player() {
        row += 1;
        print_player(w, view, player, row)?;
    }

    row += 2;
    queue!(
        w,
        cursor::MoveTo(0, row),
        style::PrintStyledContent(view.message.as_str().yellow())
    )?;

    row += 1;
    let help = match (&view.action_request, view.stage) {
        (Some(req), _) => {
            let mut choices = Vec::new();
            if req.can_check() {
                choices.push("c(heck)".to_string());
            }

            if req.can_call() {
                choices.push(format!("k call {}", req.to_call));
            }

            if req.can_raise() {
                choices.push(format!("r <{}..{}>", req.min_raise.min(req.max_raise), req.max_raise));
            }

            choices.push("f(old)".to_string());
            choices.join("  ")
        }
        (None, Stage::EndRound) => "n(ext) round  q(uit)".to_string(),
        (None, Stage::GameOver) => "q(uit)".to_string(),
        _ => "waiting...".to_string(),
    };

    queue!(
        w,
        cursor::MoveTo(0, row),
        style::PrintStyledContent(help.as_str().dark_grey())
    )?;

    if let Some(error) = &prompt.error {
        row += 1;
        queue!(
            w,
            cursor::MoveTo(0, row),
            style::PrintStyledContent(error.as_str().red())
        )?;
    }

    row += 1;
    queue!(
        w,
        cursor::MoveTo(0, row),
        style::Print(format!("> {}", prompt.line))
    )?;

    w.flush()?;

    Ok(())
}

fn print_player(w: &mut impl io::Write, view: &TableView, p: &PlayerView, row: u16) -> Result<()> {
    let button = if p.has_button { "(D)" } else { "" };

    let won = view
        .payoffs
        .iter()
        .find(|payoff| payoff.player_id == p.player_id)
        .map(|payoff| payoff.chips);

    let action = match won {
        Some(_) => "WINNER",
        None if p.is_all_in && !p.is_folded => "ALL-IN",
        None if !matches!(p.action, PlayerAction::None) => p.action.label(),
        None => "",
    };

    let bet = match won {
        Some(chips) => chips.to_string(),
        None if p.bet > Chips::ZERO => p.bet.to_string(),
        None => String::new(),
    };

    let cards = match p.cards {
        PlayerCards::None => "".to_string(),
        PlayerCards::Covered => "▒▒ ▒▒".to_string(),
        PlayerCards::Cards(c1, c2) => format!("{} {}", c1, c2),
    };

    let hand = p.hand.as_ref().map(|h| h.label()).unwrap_or_default();

    let text = format!(
        "{:<3}|{:<10.10}|{:<10.10}|{:<10.10}|{:<10.10}|{:<6}|{}",
        button,
        p.name,
        p.chips.to_string(),
        action,
        bet,
        cards,
        hand
    );

    let text = if view.current == Some(p.player_id) {
        text.as_str().green().bold()
    } else if p.is_folded {
        text.as_str().dark_grey()
    } else {
        text.as_str().dark_green()
    };

    queue!(w, cursor::MoveTo(0, row), style::PrintStyledContent(text))?;

    Ok(())
}
