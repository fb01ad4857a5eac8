// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Table task that drives a game between the human player and bots.
use ahash::AHashMap;
use anyhow::{Result, anyhow, bail};
use log::{error, info, warn};
use std::time::Duration;
use tokio::{sync::mpsc, task::JoinHandle, time};

use tablestakes_bot::Strategy;
use tablestakes_core::{
    action::PlayerAction,
    game_state::TableView,
    poker::{Chips, PlayerId, Stage},
};

use crate::game::Game;

/// Handle to a running table task.
#[derive(Debug)]
pub struct Table {
    /// Channel for sending commands.
    commands_tx: mpsc::Sender<TableCommand>,
    /// The table task.
    task: JoinHandle<Result<()>>,
}

/// Command for the table task from the human player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableCommand {
    /// A player action, the amount is the raise increment.
    Action {
        /// The action.
        action: PlayerAction,
        /// The raise amount.
        amount: Chips,
    },
    /// Start the next round.
    NextRound,
    /// Leave the table.
    Quit,
}

impl Table {
    /// Spawns a task that runs the game, the factory creates the strategy
    /// for each bot. Table updates for the human player are sent on `view_tx`.
    pub fn spawn<F, S>(game: Game, factory: F, view_tx: mpsc::Sender<TableView>) -> Self
    where
        F: Fn(PlayerId) -> S,
        S: Strategy,
    {
        let (commands_tx, commands_rx) = mpsc::channel(32);

        let strategies = game
            .players()
            .iter()
            .filter(|p| p.is_bot)
            .map(|p| (p.id, Box::new(factory(p.id)) as Box<dyn Strategy>))
            .collect();

        let mut task = TableTask {
            action_delay: game.config().action_delay,
            game,
            strategies,
            commands_rx,
            view_tx,
        };

        let task = tokio::spawn(async move {
            let res = task.run().await;
            if let Err(err) = &res {
                error!("Table error {err}");
            }

            info!("Table task stopped");
            res
        });

        Self { commands_tx, task }
    }

    /// Sends an action for the human player.
    pub async fn action(&self, action: PlayerAction, amount: Chips) -> Result<()> {
        self.send(TableCommand::Action { action, amount }).await
    }

    /// Starts the next round.
    pub async fn next_round(&self) -> Result<()> {
        self.send(TableCommand::NextRound).await
    }

    /// Sends a command to the table task.
    pub async fn send(&self, cmd: TableCommand) -> Result<()> {
        self.commands_tx
            .send(cmd)
            .await
            .map_err(|_| anyhow!("Table task stopped"))
    }

    /// Tells the table to stop and waits for the task to complete.
    pub async fn quit(self) -> Result<()> {
        let _ = self.commands_tx.send(TableCommand::Quit).await;
        self.task.await?
    }
}

struct TableTask {
    /// The game state.
    game: Game,
    /// The bots strategies.
    strategies: AHashMap<PlayerId, Box<dyn Strategy>>,
    /// The pause before a bot acts.
    action_delay: Duration,
    /// Channel for receiving table commands.
    commands_rx: mpsc::Receiver<TableCommand>,
    /// Channel for sending table updates.
    view_tx: mpsc::Sender<TableView>,
}

impl TableTask {
    async fn run(&mut self) -> Result<()> {
        self.send_view().await?;

        loop {
            match self.game.stage() {
                Stage::GameOver => {
                    info!("Game over: {}", self.game.message());
                    break Ok(());
                }
                Stage::EndRound => {
                    let human_chips = self
                        .game
                        .player(Game::HUMAN_ID)
                        .map(|p| p.chips)
                        .unwrap_or_default();
                    if human_chips == Chips::ZERO {
                        info!("Human player is out of chips");
                        break Ok(());
                    }

                    match self.commands_rx.recv().await {
                        Some(TableCommand::NextRound) => {
                            if let Err(err) = self.game.start_round() {
                                warn!("Cannot start round: {err}");
                            }

                            self.send_view().await?;
                        }
                        Some(TableCommand::Action { action, .. }) => {
                            warn!("Ignored {action} between rounds");
                        }
                        Some(TableCommand::Quit) | None => break Ok(()),
                    }
                }
                Stage::Showdown => {
                    self.game.handle_showdown()?;
                    self.send_view().await?;
                }
                _ => {
                    let Some((player_id, is_bot)) =
                        self.game.current_player().map(|p| (p.id, p.is_bot))
                    else {
                        bail!("No player to act in {}", self.game.stage());
                    };

                    tokio::select! {
                        _ = time::sleep(self.action_delay), if is_bot => {
                            self.bot_action(player_id)?;
                            self.send_view().await?;
                        }
                        res = self.commands_rx.recv() => match res {
                            Some(TableCommand::Action { action, amount }) => {
                                // Rejected actions leave the game unchanged.
                                let _ = self.game.apply(Game::HUMAN_ID, action, amount);
                                self.send_view().await?;
                            }
                            Some(TableCommand::NextRound) => {
                                warn!("Round in progress");
                            }
                            Some(TableCommand::Quit) | None => break Ok(()),
                        },
                    }
                }
            }
        }
    }

    fn bot_action(&mut self, player_id: PlayerId) -> Result<()> {
        let view = self.game.view(player_id);
        let Some(req) = view.action_request.as_ref() else {
            bail!("No action request for bot {player_id}");
        };

        let Some(strategy) = self.strategies.get_mut(&player_id) else {
            bail!("No strategy for bot {player_id}");
        };

        let (action, amount) = strategy.execute(req, &view);
        match self.game.apply(player_id, action, amount) {
            Err(err) if !err.is_fatal() => {
                warn!("Bot {player_id} {action} rejected: {err}");
                let fallback = if req.can_check() {
                    PlayerAction::Check
                } else {
                    PlayerAction::Fold
                };

                if let Err(err) = self.game.apply(player_id, fallback, Chips::ZERO) {
                    if !err.is_fatal() {
                        bail!("Bot {player_id} fallback rejected: {err}");
                    }
                }
            }
            // Fatal errors end the game, the run loop stops at GameOver.
            _ => {}
        }

        Ok(())
    }

    async fn send_view(&mut self) -> Result<()> {
        let view = self.game.view(Game::HUMAN_ID);
        if self.view_tx.send(view).await.is_err() {
            bail!("Table view receiver dropped");
        }

        Ok(())
    }
}
