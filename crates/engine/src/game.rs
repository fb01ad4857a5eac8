// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Round state machine.
use log::{debug, error, info, warn};
use rand::{Rng, SeedableRng, rngs::StdRng};

use tablestakes_core::{
    action::{ActionRequest, PlayerAction},
    game_state::{HandPayoff, TableView},
    poker::{Card, Chips, Deck, PlayerCards, PlayerId, RankedHand, Stage},
};

use crate::{
    config::Config,
    error::{EngineError, InvalidAction},
    player::Player,
    showdown,
};

/// A table game between a human player and bots.
#[derive(Debug)]
pub struct Game {
    config: Config,
    stage: Stage,
    players: Vec<Player>,
    deck: Deck,
    board: Vec<Card>,
    pot: Chips,
    highest_bet: Chips,
    min_raise: Chips,
    last_raiser: Option<usize>,
    current: Option<usize>,
    dealer: Option<usize>,
    message: String,
    payoffs: Vec<HandPayoff>,
    winning_hand: Option<RankedHand>,
    rng: StdRng,
}

impl Game {
    /// The human player id.
    pub const HUMAN_ID: PlayerId = PlayerId::new(0);

    /// The human player name.
    pub const HUMAN_NAME: &'static str = "You";

    /// Creates a new game, seeded from the config when a seed is set.
    pub fn new(config: Config) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self::with_rng(config, rng)
    }

    /// Creates a new game with user initialized randomness.
    pub fn with_rng(config: Config, mut rng: StdRng) -> Self {
        Self {
            stage: Stage::EndRound,
            players: Vec::default(),
            deck: Deck::new_and_shuffled(&mut rng),
            board: Vec::default(),
            pot: Chips::ZERO,
            highest_bet: Chips::ZERO,
            min_raise: config.big_blind,
            last_raiser: None,
            current: None,
            dealer: None,
            message: String::new(),
            payoffs: Vec::default(),
            winning_hand: None,
            config,
            rng,
        }
    }

    /// Seats the human player with the given buy-in and the configured bots,
    /// picks a random dealer and returns the players.
    pub fn initialize_round(&mut self, buy_in: Chips) -> Result<&[Player], EngineError> {
        if let Err(err) = self.config.validate() {
            warn!("Rejected config: {err}");
            return Err(err);
        }

        let min = self.config.min_buy_in();
        if buy_in < min {
            warn!("Rejected buy-in {buy_in}, minimum is {min}");
            return Err(EngineError::InvalidBuyIn { min });
        }

        self.players.clear();
        self.players.push(Player::new(
            Self::HUMAN_ID,
            Self::HUMAN_NAME.to_string(),
            buy_in,
            false,
        ));

        for idx in 0..self.config.bots {
            self.players.push(Player::new(
                PlayerId::new(idx as u32 + 1),
                tablestakes_bot::nickname(idx),
                self.config.starting_chips,
                true,
            ));
        }

        self.dealer = Some(self.rng.random_range(0..self.players.len()));
        self.board.clear();
        self.pot = Chips::ZERO;
        self.highest_bet = Chips::ZERO;
        self.min_raise = self.config.big_blind;
        self.last_raiser = None;
        self.current = None;
        self.payoffs.clear();
        self.winning_hand = None;
        self.stage = Stage::EndRound;
        self.message = format!("{} players seated", self.players.len());

        info!(
            "Seated {} players, buy-in {buy_in}, blinds {}/{}",
            self.players.len(),
            self.config.small_blind,
            self.config.big_blind
        );

        Ok(&self.players)
    }

    /// Starts a new round: moves the button, shuffles, deals the hole cards
    /// and posts the blinds.
    pub fn start_round(&mut self) -> Result<(), EngineError> {
        if self.stage != Stage::EndRound {
            return Err(self.reject(None, InvalidAction::RoundInProgress));
        }

        // The button moves to the next player that has chips.
        let n = self.players.len();
        let dealer_id = self.dealer.and_then(|dealer| {
            (1..=n)
                .map(|offset| &self.players[(dealer + offset) % n])
                .find(|p| p.chips > Chips::ZERO)
                .map(|p| p.id)
        });

        self.players.retain(|p| p.chips > Chips::ZERO);
        if self.players.len() < 2 {
            self.dealer = None;
            return Err(self.game_over(EngineError::InsufficientPlayers));
        }

        self.dealer = Some(
            dealer_id
                .and_then(|id| self.players.iter().position(|p| p.id == id))
                .unwrap_or(0),
        );

        for player in &mut self.players {
            player.start_round();
        }

        self.board.clear();
        self.pot = Chips::ZERO;
        self.payoffs.clear();
        self.winning_hand = None;
        self.highest_bet = Chips::ZERO;
        self.min_raise = self.config.big_blind;
        self.last_raiser = None;
        self.current = None;
        self.deck = Deck::new_and_shuffled(&mut self.rng);

        self.deal_hole_cards()?;
        self.post_blinds();

        self.stage = Stage::PreFlop;
        self.message = "New round".to_string();

        info!(
            "Round started, button {}, {} players",
            self.players[self.dealer_index()].name,
            self.players.len()
        );

        if self.is_betting_complete() {
            // The blinds put everybody all-in.
            return self.proceed_to_next_stage();
        }

        self.current = Some(self.first_to_act_preflop()?);
        Ok(())
    }

    /// Applies a player action, the amount is used for raises only.
    pub fn apply(
        &mut self,
        player_id: PlayerId,
        action: PlayerAction,
        amount: Chips,
    ) -> Result<(), EngineError> {
        match action {
            PlayerAction::Check => self.check(player_id),
            PlayerAction::Call => self.call(player_id),
            PlayerAction::Raise => self.raise(player_id, amount),
            PlayerAction::Fold => self.fold(player_id),
            _ => Err(self.reject(Some(player_id), InvalidAction::UnknownAction)),
        }
    }

    /// The player checks.
    pub fn check(&mut self, player_id: PlayerId) -> Result<(), EngineError> {
        let idx = self.validate_turn(player_id)?;
        if self.players[idx].bet < self.highest_bet {
            return Err(self.reject(Some(player_id), InvalidAction::CannotCheck));
        }

        self.act(idx, PlayerAction::Check);
        self.advance_turn()
    }

    /// The player calls the highest bet, or checks if there is nothing to call.
    pub fn call(&mut self, player_id: PlayerId) -> Result<(), EngineError> {
        let idx = self.validate_turn(player_id)?;
        let to_call = self.highest_bet - self.players[idx].bet;
        if to_call == Chips::ZERO {
            self.act(idx, PlayerAction::Check);
        } else {
            self.players[idx].put_chips(to_call);
            self.act(idx, PlayerAction::Call);
        }

        self.advance_turn()
    }

    /// The player raises by `amount` over the call amount, a raise that
    /// needs all the player chips is an all-in.
    pub fn raise(&mut self, player_id: PlayerId, amount: Chips) -> Result<(), EngineError> {
        let idx = self.validate_turn(player_id)?;
        let player = &self.players[idx];
        let to_call = self.highest_bet - player.bet;
        let total = to_call + amount;

        if total >= player.chips {
            // All-in, the minimum raise does not apply.
            let chips = player.chips;
            self.players[idx].put_chips(chips);
            if self.players[idx].bet > self.highest_bet {
                self.register_raise(idx);
            } else {
                self.act(idx, PlayerAction::Call);
            }
        } else {
            if amount == Chips::ZERO || amount < self.min_raise {
                let min_raise = self.min_raise;
                return Err(self.reject(
                    Some(player_id),
                    InvalidAction::RaiseTooSmall { min_raise },
                ));
            }

            self.players[idx].put_chips(total);
            self.register_raise(idx);
        }

        self.advance_turn()
    }

    /// The player folds.
    pub fn fold(&mut self, player_id: PlayerId) -> Result<(), EngineError> {
        let idx = self.validate_turn(player_id)?;
        self.players[idx].fold();
        self.log_action(idx);
        self.advance_turn()
    }

    /// Moves the turn to the next player that has to act, or to the next
    /// stage when betting is complete.
    pub fn advance_turn(&mut self) -> Result<(), EngineError> {
        if !self.stage.is_betting() {
            return Err(self.reject(None, InvalidAction::NotBetting));
        }

        if self.count_in_hand() <= 1 || self.is_betting_complete() {
            return self.proceed_to_next_stage();
        }

        let from = self.current.unwrap_or_else(|| self.dealer_index());
        let next = self.next_to_act(from)?;
        self.current = Some(next);
        Ok(())
    }

    /// Collects the bets and moves to the next stage, dealing the board
    /// cards. At showdown the pot is paid in the same call.
    pub fn proceed_to_next_stage(&mut self) -> Result<(), EngineError> {
        if !self.stage.is_betting() {
            return Err(self.reject(None, InvalidAction::NotBetting));
        }

        self.collect_bets();
        self.highest_bet = Chips::ZERO;
        self.min_raise = self.config.big_blind;
        self.last_raiser = None;
        self.current = None;

        if self.count_in_hand() <= 1 {
            self.stage = Stage::Showdown;
            return self.handle_showdown();
        }

        if self.count_can_bet() <= 1 {
            // Nobody left to bet against, run out the board.
            self.deal_board(5 - self.board.len())?;
            self.stage = Stage::Showdown;
            return self.handle_showdown();
        }

        let (count, next) = match self.stage {
            Stage::PreFlop => (3, Stage::Flop),
            Stage::Flop => (1, Stage::Turn),
            Stage::Turn => (1, Stage::River),
            _ => {
                self.stage = Stage::Showdown;
                return self.handle_showdown();
            }
        };

        self.deal_board(count)?;
        self.stage = next;

        self.message = format!("{} dealt", self.stage);
        info!("{}: {}", self.stage, cards_string(&self.board));

        let first = self.next_to_act(self.dealer_index())?;
        self.current = Some(first);
        Ok(())
    }

    /// Pays the pot to the winners and ends the round.
    pub fn handle_showdown(&mut self) -> Result<(), EngineError> {
        if self.stage != Stage::Showdown {
            return Err(self.reject(None, InvalidAction::NotShowdown));
        }

        self.collect_bets();
        let pot = std::mem::take(&mut self.pot);
        self.current = None;
        self.payoffs.clear();
        self.winning_hand = None;

        let in_hand = self
            .players
            .iter()
            .enumerate()
            .filter(|(_, p)| p.in_hand())
            .map(|(idx, _)| idx)
            .collect::<Vec<_>>();

        match in_hand.as_slice() {
            [] => return Err(self.game_over(EngineError::Internal("no players at showdown"))),
            [winner] => {
                let player = &mut self.players[*winner];
                player.chips += pot;
                self.payoffs.push(HandPayoff {
                    player_id: player.id,
                    chips: pot,
                    cards: Vec::new(),
                });

                self.message = format!("{} won {pot}", player.name);
                info!("{} wins {pot} uncontested", player.name);
            }
            _ => {
                let res = showdown::resolve(&self.players, &self.board);
                if res.winners.is_empty() {
                    return Err(self.game_over(EngineError::Internal("no winners at showdown")));
                }

                for (idx, hand) in &res.hands {
                    let player = &mut self.players[*idx];
                    player.hand = Some(hand.clone());
                    player.is_revealed = true;
                }

                // Split the pot, the first winner in seat order gets the remainder.
                let share = pot / res.winners.len() as u32;
                let remainder = pot % res.winners.len() as u32;
                for (pos, idx) in res.winners.iter().enumerate() {
                    let chips = if pos == 0 { share + remainder } else { share };
                    let player = &mut self.players[*idx];
                    player.chips += chips;
                    self.payoffs.push(HandPayoff {
                        player_id: player.id,
                        chips,
                        cards: res
                            .hand(*idx)
                            .map(|h| h.cards().to_vec())
                            .unwrap_or_default(),
                    });

                    info!(
                        "{} wins {chips} with {}",
                        player.name,
                        player.hand.as_ref().map(|h| h.label()).unwrap_or_default()
                    );
                }

                let names = res
                    .winners
                    .iter()
                    .map(|idx| self.players[*idx].name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                self.winning_hand = res.best().cloned();
                self.message = match &self.winning_hand {
                    Some(hand) if res.winners.len() > 1 => {
                        format!("{names} split {pot} with {}", hand.label())
                    }
                    Some(hand) => format!("{names} won {pot} with {}", hand.label()),
                    None => format!("{names} won {pot}"),
                };
            }
        }

        self.stage = Stage::EndRound;
        Ok(())
    }

    /// Checks if the current betting stage is complete.
    ///
    /// A single player that can still bet is done only once their bet matches
    /// the highest bet, facing a larger all-in they still get to call or fold
    /// so that no uncalled chips are left in the pot.
    pub fn is_betting_complete(&self) -> bool {
        if self.count_in_hand() <= 1 {
            return true;
        }

        let mut eligible = self.players.iter().filter(|p| p.can_bet());
        match (eligible.next(), eligible.next()) {
            (None, _) => true,
            // Nobody left to bet against once the bet is matched.
            (Some(player), None) => player.bet >= self.highest_bet,
            _ => self
                .players
                .iter()
                .filter(|p| p.can_bet())
                .all(|p| p.has_acted && p.bet == self.highest_bet),
        }
    }

    /// Returns the action request for a player if it is the player turn.
    pub fn action_request(&self, player_id: PlayerId) -> Option<ActionRequest> {
        if !self.stage.is_betting() {
            return None;
        }

        let player = self.current_player().filter(|p| p.id == player_id)?;
        let to_call = self.highest_bet - player.bet;

        let mut actions = vec![PlayerAction::Fold];
        if to_call == Chips::ZERO {
            actions.push(PlayerAction::Check);
        } else {
            actions.push(PlayerAction::Call);
        }

        if player.chips > to_call {
            actions.push(PlayerAction::Raise);
        }

        Some(ActionRequest {
            player_id,
            actions,
            to_call,
            min_raise: self.min_raise,
            max_raise: player.chips - to_call,
            big_blind: self.config.big_blind,
        })
    }

    /// Returns a snapshot of the table for the viewer.
    pub fn view(&self, viewer: PlayerId) -> TableView {
        let dealer = self.dealer.filter(|d| *d < self.players.len());
        TableView {
            viewer,
            stage: self.stage,
            pot: self.pot,
            board: self.board.clone(),
            players: self
                .players
                .iter()
                .enumerate()
                .map(|(idx, p)| p.view(viewer, Some(idx) == dealer))
                .collect(),
            current: self.current_player().map(|p| p.id),
            dealer: self.dealer().map(|p| p.id),
            highest_bet: self.highest_bet,
            min_raise: self.min_raise,
            last_raiser: self.last_raiser().map(|p| p.id),
            message: self.message.clone(),
            payoffs: self.payoffs.clone(),
            winning_hand: self.winning_hand.clone(),
            action_request: self.action_request(viewer),
        }
    }

    /// The game configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The round stage.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// The pot, not including the bets of the current stage.
    pub fn pot(&self) -> Chips {
        self.pot
    }

    /// The board cards.
    pub fn board(&self) -> &[Card] {
        &self.board
    }

    /// The players in seat order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Returns a player by id.
    pub fn player(&self, player_id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    /// The player whose turn it is.
    pub fn current_player(&self) -> Option<&Player> {
        self.current.and_then(|idx| self.players.get(idx))
    }

    /// The player with the button.
    pub fn dealer(&self) -> Option<&Player> {
        self.dealer.and_then(|idx| self.players.get(idx))
    }

    /// The highest bet in the current stage.
    pub fn highest_bet(&self) -> Chips {
        self.highest_bet
    }

    /// The minimum raise increment.
    pub fn min_raise(&self) -> Chips {
        self.min_raise
    }

    /// The last player that raised in the current stage.
    pub fn last_raiser(&self) -> Option<&Player> {
        self.last_raiser.and_then(|idx| self.players.get(idx))
    }

    /// The last status message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The payoffs of the last round.
    pub fn payoffs(&self) -> &[HandPayoff] {
        &self.payoffs
    }

    /// The best hand at the last showdown.
    pub fn winning_hand(&self) -> Option<&RankedHand> {
        self.winning_hand.as_ref()
    }

    /// All the chips at the table: stacks, bets and pot.
    pub fn total_chips(&self) -> Chips {
        self.pot + self.players.iter().map(|p| p.chips + p.bet).sum::<Chips>()
    }

    fn validate_turn(&self, player_id: PlayerId) -> Result<usize, EngineError> {
        if !self.stage.is_betting() {
            return Err(self.reject(Some(player_id), InvalidAction::NotBetting));
        }

        match self.current {
            Some(idx) if self.players[idx].id == player_id => Ok(idx),
            _ => Err(self.reject(Some(player_id), InvalidAction::NotYourTurn)),
        }
    }

    fn reject(&self, player_id: Option<PlayerId>, reason: InvalidAction) -> EngineError {
        match player_id.and_then(|id| self.player(id)) {
            Some(player) => warn!("Rejected action from {}: {reason}", player.name),
            None => warn!("Rejected action: {reason}"),
        }

        EngineError::InvalidAction(reason)
    }

    fn game_over(&mut self, err: EngineError) -> EngineError {
        error!("Game over: {err}");
        self.stage = Stage::GameOver;
        self.current = None;
        self.message = format!("Game over: {err}");
        err
    }

    fn act(&mut self, idx: usize, action: PlayerAction) {
        let player = &mut self.players[idx];
        player.action = action;
        player.has_acted = true;
        self.log_action(idx);
    }

    fn log_action(&mut self, idx: usize) {
        let player = &self.players[idx];
        let all_in = if player.is_all_in { " all-in" } else { "" };
        self.message = match player.action {
            PlayerAction::Call | PlayerAction::Raise => {
                let action = player.action.label().to_lowercase();
                format!("{} {action} {}{all_in}", player.name, player.bet)
            }
            action => format!("{} {}", player.name, action.label().to_lowercase()),
        };

        debug!("{}: {}", self.stage, self.message);
    }

    fn register_raise(&mut self, idx: usize) {
        let bet = self.players[idx].bet;
        let raise = bet - self.highest_bet;
        if raise >= self.min_raise {
            self.min_raise = raise;
        }

        self.highest_bet = bet;
        self.last_raiser = Some(idx);

        // Everybody else has to respond to the raise.
        for (pos, player) in self.players.iter_mut().enumerate() {
            if pos != idx && player.can_bet() {
                player.has_acted = false;
            }
        }

        self.act(idx, PlayerAction::Raise);
    }

    fn deal_card(&mut self) -> Result<Card, EngineError> {
        match self.deck.deal() {
            Some(card) => Ok(card),
            None => Err(self.game_over(EngineError::DeckExhausted)),
        }
    }

    fn deal_board(&mut self, count: usize) -> Result<(), EngineError> {
        for _ in 0..count {
            let card = self.deal_card()?;
            self.board.push(card);
        }

        Ok(())
    }

    fn deal_hole_cards(&mut self) -> Result<(), EngineError> {
        // Two passes of one card starting left of the button.
        let n = self.players.len();
        let dealer = self.dealer_index();

        let mut first = Vec::with_capacity(n);
        for _ in 0..n {
            first.push(self.deal_card()?);
        }

        for (offset, c1) in first.into_iter().enumerate() {
            let c2 = self.deal_card()?;
            let idx = (dealer + 1 + offset) % n;
            self.players[idx].hole_cards = PlayerCards::Cards(c1, c2);
        }

        Ok(())
    }

    fn post_blinds(&mut self) {
        let (sb, bb) = self.blind_seats();
        let small_blind = self.config.small_blind;
        let big_blind = self.config.big_blind;

        self.players[sb].post_blind(PlayerAction::SmallBlind, small_blind);
        self.players[bb].post_blind(PlayerAction::BigBlind, big_blind);

        self.highest_bet = self.players[sb].bet.max(self.players[bb].bet);
        self.last_raiser = Some(bb);

        debug!(
            "Blinds {} {}, {} {}",
            self.players[sb].name, self.players[sb].bet, self.players[bb].name, self.players[bb].bet
        );
    }

    /// Heads-up the button posts the small blind.
    fn blind_seats(&self) -> (usize, usize) {
        let n = self.players.len();
        let dealer = self.dealer_index();
        if n == 2 {
            (dealer, (dealer + 1) % n)
        } else {
            ((dealer + 1) % n, (dealer + 2) % n)
        }
    }

    fn first_to_act_preflop(&mut self) -> Result<usize, EngineError> {
        let n = self.players.len();
        let (sb, bb) = self.blind_seats();
        if n == 2 && self.players[sb].needs_to_act(self.highest_bet) {
            return Ok(sb);
        }

        // Scan starts after the big blind.
        self.next_to_act(bb)
    }

    /// Returns the next player after `from` that has to act.
    fn next_to_act(&mut self, from: usize) -> Result<usize, EngineError> {
        let n = self.players.len();
        let mut idx = from;
        for _ in 0..2 * n {
            idx = (idx + 1) % n;
            if self.players[idx].needs_to_act(self.highest_bet) {
                return Ok(idx);
            }
        }

        Err(self.game_over(EngineError::Internal("no player can act")))
    }

    fn collect_bets(&mut self) {
        for player in &mut self.players {
            self.pot += player.bet;
            player.start_stage();
        }
    }

    fn dealer_index(&self) -> usize {
        self.dealer.unwrap_or(0)
    }

    fn count_in_hand(&self) -> usize {
        self.players.iter().filter(|p| p.in_hand()).count()
    }

    fn count_can_bet(&self) -> usize {
        self.players.iter().filter(|p| p.can_bet()).count()
    }
}

fn cards_string(cards: &[Card]) -> String {
    cards
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablestakes_core::poker::HandRank;

    const HUMAN: PlayerId = Game::HUMAN_ID;
    const BOT1: PlayerId = PlayerId::new(1);
    const BOT2: PlayerId = PlayerId::new(2);

    fn new_game(bots: usize) -> Game {
        let config = Config {
            bots,
            ..Config::default()
        };

        let mut game = Game::with_rng(config, StdRng::seed_from_u64(13));
        game.initialize_round(Chips::new(1_000)).unwrap();
        game
    }

    /// Starts a round with the button on the given seat.
    fn start_with_button(game: &mut Game, seat: usize) {
        let n = game.players.len();
        game.dealer = Some((seat + n - 1) % n);
        game.start_round().unwrap();
        assert_eq!(game.dealer, Some(seat));
    }

    fn cards(s: &str) -> Vec<Card> {
        s.split_whitespace().filter_map(Card::parse).collect()
    }

    fn set_hole_cards(game: &mut Game, seat: usize, hole: &str) {
        let c = cards(hole);
        game.players[seat].hole_cards = PlayerCards::Cards(c[0], c[1]);
    }

    /// Replaces the deck so that the board is dealt in the given order.
    fn set_board(game: &mut Game, board: &str) {
        game.deck = cards(board).into_iter().rev().collect();
    }

    fn current_id(game: &Game) -> PlayerId {
        game.current_player().map(|p| p.id).unwrap()
    }

    #[test]
    fn initialize_seats_players() {
        let mut game = Game::with_rng(Config::default(), StdRng::seed_from_u64(1));
        let players = game.initialize_round(Chips::new(500)).unwrap();
        assert_eq!(players.len(), 2);
        assert_eq!(players[0].name, "You");
        assert_eq!(players[0].chips, Chips::new(500));
        assert!(!players[0].is_bot);
        assert_eq!(players[1].name, "Bot Bob");
        assert_eq!(players[1].chips, Chips::new(1_000));
        assert!(players[1].is_bot);

        assert_eq!(game.stage(), Stage::EndRound);
        assert!(game.dealer().is_some());
    }

    #[test]
    fn invalid_buy_in() {
        let mut game = Game::with_rng(Config::default(), StdRng::seed_from_u64(1));
        let err = game.initialize_round(Chips::new(39)).unwrap_err();
        assert_eq!(err, EngineError::InvalidBuyIn { min: Chips::new(40) });
        assert!(game.players().is_empty());

        assert!(game.initialize_round(Chips::new(40)).is_ok());
    }

    #[test]
    fn invalid_blinds() {
        let config = Config {
            small_blind: Chips::new(50),
            big_blind: Chips::new(20),
            ..Config::default()
        };

        let mut game = Game::with_rng(config, StdRng::seed_from_u64(1));
        let err = game.initialize_round(Chips::new(1_000)).unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidBlinds {
                small: Chips::new(50),
                big: Chips::new(20)
            }
        );
        assert!(game.players().is_empty());
    }

    #[test]
    fn start_round_deals_cards() {
        let mut game = new_game(2);
        game.start_round().unwrap();

        assert_eq!(game.stage(), Stage::PreFlop);
        assert!(game.board().is_empty());
        assert_eq!(game.deck.count(), Deck::SIZE - 6);
        assert!(game.players().iter().all(|p| p.hole_cards.has_cards()));

        // Blinds stay in front of the players until the stage ends.
        assert_eq!(game.pot(), Chips::ZERO);
        assert_eq!(game.total_chips(), Chips::new(3_000));
    }

    #[test]
    fn start_round_only_at_end_of_round() {
        let mut game = new_game(1);
        game.start_round().unwrap();
        let err = game.start_round().unwrap_err();
        assert_eq!(err, InvalidAction::RoundInProgress.into());
        assert_eq!(game.stage(), Stage::PreFlop);
    }

    #[test]
    fn heads_up_blinds_and_order() {
        let mut game = new_game(1);
        start_with_button(&mut game, 0);

        // The button posts the small blind and acts first.
        assert_eq!(game.players[0].bet, Chips::new(10));
        assert_eq!(game.players[0].action, PlayerAction::SmallBlind);
        assert_eq!(game.players[1].bet, Chips::new(20));
        assert_eq!(game.players[1].action, PlayerAction::BigBlind);
        assert_eq!(current_id(&game), HUMAN);
        assert_eq!(game.last_raiser().map(|p| p.id), Some(BOT1));

        // The big blind has the option after the call.
        game.call(HUMAN).unwrap();
        assert_eq!(game.stage(), Stage::PreFlop);
        assert_eq!(current_id(&game), BOT1);

        game.check(BOT1).unwrap();
        assert_eq!(game.stage(), Stage::Flop);
        assert_eq!(game.board().len(), 3);
        assert_eq!(game.pot(), Chips::new(40));

        // After the flop the player after the button acts first.
        assert_eq!(current_id(&game), BOT1);
    }

    #[test]
    fn three_players_order() {
        let mut game = new_game(2);
        start_with_button(&mut game, 0);

        assert_eq!(game.players[1].bet, Chips::new(10));
        assert_eq!(game.players[2].bet, Chips::new(20));

        // Action starts after the big blind, that is the button.
        assert_eq!(current_id(&game), HUMAN);
        game.call(HUMAN).unwrap();
        assert_eq!(current_id(&game), BOT1);
        game.call(BOT1).unwrap();
        assert_eq!(current_id(&game), BOT2);
        game.check(BOT2).unwrap();

        assert_eq!(game.stage(), Stage::Flop);
        assert_eq!(game.pot(), Chips::new(60));
        assert_eq!(current_id(&game), BOT1);

        game.check(BOT1).unwrap();
        game.check(BOT2).unwrap();
        game.check(HUMAN).unwrap();
        assert_eq!(game.stage(), Stage::Turn);
        assert_eq!(game.board().len(), 4);
    }

    #[test]
    fn big_blind_can_raise_its_option() {
        let mut game = new_game(1);
        start_with_button(&mut game, 0);
        game.call(HUMAN).unwrap();

        let req = game.action_request(BOT1).unwrap();
        assert!(req.can_check());
        assert!(req.can_raise());
        assert!(!req.can_call());

        game.raise(BOT1, Chips::new(40)).unwrap();
        assert_eq!(game.stage(), Stage::PreFlop);
        assert_eq!(game.highest_bet(), Chips::new(60));
        assert_eq!(game.min_raise(), Chips::new(40));
        assert_eq!(current_id(&game), HUMAN);

        let req = game.action_request(HUMAN).unwrap();
        assert_eq!(req.to_call, Chips::new(40));
        assert_eq!(req.min_raise, Chips::new(40));
        assert_eq!(req.max_raise, Chips::new(940));
    }

    #[test]
    fn actions_out_of_turn_are_rejected() {
        let mut game = new_game(1);
        start_with_button(&mut game, 0);

        let err = game.call(BOT1).unwrap_err();
        assert_eq!(err, InvalidAction::NotYourTurn.into());
        assert_eq!(game.players[1].bet, Chips::new(20));
        assert_eq!(current_id(&game), HUMAN);

        // Nothing to do before a round starts.
        let mut game = new_game(1);
        let err = game.check(HUMAN).unwrap_err();
        assert_eq!(err, InvalidAction::NotBetting.into());
    }

    #[test]
    fn cannot_check_facing_a_bet() {
        let mut game = new_game(1);
        start_with_button(&mut game, 0);
        let err = game.check(HUMAN).unwrap_err();
        assert_eq!(err, InvalidAction::CannotCheck.into());
        assert_eq!(game.players[0].bet, Chips::new(10));
        assert!(!game.players[0].has_acted);
    }

    #[test]
    fn raise_below_minimum_is_rejected() {
        let mut game = new_game(1);
        start_with_button(&mut game, 0);

        let err = game.raise(HUMAN, Chips::new(19)).unwrap_err();
        assert_eq!(
            err,
            InvalidAction::RaiseTooSmall {
                min_raise: Chips::new(20)
            }
            .into()
        );

        let err = game.raise(HUMAN, Chips::ZERO).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidAction(InvalidAction::RaiseTooSmall { .. })
        ));

        // Raise of 20 over the 10 call.
        game.raise(HUMAN, Chips::new(20)).unwrap();
        assert_eq!(game.players[0].bet, Chips::new(40));
        assert_eq!(game.highest_bet(), Chips::new(40));
        assert_eq!(game.last_raiser().map(|p| p.id), Some(HUMAN));
    }

    #[test]
    fn unknown_action_is_rejected() {
        let mut game = new_game(1);
        start_with_button(&mut game, 0);
        let err = game
            .apply(HUMAN, PlayerAction::BigBlind, Chips::ZERO)
            .unwrap_err();
        assert_eq!(err, InvalidAction::UnknownAction.into());
    }

    #[test]
    fn call_with_nothing_to_call_is_a_check() {
        let mut game = new_game(1);
        start_with_button(&mut game, 0);
        game.call(HUMAN).unwrap();
        game.call(BOT1).unwrap();
        assert_eq!(game.stage(), Stage::Flop);
        assert_eq!(game.pot(), Chips::new(40));

        game.call(BOT1).unwrap();
        assert_eq!(game.stage(), Stage::Flop);
        assert_eq!(game.players[1].action, PlayerAction::Check);
        assert_eq!(game.players[1].bet, Chips::ZERO);
        assert_eq!(current_id(&game), HUMAN);
    }

    #[test]
    fn fold_ends_the_round() {
        let mut game = new_game(1);
        start_with_button(&mut game, 0);
        game.fold(HUMAN).unwrap();

        assert_eq!(game.stage(), Stage::EndRound);
        assert_eq!(game.players[0].chips, Chips::new(990));
        assert_eq!(game.players[1].chips, Chips::new(1_010));
        assert_eq!(game.pot(), Chips::ZERO);
        assert_eq!(
            game.payoffs(),
            &[HandPayoff {
                player_id: BOT1,
                chips: Chips::new(30),
                cards: vec![],
            }]
        );

        // Cards are not shown when nobody called.
        assert!(!game.players[1].is_revealed);
        assert!(game.winning_hand().is_none());
    }

    #[test]
    fn showdown_pays_best_hand() {
        let mut game = new_game(1);
        start_with_button(&mut game, 0);
        set_hole_cards(&mut game, 0, "AS AD");
        set_hole_cards(&mut game, 1, "KC QD");
        set_board(&mut game, "2H 7D 9C JS 3S");

        game.call(HUMAN).unwrap();
        game.check(BOT1).unwrap();
        for _ in 0..3 {
            game.check(BOT1).unwrap();
            game.check(HUMAN).unwrap();
        }

        assert_eq!(game.stage(), Stage::EndRound);
        assert_eq!(game.players[0].chips, Chips::new(1_020));
        assert_eq!(game.players[1].chips, Chips::new(980));
        assert_eq!(game.winning_hand().map(|h| h.rank()), Some(HandRank::OnePair));
        assert_eq!(game.message(), "You won 40 with Pair of Aces");

        // Hands are revealed to everybody.
        let view = game.view(BOT1);
        assert_eq!(view.players[0].cards, game.players[0].hole_cards);
        assert!(view.players[1].hand.is_some());
        assert_eq!(view.payoffs[0].cards.len(), 5);
    }

    #[test]
    fn split_pot_remainder_goes_to_first_winner() {
        let mut game = new_game(1);
        start_with_button(&mut game, 0);
        set_hole_cards(&mut game, 0, "2C 3D");
        set_hole_cards(&mut game, 1, "4C 5D");
        set_board(&mut game, "TS JS QS KS AS");

        game.call(HUMAN).unwrap();
        game.check(BOT1).unwrap();

        // Odd pot at showdown.
        game.pot = Chips::new(101);

        for _ in 0..3 {
            game.check(BOT1).unwrap();
            game.check(HUMAN).unwrap();
        }

        assert_eq!(game.stage(), Stage::EndRound);
        let payoffs = game.payoffs();
        assert_eq!(payoffs.len(), 2);
        assert_eq!(payoffs[0].player_id, HUMAN);
        assert_eq!(payoffs[0].chips, Chips::new(51));
        assert_eq!(payoffs[1].player_id, BOT1);
        assert_eq!(payoffs[1].chips, Chips::new(50));
        assert!(game.message().contains("split 101"));
    }

    #[test]
    fn all_in_runs_out_the_board() {
        let mut game = new_game(1);
        start_with_button(&mut game, 0);

        game.raise(HUMAN, Chips::new(5_000)).unwrap();
        assert!(game.players[0].is_all_in);
        assert_eq!(game.players[0].bet, Chips::new(1_000));
        assert_eq!(game.highest_bet(), Chips::new(1_000));
        assert_eq!(current_id(&game), BOT1);

        game.call(BOT1).unwrap();
        assert_eq!(game.stage(), Stage::EndRound);
        assert_eq!(game.board().len(), 5);
        assert_eq!(game.total_chips(), Chips::new(2_000));

        let paid = game.payoffs().iter().map(|p| p.chips).sum::<Chips>();
        assert_eq!(paid, Chips::new(2_000));
    }

    #[test]
    fn huge_raise_is_all_in() {
        let mut game = new_game(1);
        start_with_button(&mut game, 0);

        game.raise(HUMAN, Chips::new(u32::MAX)).unwrap();
        assert!(game.players[0].is_all_in);
        assert_eq!(game.players[0].chips, Chips::ZERO);
        assert_eq!(game.players[0].bet, Chips::new(1_000));
        assert_eq!(game.highest_bet(), Chips::new(1_000));
        assert_eq!(game.last_raiser().map(|p| p.id), Some(HUMAN));
        assert_eq!(current_id(&game), BOT1);
        assert_eq!(game.total_chips(), Chips::new(2_000));
    }

    #[test]
    fn short_stack_wins_all_in_pot() {
        let mut game = new_game(2);
        game.players[0].chips = Chips::new(100);
        start_with_button(&mut game, 0);
        set_hole_cards(&mut game, 0, "AS AD");
        set_hole_cards(&mut game, 1, "KC QD");
        set_hole_cards(&mut game, 2, "7C 2D");
        set_board(&mut game, "AH AC 9C JS 3S");

        game.raise(HUMAN, Chips::new(1_000)).unwrap();
        assert_eq!(game.players[0].bet, Chips::new(100));
        game.raise(BOT1, Chips::new(1_000)).unwrap();
        assert_eq!(game.players[1].bet, Chips::new(1_000));
        game.call(BOT2).unwrap();

        // There are no side pots, the winner takes everything.
        assert_eq!(game.stage(), Stage::EndRound);
        assert_eq!(game.board().len(), 5);
        assert_eq!(game.players[0].chips, Chips::new(2_100));
        assert_eq!(game.players[1].chips, Chips::ZERO);
        assert_eq!(game.players[2].chips, Chips::ZERO);
        assert_eq!(game.payoffs().len(), 1);
        assert_eq!(game.payoffs()[0].chips, Chips::new(2_100));
    }

    #[test]
    fn short_all_in_is_a_call() {
        let mut game = new_game(2);
        game.players[1].chips = Chips::new(50);
        start_with_button(&mut game, 0);

        game.raise(HUMAN, Chips::new(80)).unwrap();
        assert_eq!(game.highest_bet(), Chips::new(100));

        // Small blind goes all-in for less than the raise.
        game.raise(BOT1, Chips::new(20)).unwrap();
        assert!(game.players[1].is_all_in);
        assert_eq!(game.players[1].action, PlayerAction::Call);
        assert_eq!(game.highest_bet(), Chips::new(100));
        assert_eq!(game.last_raiser().map(|p| p.id), Some(HUMAN));
        assert_eq!(current_id(&game), BOT2);
    }

    #[test]
    fn lone_bettor_responds_to_all_in_raise() {
        let mut game = new_game(1);
        game.players[1].chips = Chips::new(300);
        start_with_button(&mut game, 0);

        game.call(HUMAN).unwrap();
        game.raise(BOT1, Chips::new(1_000)).unwrap();
        assert!(game.players[1].is_all_in);

        // Only one player can bet but there is a bet to match.
        assert!(!game.is_betting_complete());
        assert_eq!(current_id(&game), HUMAN);
        let req = game.action_request(HUMAN).unwrap();
        assert_eq!(req.to_call, Chips::new(280));

        game.call(HUMAN).unwrap();
        assert_eq!(game.stage(), Stage::EndRound);
        assert_eq!(game.total_chips(), Chips::new(1_300));
    }

    #[test]
    fn blinds_all_in_run_out_the_board() {
        let mut game = new_game(1);
        game.players[0].chips = Chips::new(10);
        game.players[1].chips = Chips::new(15);
        start_with_button(&mut game, 0);

        assert_eq!(game.stage(), Stage::EndRound);
        assert_eq!(game.board().len(), 5);
        assert_eq!(game.total_chips(), Chips::new(25));
    }

    #[test]
    fn busted_players_are_removed() {
        let mut game = new_game(2);
        game.players[1].chips = Chips::ZERO;
        game.dealer = Some(0);
        game.start_round().unwrap();

        assert_eq!(game.players().len(), 2);
        assert!(game.player(BOT1).is_none());

        // The button skipped the busted player.
        assert_eq!(game.dealer().map(|p| p.id), Some(BOT2));
    }

    #[test]
    fn insufficient_players() {
        let mut game = new_game(1);
        game.players[1].chips = Chips::ZERO;

        let err = game.start_round().unwrap_err();
        assert_eq!(err, EngineError::InsufficientPlayers);
        assert!(err.is_fatal());
        assert_eq!(game.stage(), Stage::GameOver);

        let err = game.start_round().unwrap_err();
        assert_eq!(err, InvalidAction::RoundInProgress.into());
    }

    #[test]
    fn deck_exhaustion_ends_the_game() {
        let mut game = new_game(1);
        start_with_button(&mut game, 0);
        game.deck = Deck::from_iter(cards("2H 3H"));

        game.call(HUMAN).unwrap();
        let err = game.check(BOT1).unwrap_err();
        assert_eq!(err, EngineError::DeckExhausted);
        assert_eq!(game.stage(), Stage::GameOver);
        assert!(game.current_player().is_none());
    }

    #[test]
    fn showdown_only_at_showdown() {
        let mut game = new_game(1);
        let err = game.handle_showdown().unwrap_err();
        assert_eq!(err, InvalidAction::NotShowdown.into());

        let err = game.proceed_to_next_stage().unwrap_err();
        assert_eq!(err, InvalidAction::NotBetting.into());
    }

    #[test]
    fn view_hides_other_players_cards() {
        let mut game = new_game(1);
        start_with_button(&mut game, 0);

        let view = game.view(HUMAN);
        assert!(matches!(view.players[0].cards, PlayerCards::Cards(..)));
        assert_eq!(view.players[1].cards, PlayerCards::Covered);
        assert_eq!(view.dealer, Some(HUMAN));
        assert!(view.players[0].has_button);
        assert!(view.is_local_turn());
        assert_eq!(view.total_pot(), Chips::new(30));

        // The bot view has no action request while the human acts.
        let view = game.view(BOT1);
        assert!(view.action_request.is_none());
        assert_eq!(view.players[0].cards, PlayerCards::Covered);
    }

    #[test]
    fn dealer_rotates() {
        let mut game = new_game(2);
        start_with_button(&mut game, 0);
        game.fold(HUMAN).unwrap();
        game.fold(BOT1).unwrap();
        assert_eq!(game.stage(), Stage::EndRound);

        game.start_round().unwrap();
        assert_eq!(game.dealer().map(|p| p.id), Some(BOT1));
    }

    #[test]
    fn chips_are_conserved() {
        use tablestakes_bot::{RandomCaller, Strategy};

        for seed in 0..20 {
            let config = Config {
                bots: 3,
                ..Config::default()
            };

            let mut game = Game::with_rng(config, StdRng::seed_from_u64(seed));
            game.initialize_round(Chips::new(1_000)).unwrap();
            let total = game.total_chips();

            let mut strategies = (0..4)
                .map(|idx| RandomCaller::new(seed * 10 + idx))
                .collect::<Vec<_>>();

            for _ in 0..30 {
                if game.start_round().is_err() {
                    break;
                }

                while game.stage().is_betting() {
                    let player = game.current_player().unwrap();
                    let id = player.id;
                    let view = game.view(id);
                    let req = view.action_request.clone().unwrap();
                    let strategy = &mut strategies[id.value() as usize];
                    let (action, amount) = strategy.execute(&req, &view);
                    if game.apply(id, action, amount).is_err() {
                        game.fold(id).unwrap();
                    }

                    assert_eq!(game.total_chips(), total);
                    assert!(game.stage() != Stage::GameOver);
                }

                assert_eq!(game.stage(), Stage::EndRound);
                assert_eq!(game.pot(), Chips::ZERO);
                assert_eq!(game.total_chips(), total);
            }
        }
    }
}
