// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Table state types.
use log::{info, warn};
use rand::{SeedableRng, rngs::StdRng};
use std::{cmp::Reverse, mem, time::Instant};

use holdem_core::{
    message::{HandPayoff, Message, PlayerAction, PlayerStatus, Stage, TableSnapshot},
    poker::{Card, Chips, Deck, HandValue, PlayerCards, PlayerId, TableId},
};

use crate::error::{InvalidAction, TableError};

use super::{
    TableConfig,
    betting::{ActionOutcome, BettingRound},
    player::{Player, PlayersState},
};

/// A message the table task must deliver to the players sessions.
#[derive(Debug, Clone)]
pub enum Outgoing {
    /// Send to all players at the table.
    Broadcast(Message),
    /// Send only to the given player.
    Send(PlayerId, Message),
}

/// Internal table state.
///
/// The state doesn't do any I/O, all messages for the players are queued and
/// delivered by the table task after each operation.
#[derive(Debug)]
pub struct State {
    table_id: TableId,
    config: TableConfig,
    players: PlayersState,
    deck: Deck,
    board: Vec<Card>,
    pot: Chips,
    stage: Stage,
    betting: BettingRound,
    hand_in_progress: bool,
    winners: Vec<PlayerId>,
    hand_ended_at: Option<Instant>,
    turn_timer: Option<(PlayerId, Instant)>,
    outgoing: Vec<Outgoing>,
    rng: StdRng,
}

impl State {
    /// Create a new state.
    pub fn new(table_id: TableId, config: TableConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self {
            table_id,
            config,
            players: PlayersState::default(),
            deck: Deck::default(),
            board: Vec::default(),
            pot: Chips::ZERO,
            stage: Stage::Preflop,
            betting: BettingRound::new(),
            hand_in_progress: false,
            winners: Vec::default(),
            hand_ended_at: None,
            turn_timer: None,
            outgoing: Vec::default(),
            rng,
        }
    }

    /// The table id.
    pub fn table_id(&self) -> TableId {
        self.table_id
    }

    /// Checks if a hand is being played.
    pub fn hand_in_progress(&self) -> bool {
        self.hand_in_progress
    }

    /// Takes the messages queued by the last operations.
    pub fn drain_outgoing(&mut self) -> Vec<Outgoing> {
        mem::take(&mut self.outgoing)
    }

    /// A player joins the table.
    pub fn join(&mut self, player_id: &PlayerId, nickname: &str) -> Result<(), TableError> {
        if self.players.position(player_id).is_some() {
            return Err(TableError::AlreadyJoined(player_id.clone()));
        }

        if self.players.count() >= self.config.seats {
            return Err(TableError::TableFull);
        }

        let mut player = Player::new(
            player_id.clone(),
            nickname.to_string(),
            self.config.start_chips,
        );

        // Players who join during a hand wait for the next one.
        if self.hand_in_progress {
            player.status = PlayerStatus::Folded;
        }

        self.send(
            player_id,
            Message::TableJoined {
                table_id: self.table_id,
                player_id: player_id.clone(),
                chips: player.chips,
                seats: self.config.seats.min(u8::MAX as usize) as u8,
            },
        );

        // Tell the new player who is at the table and the players at the
        // table who joined.
        let joined = Message::PlayerJoined {
            player_id: player_id.clone(),
            nickname: nickname.to_string(),
            chips: player.chips,
        };

        let mut notify = Vec::with_capacity(self.players.count() * 2);
        for p in self.players.iter() {
            notify.push(Outgoing::Send(
                player_id.clone(),
                Message::PlayerJoined {
                    player_id: p.player_id.clone(),
                    nickname: p.nickname.clone(),
                    chips: p.chips,
                },
            ));
            notify.push(Outgoing::Send(p.player_id.clone(), joined.clone()));
        }
        self.outgoing.extend(notify);

        self.players.join(player);

        info!("Player {player_id} joined table {}", self.table_id);

        self.broadcast_game_update();
        Ok(())
    }

    /// Starts a new hand.
    pub fn start_hand(&mut self) -> Result<(), TableError> {
        if self.hand_in_progress {
            return Err(TableError::HandInProgress);
        }

        if self.players.count_with_chips() < 2 {
            return Err(TableError::NotEnoughPlayers);
        }

        self.deck = Deck::new_and_shuffled(&mut self.rng);
        self.board.clear();
        self.pot = Chips::ZERO;
        self.winners.clear();
        self.stage = Stage::Preflop;
        self.betting = BettingRound::new();
        self.hand_in_progress = true;
        self.hand_ended_at = None;

        self.players.start_hand();

        self.broadcast(Message::StartHand);

        let mut deals = Vec::new();
        for player in self.players.iter_mut().filter(|p| p.is_active()) {
            let (c1, c2) = (self.deck.deal()?, self.deck.deal()?);
            player.hole_cards = PlayerCards::Cards(c1, c2);
            player.public_cards = PlayerCards::Covered;
            deals.push(Outgoing::Send(
                player.player_id.clone(),
                Message::DealCards(c1, c2),
            ));
        }
        self.outgoing.extend(deals);

        self.players.start_round();

        info!(
            "Table {} started hand with {} players",
            self.table_id,
            self.players.count_active()
        );

        self.broadcast_game_update();
        Ok(())
    }

    /// A player action.
    pub fn action(
        &mut self,
        player_id: &PlayerId,
        action: PlayerAction,
        amount: Chips,
    ) -> Result<(), TableError> {
        if !self.hand_in_progress {
            return Err(InvalidAction::NoHand.into());
        }

        let outcome =
            self.betting
                .apply(&mut self.players, &mut self.pot, player_id, action, amount)?;

        // The next turn gets a full timeout even if it goes to the same player.
        self.turn_timer = None;
        self.action_update(outcome)
    }

    /// A player left the table.
    ///
    /// During a hand the player is folded and removed when the hand ends.
    /// Returns false if the player was not at the table.
    pub fn leave(&mut self, player_id: &PlayerId) -> Result<bool, TableError> {
        let Some(pos) = self.players.position(player_id) else {
            return Ok(false);
        };

        if !self.hand_in_progress {
            self.players.remove(pos);
            info!("Player {player_id} left table {}", self.table_id);
            self.broadcast(Message::PlayerLeft(player_id.clone()));
            self.broadcast_game_update();
            return Ok(true);
        }

        if let Some(player) = self.players.get_mut(pos) {
            player.has_left = true;
        }

        info!(
            "Player {player_id} left table {} during a hand",
            self.table_id
        );

        let outcome = self.betting.fold(&mut self.players, pos);
        self.action_update(outcome)?;
        Ok(true)
    }

    /// Periodic update that starts new hands and folds players who don't act
    /// within the action timeout.
    pub fn tick(&mut self, now: Instant) -> Result<(), TableError> {
        if !self.hand_in_progress {
            let ready = self
                .hand_ended_at
                .is_none_or(|t| now.saturating_duration_since(t) >= self.config.new_hand_delay);
            if ready && self.players.count_with_chips() >= 2 {
                self.start_hand()?;
            }

            return Ok(());
        }

        let Some(timeout) = self.config.action_timeout else {
            return Ok(());
        };

        let expired = match &self.turn_timer {
            Some((player_id, started)) if now.saturating_duration_since(*started) >= timeout => {
                Some(player_id.clone())
            }
            _ => None,
        };

        if let Some(player_id) = expired {
            if let Some(pos) = self.players.position(&player_id) {
                warn!(
                    "Player {player_id} action timeout on table {}",
                    self.table_id
                );

                let outcome = self.betting.fold(&mut self.players, pos);
                self.action_update(outcome)?;
            }
        }

        Ok(())
    }

    /// The table public state.
    pub fn snapshot(&self) -> TableSnapshot {
        let turn = if self.hand_in_progress {
            self.players.active_player_id().cloned()
        } else {
            None
        };

        TableSnapshot {
            table_id: self.table_id,
            hand_in_progress: self.hand_in_progress,
            stage: self.stage,
            pot: self.pot,
            board: self.board.clone(),
            current_bet: self.betting.current_bet(),
            turn,
            winners: self.winners.clone(),
            players: self.players.iter().map(Player::update).collect(),
        }
    }

    fn action_update(&mut self, outcome: ActionOutcome) -> Result<(), TableError> {
        match outcome {
            ActionOutcome::Continue => {
                self.broadcast_game_update();
                Ok(())
            }
            ActionOutcome::Settled => self.next_round(),
            ActionOutcome::HandOver => {
                self.pay_survivor();
                Ok(())
            }
        }
    }

    /// Deals the next streets until there is a round that needs betting or
    /// the hand goes to showdown.
    fn next_round(&mut self) -> Result<(), TableError> {
        loop {
            if matches!(self.stage, Stage::River | Stage::Showdown) {
                self.showdown();
                return Ok(());
            }

            self.stage = self.stage.next();
            let count = self.stage.board_size() - self.board.len();
            self.board.extend(self.deck.draw(count)?);

            self.betting = BettingRound::new();
            self.players.start_round();

            self.turn_timer = None;
            self.broadcast_game_update();

            if !self.betting.is_settled(&self.players) {
                return Ok(());
            }
        }
    }

    fn showdown(&mut self) {
        self.stage = Stage::Showdown;

        let mut hands = Vec::new();
        for (pos, player) in self.players.iter_mut().enumerate() {
            if player.is_active() && matches!(player.hole_cards, PlayerCards::Cards(..)) {
                player.public_cards = player.hole_cards;

                let mut cards = player.hole_cards.to_vec();
                cards.extend_from_slice(&self.board);
                hands.push((pos, HandValue::eval(&cards)));
            }
        }

        let Some(best) = hands.iter().map(|(_, hv)| hv).max().cloned() else {
            return self.end_hand(Vec::new(), false);
        };

        // Odd chips go to the tied players in seat order from the first to act.
        let n = self.players.count();
        let first = self.players.first_to_act();
        let mut tied = hands
            .into_iter()
            .filter(|(_, hv)| *hv == best)
            .collect::<Vec<_>>();
        tied.sort_by_key(|(pos, _)| (pos + n - first) % n);

        let share = self.pot / tied.len() as u32;
        let mut odd = (self.pot % tied.len() as u32).amount();

        let mut payoffs = Vec::with_capacity(tied.len());
        for (pos, hv) in &tied {
            let mut chips = share;
            if odd > 0 {
                chips += Chips::new(1);
                odd -= 1;
            }

            if let Some(player) = self.players.get_mut(*pos) {
                player.chips += chips;

                let mut cards = hv.hand().to_vec();
                cards.sort_by_key(|c| Reverse(c.value()));

                payoffs.push(HandPayoff {
                    player_id: player.player_id.clone(),
                    chips,
                    cards,
                    rank: Some(hv.rank()),
                });
            }
        }

        let tie = payoffs.len() > 1;
        if tie {
            info!(
                "Table {} split pot {} between {} players with {}",
                self.table_id,
                self.pot,
                payoffs.len(),
                best
            );
        }

        self.end_hand(payoffs, tie);
    }

    /// Pays the pot to the only player left in the hand.
    fn pay_survivor(&mut self) {
        let pot = self.pot;
        let payoffs = self
            .players
            .iter_mut()
            .filter(|p| p.is_active())
            .map(|p| {
                p.chips += pot;
                HandPayoff {
                    player_id: p.player_id.clone(),
                    chips: pot,
                    cards: Vec::new(),
                    rank: None,
                }
            })
            .collect();

        self.end_hand(payoffs, false);
    }

    fn end_hand(&mut self, payoffs: Vec<HandPayoff>, tie: bool) {
        self.pot = Chips::ZERO;
        self.hand_in_progress = false;
        self.hand_ended_at = Some(Instant::now());
        self.winners = payoffs.iter().map(|p| p.player_id.clone()).collect();

        for payoff in &payoffs {
            info!(
                "Player {} won {} on table {}",
                payoff.player_id, payoff.chips, self.table_id
            );
        }

        // Show the revealed cards and the winners before resetting players.
        self.broadcast_game_update();
        self.broadcast(Message::EndHand { payoffs, tie });

        self.players.end_hand();
        self.board.clear();
        self.betting = BettingRound::new();
        self.stage = Stage::Preflop;

        for player in self.players.remove_left() {
            info!("Player {} left table {}", player.player_id, self.table_id);
            self.broadcast(Message::PlayerLeft(player.player_id));
        }

        self.broadcast_game_update();
    }

    /// Queues a snapshot for all players and starts the turn timer when a new
    /// turn begins.
    fn broadcast_game_update(&mut self) {
        let turn = self
            .hand_in_progress
            .then(|| self.players.active_player_id().cloned())
            .flatten();

        self.turn_timer = match (self.turn_timer.take(), turn) {
            (Some((current, started)), Some(turn)) if current == turn => Some((current, started)),
            (_, Some(turn)) => Some((turn, Instant::now())),
            (_, None) => None,
        };

        let snapshot = self.snapshot();
        self.broadcast(Message::GameUpdate(snapshot));
    }

    fn broadcast(&mut self, msg: Message) {
        self.outgoing.push(Outgoing::Broadcast(msg));
    }

    fn send(&mut self, player_id: &PlayerId, msg: Message) {
        self.outgoing.push(Outgoing::Send(player_id.clone(), msg));
    }
}
