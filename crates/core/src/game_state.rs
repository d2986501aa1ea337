// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Client game state types.
use crate::{
    message::{HandPayoff, Message, PlayerAction, PlayerStatus, PlayerUpdate, Stage},
    poker::{Card, Chips, PlayerCards, PlayerId, TableId},
};

/// Game player data.
#[derive(Debug)]
pub struct Player {
    /// This player id.
    pub player_id: PlayerId,
    /// This player nickname.
    pub nickname: String,
    /// This player chips.
    pub chips: Chips,
    /// The player bet in this round.
    pub bet: Chips,
    /// This player winning chips.
    pub winning_chips: Chips,
    /// This player winning hand.
    pub winning_cards: Vec<Card>,
    /// The last player action.
    pub action: PlayerAction,
    /// This player cards.
    pub cards: PlayerCards,
    /// The player status in the hand.
    pub status: PlayerStatus,
}

impl Player {
    fn new(player_id: PlayerId, nickname: String, chips: Chips) -> Self {
        Self {
            player_id,
            nickname,
            chips,
            bet: Chips::ZERO,
            winning_chips: Chips::ZERO,
            winning_cards: Vec::default(),
            action: PlayerAction::None,
            cards: PlayerCards::None,
            status: PlayerStatus::Active,
        }
    }
}

/// The action the local player is expected to take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    /// The chips needed to match the current bet.
    pub to_call: Chips,
    /// The local player chips.
    pub chips: Chips,
    /// The table current bet.
    pub current_bet: Chips,
}

impl ActionRequest {
    /// Check if calling costs nothing.
    pub fn can_check(&self) -> bool {
        self.to_call == Chips::ZERO
    }

    /// Check if the player has chips left after a call to raise.
    pub fn can_raise(&self) -> bool {
        self.chips > self.to_call
    }
}

/// This client game state.
#[derive(Debug)]
pub struct GameState {
    player_id: PlayerId,
    nickname: String,
    table_id: TableId,
    seats: usize,
    players: Vec<Player>,
    action_request: Option<ActionRequest>,
    board: Vec<Card>,
    pot: Chips,
    stage: Stage,
    hands_played: usize,
    last_tie: bool,
}

impl GameState {
    /// Creates a new ClientState for the local player.
    pub fn new(player_id: PlayerId, nickname: String) -> Self {
        Self {
            player_id,
            nickname,
            table_id: TableId::NO_TABLE,
            seats: 0,
            players: Vec::default(),
            action_request: None,
            board: Vec::default(),
            pot: Chips::ZERO,
            stage: Stage::Preflop,
            hands_played: 0,
            last_tie: false,
        }
    }

    /// Handle an incoming table message.
    pub fn handle_message(&mut self, msg: &Message) {
        match msg {
            Message::TableJoined {
                table_id,
                chips,
                seats,
                ..
            } => {
                self.table_id = *table_id;
                self.seats = *seats as usize;
                self.players.push(Player::new(
                    self.player_id.clone(),
                    self.nickname.clone(),
                    *chips,
                ));
            }
            Message::PlayerJoined {
                player_id,
                nickname,
                chips,
            } => {
                if !self.players.iter().any(|p| &p.player_id == player_id) {
                    self.players
                        .push(Player::new(player_id.clone(), nickname.clone(), *chips));
                }
            }
            Message::PlayerLeft(player_id) => {
                self.players.retain(|p| &p.player_id != player_id);
            }
            Message::StartHand => {
                // Prepare for a new hand.
                for player in &mut self.players {
                    player.cards = PlayerCards::None;
                    player.action = PlayerAction::None;
                    player.winning_chips = Chips::ZERO;
                    player.winning_cards.clear();
                }
                self.board.clear();
                self.last_tie = false;
            }
            Message::EndHand { payoffs, tie } => {
                self.action_request = None;
                self.hands_played += 1;
                self.last_tie = *tie;
                self.update_payoffs(payoffs);
            }
            Message::DealCards(c1, c2) => {
                if let Some(player) = self.local_player_mut() {
                    player.cards = PlayerCards::Cards(*c1, *c2);
                }
            }
            Message::GameUpdate(snapshot) => {
                self.update_players(&snapshot.players);
                self.board = snapshot.board.clone();
                self.pot = snapshot.pot;
                self.stage = snapshot.stage;

                // The table is waiting for this player to act.
                self.action_request = match (&snapshot.turn, self.local_player()) {
                    (Some(turn), Some(player)) if turn == &self.player_id => Some(ActionRequest {
                        to_call: snapshot.current_bet - player.bet,
                        chips: player.chips,
                        current_bet: snapshot.current_bet,
                    }),
                    _ => None,
                };
            }
        }
    }

    /// Returns the requested player action if any.
    pub fn action_request(&self) -> Option<&ActionRequest> {
        self.action_request.as_ref()
    }

    /// Reset the action request.
    pub fn reset_action_request(&mut self) {
        self.action_request = None;
    }

    /// Returns a reference to the players.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Returns the local player.
    pub fn local_player(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.player_id == self.player_id)
    }

    /// The current pot.
    pub fn pot(&self) -> Chips {
        self.pot
    }

    /// The board cards.
    pub fn board(&self) -> &[Card] {
        &self.board
    }

    /// The hand stage.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// The number of seats at this table.
    pub fn seats(&self) -> usize {
        self.seats
    }

    /// The table this player joined.
    pub fn table_id(&self) -> TableId {
        self.table_id
    }

    /// The number of hands that ended since joining.
    pub fn hands_played(&self) -> usize {
        self.hands_played
    }

    /// Checks if the last hand ended with a split pot.
    pub fn last_tie(&self) -> bool {
        self.last_tie
    }

    fn local_player_mut(&mut self) -> Option<&mut Player> {
        self.players
            .iter_mut()
            .find(|p| p.player_id == self.player_id)
    }

    fn update_payoffs(&mut self, payoffs: &[HandPayoff]) {
        for payoff in payoffs {
            if let Some(p) = self
                .players
                .iter_mut()
                .find(|p| p.player_id == payoff.player_id)
            {
                p.winning_chips = payoff.chips;
                p.winning_cards = payoff.cards.clone();
            }
        }
    }

    fn update_players(&mut self, updates: &[PlayerUpdate]) {
        for update in updates {
            let is_local = update.player_id == self.player_id;
            match self
                .players
                .iter_mut()
                .find(|p| p.player_id == update.player_id)
            {
                Some(player) => {
                    player.chips = update.chips;
                    player.bet = update.bet;
                    player.action = update.action;
                    player.status = update.status;

                    // Do not override cards for the local player as they are
                    // updated when we get a DealCards message.
                    if !is_local || matches!(update.cards, PlayerCards::Cards(..)) {
                        player.cards = update.cards;
                    }
                }
                None => {
                    let mut player = Player::new(
                        update.player_id.clone(),
                        update.nickname.clone(),
                        update.chips,
                    );
                    player.status = update.status;
                    self.players.push(player);
                }
            }
        }
    }
}
