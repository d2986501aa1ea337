// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Table player types.
use holdem_core::{
    message::{PlayerAction, PlayerStatus, PlayerUpdate},
    poker::{Chips, PlayerCards, PlayerId},
};

/// A table player state.
#[derive(Debug)]
pub struct Player {
    /// The player id.
    pub player_id: PlayerId,
    /// This player nickname.
    pub nickname: String,
    /// This player chips.
    pub chips: Chips,
    /// The player contribution in this betting round.
    pub bet: Chips,
    /// The last player action in this betting round.
    pub action: PlayerAction,
    /// This player cards that are visible to all other players.
    pub public_cards: PlayerCards,
    /// This player private cards.
    pub hole_cards: PlayerCards,
    /// This player status in the hand.
    pub status: PlayerStatus,
    /// The player session disconnected during a hand.
    pub has_left: bool,
}

impl Player {
    /// Creates a new player.
    pub fn new(player_id: PlayerId, nickname: String, chips: Chips) -> Self {
        Self {
            player_id,
            nickname,
            chips,
            bet: Chips::ZERO,
            action: PlayerAction::None,
            public_cards: PlayerCards::None,
            hole_cards: PlayerCards::None,
            status: PlayerStatus::Active,
            has_left: false,
        }
    }

    /// Checks if this player is still in the hand.
    pub fn is_active(&self) -> bool {
        self.status == PlayerStatus::Active
    }

    /// Checks if this player is in the hand and has chips to act.
    pub fn can_act(&self) -> bool {
        self.is_active() && self.chips > Chips::ZERO
    }

    /// Moves up to `chips` from the stack to the bet, a player who runs out of
    /// chips goes all in. Returns the chips moved.
    pub fn pay(&mut self, chips: Chips) -> Chips {
        let paid = chips.min(self.chips);
        self.chips -= paid;
        self.bet += paid;
        paid
    }

    /// Updates this player bet to match the given bet level.
    pub fn bet_to(&mut self, action: PlayerAction, level: Chips) -> Chips {
        let paid = self.pay(level - self.bet);
        self.action = action;
        paid
    }

    /// Sets this player in fold state.
    pub fn fold(&mut self) {
        self.status = PlayerStatus::Folded;
        self.action = PlayerAction::Fold;
        self.public_cards = PlayerCards::None;
    }

    /// The player public state.
    pub fn update(&self) -> PlayerUpdate {
        PlayerUpdate {
            player_id: self.player_id.clone(),
            nickname: self.nickname.clone(),
            chips: self.chips,
            bet: self.bet,
            action: self.action,
            cards: self.public_cards,
            status: self.status,
        }
    }

    /// Reset state for a new hand.
    fn start_hand(&mut self) {
        self.status = if self.chips > Chips::ZERO && !self.has_left {
            PlayerStatus::Active
        } else {
            PlayerStatus::Eliminated
        };
        self.bet = Chips::ZERO;
        self.action = PlayerAction::None;
        self.public_cards = PlayerCards::None;
        self.hole_cards = PlayerCards::None;
    }

    /// Reset state for a new betting round.
    fn start_round(&mut self) {
        self.bet = Chips::ZERO;
        if self.is_active() {
            self.action = PlayerAction::None;
        }
    }

    /// Set state on hand end.
    fn end_hand(&mut self) {
        self.start_hand();
    }
}

/// The table players state.
///
/// Players are kept in seat order, the turn rotates through the seats skipping
/// players who folded or have no chips left.
#[derive(Debug, Default)]
pub struct PlayersState {
    players: Vec<Player>,
    active_player: Option<usize>,
    first_to_act: usize,
    hands_started: usize,
}

impl PlayersState {
    /// Adds a player to the table.
    pub fn join(&mut self, player: Player) {
        self.players.push(player);
    }

    /// Removes the player at the given seat.
    pub fn remove(&mut self, pos: usize) -> Player {
        let player = self.players.remove(pos);

        if pos < self.first_to_act {
            self.first_to_act -= 1;
        }

        self.active_player = match self.active_player {
            Some(idx) if idx == pos => None,
            Some(idx) if idx > pos => Some(idx - 1),
            other => other,
        };

        player
    }

    /// Removes the players who left during the hand.
    pub fn remove_left(&mut self) -> Vec<Player> {
        let mut removed = Vec::new();
        while let Some(pos) = self.players.iter().position(|p| p.has_left) {
            removed.push(self.remove(pos));
        }
        removed
    }

    /// Returns the seat of a player.
    pub fn position(&self, player_id: &PlayerId) -> Option<usize> {
        self.players.iter().position(|p| &p.player_id == player_id)
    }

    /// Returns the player at the given seat.
    pub fn get(&self, pos: usize) -> Option<&Player> {
        self.players.get(pos)
    }

    /// Returns the player at the given seat.
    pub fn get_mut(&mut self, pos: usize) -> Option<&mut Player> {
        self.players.get_mut(pos)
    }

    /// Returns total number of players.
    pub fn count(&self) -> usize {
        self.players.len()
    }

    /// Returns the number of active players.
    pub fn count_active(&self) -> usize {
        self.players.iter().filter(|p| p.is_active()).count()
    }

    /// Returns the number of players in the hand who have chips.
    pub fn count_active_with_chips(&self) -> usize {
        self.players.iter().filter(|p| p.can_act()).count()
    }

    /// Returns the number of players who have chips.
    pub fn count_with_chips(&self) -> usize {
        self.players
            .iter()
            .filter(|p| p.chips > Chips::ZERO && !p.has_left)
            .count()
    }

    /// The seat of the player who should act.
    pub fn active_seat(&self) -> Option<usize> {
        self.active_player
    }

    /// Returns the player who should act.
    pub fn active_player(&mut self) -> Option<&mut Player> {
        self.active_player
            .and_then(|idx| self.players.get_mut(idx))
            .filter(|p| p.can_act())
    }

    /// The id of the player who should act.
    pub fn active_player_id(&self) -> Option<&PlayerId> {
        self.active_player
            .and_then(|idx| self.players.get(idx))
            .map(|p| &p.player_id)
    }

    /// The seat of the first player to act in each round of this hand.
    pub fn first_to_act(&self) -> usize {
        self.first_to_act
    }

    /// Returns an iterator to all players.
    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    /// Returns a mutable iterator to all players.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Player> {
        self.players.iter_mut()
    }

    /// Moves the turn to the next player who can act.
    ///
    /// If no other player can act the turn goes back to the current player if
    /// that player can still act, otherwise nobody has the turn.
    pub fn activate_next_player(&mut self) {
        let start = self.active_player.unwrap_or(self.players.len().saturating_sub(1));
        self.active_player = self.next_can_act(start + 1);
    }

    /// Set state for a new hand.
    pub fn start_hand(&mut self) {
        for player in &mut self.players {
            player.start_hand();
        }

        // The first player to act moves one seat every hand.
        let start = if self.hands_started == 0 {
            0
        } else {
            self.first_to_act + 1
        };

        self.first_to_act = self.next_can_act(start).unwrap_or(0);
        self.hands_started += 1;
        self.active_player = None;
    }

    /// Starts a new betting round.
    pub fn start_round(&mut self) {
        for player in &mut self.players {
            player.start_round();
        }

        self.active_player = self.next_can_act(self.first_to_act);
    }

    /// The hand has ended, reset players and disable any active player.
    pub fn end_hand(&mut self) {
        self.active_player = None;
        self.players.iter_mut().for_each(Player::end_hand);
    }

    /// Returns the seat of the first player who can act starting from the seat
    /// at `start` and wrapping around.
    fn next_can_act(&self, start: usize) -> Option<usize> {
        let n = self.players.len();
        (0..n)
            .map(|offset| (start + offset) % n)
            .find(|&idx| self.players[idx].can_act())
    }
}
