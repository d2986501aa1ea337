// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Betting round rules.
use log::debug;

use holdem_core::{
    message::PlayerAction,
    poker::{Chips, PlayerId},
};

use crate::error::InvalidAction;

use super::player::PlayersState;

/// The result of a player action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The round continues with the next player.
    Continue,
    /// All players have matched the bet and the round is over.
    Settled,
    /// Only one player is left in the hand.
    HandOver,
}

/// A betting round state.
///
/// Player contributions for the round live in each player `bet`, all chips
/// paid are added to a single pot.
#[derive(Debug, Default)]
pub struct BettingRound {
    current_bet: Chips,
}

impl BettingRound {
    /// Opens a new round with no bet.
    pub fn new() -> Self {
        Self::default()
    }

    /// The bet every player in the hand must match.
    pub fn current_bet(&self) -> Chips {
        self.current_bet
    }

    /// Validates and applies a player action.
    ///
    /// A rejected action leaves the players and the pot unchanged.
    pub fn apply(
        &mut self,
        players: &mut PlayersState,
        pot: &mut Chips,
        player_id: &PlayerId,
        action: PlayerAction,
        amount: Chips,
    ) -> Result<ActionOutcome, InvalidAction> {
        let pos = players
            .position(player_id)
            .ok_or_else(|| InvalidAction::UnknownPlayer(player_id.clone()))?;

        if !players.get(pos).is_some_and(|p| p.is_active()) {
            return Err(InvalidAction::Inactive(player_id.clone()));
        }

        if players.active_seat() != Some(pos) {
            return Err(InvalidAction::OutOfTurn(player_id.clone()));
        }

        if action == PlayerAction::Raise && amount == Chips::ZERO {
            return Err(InvalidAction::NonPositiveRaise);
        }

        let Some(player) = players.active_player() else {
            return Err(InvalidAction::OutOfTurn(player_id.clone()));
        };

        match action {
            PlayerAction::None => return Err(InvalidAction::UnknownAction),
            PlayerAction::Fold => player.fold(),
            PlayerAction::Call => {
                *pot += player.bet_to(action, self.current_bet);
            }
            PlayerAction::Raise => {
                self.current_bet += amount;
                *pot += player.bet_to(action, self.current_bet);
            }
            PlayerAction::AllIn => {
                let chips = player.chips;
                *pot += player.pay(chips);
                player.action = action;
                self.current_bet = self.current_bet.max(player.bet);
            }
        }

        debug!(
            "Player {player_id} {action} bet {} pot {pot}",
            self.current_bet
        );

        Ok(self.advance(players))
    }

    /// Folds the player at the given seat, this is used for players who
    /// disconnect or don't act in time and may happen out of turn.
    pub fn fold(&mut self, players: &mut PlayersState, pos: usize) -> ActionOutcome {
        let was_turn = players.active_seat() == Some(pos);
        match players.get_mut(pos) {
            Some(player) if player.is_active() => player.fold(),
            _ => return ActionOutcome::Continue,
        }

        if players.count_active() < 2 {
            return ActionOutcome::HandOver;
        }

        if was_turn {
            players.activate_next_player();
        }

        if self.is_settled(players) {
            ActionOutcome::Settled
        } else {
            ActionOutcome::Continue
        }
    }

    /// Checks if the round is over.
    ///
    /// All players with chips must have matched the bet, and must have acted
    /// if two or more of them can still act. All in players are exempt.
    pub fn is_settled(&self, players: &PlayersState) -> bool {
        if players.count_active() < 2 {
            return true;
        }

        let matched = players
            .iter()
            .filter(|p| p.can_act())
            .all(|p| p.bet >= self.current_bet);
        if !matched {
            return false;
        }

        if players.count_active_with_chips() < 2 {
            return true;
        }

        players
            .iter()
            .filter(|p| p.can_act())
            .all(|p| p.action != PlayerAction::None)
    }

    fn advance(&mut self, players: &mut PlayersState) -> ActionOutcome {
        if players.count_active() < 2 {
            return ActionOutcome::HandOver;
        }

        players.activate_next_player();

        if self.is_settled(players) {
            ActionOutcome::Settled
        } else {
            ActionOutcome::Continue
        }
    }
}
