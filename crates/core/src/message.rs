// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Type definitions for messages sent by a table to its sessions.
//!
//! Messages carry an explicit schema decoupled from the table internal state,
//! the session layer decides how to serialize and deliver them.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::poker::{Card, Chips, HandRank, PlayerCards, PlayerId, TableId};

/// Message sent by a table to a player session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Message {
    /// Table joined confirmation.
    TableJoined {
        /// The table the player joined.
        table_id: TableId,
        /// The player who joined.
        player_id: PlayerId,
        /// The chips amount for the player who joined.
        chips: Chips,
        /// The number of seats at the table.
        seats: u8,
    },
    /// A player joined the table.
    PlayerJoined {
        /// The player id.
        player_id: PlayerId,
        /// The player nickname.
        nickname: String,
        /// The player chips.
        chips: Chips,
    },
    /// A player left the table.
    PlayerLeft(PlayerId),
    /// Tell players to prepare for a new hand.
    StartHand,
    /// Deal hole cards to a player, only sent to the player who owns them.
    DealCards(Card, Card),
    /// A table state update sent after every change.
    GameUpdate(TableSnapshot),
    /// The hand has ended.
    EndHand {
        /// The players who won chips in this hand.
        payoffs: Vec<HandPayoff>,
        /// Set when two or more players split the pot with equal hands.
        tie: bool,
    },
}

/// A snapshot of the table public state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSnapshot {
    /// The table id.
    pub table_id: TableId,
    /// A hand is being played.
    pub hand_in_progress: bool,
    /// The hand stage.
    pub stage: Stage,
    /// The chips in the pot.
    pub pot: Chips,
    /// The community cards.
    pub board: Vec<Card>,
    /// The bet every player in the hand must match to stay in the round.
    pub current_bet: Chips,
    /// The player who should act next.
    pub turn: Option<PlayerId>,
    /// The winners of the last hand, empty until the hand ends.
    pub winners: Vec<PlayerId>,
    /// The players in seat order.
    pub players: Vec<PlayerUpdate>,
}

/// A player public state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerUpdate {
    /// The player id.
    pub player_id: PlayerId,
    /// The player nickname.
    pub nickname: String,
    /// The player chips.
    pub chips: Chips,
    /// The player contribution in this betting round.
    pub bet: Chips,
    /// The last player action.
    pub action: PlayerAction,
    /// The player cards visible to all players.
    pub cards: PlayerCards,
    /// The player status in the hand.
    pub status: PlayerStatus,
}

/// A player winnings at the end of a hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandPayoff {
    /// The player id.
    pub player_id: PlayerId,
    /// The chips won.
    pub chips: Chips,
    /// The winning hand cards, empty if the player won because all the other
    /// players folded.
    pub cards: Vec<Card>,
    /// The winning hand rank if there was a showdown.
    pub rank: Option<HandRank>,
}

/// A Player action.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerAction {
    /// No action.
    None,
    /// Player calls, calling with nothing to match is a check.
    Call,
    /// Player raises the bet by an amount.
    Raise,
    /// Player bets all its chips.
    AllIn,
    /// Player folds.
    Fold,
}

impl PlayerAction {
    /// The action label.
    pub fn label(&self) -> &'static str {
        match self {
            PlayerAction::Call => "CALL",
            PlayerAction::Raise => "RAISE",
            PlayerAction::AllIn => "ALL-IN",
            PlayerAction::Fold => "FOLD",
            PlayerAction::None => "",
        }
    }
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The player status in a hand.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerStatus {
    /// The player is in the hand.
    #[default]
    Active,
    /// The player folded or is sitting out this hand.
    Folded,
    /// The player has no chips and cannot play.
    Eliminated,
}

/// A hand stage.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
    /// Betting on hole cards.
    #[default]
    Preflop,
    /// Betting after the first 3 community cards.
    Flop,
    /// Betting after the fourth community card.
    Turn,
    /// Betting after the fifth community card.
    River,
    /// Hands are compared.
    Showdown,
}

impl Stage {
    /// The number of community cards on the board at this stage.
    pub fn board_size(&self) -> usize {
        match self {
            Stage::Preflop => 0,
            Stage::Flop => 3,
            Stage::Turn => 4,
            Stage::River | Stage::Showdown => 5,
        }
    }

    /// The stage that follows this one.
    pub fn next(&self) -> Stage {
        match self {
            Stage::Preflop => Stage::Flop,
            Stage::Flop => Stage::Turn,
            Stage::Turn => Stage::River,
            Stage::River | Stage::Showdown => Stage::Showdown,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self {
            Stage::Preflop => "preflop",
            Stage::Flop => "flop",
            Stage::Turn => "turn",
            Stage::River => "river",
            Stage::Showdown => "showdown",
        };

        write!(f, "{stage}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_progression() {
        let mut stage = Stage::Preflop;
        let mut sizes = vec![stage.board_size()];
        while stage != Stage::Showdown {
            stage = stage.next();
            sizes.push(stage.board_size());
        }

        assert_eq!(sizes, vec![0, 3, 4, 5, 5]);
        assert_eq!(Stage::Showdown.next(), Stage::Showdown);
        assert!(Stage::Flop > Stage::Preflop);
    }
}
