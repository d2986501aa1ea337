// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Table errors.
use thiserror::Error;

use holdem_core::poker::{InsufficientCards, PlayerId};

/// A rejected player action, the table state is not changed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidAction {
    /// The player is not at the table.
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),
    /// The player folded or is not playing this hand.
    #[error("player {0} is not active in the hand")]
    Inactive(PlayerId),
    /// Another player should act.
    #[error("not player {0} turn")]
    OutOfTurn(PlayerId),
    /// Raises must be for a positive amount.
    #[error("raise amount must be positive")]
    NonPositiveRaise,
    /// The action is not one a player can take.
    #[error("unknown action")]
    UnknownAction,
    /// There is no hand being played.
    #[error("no hand in progress")]
    NoHand,
}

/// Table errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// The action was rejected.
    #[error(transparent)]
    InvalidAction(#[from] InvalidAction),
    /// The player is already seated at the table.
    #[error("player {0} has already joined")]
    AlreadyJoined(PlayerId),
    /// All seats are taken.
    #[error("table full")]
    TableFull,
    /// A hand needs at least two players with chips.
    #[error("not enough players")]
    NotEnoughPlayers,
    /// A hand is being played.
    #[error("hand in progress")]
    HandInProgress,
    /// The table task is not running.
    #[error("table closed")]
    Closed,
    /// The deck ran out of cards.
    #[error(transparent)]
    Cards(#[from] InsufficientCards),
}

impl TableError {
    /// Checks if this error breaks a table invariant and the table must stop.
    pub fn is_fatal(&self) -> bool {
        matches!(self, TableError::Cards(_))
    }
}
