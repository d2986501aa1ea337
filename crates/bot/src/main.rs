// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Holdem bots playing at a table.
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
use anyhow::Result;
use clap::Parser;
use std::time::Duration;

use holdem_bot::{
    Strategy,
    core::{
        game_state::{ActionRequest, GameState},
        message::{PlayerAction, Stage},
        poker::{Chips, PlayerCards},
    },
};

/// Calls most of the time, raises pairs before the flop.
struct Simple;

impl Strategy for Simple {
    fn execute(&mut self, req: &ActionRequest, state: &GameState) -> (PlayerAction, Chips) {
        // Some randomness.
        let p = rand::random::<f64>();

        let mut paired = false;
        if let Some(PlayerCards::Cards(c1, c2)) = state.local_player().map(|player| player.cards) {
            if c1.rank() == c2.rank() && state.stage() == Stage::Preflop && req.can_raise() {
                return if p < 0.05 {
                    (PlayerAction::AllIn, Chips::ZERO)
                } else {
                    (PlayerAction::Raise, Chips::new(50))
                };
            }

            // Don't give up a hand that pairs the board.
            paired = state
                .board()
                .iter()
                .any(|c| c.rank() == c1.rank() || c.rank() == c2.rank());
        }

        if p < 0.1 && !req.can_check() && !paired {
            (PlayerAction::Fold, Chips::ZERO)
        } else if p > 0.9 && req.can_raise() {
            (PlayerAction::Raise, Chips::new(20))
        } else {
            (PlayerAction::Call, Chips::ZERO)
        }
    }
}

#[derive(Debug, Parser)]
struct Cli {
    /// Number of clients to run.
    #[clap(long, short, value_parser = clap::value_parser!(u8).range(2..=6))]
    clients: u8,
    /// Number of hands to play.
    #[clap(long, default_value_t = 10)]
    hands: usize,
    /// Fold players who don't act within this number of seconds.
    #[clap(long)]
    action_timeout: Option<u64>,
    /// Seed for a deterministic deck shuffle.
    #[clap(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .format_timestamp_millis()
        .init();

    let config = holdem_bot::Config {
        clients: cli.clients,
        hands: cli.hands,
        action_timeout: cli.action_timeout.map(Duration::from_secs),
        seed: cli.seed,
    };

    holdem_bot::run(config, || Simple).await
}
