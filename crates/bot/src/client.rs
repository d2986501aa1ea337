// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Automated poker client.
use anyhow::Result;
use log::{info, warn};
use rand::prelude::*;
use tokio::{
    sync::{broadcast, mpsc},
    time::{self, Duration},
};

use holdem_core::{
    game_state::{ActionRequest, GameState},
    message::{Message, PlayerAction},
    poker::{Chips, PlayerId},
};
use holdem_table::{Table, TableError, TableMessage};

/// A Poker bot strategy.
pub trait Strategy: Send + 'static {
    /// Execute an action given a game state.
    fn execute(&mut self, req: &ActionRequest, state: &GameState) -> (PlayerAction, Chips);
}

/// A bot playing at a table.
pub struct Client<S: Strategy> {
    strategy: S,
    player_id: PlayerId,
    nickname: String,
    table: Table,
    hands: usize,
    max_action_delay: Duration,
    shutdown_broadcast_rx: broadcast::Receiver<()>,
    _shutdown_complete_tx: mpsc::Sender<()>,
}

impl<S: Strategy> Client<S> {
    /// Creates a new client that leaves the table after `hands` hands.
    pub fn new(
        strategy: S,
        nickname: String,
        table: Table,
        hands: usize,
        max_action_delay: Duration,
        shutdown_broadcast_rx: broadcast::Receiver<()>,
        _shutdown_complete_tx: mpsc::Sender<()>,
    ) -> Self {
        Self {
            strategy,
            player_id: PlayerId::new(nickname.to_lowercase()),
            nickname,
            table,
            hands,
            max_action_delay,
            shutdown_broadcast_rx,
            _shutdown_complete_tx,
        }
    }

    /// Joins the table and plays until done, returns the final game state.
    pub async fn run(&mut self) -> Result<GameState> {
        let (table_tx, mut table_rx) = mpsc::channel(128);
        self.table
            .join(&self.player_id, &self.nickname, table_tx)
            .await?;

        let mut state = GameState::new(self.player_id.clone(), self.nickname.clone());

        loop {
            let msg = tokio::select! {
                res = table_rx.recv() => match res {
                    Some(TableMessage::Send(msg)) => msg,
                    Some(TableMessage::Close) | None => return Ok(state),
                },
                _ = self.shutdown_broadcast_rx.recv() => {
                    self.table.leave(&self.player_id).await;
                    return Ok(state);
                }
            };

            state.handle_message(&msg);

            if let Message::TableJoined { .. } = msg {
                info!(
                    "Player {} joined table {} with {} seats",
                    self.player_id,
                    state.table_id(),
                    state.seats()
                );
            }

            if matches!(msg, Message::EndHand { .. }) && self.is_done(&state) {
                self.table.leave(&self.player_id).await;
                return Ok(state);
            }

            if state.action_request().is_some() {
                let delay = rand::rng().random_range(0..=self.max_action_delay.as_millis() as u64);
                time::sleep(Duration::from_millis(delay)).await;

                // Catch up with the updates sent while waiting.
                let mut hand_ended = false;
                while let Ok(TableMessage::Send(msg)) = table_rx.try_recv() {
                    hand_ended |= matches!(msg, Message::EndHand { .. });
                    state.handle_message(&msg);
                }

                if hand_ended && self.is_done(&state) {
                    self.table.leave(&self.player_id).await;
                    return Ok(state);
                }

                if let Some(req) = state.action_request().cloned() {
                    let (action, amount) = self.strategy.execute(&req, &state);
                    match self.table.action(&self.player_id, action, amount).await {
                        Ok(()) => {}
                        Err(TableError::InvalidAction(err)) => {
                            warn!("Player {} action rejected: {err}", self.player_id);
                        }
                        Err(err) => return Err(err.into()),
                    }

                    state.reset_action_request();
                }
            }
        }
    }

    fn is_done(&self, state: &GameState) -> bool {
        let chips = state.local_player().map(|p| p.chips).unwrap_or_default();
        let with_chips = state
            .players()
            .iter()
            .filter(|p| p.chips > Chips::ZERO)
            .count();

        if state.hands_played() >= self.hands {
            info!(
                "Player {} done after {} hands with {chips} chips",
                self.player_id,
                state.hands_played()
            );
            true
        } else if chips == Chips::ZERO {
            info!("Player {} has no chips left", self.player_id);
            true
        } else if with_chips < 2 {
            info!("Player {} won all the chips", self.player_id);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use holdem_table::TableConfig;

    struct AlwaysCall;

    impl Strategy for AlwaysCall {
        fn execute(&mut self, _req: &ActionRequest, _state: &GameState) -> (PlayerAction, Chips) {
            (PlayerAction::Call, Chips::ZERO)
        }
    }

    #[tokio::test]
    async fn clients_play_hands() {
        let (shutdown_tx, _) = broadcast::channel(1);
        let (complete_tx, _complete_rx) = mpsc::channel(1);

        let config = TableConfig {
            new_hand_delay: Duration::ZERO,
            seed: Some(5),
            ..TableConfig::default()
        };
        let table = Table::new(config, shutdown_tx.subscribe(), complete_tx.clone());

        let mut handles = Vec::new();
        for nickname in ["Alice", "Bob"] {
            let mut client = Client::new(
                AlwaysCall,
                nickname.to_string(),
                table.clone(),
                2,
                Duration::ZERO,
                shutdown_tx.subscribe(),
                complete_tx.clone(),
            );
            handles.push(tokio::spawn(async move { client.run().await }));
        }

        let mut total = Chips::ZERO;
        for handle in handles {
            let state = time::timeout(Duration::from_secs(20), handle)
                .await
                .unwrap()
                .unwrap()
                .unwrap();

            assert_eq!(state.hands_played(), 2);
            assert_eq!(state.table_id(), table.table_id());
            total += state.local_player().unwrap().chips;
        }

        // Checking every street moves no chips.
        assert_eq!(total, Chips::new(2_000));
    }
}
