// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Table task and handle types.
use ahash::{AHashMap, AHashSet};
use anyhow::Result;
use log::{error, info, warn};
use std::time::{Duration, Instant};
use tokio::{
    sync::{
        broadcast,
        mpsc::{self, error::TrySendError},
        oneshot,
    },
    time,
};

use holdem_core::{
    message::{Message, PlayerAction, TableSnapshot},
    poker::{Chips, PlayerId, TableId},
};

use crate::error::TableError;

pub mod betting;
pub mod player;
pub mod state;

use state::{Outgoing, State};

/// Table configuration.
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// The number of seats at the table.
    pub seats: usize,
    /// The chips given to a player who joins the table.
    pub start_chips: Chips,
    /// The time between the end of a hand and the start of the next one.
    pub new_hand_delay: Duration,
    /// Players who don't act within this time are folded.
    pub action_timeout: Option<Duration>,
    /// Seed for the deck shuffle, if not set the table seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            seats: 10,
            start_chips: Chips::new(1_000),
            new_hand_delay: Duration::from_secs(3),
            action_timeout: None,
            seed: None,
        }
    }
}

/// A message sent to player sessions.
#[derive(Debug, Clone)]
pub enum TableMessage {
    /// Sends a message to a session.
    Send(Message),
    /// The table has stopped.
    Close,
}

/// A handle to a table task.
///
/// The task owns the table state and handles one command at a time.
#[derive(Debug, Clone)]
pub struct Table {
    table_id: TableId,
    commands_tx: mpsc::Sender<TableCommand>,
}

/// Command for the table task.
#[derive(Debug)]
enum TableCommand {
    /// Join this table.
    Join {
        player_id: PlayerId,
        nickname: String,
        table_tx: mpsc::Sender<TableMessage>,
        resp_tx: oneshot::Sender<Result<(), TableError>>,
    },
    /// A player action.
    Action {
        player_id: PlayerId,
        action: PlayerAction,
        amount: Chips,
        resp_tx: oneshot::Sender<Result<(), TableError>>,
    },
    /// Leave this table.
    Leave(PlayerId),
    /// Get the table public state.
    Snapshot(oneshot::Sender<TableSnapshot>),
}

impl Table {
    /// Creates a new table and spawns its task.
    pub fn new(
        config: TableConfig,
        shutdown_broadcast_rx: broadcast::Receiver<()>,
        shutdown_complete_tx: mpsc::Sender<()>,
    ) -> Self {
        // There must be at least 2 seats.
        assert!(config.seats > 1);

        let (commands_tx, commands_rx) = mpsc::channel(128);
        let table_id = TableId::new_id();

        let mut task = TableTask {
            table_id,
            config,
            sessions: AHashMap::default(),
            commands_rx,
            shutdown_broadcast_rx,
            _shutdown_complete_tx: shutdown_complete_tx,
        };

        tokio::spawn(async move {
            if let Err(err) = task.run().await {
                error!("Table {} error {err}", task.table_id);
            }

            task.close_sessions();
            info!("Table task for table {} stopped", task.table_id);
        });

        Self {
            table_id,
            commands_tx,
        }
    }

    /// This table id.
    pub fn table_id(&self) -> TableId {
        self.table_id
    }

    /// A player joins this table, the table updates are sent to `table_tx`.
    ///
    /// Returns error if the table is full or the player has already joined.
    pub async fn join(
        &self,
        player_id: &PlayerId,
        nickname: &str,
        table_tx: mpsc::Sender<TableMessage>,
    ) -> Result<(), TableError> {
        let (resp_tx, resp_rx) = oneshot::channel();

        self.commands_tx
            .send(TableCommand::Join {
                player_id: player_id.clone(),
                nickname: nickname.to_string(),
                table_tx,
                resp_tx,
            })
            .await
            .map_err(|_| TableError::Closed)?;

        resp_rx.await.map_err(|_| TableError::Closed)?
    }

    /// A player action, the amount is used only for raises.
    pub async fn action(
        &self,
        player_id: &PlayerId,
        action: PlayerAction,
        amount: Chips,
    ) -> Result<(), TableError> {
        let (resp_tx, resp_rx) = oneshot::channel();

        self.commands_tx
            .send(TableCommand::Action {
                player_id: player_id.clone(),
                action,
                amount,
                resp_tx,
            })
            .await
            .map_err(|_| TableError::Closed)?;

        resp_rx.await.map_err(|_| TableError::Closed)?
    }

    /// A player leaves the table.
    pub async fn leave(&self, player_id: &PlayerId) {
        let _ = self
            .commands_tx
            .send(TableCommand::Leave(player_id.clone()))
            .await;
    }

    /// Returns the table public state.
    pub async fn snapshot(&self) -> Result<TableSnapshot, TableError> {
        let (resp_tx, resp_rx) = oneshot::channel();

        self.commands_tx
            .send(TableCommand::Snapshot(resp_tx))
            .await
            .map_err(|_| TableError::Closed)?;

        resp_rx.await.map_err(|_| TableError::Closed)
    }
}

struct TableTask {
    /// This table identifier.
    table_id: TableId,
    /// Table configuration.
    config: TableConfig,
    /// The channels to the sessions of the players at this table.
    sessions: AHashMap<PlayerId, mpsc::Sender<TableMessage>>,
    /// Channel for receiving table commands.
    commands_rx: mpsc::Receiver<TableCommand>,
    /// Channel for listening shutdown notification.
    shutdown_broadcast_rx: broadcast::Receiver<()>,
    /// Sender that drops when this task is done.
    _shutdown_complete_tx: mpsc::Sender<()>,
}

impl TableTask {
    async fn run(&mut self) -> Result<()> {
        let mut state = State::new(self.table_id, self.config.clone());
        let mut ticks = time::interval(Duration::from_millis(500));

        info!(
            "Table {} started with {} seats",
            self.table_id, self.config.seats
        );

        loop {
            tokio::select! {
                // Server is shutting down exit this handler.
                _ = self.shutdown_broadcast_rx.recv() => break Ok(()),
                _ = ticks.tick() => {
                    state.tick(Instant::now())?;
                }
                res = self.commands_rx.recv() => match res {
                    Some(TableCommand::Join { player_id, nickname, table_tx, resp_tx }) => {
                        let res = state.join(&player_id, &nickname);
                        if res.is_ok() {
                            self.sessions.insert(player_id, table_tx);
                        }
                        let _ = resp_tx.send(res);
                    }
                    Some(TableCommand::Action { player_id, action, amount, resp_tx }) => {
                        let res = state.action(&player_id, action, amount);
                        let fatal = res.as_ref().err().filter(|e| e.is_fatal()).cloned();
                        let _ = resp_tx.send(res);
                        if let Some(err) = fatal {
                            return Err(err.into());
                        }
                    }
                    Some(TableCommand::Leave(player_id)) => {
                        self.sessions.remove(&player_id);
                        state.leave(&player_id)?;
                    }
                    Some(TableCommand::Snapshot(resp_tx)) => {
                        let _ = resp_tx.send(state.snapshot());
                    }
                    None => break Ok(()),
                },
            }

            self.flush(&mut state)?;
        }
    }

    /// Delivers the state messages to the sessions, players whose session
    /// has been dropped leave the table.
    fn flush(&mut self, state: &mut State) -> Result<(), TableError> {
        loop {
            let outgoing = state.drain_outgoing();
            if outgoing.is_empty() {
                return Ok(());
            }

            for player_id in self.dispatch(outgoing) {
                info!(
                    "Player {player_id} session closed on table {}",
                    self.table_id
                );
                self.sessions.remove(&player_id);
                state.leave(&player_id)?;
            }
        }
    }

    /// Sends messages to the sessions without waiting, returns the players
    /// whose session is closed.
    fn dispatch(&self, outgoing: Vec<Outgoing>) -> AHashSet<PlayerId> {
        let mut closed = AHashSet::default();

        for msg in outgoing {
            match msg {
                Outgoing::Broadcast(msg) => {
                    for (player_id, tx) in &self.sessions {
                        if !self.deliver(player_id, tx, msg.clone()) {
                            closed.insert(player_id.clone());
                        }
                    }
                }
                Outgoing::Send(player_id, msg) => {
                    if let Some(tx) = self.sessions.get(&player_id) {
                        if !self.deliver(&player_id, tx, msg) {
                            closed.insert(player_id);
                        }
                    }
                }
            }
        }

        closed
    }

    fn deliver(
        &self,
        player_id: &PlayerId,
        tx: &mpsc::Sender<TableMessage>,
        msg: Message,
    ) -> bool {
        match tx.try_send(TableMessage::Send(msg)) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!(
                    "Dropped message for player {player_id} on table {}",
                    self.table_id
                );
                true
            }
            Err(TrySendError::Closed(_)) => false,
        }
    }

    fn close_sessions(&mut self) {
        for (player_id, tx) in self.sessions.drain() {
            // A full session still sees the channel close when the sender drops.
            if let Err(TrySendError::Full(_)) = tx.try_send(TableMessage::Close) {
                warn!(
                    "Dropped close message for player {player_id} on table {}",
                    self.table_id
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn new_table(seed: u64) -> (Table, broadcast::Sender<()>, mpsc::Receiver<()>) {
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let (complete_tx, complete_rx) = mpsc::channel(1);
        let config = TableConfig {
            seed: Some(seed),
            ..TableConfig::default()
        };
        (Table::new(config, shutdown_rx, complete_tx), shutdown_tx, complete_rx)
    }

    /// Receives messages until one matches the predicate.
    async fn recv_until<F>(rx: &mut mpsc::Receiver<TableMessage>, mut f: F) -> Message
    where
        F: FnMut(&Message) -> bool,
    {
        time::timeout(TIMEOUT, async {
            loop {
                match rx.recv().await {
                    Some(TableMessage::Send(msg)) if f(&msg) => return msg,
                    Some(_) => {}
                    None => panic!("table channel closed"),
                }
            }
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn join_and_snapshot() {
        let (table, _shutdown_tx, _complete_rx) = new_table(1);
        let alice = PlayerId::from("alice");
        let bob = PlayerId::from("bob");

        let (alice_tx, mut alice_rx) = mpsc::channel(64);
        table.join(&alice, "alice", alice_tx.clone()).await.unwrap();

        let msg = recv_until(&mut alice_rx, |_| true).await;
        assert!(matches!(
            msg,
            Message::TableJoined { table_id, chips, .. }
                if table_id == table.table_id() && chips == Chips::new(1_000)
        ));

        let (bob_tx, mut bob_rx) = mpsc::channel(64);
        table.join(&bob, "bob", bob_tx.clone()).await.unwrap();

        // Each player learns about the other.
        recv_until(&mut alice_rx, |m| {
            matches!(m, Message::PlayerJoined { player_id, .. } if player_id.as_str() == "bob")
        })
        .await;
        recv_until(&mut bob_rx, |m| {
            matches!(m, Message::PlayerJoined { player_id, .. } if player_id.as_str() == "alice")
        })
        .await;

        let snapshot = table.snapshot().await.unwrap();
        assert_eq!(snapshot.players.len(), 2);

        assert_eq!(
            table.join(&bob, "bob", bob_tx).await,
            Err(TableError::AlreadyJoined(bob.clone()))
        );
    }

    #[tokio::test]
    async fn dropped_sessions() {
        let (table, _shutdown_tx, _complete_rx) = new_table(2);

        let (alice_tx, mut alice_rx) = mpsc::channel(64);
        table
            .join(&PlayerId::from("alice"), "alice", alice_tx)
            .await
            .unwrap();

        // A session that is gone leaves the table.
        let (bob_tx, bob_rx) = mpsc::channel(64);
        drop(bob_rx);
        table
            .join(&PlayerId::from("bob"), "bob", bob_tx)
            .await
            .unwrap();

        recv_until(&mut alice_rx, |m| {
            matches!(m, Message::PlayerLeft(player_id) if player_id.as_str() == "bob")
        })
        .await;

        // A session that doesn't read its messages only misses them.
        let (carol_tx, _carol_rx) = mpsc::channel(1);
        table
            .join(&PlayerId::from("carol"), "carol", carol_tx)
            .await
            .unwrap();

        let snapshot = table.snapshot().await.unwrap();
        let players = snapshot
            .players
            .iter()
            .map(|p| p.player_id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(players, vec!["alice", "carol"]);
    }

    #[tokio::test]
    async fn play_hand() {
        let (table, _shutdown_tx, _complete_rx) = new_table(3);

        let (alice_tx, mut alice_rx) = mpsc::channel(256);
        let (bob_tx, mut bob_rx) = mpsc::channel(256);
        table
            .join(&PlayerId::from("alice"), "alice", alice_tx)
            .await
            .unwrap();
        table
            .join(&PlayerId::from("bob"), "bob", bob_tx)
            .await
            .unwrap();

        // The next tick starts a hand and each player gets its cards.
        recv_until(&mut bob_rx, |m| matches!(m, Message::DealCards(..))).await;
        let msg = recv_until(&mut alice_rx, |m| {
            matches!(m, Message::GameUpdate(s) if s.turn.is_some())
        })
        .await;

        let Message::GameUpdate(snapshot) = msg else {
            unreachable!()
        };
        let turn = snapshot.turn.unwrap();
        assert_eq!(turn.as_str(), "alice");

        // Bob cannot act on alice turn.
        let res = table
            .action(&PlayerId::from("bob"), PlayerAction::Call, Chips::ZERO)
            .await;
        assert!(matches!(res, Err(TableError::InvalidAction(_))));

        table
            .action(&turn, PlayerAction::Fold, Chips::ZERO)
            .await
            .unwrap();

        let msg = recv_until(&mut bob_rx, |m| matches!(m, Message::EndHand { .. })).await;
        let Message::EndHand { payoffs, tie } = msg else {
            unreachable!()
        };
        assert!(!tie);
        assert_eq!(payoffs.len(), 1);
        assert_eq!(payoffs[0].player_id.as_str(), "bob");
    }

    #[tokio::test]
    async fn shutdown_closes_table() {
        let (table, shutdown_tx, mut complete_rx) = new_table(4);

        let (alice_tx, mut alice_rx) = mpsc::channel(64);
        table
            .join(&PlayerId::from("alice"), "alice", alice_tx)
            .await
            .unwrap();

        shutdown_tx.send(()).unwrap();
        assert!(complete_rx.recv().await.is_none());

        // Sessions get a close message.
        let closed = time::timeout(TIMEOUT, async {
            while let Some(msg) = alice_rx.recv().await {
                if matches!(msg, TableMessage::Close) {
                    return true;
                }
            }
            false
        })
        .await
        .unwrap();
        assert!(closed);

        let res = table
            .action(&PlayerId::from("alice"), PlayerAction::Call, Chips::ZERO)
            .await;
        assert_eq!(res, Err(TableError::Closed));
    }

    #[tokio::test]
    async fn shutdown_closes_full_session() {
        let (table, shutdown_tx, mut complete_rx) = new_table(5);

        // The join message fills the channel so the close message is dropped.
        let (carol_tx, mut carol_rx) = mpsc::channel(1);
        table
            .join(&PlayerId::from("carol"), "carol", carol_tx)
            .await
            .unwrap();

        shutdown_tx.send(()).unwrap();
        assert!(complete_rx.recv().await.is_none());

        let msgs = time::timeout(TIMEOUT, async {
            let mut msgs = Vec::new();
            while let Some(msg) = carol_rx.recv().await {
                msgs.push(msg);
            }
            msgs
        })
        .await
        .unwrap();

        // The session still sees the channel end.
        assert_eq!(msgs.len(), 1);
        assert!(matches!(
            &msgs[0],
            TableMessage::Send(Message::TableJoined { .. })
        ));
    }
}
