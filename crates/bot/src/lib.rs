// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Holdem bots.
//!
//! Runs a table and a number of bot clients that play at the table using a
//! [Strategy] until they have played the configured number of hands.
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
use anyhow::Result;
use log::{error, info};
use std::time::Duration;
use tokio::{
    signal,
    sync::{broadcast, mpsc},
};

use holdem_table::{Table, TableConfig};

pub use holdem_core as core;

mod client;
pub use client::{Client, Strategy};

/// Bot clients configuration.
#[derive(Debug)]
pub struct Config {
    /// Number of clients to run.
    pub clients: u8,
    /// Number of hands each client plays before leaving.
    pub hands: usize,
    /// Players who don't act within this time are folded.
    pub action_timeout: Option<Duration>,
    /// Seed for the table deck shuffle.
    pub seed: Option<u64>,
}

static NICKNAMES: &[&str] = &["Alice", "Bob", "Carol", "Dave", "Frank", "Mike"];

/// Runs clients given a config and a strategy factory called for each client.
pub async fn run<F, S>(config: Config, factory: F) -> Result<()>
where
    F: Fn() -> S,
    S: Strategy,
{
    let (shutdown_broadcast_tx, _) = broadcast::channel(1);
    let (shutdown_complete_tx, mut shutdown_complete_rx) = mpsc::channel(1);

    let table_config = TableConfig {
        action_timeout: config.action_timeout,
        seed: config.seed,
        ..TableConfig::default()
    };

    let table = Table::new(
        table_config,
        shutdown_broadcast_tx.subscribe(),
        shutdown_complete_tx.clone(),
    );

    let mut handles = Vec::with_capacity(config.clients as usize);
    for idx in 0..config.clients {
        let mut client = Client::new(
            factory(),
            NICKNAMES[idx as usize % NICKNAMES.len()].to_string(),
            table.clone(),
            config.hands,
            Duration::from_millis(1_000),
            shutdown_broadcast_tx.subscribe(),
            shutdown_complete_tx.clone(),
        );

        handles.push(tokio::spawn(async move {
            match client.run().await {
                Ok(state) => {
                    let chips = state.local_player().map(|p| p.chips).unwrap_or_default();
                    info!("Client {idx} left the table with {chips} chips");
                }
                Err(err) => error!("Client {idx} error: {err}"),
            }
        }));
    }

    tokio::select! {
        _ = async {
            for handle in handles {
                let _ = handle.await;
            }
        } => info!("All clients left the table"),
        _ = signal::ctrl_c() => info!("Received Ctrl-c signal"),
    }

    // Signal the table and the clients to shutdown and wait for tasks to complete.
    drop(shutdown_broadcast_tx);
    drop(shutdown_complete_tx);
    let _ = shutdown_complete_rx.recv().await;

    Ok(())
}
