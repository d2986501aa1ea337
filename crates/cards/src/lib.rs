// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Holdem table cards types.
//!
//! This crate define types to create cards:
//!
//! ```
//! # use holdem_cards::{Card, Rank, Suit};
//! let ah = Card::new(Rank::Ace, Suit::Hearts);
//! let td: Card = "Td".parse().unwrap();
//! assert_eq!(td, Card::new(Rank::Ten, Suit::Diamonds));
//! assert_eq!(ah.to_string(), "A♥");
//! ```
//!
//! and a [Deck] type that is shuffled once and then consumed from the front:
//!
//! ```
//! # use holdem_cards::Deck;
//! let mut deck = Deck::new_and_shuffled(&mut rand::rng());
//! let flop = deck.draw(3).unwrap();
//! assert_eq!(flop.len(), 3);
//! assert_eq!(deck.count(), Deck::SIZE - 3);
//! assert!(deck.draw(50).is_err());
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
mod deck;
pub use deck::{Card, Deck, InsufficientCards, ParseCardError, Rank, Suit};
