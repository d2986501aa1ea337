// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Holdem table hand evaluator.
//!
//! Evaluates hands of 2 to 7 cards by classifying every 5 cards subset and
//! keeping the best one, see [HandValue] for the ordering rules.
//!
//! To use the evaluator create a hand and use [HandValue] to evaluate the hand
//! and get its rank:
//!
//! ```
//! # use holdem_eval::*;
//! let cards = ["As", "Ks", "Qs", "Js", "Ts", "2d", "2c"]
//!     .iter()
//!     .map(|c| c.parse().unwrap())
//!     .collect::<Vec<Card>>();
//! let v1 = HandValue::eval(&cards);
//! assert_eq!(v1.rank(), HandRank::StraightFlush);
//! assert_eq!(v1.kickers(), &[14]);
//!
//! let v2 = HandValue::eval(&cards[2..]);
//! assert!(v1 > v2);
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
pub mod eval;
pub use eval::{HandRank, HandValue, for_each_subset};

// Reexport cards types.
pub use holdem_cards::{Card, Deck, Rank, Suit};
