// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Poker hand evaluator.
//!
//! The evaluator enumerates all the 5 cards subsets of a hand using an index
//! based k-subset generator ([for_each_subset]), classifies each subset into
//! a category with its kickers, and returns the maximum.
//!
//! An ace high straight flush is not a category of its own, it is a
//! [HandRank::StraightFlush] with a 14 kicker, so it beats any other straight
//! flush by kicker comparison.

mod subsets;
pub use subsets::for_each_subset;

mod value;
pub use value::{HandRank, HandValue};
