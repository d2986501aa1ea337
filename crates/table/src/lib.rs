// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Holdem table betting engine and hand controller.
//!
//! A [Table] is a handle to a task that owns the state of a single table,
//! sessions submit actions through the handle and receive
//! [TableMessage]s with the table updates.
#![warn(clippy::all, rust_2018_idioms, missing_docs)]

pub mod error;
pub use error::{InvalidAction, TableError};
pub mod table;
pub use table::{Table, TableConfig, TableMessage};
