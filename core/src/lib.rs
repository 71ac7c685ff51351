// Copyright 2017-2024 Peter Williams and collaborators
// Licensed under the MIT License.

//! Core types and traits for mockcat.
//!
//! The pieces here know nothing about any particular simulation: they cover
//! error handling, user notifications, a simple in-memory columnar table, and
//! the [`container::Container`] abstraction through which the format crates
//! expose hierarchical scientific files (groups of named datasets carrying
//! string attributes).

#[macro_use]
pub mod errors; // must come first to provide macros for other modules
pub mod container;
#[cfg(feature = "notifications")]
#[macro_use]
pub mod notify;
pub mod num;
pub mod table;

pub use errors::{Error, Result};
