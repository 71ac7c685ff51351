// Copyright 2024 Peter Williams and collaborators
// Licensed under the MIT License.

/*!
Consolidating Shark mock catalogues for archive ingestion.

A Shark lightcone run writes its catalogue in chunks: a set of
`mocksky.<N>.hdf5` files holding `galaxies` and `groups` tables, and a
matching set of Stingray `Sting-SED-eagle-rr14_<N>.hdf5` files holding
per-filter apparent and absolute magnitudes for the same galaxies. This
crate

- concatenates the chunks in index order and writes one galaxy table (mock
  columns followed by magnitude columns) and one group table as CSV
  ([`merge`]);
- describes every column of those tables in a pipe-delimited metadata file
  ([`columns`]), using lookup tables for data types and UCDs
  ([`lookups`]);
- describes the archive groups and tables themselves ([`archive`]), as laid
  out in a JSON layout file ([`layout`]).

File access goes through the [`mockcat_core::container::Container`] trait,
so everything here can be exercised against in-memory containers.

*/

pub mod archive;
pub mod columns;
pub mod discovery;
pub mod errors;
pub mod layout;
pub mod lookups;
pub mod merge;
pub mod mock;
mod pipe;
pub mod sed;

pub use errors::{Result, SharkError};
