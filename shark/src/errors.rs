// Copyright 2024 Peter Williams and collaborators
// Licensed under the MIT License.

//! Error types for the Shark catalogue tools.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// An error arising while scraping Shark catalogues or writing their
/// metadata.
#[derive(Error, Debug)]
pub enum SharkError {
    #[error(transparent)]
    Core(#[from] mockcat_core::Error),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// A JSON input file that does not have the expected structure.
    #[error("failed to parse \"{}\"", .path.display())]
    BadJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Discovery found nothing to work on.
    #[error("no files named like \"{prefix}*.{extension}\" in \"{}\"", .dir.display())]
    NoInputFiles {
        dir: PathBuf,
        prefix: String,
        extension: String,
    },

    /// A lookup table has no entry for a key that was needed.
    #[error("the {table} lookup table has no entry for \"{key}\"")]
    MissingLookup { table: String, key: String },

    /// A radio filter that is not in the band-range table.
    #[error("no frequency range is known for the top-hat filter \"{0}\"")]
    UnknownBandRange(String),

    /// A value that would corrupt a pipe-delimited metadata file.
    #[error("field {field} of \"{record}\" contains a delimiter or line break: {value:?}")]
    DelimiterInField {
        record: String,
        field: &'static str,
        value: String,
    },

    /// A pipe-delimited line that does not have the expected fields.
    #[error("malformed metadata record {0:?}")]
    MalformedRecord(String),

    /// An SED file without any filter names.
    #[error("the SED file \"{}\" lists no filters", .0.display())]
    MissingFilters(PathBuf),

    /// An SED magnitude array with fewer rows than there are filters.
    #[error("\"{path}\" has {rows} rows but {filters} filters are listed")]
    TooFewFilterRows {
        path: String,
        rows: usize,
        filters: usize,
    },

    /// A dataset attribute that is present but holds no text.
    #[error("the \"{attribute}\" attribute of \"{item}\" is empty")]
    EmptyAttribute { item: String, attribute: String },
}

/// A Result type whose error is [`SharkError`].
pub type Result<T> = std::result::Result<T, SharkError>;
