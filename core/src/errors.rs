// Copyright 2017-2024 Peter Williams and collaborators
// Licensed under the MIT License.

/*!
The core error type used by mockcat crates.

Format crates either return this type directly or wrap it in their own
`thiserror` enums. Context can be attached to any error that converts into
[`Error`] with the [`ctry!`] macro.

*/

use std::io;
use thiserror::Error as ThisError;

use crate::container::ElementType;

/// The generic error type for mockcat core operations.
#[derive(ThisError, Debug)]
pub enum Error {
    /// An I/O-related error.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// An error while writing delimited text.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// An array could not be given the requested shape.
    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),

    /// An array did not have the expected dimensionality.
    #[error("expected {0}-dimensional array but found one that was {1}-dimensional")]
    DimensionMismatch(usize, usize),

    /// The columns handed to a table were not all the same length.
    #[error("column \"{column}\" has {actual} rows but the table has {expected}")]
    RaggedColumns {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// Two tables that were to be stacked vertically have different columns.
    #[error("cannot stack tables with different columns ({expected:?} vs. {actual:?})")]
    SchemaMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    /// Two columns that were to be joined hold different element types.
    #[error("column \"{column}\" holds {expected} values but {actual} values were appended")]
    TypeMismatch {
        column: String,
        expected: ElementType,
        actual: ElementType,
    },

    /// Two tables that were to be joined side by side have different lengths.
    #[error("cannot join a table of {left} rows with one of {right} rows")]
    RowCountMismatch { left: usize, right: usize },

    /// A group or dataset does not exist in a container.
    #[error("no such item \"{0}\"")]
    NoSuchItem(String),

    /// A dataset does not carry the requested attribute.
    #[error("item \"{item}\" has no attribute \"{attribute}\"")]
    NoSuchAttribute { item: String, attribute: String },

    /// A container backend failed while accessing an item.
    #[error("failed to access \"{path}\"")]
    Backend {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// Some other error, with extra explanatory text.
    #[error("{message}")]
    Context {
        message: String,
        #[source]
        source: Box<Error>,
    },

    /// A free-form error message.
    #[error("{0}")]
    Msg(String),
}

/// A Result type whose error is [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap a backend failure associated with the item at *path*.
    pub fn backend<E>(path: impl Into<String>, source: E) -> Error
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Backend {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// Attach explanatory text to this error.
    pub fn context(self, message: String) -> Error {
        Error::Context {
            message,
            source: Box::new(self),
        }
    }
}

/// A “chained try” macro.
///
/// Attempts an operation that returns a Result and returns its Ok value if
/// the operation is successful. If not, it returns an Err value that chains
/// to the Err value that was returned. The new error is an
/// `Error::Context` whose message is formatted using the `format!` macro.
/// Example:
///
/// ```rust
/// # use mockcat_core::{ctry, Result};
/// use std::io::{Write, stdout};
///
/// fn write_or_complain() -> Result<()> {
///     let dest = "standard output";
///     ctry!(write!(stdout(), "hello"); "couldn't write to {}", dest);
///     Ok(())
/// }
/// # write_or_complain().unwrap();
/// ```
///
/// Note that the operation to be attempted and the arguments to `format!` are
/// separated by a semicolon within the `ctry!()` parentheses.
#[macro_export]
macro_rules! ctry {
    ($op:expr ; $( $chain_fmt_args:expr ),*) => {
        match $op {
            Ok(v) => v,
            Err(e) => {
                let e: $crate::errors::Error = e.into();
                return Err(e.context(format!($( $chain_fmt_args ),*)).into());
            }
        }
    }
}

/// Format an error message.
///
/// This convenience macro expands into an `Err(Error::Msg(...))` object,
/// with the message formatted using the standard `format!` machinery.
#[macro_export]
macro_rules! err_msg {
    ($( $fmt_args:expr ),*) => {
        Err($crate::errors::Error::Msg(format!($( $fmt_args ),*)).into())
    }
}
