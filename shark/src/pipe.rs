// Copyright 2024 Peter Williams and collaborators
// Licensed under the MIT License.

//! Plumbing for the pipe-delimited metadata files.
//!
//! These files are positional and unquoted, so a field may not contain the
//! delimiter or a line break. We check for that up front rather than
//! producing a file the archive would misread.

use std::io::{Read, Write};

use crate::errors::{Result, SharkError};

pub(crate) const DELIMITER: u8 = b'|';

/// Create a writer for a pipe-delimited file and emit its header row.
pub(crate) fn writer<W: Write>(dest: W, header: &[&str]) -> Result<csv::Writer<W>> {
    let mut w = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .has_headers(false)
        .from_writer(dest);
    w.write_record(header)?;
    Ok(w)
}

/// Create a reader for a pipe-delimited file with a header row.
pub(crate) fn reader<R: Read>(src: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .quoting(false)
        .has_headers(true)
        .from_reader(src)
}

/// Check that *value* can be stored as field *field* of the record named
/// *record*.
pub(crate) fn check_field(record: &str, field: &'static str, value: &str) -> Result<()> {
    if value.contains(|c: char| c == '|' || c == '\n' || c == '\r') {
        return Err(SharkError::DelimiterInField {
            record: record.to_owned(),
            field,
            value: value.to_owned(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields() {
        assert!(check_field("ra", "description", "right ascension (J2000)").is_ok());
        assert!(check_field("ra", "description", "a|b").is_err());
        assert!(check_field("ra", "description", "two\nlines").is_err());
    }

    #[test]
    fn header_always_written() {
        let mut buf = Vec::new();
        writer(&mut buf, &["a", "b"]).unwrap().flush().unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "a|b\n");
    }
}
