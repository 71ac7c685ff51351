// Copyright 2024 Peter Williams and collaborators
// Licensed under the MIT License.

/*!
Finding the chunk files of a catalogue and putting them in order.

Catalogues are split into one file per chunk, with the chunk index embedded
in the file name right after a fixed prefix: `mocksky.0.hdf5`,
`mocksky.1.hdf5`, ... or `Sting-SED-eagle-rr14_00.hdf5`, ... Chunks must be
concatenated in index order, and that order has to be numeric, so that chunk
10 comes after chunk 2.

*/

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{Result, SharkError};

/// The extension of the catalogue files we normally deal with.
pub const DEFAULT_EXTENSION: &str = "hdf5";

/// Extract the chunk index embedded in *file_name* after *prefix*.
///
/// The index is the first dot-delimited segment following the prefix, with
/// a single leading dot skipped. Returns None if the name does not start
/// with the prefix or the segment is not a non-negative integer.
pub fn file_index(file_name: &str, prefix: &str) -> Option<u64> {
    let rest = file_name.strip_prefix(prefix)?;
    let rest = rest.strip_prefix('.').unwrap_or(rest);
    let segment = rest.split('.').next()?;

    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    segment.parse().ok()
}

fn compare_names(a: &str, b: &str, prefix: &str) -> Ordering {
    match (file_index(a, prefix), file_index(b, prefix)) {
        (Some(ia), Some(ib)) => ia.cmp(&ib).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Sort file names in place by their embedded chunk index.
///
/// Names without a parseable index go after all of the indexed ones, in
/// plain lexical order.
pub fn sort_by_index<S: AsRef<str>>(names: &mut [S], prefix: &str) {
    names.sort_by(|a, b| compare_names(a.as_ref(), b.as_ref(), prefix));
}

/// List the catalogue files in *dir* and return their paths in chunk order.
///
/// A file matches if its name starts with *prefix* and ends with
/// `.{extension}`. Finding no matches at all is an error.
pub fn discover<P: AsRef<Path>>(dir: P, prefix: &str, extension: &str) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let suffix = format!(".{extension}");
    let mut names = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;

        if !entry.file_type()?.is_file() {
            continue;
        }

        let name = match entry.file_name().into_string() {
            Ok(n) => n,
            Err(_) => continue,
        };

        if name.starts_with(prefix) && name.ends_with(&suffix) {
            names.push(name);
        }
    }

    if names.is_empty() {
        return Err(SharkError::NoInputFiles {
            dir: dir.to_owned(),
            prefix: prefix.to_owned(),
            extension: extension.to_owned(),
        });
    }

    sort_by_index(&mut names, prefix);
    Ok(names.into_iter().map(|n| dir.join(n)).collect())
}
