// Copyright 2024 Peter Williams and collaborators
// Licensed under the MIT License.

//! Scraping Stingray SED files.
//!
//! An SED file lists the names of its photometric filters in the `filters`
//! dataset and stores magnitudes in two-dimensional arrays of shape
//! (filter, galaxy), one per magnitude kind, under `SED/`. We only ever use
//! the dust-attenuated magnitudes of the "total" (bulge plus disk)
//! component.

use mockcat_core::container::{Container, ContainerOpener};
use mockcat_core::notify::NotificationBackend;
use mockcat_core::table::{Column, Table};
use mockcat_core::{ctry, mc_note};
use std::path::PathBuf;

use crate::errors::{Result, SharkError};

/// The path of the filter-name dataset.
pub const FILTERS_PATH: &str = "filters";

/// The two kinds of magnitude recorded for each filter.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MagnitudeKind {
    Apparent,
    Absolute,
}

impl MagnitudeKind {
    /// Both kinds, in column order.
    pub const ALL: [MagnitudeKind; 2] = [MagnitudeKind::Apparent, MagnitudeKind::Absolute];

    /// The lower-case name used in column names.
    pub fn name(self) -> &'static str {
        match self {
            MagnitudeKind::Apparent => "apparent",
            MagnitudeKind::Absolute => "absolute",
        }
    }

    /// The capitalized name used in descriptions.
    pub fn title(self) -> &'static str {
        match self {
            MagnitudeKind::Apparent => "Apparent",
            MagnitudeKind::Absolute => "Absolute",
        }
    }

    /// The UCD of magnitudes of this kind.
    pub fn ucd(self) -> &'static str {
        match self {
            MagnitudeKind::Apparent => "phot.mag",
            MagnitudeKind::Absolute => "phys.magAbs",
        }
    }

    /// The dataset holding the dust-attenuated total magnitudes of this kind.
    pub fn dataset_path(self) -> &'static str {
        match self {
            MagnitudeKind::Apparent => "SED/ap_dust/total",
            MagnitudeKind::Absolute => "SED/ab_dust/total",
        }
    }

    /// The output column name for this kind of magnitude in *filter*.
    pub fn column_name(self, filter: &str) -> String {
        format!("{}_{}_mag", filter, self.name())
    }
}

/// Read the filter names listed in an SED file.
pub fn read_filter_names<C: Container>(container: &C) -> Result<Vec<String>> {
    let data = ctry!(container.read_dataset(FILTERS_PATH).and_then(|ds| ds.into_vector());
                     "failed to read the SED filter list");

    match data.as_strings() {
        Some(names) => Ok(names.to_vec()),
        None => Err(mockcat_core::Error::Msg(format!(
            "the SED filter list holds {} values rather than strings",
            data.element_type()
        ))
        .into()),
    }
}

/// Build the magnitude table of one SED file.
///
/// For each filter, in order, the table gets an apparent and an absolute
/// magnitude column. Magnitude arrays with more rows than there are filters
/// are fine; the extras are ignored.
pub fn scrape_sed_file<C: Container>(container: &C, filters: &[String]) -> Result<Table> {
    let mut rows_by_kind = Vec::with_capacity(MagnitudeKind::ALL.len());

    for kind in MagnitudeKind::ALL.iter() {
        let path = kind.dataset_path();
        let ds = ctry!(container.read_dataset(path); "failed to read \"{}\"", path);
        let rows = ctry!(ds.data.split_rows(&ds.shape); "unexpected layout of \"{}\"", path);

        if rows.len() < filters.len() {
            return Err(SharkError::TooFewFilterRows {
                path: path.to_owned(),
                rows: rows.len(),
                filters: filters.len(),
            });
        }

        rows_by_kind.push(rows.into_iter());
    }

    let mut columns = Vec::with_capacity(2 * filters.len());

    for filter in filters {
        for (kind, rows) in MagnitudeKind::ALL.iter().zip(rows_by_kind.iter_mut()) {
            // The length check above guarantees a row per filter.
            if let Some(row) = rows.next() {
                columns.push(Column::new(kind.column_name(filter), row));
            }
        }
    }

    Ok(Table::from_columns(columns)?)
}

/// Scrape every SED file, in the order given, and stack the results.
///
/// The filter list is read from the first file only and assumed to apply to
/// all of them.
pub fn scrape_all_sed_data<O: ContainerOpener>(
    opener: &O,
    paths: &[PathBuf],
    nbe: &mut dyn NotificationBackend,
) -> Result<Table> {
    let first = match paths.first() {
        Some(p) => p,
        None => return Ok(Table::new()),
    };

    let filters = {
        let container = ctry!(opener.open(first); "failed to open \"{}\"", first.display());
        read_filter_names(&container)?
    };

    if filters.is_empty() {
        return Err(SharkError::MissingFilters(first.clone()));
    }

    mc_note!(nbe, "SED files list {} filters", filters.len());
    let mut tables = Vec::with_capacity(paths.len());

    for path in paths {
        mc_note!(nbe, "scraping SED file \"{}\"", path.display());
        let container = ctry!(opener.open(path); "failed to open \"{}\"", path.display());
        tables.push(scrape_sed_file(&container, &filters)?);
    }

    Ok(Table::concat(tables)?)
}
