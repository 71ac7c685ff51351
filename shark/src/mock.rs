// Copyright 2024 Peter Williams and collaborators
// Licensed under the MIT License.

//! Scraping Shark "mocksky" lightcone files.
//!
//! Each mock file holds two top-level groups, `galaxies` and `groups`, each
//! a set of equal-length one-dimensional datasets. Every dataset becomes a
//! column of the corresponding output table.

use mockcat_core::container::{item_path, Container, ContainerOpener};
use mockcat_core::notify::NotificationBackend;
use mockcat_core::table::{Column, Table};
use mockcat_core::{ctry, mc_note};
use std::fmt;
use std::path::PathBuf;

use crate::errors::Result;

/// The kinds of table stored in a mock file.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum FileType {
    Galaxies,
    Groups,
}

impl FileType {
    /// The name of the top-level group holding this kind of table.
    pub fn group_name(self) -> &'static str {
        match self {
            FileType::Galaxies => "galaxies",
            FileType::Groups => "groups",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.group_name())
    }
}

/// The tables scraped from a set of mock files.
#[derive(Clone, Debug, PartialEq)]
pub struct MockTables {
    pub galaxies: Table,
    pub groups: Table,
}

/// Read every dataset in one group of a mock file into a table.
///
/// Columns appear in member-name order.
pub fn scrape_mock_group<C: Container>(container: &C, file_type: FileType) -> Result<Table> {
    let group = file_type.group_name();
    let mut columns = Vec::new();

    for name in container.member_names(group)? {
        let path = item_path(group, &name);
        let data = ctry!(container.read_dataset(&path).and_then(|ds| ds.into_vector());
                         "failed to read column \"{}\"", path);
        columns.push(Column::new(name, data));
    }

    Ok(Table::from_columns(columns)?)
}

/// Scrape the galaxy and group tables out of each mock file, in the order
/// given, and stack them.
pub fn scrape_all_mock_data<O: ContainerOpener>(
    opener: &O,
    paths: &[PathBuf],
    nbe: &mut dyn NotificationBackend,
) -> Result<MockTables> {
    let mut galaxy_tables = Vec::with_capacity(paths.len());
    let mut group_tables = Vec::with_capacity(paths.len());

    for path in paths {
        mc_note!(nbe, "scraping mock file \"{}\"", path.display());

        let container = ctry!(opener.open(path); "failed to open \"{}\"", path.display());
        galaxy_tables.push(scrape_mock_group(&container, FileType::Galaxies)?);
        group_tables.push(scrape_mock_group(&container, FileType::Groups)?);
    }

    Ok(MockTables {
        galaxies: Table::concat(galaxy_tables)?,
        groups: Table::concat(group_tables)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockcat_core::container::{ColumnData, MemoryContainer, MemoryOpener};
    use mockcat_core::notify::NoopNotificationBackend;

    fn mock(ids: Vec<i64>, group_ids: Vec<i64>) -> MemoryContainer {
        let ra: Vec<f64> = ids.iter().map(|i| *i as f64 / 10.).collect();

        MemoryContainer::new()
            .with_column("galaxies/ra", ra)
            .with_column("galaxies/id_galaxy_sky", ids)
            .with_column("groups/id_group_sky", group_ids)
    }

    #[test]
    fn file_type_names() {
        assert_eq!(FileType::Galaxies.to_string(), "galaxies");
        assert_eq!(FileType::Groups.group_name(), "groups");
    }

    #[test]
    fn columns_follow_member_order() {
        let t = scrape_mock_group(&mock(vec![1, 2], vec![5]), FileType::Galaxies).unwrap();
        assert_eq!(t.column_names(), vec!["id_galaxy_sky", "ra"]);
        assert_eq!(t.n_rows(), 2);
    }

    #[test]
    fn stacks_in_given_order() {
        let mut opener = MemoryOpener::new();
        opener.insert("m.0.hdf5", mock(vec![1, 2], vec![10]));
        opener.insert("m.1.hdf5", mock(vec![3], vec![11, 12]));

        let paths = vec![PathBuf::from("m.1.hdf5"), PathBuf::from("m.0.hdf5")];
        let tables =
            scrape_all_mock_data(&opener, &paths, &mut NoopNotificationBackend::new()).unwrap();

        assert_eq!(
            tables.galaxies.column("id_galaxy_sky").unwrap().data,
            ColumnData::Int64(vec![3, 1, 2])
        );
        assert_eq!(
            tables.groups.column("id_group_sky").unwrap().data,
            ColumnData::Int64(vec![11, 12, 10])
        );
    }

    #[test]
    fn missing_file_fails() {
        let opener = MemoryOpener::new();
        let paths = vec![PathBuf::from("m.0.hdf5")];
        let r = scrape_all_mock_data(&opener, &paths, &mut NoopNotificationBackend::new());
        assert!(r.unwrap_err().to_string().contains("m.0.hdf5"));
    }
}
