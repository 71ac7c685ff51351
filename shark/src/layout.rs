// Copyright 2024 Peter Williams and collaborators
// Licensed under the MIT License.

/*!
Archive layout files.

A layout is a JSON document saying which archive groups exist, which tables
each group holds, and where each table's columns come from. For instance:

```json
{
  "version": "v0.3.1",
  "output_prefix": "waves_shark",
  "lookups": {
    "data_types": "data_types.json",
    "galaxies_ucd": "galaxies_ucd.json",
    "groups_ucd": "groups_ucd.json"
  },
  "mock_file": "shark_hdf5/mocksky.0.hdf5",
  "sed_file": "shark_hdf5/Sting-SED-eagle-rr14_00.hdf5",
  "preamble": "preamble.txt",
  "groups": [
    {
      "name": "waves-wide",
      "pretty_name": "WAVES Wide",
      "description": "Shark mock lightcones in the geometry of WAVES-wide.",
      "contact": "A. Person <a.person@example.org>",
      "tables": [
        {
          "name": "WavesWideGals",
          "description": "Galaxies in the WAVES-wide mock lightcone.",
          "sources": ["galaxies", "sed"]
        }
      ]
    }
  ]
}
```

Relative paths are resolved against the directory containing the layout
file. A table's `file_name` defaults to `{name}.csv`; `documentation` and
`date` are optional for both groups and tables.

*/

use mockcat_core::container::ContainerOpener;
use mockcat_core::notify::NotificationBackend;
use mockcat_core::{ctry, mc_note};
use serde::Deserialize;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::archive::{self, write_directory_meta_data, DirectoryMetaFiles, Group};
use crate::columns::{
    create_metadata_table_from_mock, create_metadata_table_from_sed, write_meta_data_file,
    ColumnMetaData,
};
use crate::errors::{Result, SharkError};
use crate::lookups::Lookups;
use crate::mock::FileType;

/// Where a table's columns come from.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ColumnSource {
    /// The `galaxies` group of the mock file.
    Galaxies,
    /// The `groups` group of the mock file.
    Groups,
    /// The magnitude columns of the SED file.
    Sed,
}

/// The paths of the three lookup files.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LookupPaths {
    pub data_types: PathBuf,
    pub galaxies_ucd: PathBuf,
    pub groups_ucd: PathBuf,
}

/// One table of an archive group.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TableLayout {
    pub name: String,
    #[serde(default)]
    pub file_name: Option<String>,
    pub description: String,
    #[serde(default)]
    pub documentation: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    pub sources: Vec<ColumnSource>,
}

/// One archive group.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GroupLayout {
    pub name: String,
    pub pretty_name: String,
    pub description: String,
    pub contact: String,
    #[serde(default)]
    pub documentation: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    pub tables: Vec<TableLayout>,
}

/// A complete archive layout.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ArchiveLayout {
    pub version: String,
    pub output_prefix: String,
    pub lookups: LookupPaths,
    pub mock_file: PathBuf,
    pub sed_file: PathBuf,
    #[serde(default)]
    pub preamble: Option<PathBuf>,
    pub groups: Vec<GroupLayout>,
}

fn resolve(base: &Path, path: &mut PathBuf) {
    if path.is_relative() {
        *path = base.join(&*path);
    }
}

impl ArchiveLayout {
    /// Parse a layout from JSON text. Paths are left as written.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a layout file, resolving its relative paths against the
    /// directory that contains it.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = ctry!(fs::read_to_string(path); "failed to read \"{}\"", path.display());

        let mut layout: ArchiveLayout =
            serde_json::from_str(&text).map_err(|source| SharkError::BadJson {
                path: path.to_owned(),
                source,
            })?;

        if let Some(base) = path.parent() {
            layout.resolve_paths(base);
        }

        Ok(layout)
    }

    /// Make every relative input path relative to *base* instead.
    pub fn resolve_paths(&mut self, base: &Path) {
        resolve(base, &mut self.lookups.data_types);
        resolve(base, &mut self.lookups.galaxies_ucd);
        resolve(base, &mut self.lookups.groups_ucd);
        resolve(base, &mut self.mock_file);
        resolve(base, &mut self.sed_file);

        if let Some(p) = self.preamble.as_mut() {
            resolve(base, p);
        }
    }

    /// Load the lookup tables named by this layout.
    pub fn load_lookups(&self) -> Result<Lookups> {
        Lookups::load(
            &self.lookups.data_types,
            &self.lookups.galaxies_ucd,
            &self.lookups.groups_ucd,
        )
    }

    /// Build the archive groups described by this layout.
    ///
    /// Groups without documentation of their own take *default_documentation*,
    /// if given. Missing dates default to today.
    pub fn archive_groups(&self, default_documentation: Option<&str>) -> Vec<Group> {
        self.groups
            .iter()
            .map(|g| {
                let tables = g
                    .tables
                    .iter()
                    .map(|t| {
                        let file_name = t
                            .file_name
                            .clone()
                            .unwrap_or_else(|| format!("{}.csv", t.name));
                        let mut table = archive::Table::new(t.name.as_str(), file_name, t.description.as_str());

                        if let Some(d) = &t.documentation {
                            table = table.with_documentation(d.as_str());
                        }

                        if let Some(d) = &t.date {
                            table = table.with_date(d.as_str());
                        }

                        table
                    })
                    .collect();

                let mut group = Group::new(
                    g.name.as_str(),
                    g.pretty_name.as_str(),
                    tables,
                    g.description.as_str(),
                    g.contact.as_str(),
                );

                if let Some(d) = g.documentation.as_deref().or(default_documentation) {
                    group = group.with_documentation(d);
                }

                if let Some(d) = &g.date {
                    group = group.with_date(d.as_str());
                }

                group
            })
            .collect()
    }

    /// Scrape the column metadata of every table, in layout order: per
    /// group, per table, per source.
    ///
    /// The mock and SED files are each opened at most once.
    pub fn column_metadata<O: ContainerOpener>(
        &self,
        opener: &O,
        lookups: &Lookups,
        nbe: &mut dyn NotificationBackend,
    ) -> Result<Vec<Vec<ColumnMetaData>>> {
        let mut mock: Option<O::Container> = None;
        let mut sed: Option<O::Container> = None;
        let mut tables = Vec::new();

        for group in &self.groups {
            for table in &group.tables {
                mc_note!(nbe, "describing the columns of table \"{}\"", table.name);

                for source in &table.sources {
                    let records = match source {
                        ColumnSource::Galaxies | ColumnSource::Groups => {
                            let file_type = if *source == ColumnSource::Galaxies {
                                FileType::Galaxies
                            } else {
                                FileType::Groups
                            };

                            let c = match mock.take() {
                                Some(c) => c,
                                None => ctry!(opener.open(&self.mock_file);
                                              "failed to open \"{}\"", self.mock_file.display()),
                            };
                            let c = mock.insert(c);
                            create_metadata_table_from_mock(&*c, &table.name, file_type, lookups)?
                        }

                        ColumnSource::Sed => {
                            let c = match sed.take() {
                                Some(c) => c,
                                None => ctry!(opener.open(&self.sed_file);
                                              "failed to open \"{}\"", self.sed_file.display()),
                            };
                            let c = sed.insert(c);
                            create_metadata_table_from_sed(&*c, &table.name)?
                        }
                    };

                    tables.push(records);
                }
            }
        }

        Ok(tables)
    }
}

/// Read a preamble file, line by line.
pub fn read_preamble<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let f = ctry!(File::open(path); "failed to open \"{}\"", path.display());
    let mut lines = Vec::new();

    for line in BufReader::new(f).lines() {
        lines.push(ctry!(line; "failed to read \"{}\"", path.display()));
    }

    Ok(lines)
}

/// Collapse preamble lines into a single metadata field: the non-empty
/// trimmed lines, joined by single spaces.
pub fn preamble_documentation<S: AsRef<str>>(lines: &[S]) -> String {
    lines
        .iter()
        .map(|l| l.as_ref().trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// The files written by `write_archive_metadata`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MetadataReport {
    pub column_meta: PathBuf,
    pub n_columns: usize,
    pub directory: DirectoryMetaFiles,
}

/// Write the column, table and group metadata files described by *layout*
/// into *out_dir*.
pub fn write_archive_metadata<O: ContainerOpener, P: AsRef<Path>>(
    opener: &O,
    layout: &ArchiveLayout,
    out_dir: P,
    nbe: &mut dyn NotificationBackend,
) -> Result<MetadataReport> {
    let out_dir = out_dir.as_ref();
    let lookups = layout.load_lookups()?;
    let tables = layout.column_metadata(opener, &lookups, nbe)?;

    let documentation = match &layout.preamble {
        Some(p) => Some(preamble_documentation(&read_preamble(p)?)),
        None => None,
    };

    let groups = layout.archive_groups(documentation.as_deref());

    let column_meta = out_dir.join(format!("{}_column_meta.txt", layout.output_prefix));
    mc_note!(nbe, "writing column metadata to \"{}\"", column_meta.display());
    write_meta_data_file(&column_meta, &tables)?;

    mc_note!(nbe, "writing table and group metadata for version {}", layout.version);
    let directory = write_directory_meta_data(&groups, out_dir, &layout.output_prefix, &layout.version)?;

    Ok(MetadataReport {
        column_meta,
        n_columns: tables.iter().map(|t| t.len()).sum(),
        directory,
    })
}
