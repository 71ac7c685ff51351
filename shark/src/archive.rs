// Copyright 2024 Peter Williams and collaborators
// Licensed under the MIT License.

/*!
Table and group metadata for the archive.

An archive *group* is a collection of related catalogue tables, e.g. all of
the tables of one survey geometry. Each group and each table is described by
one row of a pipe-delimited file.

*/

use mockcat_core::ctry;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::errors::Result;
use crate::pipe;

/// The header of a table metadata file.
pub const TABLE_META_HEADER: [&str; 8] = [
    "name",
    "description",
    "documentation",
    "group_name",
    "filename",
    "contact",
    "date",
    "version",
];

/// The header of a group metadata file.
pub const GROUP_META_HEADER: [&str; 7] = [
    "name",
    "pretty_name",
    "description",
    "documentation",
    "contact",
    "date",
    "version",
];

/// Today's local date, formatted `YYYY-MM-DD`.
pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// The archive description of one output catalogue file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Table {
    pub name: String,
    pub file_name: String,
    pub description: String,
    pub date: String,
    pub documentation: String,
}

impl Table {
    /// Describe a table created today, without documentation.
    pub fn new<S1, S2, S3>(name: S1, file_name: S2, description: S3) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        Table {
            name: name.into(),
            file_name: file_name.into(),
            description: description.into(),
            date: today(),
            documentation: String::new(),
        }
    }

    /// Set the creation date.
    pub fn with_date<S: Into<String>>(mut self, date: S) -> Self {
        self.date = date.into();
        self
    }

    /// Set the documentation link.
    pub fn with_documentation<S: Into<String>>(mut self, documentation: S) -> Self {
        self.documentation = documentation.into();
        self
    }
}

/// The archive description of a collection of tables.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Group {
    pub name: String,
    pub pretty_name: String,
    pub description: String,
    pub contact: String,
    pub documentation: String,
    pub date: String,
    pub tables: Vec<Table>,
}

impl Group {
    /// Describe a group created today, without documentation.
    pub fn new<S1, S2, S3, S4>(
        name: S1,
        pretty_name: S2,
        tables: Vec<Table>,
        description: S3,
        contact: S4,
    ) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
        S4: Into<String>,
    {
        Group {
            name: name.into(),
            pretty_name: pretty_name.into(),
            description: description.into(),
            contact: contact.into(),
            documentation: String::new(),
            date: today(),
            tables,
        }
    }

    /// Set the creation date.
    pub fn with_date<S: Into<String>>(mut self, date: S) -> Self {
        self.date = date.into();
        self
    }

    /// Set the documentation link.
    pub fn with_documentation<S: Into<String>>(mut self, documentation: S) -> Self {
        self.documentation = documentation.into();
        self
    }
}

#[derive(Serialize)]
struct TableRow<'a> {
    name: &'a str,
    description: &'a str,
    documentation: &'a str,
    group_name: &'a str,
    filename: &'a str,
    contact: &'a str,
    date: &'a str,
    version: &'a str,
}

impl<'a> TableRow<'a> {
    fn new(group: &'a Group, table: &'a Table, version: &'a str) -> Self {
        TableRow {
            name: &table.name,
            description: &table.description,
            documentation: &table.documentation,
            group_name: &group.name,
            filename: &table.file_name,
            contact: &group.contact,
            date: &table.date,
            version,
        }
    }

    fn validate(&self) -> Result<()> {
        let fields = [
            ("description", self.description),
            ("documentation", self.documentation),
            ("group_name", self.group_name),
            ("filename", self.filename),
            ("contact", self.contact),
            ("date", self.date),
            ("version", self.version),
        ];

        pipe::check_field(self.name, "name", self.name)?;

        for &(field, value) in fields.iter() {
            pipe::check_field(self.name, field, value)?;
        }

        Ok(())
    }
}

#[derive(Serialize)]
struct GroupRow<'a> {
    name: &'a str,
    pretty_name: &'a str,
    description: &'a str,
    documentation: &'a str,
    contact: &'a str,
    date: &'a str,
    version: &'a str,
}

impl<'a> GroupRow<'a> {
    fn new(group: &'a Group, version: &'a str) -> Self {
        GroupRow {
            name: &group.name,
            pretty_name: &group.pretty_name,
            description: &group.description,
            documentation: &group.documentation,
            contact: &group.contact,
            date: &group.date,
            version,
        }
    }

    fn validate(&self) -> Result<()> {
        let fields = [
            ("pretty_name", self.pretty_name),
            ("description", self.description),
            ("documentation", self.documentation),
            ("contact", self.contact),
            ("date", self.date),
            ("version", self.version),
        ];

        pipe::check_field(self.name, "name", self.name)?;

        for &(field, value) in fields.iter() {
            pipe::check_field(self.name, field, value)?;
        }

        Ok(())
    }
}

/// Write the group metadata rows, one per group.
pub fn write_group_meta<W: Write>(dest: W, groups: &[Group], version: &str) -> Result<()> {
    let rows: Vec<_> = groups.iter().map(|g| GroupRow::new(g, version)).collect();

    for row in &rows {
        row.validate()?;
    }

    let mut w = pipe::writer(dest, &GROUP_META_HEADER)?;

    for row in &rows {
        w.serialize(row)?;
    }

    w.flush()?;
    Ok(())
}

/// Write the table metadata rows, one per table of every group.
pub fn write_table_meta<W: Write>(dest: W, groups: &[Group], version: &str) -> Result<()> {
    let rows: Vec<_> = groups
        .iter()
        .flat_map(|g| g.tables.iter().map(move |t| TableRow::new(g, t, version)))
        .collect();

    for row in &rows {
        row.validate()?;
    }

    let mut w = pipe::writer(dest, &TABLE_META_HEADER)?;

    for row in &rows {
        w.serialize(row)?;
    }

    w.flush()?;
    Ok(())
}

/// The files written by `write_directory_meta_data`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DirectoryMetaFiles {
    pub group_meta: PathBuf,
    pub table_meta: PathBuf,
}

/// Write `{prefix}_group_meta.txt` and `{prefix}_table_meta.txt` into
/// *out_dir*.
pub fn write_directory_meta_data<P: AsRef<Path>>(
    groups: &[Group],
    out_dir: P,
    prefix: &str,
    version: &str,
) -> Result<DirectoryMetaFiles> {
    let out_dir = out_dir.as_ref();
    let files = DirectoryMetaFiles {
        group_meta: out_dir.join(format!("{prefix}_group_meta.txt")),
        table_meta: out_dir.join(format!("{prefix}_table_meta.txt")),
    };

    let f = ctry!(File::create(&files.group_meta); "failed to create \"{}\"", files.group_meta.display());
    write_group_meta(BufWriter::new(f), groups, version)?;

    let f = ctry!(File::create(&files.table_meta); "failed to create \"{}\"", files.table_meta.display());
    write_table_meta(BufWriter::new(f), groups, version)?;

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups() -> Vec<Group> {
        let deep = Group::new(
            "waves-deep",
            "WAVES Deep",
            vec![
                Table::new("WavesDeepGals", "WavesDeepGals.csv", "Galaxies in the deep lightcone")
                    .with_date("2024-05-01"),
                Table::new("WavesDeepGroups", "WavesDeepGroups.csv", "Groups in the deep lightcone")
                    .with_date("2024-05-02")
                    .with_documentation("https://example.org/groups"),
            ],
            "Shark mock lightcones in the geometry of WAVES-deep.",
            "A. Person <a.person@example.org>",
        )
        .with_date("2024-05-03");

        let wide = Group::new(
            "waves-wide",
            "WAVES Wide",
            vec![],
            "Shark mock lightcones in the geometry of WAVES-wide.",
            "B. Person <b.person@example.org>",
        )
        .with_date("2024-05-04");

        vec![deep, wide]
    }

    #[test]
    fn today_format() {
        let d = today();
        assert_eq!(d.len(), 10);
        assert!(chrono::NaiveDate::parse_from_str(&d, "%Y-%m-%d").is_ok());
    }

    #[test]
    fn defaults() {
        let t = Table::new("a", "a.csv", "A table");
        assert_eq!(t.documentation, "");
        assert_eq!(t.date, today());
    }

    #[test]
    fn group_rows() {
        let mut buf = Vec::new();
        write_group_meta(&mut buf, &groups(), "v0.3.1").unwrap();

        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "name|pretty_name|description|documentation|contact|date|version\n\
             waves-deep|WAVES Deep|Shark mock lightcones in the geometry of WAVES-deep.||A. Person <a.person@example.org>|2024-05-03|v0.3.1\n\
             waves-wide|WAVES Wide|Shark mock lightcones in the geometry of WAVES-wide.||B. Person <b.person@example.org>|2024-05-04|v0.3.1\n"
        );
    }

    #[test]
    fn table_rows_carry_group_contact() {
        let mut buf = Vec::new();
        write_table_meta(&mut buf, &groups(), "v0.3.1").unwrap();

        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "name|description|documentation|group_name|filename|contact|date|version\n\
             WavesDeepGals|Galaxies in the deep lightcone||waves-deep|WavesDeepGals.csv|A. Person <a.person@example.org>|2024-05-01|v0.3.1\n\
             WavesDeepGroups|Groups in the deep lightcone|https://example.org/groups|waves-deep|WavesDeepGroups.csv|A. Person <a.person@example.org>|2024-05-02|v0.3.1\n"
        );
    }

    #[test]
    fn bad_version_rejected() {
        let mut buf = Vec::new();
        assert!(write_group_meta(&mut buf, &groups(), "v1|v2").is_err());
    }

    #[test]
    fn files_named_by_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let files = write_directory_meta_data(&groups(), dir.path(), "waves_shark", "v1").unwrap();

        assert_eq!(files.group_meta, dir.path().join("waves_shark_group_meta.txt"));
        assert_eq!(files.table_meta, dir.path().join("waves_shark_table_meta.txt"));

        let tables = std::fs::read_to_string(&files.table_meta).unwrap();
        assert_eq!(tables.lines().count(), 3);
    }
}
