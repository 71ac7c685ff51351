// Copyright 2024 Peter Williams and collaborators
// Licensed under the MIT License.

/*!
Column metadata: scraping it and writing it out.

Mock files annotate each dataset with a free-text `Comment` attribute that
embeds the unit in square brackets, e.g. `"right ascension [deg]"`. The SED
files carry no annotations at all, so their column metadata are synthesized
from the filter names.

*/

use mockcat_core::container::{item_path, Container};
use mockcat_core::ctry;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use crate::errors::{Result, SharkError};
use crate::lookups::Lookups;
use crate::mock::FileType;
use crate::pipe;
use crate::sed::{read_filter_names, MagnitudeKind};

/// The unit recorded for columns whose annotation does not give one.
pub const NO_UNIT: &str = "None";

/// The name of the annotation attribute on mock datasets.
pub const COMMENT_ATTRIBUTE: &str = "Comment";

/// The unit of all SED magnitudes.
pub const MAGNITUDE_UNIT: &str = "mag";

/// The data type recorded for all SED magnitudes.
pub const MAGNITUDE_DATA_TYPE: &str = "float32";

/// The header of a column metadata file.
pub const COLUMN_META_HEADER: [&str; 6] =
    ["name", "description", "table_name", "ucd", "unit", "data_type"];

/// The passbands of the top-hat radio filters.
pub const BAND_RANGES: &[(&str, &str)] = &[
    ("Band9_ALMA", "602 GHz - 720 GHz"),
    ("Band8_ALMA", "385 GHz - 500 GHz"),
    ("Band7_ALMA", "275 GHz - 373 GHz"),
    ("Band6_ALMA", "211 GHz - 275 GHz"),
    ("Band5_ALMA", "163 GHz - 211 GHz"),
    ("Band4_ALMA", "125 GHz - 163 GHz"),
    ("Band3_ALMA", "84 GHz - 116 GHz"),
    ("BandX_VLA", "24.98 mm - 37.47 mm"),
    ("BandC_VLA", "37.47 mm - 74.95 mm"),
    ("BandS_VLA", "74.95 mm - 149.9 mm"),
    ("BandL_VLA", "149.9 mm - 299.79 mm"),
    ("Band_610MHz", "454.23 mm - 535.34 mm"),
    ("Band_325MHz", "799.45 mm - 1090.15 mm"),
    ("Band_150MHz", "1498.96 mm - 2997.92 mm"),
];

/// Look up the passband of a top-hat radio filter.
pub fn band_range(filter: &str) -> Option<&'static str> {
    BAND_RANGES
        .iter()
        .find(|(name, _)| *name == filter)
        .map(|(_, range)| *range)
}

/// Whether *filter* names one of the top-hat radio bands rather than an
/// optical or infrared filter.
pub fn is_top_hat_band(filter: &str) -> bool {
    filter.contains("ALMA") || filter.contains("VLA") || filter.contains("MHz")
}

/// The archive metadata of one table column.
///
/// Field order matches the serialized order.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ColumnMetaData {
    pub name: String,
    pub description: String,
    pub table_name: String,
    pub ucd: String,
    pub unit: String,
    pub data_type: String,
}

impl ColumnMetaData {
    /// Create a new record.
    pub fn new<S1, S2, S3, S4, S5, S6>(
        name: S1,
        description: S2,
        table_name: S3,
        unit: S4,
        ucd: S5,
        data_type: S6,
    ) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
        S4: Into<String>,
        S5: Into<String>,
        S6: Into<String>,
    {
        ColumnMetaData {
            name: name.into(),
            description: description.into(),
            table_name: table_name.into(),
            ucd: ucd.into(),
            unit: unit.into(),
            data_type: data_type.into(),
        }
    }

    fn fields(&self) -> [(&'static str, &str); 6] {
        [
            ("name", self.name.as_str()),
            ("description", self.description.as_str()),
            ("table_name", self.table_name.as_str()),
            ("ucd", self.ucd.as_str()),
            ("unit", self.unit.as_str()),
            ("data_type", self.data_type.as_str()),
        ]
    }

    /// Check that every field can be written without corrupting the file.
    pub fn validate(&self) -> Result<()> {
        for &(field, value) in self.fields().iter() {
            pipe::check_field(&self.name, field, value)?;
        }

        Ok(())
    }

    /// Format this record as one pipe-delimited line, without a terminator.
    pub fn to_line(&self) -> Result<String> {
        self.validate()?;
        let values: Vec<&str> = self.fields().iter().map(|(_, v)| *v).collect();
        Ok(values.join("|"))
    }

    /// Parse a record from one pipe-delimited line, as produced by
    /// `to_line`. A trailing line terminator is ignored.
    pub fn from_line(line: &str) -> Result<Self> {
        let line = line.trim_end_matches(|c: char| c == '\n' || c == '\r');
        let pieces: Vec<&str> = line.split('|').collect();

        match pieces[..] {
            [name, description, table_name, ucd, unit, data_type] => Ok(ColumnMetaData {
                name: name.to_owned(),
                description: description.to_owned(),
                table_name: table_name.to_owned(),
                ucd: ucd.to_owned(),
                unit: unit.to_owned(),
                data_type: data_type.to_owned(),
            }),
            _ => Err(SharkError::MalformedRecord(line.to_owned())),
        }
    }
}

/// Split an annotation into its description and its unit.
///
/// The unit is whatever sits inside the last `[...]` of the text (running
/// to the end of the text if the bracket is never closed). The description
/// is the surrounding text, trimmed. Text without any `[` comes back
/// unchanged, with the unit `"None"`.
///
/// ```
/// # use mockcat_shark::columns::separate_unit_and_description;
/// assert_eq!(
///     separate_unit_and_description("ra of the galaxy [deg]"),
///     ("ra of the galaxy".to_owned(), "deg".to_owned())
/// );
/// ```
pub fn separate_unit_and_description(text: &str) -> (String, String) {
    let open = match text.rfind('[') {
        Some(i) => i,
        None => return (text.to_owned(), NO_UNIT.to_owned()),
    };

    let inner = &text[open + 1..];

    let (unit, after) = match inner.find(']') {
        Some(j) => (&inner[..j], &inner[j + 1..]),
        None => (inner, ""),
    };

    let before = text[..open].trim();
    let after = after.trim();

    let description = match (before.is_empty(), after.is_empty()) {
        (_, true) => before.to_owned(),
        (true, false) => after.to_owned(),
        (false, false) => format!("{before} {after}"),
    };

    (description, unit.trim().to_owned())
}

/// Build the column metadata of one table of a mock file.
///
/// Columns are described in member-name order, matching the order in which
/// `mock::scrape_mock_group` lays out the data.
pub fn create_metadata_table_from_mock<C: Container>(
    container: &C,
    table_name: &str,
    file_type: FileType,
    lookups: &Lookups,
) -> Result<Vec<ColumnMetaData>> {
    let group = file_type.group_name();
    let mut columns = Vec::new();

    for name in container.member_names(group)? {
        let path = item_path(group, &name);

        let comments = ctry!(container.string_attribute(&path, COMMENT_ATTRIBUTE);
                             "failed to read the annotation of \"{}\"", path);
        let comment = comments.first().ok_or_else(|| SharkError::EmptyAttribute {
            item: path.clone(),
            attribute: COMMENT_ATTRIBUTE.to_owned(),
        })?;

        let (description, unit) = separate_unit_and_description(comment);
        let ucd = lookups.ucd(file_type, &name)?;
        let element_type = container.element_type(&path)?;
        let data_type = lookups.data_type(element_type.type_name())?;

        columns.push(ColumnMetaData::new(
            name.as_str(),
            description,
            table_name,
            unit,
            ucd,
            data_type,
        ));
    }

    Ok(columns)
}

/// Synthesize the magnitude column metadata for a list of SED filters.
///
/// Records come in the same order as the columns of
/// `sed::scrape_sed_file`: per filter, apparent then absolute.
pub fn sed_metadata<S: AsRef<str>>(filters: &[S], table_name: &str) -> Result<Vec<ColumnMetaData>> {
    let mut records = Vec::with_capacity(2 * filters.len());

    for filter in filters {
        let filter = filter.as_ref();

        for kind in MagnitudeKind::ALL.iter() {
            let description = if is_top_hat_band(filter) {
                let range =
                    band_range(filter).ok_or_else(|| SharkError::UnknownBandRange(filter.to_owned()))?;
                format!(
                    "{} magnitude in the top-hat filter over the range {}",
                    kind.title(),
                    range
                )
            } else {
                format!("{} magnitude in filter {} (includes dust)", kind.title(), filter)
            };

            records.push(ColumnMetaData::new(
                kind.column_name(filter),
                description,
                table_name,
                MAGNITUDE_UNIT,
                kind.ucd(),
                MAGNITUDE_DATA_TYPE,
            ));
        }
    }

    Ok(records)
}

/// Build the magnitude column metadata of an SED file.
pub fn create_metadata_table_from_sed<C: Container>(
    container: &C,
    table_name: &str,
) -> Result<Vec<ColumnMetaData>> {
    let filters = read_filter_names(container)?;
    sed_metadata(&filters, table_name)
}

/// Write a column metadata file: the header, then every record of every
/// table, in order.
pub fn write_meta_data<W: Write>(dest: W, tables: &[Vec<ColumnMetaData>]) -> Result<()> {
    for record in tables.iter().flatten() {
        record.validate()?;
    }

    let mut w = pipe::writer(dest, &COLUMN_META_HEADER)?;

    for record in tables.iter().flatten() {
        w.serialize(record)?;
    }

    w.flush()?;
    Ok(())
}

/// Write a column metadata file to a newly created file at *path*.
pub fn write_meta_data_file<P: AsRef<Path>>(path: P, tables: &[Vec<ColumnMetaData>]) -> Result<()> {
    let path = path.as_ref();
    let file = ctry!(File::create(path); "failed to create \"{}\"", path.display());
    write_meta_data(BufWriter::new(file), tables)
}

/// Read back a column metadata file written by `write_meta_data`.
pub fn read_column_metadata<R: Read>(src: R) -> Result<Vec<ColumnMetaData>> {
    let mut records = Vec::new();

    for rec in pipe::reader(src).deserialize() {
        records.push(rec?);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sed::tests::sed_container;
    use mockcat_core::container::MemoryContainer;
    use std::collections::HashMap;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    fn lookups() -> Lookups {
        Lookups::new(
            map(&[("float64", "double"), ("int64", "long"), ("float32", "float")]),
            map(&[("ra", "pos.eq.ra"), ("id_galaxy_sky", "meta.id;meta.main")]),
            map(&[("id_group_sky", "meta.id;meta.main")]),
        )
    }

    #[test]
    fn unit_splitting() {
        let split = |s: &str| separate_unit_and_description(s);
        let pair = |a: &str, b: &str| (a.to_owned(), b.to_owned());

        assert_eq!(split("ra of the galaxy [deg]"), pair("ra of the galaxy", "deg"));
        assert_eq!(split("stellar mass [Msun]"), pair("stellar mass", "Msun"));
        assert_eq!(split("  stellar mass  [ Msun ] "), pair("stellar mass", "Msun"));
        assert_eq!(split("galaxy id"), pair("galaxy id", "None"));
        assert_eq!(split("  padded id "), pair("  padded id ", "None"));
        assert_eq!(split("flux [mJy"), pair("flux", "mJy"));
        assert_eq!(split("[a] mass [Msun]"), pair("[a] mass", "Msun"));
        assert_eq!(split("mass [Msun] of the halo"), pair("mass of the halo", "Msun"));
        assert_eq!(split("dimensionless []"), pair("dimensionless", ""));
    }

    #[test]
    fn band_table() {
        assert_eq!(band_range("Band7_ALMA"), Some("275 GHz - 373 GHz"));
        assert_eq!(band_range("Band_150MHz"), Some("1498.96 mm - 2997.92 mm"));
        assert_eq!(band_range("u_SDSS"), None);
        assert!(is_top_hat_band("BandX_VLA"));
        assert!(!is_top_hat_band("K_VISTA"));
    }

    #[test]
    fn sed_scenario() {
        let c = sed_container(&["u_SDSS", "Band7_ALMA"], 1, 0.);
        let records = create_metadata_table_from_sed(&c, "WavesWideGals").unwrap();

        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "u_SDSS_apparent_mag",
                "u_SDSS_absolute_mag",
                "Band7_ALMA_apparent_mag",
                "Band7_ALMA_absolute_mag",
            ]
        );

        assert_eq!(records[0].ucd, "phot.mag");
        assert!(records[0].description.contains("includes dust"));
        assert_eq!(
            records[0].description,
            "Apparent magnitude in filter u_SDSS (includes dust)"
        );
        assert_eq!(records[1].ucd, "phys.magAbs");
        assert_eq!(records[2].unit, "mag");
        assert!(records[2].description.contains("275 GHz - 373 GHz"));
        assert_eq!(
            records[3].description,
            "Absolute magnitude in the top-hat filter over the range 275 GHz - 373 GHz"
        );

        for r in &records {
            assert_eq!(r.table_name, "WavesWideGals");
            assert_eq!(r.data_type, "float32");
        }
    }

    #[test]
    fn unknown_radio_band() {
        match sed_metadata(&["Band1_ALMA"], "t") {
            Err(SharkError::UnknownBandRange(b)) => assert_eq!(b, "Band1_ALMA"),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn mock_metadata() {
        let c = MemoryContainer::new()
            .with_annotated_column("galaxies/ra", vec![1.0f64], "Comment", "right ascension [deg]")
            .with_annotated_column("galaxies/id_galaxy_sky", vec![4i64], "Comment", "galaxy id")
            .with_annotated_column("groups/id_group_sky", vec![9i64], "Comment", "group id");

        let records =
            create_metadata_table_from_mock(&c, "WavesDeepGals", FileType::Galaxies, &lookups())
                .unwrap();

        assert_eq!(
            records,
            vec![
                ColumnMetaData::new(
                    "id_galaxy_sky",
                    "galaxy id",
                    "WavesDeepGals",
                    "None",
                    "meta.id;meta.main",
                    "long"
                ),
                ColumnMetaData::new(
                    "ra",
                    "right ascension",
                    "WavesDeepGals",
                    "deg",
                    "pos.eq.ra",
                    "double"
                ),
            ]
        );
    }

    #[test]
    fn mock_metadata_failures() {
        let no_ucd = MemoryContainer::new().with_annotated_column(
            "groups/mystery",
            vec![1i64],
            "Comment",
            "who knows",
        );
        match create_metadata_table_from_mock(&no_ucd, "t", FileType::Groups, &lookups()) {
            Err(SharkError::MissingLookup { key, .. }) => assert_eq!(key, "mystery"),
            other => panic!("unexpected result {:?}", other),
        }

        let no_type = MemoryContainer::new().with_annotated_column(
            "groups/id_group_sky",
            vec![1u8],
            "Comment",
            "group id",
        );
        match create_metadata_table_from_mock(&no_type, "t", FileType::Groups, &lookups()) {
            Err(SharkError::MissingLookup { key, .. }) => assert_eq!(key, "uint8"),
            other => panic!("unexpected result {:?}", other),
        }

        let no_comment = MemoryContainer::new().with_column("groups/id_group_sky", vec![1i64]);
        assert!(
            create_metadata_table_from_mock(&no_comment, "t", FileType::Groups, &lookups()).is_err()
        );
    }

    #[test]
    fn line_round_trip() {
        let r = ColumnMetaData::new(
            "zobs",
            "observed redshift (includes peculiar velocity)",
            "WavesWideGals",
            "None",
            "src.redshift",
            "double",
        );

        let line = r.to_line().unwrap();
        assert_eq!(
            line,
            "zobs|observed redshift (includes peculiar velocity)|WavesWideGals|src.redshift|None|double"
        );
        assert_eq!(ColumnMetaData::from_line(&line).unwrap(), r);
        assert_eq!(ColumnMetaData::from_line(&format!("{line}\n")).unwrap(), r);
        assert!(ColumnMetaData::from_line("a|b|c").is_err());
    }

    #[test]
    fn delimiter_rejected() {
        let r = ColumnMetaData::new("x", "a | b", "t", "None", "ucd", "float");
        assert!(r.to_line().is_err());

        let mut buf = Vec::new();
        assert!(write_meta_data(&mut buf, &[vec![r]]).is_err());
        assert!(buf.is_empty());
    }

    #[test]
    fn file_round_trip() {
        let gals = sed_metadata(&["u_SDSS"], "Gals").unwrap();
        let groups = vec![ColumnMetaData::new("id", "group id", "Groups", "None", "meta.id", "long")];

        let mut buf = Vec::new();
        write_meta_data(&mut buf, &[gals.clone(), groups.clone()]).unwrap();

        let text = String::from_utf8(buf.clone()).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("name|description|table_name|ucd|unit|data_type"));
        assert_eq!(
            lines.next(),
            Some("u_SDSS_apparent_mag|Apparent magnitude in filter u_SDSS (includes dust)|Gals|phot.mag|mag|float32")
        );
        assert!(text.ends_with('\n'));

        let back = read_column_metadata(&buf[..]).unwrap();
        let expected: Vec<_> = gals.into_iter().chain(groups).collect();
        assert_eq!(back, expected);
    }
}
