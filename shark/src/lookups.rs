// Copyright 2024 Peter Williams and collaborators
// Licensed under the MIT License.

//! Static lookup tables used to annotate catalogue columns.
//!
//! Three flat JSON objects, loaded once:
//!
//! - `data_types.json` maps native element type names (`"float32"`,
//!   `"int64"`, `"bool"`, `"str"`, ...) onto the type names the archive
//!   presents. Files keyed by numpy scalar names use `"bool_"` for booleans
//!   and `"bytes_"` or `"str_"` for strings; those keys are accepted too;
//! - `galaxies_ucd.json` and `groups_ucd.json` map column names onto UCDs,
//!   one file per [`FileType`].

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use mockcat_core::ctry;

use crate::errors::{Result, SharkError};
use crate::mock::FileType;

/// Numpy's names for element types whose conventional names differ.
const NUMPY_TYPE_NAMES: &[(&str, &str)] = &[("bool", "bool_"), ("str", "bytes_"), ("str", "str_")];

/// The immutable set of lookup tables.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Lookups {
    data_types: HashMap<String, String>,
    galaxies_ucd: HashMap<String, String>,
    groups_ucd: HashMap<String, String>,
}

fn read_json_map(path: &Path) -> Result<HashMap<String, String>> {
    let text = ctry!(fs::read_to_string(path); "failed to read \"{}\"", path.display());
    serde_json::from_str(&text).map_err(|source| SharkError::BadJson {
        path: path.to_owned(),
        source,
    })
}

impl Lookups {
    /// Assemble lookups from maps already in memory.
    pub fn new(
        data_types: HashMap<String, String>,
        galaxies_ucd: HashMap<String, String>,
        groups_ucd: HashMap<String, String>,
    ) -> Self {
        Lookups {
            data_types,
            galaxies_ucd,
            groups_ucd,
        }
    }

    /// Load the three lookup files.
    pub fn load<P1, P2, P3>(data_types: P1, galaxies_ucd: P2, groups_ucd: P3) -> Result<Self>
    where
        P1: AsRef<Path>,
        P2: AsRef<Path>,
        P3: AsRef<Path>,
    {
        Ok(Lookups {
            data_types: read_json_map(data_types.as_ref())?,
            galaxies_ucd: read_json_map(galaxies_ucd.as_ref())?,
            groups_ucd: read_json_map(groups_ucd.as_ref())?,
        })
    }

    /// Get the presentation type name for a native element type name,
    /// falling back to numpy's name for the type.
    pub fn data_type(&self, type_name: &str) -> Result<&str> {
        let numpy_names = NUMPY_TYPE_NAMES
            .iter()
            .filter(|(name, _)| *name == type_name)
            .map(|(_, alias)| *alias);

        std::iter::once(type_name)
            .chain(numpy_names)
            .find_map(|key| self.data_types.get(key))
            .map(|s| s.as_str())
            .ok_or_else(|| SharkError::MissingLookup {
                table: "data type".to_owned(),
                key: type_name.to_owned(),
            })
    }

    /// Get the UCD of the column *column* of a table of the given type.
    pub fn ucd(&self, file_type: FileType, column: &str) -> Result<&str> {
        let map = match file_type {
            FileType::Galaxies => &self.galaxies_ucd,
            FileType::Groups => &self.groups_ucd,
        };

        map.get(column)
            .map(|s| s.as_str())
            .ok_or_else(|| SharkError::MissingLookup {
                table: format!("{file_type} UCD"),
                key: column.to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write(dir: &Path, name: &str, text: &str) {
        let mut f = fs::File::create(dir.join(name)).unwrap();
        f.write_all(text.as_bytes()).unwrap();
    }

    fn load(dir: &Path) -> Result<Lookups> {
        Lookups::load(
            dir.join("data_types.json"),
            dir.join("galaxies_ucd.json"),
            dir.join("groups_ucd.json"),
        )
    }

    #[test]
    fn load_and_query() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "data_types.json", r#"{"float32": "float", "int64": "long"}"#);
        write(dir.path(), "galaxies_ucd.json", r#"{"ra": "pos.eq.ra"}"#);
        write(dir.path(), "groups_ucd.json", r#"{"ra": "pos.eq.ra;meta.main"}"#);

        let l = load(dir.path()).unwrap();
        assert_eq!(l.data_type("int64").unwrap(), "long");
        assert_eq!(l.ucd(FileType::Galaxies, "ra").unwrap(), "pos.eq.ra");
        assert_eq!(l.ucd(FileType::Groups, "ra").unwrap(), "pos.eq.ra;meta.main");

        match l.ucd(FileType::Groups, "dec") {
            Err(SharkError::MissingLookup { table, key }) => {
                assert_eq!(table, "groups UCD");
                assert_eq!(key, "dec");
            }
            other => panic!("unexpected result {:?}", other),
        }

        assert!(l.data_type("float64").is_err());
    }

    #[test]
    fn non_string_values_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "data_types.json", r#"{"float32": 4}"#);
        write(dir.path(), "galaxies_ucd.json", "{}");
        write(dir.path(), "groups_ucd.json", "{}");

        assert!(load(dir.path()).is_err());
    }

    #[test]
    fn missing_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let e = load(dir.path()).unwrap_err();
        assert!(e.to_string().contains("data_types.json"));
    }

    #[test]
    fn numpy_type_names() {
        fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect()
        }

        let l = Lookups::new(
            map(&[("bool_", "boolean"), ("bytes_", "char"), ("int64", "long")]),
            HashMap::new(),
            HashMap::new(),
        );
        assert_eq!(l.data_type("bool").unwrap(), "boolean");
        assert_eq!(l.data_type("str").unwrap(), "char");
        assert_eq!(l.data_type("int64").unwrap(), "long");
        assert!(l.data_type("int8").is_err());

        let l = Lookups::new(
            map(&[("bool", "boolean"), ("bool_", "other")]),
            HashMap::new(),
            HashMap::new(),
        );
        assert_eq!(l.data_type("bool").unwrap(), "boolean");
    }
}
