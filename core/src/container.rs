// Copyright 2024 Peter Williams and collaborators
// Licensed under the MIT License.

/*!
An abstraction over hierarchical scientific container files.

The catalogue files we deal with are trees of named groups whose leaves are
homogeneous n-dimensional datasets, some of which carry string attributes.
The [`Container`] trait exposes exactly that much, and no more, so that the
scraping logic can be written once and driven either by a real file format
backend or by the [`MemoryContainer`] defined here.

Item paths are slash-separated, relative to the root of the container, e.g.
`"galaxies/ra"` or `"SED/ap_dust/total"`.

*/

use ndarray::{Array2, Ix1, Ix2};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use crate::errors::{Error, Result};
use crate::num::DimFromShapeSlice;

/// The native element type of a dataset.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ElementType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    Str,
}

impl ElementType {
    /// The conventional lower-case name of this type, e.g. `"float32"`.
    ///
    /// These names are the keys of the data-type lookup tables that map
    /// native types onto archive presentation types.
    pub fn type_name(self) -> &'static str {
        match self {
            ElementType::Bool => "bool",
            ElementType::Int8 => "int8",
            ElementType::Int16 => "int16",
            ElementType::Int32 => "int32",
            ElementType::Int64 => "int64",
            ElementType::UInt8 => "uint8",
            ElementType::UInt16 => "uint16",
            ElementType::UInt32 => "uint32",
            ElementType::UInt64 => "uint64",
            ElementType::Float32 => "float32",
            ElementType::Float64 => "float64",
            ElementType::Str => "str",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A homogeneous vector of values of one element type.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnData {
    Bool(Vec<bool>),
    Int8(Vec<i8>),
    Int16(Vec<i16>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    UInt8(Vec<u8>),
    UInt16(Vec<u16>),
    UInt32(Vec<u32>),
    UInt64(Vec<u64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    Str(Vec<String>),
}

// Evaluate `$body` with `$v` bound to the inner vector and `$ctor` bound to
// the variant constructor.
macro_rules! with_variant {
    ($value:expr, |$v:ident, $ctor:ident| $body:expr) => {
        match $value {
            ColumnData::Bool($v) => { let $ctor = ColumnData::Bool; $body }
            ColumnData::Int8($v) => { let $ctor = ColumnData::Int8; $body }
            ColumnData::Int16($v) => { let $ctor = ColumnData::Int16; $body }
            ColumnData::Int32($v) => { let $ctor = ColumnData::Int32; $body }
            ColumnData::Int64($v) => { let $ctor = ColumnData::Int64; $body }
            ColumnData::UInt8($v) => { let $ctor = ColumnData::UInt8; $body }
            ColumnData::UInt16($v) => { let $ctor = ColumnData::UInt16; $body }
            ColumnData::UInt32($v) => { let $ctor = ColumnData::UInt32; $body }
            ColumnData::UInt64($v) => { let $ctor = ColumnData::UInt64; $body }
            ColumnData::Float32($v) => { let $ctor = ColumnData::Float32; $body }
            ColumnData::Float64($v) => { let $ctor = ColumnData::Float64; $body }
            ColumnData::Str($v) => { let $ctor = ColumnData::Str; $body }
        }
    };
}

macro_rules! impl_from_vec {
    ($($ty:ty => $variant:ident),*) => {
        $(
            impl From<Vec<$ty>> for ColumnData {
                fn from(v: Vec<$ty>) -> Self {
                    ColumnData::$variant(v)
                }
            }
        )*
    };
}

impl_from_vec! {
    bool => Bool, i8 => Int8, i16 => Int16, i32 => Int32, i64 => Int64,
    u8 => UInt8, u16 => UInt16, u32 => UInt32, u64 => UInt64,
    f32 => Float32, f64 => Float64, String => Str
}

impl ColumnData {
    /// Get the element type of these data.
    pub fn element_type(&self) -> ElementType {
        match self {
            ColumnData::Bool(_) => ElementType::Bool,
            ColumnData::Int8(_) => ElementType::Int8,
            ColumnData::Int16(_) => ElementType::Int16,
            ColumnData::Int32(_) => ElementType::Int32,
            ColumnData::Int64(_) => ElementType::Int64,
            ColumnData::UInt8(_) => ElementType::UInt8,
            ColumnData::UInt16(_) => ElementType::UInt16,
            ColumnData::UInt32(_) => ElementType::UInt32,
            ColumnData::UInt64(_) => ElementType::UInt64,
            ColumnData::Float32(_) => ElementType::Float32,
            ColumnData::Float64(_) => ElementType::Float64,
            ColumnData::Str(_) => ElementType::Str,
        }
    }

    /// Get the number of values.
    pub fn len(&self) -> usize {
        with_variant!(self, |v, _ctor| v.len())
    }

    /// Check whether there are no values at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the values as strings, if that is what they are.
    pub fn as_strings(&self) -> Option<&[String]> {
        match self {
            ColumnData::Str(v) => Some(v),
            _ => None,
        }
    }

    /// Append *other* to these data.
    ///
    /// The two must have the same element type; *column* is only used to
    /// label the error if they do not.
    pub fn append(&mut self, column: &str, other: ColumnData) -> Result<()> {
        macro_rules! append_same {
            ($dest:expr, $src:expr, $column:expr; $($variant:ident),*) => {
                match ($dest, $src) {
                    $(
                        (ColumnData::$variant(a), ColumnData::$variant(b)) => {
                            a.extend(b);
                            Ok(())
                        }
                    )*
                    (a, b) => Err(Error::TypeMismatch {
                        column: $column.to_owned(),
                        expected: a.element_type(),
                        actual: b.element_type(),
                    }),
                }
            };
        }

        append_same!(
            self, other, column;
            Bool, Int8, Int16, Int32, Int64, UInt8, UInt16, UInt32, UInt64, Float32, Float64, Str
        )
    }

    /// Split row-major data of the given two-dimensional *shape* into one
    /// vector per row.
    pub fn split_rows(self, shape: &[usize]) -> Result<Vec<ColumnData>> {
        let dim = Ix2::from_shape_slice(shape)?;

        with_variant!(self, |v, ctor| {
            let arr = Array2::from_shape_vec(dim, v)?;
            Ok(arr.outer_iter().map(|row| ctor(row.to_vec())).collect())
        })
    }

    /// Format the value at index *i* as a CSV cell.
    ///
    /// Floats use their shortest round-trip representation, with NaN
    /// written as an empty cell; booleans are written `True` or `False`.
    ///
    /// Panics if *i* is out of bounds.
    pub fn format_cell(&self, i: usize) -> String {
        fn float_cell<T: fmt::Debug>(x: T, is_nan: bool) -> String {
            if is_nan {
                String::new()
            } else {
                format!("{x:?}")
            }
        }

        match self {
            ColumnData::Bool(v) => (if v[i] { "True" } else { "False" }).to_owned(),
            ColumnData::Int8(v) => v[i].to_string(),
            ColumnData::Int16(v) => v[i].to_string(),
            ColumnData::Int32(v) => v[i].to_string(),
            ColumnData::Int64(v) => v[i].to_string(),
            ColumnData::UInt8(v) => v[i].to_string(),
            ColumnData::UInt16(v) => v[i].to_string(),
            ColumnData::UInt32(v) => v[i].to_string(),
            ColumnData::UInt64(v) => v[i].to_string(),
            ColumnData::Float32(v) => float_cell(v[i], v[i].is_nan()),
            ColumnData::Float64(v) => float_cell(v[i], v[i].is_nan()),
            ColumnData::Str(v) => v[i].clone(),
        }
    }
}

/// An n-dimensional array read out of a container, stored row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    pub shape: Vec<usize>,
    pub data: ColumnData,
}

impl Dataset {
    /// Create a one-dimensional dataset.
    pub fn vector<D: Into<ColumnData>>(data: D) -> Self {
        let data = data.into();

        Dataset {
            shape: vec![data.len()],
            data,
        }
    }

    /// Create a dataset of the given shape.
    ///
    /// Returns an error if the number of values does not fill the shape.
    pub fn with_shape<D: Into<ColumnData>>(shape: Vec<usize>, data: D) -> Result<Self> {
        let data = data.into();
        let n: usize = shape.iter().product();

        if n != data.len() {
            return err_msg!(
                "{} values cannot fill an array of shape {:?}",
                data.len(),
                shape
            );
        }

        Ok(Dataset { shape, data })
    }

    /// Unwrap a one-dimensional dataset into its values.
    pub fn into_vector(self) -> Result<ColumnData> {
        Ix1::from_shape_slice(&self.shape)?;
        Ok(self.data)
    }
}

/// Join a group path and a member name into an item path.
pub fn item_path(group: &str, name: &str) -> String {
    let group = group.trim_matches('/');

    if group.is_empty() {
        name.to_owned()
    } else {
        format!("{group}/{name}")
    }
}

/// Read access to a hierarchical scientific container file.
pub trait Container {
    /// List the names of the members of the group at *group*, in name order.
    fn member_names(&self, group: &str) -> Result<Vec<String>>;

    /// Get the element type of the dataset at *path* without reading it.
    fn element_type(&self, path: &str) -> Result<ElementType>;

    /// Read the entire dataset at *path* into memory.
    fn read_dataset(&self, path: &str) -> Result<Dataset>;

    /// Read the string-valued attribute *name* of the item at *path*.
    fn string_attribute(&self, path: &str, name: &str) -> Result<Vec<String>>;
}

/// Something that can open container files by path.
///
/// Scrapers take an opener rather than a container so that each file is
/// opened, read, and dropped before the next one is touched.
pub trait ContainerOpener {
    type Container: Container;

    /// Open the container file at *path*.
    fn open(&self, path: &Path) -> Result<Self::Container>;
}

/// A container held entirely in memory.
///
/// Useful for testing scrapers, and for assembling catalogue data that did
/// not come from a file in the first place.
#[derive(Clone, Debug, Default)]
pub struct MemoryContainer {
    datasets: BTreeMap<String, Dataset>,
    attributes: BTreeMap<(String, String), Vec<String>>,
}

impl MemoryContainer {
    /// Create an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a dataset at *path*, replacing any existing one.
    pub fn insert_dataset(&mut self, path: &str, dataset: Dataset) {
        self.datasets
            .insert(path.trim_matches('/').to_owned(), dataset);
    }

    /// Set the string attribute *name* of the item at *path*.
    pub fn insert_attribute(&mut self, path: &str, name: &str, values: Vec<String>) {
        self.attributes
            .insert((path.trim_matches('/').to_owned(), name.to_owned()), values);
    }

    /// Builder-style version of `insert_dataset`.
    pub fn with_dataset(mut self, path: &str, dataset: Dataset) -> Self {
        self.insert_dataset(path, dataset);
        self
    }

    /// Add a one-dimensional dataset at *path*.
    pub fn with_column<D: Into<ColumnData>>(self, path: &str, data: D) -> Self {
        self.with_dataset(path, Dataset::vector(data))
    }

    /// Add a one-dimensional dataset at *path* with a single-element string
    /// attribute *name*.
    pub fn with_annotated_column<D: Into<ColumnData>>(
        mut self,
        path: &str,
        data: D,
        name: &str,
        text: &str,
    ) -> Self {
        self.insert_attribute(path, name, vec![text.to_owned()]);
        self.with_column(path, data)
    }

    fn dataset(&self, path: &str) -> Result<&Dataset> {
        self.datasets
            .get(path.trim_matches('/'))
            .ok_or_else(|| Error::NoSuchItem(path.to_owned()))
    }
}

impl Container for MemoryContainer {
    fn member_names(&self, group: &str) -> Result<Vec<String>> {
        let group = group.trim_matches('/');
        let prefix = if group.is_empty() {
            String::new()
        } else {
            format!("{group}/")
        };

        let names: BTreeSet<&str> = self
            .datasets
            .keys()
            .filter_map(|k| k.strip_prefix(prefix.as_str()))
            .filter_map(|rest| rest.split('/').next())
            .collect();

        if names.is_empty() {
            return Err(Error::NoSuchItem(group.to_owned()));
        }

        Ok(names.into_iter().map(|s| s.to_owned()).collect())
    }

    fn element_type(&self, path: &str) -> Result<ElementType> {
        Ok(self.dataset(path)?.data.element_type())
    }

    fn read_dataset(&self, path: &str) -> Result<Dataset> {
        Ok(self.dataset(path)?.clone())
    }

    fn string_attribute(&self, path: &str, name: &str) -> Result<Vec<String>> {
        let key = (path.trim_matches('/').to_owned(), name.to_owned());

        if let Some(values) = self.attributes.get(&key) {
            return Ok(values.clone());
        }

        self.dataset(path)?;
        Err(Error::NoSuchAttribute {
            item: path.to_owned(),
            attribute: name.to_owned(),
        })
    }
}

/// An opener that hands out clones of in-memory containers registered
/// under file paths.
#[derive(Clone, Debug, Default)]
pub struct MemoryOpener {
    files: HashMap<PathBuf, MemoryContainer>,
}

impl MemoryOpener {
    /// Create an opener that knows about no files.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register *container* as the contents of the file at *path*.
    pub fn insert<P: Into<PathBuf>>(&mut self, path: P, container: MemoryContainer) {
        self.files.insert(path.into(), container);
    }
}

impl ContainerOpener for MemoryOpener {
    type Container = MemoryContainer;

    fn open(&self, path: &Path) -> Result<MemoryContainer> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file \"{}\"", path.display()),
            )
            .into()
        })
    }
}
