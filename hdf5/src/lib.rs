// Copyright 2024 Peter Williams and collaborators
// Licensed under the MIT License.

/*!
HDF5 files as mockcat containers.

This is a thin layer over the `hdf5` bindings: enough to list the members of
a group, read whole numeric or string datasets into memory, and read string
attributes. Compound, enumerated (other than boolean), array, and reference
types are not supported.

*/

#![deny(missing_docs)]

use hdf5::types::{FixedAscii, FixedUnicode, FloatSize, IntSize, TypeDescriptor, VarLenAscii, VarLenUnicode};
use mockcat_core::container::{ColumnData, Container, ContainerOpener, Dataset, ElementType};
use mockcat_core::{err_msg, Error, Result};
use std::path::Path;

/// The longest fixed-length string that will be read.
///
/// Fixed-length strings are converted to this width on read; longer ones are
/// truncated by the HDF5 library.
const MAX_FIXED_STRING: usize = 1024;

/// An open HDF5 file.
#[derive(Debug)]
pub struct Hdf5Container {
    file: hdf5::File,
}

/// Opens HDF5 files read-only.
#[derive(Clone, Copy, Debug, Default)]
pub struct Hdf5Opener;

impl ContainerOpener for Hdf5Opener {
    type Container = Hdf5Container;

    fn open(&self, path: &Path) -> Result<Hdf5Container> {
        Hdf5Container::open(path)
    }
}

impl Hdf5Container {
    /// Open the HDF5 file at *path* for reading.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = hdf5::File::open(path).map_err(|e| Error::backend(path.display().to_string(), e))?;
        Ok(Hdf5Container { file })
    }

    fn dataset(&self, path: &str) -> Result<hdf5::Dataset> {
        let path = path.trim_matches('/');

        if !self.file.link_exists(path) {
            return Err(Error::NoSuchItem(path.to_owned()));
        }

        self.file.dataset(path).map_err(|e| Error::backend(path, e))
    }

    fn descriptor(&self, path: &str, ds: &hdf5::Dataset) -> Result<TypeDescriptor> {
        ds.dtype()
            .and_then(|t| t.to_descriptor())
            .map_err(|e| Error::backend(path, e))
    }
}

fn element_type(path: &str, desc: &TypeDescriptor) -> Result<ElementType> {
    Ok(match desc {
        TypeDescriptor::Boolean => ElementType::Bool,
        TypeDescriptor::Integer(IntSize::U1) => ElementType::Int8,
        TypeDescriptor::Integer(IntSize::U2) => ElementType::Int16,
        TypeDescriptor::Integer(IntSize::U4) => ElementType::Int32,
        TypeDescriptor::Integer(IntSize::U8) => ElementType::Int64,
        TypeDescriptor::Unsigned(IntSize::U1) => ElementType::UInt8,
        TypeDescriptor::Unsigned(IntSize::U2) => ElementType::UInt16,
        TypeDescriptor::Unsigned(IntSize::U4) => ElementType::UInt32,
        TypeDescriptor::Unsigned(IntSize::U8) => ElementType::UInt64,
        TypeDescriptor::Float(FloatSize::U4) => ElementType::Float32,
        TypeDescriptor::Float(FloatSize::U8) => ElementType::Float64,
        TypeDescriptor::FixedAscii(_)
        | TypeDescriptor::FixedUnicode(_)
        | TypeDescriptor::VarLenAscii
        | TypeDescriptor::VarLenUnicode => ElementType::Str,
        other => return err_msg!("unsupported HDF5 type {} in \"{}\"", other, path),
    })
}

/// Read every element of a dataset or attribute as strings, whichever
/// string flavor it is stored as.
fn read_strings(path: &str, container: &hdf5::Container, desc: &TypeDescriptor) -> Result<Vec<String>> {
    let wrap = |e| Error::backend(path, e);

    Ok(match desc {
        TypeDescriptor::VarLenUnicode => container
            .read_raw::<VarLenUnicode>()
            .map_err(wrap)?
            .iter()
            .map(|s| s.as_str().to_owned())
            .collect(),

        TypeDescriptor::VarLenAscii => container
            .read_raw::<VarLenAscii>()
            .map_err(wrap)?
            .iter()
            .map(|s| s.as_str().to_owned())
            .collect(),

        TypeDescriptor::FixedUnicode(_) => container
            .read_raw::<FixedUnicode<MAX_FIXED_STRING>>()
            .map_err(wrap)?
            .iter()
            .map(|s| s.as_str().to_owned())
            .collect(),

        TypeDescriptor::FixedAscii(_) => container
            .read_raw::<FixedAscii<MAX_FIXED_STRING>>()
            .map_err(wrap)?
            .iter()
            .map(|s| s.as_str().to_owned())
            .collect(),

        other => return err_msg!("\"{}\" holds {} values rather than strings", path, other),
    })
}

fn read_column(path: &str, container: &hdf5::Container, desc: &TypeDescriptor) -> Result<ColumnData> {
    macro_rules! raw {
        ($ty:ty) => {
            container
                .read_raw::<$ty>()
                .map_err(|e| Error::backend(path, e))?
                .into()
        };
    }

    Ok(match element_type(path, desc)? {
        ElementType::Bool => raw!(bool),
        ElementType::Int8 => raw!(i8),
        ElementType::Int16 => raw!(i16),
        ElementType::Int32 => raw!(i32),
        ElementType::Int64 => raw!(i64),
        ElementType::UInt8 => raw!(u8),
        ElementType::UInt16 => raw!(u16),
        ElementType::UInt32 => raw!(u32),
        ElementType::UInt64 => raw!(u64),
        ElementType::Float32 => raw!(f32),
        ElementType::Float64 => raw!(f64),
        ElementType::Str => ColumnData::Str(read_strings(path, container, desc)?),
    })
}

impl Container for Hdf5Container {
    fn member_names(&self, group: &str) -> Result<Vec<String>> {
        let group = group.trim_matches('/');

        let mut names = if group.is_empty() {
            self.file.member_names()
        } else {
            if !self.file.link_exists(group) {
                return Err(Error::NoSuchItem(group.to_owned()));
            }

            self.file.group(group).and_then(|g| g.member_names())
        }
        .map_err(|e| Error::backend(group, e))?;

        names.sort();
        Ok(names)
    }

    fn element_type(&self, path: &str) -> Result<ElementType> {
        let ds = self.dataset(path)?;
        element_type(path, &self.descriptor(path, &ds)?)
    }

    fn read_dataset(&self, path: &str) -> Result<Dataset> {
        let ds = self.dataset(path)?;
        let desc = self.descriptor(path, &ds)?;
        let data = read_column(path, &ds, &desc)?;
        Dataset::with_shape(ds.shape(), data)
    }

    fn string_attribute(&self, path: &str, name: &str) -> Result<Vec<String>> {
        let ds = self.dataset(path)?;

        let names = ds.attr_names().map_err(|e| Error::backend(path, e))?;
        if !names.iter().any(|n| n == name) {
            return Err(Error::NoSuchAttribute {
                item: path.to_owned(),
                attribute: name.to_owned(),
            });
        }

        let attr = ds.attr(name).map_err(|e| Error::backend(path, e))?;
        let desc = attr
            .dtype()
            .and_then(|t| t.to_descriptor())
            .map_err(|e| Error::backend(path, e))?;
        read_strings(path, &attr, &desc)
    }
}
