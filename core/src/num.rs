// Copyright 2017-2024 Peter Williams
// Licensed under the MIT License.

//! Shape helpers for `ndarray`.

use crate::errors::{Error, Result};
use ndarray::{IntoDimension, Ix1, Ix2};

/// Conversion from a shape known only at runtime, such as one read from a
/// file, into one of `ndarray`'s statically sized dimension types.
pub trait DimFromShapeSlice: Sized {
    /// Fails with `Error::DimensionMismatch` if *shape* has the wrong
    /// number of axes.
    fn from_shape_slice(shape: &[usize]) -> Result<Self>;
}

macro_rules! impl_dim_from_shape_slice {
    ($dimtype:ty; $ndim:literal; $($axis:expr),*) => {
        impl DimFromShapeSlice for $dimtype {
            fn from_shape_slice(shape: &[usize]) -> Result<Self> {
                match shape.len() {
                    $ndim => Ok([$(shape[$axis]),*].into_dimension()),
                    n => Err(Error::DimensionMismatch($ndim, n)),
                }
            }
        }
    }
}

impl_dim_from_shape_slice! { Ix1; 1; 0 }
impl_dim_from_shape_slice! { Ix2; 2; 0, 1 }

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Dimension;

    #[test]
    fn matching_dimensionality() {
        let d = Ix2::from_shape_slice(&[4, 7]).unwrap();
        assert_eq!(d.into_pattern(), (4, 7));

        let d = Ix1::from_shape_slice(&[12]).unwrap();
        assert_eq!(d.size(), 12);
    }

    #[test]
    fn mismatched_dimensionality() {
        match Ix2::from_shape_slice(&[3]) {
            Err(Error::DimensionMismatch(2, 1)) => {}
            other => panic!("unexpected result {:?}", other),
        }
    }
}
