//! Owned 2D grids produced by the engines.
//!
//! A [`Field`] is a row-major buffer of `height` rows by `width` columns.
//! Row index is the grid/screen Y, column index is X. Engines build a fresh
//! field on every call and hand it to the caller; nothing keeps a reference.

mod normalize;
mod stats;

pub use normalize::{normalize, NormalizedField};
pub use stats::FieldStats;

use rayon::prelude::*;

use crate::error::{Error, Result};

/// Raw engine output: illuminance in W/m² or Blinn-Phong brightness.
pub type ScalarField = Field<f64>;

#[derive(Clone, Debug, PartialEq)]
pub struct Field<T> {
    data: Vec<T>,
    width: usize,
    height: usize,
}

impl<T: Copy> Field<T> {
    /// Wrap an existing row-major buffer.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self> {
        if data.len() != width * height {
            return Err(Error::invalid_input(format!(
                "buffer of {} cells does not match a {}x{} grid",
                data.len(),
                width,
                height
            )));
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Self {
            data: vec![value; width * height],
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// `(height, width)`, matching the row-major layout.
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Get the value at column `x`, row `y`, or None if out of bounds.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<T> {
        if x < self.width && y < self.height {
            Some(self.data[y * self.width + x])
        } else {
            None
        }
    }

    pub fn row(&self, y: usize) -> Option<&[T]> {
        if y < self.height {
            let start = y * self.width;
            Some(&self.data[start..start + self.width])
        } else {
            None
        }
    }

    pub fn column(&self, x: usize) -> Option<Vec<T>> {
        if x < self.width {
            Some(self.data.iter().skip(x).step_by(self.width).copied().collect())
        } else {
            None
        }
    }

    /// Apply `f` to every cell, keeping the shape.
    pub fn map<U: Copy>(&self, f: impl Fn(T) -> U) -> Field<U> {
        Field {
            data: self.data.iter().map(|&v| f(v)).collect(),
            width: self.width,
            height: self.height,
        }
    }
}

impl<T: Copy + Send + Sync> Field<T> {
    /// Build a field by filling each row in parallel.
    ///
    /// `fill_row` receives the row index and that row's output slice. Rows are
    /// independent, so the result does not depend on how rayon splits the work.
    pub(crate) fn par_from_rows<F>(width: usize, height: usize, init: T, fill_row: F) -> Self
    where
        F: Fn(usize, &mut [T]) + Sync + Send,
    {
        let mut data = vec![init; width * height];
        if width > 0 {
            data.par_chunks_exact_mut(width)
                .enumerate()
                .for_each(|(y, row)| fill_row(y, row));
        }
        Self {
            data,
            width,
            height,
        }
    }
}

impl ScalarField {
    /// Largest value in the field, or 0.0 for an empty field.
    pub fn max(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.data.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// `(x, y)` of every strictly positive cell, in row-major order.
    pub fn positive_cells(&self) -> Vec<(usize, usize)> {
        self.data
            .iter()
            .enumerate()
            .filter(|(_, v)| **v > 0.0)
            .map(|(i, _)| (i % self.width, i / self.width))
            .collect()
    }

    /// Scale the field to 8-bit grayscale. See [`normalize`].
    pub fn normalize(&self) -> NormalizedField {
        normalize(self)
    }

    /// Statistics over the lit (strictly positive) cells.
    pub fn lit_stats(&self) -> FieldStats {
        FieldStats::of_positive(self.as_slice())
    }
}
