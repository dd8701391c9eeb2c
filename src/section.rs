//! 1D slices through the middle of a field, for plotting.

use std::path::Path;

use crate::error::{Error, Result};
use crate::field::Field;

/// Which central line of the grid to slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Row `height / 2`, indexed by column.
    Horizontal,
    /// Column `width / 2`, indexed by row.
    Vertical,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Horizontal => write!(f, "horizontal"),
            Axis::Vertical => write!(f, "vertical"),
        }
    }
}

/// Values along one line of a field together with their pixel indices.
#[derive(Clone, Debug, PartialEq)]
pub struct CrossSection<T> {
    pub axis: Axis,
    pub values: Vec<T>,
    pub indices: Vec<usize>,
}

pub fn cross_section<T: Copy>(field: &Field<T>, axis: Axis) -> Result<CrossSection<T>> {
    if field.width() == 0 || field.height() == 0 {
        return Err(Error::invalid_input(format!(
            "cannot take a {} section of an empty {}x{} field",
            axis,
            field.width(),
            field.height()
        )));
    }

    let (values, len) = match axis {
        Axis::Horizontal => {
            let row = field.row(field.height() / 2).unwrap_or_default();
            (row.to_vec(), field.width())
        }
        Axis::Vertical => (
            field.column(field.width() / 2).unwrap_or_default(),
            field.height(),
        ),
    };

    Ok(CrossSection {
        axis,
        values,
        indices: (0..len).collect(),
    })
}

pub fn horizontal_section<T: Copy>(field: &Field<T>) -> Result<CrossSection<T>> {
    cross_section(field, Axis::Horizontal)
}

pub fn vertical_section<T: Copy>(field: &Field<T>) -> Result<CrossSection<T>> {
    cross_section(field, Axis::Vertical)
}

impl<T: Copy + std::fmt::Display> CrossSection<T> {
    /// Write `index,value` rows with a header line.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(["index", "value"])?;
        for (index, value) in self.indices.iter().zip(&self.values) {
            writer.write_record([index.to_string(), value.to_string()])?;
        }
        writer.flush()?;
        Ok(())
    }
}
