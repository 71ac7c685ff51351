// Copyright 2024 Peter Williams and collaborators
// Licensed under the MIT License.

/*!
A minimal in-memory columnar table.

This is just enough table to gather catalogue columns from many files,
stack them, join them side by side, and write them out as CSV.

*/

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::container::ColumnData;
use crate::errors::{Error, Result};

/// A named column of values.
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    /// Create a new column.
    pub fn new<S: Into<String>, D: Into<ColumnData>>(name: S, data: D) -> Self {
        Column {
            name: name.into(),
            data: data.into(),
        }
    }
}

/// An ordered collection of equal-length columns.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Table {
    /// Create a table with no columns and no rows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table from columns, which must all have the same length.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let n_rows = columns.first().map(|c| c.data.len()).unwrap_or(0);

        for c in &columns {
            if c.data.len() != n_rows {
                return Err(Error::RaggedColumns {
                    column: c.name.clone(),
                    expected: n_rows,
                    actual: c.data.len(),
                });
            }
        }

        Ok(Table { columns, n_rows })
    }

    /// Get the number of rows.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Get the number of columns.
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Get the columns, in order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Get the column names, in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Stack tables vertically, in the order given.
    ///
    /// Every table must have the same column names, in the same order, with
    /// the same element types. Stacking no tables at all yields an empty
    /// table.
    pub fn concat<I: IntoIterator<Item = Table>>(tables: I) -> Result<Table> {
        let mut tables = tables.into_iter();

        let mut result = match tables.next() {
            Some(t) => t,
            None => return Ok(Table::new()),
        };

        for t in tables {
            if t.column_names() != result.column_names() {
                return Err(Error::SchemaMismatch {
                    expected: owned_names(&result),
                    actual: owned_names(&t),
                });
            }

            result.n_rows += t.n_rows;

            for (dest, src) in result.columns.iter_mut().zip(t.columns) {
                dest.data.append(&dest.name, src.data)?;
            }
        }

        Ok(result)
    }

    /// Join another table onto the right-hand side of this one.
    ///
    /// The two tables must have exactly the same number of rows, even if
    /// one of them has no columns; nothing is ever truncated or padded.
    pub fn hstack(mut self, other: Table) -> Result<Table> {
        if self.n_rows != other.n_rows {
            return Err(Error::RowCountMismatch {
                left: self.n_rows,
                right: other.n_rows,
            });
        }

        self.columns.extend(other.columns);
        Ok(self)
    }

    /// Write the table as comma-separated values, with a header row of
    /// column names.
    pub fn write_csv<W: Write>(&self, dest: W) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(dest);

        writer.write_record(self.columns.iter().map(|c| c.name.as_str()))?;

        let mut record = csv::StringRecord::with_capacity(0, self.columns.len());

        for i in 0..self.n_rows {
            record.clear();

            for c in &self.columns {
                record.push_field(&c.data.format_cell(i));
            }

            writer.write_record(&record)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Write the table as CSV to a newly created file at *path*.
    pub fn write_csv_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = ctry!(File::create(path); "failed to create \"{}\"", path.display());
        ctry!(self.write_csv(BufWriter::new(file)); "failed to write \"{}\"", path.display());
        Ok(())
    }
}

fn owned_names(t: &Table) -> Vec<String> {
    t.columns.iter().map(|c| c.name.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(ids: Vec<i64>, mags: Vec<f32>) -> Table {
        Table::from_columns(vec![Column::new("id", ids), Column::new("mag", mags)]).unwrap()
    }

    #[test]
    fn ragged_columns_rejected() {
        let r = Table::from_columns(vec![
            Column::new("a", vec![1i32, 2]),
            Column::new("b", vec![1i32]),
        ]);

        match r {
            Err(Error::RaggedColumns {
                expected: 2,
                actual: 1,
                ..
            }) => {}
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn concat_preserves_order() {
        let t = Table::concat(vec![
            chunk(vec![1, 2], vec![20.5, 21.]),
            chunk(vec![], vec![]),
            chunk(vec![3, 4, 5], vec![19., 18., 17.]),
        ])
        .unwrap();

        assert_eq!(t.n_rows(), 5);
        assert_eq!(
            t.column("id").unwrap().data,
            ColumnData::Int64(vec![1, 2, 3, 4, 5])
        );
        assert_eq!(
            t.column("mag").unwrap().data,
            ColumnData::Float32(vec![20.5, 21., 19., 18., 17.])
        );
    }

    #[test]
    fn concat_of_nothing_is_empty() {
        let t = Table::concat(Vec::new()).unwrap();
        assert_eq!(t.n_rows(), 0);
        assert_eq!(t.n_columns(), 0);
    }

    #[test]
    fn concat_rejects_different_columns() {
        let other = Table::from_columns(vec![Column::new("id", vec![9i64])]).unwrap();

        match Table::concat(vec![chunk(vec![1], vec![2.]), other]) {
            Err(Error::SchemaMismatch { expected, actual }) => {
                assert_eq!(expected, vec!["id", "mag"]);
                assert_eq!(actual, vec!["id"]);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn hstack_requires_equal_rows() {
        let left = chunk(vec![1, 2], vec![1., 2.]);
        let right = Table::from_columns(vec![Column::new("z", vec![0.1f64])]).unwrap();

        match left.hstack(right) {
            Err(Error::RowCountMismatch { left: 2, right: 1 }) => {}
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn hstack_checks_rows_of_empty_tables() {
        let rows = Table::from_columns(vec![Column::new("z", vec![0.1f64, 0.2])]).unwrap();

        match Table::new().hstack(rows.clone()) {
            Err(Error::RowCountMismatch { left: 0, right: 2 }) => {}
            other => panic!("unexpected result {:?}", other),
        }

        match rows.hstack(Table::new()) {
            Err(Error::RowCountMismatch { left: 2, right: 0 }) => {}
            other => panic!("unexpected result {:?}", other),
        }

        let t = Table::new().hstack(Table::new()).unwrap();
        assert_eq!(t.n_columns(), 0);
    }

    #[test]
    fn hstack_appends_columns() {
        let left = chunk(vec![1, 2], vec![1., 2.]);
        let right = Table::from_columns(vec![Column::new("z", vec![0.1f64, 0.2])]).unwrap();
        let t = left.hstack(right).unwrap();
        assert_eq!(t.column_names(), vec!["id", "mag", "z"]);
        assert_eq!(t.n_rows(), 2);
    }

    #[test]
    fn csv_output() {
        let t = Table::from_columns(vec![
            Column::new("id", vec![7i64, 8]),
            Column::new("ra", vec![10.0f64, 0.25]),
            Column::new("central", vec![true, false]),
        ])
        .unwrap();

        let mut buf = Vec::new();
        t.write_csv(&mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "id,ra,central\n7,10.0,True\n8,0.25,False\n"
        );
    }
}
