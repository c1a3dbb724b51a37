//! Arrow-backed physical tile.

use std::sync::Arc;

use arrow::array::{ArrayRef, RecordBatch, RecordBatchOptions};
use arrow::datatypes::SchemaRef;
use lltile_result::{Error, Result};
use lltile_types::{ColumnId, Row, RowId, TileId, Value};

use crate::buffer::PhysicalBuffer;

/// A physical tile: an immutable Arrow [`RecordBatch`] tagged with a [`TileId`].
#[derive(Debug, Clone)]
pub struct Tile {
    id: TileId,
    batch: RecordBatch,
}

impl Tile {
    pub fn new(id: TileId, batch: RecordBatch) -> Self {
        Self { id, batch }
    }

    /// Build a tile from a schema and its columns.
    ///
    /// `row_count` is only consulted when `columns` is empty, where Arrow cannot
    /// infer the number of rows from the arrays.
    pub fn try_new(
        id: TileId,
        schema: SchemaRef,
        columns: Vec<ArrayRef>,
        row_count: usize,
    ) -> Result<Self> {
        let batch = if columns.is_empty() {
            let options = RecordBatchOptions::new().with_row_count(Some(row_count));
            RecordBatch::try_new_with_options(schema, columns, &options)?
        } else {
            RecordBatch::try_new(schema, columns)?
        };
        Ok(Self::new(id, batch))
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn into_batch(self) -> RecordBatch {
        self.batch
    }

    #[inline]
    fn check_row(&self, row: RowId) -> Result<()> {
        if row >= self.batch.num_rows() {
            return Err(Error::bounds("tile row", row, self.batch.num_rows()));
        }
        Ok(())
    }

    #[inline]
    fn check_column(&self, column: ColumnId) -> Result<()> {
        if column >= self.batch.num_columns() {
            return Err(Error::bounds("tile column", column, self.batch.num_columns()));
        }
        Ok(())
    }
}

impl PhysicalBuffer for Tile {
    fn tile_id(&self) -> TileId {
        self.id
    }

    fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    fn num_columns(&self) -> usize {
        self.batch.num_columns()
    }

    fn value(&self, row: RowId, column: ColumnId) -> Result<Value> {
        self.check_row(row)?;
        self.check_column(column)?;
        Value::from_array(self.batch.column(column).as_ref(), row)
    }

    fn row(&self, row: RowId) -> Result<Row> {
        self.check_row(row)?;
        self.batch
            .columns()
            .iter()
            .map(|column| Value::from_array(column.as_ref(), row))
            .collect()
    }

    fn column(&self, column: ColumnId) -> Result<ArrayRef> {
        self.check_column(column)?;
        Ok(Arc::clone(self.batch.column(column)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Int64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};

    fn sample() -> Tile {
        let schema = Arc::new(Schema::new(vec![
            Field::new("id", DataType::Int64, false),
            Field::new("name", DataType::Utf8, true),
        ]));
        let columns: Vec<ArrayRef> = vec![
            Arc::new(Int64Array::from(vec![10, 20, 30])),
            Arc::new(StringArray::from(vec![Some("a"), None, Some("c")])),
        ];
        Tile::try_new(7, schema, columns, 3).unwrap()
    }

    #[test]
    fn reads_cells_and_rows() {
        let tile = sample();
        assert_eq!(tile.tile_id(), 7);
        assert_eq!(tile.num_rows(), 3);
        assert_eq!(tile.num_columns(), 2);
        assert_eq!(tile.value(2, 0).unwrap(), Value::Int64(30));
        assert_eq!(tile.value(1, 1).unwrap(), Value::Null);
        assert_eq!(
            tile.row(0).unwrap(),
            vec![Value::Int64(10), Value::Utf8("a".into())]
        );
    }

    #[test]
    fn rejects_out_of_range_access() {
        let tile = sample();
        assert!(matches!(tile.value(3, 0), Err(Error::BoundsError(_))));
        assert!(matches!(tile.value(0, 2), Err(Error::BoundsError(_))));
        assert!(matches!(tile.row(5), Err(Error::BoundsError(_))));
        assert!(matches!(tile.column(9), Err(Error::BoundsError(_))));
    }

    #[test]
    fn zero_column_tile_keeps_row_count() {
        let tile = Tile::try_new(1, Arc::new(Schema::empty()), Vec::new(), 4).unwrap();
        assert_eq!(tile.num_rows(), 4);
        assert_eq!(tile.num_columns(), 0);
        assert_eq!(tile.row(3).unwrap(), Vec::<Value>::new());
    }
}
