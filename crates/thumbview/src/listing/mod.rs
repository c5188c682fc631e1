//! Listing model - rows, the row index, and sorting.

mod row;
mod sorting;

pub use row::{
    DATE_COLUMN, DATE_FORMAT, NAME_COLUMN, Row, RowId, RowIdAllocator, RowIndex, SIZE_COLUMN, TYPE_COLUMN,
};
pub use sorting::{ColumnDataType, SortOrder, SortSpec, compare_rows, sort_rows, sorted_insert_position};
