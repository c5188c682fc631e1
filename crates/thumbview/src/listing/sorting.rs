//! Sorting configuration and the row comparer.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::row::{DATE_COLUMN, DATE_FORMAT, NAME_COLUMN, Row, SIZE_COLUMN, TYPE_COLUMN};

// ============================================================================
// Sorting configuration
// ============================================================================

/// How a column's text is interpreted for comparison.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ColumnDataType {
    #[default]
    Text,
    Numeric,
    DateTime,
}

impl ColumnDataType {
    /// Declared type of each built-in column.
    pub fn for_column(column: usize) -> Self {
        match column {
            SIZE_COLUMN => Self::Numeric,
            DATE_COLUMN => Self::DateTime,
            _ => Self::Text,
        }
    }
}

/// Sort order (ascending or descending).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// Which column to sort by, how to read it, and in which direction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SortSpec {
    pub column: usize,
    pub data_type: ColumnDataType,
    pub order: SortOrder,
}

impl Default for SortSpec {
    /// By type, ascending.
    fn default() -> Self {
        Self::new(TYPE_COLUMN, ColumnDataType::Text, SortOrder::Ascending)
    }
}

impl SortSpec {
    pub fn new(column: usize, data_type: ColumnDataType, order: SortOrder) -> Self {
        Self {
            column,
            data_type,
            order,
        }
    }

    /// Sorts by `column` using its declared data type.
    pub fn for_column(column: usize, order: SortOrder) -> Self {
        Self::new(column, ColumnDataType::for_column(column), order)
    }

    pub fn by_name() -> Self {
        Self::for_column(NAME_COLUMN, SortOrder::Ascending)
    }

    /// The spec after the user clicks the header of `column`.
    ///
    /// Clicking the current column flips the direction; clicking another column keeps the
    /// direction and switches column and data type.
    pub fn clicked(self, column: usize) -> Self {
        let order = if self.column == column {
            self.order.toggled()
        } else {
            self.order
        };
        Self::for_column(column, order)
    }
}

// ============================================================================
// Comparer
// ============================================================================

/// Compares two rows under `spec`. Total and side-effect free.
///
/// Values that don't parse as the declared type (empty size of a directory, blank date)
/// rank below every parsable value and equal to each other; the direction is applied after
/// that, so in descending order they end up last.
pub fn compare_rows(a: &Row, b: &Row, spec: &SortSpec) -> Ordering {
    let (a_text, b_text) = (a.column(spec.column), b.column(spec.column));
    let ordering = match spec.data_type {
        ColumnDataType::Text => compare_text(a_text, b_text),
        ColumnDataType::Numeric => {
            compare_parsed(parse_numeric(a_text), parse_numeric(b_text), |x, y| x.total_cmp(y))
        }
        ColumnDataType::DateTime => compare_parsed(parse_date_time(a_text), parse_date_time(b_text), Ord::cmp),
    };
    spec.order.apply(ordering)
}

/// Stable in-place sort. Re-sorting with the same spec leaves the order unchanged.
pub fn sort_rows(rows: &mut [Row], spec: &SortSpec) {
    rows.sort_by(|a, b| compare_rows(a, b, spec));
}

/// Index at which `row` goes into the already sorted `rows`, after any equal rows.
pub fn sorted_insert_position(rows: &[Row], row: &Row, spec: &SortSpec) -> usize {
    rows.partition_point(|existing| compare_rows(existing, row, spec) != Ordering::Greater)
}

/// Case-insensitive lexicographic order. Digits compare as characters, so "img_10" sorts
/// before "img_2". Ties are broken case-sensitively so only identical strings compare equal.
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

fn compare_parsed<T>(a: Option<T>, b: Option<T>, cmp: impl Fn(&T, &T) -> Ordering) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => cmp(&a, &b),
    }
}

fn parse_numeric(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Accepts the "Date" column format, RFC 3339, and bare `YYYY-MM-DD`.
fn parse_date_time(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(text, DATE_FORMAT)
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|d| d.naive_utc()))
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
