use std::fmt;
use thiserror::Error;

/// Unified error type for all lltile operations.
///
/// Each variant corresponds to one failure class of the tile pipeline. None of
/// them are retried: they abort the current query and propagate to the caller.
#[derive(Error, Debug)]
pub enum Error {
    /// Arrow library error raised by a compute kernel or batch constructor.
    ///
    /// Typically surfaces from `take`/`concat` while materializing, or from
    /// `RecordBatch::try_new` when the assembled columns disagree with the
    /// destination schema.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// A structural invariant of a logical tile was violated at construction time.
    ///
    /// This occurs when:
    /// - a position list with a different length than the existing ones is added
    /// - a column references a position list that was never added
    /// - a column references a physical column the tile does not have
    ///
    /// Always a planner or operator defect. The tile is left unchanged.
    #[error("schema error: {0}")]
    SchemaError(String),

    /// A column id or row id passed to an accessor is out of range.
    ///
    /// Upstream operators are expected to respect `row_count()` and
    /// `column_count()`, so this indicates an internal invariant violation.
    #[error("out of bounds: {0}")]
    BoundsError(String),

    /// Materialization was requested with a mapping the source cannot satisfy.
    ///
    /// Raised before any value is copied, so a destination tile is never left
    /// partially populated.
    #[error("mapping error: {0}")]
    MappingError(String),

    /// A borrowed physical tile was released while a logical tile still pointed
    /// at it.
    ///
    /// Logical tiles hold only weak handles to borrowed tiles. The owner must keep
    /// the tile alive for as long as any view reads from it.
    #[error("physical tile {0} was released while still referenced")]
    TileReleased(u64),

    /// Invalid user input or API parameter.
    #[error("Invalid argument: {0}")]
    InvalidArgumentError(String),

    /// Internal error indicating a bug or unexpected state.
    #[error("An internal operation failed: {0}")]
    Internal(String),
}

impl Error {
    /// Create a [`Error::SchemaError`] from any displayable message.
    ///
    /// # Examples
    ///
    /// ```
    /// use lltile_result::Error;
    ///
    /// let err = Error::schema("position list 3 does not exist");
    /// assert!(matches!(err, Error::SchemaError(msg) if msg.contains("list 3")));
    /// ```
    #[inline]
    pub fn schema<E: fmt::Display>(msg: E) -> Self {
        Error::SchemaError(msg.to_string())
    }

    /// Create a [`Error::BoundsError`] describing which id overflowed which limit.
    ///
    /// # Examples
    ///
    /// ```
    /// use lltile_result::Error;
    ///
    /// let err = Error::bounds("row", 7, 3);
    /// assert_eq!(err.to_string(), "out of bounds: row id 7 (limit 3)");
    /// ```
    #[inline]
    pub fn bounds(kind: &str, index: usize, limit: usize) -> Self {
        Error::BoundsError(format!("{kind} id {index} (limit {limit})"))
    }

    /// Create a [`Error::MappingError`] from any displayable message.
    #[inline]
    pub fn mapping<E: fmt::Display>(msg: E) -> Self {
        Error::MappingError(msg.to_string())
    }
}
