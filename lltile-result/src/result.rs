use crate::error::Error;

/// Result type alias used throughout lltile.
///
/// This is a type alias for `std::result::Result<T, Error>`. Every fallible
/// operation in the tile pipeline returns this type.
pub type Result<T> = std::result::Result<T, Error>;
