pub mod db;
pub mod rows;

mod error;

pub use error::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// One result row, column name to scalar value, as handed back to callers.
pub type Row = serde_json::Map<String, serde_json::Value>;
