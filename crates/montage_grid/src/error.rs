use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("grid descriptor must be a JSON object")]
    NotAnObject,
    #[error("missing field {0}")]
    MissingField(&'static str),
    #[error("field {field} must be a 32-bit integer, found {found}")]
    WrongType { field: &'static str, found: String },
    #[error("inverted range: {axis} start {start} is after end {end}")]
    InvertedRange {
        axis: &'static str,
        start: i32,
        end: i32,
    },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
