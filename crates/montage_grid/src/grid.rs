use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::GridError;

pub const ROW_START_KEY: &str = "RowStart";
pub const ROW_END_KEY: &str = "RowEnd";
pub const COL_START_KEY: &str = "ColStart";
pub const COL_END_KEY: &str = "ColEnd";

/// Inclusive rectangle of montage tile indices.
///
/// `row_start <= row_end` and `col_start <= col_end` are expected but only
/// checked by [`GridDescriptor::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct GridDescriptor {
    #[serde(rename = "RowStart")]
    row_start: i32,
    #[serde(rename = "RowEnd")]
    row_end: i32,
    #[serde(rename = "ColStart")]
    col_start: i32,
    #[serde(rename = "ColEnd")]
    col_end: i32,
}

impl Default for GridDescriptor {
    fn default() -> Self {
        Self::new(0, 2, 0, 2)
    }
}

impl GridDescriptor {
    pub fn new(row_start: i32, row_end: i32, col_start: i32, col_end: i32) -> Self {
        Self {
            row_start,
            row_end,
            col_start,
            col_end,
        }
    }

    pub fn row_start(&self) -> i32 {
        self.row_start
    }

    pub fn set_row_start(&mut self, value: i32) {
        self.row_start = value;
    }

    pub fn row_end(&self) -> i32 {
        self.row_end
    }

    pub fn set_row_end(&mut self, value: i32) {
        self.row_end = value;
    }

    pub fn col_start(&self) -> i32 {
        self.col_start
    }

    pub fn set_col_start(&mut self, value: i32) {
        self.col_start = value;
    }

    pub fn col_end(&self) -> i32 {
        self.col_end
    }

    pub fn set_col_end(&mut self, value: i32) {
        self.col_end = value;
    }

    /// Number of rows; zero for an inverted range.
    pub fn row_count(&self) -> usize {
        span(self.row_start, self.row_end)
    }

    pub fn col_count(&self) -> usize {
        span(self.col_start, self.col_end)
    }

    pub fn tile_count(&self) -> usize {
        self.row_count().saturating_mul(self.col_count())
    }

    pub fn contains(&self, row: i32, col: i32) -> bool {
        (self.row_start..=self.row_end).contains(&row)
            && (self.col_start..=self.col_end).contains(&col)
    }

    /// Tile indices as `(row, col)`, row-major.
    pub fn tiles(&self) -> Tiles {
        Tiles {
            grid: *self,
            row: self.row_start,
            col: self.col_start,
            done: false,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn validate(&self) -> Result<(), GridError> {
        if self.row_start > self.row_end {
            return Err(GridError::InvertedRange {
                axis: "row",
                start: self.row_start,
                end: self.row_end,
            });
        }
        if self.col_start > self.col_end {
            return Err(GridError::InvertedRange {
                axis: "column",
                start: self.col_start,
                end: self.col_end,
            });
        }
        Ok(())
    }

    /// Inserts the four bounds into `obj`, leaving its other keys alone.
    pub fn write_json(&self, obj: &mut Map<String, Value>) {
        obj.insert(ROW_START_KEY.to_owned(), Value::from(self.row_start));
        obj.insert(ROW_END_KEY.to_owned(), Value::from(self.row_end));
        obj.insert(COL_START_KEY.to_owned(), Value::from(self.col_start));
        obj.insert(COL_END_KEY.to_owned(), Value::from(self.col_end));
    }

    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        self.write_json(&mut obj);
        Value::Object(obj)
    }

    /// Reads the four bounds from `value`.
    ///
    /// Either all four fields are applied or none are: on error `self` keeps
    /// its previous values.
    pub fn read_json(&mut self, value: &Value) -> Result<(), GridError> {
        *self = Self::from_json(value)?;
        Ok(())
    }

    pub fn from_json(value: &Value) -> Result<Self, GridError> {
        let obj = value.as_object().ok_or(GridError::NotAnObject)?;
        Ok(Self {
            row_start: read_i32(obj, ROW_START_KEY)?,
            row_end: read_i32(obj, ROW_END_KEY)?,
            col_start: read_i32(obj, COL_START_KEY)?,
            col_end: read_i32(obj, COL_END_KEY)?,
        })
    }
}

impl TryFrom<Value> for GridDescriptor {
    type Error = GridError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_json(&value)
    }
}

impl fmt::Display for GridDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rows {}..={}, cols {}..={}",
            self.row_start, self.row_end, self.col_start, self.col_end
        )
    }
}

/// Iterator returned by [`GridDescriptor::tiles`].
#[derive(Debug, Clone)]
pub struct Tiles {
    grid: GridDescriptor,
    row: i32,
    col: i32,
    done: bool,
}

impl Iterator for Tiles {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.row > self.grid.row_end || self.grid.col_start > self.grid.col_end {
            return None;
        }
        let tile = (self.row, self.col);
        if self.col < self.grid.col_end {
            self.col += 1;
        } else if self.row < self.grid.row_end {
            self.col = self.grid.col_start;
            self.row += 1;
        } else {
            self.done = true;
        }
        Some(tile)
    }
}

fn span(start: i32, end: i32) -> usize {
    if end < start {
        0
    } else {
        (i64::from(end) - i64::from(start) + 1) as usize
    }
}

fn read_i32(obj: &Map<String, Value>, field: &'static str) -> Result<i32, GridError> {
    let value = obj.get(field).ok_or(GridError::MissingField(field))?;
    value
        .as_i64()
        .and_then(|raw| i32::try_from(raw).ok())
        .ok_or_else(|| GridError::WrongType {
            field,
            found: describe(value),
        })
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_owned(),
        Value::Bool(_) => "bool".to_owned(),
        Value::Number(n) => format!("number {n}"),
        Value::String(_) => "string".to_owned(),
        Value::Array(_) => "array".to_owned(),
        Value::Object(_) => "object".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_three_by_three() {
        let grid = GridDescriptor::default();
        assert_eq!(grid.row_count(), 3);
        assert_eq!(grid.col_count(), 3);
        assert_eq!(grid.tile_count(), 9);
    }

    #[test]
    fn tiles_are_row_major() {
        let grid = GridDescriptor::new(1, 2, 5, 6);
        let tiles: Vec<_> = grid.tiles().collect();
        assert_eq!(tiles, vec![(1, 5), (1, 6), (2, 5), (2, 6)]);
    }

    #[test]
    fn inverted_grid_has_no_tiles() {
        let grid = GridDescriptor::new(3, 1, 0, 2);
        assert_eq!(grid.tiles().count(), 0);
        assert_eq!(grid.tile_count(), 0);
        assert!(!grid.is_valid());
    }

    #[test]
    fn single_tile_grid() {
        let grid = GridDescriptor::new(4, 4, 7, 7);
        assert_eq!(grid.tiles().collect::<Vec<_>>(), vec![(4, 7)]);
        assert!(grid.contains(4, 7));
        assert!(!grid.contains(4, 8));
    }
}
