//! Montage grid: tile index bounds and their JSON persistence.
mod error;
mod grid;
mod persist;

pub use error::GridError;
pub use grid::{GridDescriptor, Tiles, COL_END_KEY, COL_START_KEY, ROW_END_KEY, ROW_START_KEY};
pub use persist::{read_grid_file, write_grid_file};
