use std::fs;
use std::io::Write;
use std::path::Path;

use pipeline_logging::{pipeline_debug, pipeline_info};
use serde_json::Value;
use tempfile::NamedTempFile;

use crate::{GridDescriptor, GridError};

/// Reads a grid descriptor from a JSON file.
pub fn read_grid_file(path: &Path) -> Result<GridDescriptor, GridError> {
    let content = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)?;
    let grid = GridDescriptor::from_json(&value)?;
    pipeline_debug!("Loaded grid {} from {:?}", grid, path);
    Ok(grid)
}

/// Writes `grid` as pretty JSON, via a temp file renamed over `path`.
pub fn write_grid_file(path: &Path, grid: &GridDescriptor) -> Result<(), GridError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let content = serde_json::to_string_pretty(&grid.to_json())?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(path).map_err(|e| GridError::Io(e.error))?;

    pipeline_info!("Saved grid {} to {:?}", grid, path);
    Ok(())
}
