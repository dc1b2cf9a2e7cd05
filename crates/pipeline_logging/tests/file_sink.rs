use std::fs;

use log::LevelFilter;
use pipeline_logging::{pipeline_debug, pipeline_info, LogDestination};
use tempfile::TempDir;

// The global logger can only be installed once per process, so this file
// holds a single test.
#[test]
fn file_destination_writes_records_at_level() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("pipeline.log");

    pipeline_logging::initialize(LogDestination::File(path.clone()), LevelFilter::Info);
    pipeline_info!("montage started with {} tiles", 9);
    pipeline_debug!("below the configured level");
    log::logger().flush();

    assert!(path.is_file());
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("montage started with 9 tiles"), "{content}");
    assert!(!content.contains("below the configured level"), "{content}");
}
