use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use log::LevelFilter;
use montage_grid::{read_grid_file, GridDescriptor};
use pipeline_logging::{pipeline_info, LogDestination};
use pipeline_messages::{ErrorCollector, LoggingObserver, MessageBus, ProgressTracker};

mod montage;

/// Also log to this file when set.
const LOG_FILE_ENV: &str = "MONTAGE_LOG_FILE";

fn main() -> anyhow::Result<ExitCode> {
    let destination = log_destination(std::env::var_os(LOG_FILE_ENV));
    pipeline_logging::initialize(destination, LevelFilter::Info);

    let grid = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => {
            read_grid_file(&path).with_context(|| format!("loading grid from {:?}", path))?
        }
        None => GridDescriptor::default(),
    };

    let errors = Arc::new(ErrorCollector::new());
    let progress = Arc::new(ProgressTracker::new());
    let mut bus = MessageBus::new();
    bus.register(Arc::new(LoggingObserver::new()));
    bus.register(errors.clone());
    bus.register(progress.clone());

    let visited = montage::run(&grid, &bus);
    pipeline_info!(
        "Visited {} tiles, final progress {:?}, {} errors",
        visited,
        progress.values().last(),
        errors.len()
    );

    for error in errors.collected() {
        eprintln!("{error}");
    }
    Ok(if errors.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn log_destination(log_file: Option<OsString>) -> LogDestination {
    match log_file {
        Some(path) if !path.is_empty() => LogDestination::Both(PathBuf::from(path)),
        _ => LogDestination::Terminal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_variable_adds_a_file_sink() {
        assert_eq!(
            log_destination(Some(OsString::from("run.log"))),
            LogDestination::Both(PathBuf::from("run.log"))
        );
        assert_eq!(log_destination(Some(OsString::new())), LogDestination::Terminal);
        assert_eq!(log_destination(None), LogDestination::Terminal);
    }
}
