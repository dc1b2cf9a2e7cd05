use montage_grid::GridDescriptor;
use pipeline_messages::{Message, MessageBus};

const PIPELINE: &str = "Montage";
const FILTER: &str = "Assemble Tiles";
const INVALID_GRID: i32 = -2000;

/// Walks every tile of `grid`, reporting through `bus`. Returns tiles visited.
pub(crate) fn run(grid: &GridDescriptor, bus: &MessageBus) -> usize {
    bus.notify(&Message::pipeline_status(
        PIPELINE,
        format!("Starting montage of {grid}"),
    ));

    if let Err(err) = grid.validate() {
        bus.notify(&Message::filter_error(FILTER, 0, INVALID_GRID, err.to_string()));
        return 0;
    }

    let total = grid.tile_count();
    let mut last_percent = -1;
    let mut visited = 0;
    for (row, col) in grid.tiles() {
        visited += 1;
        let percent = (visited * 100 / total) as i32;
        if percent != last_percent {
            bus.notify(&Message::filter_progress(
                FILTER,
                0,
                format!("Tile r{row} c{col}"),
                percent,
            ));
            last_percent = percent;
        }
    }

    bus.notify(&Message::pipeline_progress(PIPELINE, "Complete", 100));
    visited
}
