pub mod csv;
pub mod json;

pub use self::csv::{write_positions, write_positions_file, write_traces, write_traces_file, PositionLog};
pub use self::json::{write_summary, write_summary_file, BodySummary, RunSummary};
