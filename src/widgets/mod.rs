mod misc;
mod summary;
mod table;

pub use summary::{SummaryTable, SummaryTableState};
