//! Roster tables, column resolution and the CSV adapter

mod data;
mod schema;
pub mod loader;

pub use data::{CellValue, Record, RecordOutcome, RecordTable, OUTPUT_COLUMNS};
pub use schema::{fold_accent, normalize_label, normalize_text, Field, Schema};
pub use loader::{load_table, load_table_from_reader, write_table, write_table_to_path};
