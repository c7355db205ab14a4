//! Console formatting for export reports and product listings

pub mod table;

pub use table::TableFormatter;
