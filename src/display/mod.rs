pub mod error_panel;
pub mod format;
pub mod status;
pub mod table;

pub use error_panel::ErrorPanel;
pub use format::{Column, LooseRecord, Record, extract, format_value, to_document};
pub use status::{OperationStatus, display_status};
pub use table::{OutputFormat, Renderer};
