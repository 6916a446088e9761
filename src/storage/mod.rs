pub mod csv;
pub mod manager;
pub mod models;
pub mod sheets;

pub use self::csv::CsvStore;
pub use manager::StorageManager;
pub use models::{ParsedSale, SalesStats, ValidSale};
pub use sheets::SheetSink;
