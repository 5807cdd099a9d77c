pub mod error;
pub mod export;
pub mod report;
pub mod snapshot;

pub use error::StoreError;
pub use export::{EXPORT_TOPICS, Period, export_frontend_data, periods, slugify};
pub use report::{render_summary, write_stats, write_summary};
pub use snapshot::Snapshot;
