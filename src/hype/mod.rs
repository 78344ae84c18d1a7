pub mod export;
pub mod metrics;
pub mod store;

pub use export::ExportRecord;
pub use metrics::HypeMetrics;
pub use store::{MessageStore, ScoredMessage};
