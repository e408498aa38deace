pub mod baseline;
pub mod compare;
pub mod config;
pub mod engine;
pub mod error;
pub mod fetchers;
pub mod format;
pub mod notify;
pub mod parsers;
pub mod results;
pub mod utils;


// Re-export commonly used types for convenience
pub use baseline::AuditRecord;
pub use compare::TagComparator;
pub use config::{AbsentTag, AuditConfig, FailurePolicy};
pub use engine::AuditEngine;
pub use error::{AuditError, NotificationError, Result};
pub use fetchers::{FetchedPage, Fetcher, PageFetcher};
pub use format::ReportFormatter;
pub use results::{AuditEntry, AuditReport, BatchSummary, ComparisonResult};
