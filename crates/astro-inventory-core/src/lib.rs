pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod filename;
pub mod filters;
pub mod metadata;
pub mod path_meta;
pub mod progress;
pub mod record;
pub mod report;
pub mod sanitize;
pub mod scanner;
pub mod taint;

pub use config::{AppConfig, ScanRules};
pub use engine::{Exclusion, ScanEngine, ScanOutcome, ScanResult};
pub use error::Error;
pub use extract::{ExtractorKind, ExtractorRegistry};
pub use metadata::{FileMetadata, MetadataField, SessionMetadata};
pub use progress::{ScanReporter, SilentReporter};
pub use record::MetadataRecord;
