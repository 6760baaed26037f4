use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Report error: {0}")]
    Report(#[from] csv::Error),

    #[error("Scan root {} is not accessible: {source}", path.display())]
    RootNotAccessible {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Header error: {0}")]
    Header(String),
}
