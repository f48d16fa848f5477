use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to connect to {}: {source}", path.display())]
    Connection {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("SQL error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("The CSV file has no {0:?} column")]
    MissingColumn(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Config(#[from] toml::de::Error),
}

/// A CSV row that could not be turned into a user
#[derive(Debug, Error, PartialEq, Eq)]
#[error("line {line}: {reason}")]
pub struct RowError {
    pub line: u64,
    pub reason: String,
}
