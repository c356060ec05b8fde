use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read access log: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid time window: {0}")]
    InvalidWindow(String),

    #[error("Unknown log format: {0}")]
    UnknownFormat(String),
}

pub type Result<T> = std::result::Result<T, Error>;
