use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Feed archive is missing required file {0}")]
    MissingFile(String),
    #[error("Feed format error: {0}")]
    Format(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}
