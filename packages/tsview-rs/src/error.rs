use thiserror::Error;

#[derive(Error, Debug)]
pub enum TsViewError {
    #[error("Input file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read input at byte offset {offset}: {source}")]
    Read {
        offset: u64,
        #[source]
        source: std::io::Error,
    },

    #[error("Ingestion cancelled")]
    Cancelled,

    #[error("Load {0} was superseded by a newer load")]
    StaleLoad(u64),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl TsViewError {
    /// Whether the error came from the caller abandoning the load rather than
    /// from the input itself.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, TsViewError::Cancelled | TsViewError::StaleLoad(_))
    }
}

pub type Result<T> = std::result::Result<T, TsViewError>;
