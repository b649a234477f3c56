use thiserror::Error;

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("Blob not found: {namespace}/{name}")]
    BlobNotFound { namespace: String, name: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Auth error: {0}")]
    Auth(String),

    #[error("Api Error: {0}")]
    Api(String),
}

impl JournalError {
    pub fn not_found(namespace: &str, name: &str) -> Self {
        Self::BlobNotFound {
            namespace: namespace.to_string(),
            name: name.to_string(),
        }
    }

    /// True for the recoverable "blob is absent" case; the retry policy
    /// keys on this and never retries anything else.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::BlobNotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, JournalError>;
