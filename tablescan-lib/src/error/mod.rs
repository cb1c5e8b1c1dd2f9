//! Error types

mod api;
mod edit;
mod kind;

pub use api::*;
pub use edit::*;
pub use kind::*;

/// The error type for all tablescan operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The service call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The image was rejected before upload.
    #[error("Invalid image upload: {0}")]
    InvalidImage(String),

    /// Local data failed validation before being sent.
    #[error("Table validation failed: {0}")]
    Validation(String),

    /// The service reported that OCR failed for the task.
    #[error("OCR recognition failed: {0}")]
    OcrFailed(String),

    /// OCR did not finish within the configured number of status checks.
    #[error("OCR timeout after {attempts} status checks")]
    Timeout {
        /// Number of status checks issued.
        attempts: u32,
    },

    /// The operation was cancelled through its cancellation token.
    #[error("Operation cancelled")]
    Cancelled,

    /// The spreadsheet has not been generated for this task yet.
    #[error("Spreadsheet not generated yet: {0}")]
    NotGenerated(String),

    /// Edit controller or session misuse.
    #[error(transparent)]
    Edit(#[from] EditError),

    /// JSON serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Local I/O failed (reading an image, writing a download).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns the HTTP status code if this error came from an HTTP response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api(api) => api.status_code(),
            _ => None,
        }
    }

    /// Returns the most specific message available for showing to a user.
    ///
    /// Service errors yield the server-provided detail rather than the
    /// `HTTP <status>:` prefixed display string.
    pub fn detail(&self) -> String {
        match self {
            Self::Api(ApiError::Http { message, .. }) => message.clone(),
            Self::OcrFailed(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::Api(ApiError::Network(e))
    }
}
