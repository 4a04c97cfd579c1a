use retitle_core::RuleError;
use thiserror::Error;

/// Errors raised by the remote collaborators.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Transport failure or an unreadable body.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// TMDB answered with its own error document.
    #[error("tmdb error [{code}] {message}")]
    Tmdb { code: i64, message: String },

    /// Non-success status without a usable error document.
    #[error("http status {status}: {message}")]
    Status { status: u16, message: String },

    /// The rule API answered 200 but with a failure code in its envelope.
    #[error("request rejected [{code}] {message}")]
    Rejected { code: i64, message: String },

    /// The body did not match the expected JSON shape.
    #[error("invalid json response: {0}")]
    Json(#[from] serde_json::Error),

    /// A required credential or endpoint was empty.
    #[error("missing {0}")]
    MissingCredential(&'static str),
}

impl RemoteError {
    /// Converts into the core error reported by a metadata source.
    #[must_use]
    pub fn into_metadata(self) -> RuleError {
        RuleError::Metadata(self.to_string())
    }

    /// Converts into the core error reported by a rule store.
    #[must_use]
    pub fn into_storage(self) -> RuleError {
        RuleError::Storage(self.to_string())
    }
}

/// Result type alias for remote operations.
pub type Result<T> = std::result::Result<T, RemoteError>;
