use thiserror::Error;

/// Errors that can occur while configuring or running the rule compiler.
#[derive(Debug, Error)]
pub enum RuleError {
    /// The naming configuration is contradictory or incomplete.
    #[error("invalid naming config: {0}")]
    InvalidConfig(String),

    /// A part-episode map entry could not be accepted.
    #[error("invalid part episode map: {0}")]
    InvalidPartMap(String),

    /// A regex pattern failed to compile (should not happen with static patterns).
    #[error("regex compilation error: {0}")]
    RegexError(#[from] regex::Error),

    /// The metadata collaborator could not supply show or movie data.
    #[error("metadata unavailable: {0}")]
    Metadata(String),

    /// The rule-storage collaborator refused a request.
    #[error("rule storage failed: {0}")]
    Storage(String),
}

/// Result type alias for rule compiler operations.
pub type Result<T> = std::result::Result<T, RuleError>;
