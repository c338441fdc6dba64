use thiserror::Error;

/// Errors the parser itself can raise.
///
/// Everything short of a contradictory configuration degrades to a
/// well-formed (possibly empty) graph instead of an error.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The supplied `ParseConfig` is malformed or self-contradictory,
    /// e.g. duplicate preset column titles or an ambiguous alias chain.
    #[error("invalid parse config: {0}")]
    InvalidConfig(String),
}

/// Errors raised by the transcript store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No raw transcript or parsed graph exists under the given name.
    #[error("transcript source not found: {0}")]
    InputNotFound(String),

    /// The name contains path separators or other rejected characters.
    #[error("invalid store name: {0}")]
    InvalidName(String),

    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("graph (de)serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}
