use thiserror::Error;

/// Errors raised at the fallible boundaries of the engine.
///
/// The analyzers themselves are total functions; only request parsing and
/// configuration loading can fail.
#[derive(Error, Debug)]
pub enum ValuationError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unsupported schema version: found {found}, expected {expected}")]
    SchemaVersion { found: u8, expected: u8 },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("Failed to read config {path}: {source}")]
    ConfigIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ValuationError {
    /// Whether the caller can retry with corrected input.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ValuationError::InvalidRequest(_)
                | ValuationError::SchemaVersion { .. }
                | ValuationError::Serialization(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ValuationError>;
