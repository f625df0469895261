use thiserror::Error;

/// Reasons an effect configuration is rejected at construction time.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("`{field}` must be {expected}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        expected: &'static str,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
