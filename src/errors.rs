use thiserror::Error;

/// Errors surfaced by the cart engine.
///
/// Lookups for absent lines are deliberately not represented here:
/// `remove_line` and `update_quantity` are idempotent no-ops when the
/// targeted line does not exist.
#[derive(Debug, Error)]
pub enum CartError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid product: {0}")]
    InvalidProduct(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors raised while loading and validating [`CartConfig`](crate::CartConfig).
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
}
