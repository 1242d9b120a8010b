//! Booster Forge CLI error types.

use booster_content::error::ContentError;
use booster_core::error::DomainError;
use thiserror::Error;

/// Startup and runtime errors for the command-line driver.
#[derive(Debug, Error)]
pub enum AppError {
    /// An environment variable holds an unusable value.
    #[error("configuration error: {0}")]
    Config(String),

    /// A catalog could not be read or parsed.
    #[error("content error: {0}")]
    Content(#[from] ContentError),

    /// Opening a booster failed.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// Writing the report failed.
    #[error("output error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding the JSON report failed.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
