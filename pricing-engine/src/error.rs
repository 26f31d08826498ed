//! Error types for pricing engine

use thiserror::Error;

/// Pricing engine error
#[derive(Debug, Error)]
pub enum Error {
    /// Transport mode outside {air, sea, gp}
    #[error("Invalid transport mode: {0}")]
    InvalidMode(String),

    /// Currency outside {EUR, XOF}
    #[error("Invalid currency: {0}")]
    InvalidCurrency(String),

    /// Rate table or exchange rate rejected by validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Decimal arithmetic left the representable range
    #[error("Arithmetic overflow: {0}")]
    Overflow(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
