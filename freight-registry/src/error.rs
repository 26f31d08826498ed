//! Error types for the freight registry

use thiserror::Error;
use uuid::Uuid;

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, Error>;

/// One rejected form field
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FieldError {
    /// Dotted field path, e.g. `recipient.phone`
    pub field: String,
    /// Human-readable reason
    pub message: String,
}

impl FieldError {
    /// Create field error
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Registry errors
#[derive(Error, Debug)]
pub enum Error {
    /// Pricing failed (unknown mode, overflow, bad configuration)
    #[error("Pricing error: {0}")]
    Pricing(#[from] pricing_engine::Error),

    /// Freight number not found
    #[error("Freight number not found: {0}")]
    FreightNumberNotFound(Uuid),

    /// Shipment not found
    #[error("Shipment not found: {0}")]
    ShipmentNotFound(Uuid),

    /// Freight number already registered
    #[error("Freight number already exists: {0}")]
    DuplicateFreightNumber(String),

    /// Freight number digits malformed
    #[error("Invalid freight number: {0}")]
    InvalidFreightNumber(String),

    /// Country outside the served routes
    #[error("Invalid country: {0}")]
    InvalidCountry(String),

    /// Shipment form rejected
    #[error("Validation failed: {}", join_fields(.0))]
    Validation(Vec<FieldError>),

    /// Freight number still carries shipments
    #[error("Freight number {number} still has {count} shipment(s)")]
    HasShipments {
        /// Formatted freight number
        number: String,
        /// Shipments referencing it
        count: usize,
    },

    /// Update would not change anything
    #[error("No changes to apply")]
    NoChanges,

    /// No free tracking number found for a freight number
    #[error("Could not allocate a tracking number for {0}")]
    TrackingNumberExhausted(String),

    /// Metrics collector could not be registered
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// Validation pattern failed to compile
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

impl Error {
    /// Field errors of a `Validation` failure
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Error::Validation(errors) => errors,
            _ => &[],
        }
    }
}
