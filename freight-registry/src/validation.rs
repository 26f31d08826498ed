//! Shipment form validation
//!
//! Every failing field is reported, not just the first one.

use crate::error::FieldError;
use crate::types::{Recipient, Sender};
use crate::{Error, Result};
use regex::Regex;

const PHONE_PATTERN: &str = r"^\+?[\d\s-]{8,}$";
const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

/// Validator for shipment contact and packaging fields
#[derive(Debug, Clone)]
pub struct ShipmentValidator {
    /// Regex for phone numbers
    phone_regex: Regex,

    /// Regex for email addresses
    email_regex: Regex,
}

impl ShipmentValidator {
    /// Create validator
    pub fn new() -> Result<Self> {
        Ok(Self {
            phone_regex: Regex::new(PHONE_PATTERN)?,
            email_regex: Regex::new(EMAIL_PATTERN)?,
        })
    }

    /// Check whether `phone` is an acceptable phone number
    pub fn is_valid_phone(&self, phone: &str) -> bool {
        self.phone_regex.is_match(phone)
    }

    /// Check whether `email` is an acceptable email address
    pub fn is_valid_email(&self, email: &str) -> bool {
        self.email_regex.is_match(email)
    }

    /// Validate trimmed contact fields and packaging
    pub fn validate(&self, sender: &Sender, recipient: &Recipient, packaging: &str) -> Result<()> {
        let mut errors = Vec::new();

        required(&mut errors, "sender.name", &sender.name);
        self.phone(&mut errors, "sender.phone", &sender.phone);
        required(&mut errors, "recipient.name", &recipient.name);
        self.phone(&mut errors, "recipient.phone", &recipient.phone);

        if let Some(email) = recipient.email.as_deref() {
            if !self.is_valid_email(email) {
                errors.push(FieldError::new("recipient.email", "invalid email address"));
            }
        }

        required(&mut errors, "packaging", packaging);

        if errors.is_empty() {
            Ok(())
        } else {
            tracing::debug!("Shipment form rejected: {} field(s)", errors.len());
            Err(Error::Validation(errors))
        }
    }

    fn phone(&self, errors: &mut Vec<FieldError>, field: &str, phone: &str) {
        if phone.is_empty() {
            errors.push(FieldError::new(field, "is required"));
        } else if !self.is_valid_phone(phone) {
            errors.push(FieldError::new(field, "invalid phone number"));
        }
    }
}

fn required(errors: &mut Vec<FieldError>, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, "is required"));
    }
}
