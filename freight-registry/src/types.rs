//! Core types for the freight registry
//!
//! Records keep what the operator typed (parsed into numbers), never a
//! derived price. Prices are recomputed on every read, see [`crate::view`].

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use pricing_engine::{AdvancePayment, Dimensions, RawQuoteInput, TransportMode, Weights};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Country served by the freight lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Country {
    /// Senegal
    Senegal,
    /// Mali
    Mali,
    /// Gambia
    Gambia,
    /// France
    France,
}

impl Country {
    /// All countries, in display order
    pub const ALL: [Country; 4] = [
        Country::Senegal,
        Country::Mali,
        Country::Gambia,
        Country::France,
    ];

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            Country::Senegal => "Senegal",
            Country::Mali => "Mali",
            Country::Gambia => "Gambia",
            Country::France => "France",
        }
    }

    /// Two-letter prefix used in freight and tracking numbers
    pub fn prefix(&self) -> &'static str {
        match self {
            Country::Senegal => "SE",
            Country::Mali => "MA",
            Country::Gambia => "GA",
            Country::France => "FR",
        }
    }
}

impl FromStr for Country {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Country::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::InvalidCountry(s.to_string()))
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lifecycle of a freight number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentStatus {
    /// Open for new shipments
    #[default]
    Pending,
    /// Departed
    InTransit,
    /// Arrived
    Delivered,
    /// Cancelled
    Cancelled,
}

impl ShipmentStatus {
    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipmentStatus::Pending => "pending",
            ShipmentStatus::InTransit => "in_transit",
            ShipmentStatus::Delivered => "delivered",
            ShipmentStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Freight number (one consolidated departure)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreightNumber {
    /// Record ID
    pub id: Uuid,
    /// Formatted number, e.g. `FR-FRET-0001`
    pub number: String,
    /// Transport mode; fixed at creation
    pub mode: TransportMode,
    /// Origin country
    pub origin: Country,
    /// Destination country
    pub destination: Country,
    /// Lifecycle status
    pub status: ShipmentStatus,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
}

/// Form for a new freight number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFreightNumber {
    /// Sequence digits, padded to four
    pub digits: String,
    /// Transport mode
    pub mode: TransportMode,
    /// Origin country
    pub origin: Country,
    /// Destination country
    pub destination: Country,
}

/// Editable fields of a freight number
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FreightNumberUpdate {
    /// New origin
    pub origin: Option<Country>,
    /// New destination
    pub destination: Option<Country>,
    /// New status
    pub status: Option<ShipmentStatus>,
}

/// Sender of a shipment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    /// Full name
    pub name: String,
    /// Phone number
    pub phone: String,
}

/// Recipient of a shipment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    /// Full name
    pub name: String,
    /// Phone number
    pub phone: String,
    /// Email, optional
    pub email: Option<String>,
    /// Street address
    pub street: String,
    /// City
    pub city: String,
    /// Landmark near the address
    pub landmark: String,
    /// Delivery notes
    pub notes: String,
}

/// Shipment (one client parcel on a freight number)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    /// Record ID
    pub id: Uuid,
    /// Owning freight number
    pub freight_number_id: Uuid,
    /// Tracking number, e.g. `FR-FRET0001-HYYC`
    pub tracking_number: String,
    /// Sender
    pub sender: Sender,
    /// Recipient
    pub recipient: Recipient,
    /// Declared weights
    pub weights: Weights,
    /// Measured dimensions
    pub dimensions: Dimensions,
    /// Package type
    pub package_type: String,
    /// Packaging
    pub packaging: String,
    /// Special handling instructions
    pub special_handling: Vec<String>,
    /// Free comments
    pub comments: String,
    /// Advance paid at drop-off
    pub advance: Option<AdvancePayment>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
}

/// Shipment form as submitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewShipment {
    /// Owning freight number
    pub freight_number_id: Uuid,
    /// Sender
    #[serde(default)]
    pub sender: Sender,
    /// Recipient
    #[serde(default)]
    pub recipient: Recipient,
    /// Weights, dimensions and advance as typed
    #[serde(flatten)]
    pub quote: RawQuoteInput,
    /// Package type
    #[serde(default)]
    pub package_type: String,
    /// Packaging
    #[serde(default)]
    pub packaging: String,
    /// Special handling instructions
    #[serde(default)]
    pub special_handling: Vec<String>,
    /// Free comments
    #[serde(default)]
    pub comments: String,
}

impl NewShipment {
    /// Empty form for `freight_number_id`
    pub fn for_freight(freight_number_id: Uuid) -> Self {
        Self {
            freight_number_id,
            sender: Sender::default(),
            recipient: Recipient::default(),
            quote: RawQuoteInput::default(),
            package_type: String::new(),
            packaging: String::new(),
            special_handling: Vec::new(),
            comments: String::new(),
        }
    }
}

/// Editable fields of a shipment
///
/// `quote` replaces weights, dimensions and advance together, the way the
/// form resubmits them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShipmentUpdate {
    /// New sender
    pub sender: Option<Sender>,
    /// New recipient
    pub recipient: Option<Recipient>,
    /// New weights, dimensions and advance
    pub quote: Option<RawQuoteInput>,
    /// New package type
    pub package_type: Option<String>,
    /// New packaging
    pub packaging: Option<String>,
    /// New special handling list
    pub special_handling: Option<Vec<String>>,
    /// New comments
    pub comments: Option<String>,
}

impl Shipment {
    /// Whether the tracking number, a contact name or a contact phone
    /// contains `needle`, which must already be lowercase
    pub fn matches(&self, needle: &str) -> bool {
        needle.is_empty()
            || [
                self.tracking_number.as_str(),
                self.sender.name.as_str(),
                self.sender.phone.as_str(),
                self.recipient.name.as_str(),
                self.recipient.phone.as_str(),
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

impl Sender {
    /// Copy with surrounding whitespace removed
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
        }
    }
}

impl Recipient {
    /// Copy with surrounding whitespace removed and an empty email dropped
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self
                .email
                .as_deref()
                .map(str::trim)
                .filter(|e| !e.is_empty())
                .map(str::to_string),
            street: self.street.trim().to_string(),
            city: self.city.trim().to_string(),
            landmark: self.landmark.trim().to_string(),
            notes: self.notes.trim().to_string(),
        }
    }
}
