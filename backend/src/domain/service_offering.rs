//! Service offerings: the read-only pricing source for bookings.
//!
//! Price and duration are copied onto the appointment at creation time, so a
//! later change to an offering never retroactively alters existing bookings.

use thiserror::Error;

use crate::domain::ids::{ModelId, ServiceId};
use crate::domain::money::Money;

/// Validation errors for service offerings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceOfferingValidationError {
    /// The offering name is required.
    #[error("service name must not be empty")]
    EmptyName,
    /// Offerings must carry a strictly positive price.
    #[error("service price must be greater than zero")]
    ZeroPrice,
    /// Offerings must last at least one minute.
    #[error("service duration must be greater than zero minutes")]
    ZeroDuration,
}

/// A bookable service published by a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceOffering {
    /// Record id.
    pub id: ServiceId,
    /// The model publishing this offering.
    pub model_id: ModelId,
    /// Display name.
    pub name: String,
    /// Current price; snapshotted onto appointments at booking time.
    pub price: Money,
    /// Current duration; snapshotted onto appointments at booking time.
    pub duration_minutes: u32,
    /// Maximum number of people the offering covers.
    pub max_people: u32,
    /// Whether the offering may be booked.
    pub is_active: bool,
}

impl ServiceOffering {
    /// Validate the record shape as read from the backend boundary.
    pub fn validate(&self) -> Result<(), ServiceOfferingValidationError> {
        if self.name.trim().is_empty() {
            return Err(ServiceOfferingValidationError::EmptyName);
        }
        if self.price.is_zero() {
            return Err(ServiceOfferingValidationError::ZeroPrice);
        }
        if self.duration_minutes == 0 {
            return Err(ServiceOfferingValidationError::ZeroDuration);
        }
        Ok(())
    }
}
