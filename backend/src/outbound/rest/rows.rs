//! Wire rows for the hosted data API tables.
//!
//! Amounts travel as decimal strings, slots as their `"HH:MM"` labels, and
//! statuses as their snake_case labels. Conversion into domain types is
//! fallible; a malformed stored row surfaces as a decode error rather than a
//! panic.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::appointment::{Appointment, AppointmentStatus};
use crate::domain::client::Client;
use crate::domain::ids::{
    AppointmentId, ClientId, ModelId, PaymentId, ServiceId,
};
use crate::domain::money::Money;
use crate::domain::payment::{Payment, PaymentMethod};
use crate::domain::schedule::Slot;
use crate::domain::service_offering::ServiceOffering;

/// A stored row failed to convert into its domain type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed stored row: {message}")]
pub struct RowError {
    message: String,
}

impl RowError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Row shape of the `appointments` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentRow {
    pub id: Uuid,
    pub model_id: Uuid,
    pub client_id: Uuid,
    pub service_id: Uuid,
    pub date: NaiveDate,
    pub slot: String,
    pub duration_minutes: u32,
    pub price: String,
    pub status: String,
    pub location: Option<String>,
    pub observations: Option<String>,
    pub created_by_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Appointment> for AppointmentRow {
    fn from(appointment: &Appointment) -> Self {
        Self {
            id: *appointment.id.as_uuid(),
            model_id: *appointment.model_id.as_uuid(),
            client_id: *appointment.client_id.as_uuid(),
            service_id: *appointment.service_id.as_uuid(),
            date: appointment.date,
            slot: appointment.slot.label(),
            duration_minutes: appointment.duration_minutes,
            price: appointment.price.to_string(),
            status: appointment.status.as_str().to_owned(),
            location: appointment.location.clone(),
            observations: appointment.observations.clone(),
            created_by_admin: appointment.created_by_admin,
            created_at: appointment.created_at,
        }
    }
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = RowError;

    fn try_from(row: AppointmentRow) -> Result<Self, Self::Error> {
        let slot: Slot = row
            .slot
            .parse()
            .map_err(|error| RowError::new(format!("appointment {}: {error}", row.id)))?;
        let price: Money = row
            .price
            .parse()
            .map_err(|error| RowError::new(format!("appointment {}: {error}", row.id)))?;
        let status: AppointmentStatus = row
            .status
            .parse()
            .map_err(|error| RowError::new(format!("appointment {}: {error}", row.id)))?;
        Ok(Self {
            id: AppointmentId::from(row.id),
            model_id: ModelId::from(row.model_id),
            client_id: ClientId::from(row.client_id),
            service_id: ServiceId::from(row.service_id),
            date: row.date,
            slot,
            duration_minutes: row.duration_minutes,
            price,
            status,
            location: row.location,
            observations: row.observations,
            created_by_admin: row.created_by_admin,
            created_at: row.created_at,
        })
    }
}

/// Row shape of the `payments` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRow {
    pub id: Uuid,
    pub appointment_id: Uuid,
    pub amount: String,
    pub payment_date: NaiveDate,
    pub method: String,
    pub notes: Option<String>,
}

impl From<&Payment> for PaymentRow {
    fn from(payment: &Payment) -> Self {
        Self {
            id: *payment.id.as_uuid(),
            appointment_id: *payment.appointment_id.as_uuid(),
            amount: payment.amount.to_string(),
            payment_date: payment.payment_date,
            method: payment.method.as_str().to_owned(),
            notes: payment.notes.clone(),
        }
    }
}

impl TryFrom<PaymentRow> for Payment {
    type Error = RowError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        let amount: Money = row
            .amount
            .parse()
            .map_err(|error| RowError::new(format!("payment {}: {error}", row.id)))?;
        let method: PaymentMethod = row
            .method
            .parse()
            .map_err(|error| RowError::new(format!("payment {}: {error}", row.id)))?;
        Ok(Self {
            id: PaymentId::from(row.id),
            appointment_id: AppointmentId::from(row.appointment_id),
            amount,
            payment_date: row.payment_date,
            method,
            notes: row.notes,
        })
    }
}

/// Projection row carrying only a ledger amount.
#[derive(Debug, Clone, Deserialize)]
pub struct AmountRow {
    pub amount: String,
}

impl TryFrom<AmountRow> for Money {
    type Error = RowError;

    fn try_from(row: AmountRow) -> Result<Self, Self::Error> {
        row.amount
            .parse()
            .map_err(|error| RowError::new(format!("ledger amount: {error}")))
    }
}

/// Row shape of the `clients` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientRow {
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub is_active: bool,
}

impl From<&Client> for ClientRow {
    fn from(client: &Client) -> Self {
        Self {
            id: *client.id.as_uuid(),
            name: client.name.clone(),
            phone: client.phone.clone(),
            email: client.email.clone(),
            address: client.address.clone(),
            notes: client.notes.clone(),
            is_active: client.is_active,
        }
    }
}

impl From<ClientRow> for Client {
    fn from(row: ClientRow) -> Self {
        Self {
            id: ClientId::from(row.id),
            name: row.name,
            phone: row.phone,
            email: row.email,
            address: row.address,
            notes: row.notes,
            is_active: row.is_active,
        }
    }
}

/// Row shape of the `services` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRow {
    pub id: Uuid,
    pub model_id: Uuid,
    pub name: String,
    pub price: String,
    pub duration_minutes: u32,
    pub max_people: u32,
    pub is_active: bool,
}

impl TryFrom<ServiceRow> for ServiceOffering {
    type Error = RowError;

    fn try_from(row: ServiceRow) -> Result<Self, Self::Error> {
        let price: Money = row
            .price
            .parse()
            .map_err(|error| RowError::new(format!("service {}: {error}", row.id)))?;
        Ok(Self {
            id: ServiceId::from(row.id),
            model_id: ModelId::from(row.model_id),
            name: row.name,
            price,
            duration_minutes: row.duration_minutes,
            max_people: row.max_people,
            is_active: row.is_active,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use chrono::Utc;

    use super::*;
    use crate::domain::appointment::AppointmentDraft;
    use crate::domain::payment::PaymentDraft;

    fn appointment() -> Appointment {
        Appointment::new(AppointmentDraft {
            model_id: ModelId::random(),
            client_id: ClientId::random(),
            service_id: ServiceId::random(),
            date: "2025-03-01".parse().expect("valid date"),
            slot: "14:30".parse().expect("valid slot"),
            duration_minutes: 90,
            price: "350.00".parse().expect("valid price"),
            location: Some("studio".to_owned()),
            observations: None,
            created_by_admin: true,
            created_at: Utc::now(),
        })
        .expect("valid appointment")
    }

    #[test]
    fn appointment_rows_convert_both_ways() {
        let original = appointment();
        let row = AppointmentRow::from(&original);
        assert_eq!(row.slot, "14:30");
        assert_eq!(row.price, "350.00");
        assert_eq!(row.status, "pending");

        let decoded = Appointment::try_from(row).expect("row decodes");
        assert_eq!(decoded, original);
    }

    #[test]
    fn malformed_appointment_rows_are_rejected() {
        let mut row = AppointmentRow::from(&appointment());
        row.slot = "20:45".to_owned();
        assert!(Appointment::try_from(row.clone()).is_err());

        row.slot = "14:30".to_owned();
        row.status = "archived".to_owned();
        assert!(Appointment::try_from(row).is_err());
    }

    #[test]
    fn payment_rows_convert_both_ways() {
        let original = Payment::new(PaymentDraft {
            appointment_id: AppointmentId::random(),
            amount: "50.00".parse().expect("valid amount"),
            payment_date: "2025-03-01".parse().expect("valid date"),
            method: PaymentMethod::Pix,
            notes: Some("deposit".to_owned()),
        })
        .expect("valid entry");

        let row = PaymentRow::from(&original);
        assert_eq!(row.amount, "50.00");
        assert_eq!(row.method, "pix");

        let decoded = Payment::try_from(row).expect("row decodes");
        assert_eq!(decoded, original);
    }

    #[test]
    fn negative_stored_amounts_are_rejected() {
        let result = Money::try_from(AmountRow {
            amount: "-5.00".to_owned(),
        });
        assert!(result.is_err());
    }
}
