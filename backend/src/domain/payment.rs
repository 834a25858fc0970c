//! Payment ledger entries and the derived payment status.
//!
//! An appointment's payment status is never stored; it is recomputed from the
//! full ledger sum on every read and after every ledger mutation. Recomputing
//! from the sum rather than incrementing a stored counter makes concurrent
//! inserts convergent regardless of order.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::ids::{AppointmentId, PaymentId};
use crate::domain::money::{Money, MoneyError};

/// How a payment was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Instant bank transfer (PIX).
    Pix,
    /// Cash on location.
    Cash,
    /// Credit or debit card.
    Card,
    /// Conventional bank transfer.
    Transfer,
    /// Anything else, described in the notes.
    Other,
}

impl PaymentMethod {
    /// Stable wire label for this method.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pix => "pix",
            Self::Cash => "cash",
            Self::Card => "card",
            Self::Transfer => "transfer",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = PaymentValidationError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input {
            "pix" => Ok(Self::Pix),
            "cash" => Ok(Self::Cash),
            "card" => Ok(Self::Card),
            "transfer" => Ok(Self::Transfer),
            "other" => Ok(Self::Other),
            _ => Err(PaymentValidationError::UnknownMethod {
                value: input.to_owned(),
            }),
        }
    }
}

/// Derived settlement state of an appointment's ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Nothing has been paid yet.
    Pending,
    /// Something has been paid, but less than the appointment price.
    Partial,
    /// The full price (or more) has been paid.
    Paid,
}

impl PaymentStatus {
    /// Stable wire label for this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Partial => "partial",
            Self::Paid => "paid",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derive the payment status from the appointment price and the full ledger.
///
/// Pure and idempotent: `total == 0` is pending, `0 < total < price` is
/// partial, `total >= price` is paid. Overpayment stays `Paid`; there is no
/// refund handling.
///
/// # Examples
/// ```
/// use backend::domain::{derive_payment_status, Money, PaymentStatus};
///
/// let price: Money = "200.00".parse().expect("valid price");
/// let paid: Vec<Money> = vec!["50.00".parse().expect("valid"), "150.00".parse().expect("valid")];
/// assert_eq!(
///     derive_payment_status(price, paid).expect("sum fits"),
///     PaymentStatus::Paid
/// );
/// ```
pub fn derive_payment_status(
    price: Money,
    amounts: impl IntoIterator<Item = Money>,
) -> Result<PaymentStatus, MoneyError> {
    let total = Money::sum(amounts)?;
    Ok(if total.is_zero() {
        PaymentStatus::Pending
    } else if total < price {
        PaymentStatus::Partial
    } else {
        PaymentStatus::Paid
    })
}

/// Validation errors for ledger entries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentValidationError {
    /// Ledger entries must move money.
    #[error("payment amount must be greater than zero")]
    ZeroAmount,
    /// The method label is not one of the supported values.
    #[error("unknown payment method {value:?}")]
    UnknownMethod {
        /// The rejected input.
        value: String,
    },
}

/// One append-only entry in an appointment's payment ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    /// Ledger entry id.
    pub id: PaymentId,
    /// The appointment this entry settles against.
    pub appointment_id: AppointmentId,
    /// Strictly positive amount.
    pub amount: Money,
    /// Calendar date the payment was made.
    pub payment_date: NaiveDate,
    /// Settlement method.
    pub method: PaymentMethod,
    /// Free-form operator notes.
    pub notes: Option<String>,
}

/// Fields required to append a ledger entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentDraft {
    /// The appointment this entry settles against.
    pub appointment_id: AppointmentId,
    /// Strictly positive amount.
    pub amount: Money,
    /// Calendar date the payment was made.
    pub payment_date: NaiveDate,
    /// Settlement method.
    pub method: PaymentMethod,
    /// Free-form operator notes.
    pub notes: Option<String>,
}

impl Payment {
    /// Validate a draft into a ledger entry with a fresh id.
    pub fn new(draft: PaymentDraft) -> Result<Self, PaymentValidationError> {
        if draft.amount.is_zero() {
            return Err(PaymentValidationError::ZeroAmount);
        }
        Ok(Self {
            id: PaymentId::random(),
            appointment_id: draft.appointment_id,
            amount: draft.amount,
            payment_date: draft.payment_date,
            method: draft.method,
            notes: draft.notes,
        })
    }
}
