//! Shared validation helpers for inbound HTTP adapters.

use chrono::NaiveDate;
use serde_json::json;
use uuid::Uuid;

use crate::domain::{Error, Money, Slot};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidDate,
    InvalidSlot,
    InvalidAmount,
    InvalidStatus,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidDate => "invalid_date",
            ErrorCode::InvalidSlot => "invalid_slot",
            ErrorCode::InvalidAmount => "invalid_amount",
            ErrorCode::InvalidStatus => "invalid_status",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

fn field_error(field: FieldName, code: ErrorCode, message: String, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    Error::invalid_request(format!("missing required field: {name}")).with_details(json!({
        "field": name,
        "code": ErrorCode::MissingField.as_str(),
    }))
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| {
        field_error(
            field,
            ErrorCode::InvalidUuid,
            format!("{} must be a valid UUID", field.as_str()),
            value,
        )
    })
}

pub(crate) fn parse_date(value: &str, field: FieldName) -> Result<NaiveDate, Error> {
    value.parse().map_err(|_| {
        field_error(
            field,
            ErrorCode::InvalidDate,
            format!("{} must be an ISO calendar date (YYYY-MM-DD)", field.as_str()),
            value,
        )
    })
}

pub(crate) fn parse_slot(value: &str, field: FieldName) -> Result<Slot, Error> {
    value.parse().map_err(|error| {
        field_error(
            field,
            ErrorCode::InvalidSlot,
            format!("{error}"),
            value,
        )
    })
}

pub(crate) fn parse_money(value: &str, field: FieldName) -> Result<Money, Error> {
    value.parse().map_err(|error| {
        field_error(
            field,
            ErrorCode::InvalidAmount,
            format!("{error}"),
            value,
        )
    })
}

pub(crate) fn invalid_status_error(field: FieldName, value: &str) -> Error {
    field_error(
        field,
        ErrorCode::InvalidStatus,
        format!("{} is not a recognised status", field.as_str()),
        value,
    )
}
