//! Client records and the public-booking contact key.

use thiserror::Error;

use crate::domain::ids::ClientId;

/// Validation errors for client records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientValidationError {
    /// The client name is required and must not be blank.
    #[error("client name must not be empty")]
    EmptyName,
}

/// Exact-match key used to deduplicate clients in the public booking flow.
///
/// A booking reuses an existing client when both the trimmed name and the
/// trimmed phone match exactly; first match wins and no fuzzy matching is
/// attempted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientContact {
    name: String,
    phone: Option<String>,
}

impl ClientContact {
    /// Build a contact key from raw booking input.
    pub fn new(name: &str, phone: Option<&str>) -> Result<Self, ClientValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ClientValidationError::EmptyName);
        }
        let phone = phone
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(ToOwned::to_owned);
        Ok(Self {
            name: name.to_owned(),
            phone,
        })
    }

    /// The trimmed client name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// The trimmed phone, when one was supplied.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    /// Whether a stored client matches this key exactly.
    #[must_use]
    pub fn matches(&self, client: &Client) -> bool {
        client.name == self.name && client.phone.as_deref() == self.phone()
    }
}

/// A stored client record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    /// Record id.
    pub id: ClientId,
    /// Display name, trimmed and non-empty.
    pub name: String,
    /// Contact phone.
    pub phone: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Postal address.
    pub address: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Whether the client is active.
    pub is_active: bool,
}

impl Client {
    /// Create a fresh active client from a booking contact.
    #[must_use]
    pub fn from_contact(contact: &ClientContact, email: Option<String>) -> Self {
        Self {
            id: ClientId::random(),
            name: contact.name().to_owned(),
            phone: contact.phone().map(ToOwned::to_owned),
            email: email
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty()),
            address: None,
            notes: None,
            is_active: true,
        }
    }
}
