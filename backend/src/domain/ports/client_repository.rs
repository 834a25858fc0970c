//! Port for client persistence and contact-key lookup.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::client::{Client, ClientContact};
use crate::domain::ids::ClientId;

/// Errors raised by client repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientRepositoryError {
    /// The backend could not be reached.
    #[error("client store unreachable: {message}")]
    Connection {
        /// Adapter-supplied failure description.
        message: String,
    },
    /// A query or mutation failed during execution.
    #[error("client store query failed: {message}")]
    Query {
        /// Adapter-supplied failure description.
        message: String,
    },
}

impl ClientRepositoryError {
    /// Connection-failure constructor.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Query-failure constructor.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Port for reading and creating client records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClientRepository: Send + Sync {
    /// Persist a new client.
    async fn insert(&self, client: &Client) -> Result<(), ClientRepositoryError>;

    /// Find a client by id.
    async fn find_by_id(&self, id: &ClientId) -> Result<Option<Client>, ClientRepositoryError>;

    /// Find the first client matching the exact contact key.
    async fn find_by_contact(
        &self,
        contact: &ClientContact,
    ) -> Result<Option<Client>, ClientRepositoryError>;
}

/// Fixture implementation for tests that do not exercise clients.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureClientRepository;

#[async_trait]
impl ClientRepository for FixtureClientRepository {
    async fn insert(&self, _client: &Client) -> Result<(), ClientRepositoryError> {
        Ok(())
    }

    async fn find_by_id(&self, _id: &ClientId) -> Result<Option<Client>, ClientRepositoryError> {
        Ok(None)
    }

    async fn find_by_contact(
        &self,
        _contact: &ClientContact,
    ) -> Result<Option<Client>, ClientRepositoryError> {
        Ok(None)
    }
}
