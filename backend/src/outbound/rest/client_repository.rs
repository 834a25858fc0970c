//! Hosted-data-API adapter for the client repository port.

use async_trait::async_trait;

use super::rows::ClientRow;
use super::transport::{RestTransport, TransportError};
use crate::domain::client::{Client, ClientContact};
use crate::domain::ids::ClientId;
use crate::domain::ports::{ClientRepository, ClientRepositoryError};

const TABLE: &str = "clients";

fn map_transport_error(error: TransportError) -> ClientRepositoryError {
    match error {
        TransportError::Connection { message } => ClientRepositoryError::connection(message),
        other => ClientRepositoryError::query(other.to_string()),
    }
}

/// Client repository backed by the `clients` table.
#[derive(Debug, Clone)]
pub struct RestClientRepository {
    transport: RestTransport,
}

impl RestClientRepository {
    /// Build an adapter over a shared transport.
    #[must_use]
    pub fn new(transport: RestTransport) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl ClientRepository for RestClientRepository {
    async fn insert(&self, client: &Client) -> Result<(), ClientRepositoryError> {
        self.transport
            .insert(TABLE, &ClientRow::from(client))
            .await
            .map_err(map_transport_error)
    }

    async fn find_by_id(&self, id: &ClientId) -> Result<Option<Client>, ClientRepositoryError> {
        let rows: Vec<ClientRow> = self
            .transport
            .select(TABLE, &[("id", format!("eq.{id}"))])
            .await
            .map_err(map_transport_error)?;
        Ok(rows.into_iter().next().map(Client::from))
    }

    async fn find_by_contact(
        &self,
        contact: &ClientContact,
    ) -> Result<Option<Client>, ClientRepositoryError> {
        let phone_filter = match contact.phone() {
            Some(phone) => ("phone", format!("eq.{phone}")),
            None => ("phone", "is.null".to_owned()),
        };
        let rows: Vec<ClientRow> = self
            .transport
            .select(
                TABLE,
                &[("name", format!("eq.{}", contact.name())), phone_filter],
            )
            .await
            .map_err(map_transport_error)?;

        // The filter match is re-checked locally so a lenient backend
        // collation can never alias two different contact keys.
        Ok(rows
            .into_iter()
            .map(Client::from)
            .find(|client| contact.matches(client)))
    }
}
