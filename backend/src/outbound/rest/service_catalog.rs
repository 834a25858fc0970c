//! Hosted-data-API adapter for the service catalogue port.

use async_trait::async_trait;

use super::rows::ServiceRow;
use super::transport::{RestTransport, TransportError};
use crate::domain::ids::{ModelId, ServiceId};
use crate::domain::ports::{ServiceCatalog, ServiceCatalogError};
use crate::domain::service_offering::ServiceOffering;

const TABLE: &str = "services";

fn map_transport_error(error: TransportError) -> ServiceCatalogError {
    match error {
        TransportError::Connection { message } => ServiceCatalogError::connection(message),
        other => ServiceCatalogError::query(other.to_string()),
    }
}

/// Service catalogue backed by the `services` table.
#[derive(Debug, Clone)]
pub struct RestServiceCatalog {
    transport: RestTransport,
}

impl RestServiceCatalog {
    /// Build an adapter over a shared transport.
    #[must_use]
    pub fn new(transport: RestTransport) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl ServiceCatalog for RestServiceCatalog {
    async fn find_by_id(
        &self,
        id: &ServiceId,
    ) -> Result<Option<ServiceOffering>, ServiceCatalogError> {
        let rows: Vec<ServiceRow> = self
            .transport
            .select(TABLE, &[("id", format!("eq.{id}"))])
            .await
            .map_err(map_transport_error)?;
        rows.into_iter()
            .next()
            .map(ServiceOffering::try_from)
            .transpose()
            .map_err(|error| ServiceCatalogError::query(error.to_string()))
    }

    async fn list_active_for_model(
        &self,
        model_id: &ModelId,
    ) -> Result<Vec<ServiceOffering>, ServiceCatalogError> {
        let rows: Vec<ServiceRow> = self
            .transport
            .select(
                TABLE,
                &[
                    ("model_id", format!("eq.{model_id}")),
                    ("is_active", "eq.true".to_owned()),
                    ("order", "name.asc".to_owned()),
                ],
            )
            .await
            .map_err(map_transport_error)?;
        rows.into_iter()
            .map(ServiceOffering::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|error| ServiceCatalogError::query(error.to_string()))
    }
}
