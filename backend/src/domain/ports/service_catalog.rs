//! Port for the read-only service offering catalogue.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::ids::{ModelId, ServiceId};
use crate::domain::service_offering::ServiceOffering;

/// Errors raised by service catalogue adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceCatalogError {
    /// The backend could not be reached.
    #[error("service catalogue unreachable: {message}")]
    Connection {
        /// Adapter-supplied failure description.
        message: String,
    },
    /// A query failed during execution.
    #[error("service catalogue query failed: {message}")]
    Query {
        /// Adapter-supplied failure description.
        message: String,
    },
}

impl ServiceCatalogError {
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

/// Port for reading service offerings at booking time.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServiceCatalog: Send + Sync {
    /// Find an offering by id.
    async fn find_by_id(
        &self,
        id: &ServiceId,
    ) -> Result<Option<ServiceOffering>, ServiceCatalogError>;

    /// All active offerings published by a model.
    async fn list_active_for_model(
        &self,
        model_id: &ModelId,
    ) -> Result<Vec<ServiceOffering>, ServiceCatalogError>;
}

/// Fixture implementation for tests that do not exercise the catalogue.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureServiceCatalog;

#[async_trait]
impl ServiceCatalog for FixtureServiceCatalog {
    async fn find_by_id(
        &self,
        _id: &ServiceId,
    ) -> Result<Option<ServiceOffering>, ServiceCatalogError> {
        Ok(None)
    }

    async fn list_active_for_model(
        &self,
        _model_id: &ModelId,
    ) -> Result<Vec<ServiceOffering>, ServiceCatalogError> {
        Ok(Vec::new())
    }
}
