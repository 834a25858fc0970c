//! Hosted-data-API adapter for the procedure runner port.

use async_trait::async_trait;
use serde_json::Value;

use super::transport::{RestTransport, TransportError};
use crate::domain::ports::{ProcedureError, ProcedureRunner};

fn map_transport_error(name: &str, error: TransportError) -> ProcedureError {
    if error.is_client_error() {
        ProcedureError::rejected(name, error.to_string())
    } else {
        ProcedureError::connection(error.to_string())
    }
}

/// Procedure runner backed by the hosted function endpoint.
#[derive(Debug, Clone)]
pub struct RestProcedureRunner {
    transport: RestTransport,
}

impl RestProcedureRunner {
    /// Build an adapter over a shared transport.
    #[must_use]
    pub fn new(transport: RestTransport) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl ProcedureRunner for RestProcedureRunner {
    async fn invoke(&self, name: &str, payload: Value) -> Result<Value, ProcedureError> {
        self.transport
            .invoke(name, &payload)
            .await
            .map_err(|error| map_transport_error(name, error))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[test]
    fn client_statuses_become_rejections_and_the_rest_connection_failures() {
        let rejected = map_transport_error(
            "booking-notification",
            TransportError::Status {
                status: 422,
                message: "bad payload".to_owned(),
            },
        );
        assert!(matches!(rejected, ProcedureError::Rejected { .. }));

        let unreachable = map_transport_error(
            "booking-notification",
            TransportError::Status {
                status: 502,
                message: "bad gateway".to_owned(),
            },
        );
        assert!(matches!(unreachable, ProcedureError::Connection { .. }));
    }
}
