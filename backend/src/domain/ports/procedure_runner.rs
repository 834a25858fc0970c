//! Port for invoking named server-side procedures.
//!
//! Cross-cutting concerns outside the booking core (notification bridges,
//! payment-provider webhooks) live behind named procedures taking and
//! returning JSON. The core treats them as opaque.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors raised by procedure runner adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcedureError {
    /// The procedure host could not be reached.
    #[error("procedure host unreachable: {message}")]
    Connection {
        /// Adapter-supplied failure description.
        message: String,
    },
    /// The procedure ran and reported a failure.
    #[error("procedure {name} rejected the call: {message}")]
    Rejected {
        /// The invoked procedure.
        name: String,
        /// Host-supplied failure description.
        message: String,
    },
}

impl ProcedureError {
    /// Connection-failure constructor.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Rejection constructor.
    pub fn rejected(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Port for firing a named server-side procedure with a JSON payload.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProcedureRunner: Send + Sync {
    /// Invoke `name` with `payload` and return the procedure's JSON result.
    async fn invoke(&self, name: &str, payload: Value) -> Result<Value, ProcedureError>;
}

/// Fixture implementation that acknowledges every call with `null`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProcedureRunner;

#[async_trait]
impl ProcedureRunner for FixtureProcedureRunner {
    async fn invoke(&self, _name: &str, _payload: Value) -> Result<Value, ProcedureError> {
        Ok(Value::Null)
    }
}
