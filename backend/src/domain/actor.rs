//! Acting identities for domain operations.
//!
//! Every domain operation receives the actor explicitly instead of reading an
//! ambient session. This keeps the lifecycle and orchestrator services
//! testable in isolation and makes authority checks auditable at the call
//! site.

use crate::domain::ids::{AdminId, ModelId};

/// The authenticated identity performing an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    /// Administrative account with full authority over every record.
    Admin(AdminId),
    /// A model (service provider) acting on their own diary.
    Model(ModelId),
    /// Unauthenticated caller, e.g. the public booking flow.
    Public,
}

impl Actor {
    /// Whether this actor holds administrative authority.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin(_))
    }

    /// The model id when the actor is a model, `None` otherwise.
    #[must_use]
    pub const fn as_model(&self) -> Option<&ModelId> {
        match self {
            Self::Model(id) => Some(id),
            Self::Admin(_) | Self::Public => None,
        }
    }

    /// Whether this actor is the unauthenticated public caller.
    #[must_use]
    pub const fn is_public(&self) -> bool {
        matches!(self, Self::Public)
    }
}
