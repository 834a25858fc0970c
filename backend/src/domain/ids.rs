//! Typed identifiers for domain records.
//!
//! Every table the hosted data API exposes is keyed by a UUID. Wrapping each
//! key in its own newtype keeps an appointment id from ever being handed to a
//! payment lookup by accident.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! define_record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Wrap an existing UUID.
            #[must_use]
            pub const fn new(id: Uuid) -> Self {
                Self(id)
            }

            /// Generate a fresh random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Access the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }
    };
}

define_record_id! {
    /// Identifier of an appointment record.
    AppointmentId
}

define_record_id! {
    /// Identifier of a payment ledger entry.
    PaymentId
}

define_record_id! {
    /// Identifier of a client record.
    ClientId
}

define_record_id! {
    /// Identifier of a service offering.
    ServiceId
}

define_record_id! {
    /// Identifier of a model (service provider) profile.
    ModelId
}

define_record_id! {
    /// Identifier of an administrative account.
    AdminId
}
