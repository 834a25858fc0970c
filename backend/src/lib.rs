//! Booking backend library modules.
//!
//! Hexagonal layout: `domain` holds the use-cases and ports, `outbound` the
//! driven adapters (hosted data API, in-memory store), `inbound` the HTTP
//! adapter, and `server` the wiring that assembles them into a running
//! process.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
