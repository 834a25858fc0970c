//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! This module follows the hexagonal architecture pattern, providing concrete
//! implementations of the domain port traits:
//!
//! - **rest**: adapters over the hosted data API (row storage and named
//!   procedures) using reqwest
//! - **memory**: a mutex-guarded in-process store for local runs and tests
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod memory;
pub mod rest;
