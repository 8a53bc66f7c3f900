//! Fintrack Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic of the finance tracker: allocation
//! tables with rebalancing suggestions, monthly records and settings.
//! It is storage-agnostic and defines repository traits that are implemented
//! by the `storage-memory` crate.

pub mod allocation;
pub mod constants;
pub mod errors;
pub mod history;
pub mod records;
pub mod settings;
pub mod utils;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
