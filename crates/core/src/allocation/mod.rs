//! Allocation tables: planned vs. actual holdings and rebalancing suggestions.
//!
//! `allocation_calculator` holds the pure reconciliation engine; the service
//! wraps it with persistence, auto-clamping and undo/redo.

mod allocation_calculator;
mod allocation_model;
mod allocation_service;
mod allocation_traits;

pub use allocation_calculator::*;
pub use allocation_model::*;
pub use allocation_service::*;
pub use allocation_traits::*;

#[cfg(test)]
mod allocation_service_tests;
