//! In-memory storage for allocation tables.

mod repository;

pub use repository::AllocationRepository;
