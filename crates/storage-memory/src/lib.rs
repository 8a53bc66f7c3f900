//! In-memory storage implementation for Fintrack.
//!
//! This crate implements the repository traits defined in `fintrack-core`
//! on top of plain collections guarded by `RwLock`s. Services receive the
//! repositories by injection (`Arc<dyn ...RepositoryTrait>`), so a host can
//! swap in another backend without touching the domain code.
//!
//! ```text
//! core (domain, services)
//!          │
//!          ▼
//!  storage-memory (this crate)
//! ```

pub mod allocation;
pub mod errors;
pub mod records;
pub mod settings;

pub use allocation::AllocationRepository;
pub use errors::{IntoCore, StorageError};
pub use records::RecordRepository;
pub use settings::SettingsRepository;

// Re-export from fintrack-core for convenience
pub use fintrack_core::errors::{DatabaseError, Error, Result};
