//! In-memory storage for monthly records.

mod repository;

pub use repository::RecordRepository;
