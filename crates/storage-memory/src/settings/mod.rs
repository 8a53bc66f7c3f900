//! In-memory key/value storage for settings.

mod repository;

pub use repository::SettingsRepository;
