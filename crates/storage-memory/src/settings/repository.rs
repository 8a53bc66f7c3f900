use async_trait::async_trait;
use fintrack_core::settings::SettingsRepositoryTrait;
use fintrack_core::Result;
use log::debug;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::errors::{IntoCore, StorageError};

#[derive(Default)]
pub struct SettingsRepository {
    values: RwLock<HashMap<String, String>>,
}

impl SettingsRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsRepositoryTrait for SettingsRepository {
    fn get_setting(&self, setting_key: &str) -> Result<String> {
        self.values
            .read()
            .into_core()?
            .get(setting_key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(format!("Setting {}", setting_key)).into())
    }

    async fn update_setting(&self, setting_key: &str, setting_value: &str) -> Result<()> {
        debug!("Setting {} = {}", setting_key, setting_value);
        self.values
            .write()
            .into_core()?
            .insert(setting_key.to_string(), setting_value.to_string());
        Ok(())
    }
}
