use super::settings_model::{
    BASE_CURRENCY_KEY, DEVIATION_THRESHOLD_KEY, VALIDATION_TOLERANCE_KEY,
};
use super::SettingsRepositoryTrait;
use crate::constants::{
    DEFAULT_BASE_CURRENCY, DEFAULT_DEVIATION_THRESHOLD_PERCENT,
    DEFAULT_VALIDATION_TOLERANCE_PERCENT,
};
use crate::errors::{DatabaseError, Error, Result};
use crate::settings::{Settings, SettingsUpdate};
use async_trait::async_trait;
use log::{debug, warn};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;

#[async_trait]
pub trait SettingsServiceTrait: Send + Sync {
    fn get_settings(&self) -> Result<Settings>;

    async fn update_settings(&self, new_settings: &SettingsUpdate) -> Result<Settings>;

    fn get_base_currency(&self) -> Result<String>;

    /// Relative band for per-row buy/sell suggestions.
    fn get_deviation_threshold(&self) -> Result<Decimal>;

    /// Tolerance for the "planned percentages add up to 100" check.
    fn get_validation_tolerance(&self) -> Result<Decimal>;
}

pub struct SettingsService {
    settings_repository: Arc<dyn SettingsRepositoryTrait>,
}

impl SettingsService {
    pub fn new(settings_repository: Arc<dyn SettingsRepositoryTrait>) -> Self {
        SettingsService {
            settings_repository,
        }
    }

    fn get_optional(&self, key: &str) -> Result<Option<String>> {
        match self.settings_repository.get_setting(key) {
            Ok(value) => Ok(Some(value)),
            Err(Error::Database(DatabaseError::NotFound(_))) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn get_decimal_or(&self, key: &str, default: Decimal) -> Result<Decimal> {
        let Some(raw) = self.get_optional(key)? else {
            return Ok(default);
        };
        match Decimal::from_str(raw.trim()) {
            Ok(value) if value > Decimal::ZERO => Ok(value),
            _ => {
                warn!(
                    "Ignoring invalid stored value '{}' for setting {}; using {}",
                    raw, key, default
                );
                Ok(default)
            }
        }
    }
}

fn validate_threshold(value: Decimal, name: &str) -> Result<()> {
    if value <= Decimal::ZERO {
        return Err(Error::InvalidConfigValue(format!(
            "{} must be greater than zero, got {}",
            name, value
        )));
    }
    Ok(())
}

fn validate_currency(code: &str) -> Result<()> {
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(Error::InvalidConfigValue(format!(
            "Currency code must be three letters, got '{}'",
            code
        )));
    }
    Ok(())
}

#[async_trait]
impl SettingsServiceTrait for SettingsService {
    fn get_settings(&self) -> Result<Settings> {
        Ok(Settings {
            base_currency: self.get_base_currency()?,
            deviation_threshold_percent: self.get_deviation_threshold()?,
            validation_tolerance_percent: self.get_validation_tolerance()?,
        })
    }

    async fn update_settings(&self, new_settings: &SettingsUpdate) -> Result<Settings> {
        let base_currency = new_settings
            .base_currency
            .as_ref()
            .map(|code| code.trim().to_uppercase());

        if let Some(code) = &base_currency {
            validate_currency(code)?;
        }
        if let Some(threshold) = new_settings.deviation_threshold_percent {
            validate_threshold(threshold, "Deviation threshold")?;
        }
        if let Some(tolerance) = new_settings.validation_tolerance_percent {
            validate_threshold(tolerance, "Validation tolerance")?;
        }

        if let Some(code) = base_currency {
            self.settings_repository
                .update_setting(BASE_CURRENCY_KEY, &code)
                .await?;
        }
        if let Some(threshold) = new_settings.deviation_threshold_percent {
            self.settings_repository
                .update_setting(DEVIATION_THRESHOLD_KEY, &threshold.to_string())
                .await?;
        }
        if let Some(tolerance) = new_settings.validation_tolerance_percent {
            self.settings_repository
                .update_setting(VALIDATION_TOLERANCE_KEY, &tolerance.to_string())
                .await?;
        }

        let settings = self.get_settings()?;
        debug!("Settings updated: {:?}", settings);
        Ok(settings)
    }

    fn get_base_currency(&self) -> Result<String> {
        Ok(self
            .get_optional(BASE_CURRENCY_KEY)?
            .unwrap_or_else(|| DEFAULT_BASE_CURRENCY.to_string()))
    }

    fn get_deviation_threshold(&self) -> Result<Decimal> {
        self.get_decimal_or(DEVIATION_THRESHOLD_KEY, DEFAULT_DEVIATION_THRESHOLD_PERCENT)
    }

    fn get_validation_tolerance(&self) -> Result<Decimal> {
        self.get_decimal_or(VALIDATION_TOLERANCE_KEY, DEFAULT_VALIDATION_TOLERANCE_PERCENT)
    }
}
