//! Settings domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BASE_CURRENCY, DEFAULT_DEVIATION_THRESHOLD_PERCENT,
    DEFAULT_VALIDATION_TOLERANCE_PERCENT,
};

pub const BASE_CURRENCY_KEY: &str = "base_currency";
pub const DEVIATION_THRESHOLD_KEY: &str = "deviation_threshold_percent";
pub const VALIDATION_TOLERANCE_KEY: &str = "validation_tolerance_percent";

/// Effective application settings, with defaults filled in for missing keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub base_currency: String,
    /// Band used by the per-row rebalancing suggestion.
    pub deviation_threshold_percent: Decimal,
    /// Band used when checking that planned percentages add up to 100.
    pub validation_tolerance_percent: Decimal,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_currency: DEFAULT_BASE_CURRENCY.to_string(),
            deviation_threshold_percent: DEFAULT_DEVIATION_THRESHOLD_PERCENT,
            validation_tolerance_percent: DEFAULT_VALIDATION_TOLERANCE_PERCENT,
        }
    }
}

/// Partial settings update. `None` keeps the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub base_currency: Option<String>,
    pub deviation_threshold_percent: Option<Decimal>,
    pub validation_tolerance_percent: Option<Decimal>,
}
