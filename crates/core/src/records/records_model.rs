//! Monthly record domain models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::utils::month_serde;

/// Income, spending, savings and investment figures for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRecord {
    pub id: String,
    /// First day of the month; serialized as `YYYY-MM`.
    #[serde(with = "month_serde")]
    pub month: NaiveDate,
    pub income: Decimal,
    pub spending: Decimal,
    pub savings: Decimal,
    pub investment: Decimal,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input model for creating or replacing a monthly record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMonthlyRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(with = "month_serde")]
    pub month: NaiveDate,
    #[serde(default)]
    pub income: Decimal,
    #[serde(default)]
    pub spending: Decimal,
    #[serde(default)]
    pub savings: Decimal,
    #[serde(default)]
    pub investment: Decimal,
    #[serde(default)]
    pub note: Option<String>,
}

impl NewMonthlyRecord {
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("Income", self.income),
            ("Spending", self.spending),
            ("Savings", self.savings),
            ("Investment", self.investment),
        ] {
            if value < Decimal::ZERO {
                return Err(Error::invalid_input(format!("{} cannot be negative", field)));
            }
        }
        Ok(())
    }
}

/// Totals and rates over a set of monthly records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordsSummary {
    pub month_count: usize,
    pub total_income: Decimal,
    pub total_spending: Decimal,
    pub total_savings: Decimal,
    pub total_investment: Decimal,
    /// Income minus spending.
    pub net_cash_flow: Decimal,
    /// Savings as a percentage of income.
    pub savings_rate: Decimal,
    /// Investment as a percentage of income.
    pub investment_rate: Decimal,
    pub average_monthly_spending: Decimal,
}

/// One month of the trend series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    #[serde(with = "month_serde")]
    pub month: NaiveDate,
    pub income: Decimal,
    pub spending: Decimal,
    pub net: Decimal,
    pub savings_rate: Decimal,
    pub cumulative_savings: Decimal,
    pub cumulative_investment: Decimal,
    /// Change in spending against the previous month, in percent.
    pub spending_change_percent: Option<Decimal>,
}
