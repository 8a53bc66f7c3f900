//! Allocation table domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::MAX_TOTAL_PERCENTAGE;
use crate::errors::{Error, Result};

/// Rebalancing action suggested for one allocation row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Suggestion {
    /// Holding less than planned.
    NeedBuy,
    /// Holding more than planned.
    NeedSell,
    /// Within the tolerance band, or nothing planned.
    #[default]
    Balanced,
}

/// Outcome of comparing an actual holding against its planned amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deviation {
    pub kind: Suggestion,
    /// Absolute shortfall or excess. Zero when balanced.
    pub amount_diff: Decimal,
}

impl Deviation {
    pub fn balanced() -> Self {
        Self {
            kind: Suggestion::Balanced,
            amount_diff: Decimal::ZERO,
        }
    }
}

/// One planned/actual asset bucket of an allocation table.
///
/// `planned_amount`, `actual_percentage`, `suggestion` and `suggestion_amount`
/// are derived. They are overwritten by every recomputation and never
/// edited directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationItem {
    pub id: String,
    pub name: String,
    pub planned_percentage: Decimal,
    #[serde(default)]
    pub planned_amount: Decimal,
    pub actual_amount: Decimal,
    #[serde(default)]
    pub actual_percentage: Decimal,
    #[serde(default)]
    pub suggestion: Suggestion,
    #[serde(default)]
    pub suggestion_amount: Decimal,
}

impl AllocationItem {
    /// Creates a row with zeroed derived fields.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        planned_percentage: Decimal,
        actual_amount: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            planned_percentage,
            planned_amount: Decimal::ZERO,
            actual_amount,
            actual_percentage: Decimal::ZERO,
            suggestion: Suggestion::Balanced,
            suggestion_amount: Decimal::ZERO,
        }
    }
}

/// A named allocation table with its capital and ordered rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationPortfolio {
    pub id: String,
    pub name: String,
    pub total_plan_capital: Decimal,
    pub items: Vec<AllocationItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AllocationPortfolio {
    pub fn find_item(&self, item_id: &str) -> Option<&AllocationItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    pub fn find_item_mut(&mut self, item_id: &str) -> Option<&mut AllocationItem> {
        self.items.iter_mut().find(|item| item.id == item_id)
    }
}

/// Input model for creating a portfolio.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAllocationPortfolio {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub total_plan_capital: Decimal,
}

impl NewAllocationPortfolio {
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name, "Portfolio name")?;
        validate_non_negative(self.total_plan_capital, "Total plan capital")
    }
}

/// Input model for adding a row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAllocationItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub planned_percentage: Decimal,
    #[serde(default)]
    pub actual_amount: Decimal,
}

impl NewAllocationItem {
    /// Percentages above 100 are not rejected here; they are clamped to the
    /// remaining headroom when the row is inserted.
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name, "Item name")?;
        validate_non_negative(self.planned_percentage, "Planned percentage")?;
        validate_non_negative(self.actual_amount, "Actual amount")
    }
}

/// Partial edit of a row. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_percentage: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_amount: Option<Decimal>,
}

impl AllocationItemUpdate {
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            validate_name(name, "Item name")?;
        }
        if let Some(pct) = self.planned_percentage {
            validate_non_negative(pct, "Planned percentage")?;
        }
        if let Some(amount) = self.actual_amount {
            validate_non_negative(amount, "Actual amount")?;
        }
        Ok(())
    }
}

/// Result of capping a proposed planned percentage to the available headroom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClampOutcome {
    pub requested: Decimal,
    pub applied: Decimal,
    pub was_clamped: bool,
}

/// User-visible notice emitted when an edit was auto-clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClampNotice {
    pub item_id: String,
    pub requested_percentage: Decimal,
    pub applied_percentage: Decimal,
    pub message: String,
}

impl ClampNotice {
    pub fn from_outcome(item_id: &str, outcome: &ClampOutcome) -> Option<Self> {
        if !outcome.was_clamped {
            return None;
        }
        Some(Self {
            item_id: item_id.to_string(),
            requested_percentage: outcome.requested,
            applied_percentage: outcome.applied,
            message: format!(
                "Planned percentage reduced from {}% to {}% so the total stays within {}%",
                outcome.requested.normalize(),
                outcome.applied.normalize(),
                MAX_TOTAL_PERCENTAGE
            ),
        })
    }
}

/// A recomputed portfolio together with the notice raised by the edit, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationEdit {
    pub portfolio: AllocationPortfolio,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<ClampNotice>,
}

/// Totals over a recomputed portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub total_planned_percentage: Decimal,
    pub remaining_percentage: Decimal,
    pub total_planned_amount: Decimal,
    pub unallocated_capital: Decimal,
    pub total_actual_amount: Decimal,
    pub need_buy_count: usize,
    pub need_sell_count: usize,
    pub balanced_count: usize,
}

/// Whether planned percentages add up to 100 within a tolerance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationValidation {
    pub total_percentage: Decimal,
    /// `total_percentage - 100`; negative means under-allocated.
    pub difference: Decimal,
    pub is_complete: bool,
    pub is_over_allocated: bool,
}

fn validate_name(name: &str, field: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::invalid_input(format!("{} cannot be empty", field)));
    }
    Ok(())
}

fn validate_non_negative(value: Decimal, field: &str) -> Result<()> {
    if value < Decimal::ZERO {
        return Err(Error::invalid_input(format!(
            "{} cannot be negative",
            field
        )));
    }
    Ok(())
}
