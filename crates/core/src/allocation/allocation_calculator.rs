//! Allocation reconciliation engine.
//!
//! Pure functions that derive every computed field of an allocation table
//! from its raw inputs (planned percentages, actual amounts and total plan
//! capital). Nothing here fails: zero totals and zero planned amounts are
//! defined-value cases. Callers normalize raw UI input beforehand, see
//! [`crate::utils::number_utils`].

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::allocation_model::{
    AllocationItem, AllocationValidation, ClampOutcome, Deviation, PortfolioSummary, Suggestion,
};
use crate::constants::MAX_TOTAL_PERCENTAGE;
use crate::utils::{ratio_percent, sum_decimals};

/// Share of the portfolio held in one row, as a percentage.
///
/// Returns zero when `total_actual_amount` is zero.
pub fn compute_actual_percentage(actual_amount: Decimal, total_actual_amount: Decimal) -> Decimal {
    ratio_percent(actual_amount, total_actual_amount)
}

/// Planned currency amount for a planned percentage of the total capital.
pub fn compute_planned_amount(planned_percentage: Decimal, total_plan_capital: Decimal) -> Decimal {
    (planned_percentage / dec!(100)).saturating_mul(total_plan_capital)
}

/// Classifies an actual holding against its planned amount.
///
/// The band is symmetric and relative to `planned_amount`; a deviation of
/// exactly `threshold_percent` is still balanced. Rows without a target
/// (`planned_amount == 0`) are always balanced.
pub fn compute_deviation(
    planned_amount: Decimal,
    actual_amount: Decimal,
    threshold_percent: Decimal,
) -> Deviation {
    if planned_amount.is_zero() {
        return Deviation::balanced();
    }

    let diff = actual_amount.saturating_sub(planned_amount);
    // None when the ratio exceeds the Decimal range, i.e. far outside any band
    let rel_diff = diff
        .abs()
        .checked_div(planned_amount)
        .and_then(|ratio| ratio.checked_mul(dec!(100)));

    if rel_diff.is_some_and(|rel_diff| rel_diff <= threshold_percent) {
        Deviation::balanced()
    } else if diff > Decimal::ZERO {
        Deviation {
            kind: Suggestion::NeedSell,
            amount_diff: diff.abs(),
        }
    } else {
        Deviation {
            kind: Suggestion::NeedBuy,
            amount_diff: diff.abs(),
        }
    }
}

/// Recomputes the derived fields of every row.
///
/// The portfolio-wide actual total is computed once, so every row's
/// `actual_percentage` is relative to the same sum. Input order is preserved.
pub fn update_all_items(
    items: &[AllocationItem],
    total_plan_capital: Decimal,
    threshold_percent: Decimal,
) -> Vec<AllocationItem> {
    let total_actual_amount = total_actual(items);

    items
        .iter()
        .map(|item| {
            let planned_amount = compute_planned_amount(item.planned_percentage, total_plan_capital);
            let deviation = compute_deviation(planned_amount, item.actual_amount, threshold_percent);

            AllocationItem {
                planned_amount,
                actual_percentage: compute_actual_percentage(
                    item.actual_amount,
                    total_actual_amount,
                ),
                suggestion: deviation.kind,
                suggestion_amount: deviation.amount_diff,
                ..item.clone()
            }
        })
        .collect()
}

/// Caps a proposed planned percentage to the headroom left by the other rows.
///
/// `editing_id` is the row being edited (its current value is excluded from
/// the "other" total), or `None` when a new row is being inserted.
pub fn clamp_percentage_on_edit(
    proposed_percentage: Decimal,
    items: &[AllocationItem],
    editing_id: Option<&str>,
) -> Decimal {
    let other_total = sum_decimals(
        items
            .iter()
            .filter(|item| Some(item.id.as_str()) != editing_id)
            .map(|item| item.planned_percentage),
    );
    let max_available = (MAX_TOTAL_PERCENTAGE - other_total).max(Decimal::ZERO);

    proposed_percentage.min(max_available)
}

/// Same as [`clamp_percentage_on_edit`] but reports whether the value changed.
pub fn clamp_percentage_with_notice(
    proposed_percentage: Decimal,
    items: &[AllocationItem],
    editing_id: Option<&str>,
) -> ClampOutcome {
    let applied = clamp_percentage_on_edit(proposed_percentage, items, editing_id);
    ClampOutcome {
        requested: proposed_percentage,
        applied,
        was_clamped: applied != proposed_percentage,
    }
}

/// Aggregates totals over a set of already recomputed rows.
pub fn summarize_portfolio(items: &[AllocationItem], total_plan_capital: Decimal) -> PortfolioSummary {
    let total_planned_percentage = total_planned_percentage(items);
    let total_planned_amount = sum_decimals(items.iter().map(|item| item.planned_amount));

    let count = |kind: Suggestion| items.iter().filter(|item| item.suggestion == kind).count();

    PortfolioSummary {
        total_planned_percentage,
        remaining_percentage: (MAX_TOTAL_PERCENTAGE - total_planned_percentage).max(Decimal::ZERO),
        total_planned_amount,
        unallocated_capital: total_plan_capital
            .saturating_sub(total_planned_amount)
            .max(Decimal::ZERO),
        total_actual_amount: total_actual(items),
        need_buy_count: count(Suggestion::NeedBuy),
        need_sell_count: count(Suggestion::NeedSell),
        balanced_count: count(Suggestion::Balanced),
    }
}

/// Checks that planned percentages add up to 100 within `tolerance_percent`
/// percentage points.
pub fn validate_allocation_total(
    items: &[AllocationItem],
    tolerance_percent: Decimal,
) -> AllocationValidation {
    let total_percentage = total_planned_percentage(items);
    let difference = total_percentage.saturating_sub(MAX_TOTAL_PERCENTAGE);

    AllocationValidation {
        total_percentage,
        difference,
        is_complete: difference.abs() <= tolerance_percent,
        is_over_allocated: difference > tolerance_percent,
    }
}

fn total_actual(items: &[AllocationItem]) -> Decimal {
    sum_decimals(items.iter().map(|item| item.actual_amount))
}

fn total_planned_percentage(items: &[AllocationItem]) -> Decimal {
    sum_decimals(items.iter().map(|item| item.planned_percentage))
}
