use rust_decimal::Decimal;

use super::records_model::{MonthlyRecord, RecordsSummary, TrendPoint};
use crate::utils::{ratio_percent, sum_decimals};

/// Totals and rates across all given records. Rates are zero without income.
pub fn summarize_records(records: &[MonthlyRecord]) -> RecordsSummary {
    let total_income = sum_decimals(records.iter().map(|r| r.income));
    let total_spending = sum_decimals(records.iter().map(|r| r.spending));
    let total_savings = sum_decimals(records.iter().map(|r| r.savings));
    let total_investment = sum_decimals(records.iter().map(|r| r.investment));

    let average_monthly_spending = if records.is_empty() {
        Decimal::ZERO
    } else {
        total_spending / Decimal::from(records.len())
    };

    RecordsSummary {
        month_count: records.len(),
        total_income,
        total_spending,
        total_savings,
        total_investment,
        net_cash_flow: total_income.saturating_sub(total_spending),
        savings_rate: ratio_percent(total_savings, total_income),
        investment_rate: ratio_percent(total_investment, total_income),
        average_monthly_spending,
    }
}

/// Month-by-month series in ascending month order, with running totals.
pub fn build_trend(records: &[MonthlyRecord]) -> Vec<TrendPoint> {
    let mut sorted: Vec<&MonthlyRecord> = records.iter().collect();
    sorted.sort_by_key(|r| r.month);

    let mut cumulative_savings = Decimal::ZERO;
    let mut cumulative_investment = Decimal::ZERO;
    let mut previous_spending: Option<Decimal> = None;

    sorted
        .into_iter()
        .map(|record| {
            cumulative_savings = cumulative_savings.saturating_add(record.savings);
            cumulative_investment = cumulative_investment.saturating_add(record.investment);

            let spending_change_percent = previous_spending
                .filter(|prev| !prev.is_zero())
                .map(|prev| ratio_percent(record.spending.saturating_sub(prev), prev));
            previous_spending = Some(record.spending);

            TrendPoint {
                month: record.month,
                income: record.income,
                spending: record.spending,
                net: record.income.saturating_sub(record.spending),
                savings_rate: ratio_percent(record.savings, record.income),
                cumulative_savings,
                cumulative_investment,
                spending_change_percent,
            }
        })
        .collect()
}
