//! Monthly income/spending/savings/investment records.

mod records_calculator;
mod records_model;
mod records_service;
mod records_traits;

pub use records_calculator::{build_trend, summarize_records};
pub use records_model::{MonthlyRecord, NewMonthlyRecord, RecordsSummary, TrendPoint};
pub use records_service::RecordService;
pub use records_traits::{RecordRepositoryTrait, RecordServiceTrait};
