use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::Result;

use super::records_model::{MonthlyRecord, NewMonthlyRecord, RecordsSummary, TrendPoint};

/// Trait for monthly record repository operations
#[async_trait]
pub trait RecordRepositoryTrait: Send + Sync {
    fn get_records(&self) -> Result<Vec<MonthlyRecord>>;
    fn get_record(&self, record_id: &str) -> Result<MonthlyRecord>;
    fn find_by_month(&self, month: NaiveDate) -> Result<Option<MonthlyRecord>>;
    async fn insert_record(&self, new_record: NewMonthlyRecord) -> Result<MonthlyRecord>;
    async fn update_record(&self, record_id: &str, record: NewMonthlyRecord) -> Result<MonthlyRecord>;
    async fn delete_record(&self, record_id: &str) -> Result<usize>;
}

/// Trait for monthly record service operations
#[async_trait]
pub trait RecordServiceTrait: Send + Sync {
    /// All records, oldest month first.
    fn get_records(&self) -> Result<Vec<MonthlyRecord>>;
    fn get_record(&self, record_id: &str) -> Result<MonthlyRecord>;
    async fn create_record(&self, new_record: NewMonthlyRecord) -> Result<MonthlyRecord>;
    async fn update_record(&self, record_id: &str, record: NewMonthlyRecord) -> Result<MonthlyRecord>;
    async fn delete_record(&self, record_id: &str) -> Result<usize>;
    fn get_summary(&self) -> Result<RecordsSummary>;
    fn get_trend(&self) -> Result<Vec<TrendPoint>>;
}
