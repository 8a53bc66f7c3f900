use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use crate::errors::{DatabaseError, Error, Result};
use crate::utils::{format_month, month_start};

use super::records_calculator::{build_trend, summarize_records};
use super::records_model::{MonthlyRecord, NewMonthlyRecord, RecordsSummary, TrendPoint};
use super::records_traits::{RecordRepositoryTrait, RecordServiceTrait};

/// Service for managing monthly records
pub struct RecordService {
    repository: Arc<dyn RecordRepositoryTrait>,
}

impl RecordService {
    pub fn new(repository: Arc<dyn RecordRepositoryTrait>) -> Self {
        RecordService { repository }
    }

    fn normalize(mut record: NewMonthlyRecord) -> Result<NewMonthlyRecord> {
        record.validate()?;
        record.month = month_start(record.month);
        record.note = record
            .note
            .map(|note| note.trim().to_string())
            .filter(|note| !note.is_empty());
        Ok(record)
    }

    /// Fails when another record already covers the month.
    fn ensure_month_free(&self, record: &NewMonthlyRecord, own_id: Option<&str>) -> Result<()> {
        if let Some(existing) = self.repository.find_by_month(record.month)? {
            if Some(existing.id.as_str()) != own_id {
                return Err(Error::Database(DatabaseError::UniqueViolation(format!(
                    "A record for {} already exists",
                    format_month(record.month)
                ))));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl RecordServiceTrait for RecordService {
    fn get_records(&self) -> Result<Vec<MonthlyRecord>> {
        let mut records = self.repository.get_records()?;
        records.sort_by_key(|r| r.month);
        Ok(records)
    }

    fn get_record(&self, record_id: &str) -> Result<MonthlyRecord> {
        self.repository.get_record(record_id)
    }

    async fn create_record(&self, new_record: NewMonthlyRecord) -> Result<MonthlyRecord> {
        let new_record = Self::normalize(new_record)?;
        self.ensure_month_free(&new_record, None)?;
        let record = self.repository.insert_record(new_record).await?;
        debug!("Created record {} for {}", record.id, format_month(record.month));
        Ok(record)
    }

    async fn update_record(&self, record_id: &str, record: NewMonthlyRecord) -> Result<MonthlyRecord> {
        let record = Self::normalize(record)?;
        self.repository.get_record(record_id)?;
        self.ensure_month_free(&record, Some(record_id))?;
        self.repository.update_record(record_id, record).await
    }

    async fn delete_record(&self, record_id: &str) -> Result<usize> {
        self.repository.delete_record(record_id).await
    }

    fn get_summary(&self) -> Result<RecordsSummary> {
        Ok(summarize_records(&self.repository.get_records()?))
    }

    fn get_trend(&self) -> Result<Vec<TrendPoint>> {
        Ok(build_trend(&self.repository.get_records()?))
    }
}
