use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use fintrack_core::records::{MonthlyRecord, NewMonthlyRecord, RecordRepositoryTrait};
use fintrack_core::Result;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

use crate::errors::{IntoCore, StorageError};

/// Monthly records keyed by id.
#[derive(Default)]
pub struct RecordRepository {
    records: RwLock<HashMap<String, MonthlyRecord>>,
}

impl RecordRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordRepositoryTrait for RecordRepository {
    fn get_records(&self) -> Result<Vec<MonthlyRecord>> {
        let mut records: Vec<MonthlyRecord> =
            self.records.read().into_core()?.values().cloned().collect();
        records.sort_by_key(|r| r.month);
        Ok(records)
    }

    fn get_record(&self, record_id: &str) -> Result<MonthlyRecord> {
        self.records
            .read()
            .into_core()?
            .get(record_id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(format!("Record {}", record_id)).into())
    }

    fn find_by_month(&self, month: NaiveDate) -> Result<Option<MonthlyRecord>> {
        Ok(self
            .records
            .read()
            .into_core()?
            .values()
            .find(|r| r.month == month)
            .cloned())
    }

    async fn insert_record(&self, new_record: NewMonthlyRecord) -> Result<MonthlyRecord> {
        let mut records = self.records.write().into_core()?;
        let id = new_record
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        if records.contains_key(&id) {
            return Err(StorageError::Duplicate(format!("Record {}", id)).into());
        }

        let now = Utc::now();
        let record = MonthlyRecord {
            id: id.clone(),
            month: new_record.month,
            income: new_record.income,
            spending: new_record.spending,
            savings: new_record.savings,
            investment: new_record.investment,
            note: new_record.note,
            created_at: now,
            updated_at: now,
        };
        records.insert(id, record.clone());
        Ok(record)
    }

    async fn update_record(&self, record_id: &str, record: NewMonthlyRecord) -> Result<MonthlyRecord> {
        let mut records = self.records.write().into_core()?;
        let existing = records
            .get_mut(record_id)
            .ok_or_else(|| StorageError::NotFound(format!("Record {}", record_id)))?;

        existing.month = record.month;
        existing.income = record.income;
        existing.spending = record.spending;
        existing.savings = record.savings;
        existing.investment = record.investment;
        existing.note = record.note;
        existing.updated_at = Utc::now();
        Ok(existing.clone())
    }

    async fn delete_record(&self, record_id: &str) -> Result<usize> {
        let mut records = self.records.write().into_core()?;
        Ok(usize::from(records.remove(record_id).is_some()))
    }
}
