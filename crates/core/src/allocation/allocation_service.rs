use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use log::{debug, info};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::errors::{DatabaseError, Error, Result};
use crate::history::EditHistory;
use crate::settings::SettingsServiceTrait;

use super::allocation_calculator::{
    clamp_percentage_with_notice, summarize_portfolio, update_all_items,
    validate_allocation_total,
};
use super::allocation_model::{
    AllocationEdit, AllocationItem, AllocationItemUpdate, AllocationPortfolio,
    AllocationValidation, ClampNotice, NewAllocationItem, NewAllocationPortfolio,
    PortfolioSummary,
};
use super::allocation_traits::{AllocationRepositoryTrait, AllocationServiceTrait};

type PortfolioHistory = EditHistory<AllocationPortfolio>;

/// Edit workflow for allocation tables.
///
/// Every mutation loads the portfolio, applies the edit (auto-clamping planned
/// percentages to the available headroom), recomputes all derived fields,
/// persists the result and records an undo step for that portfolio.
pub struct AllocationService {
    repository: Arc<dyn AllocationRepositoryTrait>,
    settings_service: Arc<dyn SettingsServiceTrait>,
    histories: Mutex<HashMap<String, PortfolioHistory>>,
}

impl AllocationService {
    pub fn new(
        repository: Arc<dyn AllocationRepositoryTrait>,
        settings_service: Arc<dyn SettingsServiceTrait>,
    ) -> Self {
        Self {
            repository,
            settings_service,
            histories: Mutex::new(HashMap::new()),
        }
    }

    fn histories(&self) -> MutexGuard<'_, HashMap<String, PortfolioHistory>> {
        self.histories
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn recompute(&self, portfolio: &mut AllocationPortfolio) -> Result<()> {
        let threshold = self.settings_service.get_deviation_threshold()?;
        portfolio.items = update_all_items(&portfolio.items, portfolio.total_plan_capital, threshold);
        Ok(())
    }

    /// Recomputes both snapshots, persists `after` and records the undo step.
    ///
    /// `before` is recomputed too so derived fields stored under an older
    /// threshold do not make an unchanged portfolio look edited.
    async fn commit(
        &self,
        label: &str,
        mut before: AllocationPortfolio,
        mut after: AllocationPortfolio,
    ) -> Result<AllocationPortfolio> {
        self.recompute(&mut before)?;
        self.recompute(&mut after)?;
        if after == before {
            debug!("{} on portfolio {} changed nothing", label, before.id);
            return Ok(before);
        }

        let saved = self.repository.save_portfolio(after).await?;
        self.histories()
            .entry(saved.id.clone())
            .or_default()
            .record(label, before, saved.clone());
        Ok(saved)
    }

    /// Writes a history snapshot back without recording a new step.
    async fn restore(&self, mut snapshot: AllocationPortfolio) -> Result<AllocationPortfolio> {
        self.recompute(&mut snapshot)?;
        self.repository.save_portfolio(snapshot).await
    }
}

#[async_trait]
impl AllocationServiceTrait for AllocationService {
    fn get_portfolios(&self) -> Result<Vec<AllocationPortfolio>> {
        self.repository.get_portfolios()
    }

    fn get_portfolio(&self, portfolio_id: &str) -> Result<AllocationPortfolio> {
        self.repository.get_portfolio(portfolio_id)
    }

    async fn create_portfolio(
        &self,
        new_portfolio: NewAllocationPortfolio,
    ) -> Result<AllocationPortfolio> {
        new_portfolio.validate()?;
        let portfolio = self
            .repository
            .create_portfolio(NewAllocationPortfolio {
                name: new_portfolio.name.trim().to_string(),
                ..new_portfolio
            })
            .await?;
        info!("Created allocation portfolio {} ({})", portfolio.name, portfolio.id);
        Ok(portfolio)
    }

    async fn rename_portfolio(&self, portfolio_id: &str, name: &str) -> Result<AllocationPortfolio> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::invalid_input("Portfolio name cannot be empty"));
        }

        let before = self.repository.get_portfolio(portfolio_id)?;
        let mut after = before.clone();
        after.name = name.to_string();
        self.commit("Rename portfolio", before, after).await
    }

    async fn set_total_plan_capital(
        &self,
        portfolio_id: &str,
        total_plan_capital: Decimal,
    ) -> Result<AllocationPortfolio> {
        if total_plan_capital < Decimal::ZERO {
            return Err(Error::invalid_input("Total plan capital cannot be negative"));
        }

        let before = self.repository.get_portfolio(portfolio_id)?;
        let mut after = before.clone();
        after.total_plan_capital = total_plan_capital;
        self.commit("Change plan capital", before, after).await
    }

    async fn delete_portfolio(&self, portfolio_id: &str) -> Result<usize> {
        let deleted = self.repository.delete_portfolio(portfolio_id).await?;
        self.histories().remove(portfolio_id);
        info!("Deleted allocation portfolio {}", portfolio_id);
        Ok(deleted)
    }

    async fn add_item(
        &self,
        portfolio_id: &str,
        new_item: NewAllocationItem,
    ) -> Result<AllocationEdit> {
        new_item.validate()?;

        let before = self.repository.get_portfolio(portfolio_id)?;
        let item_id = new_item
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        if before.find_item(&item_id).is_some() {
            return Err(Error::Database(DatabaseError::UniqueViolation(format!(
                "Item {} already exists in portfolio {}",
                item_id, portfolio_id
            ))));
        }

        let outcome = clamp_percentage_with_notice(new_item.planned_percentage, &before.items, None);
        let notice = ClampNotice::from_outcome(&item_id, &outcome);
        if let Some(notice) = &notice {
            info!("Portfolio {}: {}", portfolio_id, notice.message);
        }

        let mut after = before.clone();
        after.items.push(AllocationItem::new(
            item_id,
            new_item.name.trim(),
            outcome.applied,
            new_item.actual_amount,
        ));

        let portfolio = self.commit("Add item", before, after).await?;
        Ok(AllocationEdit { portfolio, notice })
    }

    async fn update_item(
        &self,
        portfolio_id: &str,
        item_id: &str,
        update: AllocationItemUpdate,
    ) -> Result<AllocationEdit> {
        update.validate()?;

        let before = self.repository.get_portfolio(portfolio_id)?;
        let mut after = before.clone();
        let item = after.find_item_mut(item_id).ok_or_else(|| {
            Error::not_found(format!("Item {} in portfolio {}", item_id, portfolio_id))
        })?;

        let mut notice = None;
        if let Some(name) = &update.name {
            item.name = name.trim().to_string();
        }
        if let Some(proposed) = update.planned_percentage {
            let outcome = clamp_percentage_with_notice(proposed, &before.items, Some(item_id));
            item.planned_percentage = outcome.applied;
            notice = ClampNotice::from_outcome(item_id, &outcome);
        }
        if let Some(actual_amount) = update.actual_amount {
            item.actual_amount = actual_amount;
        }

        if let Some(notice) = &notice {
            info!("Portfolio {}: {}", portfolio_id, notice.message);
        }

        let portfolio = self.commit("Edit item", before, after).await?;
        Ok(AllocationEdit { portfolio, notice })
    }

    async fn delete_item(&self, portfolio_id: &str, item_id: &str) -> Result<AllocationPortfolio> {
        let before = self.repository.get_portfolio(portfolio_id)?;
        let mut after = before.clone();
        after.items.retain(|item| item.id != item_id);
        if after.items.len() == before.items.len() {
            return Err(Error::not_found(format!(
                "Item {} in portfolio {}",
                item_id, portfolio_id
            )));
        }
        self.commit("Delete item", before, after).await
    }

    fn get_summary(&self, portfolio_id: &str) -> Result<PortfolioSummary> {
        let mut portfolio = self.repository.get_portfolio(portfolio_id)?;
        self.recompute(&mut portfolio)?;
        Ok(summarize_portfolio(&portfolio.items, portfolio.total_plan_capital))
    }

    fn validate_portfolio(&self, portfolio_id: &str) -> Result<AllocationValidation> {
        let portfolio = self.repository.get_portfolio(portfolio_id)?;
        let tolerance = self.settings_service.get_validation_tolerance()?;
        Ok(validate_allocation_total(&portfolio.items, tolerance))
    }

    async fn undo(&self, portfolio_id: &str) -> Result<Option<AllocationPortfolio>> {
        let entry = match self.histories().get_mut(portfolio_id) {
            Some(history) => history.undo(),
            None => None,
        };
        let Some(entry) = entry else {
            return Ok(None);
        };

        debug!("Undo '{}' on portfolio {}", entry.label, portfolio_id);
        match self.restore(entry.before).await {
            Ok(restored) => Ok(Some(restored)),
            Err(e) => {
                if let Some(history) = self.histories().get_mut(portfolio_id) {
                    history.redo();
                }
                Err(e)
            }
        }
    }

    async fn redo(&self, portfolio_id: &str) -> Result<Option<AllocationPortfolio>> {
        let entry = match self.histories().get_mut(portfolio_id) {
            Some(history) => history.redo(),
            None => None,
        };
        let Some(entry) = entry else {
            return Ok(None);
        };

        debug!("Redo '{}' on portfolio {}", entry.label, portfolio_id);
        match self.restore(entry.after).await {
            Ok(restored) => Ok(Some(restored)),
            Err(e) => {
                if let Some(history) = self.histories().get_mut(portfolio_id) {
                    history.undo();
                }
                Err(e)
            }
        }
    }

    fn can_undo(&self, portfolio_id: &str) -> bool {
        self.histories()
            .get(portfolio_id)
            .map(|history| history.can_undo())
            .unwrap_or(false)
    }

    fn can_redo(&self, portfolio_id: &str) -> bool {
        self.histories()
            .get(portfolio_id)
            .map(|history| history.can_redo())
            .unwrap_or(false)
    }
}
