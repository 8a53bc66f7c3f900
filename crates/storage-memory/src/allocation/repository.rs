use async_trait::async_trait;
use chrono::Utc;
use fintrack_core::allocation::{
    AllocationPortfolio, AllocationRepositoryTrait, NewAllocationPortfolio,
};
use fintrack_core::Result;
use log::debug;
use std::sync::RwLock;
use uuid::Uuid;

use crate::errors::{IntoCore, StorageError};

/// Portfolios kept in creation order.
#[derive(Default)]
pub struct AllocationRepository {
    portfolios: RwLock<Vec<AllocationPortfolio>>,
}

impl AllocationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the repository with existing portfolios, e.g. loaded by the host.
    pub fn with_portfolios(portfolios: Vec<AllocationPortfolio>) -> Self {
        Self {
            portfolios: RwLock::new(portfolios),
        }
    }
}

#[async_trait]
impl AllocationRepositoryTrait for AllocationRepository {
    fn get_portfolios(&self) -> Result<Vec<AllocationPortfolio>> {
        Ok(self.portfolios.read().into_core()?.clone())
    }

    fn get_portfolio(&self, portfolio_id: &str) -> Result<AllocationPortfolio> {
        self.portfolios
            .read()
            .into_core()?
            .iter()
            .find(|p| p.id == portfolio_id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(format!("Portfolio {}", portfolio_id)).into())
    }

    async fn create_portfolio(
        &self,
        new_portfolio: NewAllocationPortfolio,
    ) -> Result<AllocationPortfolio> {
        let mut portfolios = self.portfolios.write().into_core()?;
        let id = new_portfolio
            .id
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        if portfolios.iter().any(|p| p.id == id) {
            return Err(StorageError::Duplicate(format!("Portfolio {}", id)).into());
        }

        let now = Utc::now();
        let portfolio = AllocationPortfolio {
            id,
            name: new_portfolio.name,
            total_plan_capital: new_portfolio.total_plan_capital,
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        portfolios.push(portfolio.clone());
        debug!("Stored portfolio {}", portfolio.id);
        Ok(portfolio)
    }

    async fn save_portfolio(&self, portfolio: AllocationPortfolio) -> Result<AllocationPortfolio> {
        let mut portfolios = self.portfolios.write().into_core()?;
        let slot = portfolios
            .iter_mut()
            .find(|p| p.id == portfolio.id)
            .ok_or_else(|| StorageError::NotFound(format!("Portfolio {}", portfolio.id)))?;

        let created_at = slot.created_at;
        *slot = AllocationPortfolio {
            created_at,
            updated_at: Utc::now(),
            ..portfolio
        };
        Ok(slot.clone())
    }

    async fn delete_portfolio(&self, portfolio_id: &str) -> Result<usize> {
        let mut portfolios = self.portfolios.write().into_core()?;
        let before = portfolios.len();
        portfolios.retain(|p| p.id != portfolio_id);
        Ok(before - portfolios.len())
    }
}
