use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::errors::Result;

use super::allocation_model::{
    AllocationEdit, AllocationItemUpdate, AllocationPortfolio, AllocationValidation,
    NewAllocationItem, NewAllocationPortfolio, PortfolioSummary,
};

/// Storage for allocation tables.
///
/// Repositories store whole portfolios; row-level edits are applied by the
/// service and written back with [`save_portfolio`](Self::save_portfolio).
#[async_trait]
pub trait AllocationRepositoryTrait: Send + Sync {
    fn get_portfolios(&self) -> Result<Vec<AllocationPortfolio>>;
    fn get_portfolio(&self, portfolio_id: &str) -> Result<AllocationPortfolio>;
    async fn create_portfolio(
        &self,
        new_portfolio: NewAllocationPortfolio,
    ) -> Result<AllocationPortfolio>;
    /// Replaces a stored portfolio and returns it with a fresh `updated_at`.
    async fn save_portfolio(&self, portfolio: AllocationPortfolio) -> Result<AllocationPortfolio>;
    async fn delete_portfolio(&self, portfolio_id: &str) -> Result<usize>;
}

#[async_trait]
pub trait AllocationServiceTrait: Send + Sync {
    fn get_portfolios(&self) -> Result<Vec<AllocationPortfolio>>;
    fn get_portfolio(&self, portfolio_id: &str) -> Result<AllocationPortfolio>;
    async fn create_portfolio(
        &self,
        new_portfolio: NewAllocationPortfolio,
    ) -> Result<AllocationPortfolio>;
    async fn rename_portfolio(&self, portfolio_id: &str, name: &str) -> Result<AllocationPortfolio>;
    async fn set_total_plan_capital(
        &self,
        portfolio_id: &str,
        total_plan_capital: Decimal,
    ) -> Result<AllocationPortfolio>;
    async fn delete_portfolio(&self, portfolio_id: &str) -> Result<usize>;

    async fn add_item(&self, portfolio_id: &str, new_item: NewAllocationItem)
        -> Result<AllocationEdit>;
    async fn update_item(
        &self,
        portfolio_id: &str,
        item_id: &str,
        update: AllocationItemUpdate,
    ) -> Result<AllocationEdit>;
    async fn delete_item(&self, portfolio_id: &str, item_id: &str) -> Result<AllocationPortfolio>;

    fn get_summary(&self, portfolio_id: &str) -> Result<PortfolioSummary>;
    /// Checks the planned total against the configured validation tolerance.
    fn validate_portfolio(&self, portfolio_id: &str) -> Result<AllocationValidation>;

    /// Reverts the last edit of a portfolio. Returns `None` when there is nothing to undo.
    async fn undo(&self, portfolio_id: &str) -> Result<Option<AllocationPortfolio>>;
    /// Re-applies the last undone edit. Returns `None` when there is nothing to redo.
    async fn redo(&self, portfolio_id: &str) -> Result<Option<AllocationPortfolio>>;
    fn can_undo(&self, portfolio_id: &str) -> bool;
    fn can_redo(&self, portfolio_id: &str) -> bool;
}
