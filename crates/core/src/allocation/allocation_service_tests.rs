//! Unit tests for the allocation service.

use super::*;
use crate::errors::{DatabaseError, Error, Result};
use crate::settings::{Settings, SettingsServiceTrait, SettingsUpdate};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::{Arc, RwLock};

// ============================================================================
// Mock Implementations
// ============================================================================

#[derive(Default)]
struct MockAllocationRepository {
    portfolios: RwLock<Vec<AllocationPortfolio>>,
    fail_saves: RwLock<bool>,
}

#[async_trait]
impl AllocationRepositoryTrait for MockAllocationRepository {
    fn get_portfolios(&self) -> Result<Vec<AllocationPortfolio>> {
        Ok(self.portfolios.read().unwrap().clone())
    }

    fn get_portfolio(&self, portfolio_id: &str) -> Result<AllocationPortfolio> {
        self.portfolios
            .read()
            .unwrap()
            .iter()
            .find(|p| p.id == portfolio_id)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("Portfolio {}", portfolio_id)))
    }

    async fn create_portfolio(
        &self,
        new_portfolio: NewAllocationPortfolio,
    ) -> Result<AllocationPortfolio> {
        let now = Utc::now();
        let portfolio = AllocationPortfolio {
            id: new_portfolio.id.unwrap_or_else(|| "generated".to_string()),
            name: new_portfolio.name,
            total_plan_capital: new_portfolio.total_plan_capital,
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.portfolios.write().unwrap().push(portfolio.clone());
        Ok(portfolio)
    }

    async fn save_portfolio(&self, portfolio: AllocationPortfolio) -> Result<AllocationPortfolio> {
        if *self.fail_saves.read().unwrap() {
            return Err(Error::Database(DatabaseError::Internal("disk full".to_string())));
        }
        let mut portfolios = self.portfolios.write().unwrap();
        let slot = portfolios
            .iter_mut()
            .find(|p| p.id == portfolio.id)
            .ok_or_else(|| Error::not_found(format!("Portfolio {}", portfolio.id)))?;
        *slot = portfolio.clone();
        Ok(portfolio)
    }

    async fn delete_portfolio(&self, portfolio_id: &str) -> Result<usize> {
        let mut portfolios = self.portfolios.write().unwrap();
        let before = portfolios.len();
        portfolios.retain(|p| p.id != portfolio_id);
        Ok(before - portfolios.len())
    }
}

struct MockSettingsService {
    settings: RwLock<Settings>,
}

impl MockSettingsService {
    fn new() -> Self {
        Self {
            settings: RwLock::new(Settings::default()),
        }
    }

    fn set_deviation_threshold(&self, threshold: Decimal) {
        self.settings.write().unwrap().deviation_threshold_percent = threshold;
    }
}

#[async_trait]
impl SettingsServiceTrait for MockSettingsService {
    fn get_settings(&self) -> Result<Settings> {
        Ok(self.settings.read().unwrap().clone())
    }

    async fn update_settings(&self, _new_settings: &SettingsUpdate) -> Result<Settings> {
        unimplemented!()
    }

    fn get_base_currency(&self) -> Result<String> {
        Ok(self.settings.read().unwrap().base_currency.clone())
    }

    fn get_deviation_threshold(&self) -> Result<Decimal> {
        Ok(self.settings.read().unwrap().deviation_threshold_percent)
    }

    fn get_validation_tolerance(&self) -> Result<Decimal> {
        Ok(self.settings.read().unwrap().validation_tolerance_percent)
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn create_service() -> (AllocationService, Arc<MockAllocationRepository>) {
    let (service, repository, _) = create_service_with_settings();
    (service, repository)
}

fn create_service_with_settings() -> (
    AllocationService,
    Arc<MockAllocationRepository>,
    Arc<MockSettingsService>,
) {
    let repository = Arc::new(MockAllocationRepository::default());
    let settings = Arc::new(MockSettingsService::new());
    let service = AllocationService::new(repository.clone(), settings.clone());
    (service, repository, settings)
}

async fn create_portfolio(service: &AllocationService, capital: Decimal) -> AllocationPortfolio {
    service
        .create_portfolio(NewAllocationPortfolio {
            id: Some("p1".to_string()),
            name: "  Retirement ".to_string(),
            total_plan_capital: capital,
        })
        .await
        .unwrap()
}

fn new_item(id: &str, planned_percentage: Decimal, actual_amount: Decimal) -> NewAllocationItem {
    NewAllocationItem {
        id: Some(id.to_string()),
        name: id.to_uppercase(),
        planned_percentage,
        actual_amount,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_create_portfolio_trims_name() {
    let (service, _) = create_service();
    let portfolio = create_portfolio(&service, dec!(1000)).await;
    assert_eq!(portfolio.name, "Retirement");
    assert!(portfolio.items.is_empty());
}

#[tokio::test]
async fn test_create_portfolio_rejects_empty_name() {
    let (service, _) = create_service();
    let result = service
        .create_portfolio(NewAllocationPortfolio {
            id: None,
            name: "   ".to_string(),
            total_plan_capital: dec!(10),
        })
        .await;
    assert!(matches!(result, Err(Error::Validation(_))));
}

#[tokio::test]
async fn test_add_item_recomputes_derived_fields() {
    let (service, _) = create_service();
    create_portfolio(&service, dec!(1000)).await;

    service
        .add_item("p1", new_item("stocks", dec!(60), dec!(300)))
        .await
        .unwrap();
    let edit = service
        .add_item("p1", new_item("bonds", dec!(40), dec!(700)))
        .await
        .unwrap();

    assert!(edit.notice.is_none());
    let items = &edit.portfolio.items;
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].planned_amount, dec!(600));
    assert_eq!(items[0].actual_percentage, dec!(30));
    assert_eq!(items[0].suggestion, Suggestion::NeedBuy);
    assert_eq!(items[1].actual_percentage, dec!(70));
    assert_eq!(items[1].suggestion, Suggestion::NeedSell);
    assert_eq!(items[1].suggestion_amount, dec!(300));
}

#[tokio::test]
async fn test_add_item_clamps_to_headroom_with_notice() {
    let (service, _) = create_service();
    create_portfolio(&service, dec!(1000)).await;
    service
        .add_item("p1", new_item("stocks", dec!(70), dec!(0)))
        .await
        .unwrap();

    let edit = service
        .add_item("p1", new_item("bonds", dec!(50), dec!(0)))
        .await
        .unwrap();

    let notice = edit.notice.expect("clamp notice");
    assert_eq!(notice.item_id, "bonds");
    assert_eq!(notice.requested_percentage, dec!(50));
    assert_eq!(notice.applied_percentage, dec!(30));
    assert_eq!(edit.portfolio.items[1].planned_percentage, dec!(30));
}

#[tokio::test]
async fn test_add_item_rejects_duplicate_id() {
    let (service, _) = create_service();
    create_portfolio(&service, dec!(1000)).await;
    service
        .add_item("p1", new_item("cash", dec!(10), dec!(0)))
        .await
        .unwrap();

    let result = service.add_item("p1", new_item("cash", dec!(10), dec!(0))).await;
    assert!(matches!(
        result,
        Err(Error::Database(DatabaseError::UniqueViolation(_)))
    ));
}

#[tokio::test]
async fn test_add_item_rejects_negative_amount() {
    let (service, _) = create_service();
    create_portfolio(&service, dec!(1000)).await;

    let result = service
        .add_item("p1", new_item("cash", dec!(10), dec!(-1)))
        .await;
    assert!(matches!(result, Err(Error::Validation(_))));
}

#[tokio::test]
async fn test_update_item_excludes_itself_from_headroom() {
    let (service, _) = create_service();
    create_portfolio(&service, dec!(1000)).await;
    service
        .add_item("p1", new_item("a", dec!(60), dec!(0)))
        .await
        .unwrap();

    let edit = service
        .update_item(
            "p1",
            "a",
            AllocationItemUpdate {
                planned_percentage: Some(dec!(150)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(edit.portfolio.items[0].planned_percentage, dec!(100));
    assert_eq!(edit.notice.unwrap().applied_percentage, dec!(100));
}

#[tokio::test]
async fn test_update_item_unknown_id() {
    let (service, _) = create_service();
    create_portfolio(&service, dec!(1000)).await;

    let result = service
        .update_item("p1", "missing", AllocationItemUpdate::default())
        .await;
    assert!(result.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_changing_capital_recomputes_planned_amounts() {
    let (service, _) = create_service();
    create_portfolio(&service, dec!(1000)).await;
    service
        .add_item("p1", new_item("a", dec!(25), dec!(250)))
        .await
        .unwrap();

    let portfolio = service.set_total_plan_capital("p1", dec!(2000)).await.unwrap();

    assert_eq!(portfolio.items[0].planned_amount, dec!(500));
    assert_eq!(portfolio.items[0].suggestion, Suggestion::NeedBuy);
    assert_eq!(portfolio.items[0].suggestion_amount, dec!(250));
}

#[tokio::test]
async fn test_delete_item_recomputes_actual_percentages() {
    let (service, _) = create_service();
    create_portfolio(&service, dec!(1000)).await;
    service
        .add_item("p1", new_item("a", dec!(50), dec!(500)))
        .await
        .unwrap();
    service
        .add_item("p1", new_item("b", dec!(50), dec!(500)))
        .await
        .unwrap();

    let portfolio = service.delete_item("p1", "a").await.unwrap();

    assert_eq!(portfolio.items.len(), 1);
    assert_eq!(portfolio.items[0].actual_percentage, dec!(100));
    assert!(service.delete_item("p1", "a").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_undo_and_redo_restore_snapshots() {
    let (service, _) = create_service();
    create_portfolio(&service, dec!(1000)).await;
    assert!(!service.can_undo("p1"));

    service
        .add_item("p1", new_item("a", dec!(50), dec!(500)))
        .await
        .unwrap();
    service
        .update_item(
            "p1",
            "a",
            AllocationItemUpdate {
                actual_amount: Some(dec!(800)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(service.can_undo("p1"));

    let undone = service.undo("p1").await.unwrap().unwrap();
    assert_eq!(undone.items[0].actual_amount, dec!(500));
    assert_eq!(undone.items[0].suggestion, Suggestion::Balanced);
    assert!(service.can_redo("p1"));

    let redone = service.redo("p1").await.unwrap().unwrap();
    assert_eq!(redone.items[0].actual_amount, dec!(800));
    assert_eq!(redone.items[0].suggestion, Suggestion::NeedSell);
    assert!(!service.can_redo("p1"));

    service.undo("p1").await.unwrap();
    let empty = service.undo("p1").await.unwrap().unwrap();
    assert!(empty.items.is_empty());
    assert!(service.undo("p1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_noop_edit_records_no_history() {
    let (service, _) = create_service();
    create_portfolio(&service, dec!(1000)).await;

    service.rename_portfolio("p1", "Retirement").await.unwrap();
    assert!(!service.can_undo("p1"));
}

#[tokio::test]
async fn test_noop_edit_after_threshold_change_records_no_history() {
    let (service, repository, settings) = create_service_with_settings();
    create_portfolio(&service, dec!(1000)).await;
    let edit = service
        .add_item("p1", new_item("a", dec!(50), dec!(520)))
        .await
        .unwrap();
    assert_eq!(edit.portfolio.items[0].suggestion, Suggestion::Balanced);

    settings.set_deviation_threshold(dec!(2));
    let renamed = service.rename_portfolio("p1", "Retirement").await.unwrap();

    // derived fields follow the new threshold, but nothing is stored
    assert_eq!(renamed.items[0].suggestion, Suggestion::NeedSell);
    let stored = repository.get_portfolio("p1").unwrap();
    assert_eq!(stored.items[0].suggestion, Suggestion::Balanced);

    let undone = service.undo("p1").await.unwrap().unwrap();
    assert!(undone.items.is_empty());
    assert!(!service.can_undo("p1"));
}

#[tokio::test]
async fn test_failed_undo_keeps_history() {
    let (service, repository) = create_service();
    create_portfolio(&service, dec!(1000)).await;
    service
        .add_item("p1", new_item("a", dec!(50), dec!(500)))
        .await
        .unwrap();

    *repository.fail_saves.write().unwrap() = true;
    assert!(service.undo("p1").await.is_err());
    assert!(service.can_undo("p1"));
    assert!(!service.can_redo("p1"));

    *repository.fail_saves.write().unwrap() = false;
    let undone = service.undo("p1").await.unwrap().unwrap();
    assert!(undone.items.is_empty());
}

#[tokio::test]
async fn test_delete_portfolio_drops_history() {
    let (service, _) = create_service();
    create_portfolio(&service, dec!(1000)).await;
    service
        .add_item("p1", new_item("a", dec!(50), dec!(500)))
        .await
        .unwrap();

    assert_eq!(service.delete_portfolio("p1").await.unwrap(), 1);
    assert!(!service.can_undo("p1"));
    assert!(service.get_portfolio("p1").unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_summary_and_validation() {
    let (service, _) = create_service();
    create_portfolio(&service, dec!(1000)).await;
    service
        .add_item("p1", new_item("a", dec!(60), dec!(600)))
        .await
        .unwrap();
    service
        .add_item("p1", new_item("b", dec!(39.5), dec!(100)))
        .await
        .unwrap();

    let summary = service.get_summary("p1").unwrap();
    assert_eq!(summary.total_planned_percentage, dec!(99.5));
    assert_eq!(summary.remaining_percentage, dec!(0.5));
    assert_eq!(summary.total_actual_amount, dec!(700));
    assert_eq!(summary.need_buy_count, 1);

    let validation = service.validate_portfolio("p1").unwrap();
    assert!(validation.is_complete);
    assert!(!validation.is_over_allocated);
}
