use std::sync::Arc;

use chrono::NaiveDate;
use tally::audit::AuditLogger;
use tally::config::{AppConfig, Context};
use tally::export::FullExport;
use tally::models::{BudgetPeriod, BudgetStatus, HealthThresholds, Money, TransactionType};
use tally::services::{
    AnalyticsService, BudgetService, CreateBudgetInput, CreateTransactionInput, TransactionPatch,
    TransactionService,
};
use tally::storage::{MemoryStore, Storage};

fn ctx() -> Context {
    Context::fixed(
        AppConfig::default(),
        NaiveDate::from_ymd_opt(2025, 3, 15).unwrap(),
    )
}

fn food_budget(storage: &Storage, ctx: &Context) {
    BudgetService::new(storage, ctx)
        .create(CreateBudgetInput {
            category: "Food".into(),
            amount: Money::from_units(1000),
            period: BudgetPeriod::Monthly,
        })
        .unwrap();
}

fn expense(amount: i64, category: &str, date: Option<NaiveDate>) -> CreateTransactionInput {
    CreateTransactionInput {
        transaction_type: TransactionType::Expense,
        amount: Money::from_units(amount),
        description: format!("{} purchase", category),
        category: category.into(),
        date,
    }
}

#[test]
fn food_budget_moves_from_on_track_to_over_budget() {
    let ctx = ctx();
    let storage = Storage::in_memory("@tally").unwrap();
    food_budget(&storage, &ctx);
    let transactions = TransactionService::new(&storage, &ctx);
    let thresholds = HealthThresholds::default();

    transactions.create(expense(300, "Food", None)).unwrap();
    let budget = storage.budgets.get_all().unwrap().remove(0);
    assert_eq!(budget.spent(), Money::from_units(300));
    assert_eq!(budget.utilization(), 30);
    assert_eq!(budget.status(&thresholds), BudgetStatus::OnTrack);

    transactions.create(expense(800, "Food", None)).unwrap();
    let budget = storage.budgets.get_all().unwrap().remove(0);
    assert_eq!(budget.spent(), Money::from_units(1100));
    assert_eq!(budget.utilization(), 110);
    assert_eq!(budget.status(&thresholds), BudgetStatus::OverBudget);
}

#[test]
fn duplicate_category_period_is_rejected() {
    let ctx = ctx();
    let storage = Storage::in_memory("@tally").unwrap();
    food_budget(&storage, &ctx);

    let err = BudgetService::new(&storage, &ctx)
        .create(CreateBudgetInput {
            category: "food".into(),
            amount: Money::from_units(500),
            period: BudgetPeriod::Monthly,
        })
        .unwrap_err();

    assert!(err.is_duplicate());
    assert_eq!(storage.budgets.count().unwrap(), 1);
}

#[test]
fn deleting_a_transaction_reduces_spent_by_its_amount() {
    let ctx = ctx();
    let storage = Storage::in_memory("@tally").unwrap();
    food_budget(&storage, &ctx);
    let transactions = TransactionService::new(&storage, &ctx);

    transactions.create(expense(300, "Food", None)).unwrap();
    let lunch = transactions.create(expense(120, "Food", None)).unwrap();
    assert_eq!(
        storage.budgets.get_all().unwrap()[0].spent(),
        Money::from_units(420)
    );

    transactions.delete(lunch.id).unwrap();
    assert_eq!(
        storage.budgets.get_all().unwrap()[0].spent(),
        Money::from_units(300)
    );
}

#[test]
fn spent_ignores_other_categories_income_and_old_windows() {
    let ctx = ctx();
    let storage = Storage::in_memory("@tally").unwrap();
    food_budget(&storage, &ctx);
    let transactions = TransactionService::new(&storage, &ctx);

    transactions.create(expense(200, "Food", None)).unwrap();
    transactions.create(expense(999, "Travel", None)).unwrap();
    transactions
        .create(expense(50, "Food", NaiveDate::from_ymd_opt(2025, 2, 28)))
        .unwrap();
    transactions
        .create(CreateTransactionInput {
            transaction_type: TransactionType::Income,
            amount: Money::from_units(5000),
            description: "March salary".into(),
            category: "Salary".into(),
            date: None,
        })
        .unwrap();

    assert_eq!(
        storage.budgets.get_all().unwrap()[0].spent(),
        Money::from_units(200)
    );
}

#[test]
fn editing_category_moves_spending_between_budgets() {
    let ctx = ctx();
    let storage = Storage::in_memory("@tally").unwrap();
    food_budget(&storage, &ctx);
    let budgets = BudgetService::new(&storage, &ctx);
    budgets
        .create(CreateBudgetInput {
            category: "Shopping".into(),
            amount: Money::from_units(400),
            period: BudgetPeriod::Monthly,
        })
        .unwrap();
    let transactions = TransactionService::new(&storage, &ctx);

    let txn = transactions.create(expense(100, "Food", None)).unwrap();
    transactions
        .update(
            txn.id,
            TransactionPatch {
                category: Some("Shopping".into()),
                ..Default::default()
            },
        )
        .unwrap();

    let stored = storage.budgets.get_all().unwrap();
    let food = stored.iter().find(|b| b.category == "Food").unwrap();
    let shopping = stored.iter().find(|b| b.category == "Shopping").unwrap();
    assert!(food.spent().is_zero());
    assert_eq!(shopping.spent(), Money::from_units(100));
}

#[test]
fn failed_write_leaves_state_unchanged() {
    let ctx = ctx();
    let store = Arc::new(MemoryStore::new());
    let storage = Storage::new(store.clone(), "@tally");
    storage.load_all().unwrap();
    food_budget(&storage, &ctx);
    let transactions = TransactionService::new(&storage, &ctx);
    transactions.create(expense(300, "Food", None)).unwrap();

    store.set_fail_writes(true);
    let err = transactions.create(expense(800, "Food", None)).unwrap_err();
    assert!(err.is_storage());

    assert_eq!(storage.transactions.count().unwrap(), 1);
    assert_eq!(
        storage.budgets.get_all().unwrap()[0].spent(),
        Money::from_units(300)
    );

    // A fresh view of the store sees the same thing
    store.set_fail_writes(false);
    let reopened = Storage::new(store, "@tally");
    reopened.load_all().unwrap();
    assert_eq!(reopened.transactions.count().unwrap(), 1);
}

#[test]
fn transactions_round_trip_in_order() {
    let ctx = ctx();
    let store = Arc::new(MemoryStore::new());
    let storage = Storage::new(store.clone(), "@tally");
    storage.load_all().unwrap();
    let transactions = TransactionService::new(&storage, &ctx);

    for (amount, category) in [(10, "Food"), (20, "Bills"), (30, "Travel")] {
        transactions.create(expense(amount, category, None)).unwrap();
    }
    let written = storage.transactions.get_all().unwrap();

    let reopened = Storage::new(store, "@tally");
    reopened.load_all().unwrap();
    assert_eq!(reopened.transactions.get_all().unwrap(), written);
}

#[test]
fn budget_health_report_counts_statuses() {
    let ctx = ctx();
    let storage = Storage::in_memory("@tally").unwrap();
    food_budget(&storage, &ctx);
    let budgets = BudgetService::new(&storage, &ctx);
    for (category, amount) in [("Bills", 100), ("Shopping", 100)] {
        budgets
            .create(CreateBudgetInput {
                category: category.into(),
                amount: Money::from_units(amount),
                period: BudgetPeriod::Monthly,
            })
            .unwrap();
    }
    let transactions = TransactionService::new(&storage, &ctx);
    transactions.create(expense(100, "Food", None)).unwrap();
    transactions.create(expense(75, "Bills", None)).unwrap();
    transactions.create(expense(150, "Shopping", None)).unwrap();

    let report = AnalyticsService::new(&storage, &ctx).budget_health().unwrap();
    assert_eq!(report.on_track, 1);
    assert_eq!(report.warning, 1);
    assert_eq!(report.over_budget, 1);
    assert_eq!(report.total_budgeted(), Money::from_units(1200));
    assert_eq!(report.total_spent(), Money::from_units(325));
}

#[test]
fn reads_and_exports_use_the_current_period() {
    let march = ctx();
    let storage = Storage::in_memory("@tally").unwrap();
    food_budget(&storage, &march);
    TransactionService::new(&storage, &march)
        .create(expense(300, "Food", None))
        .unwrap();

    let id = storage.budgets.get_all().unwrap()[0].id.to_string();
    let service = BudgetService::new(&storage, &march);
    assert_eq!(service.find(&id).unwrap().unwrap().spent(), Money::from_units(300));
    assert_eq!(
        FullExport::from_storage(&storage, &march).unwrap().budgets[0].spent(),
        Money::from_units(300)
    );

    let april = Context::fixed(
        AppConfig::default(),
        NaiveDate::from_ymd_opt(2025, 4, 2).unwrap(),
    );
    let service = BudgetService::new(&storage, &april);
    assert_eq!(service.find(&id).unwrap().unwrap().spent(), Money::zero());
    assert_eq!(service.list().unwrap()[0].spent(), Money::zero());
    assert_eq!(
        FullExport::from_storage(&storage, &april).unwrap().budgets[0].spent(),
        Money::zero()
    );
}

#[test]
fn audit_failure_does_not_undo_a_committed_transaction() {
    let ctx = ctx();
    let blocker = tempfile::NamedTempFile::new().unwrap();
    let storage = Storage::in_memory("@tally")
        .unwrap()
        .with_audit(AuditLogger::new(blocker.path().join("audit.log")));
    food_budget(&storage, &ctx);
    let transactions = TransactionService::new(&storage, &ctx);

    let txn = transactions.create(expense(250, "Food", None)).unwrap();
    assert_eq!(storage.transactions.count().unwrap(), 1);
    assert_eq!(
        storage.budgets.get_all().unwrap()[0].spent(),
        Money::from_units(250)
    );

    transactions
        .update(
            txn.id,
            TransactionPatch {
                amount: Some(Money::from_units(400)),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(
        storage.budgets.get_all().unwrap()[0].spent(),
        Money::from_units(400)
    );

    transactions.delete(txn.id).unwrap();
    assert_eq!(storage.transactions.count().unwrap(), 0);
    assert_eq!(storage.budgets.get_all().unwrap()[0].spent(), Money::zero());
}
