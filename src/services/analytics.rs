//! Transaction aggregation
//!
//! Monthly totals, category breakdowns, budget health, the calendar view and
//! the month-over-month trend. The free functions work on plain slices;
//! [`AnalyticsService`] feeds them from storage and the injected clock.

use chrono::{Datelike, Months, NaiveDate};

use crate::config::Context;
use crate::error::{TallyError, TallyResult};
use crate::models::{
    Budget, BudgetStatus, HealthThresholds, Money, PeriodWindow, Transaction, TransactionType,
};
use crate::storage::Storage;

use super::budget::BudgetService;

/// Income and expense totals over a window
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodSummary {
    pub window: PeriodWindow,
    pub income: Money,
    pub expense: Money,
    pub transaction_count: usize,
}

impl PeriodSummary {
    pub fn net(&self) -> Money {
        self.income - self.expense
    }

    /// Share of income not spent, in percent; 0 with no income
    pub fn savings_rate(&self) -> f64 {
        if !self.income.is_positive() {
            return 0.0;
        }
        self.net().as_f64() / self.income.as_f64() * 100.0
    }
}

/// One row of a category breakdown
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: Money,
    pub count: usize,
    /// Share of the breakdown total, in percent
    pub percentage: f64,
}

/// Utilization and status of one budget
#[derive(Debug, Clone)]
pub struct BudgetHealth {
    pub budget: Budget,
    pub utilization: i64,
    pub status: BudgetStatus,
    pub remaining: Money,
}

#[derive(Debug, Clone, Default)]
pub struct BudgetHealthReport {
    pub budgets: Vec<BudgetHealth>,
    pub on_track: usize,
    pub warning: usize,
    pub over_budget: usize,
}

impl BudgetHealthReport {
    pub fn total_budgeted(&self) -> Money {
        self.budgets.iter().map(|h| h.budget.amount).sum()
    }

    pub fn total_spent(&self) -> Money {
        self.budgets.iter().map(|h| h.budget.spent()).sum()
    }
}

/// Activity on one calendar day
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub income: Money,
    pub expense: Money,
    pub count: usize,
}

impl CalendarDay {
    pub fn net(&self) -> Money {
        self.income - self.expense
    }
}

/// Totals over `window`
pub fn summarize(transactions: &[Transaction], window: PeriodWindow) -> PeriodSummary {
    let mut summary = PeriodSummary {
        window,
        income: Money::zero(),
        expense: Money::zero(),
        transaction_count: 0,
    };

    for txn in transactions.iter().filter(|t| window.contains(t.date)) {
        match txn.transaction_type {
            TransactionType::Income => summary.income += txn.amount,
            TransactionType::Expense => summary.expense += txn.amount,
        }
        summary.transaction_count += 1;
    }

    summary
}

/// Transactions of `kind` inside `window`, grouped by category
///
/// Rows are sorted by amount, largest first. Ties keep the order in which
/// each category was first seen.
pub fn category_breakdown(
    transactions: &[Transaction],
    window: PeriodWindow,
    kind: TransactionType,
) -> Vec<CategoryTotal> {
    let mut rows: Vec<CategoryTotal> = Vec::new();

    for txn in transactions
        .iter()
        .filter(|t| t.transaction_type == kind && window.contains(t.date))
    {
        match rows.iter_mut().find(|row| row.category == txn.category) {
            Some(row) => {
                row.amount += txn.amount;
                row.count += 1;
            }
            None => rows.push(CategoryTotal {
                category: txn.category.clone(),
                amount: txn.amount,
                count: 1,
                percentage: 0.0,
            }),
        }
    }

    let total: Money = rows.iter().map(|row| row.amount).sum();
    if total.is_positive() {
        for row in &mut rows {
            row.percentage = row.amount.as_f64() / total.as_f64() * 100.0;
        }
    }

    // sort_by is stable
    rows.sort_by(|a, b| b.amount.cmp(&a.amount));
    rows
}

/// Classify every budget and count the bands
pub fn budget_health(budgets: &[Budget], thresholds: &HealthThresholds) -> BudgetHealthReport {
    let mut report = BudgetHealthReport::default();

    for budget in budgets {
        let utilization = budget.utilization();
        let status = thresholds.classify(utilization);
        match status {
            BudgetStatus::OnTrack => report.on_track += 1,
            BudgetStatus::Warning => report.warning += 1,
            BudgetStatus::OverBudget => report.over_budget += 1,
        }
        report.budgets.push(BudgetHealth {
            remaining: budget.remaining(),
            budget: budget.clone(),
            utilization,
            status,
        });
    }

    report
}

/// Days in `window` with at least one transaction, in date order
pub fn calendar_days(transactions: &[Transaction], window: PeriodWindow) -> Vec<CalendarDay> {
    let mut in_window: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| window.contains(t.date))
        .collect();
    in_window.sort_by_key(|t| t.date);

    let mut days: Vec<CalendarDay> = Vec::new();
    for txn in in_window {
        if days.last().map(|d| d.date) != Some(txn.date) {
            days.push(CalendarDay {
                date: txn.date,
                income: Money::zero(),
                expense: Money::zero(),
                count: 0,
            });
        }
        if let Some(day) = days.last_mut() {
            match txn.transaction_type {
                TransactionType::Income => day.income += txn.amount,
                TransactionType::Expense => day.expense += txn.amount,
            }
            day.count += 1;
        }
    }

    days
}

fn month_window(year: i32, month: u32) -> TallyResult<PeriodWindow> {
    PeriodWindow::month(year, month)
        .ok_or_else(|| TallyError::Validation(format!("Invalid month: {}-{:02}", year, month)))
}

/// Aggregation over the stored transactions and budgets
pub struct AnalyticsService<'a> {
    storage: &'a Storage,
    ctx: &'a Context,
}

/// Longest trend `monthly_trend` will build
pub const MAX_TREND_MONTHS: u32 = 120;

impl<'a> AnalyticsService<'a> {
    pub fn new(storage: &'a Storage, ctx: &'a Context) -> Self {
        Self { storage, ctx }
    }

    pub fn summary(&self, window: PeriodWindow) -> TallyResult<PeriodSummary> {
        Ok(summarize(&self.transactions_in(window)?, window))
    }

    pub fn monthly_summary(&self, year: i32, month: u32) -> TallyResult<PeriodSummary> {
        self.summary(month_window(year, month)?)
    }

    pub fn current_month_summary(&self) -> TallyResult<PeriodSummary> {
        let today = self.ctx.today();
        self.monthly_summary(today.year(), today.month())
    }

    pub fn category_breakdown(
        &self,
        window: PeriodWindow,
        kind: TransactionType,
    ) -> TallyResult<Vec<CategoryTotal>> {
        Ok(category_breakdown(&self.transactions_in(window)?, window, kind))
    }

    /// Health of every budget, using freshly recomputed spending
    pub fn budget_health(&self) -> TallyResult<BudgetHealthReport> {
        let budgets = BudgetService::new(self.storage, self.ctx).list()?;
        Ok(budget_health(&budgets, &self.ctx.config.budget_health))
    }

    pub fn calendar_month(&self, year: i32, month: u32) -> TallyResult<Vec<CalendarDay>> {
        let window = month_window(year, month)?;
        Ok(calendar_days(&self.transactions_in(window)?, window))
    }

    fn transactions_in(&self, window: PeriodWindow) -> TallyResult<Vec<Transaction>> {
        self.storage
            .transactions
            .get_by_date_range(window.start, window.end)
    }

    /// Summaries for the last `months` calendar months, oldest first,
    /// ending with the current month
    ///
    /// `months` must be between 1 and [`MAX_TREND_MONTHS`].
    pub fn monthly_trend(&self, months: u32) -> TallyResult<Vec<PeriodSummary>> {
        if !(1..=MAX_TREND_MONTHS).contains(&months) {
            return Err(TallyError::Validation(format!(
                "Trend length must be between 1 and {} months, got {}",
                MAX_TREND_MONTHS, months
            )));
        }

        let transactions = self.storage.transactions.get_all()?;
        let today = self.ctx.today();
        let this_month = month_window(today.year(), today.month())?;

        let mut trend = Vec::new();
        for back in (0..months).rev() {
            let start = this_month
                .start
                .checked_sub_months(Months::new(back))
                .ok_or_else(|| TallyError::Validation("Trend reaches before year 0".into()))?;
            let window = month_window(start.year(), start.month())?;
            trend.push(summarize(&transactions, window));
        }
        Ok(trend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::models::BudgetPeriod;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn txn(kind: TransactionType, units: i64, category: &str, on: NaiveDate) -> Transaction {
        Transaction::new(kind, Money::from_units(units), "entry", category, on)
    }

    fn march() -> PeriodWindow {
        PeriodWindow::month(2025, 3).unwrap()
    }

    #[test]
    fn test_summary_and_savings_rate() {
        let transactions = vec![
            txn(TransactionType::Income, 1000, "Salary", date(2025, 3, 1)),
            txn(TransactionType::Expense, 250, "Food", date(2025, 3, 5)),
            txn(TransactionType::Expense, 999, "Food", date(2025, 4, 1)),
        ];

        let summary = summarize(&transactions, march());
        assert_eq!(summary.income, Money::from_units(1000));
        assert_eq!(summary.expense, Money::from_units(250));
        assert_eq!(summary.net(), Money::from_units(750));
        assert_eq!(summary.transaction_count, 2);
        assert!((summary.savings_rate() - 75.0).abs() < f64::EPSILON);

        let empty = summarize(&[], march());
        assert_eq!(empty.savings_rate(), 0.0);
    }

    #[test]
    fn test_breakdown_sorted_with_stable_ties() {
        let transactions = vec![
            txn(TransactionType::Expense, 100, "Travel", date(2025, 3, 1)),
            txn(TransactionType::Expense, 300, "Food", date(2025, 3, 2)),
            txn(TransactionType::Expense, 100, "Bills", date(2025, 3, 3)),
            txn(TransactionType::Expense, 50, "Food", date(2025, 3, 4)),
            txn(TransactionType::Income, 900, "Salary", date(2025, 3, 4)),
        ];

        let rows = category_breakdown(&transactions, march(), TransactionType::Expense);
        let names: Vec<_> = rows.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(names, vec!["Food", "Travel", "Bills"]);
        assert_eq!(rows[0].amount, Money::from_units(350));
        assert_eq!(rows[0].count, 2);
        assert!((rows[0].percentage - 63.636).abs() < 0.01);

        let total: f64 = rows.iter().map(|r| r.percentage).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_budget_health_counts() {
        let mut under = Budget::new("Food", Money::from_units(100), BudgetPeriod::Monthly);
        under.set_spent(Money::from_units(30));
        let mut close = Budget::new("Bills", Money::from_units(100), BudgetPeriod::Monthly);
        close.set_spent(Money::from_units(100));
        let mut over = Budget::new("Travel", Money::from_units(100), BudgetPeriod::Monthly);
        over.set_spent(Money::from_units(110));

        let report = budget_health(&[under, close, over], &HealthThresholds::default());
        assert_eq!((report.on_track, report.warning, report.over_budget), (1, 1, 1));
        assert_eq!(report.budgets[2].remaining, Money::from_units(-10));
        assert_eq!(report.budgets[1].utilization, 100);
        assert_eq!(report.total_budgeted(), Money::from_units(300));
    }

    #[test]
    fn test_calendar_days_group_by_date() {
        let transactions = vec![
            txn(TransactionType::Expense, 20, "Food", date(2025, 3, 9)),
            txn(TransactionType::Income, 100, "Gift", date(2025, 3, 2)),
            txn(TransactionType::Expense, 5, "Food", date(2025, 3, 9)),
        ];

        let days = calendar_days(&transactions, march());
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, date(2025, 3, 2));
        assert_eq!(days[1].expense, Money::from_units(25));
        assert_eq!(days[1].count, 2);
        assert_eq!(days[1].net(), Money::from_units(-25));
    }

    #[test]
    fn test_trend_is_oldest_first() {
        let storage = Storage::in_memory("@tally").unwrap();
        let ctx = Context::fixed(AppConfig::default(), date(2025, 2, 10));
        storage
            .transactions
            .insert(txn(TransactionType::Expense, 40, "Food", date(2024, 12, 24)))
            .unwrap();
        storage
            .transactions
            .insert(txn(TransactionType::Income, 70, "Gift", date(2025, 2, 1)))
            .unwrap();

        let trend = AnalyticsService::new(&storage, &ctx).monthly_trend(3).unwrap();
        let starts: Vec<_> = trend.iter().map(|s| s.window.start).collect();
        assert_eq!(starts, vec![date(2024, 12, 1), date(2025, 1, 1), date(2025, 2, 1)]);
        assert_eq!(trend[0].expense, Money::from_units(40));
        assert_eq!(trend[2].income, Money::from_units(70));
    }

    #[test]
    fn test_trend_length_is_bounded() {
        let storage = Storage::in_memory("@tally").unwrap();
        let ctx = Context::fixed(AppConfig::default(), date(2025, 2, 10));
        let service = AnalyticsService::new(&storage, &ctx);

        assert!(service.monthly_trend(0).unwrap_err().is_validation());
        assert!(service.monthly_trend(u32::MAX).unwrap_err().is_validation());
        assert_eq!(
            service.monthly_trend(MAX_TREND_MONTHS).unwrap().len(),
            MAX_TREND_MONTHS as usize
        );
    }

    #[test]
    fn test_invalid_month_rejected() {
        let storage = Storage::in_memory("@tally").unwrap();
        let ctx = Context::fixed(AppConfig::default(), date(2025, 2, 10));
        let service = AnalyticsService::new(&storage, &ctx);
        assert!(service.monthly_summary(2025, 13).unwrap_err().is_validation());
        assert!(service.current_month_summary().is_ok());
    }
}
