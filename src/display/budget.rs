//! Budget display formatting
//!
//! Budget tables show spent against the ceiling with a usage bar and the
//! health band from the configured thresholds.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{Budget, Currency, HealthThresholds};
use crate::services::analytics::BudgetHealthReport;

use super::report::format_bar;

#[derive(Tabled)]
struct BudgetRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Period")]
    period: &'static str,
    #[tabled(rename = "Budget")]
    amount: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
    #[tabled(rename = "Used")]
    used: String,
    #[tabled(rename = "Status")]
    status: &'static str,
}

fn usage(utilization: i64) -> String {
    let shown = utilization.clamp(0, 999);
    format!(
        "{} {:>3}%",
        format_bar(shown as f64, 100.0, 10),
        shown
    )
}

fn row(budget: &Budget, thresholds: &HealthThresholds, currency: Currency) -> BudgetRow {
    BudgetRow {
        id: budget.id.short(),
        category: budget.category.clone(),
        period: budget.period.as_str(),
        amount: currency.format(budget.amount),
        spent: currency.format(budget.spent()),
        remaining: currency.format(budget.remaining()),
        used: usage(budget.utilization()),
        status: budget.status(thresholds).as_str(),
    }
}

/// Budgets as a table
pub fn format_budget_table(
    budgets: &[Budget],
    thresholds: &HealthThresholds,
    currency: Currency,
) -> String {
    if budgets.is_empty() {
        return "No budgets found.\n".to_string();
    }

    let rows: Vec<BudgetRow> = budgets
        .iter()
        .map(|b| row(b, thresholds, currency))
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!("{}\n", table)
}

pub fn format_budget_details(
    budget: &Budget,
    thresholds: &HealthThresholds,
    currency: Currency,
) -> String {
    let mut output = String::new();
    output.push_str(&format!("Budget:     {}\n", budget.id.short()));
    output.push_str(&format!("Category:   {}\n", budget.category));
    output.push_str(&format!("Period:     {}\n", budget.period));
    output.push_str(&format!("Amount:     {}\n", currency.format(budget.amount)));
    output.push_str(&format!("Spent:      {}\n", currency.format(budget.spent())));
    output.push_str(&format!("Remaining:  {}\n", currency.format(budget.remaining())));
    output.push_str(&format!("Used:       {}\n", usage(budget.utilization())));
    output.push_str(&format!("Status:     {}\n", budget.status(thresholds)));
    output
}

/// Health table followed by per-band counts
pub fn format_budget_health(
    report: &BudgetHealthReport,
    thresholds: &HealthThresholds,
    currency: Currency,
) -> String {
    if report.budgets.is_empty() {
        return "No budgets found.\n".to_string();
    }

    let budgets: Vec<Budget> = report.budgets.iter().map(|h| h.budget.clone()).collect();
    let mut output = format_budget_table(&budgets, thresholds, currency);
    output.push_str(&format!(
        "Total: {} of {} spent\n",
        currency.format(report.total_spent()),
        currency.format(report.total_budgeted()),
    ));
    output.push_str(&format!(
        "{} on track, {} warning, {} over budget (warning above {}%, over above {}%)\n",
        report.on_track,
        report.warning,
        report.over_budget,
        thresholds.warning_percent,
        thresholds.over_percent,
    ));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetPeriod, Money};
    use crate::services::analytics::budget_health;

    fn food(spent: i64) -> Budget {
        let mut budget = Budget::new("Food", Money::from_units(1000), BudgetPeriod::Monthly);
        budget.set_spent(Money::from_units(spent));
        budget
    }

    #[test]
    fn test_usage_bar() {
        assert_eq!(usage(30), "███░░░░░░░  30%");
        assert_eq!(usage(i64::MAX), "██████████ 999%");
    }

    #[test]
    fn test_table_shows_status() {
        let output = format_budget_table(&[food(1100)], &HealthThresholds::default(), Currency::Inr);
        assert!(output.contains("over-budget"));
        assert!(output.contains("₹1,100.00"));
        assert!(output.contains("-₹100.00"));
    }

    #[test]
    fn test_health_counts() {
        let thresholds = HealthThresholds::default();
        let report = budget_health(&[food(300)], &thresholds);
        let output = format_budget_health(&report, &thresholds, Currency::Inr);
        assert!(output.contains("1 on track, 0 warning, 0 over budget"));
    }
}
