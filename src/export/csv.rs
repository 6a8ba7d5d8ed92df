//! CSV export
//!
//! Spreadsheet-friendly exports of transactions and budgets. Amounts are
//! plain decimals without currency symbols.

use std::io::Write;

use serde::Serialize;

use crate::error::{TallyError, TallyResult};
use crate::models::{Budget, HealthThresholds, Transaction};

fn export_err(e: impl std::fmt::Display) -> TallyError {
    TallyError::Export(e.to_string())
}

#[derive(Serialize)]
struct TransactionRecord<'a> {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Type")]
    kind: &'a str,
    #[serde(rename = "Category")]
    category: &'a str,
    #[serde(rename = "Description")]
    description: &'a str,
    #[serde(rename = "Amount")]
    amount: String,
}

#[derive(Serialize)]
struct BudgetRecord<'a> {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Category")]
    category: &'a str,
    #[serde(rename = "Period")]
    period: &'a str,
    #[serde(rename = "Amount")]
    amount: String,
    #[serde(rename = "Spent")]
    spent: String,
    #[serde(rename = "Remaining")]
    remaining: String,
    #[serde(rename = "Utilization")]
    utilization: i64,
    #[serde(rename = "Status")]
    status: &'a str,
}

/// Write transactions as CSV, in the order given
pub fn export_transactions_csv<W: Write>(
    transactions: &[Transaction],
    writer: W,
) -> TallyResult<()> {
    let mut csv = csv::Writer::from_writer(writer);

    for txn in transactions {
        csv.serialize(TransactionRecord {
            id: txn.id.as_uuid().to_string(),
            date: txn.date.format("%Y-%m-%d").to_string(),
            kind: txn.transaction_type.as_str(),
            category: &txn.category,
            description: &txn.description,
            amount: txn.amount.to_string(),
        })
        .map_err(export_err)?;
    }

    csv.flush().map_err(export_err)?;
    Ok(())
}

/// Write budgets with their current spending as CSV
pub fn export_budgets_csv<W: Write>(
    budgets: &[Budget],
    thresholds: &HealthThresholds,
    writer: W,
) -> TallyResult<()> {
    let mut csv = csv::Writer::from_writer(writer);

    for budget in budgets {
        csv.serialize(BudgetRecord {
            id: budget.id.as_uuid().to_string(),
            category: &budget.category,
            period: budget.period.as_str(),
            amount: budget.amount.to_string(),
            spent: budget.spent().to_string(),
            remaining: budget.remaining().to_string(),
            utilization: budget.utilization(),
            status: budget.status(thresholds).as_str(),
        })
        .map_err(export_err)?;
    }

    csv.flush().map_err(export_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetPeriod, Money, TransactionType};
    use chrono::NaiveDate;

    #[test]
    fn test_transactions_csv_quotes_fields() {
        let txn = Transaction::new(
            TransactionType::Expense,
            Money::from_cents(123450),
            "Dinner, drinks",
            "Food",
            NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
        );

        let mut output = Vec::new();
        export_transactions_csv(&[txn], &mut output).unwrap();
        let csv = String::from_utf8(output).unwrap();

        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("ID,Date,Type,Category,Description,Amount"));
        let row = lines.next().unwrap();
        assert!(row.contains("2025-03-04,expense,Food,\"Dinner, drinks\",1234.50"));
    }

    #[test]
    fn test_budgets_csv() {
        let mut budget = Budget::new("Food", Money::from_units(1000), BudgetPeriod::Monthly);
        budget.set_spent(Money::from_units(1100));

        let mut output = Vec::new();
        export_budgets_csv(&[budget], &HealthThresholds::default(), &mut output).unwrap();
        let csv = String::from_utf8(output).unwrap();

        assert!(csv.contains("Food,monthly,1000.00,1100.00,-100.00,110,over-budget"));
    }
}
