//! Transaction display formatting

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::models::{Currency, Money, Transaction, TransactionType};

use super::report::truncate;

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Type")]
    kind: &'static str,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

impl TransactionRow {
    fn new(txn: &Transaction, currency: Currency) -> Self {
        Self {
            id: txn.id.short(),
            date: txn.date.format("%Y-%m-%d").to_string(),
            kind: txn.transaction_type.as_str(),
            category: txn.category.clone(),
            description: truncate(&txn.description, 32),
            amount: currency.format(txn.signed_amount()),
        }
    }
}

/// Transactions as a table with income, expense and net totals
pub fn format_transaction_table(transactions: &[Transaction], currency: Currency) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let rows: Vec<TransactionRow> = transactions
        .iter()
        .map(|txn| TransactionRow::new(txn, currency))
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Modify::new(Columns::single(5)).with(Alignment::right()));

    let income: Money = transactions
        .iter()
        .filter(|t| t.transaction_type == TransactionType::Income)
        .map(|t| t.amount)
        .sum();
    let expense: Money = transactions
        .iter()
        .filter(|t| t.transaction_type == TransactionType::Expense)
        .map(|t| t.amount)
        .sum();

    format!(
        "{}\n{} transaction(s)  income {}  expenses {}  net {}\n",
        table,
        transactions.len(),
        currency.format(income),
        currency.format(expense),
        currency.format(income - expense),
    )
}

/// Format transaction details for display
pub fn format_transaction_details(txn: &Transaction, currency: Currency) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id.short()));
    output.push_str(&format!("ID:          {}\n", txn.id.as_uuid()));
    output.push_str(&format!("Date:        {}\n", txn.date.format("%Y-%m-%d")));
    output.push_str(&format!("Type:        {}\n", txn.transaction_type));
    output.push_str(&format!("Amount:      {}\n", currency.format(txn.amount)));
    output.push_str(&format!("Category:    {}\n", txn.category));
    output.push_str(&format!("Description: {}\n", txn.description));
    if let Some(user_id) = txn.user_id {
        output.push_str(&format!("Owner:       {}\n", user_id));
    }
    output.push_str(&format!(
        "Created:     {}\n",
        txn.created_at.format("%Y-%m-%d %H:%M:%S")
    ));
    if txn.updated_at != txn.created_at {
        output.push_str(&format!(
            "Updated:     {}\n",
            txn.updated_at.format("%Y-%m-%d %H:%M:%S")
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> Transaction {
        Transaction::new(
            TransactionType::Expense,
            Money::from_cents(123450),
            "Groceries",
            "Food",
            NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
        )
    }

    #[test]
    fn test_table_lists_rows_and_totals() {
        let txn = sample();
        let output = format_transaction_table(&[txn.clone()], Currency::Inr);

        assert!(output.contains(&txn.id.short()));
        assert!(output.contains("Groceries"));
        assert!(output.contains("-₹1,234.50"));
        assert!(output.contains("1 transaction(s)"));
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(
            format_transaction_table(&[], Currency::Usd),
            "No transactions found.\n"
        );
    }

    #[test]
    fn test_details() {
        let output = format_transaction_details(&sample(), Currency::Usd);
        assert!(output.contains("Amount:      $1,234.50"));
        assert!(output.contains("Category:    Food"));
    }
}
