//! Fixed category lists
//!
//! Transactions pick a category from the list that matches their type;
//! budgets are only set against expense categories.

use super::transaction::TransactionType;

pub const EXPENSE_CATEGORIES: &[&str] = &[
    "Food",
    "Transportation",
    "Shopping",
    "Entertainment",
    "Bills",
    "Healthcare",
    "Education",
    "Travel",
    "Other",
];

pub const INCOME_CATEGORIES: &[&str] = &[
    "Salary",
    "Freelance",
    "Business",
    "Investment",
    "Gift",
    "Other",
];

/// Categories available for a transaction type
pub fn categories_for(kind: TransactionType) -> &'static [&'static str] {
    match kind {
        TransactionType::Income => INCOME_CATEGORIES,
        TransactionType::Expense => EXPENSE_CATEGORIES,
    }
}

/// Check whether a category is valid for the given type (exact match)
pub fn is_valid_category(kind: TransactionType, category: &str) -> bool {
    categories_for(kind).contains(&category)
}

/// Resolve user input to the canonical category name, ignoring case
pub fn canonical_category(kind: TransactionType, input: &str) -> Option<&'static str> {
    let input = input.trim();
    categories_for(kind)
        .iter()
        .copied()
        .find(|c| c.eq_ignore_ascii_case(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_lists_depend_on_type() {
        assert!(is_valid_category(TransactionType::Expense, "Food"));
        assert!(!is_valid_category(TransactionType::Income, "Food"));
        assert!(is_valid_category(TransactionType::Income, "Salary"));
        assert!(is_valid_category(TransactionType::Income, "Other"));
        assert!(is_valid_category(TransactionType::Expense, "Other"));
    }

    #[test]
    fn test_exact_match_is_case_sensitive() {
        assert!(!is_valid_category(TransactionType::Expense, "food"));
    }

    #[test]
    fn test_canonical_category() {
        assert_eq!(
            canonical_category(TransactionType::Expense, " food "),
            Some("Food")
        );
        assert_eq!(canonical_category(TransactionType::Expense, "Salary"), None);
    }
}
