//! User profile model
//!
//! One profile per data store: display name, email and preferred currency.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::currency::Currency;
use super::ids::UserId;
use crate::validation::{looks_like_email, Rule, ValidationError, ValidationErrors, Validator};

pub const MAX_NAME_LEN: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub currency: Currency,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn new(name: impl Into<String>, email: impl Into<String>, currency: Currency) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            name: name.into(),
            email: email.into(),
            currency,
            created_at: now,
            updated_at: now,
        }
    }

    /// First letters of up to two name parts, for compact display
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new(vec![
            Rule::new(
                |u: &UserProfile| !u.name.trim().is_empty(),
                ValidationError::Required { field: "name" },
            ),
            Rule::new(
                |u: &UserProfile| u.name.trim().chars().count() <= MAX_NAME_LEN,
                ValidationError::TooLong {
                    field: "name",
                    max: MAX_NAME_LEN,
                },
            ),
            Rule::new(
                |u: &UserProfile| !u.email.trim().is_empty(),
                ValidationError::Required { field: "email" },
            ),
            Rule::new(
                |u: &UserProfile| u.email.trim().is_empty() || looks_like_email(&u.email),
                ValidationError::InvalidEmail,
            ),
        ])
        .validate(self)
    }
}

impl fmt::Display for UserProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_profile() {
        let user = UserProfile::new("Asha Rao", "asha@example.com", Currency::Inr);
        assert!(user.validate().is_ok());
        assert_eq!(user.initials(), "AR");
        assert_eq!(user.to_string(), "Asha Rao <asha@example.com>");
    }

    #[test]
    fn test_missing_email_reports_required_only() {
        let user = UserProfile::new("Asha", "", Currency::Usd);
        let errors = user.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains(&ValidationError::Required { field: "email" }));
    }

    #[test]
    fn test_bad_email_and_long_name() {
        let user = UserProfile::new("n".repeat(51), "not-an-email", Currency::Usd);
        let errors = user.validate().unwrap_err();
        assert!(errors.contains(&ValidationError::InvalidEmail));
        assert!(errors.contains(&ValidationError::TooLong {
            field: "name",
            max: MAX_NAME_LEN
        }));
    }
}
