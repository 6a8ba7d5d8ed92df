//! Declarative input validation
//!
//! A [`Validator`] is an ordered list of [`Rule`]s, each pairing a check with
//! the [`ValidationError`] it reports. Every rule runs, so callers get all
//! failures at once rather than the first one.

use std::fmt;

/// A single validation failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },

    #[error("{field} is too large")]
    TooLarge { field: &'static str },

    #[error("email address is not valid")]
    InvalidEmail,

    #[error("'{category}' is not a valid {kind} category")]
    UnknownCategory {
        category: String,
        kind: &'static str,
    },

    #[error("warning threshold ({warning}%) must be below the over-budget threshold ({over}%)")]
    InvalidThresholds { warning: u32, over: u32 },
}

/// All failures reported by one validation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, error: &ValidationError) -> bool {
        self.0.contains(error)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<ValidationError> {
        self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

type Predicate<'a, T> = Box<dyn Fn(&T) -> bool + Send + Sync + 'a>;
type Check<'a, T> = Box<dyn Fn(&T) -> Option<ValidationError> + Send + Sync + 'a>;

enum RuleKind<'a, T> {
    Predicate(Predicate<'a, T>, ValidationError),
    Dynamic(Check<'a, T>),
}

/// One check in a validator
pub struct Rule<'a, T> {
    kind: RuleKind<'a, T>,
}

impl<'a, T> Rule<'a, T> {
    /// A predicate that must hold; `error` is reported when it doesn't
    pub fn new<F>(predicate: F, error: ValidationError) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'a,
    {
        Self {
            kind: RuleKind::Predicate(Box::new(predicate), error),
        }
    }

    /// A check that builds its error from the value under test
    pub fn dynamic<F>(check: F) -> Self
    where
        F: Fn(&T) -> Option<ValidationError> + Send + Sync + 'a,
    {
        Self {
            kind: RuleKind::Dynamic(Box::new(check)),
        }
    }

    fn evaluate(&self, value: &T) -> Option<ValidationError> {
        match &self.kind {
            RuleKind::Predicate(predicate, error) => {
                if predicate(value) {
                    None
                } else {
                    Some(error.clone())
                }
            }
            RuleKind::Dynamic(check) => check(value),
        }
    }
}

/// An ordered set of rules evaluated uniformly against a value
pub struct Validator<'a, T> {
    rules: Vec<Rule<'a, T>>,
}

impl<'a, T> Validator<'a, T> {
    pub fn new(rules: Vec<Rule<'a, T>>) -> Self {
        Self { rules }
    }

    /// Run every rule and collect the failures in rule order
    pub fn validate(&self, value: &T) -> Result<(), ValidationErrors> {
        let errors: Vec<ValidationError> = self
            .rules
            .iter()
            .filter_map(|rule| rule.evaluate(value))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(errors))
        }
    }
}

/// Loose email shape check: `local@domain.tld` without whitespace
pub fn looks_like_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .map(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
                    .unwrap_or(false)
        }
        None => false,
    }
}
