//! Supported currencies and locale-aware amount formatting
//!
//! INR amounts use `en-IN` digit grouping (lakh/crore: `1,23,45,678.90`),
//! every other currency uses western thousands grouping.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::money::Money;

/// How integer digits are grouped when formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigitGrouping {
    /// Groups of three: 12,345,678
    Thousands,
    /// Last three, then groups of two: 1,23,45,678
    Indian,
}

/// A currency the user can pick for their profile and settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Inr,
    Usd,
    Eur,
    Gbp,
    Jpy,
    Cad,
    Aud,
}

impl Currency {
    /// All supported currencies, in display order
    pub fn all() -> &'static [Currency] {
        &[
            Currency::Inr,
            Currency::Usd,
            Currency::Eur,
            Currency::Gbp,
            Currency::Jpy,
            Currency::Cad,
            Currency::Aud,
        ]
    }

    /// ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Inr => "INR",
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
            Self::Jpy => "JPY",
            Self::Cad => "CAD",
            Self::Aud => "AUD",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Inr => "₹",
            Self::Usd => "$",
            Self::Eur => "€",
            Self::Gbp => "£",
            Self::Jpy => "¥",
            Self::Cad => "CA$",
            Self::Aud => "A$",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Inr => "Indian Rupee",
            Self::Usd => "US Dollar",
            Self::Eur => "Euro",
            Self::Gbp => "British Pound",
            Self::Jpy => "Japanese Yen",
            Self::Cad => "Canadian Dollar",
            Self::Aud => "Australian Dollar",
        }
    }

    /// Number of fractional digits shown when formatting
    pub fn decimals(&self) -> u32 {
        match self {
            Self::Jpy => 0,
            _ => 2,
        }
    }

    pub fn grouping(&self) -> DigitGrouping {
        match self {
            Self::Inr => DigitGrouping::Indian,
            _ => DigitGrouping::Thousands,
        }
    }

    /// Format an amount with this currency's symbol and grouping
    ///
    /// # Examples
    /// ```
    /// use tally::models::{Currency, Money};
    /// assert_eq!(Currency::Inr.format(Money::from_cents(123450)), "₹1,234.50");
    /// ```
    pub fn format(&self, amount: Money) -> String {
        let negative = amount.is_negative();
        let cents = amount.cents().unsigned_abs();

        let (whole, frac) = if self.decimals() == 0 {
            // Round half up to whole units
            ((cents + 50) / 100, None)
        } else {
            (cents / 100, Some(cents % 100))
        };

        let mut out = String::new();
        if negative {
            out.push('-');
        }
        out.push_str(self.symbol());
        out.push_str(&group_digits(whole, self.grouping()));
        if let Some(frac) = frac {
            out.push_str(&format!(".{:02}", frac));
        }
        out
    }
}

/// Insert grouping separators into a non-negative integer
pub fn group_digits(value: u64, grouping: DigitGrouping) -> String {
    let digits = value.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let step = match grouping {
        DigitGrouping::Thousands => 3,
        DigitGrouping::Indian => 2,
    };

    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(step);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = CurrencyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        Currency::all()
            .iter()
            .copied()
            .find(|c| c.code() == code)
            .ok_or_else(|| CurrencyParseError(s.trim().to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported currency: {0}")]
pub struct CurrencyParseError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inr_uses_indian_grouping() {
        assert_eq!(Currency::Inr.format(Money::from_cents(123450)), "₹1,234.50");
        assert_eq!(
            Currency::Inr.format(Money::from_cents(1234567890)),
            "₹1,23,45,678.90"
        );
        assert_eq!(Currency::Inr.format(Money::from_cents(99)), "₹0.99");
        assert_eq!(Currency::Inr.format(Money::from_cents(10000000)), "₹1,00,000.00");
    }

    #[test]
    fn test_western_grouping() {
        assert_eq!(
            Currency::Usd.format(Money::from_cents(1234567890)),
            "$12,345,678.90"
        );
        assert_eq!(Currency::Eur.format(Money::from_cents(-250)), "-€2.50");
    }

    #[test]
    fn test_zero_decimal_currency_rounds() {
        assert_eq!(Currency::Jpy.format(Money::from_cents(123450)), "¥1,235");
        assert_eq!(Currency::Jpy.format(Money::from_cents(123449)), "¥1,234");
    }

    #[test]
    fn test_parse_code() {
        assert_eq!("inr".parse::<Currency>().unwrap(), Currency::Inr);
        assert_eq!(" USD ".parse::<Currency>().unwrap(), Currency::Usd);
        assert!("XYZ".parse::<Currency>().is_err());
    }

    #[test]
    fn test_serializes_as_code() {
        assert_eq!(serde_json::to_string(&Currency::Gbp).unwrap(), "\"GBP\"");
        let c: Currency = serde_json::from_str("\"JPY\"").unwrap();
        assert_eq!(c, Currency::Jpy);
    }
}
