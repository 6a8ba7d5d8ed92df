//! Budget periods and their date windows
//!
//! A budget measures spending over a window anchored to a date (normally
//! today). Windows are half-open: `start` is included, `end` is not.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How often a budget resets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

/// First day of a weekly window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    pub fn weekday(&self) -> Weekday {
        match self {
            Self::Sunday => Weekday::Sun,
            Self::Monday => Weekday::Mon,
        }
    }
}

impl BudgetPeriod {
    pub fn all() -> &'static [BudgetPeriod] {
        &[Self::Weekly, Self::Monthly, Self::Yearly]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// The window of this period that contains `anchor`
    pub fn window_containing(&self, anchor: NaiveDate, week_start: WeekStart) -> PeriodWindow {
        match self {
            Self::Weekly => {
                let offset = days_since(anchor.weekday(), week_start.weekday());
                let start = anchor - Duration::days(offset);
                PeriodWindow {
                    start,
                    end: start + Duration::days(7),
                }
            }
            Self::Monthly => PeriodWindow::month(anchor.year(), anchor.month())
                .unwrap_or_else(|| PeriodWindow::single_day(anchor)),
            Self::Yearly => PeriodWindow::year(anchor.year())
                .unwrap_or_else(|| PeriodWindow::single_day(anchor)),
        }
    }
}

/// Days from `from` back to the most recent `target` (0 when equal)
fn days_since(from: Weekday, target: Weekday) -> i64 {
    let from = from.num_days_from_sunday() as i64;
    let target = target.num_days_from_sunday() as i64;
    (from - target).rem_euclid(7)
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BudgetPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly" | "week" | "w" => Ok(Self::Weekly),
            "monthly" | "month" | "m" => Ok(Self::Monthly),
            "yearly" | "year" | "annual" | "y" => Ok(Self::Yearly),
            other => Err(format!("Unknown budget period: {}", other)),
        }
    }
}

impl fmt::Display for WeekStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sunday => write!(f, "sunday"),
            Self::Monday => write!(f, "monday"),
        }
    }
}

impl FromStr for WeekStart {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sunday" | "sun" => Ok(Self::Sunday),
            "monday" | "mon" => Ok(Self::Monday),
            other => Err(format!("Week must start on sunday or monday, not {}", other)),
        }
    }
}

/// A half-open date range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeriodWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PeriodWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The calendar month `year-month`, or None for an invalid month
    pub fn month(year: i32, month: u32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let end = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)?
        };
        Some(Self { start, end })
    }

    /// The calendar year
    pub fn year(year: i32) -> Option<Self> {
        Some(Self {
            start: NaiveDate::from_ymd_opt(year, 1, 1)?,
            end: NaiveDate::from_ymd_opt(year + 1, 1, 1)?,
        })
    }

    fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date + Duration::days(1),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }

    /// Last date inside the window
    pub fn last_day(&self) -> NaiveDate {
        self.end - Duration::days(1)
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Iterate every date in the window
    pub fn iter_days(&self) -> impl Iterator<Item = NaiveDate> {
        let start = self.start;
        (0..self.days()).map(move |offset| start + Duration::days(offset))
    }
}

impl fmt::Display for PeriodWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format("%Y-%m-%d"),
            self.last_day().format("%Y-%m-%d")
        )
    }
}

/// Parse a `YYYY-MM` month string into a window
pub fn parse_month(s: &str) -> Option<PeriodWindow> {
    let (year, month) = s.trim().split_once('-')?;
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    PeriodWindow::month(year, month)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_weekly_window_starts_on_most_recent_sunday() {
        // 2025-03-05 is a Wednesday
        let window = BudgetPeriod::Weekly.window_containing(date(2025, 3, 5), WeekStart::Sunday);
        assert_eq!(window.start, date(2025, 3, 2));
        assert_eq!(window.end, date(2025, 3, 9));
        assert_eq!(window.days(), 7);
    }

    #[test]
    fn test_weekly_window_on_sunday_starts_today() {
        let window = BudgetPeriod::Weekly.window_containing(date(2025, 3, 2), WeekStart::Sunday);
        assert_eq!(window.start, date(2025, 3, 2));
    }

    #[test]
    fn test_weekly_window_monday_start() {
        let window = BudgetPeriod::Weekly.window_containing(date(2025, 3, 2), WeekStart::Monday);
        assert_eq!(window.start, date(2025, 2, 24));
        assert_eq!(window.last_day(), date(2025, 3, 2));
    }

    #[test]
    fn test_monthly_window() {
        let window = BudgetPeriod::Monthly.window_containing(date(2024, 2, 17), WeekStart::Sunday);
        assert_eq!(window.start, date(2024, 2, 1));
        assert_eq!(window.last_day(), date(2024, 2, 29));
        assert!(window.contains(date(2024, 2, 29)));
        assert!(!window.contains(date(2024, 3, 1)));
    }

    #[test]
    fn test_december_and_yearly_windows() {
        let dec = BudgetPeriod::Monthly.window_containing(date(2025, 12, 31), WeekStart::Sunday);
        assert_eq!(dec.end, date(2026, 1, 1));

        let year = BudgetPeriod::Yearly.window_containing(date(2025, 6, 1), WeekStart::Sunday);
        assert_eq!(year.start, date(2025, 1, 1));
        assert_eq!(year.last_day(), date(2025, 12, 31));
        assert_eq!(year.days(), 365);
    }

    #[test]
    fn test_parse_period_and_month() {
        assert_eq!("Weekly".parse::<BudgetPeriod>().unwrap(), BudgetPeriod::Weekly);
        assert_eq!("year".parse::<BudgetPeriod>().unwrap(), BudgetPeriod::Yearly);
        assert!("daily".parse::<BudgetPeriod>().is_err());

        let march = parse_month("2025-03").unwrap();
        assert_eq!(march.start, date(2025, 3, 1));
        assert_eq!(march.iter_days().count(), 31);
        assert!(parse_month("2025-13").is_none());
        assert!(parse_month("March").is_none());
    }
}
