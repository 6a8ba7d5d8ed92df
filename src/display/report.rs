//! Report formatting for terminal output
//!
//! Renders monthly summaries, category breakdowns, the calendar grid and the
//! trend chart, plus the small helpers the other display modules share.

use chrono::{Datelike, NaiveDate};

use crate::models::{Currency, PeriodWindow, WeekStart};
use crate::services::analytics::{CalendarDay, CategoryTotal, PeriodSummary};

/// Format a percentage with appropriate precision
pub fn format_percentage(pct: f64) -> String {
    if pct < 0.1 && pct > 0.0 {
        format!("{:.2}%", pct)
    } else if pct < 10.0 {
        format!("{:.1}%", pct)
    } else {
        format!("{:.0}%", pct)
    }
}

/// Simple bar chart segment
pub fn format_bar(value: f64, max_value: f64, width: usize) -> String {
    if max_value <= 0.0 || value <= 0.0 {
        return " ".repeat(width);
    }

    let filled = ((value / max_value) * width as f64).round() as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

/// Truncate to `max_len` characters with an ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}

/// Income, expenses, net and savings rate for one window
pub fn format_summary(title: &str, summary: &PeriodSummary, currency: Currency) -> String {
    let mut output = String::new();
    output.push_str(&format!("{}\n", title));
    output.push_str(&format!("{}\n", separator(40)));
    output.push_str(&format!("Period:        {}\n", summary.window));
    output.push_str(&format!("Income:        {}\n", currency.format(summary.income)));
    output.push_str(&format!("Expenses:      {}\n", currency.format(summary.expense)));
    output.push_str(&format!("Net:           {}\n", currency.format(summary.net())));
    output.push_str(&format!(
        "Savings rate:  {}\n",
        format_percentage(summary.savings_rate().max(0.0))
    ));
    output.push_str(&format!("Transactions:  {}\n", summary.transaction_count));
    output
}

/// Category rows with amount, count, share and a bar
pub fn format_breakdown(title: &str, rows: &[CategoryTotal], currency: Currency) -> String {
    if rows.is_empty() {
        return format!("{}\nNo transactions in this period.\n", title);
    }

    let max = rows.iter().map(|r| r.amount.as_f64()).fold(0.0, f64::max);
    let amounts: Vec<String> = rows.iter().map(|r| currency.format(r.amount)).collect();
    let amount_width = amounts.iter().map(|a| a.chars().count()).max().unwrap_or(6);

    let mut output = String::new();
    output.push_str(&format!("{}\n", title));
    output.push_str(&format!("{}\n", separator(60)));
    for (row, amount) in rows.iter().zip(&amounts) {
        output.push_str(&format!(
            "{:<16} {:>width$} {:>4} {:>6}  {}\n",
            truncate(&row.category, 16),
            amount,
            row.count,
            format_percentage(row.percentage),
            format_bar(row.amount.as_f64(), max, 20),
            width = amount_width,
        ));
    }
    output
}

/// Month grid with active days marked, followed by per-day totals
pub fn format_calendar(
    window: PeriodWindow,
    days: &[CalendarDay],
    week_start: WeekStart,
    currency: Currency,
) -> String {
    let mut output = String::new();
    output.push_str(&format!("{:^28}\n", window.start.format("%B %Y").to_string()));

    let names = match week_start {
        WeekStart::Sunday => ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"],
        WeekStart::Monday => ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"],
    };
    output.push_str(&names.map(|n| format!(" {} ", n)).concat());
    output.push('\n');

    let lead = match week_start {
        WeekStart::Sunday => window.start.weekday().num_days_from_sunday(),
        WeekStart::Monday => window.start.weekday().num_days_from_monday(),
    } as usize;
    output.push_str(&"    ".repeat(lead));

    let active = |date: NaiveDate| days.iter().any(|d| d.date == date);
    for (column, date) in window.iter_days().enumerate().map(|(i, d)| (i + lead, d)) {
        let marker = if active(date) { '*' } else { ' ' };
        output.push_str(&format!("{:>3}{}", date.day(), marker));
        if column % 7 == 6 {
            output.push('\n');
        }
    }
    if !output.ends_with('\n') {
        output.push('\n');
    }

    if days.is_empty() {
        output.push_str("\nNo activity this month.\n");
        return output;
    }

    output.push('\n');
    for day in days {
        output.push_str(&format!(
            "{}  +{}  -{}  ({} {})\n",
            day.date.format("%a %d"),
            currency.format(day.income),
            currency.format(day.expense),
            day.count,
            if day.count == 1 { "entry" } else { "entries" },
        ));
    }
    output
}

/// One line per month, oldest first, with an expense bar
pub fn format_trend(trend: &[PeriodSummary], currency: Currency) -> String {
    let max = trend
        .iter()
        .map(|s| s.expense.as_f64().max(s.income.as_f64()))
        .fold(0.0, f64::max);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<8} {:>14} {:>14} {:>14}\n",
        "Month", "Income", "Expenses", "Net"
    ));
    output.push_str(&format!("{}\n", separator(74)));
    for summary in trend {
        output.push_str(&format!(
            "{:<8} {:>14} {:>14} {:>14}  {}\n",
            summary.window.start.format("%Y-%m"),
            currency.format(summary.income),
            currency.format(summary.expense),
            currency.format(summary.net()),
            format_bar(summary.expense.as_f64(), max, 20),
        ));
    }
    output
}
