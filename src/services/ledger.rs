//! Month navigation, expense entry, and month listings.
//!
//! The backend filters expenses by calendar month, so every listing is keyed
//! by a [`MonthCursor`]. Transaction dates stay strings as the backend sent
//! them; only their `YYYY-MM-DD` prefix is interpreted here.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use time::macros::format_description;
use time::{Date, Month, OffsetDateTime};

use super::forms::{FormError, parse_amount};
use crate::net::api::ExpenseApi;
use crate::net::error::ApiError;
use crate::net::types::{Expense, ExpenseDraft, MonthlyStats, TransactionType};

/// How many years the year picker offers, counting the current one.
pub const YEAR_OPTIONS: i32 = 5;

/// Today's date in local time, falling back to UTC when the offset is unknown.
#[must_use]
pub fn today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

/// Years offered by the month picker, newest first.
#[must_use]
pub fn year_options(current_year: i32) -> Vec<i32> {
    (0..YEAR_OPTIONS).map(|i| current_year - i).collect()
}

/// Reject months whose year the picker would not offer.
///
/// # Errors
///
/// [`FormError::YearOutOfRange`] naming the offered range.
pub fn check_pickable(month: MonthCursor, current_year: i32) -> Result<(), FormError> {
    if year_options(current_year).contains(&month.year()) {
        return Ok(());
    }
    Err(FormError::YearOutOfRange { min: current_year - (YEAR_OPTIONS - 1), max: current_year })
}

// =============================================================================
// MONTH CURSOR
// =============================================================================

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthCursor {
    year: i32,
    month: Month,
}

impl MonthCursor {
    /// # Errors
    ///
    /// [`FormError::InvalidMonth`] unless `month` is 1..=12.
    pub fn new(year: i32, month: u8) -> Result<Self, FormError> {
        let month = Month::try_from(month).map_err(|_| FormError::InvalidMonth)?;
        Ok(Self { year, month })
    }

    #[must_use]
    pub fn from_date(date: Date) -> Self {
        Self { year: date.year(), month: date.month() }
    }

    #[must_use]
    pub fn current() -> Self {
        Self::from_date(today())
    }

    #[must_use]
    pub fn year(self) -> i32 {
        self.year
    }

    #[must_use]
    pub fn month(self) -> Month {
        self.month
    }

    #[must_use]
    pub fn month_number(self) -> u8 {
        u8::from(self.month)
    }

    #[must_use]
    pub fn previous(self) -> Self {
        match self.month {
            Month::January => Self { year: self.year - 1, month: Month::December },
            month => Self { year: self.year, month: month.previous() },
        }
    }

    #[must_use]
    pub fn next(self) -> Self {
        match self.month {
            Month::December => Self { year: self.year + 1, month: Month::January },
            month => Self { year: self.year, month: month.next() },
        }
    }

    /// Number of days in this month.
    #[must_use]
    pub fn days(self) -> u8 {
        time::util::days_in_year_month(self.year, self.month)
    }

    /// Human label, e.g. `"March 2025"`.
    #[must_use]
    pub fn label(self) -> String {
        format!("{} {}", self.month, self.year)
    }

    /// Whether an ISO date or timestamp string falls in this month.
    #[must_use]
    pub fn contains(self, iso_date: &str) -> bool {
        iso_date.starts_with(&self.to_string())
    }

    fn key(self) -> (i32, u8) {
        (self.year, self.month_number())
    }
}

impl Ord for MonthCursor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl PartialOrd for MonthCursor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for MonthCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month_number())
    }
}

impl FromStr for MonthCursor {
    type Err = String;

    /// Parse `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("invalid month '{s}' (expected YYYY-MM)");
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u8 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|e| e.to_string())
    }
}

// =============================================================================
// EXPENSE ENTRY
// =============================================================================

/// Parse a `YYYY-MM-DD` calendar date.
///
/// # Errors
///
/// Returns a message when the text is not a real date.
pub fn parse_date(raw: &str) -> Result<Date, String> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|_| format!("invalid date '{raw}' (expected YYYY-MM-DD)"))
}

/// `YYYY-MM-DD`.
///
/// # Errors
///
/// [`FormError::InvalidDate`] if the date cannot be rendered.
pub fn format_date(date: Date) -> Result<String, FormError> {
    date.format(format_description!("[year]-[month]-[day]"))
        .map_err(|_| FormError::InvalidDate)
}

/// Backend wire format for a transaction date: midnight UTC of `date`.
///
/// # Errors
///
/// [`FormError::InvalidDate`] if the date cannot be rendered.
pub fn format_transaction_date(date: Date) -> Result<String, FormError> {
    date.format(format_description!("[year]-[month]-[day]T00:00:00Z"))
        .map_err(|_| FormError::InvalidDate)
}

/// Raw add/edit-expense input.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseForm {
    pub date: Option<Date>,
    pub details: String,
    pub amount: String,
    pub transaction_type: TransactionType,
}

impl ExpenseForm {
    /// # Errors
    ///
    /// [`FormError::MissingExpenseFields`] when the date, details or amount is
    /// missing; [`FormError::NonPositiveAmount`] / [`FormError::InvalidNumber`]
    /// for a bad amount.
    pub fn validate(&self) -> Result<ExpenseDraft, FormError> {
        let details = self.details.trim();
        let (Some(date), false) = (self.date, details.is_empty()) else {
            return Err(FormError::MissingExpenseFields);
        };
        let amount = parse_amount(&self.amount, "Amount")?.ok_or(FormError::MissingExpenseFields)?;
        if amount <= 0.0 {
            return Err(FormError::NonPositiveAmount);
        }
        Ok(ExpenseDraft {
            details: details.to_owned(),
            amount,
            transaction_type: self.transaction_type,
            transaction_date: format_transaction_date(date)?,
        })
    }
}

// =============================================================================
// LISTINGS
// =============================================================================

/// Newest transaction first; ties broken by creation time, newest first.
pub fn sort_newest_first(expenses: &mut [Expense]) {
    expenses.sort_by(|a, b| {
        b.transaction_date
            .cmp(&a.transaction_date)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}

/// Case-insensitive substring match on `details`. A blank query matches all.
#[must_use]
pub fn search<'a>(expenses: &'a [Expense], query: &str) -> Vec<&'a Expense> {
    let needle = query.trim().to_lowercase();
    expenses
        .iter()
        .filter(|e| needle.is_empty() || e.details.to_lowercase().contains(&needle))
        .collect()
}

/// Credit/debit totals computed locally, same semantics as monthly-stats.
#[must_use]
pub fn summarize<'a>(expenses: impl IntoIterator<Item = &'a Expense>) -> MonthlyStats {
    let (total_credit, total_debit) = expenses
        .into_iter()
        .fold((0.0, 0.0), |(credit, debit), e| match e.transaction_type {
            TransactionType::Credit => (credit + e.amount, debit),
            TransactionType::Debit => (credit, debit + e.amount),
        });
    MonthlyStats { total_credit, total_debit, net_amount: total_credit - total_debit }
}

/// Expenses keyed by `YYYY-MM-DD`, for marking calendar days.
#[must_use]
pub fn group_by_day<'a>(expenses: impl IntoIterator<Item = &'a Expense>) -> BTreeMap<&'a str, Vec<&'a Expense>> {
    let mut days: BTreeMap<&str, Vec<&Expense>> = BTreeMap::new();
    for expense in expenses {
        days.entry(expense.date()).or_default().push(expense);
    }
    days
}

/// One month of transactions with the backend's totals.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthView {
    pub month: MonthCursor,
    /// Sorted newest first.
    pub expenses: Vec<Expense>,
    pub stats: MonthlyStats,
}

/// Fetch a month's expenses and totals concurrently. Rows dated outside
/// `month` are dropped.
///
/// # Errors
///
/// Returns the first failing request's error.
pub async fn load_month<A: ExpenseApi + ?Sized>(api: &A, month: MonthCursor) -> Result<MonthView, ApiError> {
    let (expenses, stats) = tokio::join!(
        api.list_expenses(month.year(), month.month_number()),
        api.monthly_stats(month.year(), month.month_number()),
    );
    let mut expenses = expenses?;
    let stats = stats?;
    let listed = expenses.len();
    expenses.retain(|e| month.contains(&e.transaction_date));
    if expenses.len() != listed {
        tracing::warn!(%month, dropped = listed - expenses.len(), "backend listed expenses outside the month");
    }
    sort_newest_first(&mut expenses);
    tracing::debug!(%month, count = expenses.len(), "month loaded");
    Ok(MonthView { month, expenses, stats })
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
