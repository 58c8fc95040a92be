//! Wire types shared by the API client and the services built on it.
//!
//! Field names follow the backend's JSON exactly. The user profile is kept
//! as a raw JSON object because its shape is owned by the backend; typed
//! accessors cover the fields the client actually reads.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// AUTH
// =============================================================================

/// Email/password pair posted to the login and signup endpoints.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Response body of `POST /api/auth/login` and `/api/auth/signup`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

// =============================================================================
// PROFILE
// =============================================================================

/// Backend-defined user record, passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserProfile(Map<String, Value>);

impl UserProfile {
    #[must_use]
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    fn f64_field(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(Value::as_f64)
    }

    #[must_use]
    pub fn id(&self) -> Option<i64> {
        self.0.get("id").and_then(Value::as_i64)
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.str_field("email")
    }

    #[must_use]
    pub fn full_name(&self) -> Option<&str> {
        self.str_field("full_name")
    }

    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.str_field("location")
    }

    #[must_use]
    pub fn mobile_number(&self) -> Option<&str> {
        self.str_field("mobile_number")
    }

    #[must_use]
    pub fn currency(&self) -> Option<&str> {
        self.str_field("currency")
    }

    #[must_use]
    pub fn monthly_salary(&self) -> Option<f64> {
        self.f64_field("monthly_salary")
    }

    #[must_use]
    pub fn monthly_income(&self) -> Option<f64> {
        self.f64_field("monthly_income")
    }

    #[must_use]
    pub fn monthly_cycle_start(&self) -> Option<u8> {
        self.0
            .get("monthly_cycle_start")
            .and_then(Value::as_u64)
            .and_then(|day| u8::try_from(day).ok())
    }

    #[must_use]
    pub fn monthly_report_enabled(&self) -> Option<bool> {
        self.0.get("monthly_report_enabled").and_then(Value::as_bool)
    }

    #[must_use]
    pub fn daily_reminder_time(&self) -> Option<&str> {
        self.str_field("daily_reminder_time")
    }

    /// Whether onboarding is done. Missing or non-boolean counts as `false`.
    #[must_use]
    pub fn is_profile_complete(&self) -> bool {
        self.0
            .get("is_profile_complete")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Shallow merge: each top-level key in `patch` replaces the existing one.
    pub fn merge(&mut self, patch: &UserPatch) {
        for (key, value) in &patch.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }
}

/// Partial user record applied with [`UserProfile::merge`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserPatch(Map<String, Value>);

impl UserPatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    #[must_use]
    pub fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_owned(), value.into());
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for UserPatch {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Body of `PUT /api/users/profile`. The backend marks the profile complete
/// on success.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileUpdate {
    pub full_name: String,
    pub monthly_salary: f64,
    pub location: String,
    pub mobile_number: String,
    pub monthly_income: f64,
    pub currency: String,
    pub monthly_cycle_start: u8,
    pub monthly_report_enabled: bool,
    pub daily_reminder_time: Option<String>,
}

impl From<&ProfileUpdate> for UserPatch {
    fn from(update: &ProfileUpdate) -> Self {
        let reminder = update
            .daily_reminder_time
            .clone()
            .map_or(Value::Null, Value::String);
        UserPatch::new()
            .set("full_name", update.full_name.clone())
            .set("monthly_salary", update.monthly_salary)
            .set("location", update.location.clone())
            .set("mobile_number", update.mobile_number.clone())
            .set("monthly_income", update.monthly_income)
            .set("currency", update.currency.clone())
            .set("monthly_cycle_start", update.monthly_cycle_start)
            .set("monthly_report_enabled", update.monthly_report_enabled)
            .set("daily_reminder_time", reminder)
    }
}

// =============================================================================
// EXPENSES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Credit,
    Debit,
}

impl TransactionType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Credit => "credit",
            Self::Debit => "debit",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "credit" | "income" => Ok(Self::Credit),
            "debit" | "expense" => Ok(Self::Debit),
            other => Err(format!("unknown transaction type '{other}' (expected 'credit' or 'debit')")),
        }
    }
}

/// A stored transaction as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub details: String,
    pub amount: f64,
    pub transaction_type: TransactionType,
    /// ISO-8601 timestamp, kept as sent by the backend.
    pub transaction_date: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Expense {
    /// The `YYYY-MM-DD` part of the transaction timestamp.
    #[must_use]
    pub fn date(&self) -> &str {
        self.transaction_date
            .get(..10)
            .unwrap_or(&self.transaction_date)
    }
}

/// Body of `POST /api/expenses/` and `PUT /api/expenses/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseDraft {
    pub details: String,
    pub amount: f64,
    pub transaction_type: TransactionType,
    pub transaction_date: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyStats {
    pub total_credit: f64,
    pub total_debit: f64,
    pub net_amount: f64,
}

/// One month of the dashboard overview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthSummary {
    /// English month name, e.g. `"March"`.
    pub month: String,
    pub year: i32,
    pub credit: f64,
    pub debit: f64,
    pub net: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub months: Vec<MonthSummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ExpenseUpdateResponse {
    pub expense: Expense,
}

// =============================================================================
// REPORTS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Pdf,
    Excel,
}

impl ReportFormat {
    /// Endpoint segment under `/api/reports/`.
    #[must_use]
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Excel => "excel",
        }
    }

    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Excel => "xlsx",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "excel" | "xlsx" => Ok(Self::Excel),
            other => Err(format!("unknown report format '{other}' (expected 'pdf' or 'excel')")),
        }
    }
}

/// Query string for the report endpoints. Month ranges are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportQuery {
    pub from_year: i32,
    pub from_month: u8,
    pub to_year: i32,
    pub to_month: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<TransactionType>,
}

// =============================================================================
// AI CHAT
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub message: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    #[serde(default)]
    pub chart_url: Option<String>,
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
