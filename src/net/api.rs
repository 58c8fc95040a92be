//! REST client for the expense backend.
//!
//! ARCHITECTURE
//! ============
//! Two traits split the backend surface: [`AuthApi`] is everything the
//! session lifecycle needs, [`ExpenseApi`] is the rest of the app. Services
//! depend on the traits so tests can substitute in-memory fakes.
//!
//! [`HttpApi`] implements both over `reqwest`. Like an interceptor pair it
//! reads the bearer token from [`LocalStorage`] right before every request
//! and evicts it whenever the backend answers 401.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use super::error::{ApiError, extract_detail};
use super::types::{
    ChatReply, ChatRequest, Credentials, DashboardStats, Expense, ExpenseDraft, ExpenseUpdateResponse, MonthlyStats,
    ProfileUpdate, ReportFormat, ReportQuery, TokenResponse, UserProfile,
};
use crate::config::{ClientConfig, Timeouts};
use crate::storage::{LocalStorage, TOKEN_KEY};

// =============================================================================
// TRAITS
// =============================================================================

/// Endpoints used by the session lifecycle.
#[async_trait::async_trait]
pub trait AuthApi: Send + Sync {
    /// `POST /api/auth/signup`
    async fn signup(&self, credentials: &Credentials) -> Result<TokenResponse, ApiError>;

    /// `POST /api/auth/login`
    async fn login(&self, credentials: &Credentials) -> Result<TokenResponse, ApiError>;

    /// `GET /api/users/profile` for the token currently in storage.
    async fn fetch_profile(&self) -> Result<UserProfile, ApiError>;

    /// `PUT /api/users/profile`
    async fn update_profile(&self, profile: &ProfileUpdate) -> Result<(), ApiError>;
}

/// Expense, statistics, report and chat endpoints.
#[async_trait::async_trait]
pub trait ExpenseApi: Send + Sync {
    async fn create_expense(&self, draft: &ExpenseDraft) -> Result<Expense, ApiError>;

    async fn list_expenses(&self, year: i32, month: u8) -> Result<Vec<Expense>, ApiError>;

    async fn update_expense(&self, id: i64, draft: &ExpenseDraft) -> Result<Expense, ApiError>;

    async fn delete_expense(&self, id: i64) -> Result<(), ApiError>;

    async fn monthly_stats(&self, year: i32, month: u8) -> Result<MonthlyStats, ApiError>;

    /// Credit/debit totals for the last four months, oldest first.
    async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError>;

    /// Raw report file bytes.
    async fn download_report(&self, format: ReportFormat, query: &ReportQuery) -> Result<Vec<u8>, ApiError>;

    async fn chat(&self, message: &str) -> Result<ChatReply, ApiError>;
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

pub struct HttpApi {
    http: reqwest::Client,
    base_url: String,
    storage: Arc<dyn LocalStorage>,
}

impl HttpApi {
    /// Build a client from typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &ClientConfig, storage: Arc<dyn LocalStorage>) -> Result<Self, ApiError> {
        Self::with_base_url(&config.api_url, config.timeouts, storage)
    }

    /// Build a client against an explicit base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn with_base_url(base_url: &str, timeouts: Timeouts, storage: Arc<dyn LocalStorage>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_owned(), storage })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, path, "api request");
        let builder = self.http.request(method, url);

        // A storage failure degrades to an anonymous request.
        match self.storage.get_item(TOKEN_KEY) {
            Ok(Some(token)) if !token.trim().is_empty() => builder.bearer_auth(token.trim()),
            Ok(_) => builder,
            Err(e) => {
                tracing::warn!(error = %e, "token read failed; sending request without auth");
                builder
            }
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(status = status.as_u16(), url = %response.url().path(), "api response");
            return Ok(response);
        }

        let path = response.url().path().to_owned();
        let body = response.text().await.unwrap_or_default();
        let detail = extract_detail(&body);
        tracing::warn!(status = status.as_u16(), %path, body = body.trim(), "api request failed");

        if status == StatusCode::UNAUTHORIZED {
            if let Err(e) = self.storage.remove_item(TOKEN_KEY) {
                tracing::warn!(error = %e, "failed to evict token after 401");
            }
            return Err(ApiError::Unauthorized { detail });
        }
        Err(ApiError::Status { status: status.as_u16(), detail })
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(builder).await?;
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| ApiError::Parse(e.to_string()))
    }
}

#[async_trait::async_trait]
impl AuthApi for HttpApi {
    async fn signup(&self, credentials: &Credentials) -> Result<TokenResponse, ApiError> {
        self.send_json(self.request(Method::POST, "/api/auth/signup").json(credentials))
            .await
    }

    async fn login(&self, credentials: &Credentials) -> Result<TokenResponse, ApiError> {
        self.send_json(self.request(Method::POST, "/api/auth/login").json(credentials))
            .await
    }

    async fn fetch_profile(&self) -> Result<UserProfile, ApiError> {
        self.send_json(self.request(Method::GET, "/api/users/profile"))
            .await
    }

    async fn update_profile(&self, profile: &ProfileUpdate) -> Result<(), ApiError> {
        self.send(self.request(Method::PUT, "/api/users/profile").json(profile))
            .await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl ExpenseApi for HttpApi {
    async fn create_expense(&self, draft: &ExpenseDraft) -> Result<Expense, ApiError> {
        self.send_json(self.request(Method::POST, "/api/expenses/").json(draft))
            .await
    }

    async fn list_expenses(&self, year: i32, month: u8) -> Result<Vec<Expense>, ApiError> {
        let builder = self
            .request(Method::GET, "/api/expenses/")
            .query(&[("year", i64::from(year)), ("month", i64::from(month))]);
        self.send_json(builder).await
    }

    async fn update_expense(&self, id: i64, draft: &ExpenseDraft) -> Result<Expense, ApiError> {
        let path = format!("/api/expenses/{id}");
        let body: ExpenseUpdateResponse = self
            .send_json(self.request(Method::PUT, &path).json(draft))
            .await?;
        Ok(body.expense)
    }

    async fn delete_expense(&self, id: i64) -> Result<(), ApiError> {
        let path = format!("/api/expenses/{id}");
        self.send(self.request(Method::DELETE, &path)).await?;
        Ok(())
    }

    async fn monthly_stats(&self, year: i32, month: u8) -> Result<MonthlyStats, ApiError> {
        let builder = self
            .request(Method::GET, "/api/expenses/monthly-stats")
            .query(&[("year", i64::from(year)), ("month", i64::from(month))]);
        self.send_json(builder).await
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        self.send_json(self.request(Method::GET, "/api/expenses/dashboard-stats"))
            .await
    }

    async fn download_report(&self, format: ReportFormat, query: &ReportQuery) -> Result<Vec<u8>, ApiError> {
        let path = format!("/api/reports/{}", format.endpoint());
        let response = self
            .send(self.request(Method::GET, &path).query(query))
            .await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        tracing::info!(format = format.endpoint(), size = bytes.len(), "report downloaded");
        Ok(bytes.to_vec())
    }

    async fn chat(&self, message: &str) -> Result<ChatReply, ApiError> {
        self.send_json(self.request(Method::POST, "/api/ai/chat").json(&ChatRequest { message }))
            .await
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
