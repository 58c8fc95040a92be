//! PDF/Excel report export.

use std::path::{Path, PathBuf};

use time::Date;

use super::forms::FormError;
use super::ledger::{MonthCursor, format_date};
use crate::net::api::ExpenseApi;
use crate::net::error::ApiError;
use crate::net::types::{ReportFormat, ReportQuery, TransactionType};

pub const MIN_REPORT_YEAR: i32 = 2000;
pub const MAX_REPORT_YEAR: i32 = 2100;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error("Failed to generate report: {0}")]
    Api(#[from] ApiError),

    #[error("No data received from server")]
    Empty,

    #[error("failed to write report to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// An export request covering `from..=to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportRequest {
    pub from: MonthCursor,
    pub to: MonthCursor,
    /// `None` exports both credits and debits.
    pub transaction_type: Option<TransactionType>,
    pub format: ReportFormat,
}

impl ReportRequest {
    /// # Errors
    ///
    /// Years outside 2000..=2100, or `from` after `to`.
    pub fn query(&self) -> Result<ReportQuery, FormError> {
        for month in [self.from, self.to] {
            if !(MIN_REPORT_YEAR..=MAX_REPORT_YEAR).contains(&month.year()) {
                return Err(FormError::YearOutOfRange { min: MIN_REPORT_YEAR, max: MAX_REPORT_YEAR });
            }
        }
        if self.from > self.to {
            return Err(FormError::InvertedRange);
        }
        Ok(ReportQuery {
            from_year: self.from.year(),
            from_month: self.from.month_number(),
            to_year: self.to.year(),
            to_month: self.to.month_number(),
            transaction_type: self.transaction_type,
        })
    }
}

/// `expense_report_<YYYY-MM-DD>.<ext>`
///
/// # Errors
///
/// [`FormError::InvalidDate`] if `today` cannot be rendered.
pub fn report_filename(format: ReportFormat, today: Date) -> Result<String, FormError> {
    Ok(format!("expense_report_{}.{}", format_date(today)?, format.extension()))
}

/// Download a report and save it under `dir`, returning the written path.
///
/// # Errors
///
/// Returns a validation error before any request, the API error, an
/// [`ReportError::Empty`] body, or the write failure.
pub async fn download_report<A: ExpenseApi + ?Sized>(
    api: &A,
    request: &ReportRequest,
    dir: &Path,
    today: Date,
) -> Result<PathBuf, ReportError> {
    let query = request.query()?;
    let bytes = api.download_report(request.format, &query).await?;
    if bytes.is_empty() {
        return Err(ReportError::Empty);
    }

    let path = dir.join(report_filename(request.format, today)?);
    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|source| ReportError::Write { path: path.clone(), source })?;

    tracing::info!(path = %path.display(), size = bytes.len(), "report saved");
    Ok(path)
}

#[cfg(test)]
#[path = "reports_test.rs"]
mod tests;
