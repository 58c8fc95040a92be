//! Onboarding: the profile form that moves a new user to the main app.

use super::forms::{FormError, parse_amount};
use crate::net::api::AuthApi;
use crate::net::error::ApiError;
use crate::net::types::{ProfileUpdate, UserPatch};
use crate::state::auth::AuthSession;

pub const DEFAULT_CURRENCY: &str = "USD";
pub const DEFAULT_REMINDER_TIME: &str = "09:00";

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error("Failed to update profile: {0}")]
    Api(#[from] ApiError),
}

/// Profile setup input as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileForm {
    pub full_name: String,
    pub monthly_salary: String,
    pub location: String,
    pub mobile_number: String,
    /// Defaults to the salary when blank.
    pub monthly_income: String,
    pub currency: String,
    pub monthly_cycle_start: u8,
    pub monthly_report_enabled: bool,
    /// `HH:MM`; blank disables the reminder.
    pub daily_reminder_time: String,
}

impl Default for ProfileForm {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            monthly_salary: String::new(),
            location: String::new(),
            mobile_number: String::new(),
            monthly_income: String::new(),
            currency: DEFAULT_CURRENCY.to_owned(),
            monthly_cycle_start: 1,
            monthly_report_enabled: true,
            daily_reminder_time: DEFAULT_REMINDER_TIME.to_owned(),
        }
    }
}

impl ProfileForm {
    /// # Errors
    ///
    /// [`FormError::MissingProfileFields`] when name, salary or location is
    /// blank; other variants for malformed numbers, cycle day or time.
    pub fn validate(&self) -> Result<ProfileUpdate, FormError> {
        let full_name = self.full_name.trim();
        let location = self.location.trim();
        let salary = parse_amount(&self.monthly_salary, "Monthly salary")?;
        let (Some(monthly_salary), false, false) = (salary, full_name.is_empty(), location.is_empty()) else {
            return Err(FormError::MissingProfileFields);
        };
        let monthly_income = parse_amount(&self.monthly_income, "Monthly income")?.unwrap_or(monthly_salary);

        if !(1..=31).contains(&self.monthly_cycle_start) {
            return Err(FormError::InvalidCycleStart);
        }

        let reminder = self.daily_reminder_time.trim();
        let daily_reminder_time = if reminder.is_empty() {
            None
        } else if is_valid_clock_time(reminder) {
            Some(reminder.to_owned())
        } else {
            return Err(FormError::InvalidReminderTime);
        };

        let currency = match self.currency.trim() {
            "" => DEFAULT_CURRENCY.to_owned(),
            code => code.to_ascii_uppercase(),
        };

        Ok(ProfileUpdate {
            full_name: full_name.to_owned(),
            monthly_salary,
            location: location.to_owned(),
            mobile_number: self.mobile_number.trim().to_owned(),
            monthly_income,
            currency,
            monthly_cycle_start: self.monthly_cycle_start,
            monthly_report_enabled: self.monthly_report_enabled,
            daily_reminder_time,
        })
    }
}

/// `HH:MM`, 24-hour clock.
fn is_valid_clock_time(raw: &str) -> bool {
    let Some((hours, minutes)) = raw.split_once(':') else {
        return false;
    };
    let two_digits = |s: &str| s.len() == 2 && s.bytes().all(|b| b.is_ascii_digit());
    if !two_digits(hours) || !two_digits(minutes) {
        return false;
    }
    matches!((hours.parse::<u8>(), minutes.parse::<u8>()), (Ok(h), Ok(m)) if h < 24 && m < 60)
}

/// Submit the profile and mark the signed-in user complete.
///
/// The local user is patched only after the backend accepted the update.
///
/// # Errors
///
/// Returns a form error before any request is made, or the API error.
pub async fn complete_profile<A: AuthApi>(auth: &mut AuthSession<A>, form: &ProfileForm) -> Result<(), ProfileError> {
    let update = form.validate()?;
    auth.api().update_profile(&update).await?;
    auth.update_user(UserPatch::from(&update).set("is_profile_complete", true));
    tracing::info!("profile completed");
    Ok(())
}

#[cfg(test)]
#[path = "profile_test.rs"]
mod tests;
