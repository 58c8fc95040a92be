//! Session lifecycle: bootstrap, login, signup, logout, user updates.
//!
//! DESIGN
//! ======
//! `AuthSession` owns the [`Session`] store together with the backend client
//! and the token storage it needs. Callers hold it explicitly and pass it
//! where needed; there is no global session. Every state change goes
//! through [`Session::apply`].
//!
//! ERROR HANDLING
//! ==============
//! Login and signup fail with an [`AuthFailure`] carrying a message fit for
//! display (the backend's `detail`, or a generic fallback). Bootstrap never
//! fails: any problem restoring the saved token clears it and leaves the
//! session signed out. Nothing is retried.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::sync::Arc;

use super::route::{AuthScreen, Route, select_route};
use super::session::{Session, SessionEvent};
use crate::net::api::AuthApi;
use crate::net::error::ApiError;
use crate::net::types::{Credentials, UserPatch, UserProfile};
use crate::storage::{LocalStorage, StorageError, TOKEN_KEY};

/// User-facing reason a login or signup did not succeed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct AuthFailure {
    pub message: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AuthFlow {
    Login,
    Signup,
}

impl AuthFlow {
    fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Signup => "signup",
        }
    }

    fn failure(self, err: &ApiError) -> AuthFailure {
        let message = match err.detail() {
            Some(detail) => detail.to_owned(),
            None => match self {
                Self::Login => "Login failed".to_owned(),
                Self::Signup => "Signup failed".to_owned(),
            },
        };
        AuthFailure { message }
    }
}

pub struct AuthSession<A> {
    api: A,
    storage: Arc<dyn LocalStorage>,
    session: Session,
}

impl<A: AuthApi> AuthSession<A> {
    /// Wrap a backend client and storage. The session starts bootstrapping;
    /// call [`AuthSession::bootstrap`] before reading routes.
    pub fn new(api: A, storage: Arc<dyn LocalStorage>) -> Self {
        Self { api, storage, session: Session::new() }
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }

    #[must_use]
    pub fn route(&self, screen: AuthScreen) -> Route {
        select_route(&self.session, screen)
    }

    /// Restore a persisted session, if any.
    ///
    /// A stored token is validated by fetching the profile. On any failure
    /// the token is removed. Loading is always false afterwards.
    pub async fn bootstrap(&mut self) {
        self.session.apply(SessionEvent::SetLoading(true));

        match self.restore().await {
            Ok(Some((user, token))) => {
                tracing::info!(user_id = ?user.id(), "session restored");
                self.session.apply(SessionEvent::LoginSuccess { user, token });
            }
            Ok(None) => tracing::debug!("no persisted token"),
            Err(e) => {
                tracing::warn!(error = %e, "session restore failed; clearing token");
                self.clear_token();
            }
        }

        self.session.apply(SessionEvent::SetLoading(false));
    }

    async fn restore(&self) -> Result<Option<(UserProfile, String)>, ApiError> {
        let token = self
            .storage
            .get_item(TOKEN_KEY)?
            .map(|t| t.trim().to_owned())
            .filter(|t| !t.is_empty());
        let Some(token) = token else {
            return Ok(None);
        };
        let user = self.api.fetch_profile().await?;
        Ok(Some((user, token)))
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthFailure`] if the credentials are rejected, the
    /// backend is unreachable, or the token cannot be stored. An existing
    /// session survives the failure only while its token is still stored.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), AuthFailure> {
        self.authenticate(AuthFlow::Login, email, password).await
    }

    /// Create an account and sign in with it.
    ///
    /// # Errors
    ///
    /// Same as [`AuthSession::login`], via the signup endpoint.
    pub async fn signup(&mut self, email: &str, password: &str) -> Result<(), AuthFailure> {
        self.authenticate(AuthFlow::Signup, email, password).await
    }

    async fn authenticate(&mut self, flow: AuthFlow, email: &str, password: &str) -> Result<(), AuthFailure> {
        let credentials = Credentials { email: email.to_owned(), password: password.to_owned() };
        match self.exchange(flow, &credentials).await {
            Ok((user, token)) => {
                tracing::info!(flow = flow.as_str(), user_id = ?user.id(), "authenticated");
                self.session.apply(SessionEvent::LoginSuccess { user, token });
                Ok(())
            }
            Err(e) => {
                tracing::warn!(flow = flow.as_str(), error = %e, "authentication failed");
                self.sign_out_if_token_gone();
                Err(flow.failure(&e))
            }
        }
    }

    /// Trade credentials for a token, persist it, and fetch the profile.
    async fn exchange(&self, flow: AuthFlow, credentials: &Credentials) -> Result<(UserProfile, String), ApiError> {
        let tokens = match flow {
            AuthFlow::Login => self.api.login(credentials).await?,
            AuthFlow::Signup => self.api.signup(credentials).await?,
        };
        self.storage.set_item(TOKEN_KEY, &tokens.access_token)?;

        match self.api.fetch_profile().await {
            Ok(user) => Ok((user, tokens.access_token)),
            Err(e) => {
                // Storage must not outlive a sign-in that did not complete.
                self.clear_token();
                Err(e)
            }
        }
    }

    /// Sign out. The session is always reset; the result reports whether
    /// the persisted token could be removed.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the token file could not be deleted.
    pub fn logout(&mut self) -> Result<(), StorageError> {
        let removed = self.storage.remove_item(TOKEN_KEY);
        self.session.apply(SessionEvent::Logout);
        tracing::info!("signed out");
        removed
    }

    /// Merge fields into the signed-in user.
    pub fn update_user(&mut self, patch: UserPatch) {
        self.session.apply(SessionEvent::UpdateUser(patch));
    }

    /// A failed attempt can evict the stored token (a 401, or the cleanup
    /// after a failed profile fetch). The session must follow storage.
    fn sign_out_if_token_gone(&mut self) {
        if !self.session.is_authenticated() {
            return;
        }
        let stored = self.storage.get_item(TOKEN_KEY).ok().flatten();
        if stored.as_deref() != self.session.token() {
            tracing::info!("stored token removed; signing out");
            self.session.apply(SessionEvent::Logout);
        }
    }

    fn clear_token(&self) {
        if let Err(e) = self.storage.remove_item(TOKEN_KEY) {
            tracing::warn!(error = %e, "failed to clear token");
        }
    }
}
