#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use crate::net::types::{UserPatch, UserProfile};

/// Client-side authentication state.
///
/// Fields are private: the only way to change a session is [`Session::reduce`]
/// (or [`Session::apply`]), which keeps `is_authenticated` equal to
/// `token.is_some() && user.is_some()`.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    user: Option<UserProfile>,
    token: Option<String>,
    is_authenticated: bool,
    is_loading: bool,
}

/// Transitions accepted by the session store.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    /// Start or finish the bootstrap check.
    SetLoading(bool),
    /// A token was obtained and its profile fetched.
    LoginSuccess { user: UserProfile, token: String },
    Logout,
    /// Shallow-merge fields into the current user.
    UpdateUser(UserPatch),
}

impl Default for Session {
    /// The bootstrapping state: nobody signed in, check pending.
    fn default() -> Self {
        Self { user: None, token: None, is_authenticated: false, is_loading: true }
    }
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Pure transition function.
    #[must_use]
    pub fn reduce(self, event: SessionEvent) -> Self {
        match event {
            SessionEvent::SetLoading(is_loading) => Self { is_loading, ..self },
            SessionEvent::LoginSuccess { user, token } => {
                Self { user: Some(user), token: Some(token), is_authenticated: true, is_loading: false }
            }
            SessionEvent::Logout => Self { user: None, token: None, is_authenticated: false, is_loading: false },
            SessionEvent::UpdateUser(patch) => match self.user {
                Some(mut user) => {
                    user.merge(&patch);
                    Self { user: Some(user), ..self }
                }
                None => {
                    tracing::debug!("ignoring user update without a signed-in user");
                    self
                }
            },
        }
    }

    /// In-place form of [`Session::reduce`].
    pub fn apply(&mut self, event: SessionEvent) {
        *self = std::mem::take(self).reduce(event);
    }
}
