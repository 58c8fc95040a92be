#[cfg(test)]
#[path = "route_test.rs"]
mod route_test;

use std::fmt;

use super::session::Session;

/// Which screen of the sign-in flow the user is on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthScreen {
    #[default]
    Login,
    Signup,
}

/// Top-level destination derived from session state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    /// Bootstrap check still running.
    Splash,
    Auth(AuthScreen),
    /// Signed in but onboarding is not finished.
    ProfileSetup,
    Main,
}

/// Pick the top-level route. `screen` is only consulted when signed out.
#[must_use]
pub fn select_route(session: &Session, screen: AuthScreen) -> Route {
    if session.is_loading() {
        return Route::Splash;
    }
    match session.user() {
        Some(user) if session.is_authenticated() => {
            if user.is_profile_complete() { Route::Main } else { Route::ProfileSetup }
        }
        _ => Route::Auth(screen),
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Splash => "splash",
            Self::Auth(AuthScreen::Login) => "login",
            Self::Auth(AuthScreen::Signup) => "signup",
            Self::ProfileSetup => "profile-setup",
            Self::Main => "main",
        };
        f.write_str(name)
    }
}
