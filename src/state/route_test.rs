use super::*;
use crate::net::types::{UserPatch, UserProfile};
use crate::state::session::SessionEvent;
use serde_json::json;

fn signed_in(complete: bool) -> Session {
    let user: UserProfile = serde_json::from_value(json!({ "is_profile_complete": complete })).unwrap();
    Session::new().reduce(SessionEvent::LoginSuccess { user, token: "tok".into() })
}

#[test]
fn loading_shows_splash() {
    assert_eq!(select_route(&Session::new(), AuthScreen::Login), Route::Splash);
}

#[test]
fn signed_out_shows_requested_auth_screen() {
    let session = Session::new().reduce(SessionEvent::SetLoading(false));
    assert_eq!(select_route(&session, AuthScreen::Login), Route::Auth(AuthScreen::Login));
    assert_eq!(select_route(&session, AuthScreen::Signup), Route::Auth(AuthScreen::Signup));
}

#[test]
fn incomplete_profile_goes_to_setup() {
    assert_eq!(select_route(&signed_in(false), AuthScreen::Login), Route::ProfileSetup);
}

#[test]
fn complete_profile_goes_to_main() {
    assert_eq!(select_route(&signed_in(true), AuthScreen::Signup), Route::Main);
}

#[test]
fn completing_profile_moves_to_main() {
    let session = signed_in(false).reduce(SessionEvent::UpdateUser(UserPatch::new().set("is_profile_complete", true)));
    assert_eq!(select_route(&session, AuthScreen::Login), Route::Main);
}

#[test]
fn logout_returns_to_auth() {
    let session = signed_in(true).reduce(SessionEvent::Logout);
    assert_eq!(select_route(&session, AuthScreen::Login), Route::Auth(AuthScreen::Login));
}

#[test]
fn route_display_names() {
    assert_eq!(Route::Splash.to_string(), "splash");
    assert_eq!(Route::Auth(AuthScreen::Signup).to_string(), "signup");
    assert_eq!(Route::ProfileSetup.to_string(), "profile-setup");
    assert_eq!(Route::Main.to_string(), "main");
}
