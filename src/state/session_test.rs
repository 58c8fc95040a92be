use super::*;
use serde_json::json;

fn user(value: serde_json::Value) -> UserProfile {
    serde_json::from_value(value).unwrap()
}

fn signed_in() -> Session {
    Session::new().reduce(SessionEvent::LoginSuccess {
        user: user(json!({ "id": 1, "full_name": "Ada", "currency": "INR", "is_profile_complete": false })),
        token: "tok".into(),
    })
}

fn invariant_holds(session: &Session) -> bool {
    session.is_authenticated() == (session.token().is_some() && session.user().is_some())
}

// =============================================================================
// Defaults
// =============================================================================

#[test]
fn default_is_bootstrapping() {
    let session = Session::default();
    assert!(session.is_loading());
    assert!(!session.is_authenticated());
    assert!(session.user().is_none());
    assert!(session.token().is_none());
}

// =============================================================================
// Transitions
// =============================================================================

#[test]
fn set_loading_only_touches_flag() {
    let session = signed_in().reduce(SessionEvent::SetLoading(true));
    assert!(session.is_loading());
    assert!(session.is_authenticated());
    assert_eq!(session.token(), Some("tok"));
}

#[test]
fn login_success_authenticates_and_stops_loading() {
    let session = signed_in();
    assert!(session.is_authenticated());
    assert!(!session.is_loading());
    assert_eq!(session.user().and_then(UserProfile::full_name), Some("Ada"));
    assert!(invariant_holds(&session));
}

#[test]
fn logout_clears_everything() {
    let session = signed_in().reduce(SessionEvent::Logout);
    assert!(!session.is_authenticated());
    assert!(!session.is_loading());
    assert!(session.user().is_none());
    assert!(session.token().is_none());
}

#[test]
fn logout_while_bootstrapping_stops_loading() {
    let session = Session::new().reduce(SessionEvent::Logout);
    assert!(!session.is_loading());
}

#[test]
fn update_user_keeps_other_fields() {
    let session = signed_in().reduce(SessionEvent::UpdateUser(UserPatch::new().set("is_profile_complete", true)));
    let user = session.user().unwrap();
    assert!(user.is_profile_complete());
    assert_eq!(user.full_name(), Some("Ada"));
    assert_eq!(user.currency(), Some("INR"));
    assert_eq!(user.id(), Some(1));
    assert_eq!(session.token(), Some("tok"));
}

#[test]
fn update_user_without_user_is_ignored() {
    let before = Session::new().reduce(SessionEvent::SetLoading(false));
    let after = before
        .clone()
        .reduce(SessionEvent::UpdateUser(UserPatch::new().set("full_name", "Eve")));
    assert_eq!(before, after);
    assert!(invariant_holds(&after));
}

#[test]
fn apply_matches_reduce() {
    let mut session = Session::new();
    session.apply(SessionEvent::SetLoading(false));
    assert_eq!(session, Session::new().reduce(SessionEvent::SetLoading(false)));
}

#[test]
fn invariant_holds_across_sequences() {
    let events = vec![
        SessionEvent::SetLoading(true),
        SessionEvent::SetLoading(false),
        SessionEvent::LoginSuccess { user: user(json!({})), token: "t".into() },
        SessionEvent::UpdateUser(UserPatch::new().set("x", 1)),
        SessionEvent::Logout,
        SessionEvent::UpdateUser(UserPatch::new().set("x", 2)),
    ];
    let mut session = Session::new();
    for event in events {
        session.apply(event);
        assert!(invariant_holds(&session));
    }
}
