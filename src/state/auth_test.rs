use super::*;
use crate::net::types::{ProfileUpdate, TokenResponse};
use crate::storage::MemoryStorage;
use serde_json::json;
use std::sync::Mutex;

const GOOD_TOKEN: &str = "good-token";
const PASSWORD: &str = "secret1";

/// In-memory backend that behaves like `HttpApi` against the real server:
/// only `GOOD_TOKEN` may read the profile, and every 401 evicts storage.
struct FakeApi {
    storage: Arc<MemoryStorage>,
    profile_complete: bool,
    profile_down: bool,
    calls: Mutex<Vec<&'static str>>,
}

impl FakeApi {
    fn new(storage: Arc<MemoryStorage>) -> Self {
        Self { storage, profile_complete: false, profile_down: false, calls: Mutex::new(Vec::new()) }
    }

    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }

    fn issue(&self, credentials: &Credentials) -> Result<TokenResponse, ApiError> {
        if credentials.password == PASSWORD {
            Ok(TokenResponse { access_token: GOOD_TOKEN.into(), token_type: Some("bearer".into()) })
        } else {
            self.storage.remove_item(TOKEN_KEY)?;
            Err(ApiError::Unauthorized { detail: Some("Incorrect email or password".into()) })
        }
    }
}

#[async_trait::async_trait]
impl AuthApi for FakeApi {
    async fn signup(&self, credentials: &Credentials) -> Result<TokenResponse, ApiError> {
        self.record("signup");
        if credentials.email == "taken@example.com" {
            return Err(ApiError::Status { status: 400, detail: Some("Email already registered".into()) });
        }
        self.issue(credentials)
    }

    async fn login(&self, credentials: &Credentials) -> Result<TokenResponse, ApiError> {
        self.record("login");
        self.issue(credentials)
    }

    async fn fetch_profile(&self) -> Result<UserProfile, ApiError> {
        self.record("fetch_profile");
        if self.profile_down {
            return Err(ApiError::Status { status: 503, detail: None });
        }
        if self.storage.get_item(TOKEN_KEY)?.as_deref() != Some(GOOD_TOKEN) {
            self.storage.remove_item(TOKEN_KEY)?;
            return Err(ApiError::Unauthorized { detail: Some("Could not validate credentials".into()) });
        }
        Ok(serde_json::from_value(json!({
            "id": 1,
            "email": "a@example.com",
            "full_name": "Ada",
            "currency": "INR",
            "is_profile_complete": self.profile_complete
        }))
        .unwrap())
    }

    async fn update_profile(&self, _profile: &ProfileUpdate) -> Result<(), ApiError> {
        self.record("update_profile");
        Ok(())
    }
}

fn setup(stored: Option<&str>) -> (Arc<MemoryStorage>, FakeApi) {
    let storage = Arc::new(stored.map_or_else(MemoryStorage::new, MemoryStorage::with_token));
    let api = FakeApi::new(storage.clone());
    (storage, api)
}

fn stored_token(storage: &MemoryStorage) -> Option<String> {
    storage.get_item(TOKEN_KEY).unwrap()
}

// =============================================================================
// bootstrap
// =============================================================================

#[tokio::test]
async fn new_session_is_loading_until_bootstrap() {
    let (storage, api) = setup(None);
    let mut auth = AuthSession::new(api, storage);
    assert_eq!(auth.route(AuthScreen::Login), Route::Splash);

    auth.bootstrap().await;
    assert!(!auth.session().is_loading());
}

#[tokio::test]
async fn bootstrap_without_token_is_unauthenticated_without_network() {
    let (storage, api) = setup(None);
    let mut auth = AuthSession::new(api, storage);
    auth.bootstrap().await;

    assert!(!auth.session().is_authenticated());
    assert!(auth.api().calls().is_empty());
    assert_eq!(auth.route(AuthScreen::Login), Route::Auth(AuthScreen::Login));
}

#[tokio::test]
async fn bootstrap_blank_token_counts_as_missing() {
    let (storage, api) = setup(Some("  "));
    let mut auth = AuthSession::new(api, storage);
    auth.bootstrap().await;

    assert!(!auth.session().is_authenticated());
    assert!(auth.api().calls().is_empty());
}

#[tokio::test]
async fn bootstrap_valid_token_restores_session() {
    let (storage, api) = setup(Some(GOOD_TOKEN));
    let mut auth = AuthSession::new(api, storage.clone());
    auth.bootstrap().await;

    assert!(auth.session().is_authenticated());
    assert_eq!(auth.session().token(), Some(GOOD_TOKEN));
    assert_eq!(auth.session().user().and_then(UserProfile::email), Some("a@example.com"));
    assert_eq!(stored_token(&storage).as_deref(), Some(GOOD_TOKEN));
    assert_eq!(auth.route(AuthScreen::Login), Route::ProfileSetup);
}

#[tokio::test]
async fn bootstrap_expired_token_clears_storage() {
    let (storage, api) = setup(Some("expired"));
    let mut auth = AuthSession::new(api, storage.clone());
    auth.bootstrap().await;

    assert!(!auth.session().is_authenticated());
    assert!(!auth.session().is_loading());
    assert_eq!(stored_token(&storage), None);
}

#[tokio::test]
async fn bootstrap_backend_down_clears_storage() {
    let (storage, mut api) = setup(Some(GOOD_TOKEN));
    api.profile_down = true;
    let mut auth = AuthSession::new(api, storage.clone());
    auth.bootstrap().await;

    assert!(!auth.session().is_authenticated());
    assert_eq!(stored_token(&storage), None);
}

// =============================================================================
// login / signup
// =============================================================================

#[tokio::test]
async fn login_valid_credentials_authenticates() {
    let (storage, api) = setup(None);
    let mut auth = AuthSession::new(api, storage.clone());
    auth.bootstrap().await;

    auth.login("a@example.com", PASSWORD).await.unwrap();

    assert!(auth.session().is_authenticated());
    assert!(auth.session().user().is_some());
    assert_eq!(stored_token(&storage).as_deref(), Some(GOOD_TOKEN));
    assert_eq!(auth.api().calls(), vec!["login", "fetch_profile"]);
}

#[tokio::test]
async fn login_bad_password_returns_backend_detail() {
    let (storage, api) = setup(None);
    let mut auth = AuthSession::new(api, storage.clone());
    auth.bootstrap().await;

    let failure = auth.login("a@example.com", "wrong").await.unwrap_err();

    assert_eq!(failure.message, "Incorrect email or password");
    assert!(!auth.session().is_authenticated());
    assert_eq!(stored_token(&storage), None);
}

#[tokio::test]
async fn login_without_detail_uses_fallback_message() {
    let (storage, mut api) = setup(None);
    api.profile_down = true;
    let mut auth = AuthSession::new(api, storage.clone());
    auth.bootstrap().await;

    let failure = auth.login("a@example.com", PASSWORD).await.unwrap_err();

    assert_eq!(failure.to_string(), "Login failed");
    assert!(!auth.session().is_authenticated());
    assert_eq!(stored_token(&storage), None);
}

#[tokio::test]
async fn signup_authenticates_via_signup_endpoint() {
    let (storage, api) = setup(None);
    let mut auth = AuthSession::new(api, storage);
    auth.bootstrap().await;

    auth.signup("new@example.com", PASSWORD).await.unwrap();

    assert!(auth.session().is_authenticated());
    assert_eq!(auth.api().calls(), vec!["signup", "fetch_profile"]);
}

#[tokio::test]
async fn signup_conflict_returns_detail() {
    let (storage, api) = setup(None);
    let mut auth = AuthSession::new(api, storage);
    auth.bootstrap().await;

    let failure = auth.signup("taken@example.com", PASSWORD).await.unwrap_err();
    assert_eq!(failure.message, "Email already registered");
}

#[tokio::test]
async fn signup_backend_down_uses_signup_fallback() {
    let (storage, mut api) = setup(None);
    api.profile_down = true;
    let mut auth = AuthSession::new(api, storage);
    auth.bootstrap().await;

    let failure = auth.signup("new@example.com", PASSWORD).await.unwrap_err();
    assert_eq!(failure.message, "Signup failed");
}

#[tokio::test]
async fn failed_relogin_with_evicted_token_signs_out() {
    let (storage, api) = setup(Some(GOOD_TOKEN));
    let mut auth = AuthSession::new(api, storage.clone());
    auth.bootstrap().await;
    assert!(auth.session().is_authenticated());

    auth.login("a@example.com", "wrong").await.unwrap_err();

    assert_eq!(stored_token(&storage), None);
    assert!(!auth.session().is_authenticated());
    assert!(auth.session().user().is_none());
    assert_eq!(auth.route(AuthScreen::Login), Route::Auth(AuthScreen::Login));
}

#[tokio::test]
async fn failed_signup_keeping_token_keeps_session() {
    let (storage, api) = setup(Some(GOOD_TOKEN));
    let mut auth = AuthSession::new(api, storage.clone());
    auth.bootstrap().await;

    let failure = auth.signup("taken@example.com", PASSWORD).await.unwrap_err();

    assert_eq!(failure.message, "Email already registered");
    assert_eq!(stored_token(&storage).as_deref(), Some(GOOD_TOKEN));
    assert!(auth.session().is_authenticated());
    assert_eq!(auth.session().token(), Some(GOOD_TOKEN));
}

// =============================================================================
// logout / update_user
// =============================================================================

#[tokio::test]
async fn logout_clears_session_and_storage() {
    let (storage, api) = setup(Some(GOOD_TOKEN));
    let mut auth = AuthSession::new(api, storage.clone());
    auth.bootstrap().await;
    assert!(auth.session().is_authenticated());

    auth.logout().unwrap();

    assert!(!auth.session().is_authenticated());
    assert!(auth.session().user().is_none());
    assert_eq!(stored_token(&storage), None);
    assert_eq!(auth.route(AuthScreen::Login), Route::Auth(AuthScreen::Login));
}

#[tokio::test]
async fn update_user_marks_profile_complete_and_keeps_fields() {
    let (storage, api) = setup(Some(GOOD_TOKEN));
    let mut auth = AuthSession::new(api, storage);
    auth.bootstrap().await;
    assert_eq!(auth.route(AuthScreen::Login), Route::ProfileSetup);

    auth.update_user(UserPatch::new().set("is_profile_complete", true));

    let user = auth.session().user().unwrap();
    assert!(user.is_profile_complete());
    assert_eq!(user.full_name(), Some("Ada"));
    assert_eq!(user.currency(), Some("INR"));
    assert_eq!(auth.route(AuthScreen::Login), Route::Main);
}

#[tokio::test]
async fn complete_profile_routes_to_main_after_login() {
    let (storage, mut api) = setup(None);
    api.profile_complete = true;
    let mut auth = AuthSession::new(api, storage);
    auth.bootstrap().await;
    auth.login("a@example.com", PASSWORD).await.unwrap();

    assert_eq!(auth.route(AuthScreen::Login), Route::Main);
}
