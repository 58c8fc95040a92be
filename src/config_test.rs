use super::*;
use std::collections::HashMap;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn from_lookup_defaults() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(cfg.api_url, DEFAULT_API_URL);
    assert_eq!(cfg.timeouts, Timeouts::default());
}

#[test]
fn default_data_dir_is_absolute() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
    assert!(cfg.data_dir.is_absolute(), "{}", cfg.data_dir.display());
    assert!(cfg.data_dir.ends_with(DATA_DIR_NAME));
}

#[test]
fn default_data_dir_ignores_home_variable() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[("HOME", "relative/home")])).unwrap();
    assert!(cfg.data_dir.is_absolute());
}

#[test]
fn blank_data_dir_falls_back_to_default() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[("EXPENSE_DATA_DIR", "  ")])).unwrap();
    assert!(cfg.data_dir.ends_with(DATA_DIR_NAME));
}

#[test]
fn from_lookup_parses_overrides() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[
        ("EXPENSE_API_URL", "https://expenses.example.test/"),
        ("EXPENSE_DATA_DIR", "/var/lib/expense"),
        ("EXPENSE_REQUEST_TIMEOUT_SECS", "42"),
        ("EXPENSE_CONNECT_TIMEOUT_SECS", "7"),
    ]))
    .unwrap();
    assert_eq!(cfg.api_url, "https://expenses.example.test");
    assert_eq!(cfg.data_dir, PathBuf::from("/var/lib/expense"));
    assert_eq!(cfg.timeouts, Timeouts { request_secs: 42, connect_secs: 7 });
}

#[test]
fn from_lookup_bad_timeouts_fall_back() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[
        ("EXPENSE_REQUEST_TIMEOUT_SECS", "soon"),
        ("EXPENSE_CONNECT_TIMEOUT_SECS", "0"),
    ]))
    .unwrap();
    assert_eq!(cfg.timeouts, Timeouts::default());
}

#[test]
fn from_lookup_rejects_non_http_url() {
    let err = ClientConfig::from_lookup(lookup_from(&[("EXPENSE_API_URL", "ftp://x")])).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidApiUrl(_)));
}

#[test]
fn normalize_api_url_strips_trailing_slashes() {
    assert_eq!(normalize_api_url(" http://localhost:8001// ").unwrap(), "http://localhost:8001");
}

#[test]
fn normalize_api_url_requires_host() {
    assert!(normalize_api_url("http://").is_err());
    assert!(normalize_api_url("localhost:8001").is_err());
}

#[test]
fn layered_lookup_override_wins_over_bad_env_url() {
    let overrides = [("EXPENSE_API_URL", "http://127.0.0.1:9000/".to_owned())];
    let env = lookup_from(&[("EXPENSE_API_URL", "not a url"), ("EXPENSE_REQUEST_TIMEOUT_SECS", "5")]);
    let cfg = ClientConfig::from_lookup(layered_lookup(&overrides, env)).unwrap();
    assert_eq!(cfg.api_url, "http://127.0.0.1:9000");
    assert_eq!(cfg.timeouts.request_secs, 5);
}

#[test]
fn layered_lookup_falls_through_without_override() {
    let env = lookup_from(&[("EXPENSE_API_URL", "not a url")]);
    let err = ClientConfig::from_lookup(layered_lookup(&[], env)).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidApiUrl(_)));
}
