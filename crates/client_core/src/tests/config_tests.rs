use std::collections::HashMap;

use super::{settings_from_sources, ClientSettings};

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}

#[test]
fn defaults_apply_without_file_or_env() {
    let settings = settings_from_sources(None, env_from(&[])).expect("settings");
    assert_eq!(settings.request_timeout_secs, 30);
    assert!(!settings.api_url.ends_with('/'));
}

#[test]
fn file_values_override_defaults() {
    let raw = r#"
api_url = "https://api.example.org/"
request_timeout_secs = 5
"#;
    let settings = settings_from_sources(Some(raw), env_from(&[])).expect("settings");
    assert_eq!(settings.api_url, "https://api.example.org");
    assert_eq!(settings.request_timeout_secs, 5);
}

#[test]
fn prefixed_env_wins_over_plain_env_and_file() {
    let raw = r#"api_url = "https://file.example.org""#;
    let settings = settings_from_sources(
        Some(raw),
        env_from(&[
            ("API_URL", "https://plain.example.org"),
            ("APP__API_URL", "https://prefixed.example.org"),
        ]),
    )
    .expect("settings");
    assert_eq!(settings.api_url, "https://prefixed.example.org");
}

#[test]
fn unparsable_timeout_env_is_ignored() {
    let settings = settings_from_sources(None, env_from(&[("APP__REQUEST_TIMEOUT_SECS", "soon")]))
        .expect("settings");
    assert_eq!(settings.request_timeout_secs, 30);
}

#[test]
fn rejects_non_http_api_urls() {
    let err = settings_from_sources(None, env_from(&[("API_URL", "ftp://files.example.org")]))
        .expect_err("must fail");
    assert!(err.to_string().contains("http"));

    assert!(settings_from_sources(None, env_from(&[("API_URL", "not a url")])).is_err());
}

#[test]
fn with_api_url_normalizes_override() {
    let settings = ClientSettings::default()
        .with_api_url("http://localhost:8080/")
        .expect("override");
    assert_eq!(settings.api_url, "http://localhost:8080");
}

#[test]
fn timeout_never_drops_to_zero() {
    let settings = ClientSettings {
        request_timeout_secs: 0,
        ..ClientSettings::default()
    };
    assert_eq!(settings.request_timeout().as_secs(), 1);
}
