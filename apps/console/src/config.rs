use std::time::Duration;

use serde::{Deserialize, Serialize};

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/v1";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;
const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;
const DEFAULT_PAGE_SIZE: u32 = 20;
const DEFAULT_SESSION_COOKIE: &str = "access_token";

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum AppProfile {
    Dev,
    Prod,
}

impl AppProfile {
    pub fn from_env(value: Option<String>) -> Self {
        match value.as_deref() {
            Some("prod") | Some("production") => Self::Prod,
            _ => Self::Dev,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_base_url: String,
    pub auth_token: Option<String>,
    pub profile: AppProfile,
    pub request_timeout: Duration,
    pub search_debounce: Duration,
    pub page_size: u32,
    pub session_cookie: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            auth_token: None,
            profile: AppProfile::Dev,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            search_debounce: Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
            page_size: DEFAULT_PAGE_SIZE,
            session_cookie: DEFAULT_SESSION_COOKIE.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        crate::config::load_dotenv();

        Self::from_lookup(read_env)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("WASHDESK_API_BASE_URL") {
            config.api_base_url = url;
        }

        if let Some(token) = lookup("WASHDESK_AUTH_TOKEN") {
            config.auth_token = Some(token);
        }

        config.profile = AppProfile::from_env(lookup("WASHDESK_PROFILE"));

        if let Some(secs) =
            lookup("WASHDESK_REQUEST_TIMEOUT_SECS").and_then(|value| value.parse::<u64>().ok())
        {
            config.request_timeout = Duration::from_secs(secs.max(1));
        }

        if let Some(ms) =
            lookup("WASHDESK_SEARCH_DEBOUNCE_MS").and_then(|value| value.parse::<u64>().ok())
        {
            config.search_debounce = Duration::from_millis(ms.max(50));
        }

        if let Some(size) = lookup("WASHDESK_PAGE_SIZE").and_then(|value| value.parse::<u32>().ok())
        {
            config.page_size = size.max(1);
        }

        if let Some(cookie) = lookup("WASHDESK_SESSION_COOKIE") {
            config.session_cookie = cookie;
        }

        config
    }

    pub fn bearer_token(&self) -> Option<String> {
        self.auth_token
            .as_ref()
            .map(|token| format!("Bearer {}", token.trim()))
    }

    pub fn search_debounce_ms(&self) -> u64 {
        self.search_debounce.as_millis() as u64
    }
}

fn read_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .or_else(|| option_env_from_build(key).map(|s| s.to_string()))
        .filter(|value| !value.trim().is_empty())
}

fn option_env_from_build(key: &str) -> Option<&'static str> {
    match key {
        "WASHDESK_API_BASE_URL" => option_env!("WASHDESK_API_BASE_URL"),
        "WASHDESK_AUTH_TOKEN" => option_env!("WASHDESK_AUTH_TOKEN"),
        "WASHDESK_PROFILE" => option_env!("WASHDESK_PROFILE"),
        "WASHDESK_REQUEST_TIMEOUT_SECS" => option_env!("WASHDESK_REQUEST_TIMEOUT_SECS"),
        "WASHDESK_SEARCH_DEBOUNCE_MS" => option_env!("WASHDESK_SEARCH_DEBOUNCE_MS"),
        "WASHDESK_PAGE_SIZE" => option_env!("WASHDESK_PAGE_SIZE"),
        "WASHDESK_SESSION_COOKIE" => option_env!("WASHDESK_SESSION_COOKIE"),
        _ => None,
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn load_dotenv() {
    if let Err(err) = dotenvy::dotenv() {
        if !matches!(err, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            tracing::warn!("failed to load .env: {err}");
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[inline]
pub fn load_dotenv() {}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_without_variables() {
        let config = config_from(&[]);
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.search_debounce_ms(), 300);
        assert_eq!(config.page_size, 20);
        assert_eq!(config.session_cookie, "access_token");
        assert_eq!(config.profile, AppProfile::Dev);
        assert_eq!(config.bearer_token(), None);
    }

    #[test]
    fn overrides_are_clamped() {
        let config = config_from(&[
            ("WASHDESK_SEARCH_DEBOUNCE_MS", "10"),
            ("WASHDESK_PAGE_SIZE", "0"),
            ("WASHDESK_REQUEST_TIMEOUT_SECS", "0"),
            ("WASHDESK_PROFILE", "production"),
            ("WASHDESK_AUTH_TOKEN", " abc "),
        ]);
        assert_eq!(config.search_debounce_ms(), 50);
        assert_eq!(config.page_size, 1);
        assert_eq!(config.request_timeout, Duration::from_secs(1));
        assert_eq!(config.profile, AppProfile::Prod);
        assert_eq!(config.bearer_token().as_deref(), Some("Bearer abc"));
    }

    #[test]
    fn unparsable_numbers_keep_defaults() {
        let config = config_from(&[("WASHDESK_PAGE_SIZE", "many")]);
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    }
}
