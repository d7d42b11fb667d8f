//! Session gate. The credential itself is issued and refreshed elsewhere;
//! the console only checks that the cookie is there.

use crate::config::AppConfig;

pub fn has_session_cookie(cookie_header: &str, name: &str) -> bool {
    cookie_header
        .split(';')
        .filter_map(|pair| pair.split_once('='))
        .any(|(key, value)| key.trim() == name && !value.trim().is_empty())
}

#[cfg(target_arch = "wasm32")]
pub fn is_authenticated(config: &AppConfig) -> bool {
    use wasm_bindgen::JsCast;

    let cookies = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.dyn_into::<web_sys::HtmlDocument>().ok())
        .and_then(|document| document.cookie().ok())
        .unwrap_or_default();
    has_session_cookie(&cookies, &config.session_cookie) || config.auth_token.is_some()
}

/// Off the browser a configured token stands in for the cookie.
#[cfg(not(target_arch = "wasm32"))]
pub fn is_authenticated(config: &AppConfig) -> bool {
    config.auth_token.is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_named_cookie_among_others() {
        let header = "theme=dark; access_token=abc.def; lang=uz";
        assert!(has_session_cookie(header, "access_token"));
        assert!(!has_session_cookie(header, "refresh_token"));
    }

    #[test]
    fn empty_value_is_not_a_session() {
        assert!(!has_session_cookie("access_token=; theme=dark", "access_token"));
        assert!(!has_session_cookie("", "access_token"));
    }

    #[test]
    #[cfg(not(target_arch = "wasm32"))]
    fn native_gate_uses_configured_token() {
        let mut config = AppConfig::default();
        assert!(!is_authenticated(&config));
        config.auth_token = Some("token".into());
        assert!(is_authenticated(&config));
    }
}
