use std::sync::Arc;

use anyhow::Context;
use reqwest::{header, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::AppConfig;
use crate::query::ResourceQuery;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Clone)]
pub struct ConsoleClient {
    inner: reqwest::Client,
    config: Arc<AppConfig>,
    base_url: String,
}

impl ConsoleClient {
    pub fn new(config: AppConfig) -> ClientResult<Self> {
        let base_url = normalize_base_url(&config.api_base_url);

        #[allow(unused_mut)]
        let mut builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        {
            builder = builder.timeout(config.request_timeout);
        }
        let client = builder.build().context("failed to build reqwest client")?;

        Ok(Self {
            inner: client,
            config: Arc::new(config),
            base_url,
        })
    }

    /// GETs `query.endpoint` with the forwarded parameters as the query
    /// string. List endpoints decode into [`Page`](crate::models::Page).
    pub async fn get_json<T>(&self, query: &ResourceQuery) -> ClientResult<T>
    where
        T: DeserializeOwned,
    {
        let builder = self
            .request(Method::GET, &query.endpoint)
            .query(&query.params);
        self.send(builder).await
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = self.join_path(path);
        let mut builder = self
            .inner
            .request(method, url)
            .header(header::ACCEPT, "application/json");

        if let Some(token) = self.config.bearer_token() {
            builder = builder.header(header::AUTHORIZATION, token);
        }

        builder
    }

    fn join_path(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send<T>(&self, builder: reqwest::RequestBuilder) -> ClientResult<T>
    where
        T: DeserializeOwned,
    {
        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let body = serde_json::from_slice::<ApiErrorBody>(&bytes).ok();
            return Err(ClientError::Status { status, body });
        }

        if bytes.is_empty() {
            return Err(ClientError::EmptyResponse(status));
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}

fn normalize_base_url(input: &str) -> String {
    input.trim_end_matches('/').to_string()
}

/// Error payload of the data API, e.g. `{"detail": "Not found."}`.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, Value>,
}

impl ApiErrorBody {
    pub fn message(&self) -> Option<String> {
        if let Some(detail) = self.detail.as_ref() {
            return Some(detail.clone());
        }
        self.fields.iter().next().map(|(field, value)| {
            let text = match value {
                Value::Array(items) => items
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(" "),
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            format!("{field}: {text}")
        })
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("request failed with {status}")]
    Status {
        status: StatusCode,
        body: Option<ApiErrorBody>,
    },
    #[error("empty response body: {0}")]
    EmptyResponse(StatusCode),
    #[error("client setup failed: {0}")]
    Setup(#[from] anyhow::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::EmptyResponse(status) => Some(*status),
            _ => None,
        }
    }

    /// Text suitable for an inline panel error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { status, body } => body
                .as_ref()
                .and_then(ApiErrorBody::message)
                .unwrap_or_else(|| http_status_advice(*status).to_string()),
            Self::Transport(_) => "The server could not be reached. Check the connection and retry.".to_string(),
            other => other.to_string(),
        }
    }
}

fn http_status_advice(status: StatusCode) -> &'static str {
    match status.as_u16() {
        401 => "Session expired, sign in again.",
        403 => "You do not have access to this data.",
        404 => "Nothing found at this address.",
        429 => "Too many requests, retry in a moment.",
        500..=599 => "The server failed to answer, retry later.",
        _ => "Request failed.",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn base_url_and_paths_join_with_single_slash() {
        let client = ConsoleClient::new(AppConfig {
            api_base_url: "http://api.local/v1/".into(),
            ..AppConfig::default()
        })
        .unwrap();
        assert_eq!(client.join_path("/orders/"), "http://api.local/v1/orders/");
        assert_eq!(client.join_path("orders/stats/"), "http://api.local/v1/orders/stats/");
    }

    #[test]
    fn error_body_prefers_detail_then_first_field() {
        let detail: ApiErrorBody = serde_json::from_value(json!({ "detail": "Not found." })).unwrap();
        assert_eq!(detail.message().as_deref(), Some("Not found."));

        let field: ApiErrorBody =
            serde_json::from_value(json!({ "amount": ["Must be positive."] })).unwrap();
        assert_eq!(field.message().as_deref(), Some("amount: Must be positive."));
    }

    #[test]
    fn status_errors_fall_back_to_advice() {
        let err = ClientError::Status {
            status: StatusCode::UNAUTHORIZED,
            body: None,
        };
        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
        assert_eq!(err.user_message(), "Session expired, sign in again.");
    }
}
