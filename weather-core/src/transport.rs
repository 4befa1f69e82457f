use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use tokio_util::sync::CancellationToken;

use crate::error::{Result, TransportError};

pub mod http;

#[cfg(test)]
pub(crate) mod fake;

pub use http::HttpTransport;

/// A single HTTP call. The query string is already embedded in `url`.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: Method,
    /// Serialized as JSON; ignored for GET and DELETE.
    pub body: Option<serde_json::Value>,
    /// Sent as `Authorization: Bearer <token>`.
    pub token: Option<String>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self { url: url.into(), method: Method::GET, body: None, token: None }
    }

    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self { method, ..Self::get(url) }
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Whether the body should be attached for this method.
    pub fn carries_body(&self) -> bool {
        self.body.is_some() && self.method != Method::GET && self.method != Method::DELETE
    }
}

/// Generic request/response executor.
///
/// Success responses are decoded into `T`; an empty body or a JSON `null`
/// yields `Ok(None)` and is left for the caller to interpret. Non-success
/// statuses become [`crate::Error::RequestFailed`], anything else
/// [`crate::Error::Transport`].
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    async fn send<T>(&self, request: HttpRequest, cancel: &CancellationToken) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send + 'static;
}

pub(crate) fn decode<T: DeserializeOwned>(body: &str) -> Result<Option<T>, TransportError> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    Ok(serde_json::from_str::<Option<T>>(body)?)
}

/// Masks the `appid` query value so URLs can be logged.
pub(crate) fn redact(url: &str) -> String {
    let Some(start) = url.find("appid=").map(|i| i + "appid=".len()) else {
        return url.to_string();
    };
    let end = url[start..].find('&').map_or(url.len(), |i| start + i);
    format!("{}***{}", &url[..start], &url[end..])
}
