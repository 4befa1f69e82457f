use async_trait::async_trait;
use reqwest::{Client, header};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use super::{HttpRequest, Transport, decode, redact};
use crate::error::{Error, Result, TransportError};

/// [`Transport`] backed by a pooled `reqwest` client. Cheap to clone and safe
/// to share between concurrent requests.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    /// Builds a client whose timeout covers the whole call.
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build().map_err(TransportError::from)?;
        Ok(Self { http })
    }

    async fn execute(&self, request: HttpRequest) -> Result<(reqwest::StatusCode, String)> {
        let mut builder = self.http.request(request.method.clone(), &request.url);

        if let Some(body) = request.body.as_ref().filter(|_| request.carries_body()) {
            let json = serde_json::to_string(body).map_err(TransportError::from)?;
            tracing::debug!(body = %json, "request body");
            builder = builder.header(header::CONTENT_TYPE, "application/json").body(json);
        }

        if let Some(token) = request.token.as_deref().filter(|t| !t.is_empty()) {
            builder = builder.bearer_auth(token);
        }

        let res = builder.send().await.map_err(TransportError::from)?;
        let status = res.status();
        tracing::info!(
            status = status.as_u16(),
            reason = status.canonical_reason().unwrap_or_default(),
            "received HTTP response"
        );

        let body = res.text().await.map_err(TransportError::from)?;
        tracing::debug!(%body, "response body");

        Ok((status, body))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send<T>(&self, request: HttpRequest, cancel: &CancellationToken) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let url = redact(&request.url);
        if cancel.is_cancelled() {
            return Err(TransportError::Cancelled.into());
        }

        tracing::info!(method = %request.method, %url, "sending HTTP request");

        let outcome = tokio::select! {
            res = self.execute(request) => res,
            _ = cancel.cancelled() => Err(TransportError::Cancelled.into()),
        };

        let result = outcome.and_then(|(status, body)| {
            if !status.is_success() {
                return Err(Error::request_failed(status));
            }
            decode::<T>(&body).map_err(Error::from)
        });

        if let Err(err) = &result {
            tracing::error!(%url, error = %err, "HTTP request failed");
        }
        result
    }
}
