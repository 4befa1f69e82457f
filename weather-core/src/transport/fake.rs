//! Scripted transport for exercising the orchestrator without a network.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::{collections::VecDeque, sync::Mutex};
use tokio_util::sync::CancellationToken;

use super::{HttpRequest, Transport, decode};
use crate::error::{Error, Result, TransportError};

#[derive(Debug)]
pub(crate) enum Reply {
    Body(String),
    Status(StatusCode),
}

impl Reply {
    pub(crate) fn body(body: impl Into<String>) -> Self {
        Reply::Body(body.into())
    }
}

#[derive(Debug, Default)]
pub(crate) struct FakeTransport {
    replies: Mutex<VecDeque<Reply>>,
    seen: Mutex<Vec<String>>,
    cancel_after_first: Option<CancellationToken>,
}

impl FakeTransport {
    pub(crate) fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self { replies: Mutex::new(replies.into_iter().collect()), ..Self::default() }
    }

    /// Cancels `token` once the first call has been answered.
    pub(crate) fn cancelling_after_first(mut self, token: CancellationToken) -> Self {
        self.cancel_after_first = Some(token);
        self
    }

    pub(crate) fn urls(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send<T>(&self, request: HttpRequest, cancel: &CancellationToken) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        if cancel.is_cancelled() {
            return Err(TransportError::Cancelled.into());
        }

        self.seen.lock().unwrap().push(request.url);
        let reply = self.replies.lock().unwrap().pop_front().expect("unexpected extra request");

        if let Some(token) = &self.cancel_after_first {
            token.cancel();
        }

        match reply {
            Reply::Body(body) => Ok(decode(&body)?),
            Reply::Status(status) => Err(Error::request_failed(status)),
        }
    }
}
