//! Network side of the chat client.

use std::fmt::Debug;

use async_trait::async_trait;
use reqwest::header::HeaderName;
use tracing::warn;
use url::Url;

use super::message::{ChatRequest, ServerReply};
use crate::config::ChatConfig;
use crate::error::{Error, Result};

/// Delivers one chat message and returns the server's reply.
#[async_trait]
pub trait ChatTransport: Send + Sync + Debug {
    /// Send `request`, echoing `csrf_token` in the CSRF header when present.
    async fn send(&self, request: &ChatRequest, csrf_token: Option<&str>) -> Result<ServerReply>;
}

/// `POST`s JSON to the chat endpoint with reqwest.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    endpoint: Url,
    csrf_header: HeaderName,
    http: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport for `base_url` + `endpoint` with the default header name.
    pub fn new(base_url: impl AsRef<str>, endpoint: &str) -> Result<Self> {
        Self::with_client(base_url, endpoint, reqwest::Client::new())
    }

    /// Create a transport with a custom reqwest client.
    pub fn with_client(
        base_url: impl AsRef<str>,
        endpoint: &str,
        http: reqwest::Client,
    ) -> Result<Self> {
        let endpoint = Url::parse(base_url.as_ref())?.join(endpoint)?;
        Ok(Self {
            endpoint,
            csrf_header: HeaderName::from_static("x-csrftoken"),
            http,
        })
    }

    /// Build from configuration, applying the optional request timeout.
    pub fn from_config(config: &ChatConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let mut transport = Self::with_client(&config.base_url, &config.endpoint, builder.build()?)?;
        transport.csrf_header = HeaderName::try_from(config.csrf_header.as_str()).map_err(|e| {
            Error::Config(config::ConfigError::Message(format!(
                "invalid chat.csrf_header {:?}: {e}",
                config.csrf_header
            )))
        })?;
        Ok(transport)
    }

    /// Full URL requests are sent to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send(&self, request: &ChatRequest, csrf_token: Option<&str>) -> Result<ServerReply> {
        let mut builder = self.http.post(self.endpoint.clone()).json(request);
        if let Some(token) = csrf_token {
            builder = builder.header(self.csrf_header.clone(), token);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            // A well-formed reply body still renders.
            warn!(
                name: "chat.transport.status",
                status = status.as_u16(),
                "Chat endpoint answered with an error status"
            );
        }
        Ok(serde_json::from_str(&body)?)
    }
}
