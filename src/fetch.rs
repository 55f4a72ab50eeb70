//! GET-and-parse wrapper shared by the backend and TMDB clients.
//!
//! Every failure is logged here before it reaches the caller, so callers that
//! swallow errors (image lookups) still leave a trace.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::error;

pub const DEFAULT_LABEL: &str = "Falha ao buscar dados.";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{label} Status: {}", status.as_u16())]
    Status {
        label: String,
        url: String,
        status: StatusCode,
    },
    #[error("{label} ({url}): {source}")]
    Transport {
        label: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{label} Invalid JSON from {url}: {source}")]
    Decode {
        label: String,
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            FetchError::Transport { source, .. } => source.status(),
            FetchError::Decode { .. } => None,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            FetchError::Status { label, .. }
            | FetchError::Transport { label, .. }
            | FetchError::Decode { label, .. } => label,
        }
    }

    /// The label, plus the status code for HTTP errors. URLs and transport
    /// details are left to the log line written by [`fetch_json`].
    pub fn public_message(&self) -> String {
        match self.status() {
            Some(status) => format!("{} Status: {}", self.label(), status.as_u16()),
            None => self.label().to_string(),
        }
    }
}

/// Text to put on a page for a failed call.
pub fn page_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<FetchError>() {
        Some(fetch) => fetch.public_message(),
        None => err.to_string(),
    }
}

pub fn build_client() -> anyhow::Result<Client> {
    use anyhow::Context;

    let user_agent = format!("cinereview/{}", env!("CARGO_PKG_VERSION"));
    Client::builder()
        .connect_timeout(Duration::from_secs(5))
        .user_agent(user_agent)
        .build()
        .context("Failed to build HTTP client")
}

/// GETs `url` and parses the body as `T`, tagging failures with `label`
/// (or [`DEFAULT_LABEL`]).
pub async fn fetch_json<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    label: Option<&str>,
) -> Result<T, FetchError> {
    let label = label.unwrap_or(DEFAULT_LABEL);
    let result = fetch_inner(client, url, label).await;
    if let Err(e) = &result {
        error!(url = %url, "Request failed: {}", e);
    }
    result
}

async fn fetch_inner<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    label: &str,
) -> Result<T, FetchError> {
    let transport = |source| FetchError::Transport {
        label: label.to_string(),
        url: url.to_string(),
        source,
    };

    let res = client.get(url).send().await.map_err(transport)?;
    let status = res.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            label: label.to_string(),
            url: url.to_string(),
            status,
        });
    }
    let bytes = res.bytes().await.map_err(transport)?;
    serde_json::from_slice(&bytes).map_err(|source| FetchError::Decode {
        label: label.to_string(),
        url: url.to_string(),
        source,
    })
}
