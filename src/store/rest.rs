//! HTTP document store client.
//!
//! Endpoints have the form `<base>/<key>.json`; the root document lives at
//! `<base>/.json`. An optional auth token is sent as the `auth` query
//! parameter.

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::paths::StoreKey;
use crate::store::{present, TreeStore};
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;
use url::Url;

pub struct RestTreeStore {
    client: Client,
    base_url: Url,
    auth_token: Option<String>,
}

impl RestTreeStore {
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let parsed = Url::parse(&config.base_url)
            .map_err(|e| StoreError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(StoreError::InvalidUrl(format!(
                "{}: expected an http(s) base URL",
                config.base_url
            )));
        }

        // No timeout unless configured: a hung store call hangs the command.
        let client = Client::builder()
            .timeout(config.timeout_secs.map(Duration::from_secs))
            .build()
            .map_err(|source| StoreError::Transport {
                url: config.base_url.clone(),
                source,
            })?;

        Ok(Self {
            client,
            base_url: parsed,
            auth_token: config.auth_token.clone(),
        })
    }

    /// Endpoint URL for a store key. Each key segment is percent-encoded as
    /// one path segment, and `.json` is appended to the last one.
    pub fn endpoint(&self, key: &StoreKey) -> Result<Url, StoreError> {
        let mut url = self.base_url.clone();
        url.set_query(None);
        let mut segments: Vec<String> = key.segments().map(str::to_string).collect();
        match segments.last_mut() {
            Some(last) => last.push_str(".json"),
            None => segments.push(".json".to_string()),
        }
        url.path_segments_mut()
            .map_err(|_| StoreError::InvalidUrl(format!("{}: cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(&segments);
        if let Some(token) = &self.auth_token {
            url.query_pairs_mut().append_pair("auth", token);
        }
        Ok(url)
    }

    fn send(&self, request: RequestBuilder, url: &Url) -> Result<Response, StoreError> {
        let response = request.send().map_err(|source| StoreError::Transport {
            url: redact(url),
            source,
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Status {
                url: redact(url),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

impl TreeStore for RestTreeStore {
    fn fetch(&self, key: &StoreKey) -> Result<Option<Value>, StoreError> {
        let url = self.endpoint(key)?;
        tracing::debug!(key = %key, "GET store document");
        let response = self.send(self.client.get(url.clone()), &url)?;
        let body = response.text().map_err(|source| StoreError::Transport {
            url: redact(&url),
            source,
        })?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        let document: Value = serde_json::from_str(&body).map_err(|e| StoreError::Decode {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        Ok(present(document))
    }

    fn write(&self, key: &StoreKey, document: &Value) -> Result<(), StoreError> {
        let url = self.endpoint(key)?;
        tracing::debug!(key = %key, "PUT store document");
        self.send(self.client.put(url.clone()).json(document), &url)?;
        Ok(())
    }

    fn remove(&self, key: &StoreKey) -> Result<(), StoreError> {
        let url = self.endpoint(key)?;
        tracing::debug!(key = %key, "DELETE store document");
        self.send(self.client.delete(url.clone()), &url)?;
        Ok(())
    }
}

/// URL without its query string, so auth tokens never reach logs or messages.
fn redact(url: &Url) -> String {
    let mut clean = url.clone();
    clean.set_query(None);
    clean.to_string()
}
