//! libcurl plumbing shared by the API locators and the artifact fetcher.
//!
//! Handles never follow redirects on their own; the fetcher decides what to do
//! with a `Location`. Every transfer runs inside `spawn_blocking` and is awaited
//! straight away, so stages stay sequential.

mod headers;

pub use headers::ResponseHeaders;

use std::time::Duration;

use curl::easy::{Easy, List};
use serde::de::DeserializeOwned;

use crate::config::PinfetchConfig;
use crate::error::FetchError;
use crate::token::AccessToken;

pub const ACCEPT_GITHUB_JSON: &str = "application/vnd.github+json";

/// Longest error body kept for diagnostics.
pub(crate) const BODY_EXCERPT_LIMIT: usize = 1024;

/// Options applied to every handle.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub user_agent: String,
    pub accept: String,
    /// None = libcurl default (no overall limit on connect beyond its own).
    pub connect_timeout: Option<Duration>,
    /// None = no limit.
    pub timeout: Option<Duration>,
}

impl ClientOptions {
    pub fn from_config(cfg: &PinfetchConfig) -> Self {
        Self {
            user_agent: cfg.user_agent.clone(),
            accept: ACCEPT_GITHUB_JSON.to_string(),
            connect_timeout: cfg.connect_timeout(),
            timeout: cfg.timeout(),
        }
    }
}

/// Buffered response (API calls are small).
#[derive(Debug, Clone)]
pub struct Response {
    pub url: String,
    pub headers: ResponseHeaders,
    pub body: Vec<u8>,
}

impl Response {
    pub fn status(&self) -> u32 {
        self.headers.status.unwrap_or(0)
    }

    /// Ok(self) on 2xx, otherwise the matching HTTP error.
    pub fn error_for_status(self) -> Result<Self, FetchError> {
        if self.headers.is_success() {
            Ok(self)
        } else {
            Err(FetchError::from_status(
                &self.url,
                self.status(),
                body_excerpt(&self.body),
            ))
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        serde_json::from_slice(&self.body).map_err(|source| FetchError::Decode {
            url: self.url.clone(),
            source,
        })
    }
}

#[derive(Debug, Clone)]
pub struct HttpClient {
    options: ClientOptions,
}

impl HttpClient {
    pub fn new(options: ClientOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Configured GET handle; bearer auth only when `auth` is given.
    pub(crate) fn easy(&self, url: &str, auth: Option<&AccessToken>) -> Result<Easy, FetchError> {
        let transport = |source| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let mut easy = Easy::new();
        easy.url(url).map_err(transport)?;
        easy.get(true).map_err(transport)?;
        easy.follow_location(false).map_err(transport)?;
        easy.useragent(&self.options.user_agent).map_err(transport)?;
        if let Some(t) = self.options.connect_timeout {
            easy.connect_timeout(t).map_err(transport)?;
        }
        if let Some(t) = self.options.timeout {
            easy.timeout(t).map_err(transport)?;
        }

        let mut list = List::new();
        list.append(&format!("Accept: {}", self.options.accept))
            .map_err(transport)?;
        if let Some(token) = auth {
            list.append(&token.header()).map_err(transport)?;
        }
        easy.http_headers(list).map_err(transport)?;
        Ok(easy)
    }

    /// GET `url` and buffer the whole body. Status is not checked here.
    pub async fn get(&self, url: &str, auth: Option<&AccessToken>) -> Result<Response, FetchError> {
        let mut easy = self.easy(url, auth)?;
        let url = url.to_string();
        tokio::task::spawn_blocking(move || perform_buffered(&mut easy, url))
            .await
            .map_err(FetchError::task)?
    }

    /// GET `url`, require 2xx and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        auth: Option<&AccessToken>,
    ) -> Result<T, FetchError> {
        self.get(url, auth).await?.error_for_status()?.json()
    }
}

fn perform_buffered(easy: &mut Easy, url: String) -> Result<Response, FetchError> {
    let transport = |source| FetchError::Transport {
        url: url.clone(),
        source,
    };
    let mut headers = ResponseHeaders::default();
    let mut body = Vec::new();
    {
        let mut transfer = easy.transfer();
        transfer
            .header_function(|line| {
                headers.push_line(line);
                true
            })
            .map_err(transport)?;
        transfer
            .write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })
            .map_err(transport)?;
        transfer.perform().map_err(transport)?;
    }
    if headers.status.is_none() {
        headers.status = easy.response_code().ok();
    }
    tracing::debug!(%url, status = ?headers.status, bytes = body.len(), "GET complete");
    Ok(Response { url, headers, body })
}

/// Lossy text of at most the first [`BODY_EXCERPT_LIMIT`] bytes.
pub fn body_excerpt(body: &[u8]) -> String {
    let end = body.len().min(BODY_EXCERPT_LIMIT);
    String::from_utf8_lossy(&body[..end]).trim().to_string()
}
