//! Artifact download with credential-dropping redirect handling.
//!
//! The provider answers an artifact download with a 302 to a pre-signed
//! storage URL. That second request must go out without the bearer token:
//! storage endpoints reject requests that carry it.

mod progress;
mod sink;

pub use progress::DownloadProgress;

use std::cell::RefCell;
use std::path::Path;

use curl::easy::Easy;
use tokio::sync::mpsc::Sender;

use crate::error::FetchError;
use crate::http::HttpClient;
use crate::token::AccessToken;

use progress::ProgressReporter;
use sink::{DownloadSink, Hop};

/// The one redirect status that is followed.
pub const REDIRECT_STATUS: u32 = 302;

/// Redirects followed per download.
pub const MAX_REDIRECTS: u8 = 1;

/// Streams an artifact to disk.
#[derive(Debug, Clone)]
pub struct Fetcher {
    http: HttpClient,
    token: AccessToken,
    progress: Option<Sender<DownloadProgress>>,
}

impl Fetcher {
    pub fn new(http: HttpClient, token: AccessToken) -> Self {
        Self {
            http,
            token,
            progress: None,
        }
    }

    /// Send progress snapshots to `tx` (best effort).
    pub fn with_progress(mut self, tx: Sender<DownloadProgress>) -> Self {
        self.progress = Some(tx);
        self
    }

    /// Download `url` to `dest`, authenticated on the first request only.
    /// Returns the number of body bytes written.
    pub async fn download(&self, url: &str, dest: &Path) -> Result<u64, FetchError> {
        let mut url = url.to_string();
        let mut with_auth = true;
        let mut redirects_left = MAX_REDIRECTS;
        loop {
            tracing::info!(%url, dest = %dest.display(), with_auth, "downloading artifact");
            match self.fetch_once(&url, dest, with_auth).await? {
                Hop::Saved(bytes) => return Ok(bytes),
                Hop::Redirect(location) => {
                    if redirects_left == 0 {
                        return Err(FetchError::Http {
                            url,
                            status: REDIRECT_STATUS,
                            body_excerpt: format!("redirect limit reached (next: {location})"),
                        });
                    }
                    redirects_left -= 1;
                    let next = resolve_location(&url, &location)?;
                    tracing::info!(from = %url, to = %next, "following redirect without credentials");
                    url = next;
                    with_auth = false;
                }
            }
        }
    }

    async fn fetch_once(&self, url: &str, dest: &Path, with_auth: bool) -> Result<Hop, FetchError> {
        let auth = if with_auth { Some(&self.token) } else { None };
        let mut easy = self.http.easy(url, auth)?;
        let sink = DownloadSink::new(dest.to_path_buf(), ProgressReporter::new(self.progress.clone()));
        let url = url.to_string();
        tokio::task::spawn_blocking(move || perform_hop(&mut easy, url, sink))
            .await
            .map_err(FetchError::task)?
    }
}

fn perform_hop(easy: &mut Easy, url: String, sink: DownloadSink) -> Result<Hop, FetchError> {
    let transport = |source| FetchError::Transport {
        url: url.clone(),
        source,
    };
    let sink = RefCell::new(sink);
    let performed = {
        let mut transfer = easy.transfer();
        transfer
            .header_function(|line| {
                sink.borrow_mut().headers.push_line(line);
                true
            })
            .map_err(transport)?;
        transfer
            .write_function(|data| sink.borrow_mut().write(data))
            .map_err(transport)?;
        transfer.perform()
    };

    let mut sink = sink.into_inner();
    if let Err(source) = performed {
        if let Some(write_error) = sink.take_write_error() {
            return Err(write_error);
        }
        return Err(transport(source));
    }
    sink.finish(&url)
}

/// Resolve a `Location` value against the URL that returned it.
fn resolve_location(base: &str, location: &str) -> Result<String, FetchError> {
    let invalid = |reason: String| FetchError::InvalidUrl {
        url: location.to_string(),
        reason,
    };
    let base = url::Url::parse(base).map_err(|e| invalid(e.to_string()))?;
    let next = base.join(location).map_err(|e| invalid(e.to_string()))?;
    Ok(next.into())
}
