//! HTTP downloads
//!
//! Downloads are quiet (no progress output of their own) and never consult any ambient
//! request configuration. A non-200 status is handed back to the caller untouched; only
//! transport failures are retried, once.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ProvisionError, Result};

pub const HTTP_OK: u16 = 200;

/// Attempts per request: the first call plus one retry
const MAX_ATTEMPTS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl HttpResponse {
    /// Fail with the status and body unless the server answered 200
    pub fn ensure_ok(self, url: &str) -> Result<Self> {
        if self.status != HTTP_OK {
            return Err(ProvisionError::DownloadFailed {
                url: url.to_string(),
                status: self.status,
                status_text: self.status_text,
                body: self.body,
            });
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadResponse {
    pub status: u16,
    pub status_text: String,
    /// Response body for non-200 answers; empty when the payload was saved
    pub body: String,
    /// Where the payload was saved, for 200 answers
    pub payload: Option<PathBuf>,
}

impl DownloadResponse {
    /// Fail with the status and body unless the payload was saved
    pub fn ensure_ok(self, url: &str) -> Result<PathBuf> {
        match self.payload {
            Some(payload) if self.status == HTTP_OK => Ok(payload),
            _ => Err(ProvisionError::DownloadFailed {
                url: url.to_string(),
                status: self.status,
                status_text: self.status_text,
                body: self.body,
            }),
        }
    }
}

pub trait Downloader {
    /// Fetch `url` as text
    fn get(&self, url: &str) -> Result<HttpResponse>;

    /// Save the body of `url` to `dest`
    fn download(&self, url: &str, dest: &Path) -> Result<DownloadResponse>;
}

pub struct UreqDownloader {
    agent: ureq::Agent,
}

impl UreqDownloader {
    /// Every request, body included, must finish within `timeout`
    pub fn new(timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();
        Self {
            agent: config.into(),
        }
    }

    fn with_retry<T>(
        url: &str,
        mut attempt: impl FnMut() -> std::result::Result<T, String>,
    ) -> Result<T> {
        let mut last_failure = String::new();
        for number in 1..=MAX_ATTEMPTS {
            match attempt() {
                Ok(value) => return Ok(value),
                Err(reason) => {
                    tracing::debug!("attempt {number} of {MAX_ATTEMPTS} for {url} failed: {reason}");
                    last_failure = reason;
                }
            }
        }
        Err(ProvisionError::Transport {
            url: url.to_string(),
            reason: last_failure,
        })
    }

    fn fetch(&self, url: &str) -> std::result::Result<ureq::http::Response<ureq::Body>, String> {
        self.agent.get(url).call().map_err(|e| e.to_string())
    }
}

fn status_parts(response: &ureq::http::Response<ureq::Body>) -> (u16, String) {
    let status = response.status();
    (
        status.as_u16(),
        status.canonical_reason().unwrap_or_default().to_string(),
    )
}

fn read_body(response: ureq::http::Response<ureq::Body>) -> std::result::Result<String, String> {
    let mut body = String::new();
    response
        .into_body()
        .into_reader()
        .read_to_string(&mut body)
        .map_err(|e| e.to_string())?;
    Ok(body)
}

impl Downloader for UreqDownloader {
    fn get(&self, url: &str) -> Result<HttpResponse> {
        Self::with_retry(url, || {
            let response = self.fetch(url)?;
            let (status, status_text) = status_parts(&response);
            Ok(HttpResponse {
                status,
                status_text,
                body: read_body(response)?,
            })
        })
    }

    fn download(&self, url: &str, dest: &Path) -> Result<DownloadResponse> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| ProvisionError::file_write(parent, &e))?;
        }

        Self::with_retry(url, || {
            let response = self.fetch(url)?;
            let (status, status_text) = status_parts(&response);
            if status != HTTP_OK {
                return Ok(DownloadResponse {
                    status,
                    status_text,
                    body: read_body(response)?,
                    payload: None,
                });
            }

            let mut file = File::create(dest)
                .map_err(|e| format!("cannot create {}: {e}", dest.display()))?;
            io::copy(&mut response.into_body().into_reader(), &mut file)
                .map_err(|e| e.to_string())?;

            Ok(DownloadResponse {
                status,
                status_text,
                body: String::new(),
                payload: Some(dest.to_path_buf()),
            })
        })
    }
}
