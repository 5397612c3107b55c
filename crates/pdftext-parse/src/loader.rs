//! Loading document bytes from locators.
//!
//! `http://` and `https://` locators are fetched with [`reqwest`];
//! `file://` URLs and anything that does not parse as a URL with a
//! multi-letter scheme are read from the filesystem. Windows drive paths
//! such as `C:\docs\a.pdf` parse as a one-letter scheme and are treated
//! as paths.

use std::path::PathBuf;
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use pdftext_core::{OpenOptions, PdfError};
use reqwest::{Client, Url};
use tracing::debug;

use crate::error::BackendError;
use crate::source::DocumentParams;

/// Where a locator points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LocatorKind {
    Remote(Url),
    Path(PathBuf),
}

/// Resolve a locator string to a remote URL or a local path.
pub(crate) fn resolve_locator(locator: &str) -> Result<LocatorKind, BackendError> {
    let url = match Url::parse(locator) {
        Ok(url) if url.scheme().len() > 1 => url,
        _ => return Ok(LocatorKind::Path(PathBuf::from(locator))),
    };

    match url.scheme() {
        "http" | "https" => Ok(LocatorKind::Remote(url)),
        "file" => url
            .to_file_path()
            .map(LocatorKind::Path)
            .map_err(|()| BackendError::Fetch(format!("invalid file URL: {locator}"))),
        other => Err(BackendError::Fetch(format!(
            "unsupported locator scheme '{other}'"
        ))),
    }
}

/// Produce the document bytes described by `params`.
///
/// In-memory data is returned as-is; locators are fetched or read. The
/// result is checked against [`OpenOptions::max_input_bytes`].
pub(crate) async fn load_bytes(
    params: DocumentParams,
    options: &OpenOptions,
) -> Result<Bytes, BackendError> {
    let max_input_bytes = options.max_input_bytes;
    let fetch_timeout = options.fetch_timeout;

    let bytes = match (params.data, params.url) {
        (Some(data), _) => data,
        (None, Some(locator)) => match resolve_locator(&locator)? {
            LocatorKind::Remote(url) => fetch_remote(url, fetch_timeout, max_input_bytes).await?,
            LocatorKind::Path(path) => {
                debug!(path = %path.display(), "reading local document");
                Bytes::from(tokio::fs::read(&path).await?)
            }
        },
        (None, None) => {
            return Err(BackendError::Parse(
                "no document data or locator supplied".to_string(),
            ));
        }
    };

    check_input_size(bytes.len(), max_input_bytes)?;
    Ok(bytes)
}

/// Fetch a remote document, stopping as soon as the body is known to
/// exceed `limit`.
async fn fetch_remote(url: Url, timeout: Duration, limit: Option<usize>) -> Result<Bytes, BackendError> {
    debug!(%url, "fetching remote document");
    let client = Client::builder().timeout(timeout).build()?;
    let mut response = client.get(url.clone()).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(BackendError::Fetch(format!("HTTP {status} for {url}")));
    }

    if let Some(declared) = response.content_length() {
        check_input_size(usize::try_from(declared).unwrap_or(usize::MAX), limit)?;
    }

    let mut body = BytesMut::new();
    while let Some(chunk) = response.chunk().await? {
        body.extend_from_slice(&chunk);
        check_input_size(body.len(), limit)?;
    }
    Ok(body.freeze())
}

fn check_input_size(actual: usize, limit: Option<usize>) -> Result<(), BackendError> {
    match limit {
        Some(limit) if actual > limit => Err(BackendError::Core(PdfError::ResourceLimitExceeded {
            limit_name: "max_input_bytes".to_string(),
            limit_value: limit,
            actual_value: actual,
        })),
        _ => Ok(()),
    }
}
