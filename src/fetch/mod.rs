//! Input loading from local paths or HTTP URLs.

mod client;
mod basic;

pub use client::HttpClient;
pub use basic::BasicClient;

use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

use crate::parser::Source;

pub async fn fetch_bytes<C: HttpClient>(
    client: &C,
    url: &str,
) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(
        reqwest::Method::GET,
        url.parse()?,
    );

    let resp = client.execute(req).await?.error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}

/// Loads an input file from a local path or fetches it over HTTP.
#[tracing::instrument(skip_all, fields(location = %location))]
pub async fn load_source(location: &str) -> Result<Source> {
    let bytes = if is_url(location) {
        let client = BasicClient::new()?;
        fetch_bytes(&client, location)
            .await
            .with_context(|| format!("failed to fetch {location}"))?
    } else {
        tokio::fs::read(location)
            .await
            .with_context(|| format!("failed to read {location}"))?
    };
    debug!(bytes = bytes.len(), "Input loaded");
    Ok(Source::new(display_name(location), bytes))
}

fn is_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// File name shown in logs and errors: the last path or URL segment.
fn display_name(location: &str) -> String {
    if is_url(location) {
        let path = location.split(['?', '#']).next().unwrap_or(location);
        path.rsplit('/')
            .find(|s| !s.is_empty())
            .unwrap_or(location)
            .to_string()
    } else {
        Path::new(location)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(location)
            .to_string()
    }
}
