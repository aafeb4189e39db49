//! Retrieval of PMIS tables published over HTTP(S).

mod auth;
mod basic;
mod client;

pub use auth::BearerToken;
pub use basic::{BasicClient, DEFAULT_TIMEOUT};
pub use client::HttpClient;

use anyhow::{Context, Result};
use tracing::debug;

/// Returns `true` when `source` should be fetched rather than opened locally.
pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Downloads `url` with `client`, failing on a non-success status.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(
        reqwest::Method::GET,
        url.parse::<reqwest::Url>().with_context(|| format!("invalid data source URL '{url}'"))?,
    );

    let resp = client.execute(req).await?.error_for_status()?;
    let bytes = resp.bytes().await?.to_vec();
    debug!(url, bytes = bytes.len(), "Remote table downloaded");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_remote() {
        assert!(is_remote("https://example.org/pmis.csv"));
        assert!(is_remote("http://localhost:8000/pmis.csv"));
        assert!(!is_remote("data/pmis.csv"));
        assert!(!is_remote("httpdata.csv"));
    }
}
