use super::client::HttpClient;
use async_trait::async_trait;
use std::time::Duration;

const USER_AGENT: &str = concat!("pmis_explorer/", env!("CARGO_PKG_VERSION"));

/// Statewide PMIS extracts run to hundreds of megabytes.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Unauthenticated `reqwest` client with a request timeout.
pub struct BasicClient(reqwest::Client);

impl BasicClient {
    pub fn new() -> reqwest::Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Fails when the TLS backend cannot be initialized.
    pub fn with_timeout(timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self(client))
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        self.0.execute(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_timeout_builds_client() {
        assert!(BasicClient::with_timeout(Duration::from_secs(5)).is_ok());
        assert!(BasicClient::new().is_ok());
    }
}
