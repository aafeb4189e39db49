use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes requests for remote PMIS tables. Wrappers such as
/// [`BearerToken`](super::BearerToken) decorate an inner client.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
