use crate::fetch::client::HttpClient;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderValue};

/// An [`HttpClient`] wrapper that sends `Authorization: Bearer <token>` with
/// every request, for tables published behind a token-protected endpoint.
pub struct BearerToken<C> {
    inner: C,
    header: HeaderValue,
}

impl<C> BearerToken<C> {
    /// Fails when the token contains characters not allowed in a header.
    pub fn new(inner: C, token: &str) -> anyhow::Result<Self> {
        let mut header = HeaderValue::from_str(&format!("Bearer {token}"))?;
        header.set_sensitive(true);
        Ok(Self { inner, header })
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for BearerToken<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        req.headers_mut().insert(AUTHORIZATION, self.header.clone());
        self.inner.execute(req).await
    }
}
