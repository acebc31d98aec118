use crate::fetch::client::HttpClient;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderValue};

/// An [`HttpClient`] wrapper that sends `Authorization: Bearer <token>`.
///
/// Used when the dataset is published behind a token-protected endpoint.
pub struct Bearer<C> {
    inner: C,
    value: HeaderValue,
}

impl<C> Bearer<C> {
    /// Fails if the token contains bytes that are not valid in a header.
    pub fn new(inner: C, token: &str) -> Result<Self> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
            .context("bearer token is not a valid header value")?;
        value.set_sensitive(true);
        Ok(Self { inner, value })
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for Bearer<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        req.headers_mut().insert(AUTHORIZATION, self.value.clone());
        self.inner.execute(req).await
    }
}
