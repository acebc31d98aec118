use async_trait::async_trait;
use reqwest::{Request, Response};

/// Sends a prepared request. Lets auth wrappers and test doubles sit in front of reqwest.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
