use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Method, Request, Response, Url};
use std::time::Duration;

#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}

/// Plain reqwest transport with conservative timeouts.
pub struct BasicClient(reqwest::Client);

impl BasicClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .expect("BasicClient: failed to construct HTTP client");
        Self(client)
    }
}

impl Default for BasicClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn execute(&self, req: Request) -> reqwest::Result<Response> {
        self.0.execute(req).await
    }
}

/// Executes a bare GET for `url`. Status handling is left to the caller.
pub async fn get<C: HttpClient>(client: &C, url: Url) -> reqwest::Result<Response> {
    client.execute(Request::new(Method::GET, url)).await
}

/// Executes a PUT with a pre-serialized JSON body, erroring on non-success
/// status.
pub async fn put_json<C: HttpClient>(
    client: &C,
    url: Url,
    body: Vec<u8>,
) -> reqwest::Result<Response> {
    let mut req = Request::new(Method::PUT, url);
    req.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    *req.body_mut() = Some(body.into());

    let resp = client.execute(req).await?;
    resp.error_for_status()
}
