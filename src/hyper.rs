use anyhow::Result;
use async_trait::async_trait;
use hyper::body::{to_bytes, HttpBody};
use hyper::client::{connect::Connection, HttpConnector};
use hyper::header::CONTENT_TYPE;
use hyper::{Body, Method, Request, Uri};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use tokio::io::{AsyncRead, AsyncWrite};
use tower::Service;

use crate::client::Config;

#[derive(Clone, Debug)]
pub struct HttpClient<C = HttpConnector> {
    inner: hyper::client::Client<HttpsConnector<C>>,
}

pub async fn to_text<T>(body: T) -> anyhow::Result<String>
where
    T: HttpBody,
    T::Error: std::error::Error + Sync + Send + 'static,
{
    let bytes = to_bytes(body).await?;
    Ok(String::from_utf8(bytes.to_vec())?)
}

impl HttpClient {
    pub fn new() -> Self {
        let mut connector = HttpConnector::new();
        // The TLS layer on top handles https:// itself
        connector.enforce_http(false);
        Self::with_connector(connector)
    }
}

impl<C> HttpClient<C>
where
    C: Service<Uri> + Send + Clone + Sync + 'static,
    C::Response: Connection + AsyncRead + AsyncWrite + Send + Unpin + 'static,
    C::Future: Send + 'static,
    C::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    /// Creates an HttpClient using the provided connector.
    pub fn with_connector(connector: C) -> Self {
        let connector = HttpsConnectorBuilder::new()
            .with_webpki_roots()
            .https_or_http()
            .enable_http1()
            .enable_http2()
            .wrap_connector(connector);

        let builder = hyper::client::Client::builder();
        let inner = builder.build(connector);

        Self { inner }
    }

    /// Sends one request and decodes the JSON response body.
    /// Any non-2xx status becomes an error carrying the status and body text.
    pub async fn send(
        &self,
        method: Method,
        url: String,
        body: Option<String>,
    ) -> Result<serde_json::Value> {
        let builder = Request::builder().method(method).uri(url);
        let request = match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.inner.request(request).await?;
        if !response.status().is_success() {
            let status = response.status();
            let txt = to_text(response.into_body()).await?;
            anyhow::bail!("{status}: {txt}");
        }
        let resp = to_text(response.into_body()).await?;
        crate::utils::parse_body(&resp)
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Run client backed by a bare `hyper` connection pool.
#[derive(Clone, Debug)]
pub struct Client<C = HttpConnector> {
    inner: HttpClient<C>,
    base_url: String,
}

impl Client {
    /// Creates a run client for the backend at `url`.
    ///
    /// # Arguments
    /// * `url` - origin of the backend; `https://` is assumed when no scheme is given
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_http_client(HttpClient::new(), url)
    }

    /// Establishes a run client from a `Config` object
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        Ok(Self::new(config.origin()))
    }

    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_config(Config::from_env()?)
    }
}

impl<C> Client<C> {
    pub fn with_http_client(inner: HttpClient<C>, url: impl Into<String>) -> Self {
        Self {
            inner,
            base_url: crate::utils::normalize_origin(url),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl<C> crate::RunClient for Client<C>
where
    C: Service<Uri> + Send + Clone + Sync + 'static,
    C::Response: Connection + AsyncRead + AsyncWrite + Send + Unpin + 'static,
    C::Future: Send + 'static,
    C::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    async fn raw_post(&self, path: &str, body: String) -> Result<serde_json::Value> {
        let url = crate::utils::join_url(&self.base_url, path);
        tracing::debug!("POST {url}");
        self.inner.send(Method::POST, url, Some(body)).await
    }

    async fn raw_get(&self, path: &str) -> Result<serde_json::Value> {
        let url = crate::utils::join_url(&self.base_url, path);
        tracing::debug!("GET {url}");
        self.inner.send(Method::GET, url, None).await
    }
}
