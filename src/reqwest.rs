use crate::client::Config;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

/// Run client backed by `reqwest`.
///
/// HTTP failures surface as `reqwest::Error`, so callers can downcast
/// the returned `anyhow::Error` to inspect the status or the cause.
#[derive(Clone, Debug)]
pub struct Client {
    inner: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Creates a run client for the backend at `url`.
    ///
    /// # Arguments
    /// * `url` - origin of the backend; `https://` is assumed when no scheme is given
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), url)
    }

    /// Creates a run client reusing an already configured `reqwest::Client`,
    /// e.g. one with a timeout.
    pub fn with_client(inner: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            inner,
            base_url: crate::utils::normalize_origin(url),
        }
    }

    /// Establishes a run client from a `Config` object
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        Ok(Self::new(config.origin()))
    }

    /// Establishes a run client, given a `Url`
    ///
    /// # Examples
    ///
    /// ```
    /// # use qa_run_client::reqwest::Client;
    /// let client = Client::from_url("http://127.0.0.1:8000").unwrap();
    /// assert_eq!(client.base_url(), "http://127.0.0.1:8000");
    /// ```
    pub fn from_url<T: TryInto<url::Url>>(url: T) -> anyhow::Result<Client>
    where
        <T as TryInto<url::Url>>::Error: std::fmt::Display,
    {
        let url = url
            .try_into()
            .map_err(|e| anyhow::anyhow!("{e}"))?;
        Ok(Client::new(url.as_str()))
    }

    pub fn from_env() -> anyhow::Result<Client> {
        Self::from_config(Config::from_env()?)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl crate::RunClient for Client {
    async fn raw_post(&self, path: &str, body: String) -> anyhow::Result<serde_json::Value> {
        let url = crate::utils::join_url(&self.base_url, path);
        tracing::debug!("POST {url}");
        let response = self
            .inner
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?
            .error_for_status()?;
        let resp: String = response.text().await?;
        crate::utils::parse_body(&resp)
    }

    async fn raw_get(&self, path: &str) -> anyhow::Result<serde_json::Value> {
        let url = crate::utils::join_url(&self.base_url, path);
        tracing::debug!("GET {url}");
        let response = self.inner.get(&url).send().await?.error_for_status()?;
        let resp: String = response.text().await?;
        crate::utils::parse_body(&resp)
    }
}
