//! `RunClient` is the main trait used to talk to the QA run backend.

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

use crate::{Health, RunRequest, RunResponse};

/// Origin of the backend in its reference deployment.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

pub(crate) const RUN_PATH: &str = "/run";
pub(crate) const HEALTH_PATH: &str = "/healthz";

/// Trait describing capabilities of a QA run client:
/// - posting arbitrary JSON, submitting runs, probing health
///
/// Backends implement the two raw transport methods; everything else
/// is built on top of them.
#[async_trait]
pub trait RunClient {
    /// Sends a single POST with a JSON body to `path` under the base URL
    /// and decodes the response body as JSON.
    /// Non-2xx statuses are errors.
    async fn raw_post(&self, path: &str, body: String) -> Result<serde_json::Value>;

    /// Sends a single GET to `path` under the base URL
    /// and decodes the response body as JSON.
    async fn raw_get(&self, path: &str) -> Result<serde_json::Value>;

    /// Posts any serializable value and returns the response untouched.
    ///
    /// # Arguments
    /// * `path` - endpoint path, relative to the base URL
    /// * `body` - value sent as the JSON request body
    async fn post(&self, path: &str, body: impl Serialize + Send) -> Result<RunResponse> {
        let body = serde_json::to_string(&body)?;
        self.raw_post(path, body).await
    }

    /// Submits a QA run and returns the backend's response unmodified.
    ///
    /// The request is sent as given; range checks are left to the backend.
    /// Transport and HTTP failures are logged and returned to the caller
    /// as they are; nothing is retried.
    async fn submit_run(&self, req: RunRequest) -> Result<RunResponse> {
        let body = serde_json::to_string(&req)?;
        tracing::debug!(
            headful = req.headful,
            max_steps = req.max_steps,
            "submitting run"
        );
        self.raw_post(RUN_PATH, body).await.map_err(|e| {
            tracing::error!("run request failed: {e:#}");
            e
        })
    }

    /// Submits a headless run with the default step budget
    async fn submit_instructions(
        &self,
        instructions: impl Into<String> + Send,
    ) -> Result<RunResponse> {
        self.submit_run(RunRequest::new(instructions)).await
    }

    async fn health(&self) -> Result<Health> {
        let response = self.raw_get(HEALTH_PATH).await?;
        Ok(serde_json::from_value(response)?)
    }
}

/// A generic client struct, wrapping possible backends.
/// It's a convenience struct which allows picking the backend
/// from configuration or env parameters.
#[derive(Clone, Debug)]
pub enum GenericClient {
    #[cfg(feature = "reqwest_backend")]
    Reqwest(crate::reqwest::Client),
    #[cfg(feature = "hyper_backend")]
    Hyper(crate::hyper::Client),
}

impl GenericClient {
    pub fn base_url(&self) -> &str {
        match self {
            #[cfg(feature = "reqwest_backend")]
            Self::Reqwest(r) => r.base_url(),
            #[cfg(feature = "hyper_backend")]
            Self::Hyper(h) => h.base_url(),
        }
    }
}

#[async_trait]
impl RunClient for GenericClient {
    async fn raw_post(&self, path: &str, body: String) -> Result<serde_json::Value> {
        match self {
            #[cfg(feature = "reqwest_backend")]
            Self::Reqwest(r) => r.raw_post(path, body).await,
            #[cfg(feature = "hyper_backend")]
            Self::Hyper(h) => h.raw_post(path, body).await,
        }
    }

    async fn raw_get(&self, path: &str) -> Result<serde_json::Value> {
        match self {
            #[cfg(feature = "reqwest_backend")]
            Self::Reqwest(r) => r.raw_get(path).await,
            #[cfg(feature = "hyper_backend")]
            Self::Hyper(h) => h.raw_get(path).await,
        }
    }
}

/// Configuration shared by the run client and the artifact resolver
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub base_url: url::Url,
}

impl Config {
    /// # Arguments
    /// * `base_url` - backend origin; `https://` is assumed when no scheme is given
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = crate::utils::normalize_origin(base_url);
        Ok(Self {
            base_url: url::Url::parse(&base_url)?,
        })
    }

    /// Reads `QA_RUN_CLIENT_URL`, falling back to [`DEFAULT_BASE_URL`].
    pub fn from_env() -> Result<Self> {
        let url =
            std::env::var("QA_RUN_CLIENT_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned());
        Self::new(url)
    }

    /// Base URL without a trailing slash
    pub fn origin(&self) -> String {
        self.base_url.as_str().trim_end_matches('/').to_owned()
    }
}

impl Default for Config {
    fn default() -> Self {
        // Safe to unwrap, the default origin is a constant valid URL
        Self {
            base_url: url::Url::parse(DEFAULT_BASE_URL).unwrap(),
        }
    }
}

/// Establishes a run client based on `Config` struct
///
/// # Examples
///
/// ```
/// # use qa_run_client::Config;
/// let client = qa_run_client::new_client_from_config(Config::default()).unwrap();
/// assert_eq!(client.base_url(), "http://127.0.0.1:8000");
/// ```
pub fn new_client_from_config(config: Config) -> Result<GenericClient> {
    let scheme = config.base_url.scheme().to_owned();
    Ok(match scheme.as_str() {
        #[cfg(feature = "reqwest_backend")]
        "http" | "https" => GenericClient::Reqwest(crate::reqwest::Client::from_config(config)?),
        #[cfg(all(feature = "hyper_backend", not(feature = "reqwest_backend")))]
        "http" | "https" => GenericClient::Hyper(crate::hyper::Client::from_config(config)?),
        _ => anyhow::bail!("Unknown scheme: {scheme}. Make sure your backend exists and is enabled with its feature flag"),
    })
}

/// Establishes a run client based on environment variables
///
/// # Env
/// * (optional) `QA_RUN_CLIENT_URL` - origin of the backend, defaults to [`DEFAULT_BASE_URL`]
/// * (optional) `QA_RUN_CLIENT_BACKEND` - one of the available backends,
///   `reqwest` or `hyper`. Defaults to `reqwest` when it is enabled.
pub fn new_client() -> Result<GenericClient> {
    let config = Config::from_env()?;
    let backend = std::env::var("QA_RUN_CLIENT_BACKEND").unwrap_or_else(|_| {
        if cfg!(feature = "reqwest_backend") {
            "reqwest"
        } else {
            "hyper"
        }
        .to_string()
    });
    Ok(match backend.as_str() {
        #[cfg(feature = "reqwest_backend")]
        "reqwest" => GenericClient::Reqwest(crate::reqwest::Client::from_config(config)?),
        #[cfg(feature = "hyper_backend")]
        "hyper" => GenericClient::Hyper(crate::hyper::Client::from_config(config)?),
        _ => anyhow::bail!("Unknown backend: {backend}. Make sure your backend exists and is enabled with its feature flag"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_origin() {
        let config = Config::default();
        assert_eq!(config.origin(), DEFAULT_BASE_URL);
        assert_eq!(Config::new(DEFAULT_BASE_URL).unwrap(), config);
    }

    #[test]
    fn test_config_assumes_https() {
        let config = Config::new("qa.example.com").unwrap();
        assert_eq!(config.base_url.scheme(), "https");
        assert_eq!(config.origin(), "https://qa.example.com");
    }

    #[test]
    fn test_config_keeps_path_prefix() {
        let config = Config::new("http://qa.example.com/api/").unwrap();
        assert_eq!(config.origin(), "http://qa.example.com/api");
    }

    #[test]
    fn test_config_rejects_garbage() {
        assert!(Config::new("http://[::1").is_err());
    }

    #[cfg(feature = "reqwest_backend")]
    #[test]
    fn test_new_client_from_config_picks_reqwest() {
        let client = new_client_from_config(Config::default()).unwrap();
        assert!(matches!(client, GenericClient::Reqwest(_)));
    }

    #[test]
    fn test_new_client_from_config_unknown_scheme() {
        let config = Config::new("ftp://files.example.com").unwrap();
        assert!(new_client_from_config(config).is_err());
    }
}
