//! A library for talking to a QA run backend over HTTP.
//!
//! qa-run-client submits QA run instructions to the backend, which drives a
//! browser agent and stores screenshots and traces per run, and rewrites the
//! local paths of those artifacts into the URLs the backend serves them under.
//!
//! Both halves share one explicit [`Config`]; there is no process-wide client.
//!
//! ```rust,no_run
//! # async fn f() -> anyhow::Result<()> {
//! use qa_run_client::{ArtifactUrlResolver, Config, RunClient, RunReport, RunRequest};
//!
//! let config = Config::default();
//! let client = qa_run_client::new_client_from_config(config.clone())?;
//! let resolver = ArtifactUrlResolver::from_config(&config);
//!
//! let response = client
//!     .submit_run(RunRequest::new("open the benefits page").max_steps(20))
//!     .await?;
//! let report = RunReport::from_response(&response)?;
//! for url in report.screenshot_urls(&resolver) {
//!     println!("{url}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod proto;
pub use proto::{Health, RunReport, RunRequest, RunResponse, ScreenDescription};

pub mod artifacts;
pub use artifacts::ArtifactUrlResolver;

pub mod client;
pub use client::{
    new_client, new_client_from_config, Config, GenericClient, RunClient, DEFAULT_BASE_URL,
};

#[cfg(feature = "reqwest_backend")]
pub mod reqwest;

#[cfg(feature = "hyper_backend")]
pub mod hyper;

mod utils;
