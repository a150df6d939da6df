//! `proto` contains the wire types exchanged with the QA run backend.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::artifacts::ArtifactUrlResolver;

/// Number of agent steps a run gets unless the caller asks otherwise.
pub const DEFAULT_MAX_STEPS: u32 = 16;

/// Largest step budget the backend accepts.
pub const MAX_STEPS_LIMIT: u32 = 60;

/// Response of a run, passed through exactly as the backend sent it.
pub type RunResponse = serde_json::Value;

/// Instructions for a single QA run
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRequest {
    pub instructions: String,
    #[serde(default)]
    pub headful: bool,
    #[serde(default = "default_max_steps")]
    pub max_steps: u32,
}

fn default_max_steps() -> u32 {
    DEFAULT_MAX_STEPS
}

impl RunRequest {
    /// Creates a headless run request with the default step budget
    ///
    /// # Examples
    ///
    /// ```
    /// let req = qa_run_client::RunRequest::new("open the benefits page");
    /// assert!(!req.headful);
    /// assert_eq!(req.max_steps, 16);
    /// ```
    pub fn new(instructions: impl Into<String>) -> Self {
        Self {
            instructions: instructions.into(),
            headful: false,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    /// Asks the backend to open a visible browser window
    pub fn headful(mut self, headful: bool) -> Self {
        self.headful = headful;
        self
    }

    pub fn max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Checks the step budget against the range the backend accepts.
    /// Never called by the client itself; callers may use it before submitting.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(1..=MAX_STEPS_LIMIT).contains(&self.max_steps) {
            anyhow::bail!(
                "max_steps must be between 1 and {MAX_STEPS_LIMIT}, got {}",
                self.max_steps
            );
        }
        Ok(())
    }
}

impl From<String> for RunRequest {
    fn from(instructions: String) -> Self {
        RunRequest::new(instructions)
    }
}

impl From<&str> for RunRequest {
    fn from(instructions: &str) -> Self {
        RunRequest::new(instructions)
    }
}

/// What the agent saw on the last screen of a run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenDescription {
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub h1: Option<String>,
    #[serde(default)]
    pub nav_items: Vec<String>,
    #[serde(default)]
    pub primary_ctas: Vec<String>,
    #[serde(default)]
    pub visible_user: Option<String>,
}

/// Typed view of a [`RunResponse`].
///
/// The client never builds one on its own: responses stay opaque until the
/// caller asks for this view with [`RunReport::from_response`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: String,
    pub artifacts_dir: String,
    pub screen: ScreenDescription,
    #[serde(default)]
    pub task_result: serde_json::Value,
    #[serde(default)]
    pub urls: Vec<String>,
    #[serde(default)]
    pub screenshots: Vec<String>,
    pub video_dir: String,
    pub traces_dir: String,
    pub har_path: String,
    pub elapsed_ms: u64,
}

impl RunReport {
    pub fn from_response(response: &RunResponse) -> anyhow::Result<Self> {
        Ok(serde_json::from_value(response.clone())?)
    }

    /// Public URLs of the screenshots this run stored on the backend.
    pub fn screenshot_urls(&self, resolver: &ArtifactUrlResolver) -> Vec<String> {
        resolver.resolve_all(self.screenshots.iter().map(String::as_str))
    }
}

/// Backend readiness: which of its required settings are present.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Health {
    pub checks: BTreeMap<String, bool>,
}

impl Health {
    pub fn is_ready(&self) -> bool {
        self.checks.values().all(|ok| *ok)
    }

    /// Names of the settings the backend reports as missing
    pub fn missing(&self) -> Vec<&str> {
        self.checks
            .iter()
            .filter(|(_, ok)| !**ok)
            .map(|(key, _)| key.as_str())
            .collect()
    }
}
