//! `ArtifactUrlResolver` maps paths of files a run wrote on the backend's
//! disk to the URLs the backend serves them under.

use crate::client::{Config, DEFAULT_BASE_URL};

const SEPARATOR: char = '/';
const ARTIFACTS_SEGMENT: &str = "artifacts";
const SCREENS_SEGMENT: &str = "screens";

/// Rewrites local artifact paths into backend-served image URLs.
///
/// A path such as `/data/artifacts/<run_id>/.../<file>` becomes
/// `<base_url>/artifacts/<run_id>/screens/<file>`. Paths without an
/// `artifacts/<run_id>` segment are returned unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactUrlResolver {
    base_url: String,
}

impl ArtifactUrlResolver {
    /// # Arguments
    /// * `base_url` - origin of the backend serving the artifacts
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: crate::utils::normalize_origin(base_url),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.origin())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// # Examples
    ///
    /// ```
    /// # use qa_run_client::ArtifactUrlResolver;
    /// let resolver = ArtifactUrlResolver::new("http://127.0.0.1:8000");
    /// assert_eq!(
    ///     resolver.resolve("/data/artifacts/run123/img1.png"),
    ///     "http://127.0.0.1:8000/artifacts/run123/screens/img1.png"
    /// );
    /// assert_eq!(resolver.resolve("img1.png"), "img1.png");
    /// ```
    pub fn resolve(&self, local_path: &str) -> String {
        match run_id(local_path) {
            Some(run_id) => format!(
                "{}/{ARTIFACTS_SEGMENT}/{run_id}/{SCREENS_SEGMENT}/{}",
                self.base_url,
                file_name(local_path)
            ),
            None => local_path.to_owned(),
        }
    }

    pub fn resolve_all<'a>(&self, local_paths: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        local_paths.into_iter().map(|p| self.resolve(p)).collect()
    }
}

impl Default for ArtifactUrlResolver {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Run identifier: the first non-empty segment following an `artifacts` segment.
pub fn run_id(local_path: &str) -> Option<&str> {
    let segments: Vec<&str> = local_path.split(SEPARATOR).collect();
    segments
        .windows(2)
        .find(|pair| pair[0] == ARTIFACTS_SEGMENT && !pair[1].is_empty())
        .map(|pair| pair[1])
}

/// Everything after the last separator, or the whole path if there is none.
pub fn file_name(local_path: &str) -> &str {
    local_path
        .rsplit_once(SEPARATOR)
        .map_or(local_path, |(_, name)| name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> ArtifactUrlResolver {
        ArtifactUrlResolver::new("http://127.0.0.1:8000")
    }

    #[test]
    fn test_resolve_screens_path() {
        assert_eq!(
            resolver().resolve("/data/artifacts/run123/screens/img1.png"),
            "http://127.0.0.1:8000/artifacts/run123/screens/img1.png"
        );
    }

    #[test]
    fn test_resolve_always_inserts_screens() {
        assert_eq!(
            resolver().resolve("/data/artifacts/run123/img1.png"),
            "http://127.0.0.1:8000/artifacts/run123/screens/img1.png"
        );
        assert_eq!(
            resolver().resolve("artifacts/run123/video/deep/clip.webm"),
            "http://127.0.0.1:8000/artifacts/run123/screens/clip.webm"
        );
    }

    #[test]
    fn test_resolve_without_artifacts_segment_is_identity() {
        assert_eq!(
            resolver().resolve("no-artifacts-here.png"),
            "no-artifacts-here.png"
        );
        assert_eq!(resolver().resolve("/tmp/run123/a.png"), "/tmp/run123/a.png");
        assert_eq!(resolver().resolve(""), "");
        // Only a whole segment counts.
        assert_eq!(
            resolver().resolve("/data/myartifacts/run123/a.png"),
            "/data/myartifacts/run123/a.png"
        );
    }

    #[test]
    fn test_resolve_trailing_separator_gives_empty_file_name() {
        assert_eq!(
            resolver().resolve("artifacts/abc/"),
            "http://127.0.0.1:8000/artifacts/abc/screens/"
        );
    }

    #[test]
    fn test_resolve_needs_non_empty_run_id() {
        assert_eq!(resolver().resolve("/data/artifacts/"), "/data/artifacts/");
        assert_eq!(resolver().resolve("/data/artifacts"), "/data/artifacts");
        assert_eq!(
            resolver().resolve("/data/artifacts//artifacts/r9/a.png"),
            "http://127.0.0.1:8000/artifacts/r9/screens/a.png"
        );
    }

    #[test]
    fn test_backslashes_are_not_separators() {
        let path = r"C:\data\artifacts\run123\img1.png";
        assert_eq!(resolver().resolve(path), path);
    }

    #[test]
    fn test_base_url_is_normalized() {
        let resolver = ArtifactUrlResolver::new("http://127.0.0.1:8000/");
        assert_eq!(resolver.base_url(), "http://127.0.0.1:8000");
        assert_eq!(
            resolver.resolve("artifacts/r/a.png"),
            "http://127.0.0.1:8000/artifacts/r/screens/a.png"
        );
        assert_eq!(ArtifactUrlResolver::default(), resolver);
    }

    #[test]
    fn test_helpers() {
        assert_eq!(run_id("x/artifacts/r1/y.png"), Some("r1"));
        assert_eq!(run_id("x/y.png"), None);
        assert_eq!(file_name("x/y.png"), "y.png");
        assert_eq!(file_name("y.png"), "y.png");
        assert_eq!(file_name("x/"), "");
    }

    #[test]
    fn test_resolve_all() {
        assert_eq!(
            resolver().resolve_all(["artifacts/r/a.png", "b.png"]),
            vec!["http://127.0.0.1:8000/artifacts/r/screens/a.png", "b.png"]
        );
    }
}
