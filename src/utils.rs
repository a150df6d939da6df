use anyhow::Result;

/// Turns a user-supplied origin into the form every client stores:
/// a scheme is always present and there is no trailing slash.
pub(crate) fn normalize_origin(url: impl Into<String>) -> String {
    let url = url.into();
    // Auto-update the URL to start with https:// if no protocol was specified
    let url = if !url.contains("://") {
        format!("https://{url}")
    } else {
        url
    };
    url.trim_end_matches('/').to_owned()
}

pub(crate) fn join_url(origin: &str, path: &str) -> String {
    format!("{origin}/{}", path.trim_start_matches('/'))
}

/// Decodes a response body without imposing any shape on it.
/// An empty body decodes to `null`.
pub(crate) fn parse_body(body: &str) -> Result<serde_json::Value> {
    if body.trim().is_empty() {
        return Ok(serde_json::Value::Null);
    }
    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_origin() {
        assert_eq!(
            normalize_origin("http://127.0.0.1:8000/"),
            "http://127.0.0.1:8000"
        );
        assert_eq!(normalize_origin("qa.example.com"), "https://qa.example.com");
        assert_eq!(
            normalize_origin("http://qa.example.com/api//"),
            "http://qa.example.com/api"
        );
    }

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("http://127.0.0.1:8000", "/run"),
            "http://127.0.0.1:8000/run"
        );
        assert_eq!(
            join_url("http://127.0.0.1:8000", "healthz"),
            "http://127.0.0.1:8000/healthz"
        );
    }

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body("").unwrap(), serde_json::Value::Null);
        assert_eq!(parse_body("{\"a\":1}").unwrap()["a"], 1);
        assert!(parse_body("<html>").is_err());
    }
}
