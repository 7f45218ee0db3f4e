use url::Url;

use crate::infrastructure::config::ConfigError;

/// Fixed resource path of the event feed.
pub const FEED_PATH: &str = "/ws";

/// Derive the feed endpoint from a page origin: `http → ws`, `https → wss`,
/// path replaced by [`FEED_PATH`], query and fragment dropped.
pub fn feed_endpoint(origin: &Url) -> Result<Url, ConfigError> {
    let scheme = match origin.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => return Err(ConfigError::UnsupportedScheme(other.to_string())),
    };

    let mut endpoint = origin.clone();
    endpoint
        .set_scheme(scheme)
        .map_err(|()| ConfigError::UnsupportedScheme(scheme.to_string()))?;
    endpoint.set_path(FEED_PATH);
    endpoint.set_query(None);
    endpoint.set_fragment(None);
    Ok(endpoint)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(origin: &str) -> Result<String, ConfigError> {
        let origin = Url::parse(origin).expect("test origin parses");
        feed_endpoint(&origin).map(String::from)
    }

    #[test]
    fn mirrors_origin_security() {
        assert_eq!(
            endpoint("http://localhost:8080").ok().as_deref(),
            Some("ws://localhost:8080/ws")
        );
        assert_eq!(
            endpoint("https://overlay.example.com/overlay.html?theme=dark#top")
                .ok()
                .as_deref(),
            Some("wss://overlay.example.com/ws")
        );
    }

    #[test]
    fn rejects_non_web_origins() {
        assert!(matches!(
            endpoint("file:///tmp/overlay.html"),
            Err(ConfigError::UnsupportedScheme(s)) if s == "file"
        ));
    }
}
